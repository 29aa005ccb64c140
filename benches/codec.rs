//! Benchmark JSON decode/encode of a Person with a varying number of phones.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet,
};
use protojson::prost_reflect::{DescriptorPool, MessageDescriptor};
use serde_json::{json, Map, Value as JsonValue};

fn field(name: &str, number: i32, label: Label, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn person_descriptor() -> MessageDescriptor {
    let phone = DescriptorProto {
        name: Some("PhoneNumber".into()),
        field: vec![
            field("number", 1, Label::Optional, Type::String),
            FieldDescriptorProto {
                type_name: Some(".bench.PhoneType".into()),
                ..field("phone_type", 2, Label::Optional, Type::Enum)
            },
        ],
        ..Default::default()
    };
    let person = DescriptorProto {
        name: Some("Person".into()),
        field: vec![
            field("name", 1, Label::Optional, Type::String),
            field("id", 2, Label::Optional, Type::Int32),
            field("email", 3, Label::Optional, Type::String),
            FieldDescriptorProto {
                type_name: Some(".bench.PhoneNumber".into()),
                ..field("phones", 4, Label::Repeated, Type::Message)
            },
            field("avatar", 5, Label::Optional, Type::Bytes),
        ],
        ..Default::default()
    };
    let phone_type = EnumDescriptorProto {
        name: Some("PhoneType".into()),
        value: [("MOBILE", 0), ("HOME", 1), ("WORK", 2)]
            .into_iter()
            .map(|(name, number)| EnumValueDescriptorProto {
                name: Some(name.into()),
                number: Some(number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };
    let file = FileDescriptorProto {
        name: Some("bench.proto".into()),
        package: Some("bench".into()),
        message_type: vec![phone, person],
        enum_type: vec![phone_type],
        ..Default::default()
    };
    let pool =
        DescriptorPool::from_file_descriptor_set(FileDescriptorSet { file: vec![file] }).unwrap();
    pool.get_message_by_name("bench.Person").unwrap()
}

fn create_person(num_phones: usize) -> Map<String, JsonValue> {
    let phones: Vec<_> = (0..num_phones)
        .map(|i| {
            json!({
                "number": format!("555-{i:04}"),
                "phone_type": (["MOBILE", "HOME", "WORK"][i % 3]),
            })
        })
        .collect();
    let person = json!({
        "name": "John Doe",
        "id": 12345,
        "email": "john.doe@example.com",
        "phones": phones,
        "avatar": "89504e470d0a1a0a0000000d49484452",
    });
    match person {
        JsonValue::Object(object) => object,
        _ => unreachable!(),
    }
}

fn decode_benchmark(c: &mut Criterion) {
    let descriptor = person_descriptor();
    let mut group = c.benchmark_group("decode");

    for num_phones in [0, 1, 10, 100] {
        let person = create_person(num_phones);
        group.throughput(Throughput::Elements(num_phones as u64 + 1));

        group.bench_with_input(
            BenchmarkId::new("protojson", num_phones),
            &person,
            |b, person| {
                b.iter(|| {
                    let message = protojson::decode(person, &descriptor).unwrap();
                    std::hint::black_box(message)
                })
            },
        );
    }

    group.finish();
}

fn encode_benchmark(c: &mut Criterion) {
    let descriptor = person_descriptor();
    let mut group = c.benchmark_group("encode");

    for num_phones in [0, 1, 10, 100] {
        let message = protojson::decode(&create_person(num_phones), &descriptor).unwrap();
        group.throughput(Throughput::Elements(num_phones as u64 + 1));

        group.bench_with_input(
            BenchmarkId::new("protojson", num_phones),
            &message,
            |b, message| {
                b.iter(|| {
                    let object = protojson::encode(message).unwrap();
                    std::hint::black_box(object)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, decode_benchmark, encode_benchmark);
criterion_main!(benches);
