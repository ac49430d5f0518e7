//! Performance benchmarks for the marshal codec and opcode retargeter.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pyc_retarget::container::retarget;
use pyc_retarget::marshal::{self, Code, Value};
use pyc_retarget::opcode::tables;

fn messiah_code_object(instruction_count: usize) -> Value {
    let pop_top = tables::messiah_number("POP_TOP").unwrap();
    let load_fast_zero = tables::messiah_number("LOAD_FAST_ZERO_LOAD_CONST").unwrap();
    let mut code_bytes = Vec::with_capacity(instruction_count * 3);
    for i in 0..instruction_count {
        if i % 5 == 0 {
            code_bytes.push(load_fast_zero);
            code_bytes.extend_from_slice(&[0u8; 2]);
        } else {
            code_bytes.push(pop_top);
        }
    }

    Value::Code(Box::new(Code {
        argcount: 0,
        nlocals: 1,
        stacksize: 2,
        flags: 0,
        code: Value::Bytes(code_bytes),
        consts: Value::Tuple(vec![Value::None]),
        names: Value::Tuple(vec![]),
        varnames: Value::Tuple(vec![Value::Interned(b"x".to_vec())]),
        freevars: Value::Tuple(vec![]),
        cellvars: Value::Tuple(vec![]),
        filename: Value::Interned(b"bench_module.py".to_vec()),
        name: Value::Interned(b"<module>".to_vec()),
        firstlineno: 1,
        lnotab: Value::Bytes(vec![]),
    }))
}

fn wrap_with_header(body: &[u8]) -> Vec<u8> {
    let mut input = vec![0u8; 8];
    input.extend_from_slice(body);
    input
}

fn bench_marshal_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("marshal_decode");

    for size in [16usize, 256, 4096] {
        let value = messiah_code_object(size);
        let body = marshal::encode(&value).unwrap();

        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &body, |b, body| {
            b.iter(|| marshal::decode(body));
        });
    }

    group.finish();
}

fn bench_marshal_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("marshal_encode");

    for size in [16usize, 256, 4096] {
        let value = messiah_code_object(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| marshal::encode(value));
        });
    }

    group.finish();
}

fn bench_end_to_end_retarget(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end_retarget");
    group.throughput(Throughput::Elements(1));

    for size in [16usize, 256, 4096] {
        let value = messiah_code_object(size);
        let body = marshal::encode(&value).unwrap();
        let input = wrap_with_header(&body);

        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| retarget(input));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_marshal_decode, bench_marshal_encode, bench_end_to_end_retarget);
criterion_main!(benches);
