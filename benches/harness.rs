//! Criterion benchmarks for value generation and trial throughput.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use veritas::rules::{NumberRangeRule, RequiredRule, StringLengthRule};
use veritas::{
    generate, Fault, FaultKind, ParamType, RuleSetContract, RunConfig, Suite, TargetRegistry,
    TestCase, TrialInputs, Validator, Value, ValueSpec,
};

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    let specs = [
        (
            "literal",
            ValueSpec::new("n", ParamType::Int).with_value(42),
        ),
        (
            "regex_five_digits",
            ValueSpec::new("n", ParamType::Int).with_regex(r"^\d{5}$"),
        ),
        (
            "float_regex_bounded",
            ValueSpec::new("x", ParamType::Float).with_regex(r"^-?\d{4}\.\d{3}$"),
        ),
        (
            "range",
            ValueSpec::new("n", ParamType::Int).with_range(-1000.0, 1000.0),
        ),
        ("bare_int", ValueSpec::new("n", ParamType::Int)),
    ];

    for (name, spec) in specs {
        group.bench_with_input(BenchmarkId::new("strategy", name), &spec, |b, spec| {
            b.iter(|| generate(spec));
        });
    }

    group.finish();
}

fn bench_registry() -> TargetRegistry {
    let mut registry = TargetRegistry::new();
    registry.register("divide", |inputs: &TrialInputs| {
        let a = inputs.get("a").and_then(Value::as_i64).unwrap_or(0);
        let b = inputs.get("b").and_then(Value::as_i64).unwrap_or(1);
        if b == 0 {
            return Err(Fault::new(FaultKind::DivisionByZero, "division by zero"));
        }
        Ok(Value::Int(a / b))
    });
    registry
}

fn bench_suite_trials(c: &mut Criterion) {
    let mut group = c.benchmark_group("suite_trials");
    let registry = bench_registry();
    let iterations = 200;

    let modes = [
        ("sequential", RunConfig::sequential()),
        ("parallel", RunConfig::default()),
    ];

    for (name, config) in modes {
        let mut suite = Suite::new("bench").with_config(config);
        suite
            .add(
                TestCase::new("divide", "fuzz divide")
                    .with_input(ValueSpec::new("a", ParamType::Int).with_range(-10000.0, 10000.0))
                    .with_input(ValueSpec::new("b", ParamType::Int).with_range(1.0, 100.0))
                    .with_iterations(iterations),
            )
            .unwrap();

        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(BenchmarkId::new("mode", name), &suite, |b, suite| {
            b.iter(|| suite.run(&registry));
        });
    }

    group.finish();
}

fn bench_contract_validation(c: &mut Criterion) {
    let validator = Validator::new(
        RuleSetContract::new("user")
            .with_rule(RequiredRule::new("name"))
            .with_rule(StringLengthRule::new("name").with_min(3).with_max(20))
            .with_rule(RequiredRule::new("age"))
            .with_rule(NumberRangeRule::new("age").with_min(0.0).with_max(120.0)),
    );
    let data = match serde_json::json!({"name": "John", "age": 30}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };

    c.bench_function("contract_validate", |b| {
        b.iter(|| validator.validate(&data));
    });
}

criterion_group!(
    benches,
    bench_generation,
    bench_suite_trials,
    bench_contract_validation,
);

criterion_main!(benches);
