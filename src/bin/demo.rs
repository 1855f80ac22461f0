//! Showcase binary: fuzz bundled example targets and validate example records.

use clap::Parser;
use regex::Regex;
use std::sync::OnceLock;
use veritas::rules::{
    DateOrderRule, NumberRangeRule, RequiredRule, StringLengthRule, StringRegexRule,
};
use veritas::{
    ConsoleReporter, ContractSuite, ExpectedFault, Fault, FaultKind, ParamType, RuleSetContract,
    RunConfig, Suite, SuiteResult, TargetRegistry, TestCase, TrialInputs, Validator, Value,
    ValueSpec,
};

#[derive(Parser, Debug)]
#[command(name = "veritas-demo")]
#[command(about = "Fuzz bundled example targets and validate example records")]
struct Args {
    /// Run trials one after another instead of on a worker pool
    #[arg(long)]
    sequential: bool,

    /// Worker threads for parallel trials (0 = library default sizing)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Trials per fuzz-active case
    #[arg(long, default_value = "100")]
    iterations: usize,

    /// Run only the contract suite
    #[arg(long)]
    contracts_only: bool,

    /// Run only the fuzz suite
    #[arg(long)]
    fuzz_only: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut failed = false;

    if !args.contracts_only {
        println!("=== Fuzz Suite ===\n");
        let result = run_fuzz_suite(&args)?;
        failed |= !result.is_success();
        println!();
    }

    if !args.fuzz_only {
        println!("=== Contract Suite ===\n");
        let result = run_contract_suite()?;
        failed |= !result.is_success();
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn run_fuzz_suite(args: &Args) -> anyhow::Result<SuiteResult> {
    let registry = build_registry();
    let config = RunConfig::default()
        .with_parallel(!args.sequential)
        .with_worker_threads(args.threads);

    let mut suite = Suite::new("bundled targets").with_config(config);

    suite.add(
        TestCase::new("celsius_to_fahrenheit", "Convert 0 Celsius to Fahrenheit")
            .with_input(ValueSpec::new("celsius", ParamType::Float).with_value(0.0)),
    )?;
    suite.add(
        TestCase::new("celsius_to_fahrenheit", "Fuzz temperatures between -100 and 100")
            .with_input(ValueSpec::new("celsius", ParamType::Float).with_range(-100.0, 100.0))
            .with_iterations(args.iterations),
    )?;

    suite.add(
        TestCase::new("divide", "Division by zero is reported")
            .with_input(ValueSpec::new("a", ParamType::Int).with_value(10))
            .with_input(ValueSpec::new("b", ParamType::Int).with_value(0))
            .with_expected_fault(
                ExpectedFault::new(FaultKind::DivisionByZero).with_message("division by zero"),
            ),
    )?;
    suite.add(
        TestCase::new("divide", "Fuzz three-digit dividends with nonzero divisors")
            .with_input(ValueSpec::new("a", ParamType::Int).with_regex(r"^\d{3}$"))
            .with_input(ValueSpec::new("b", ParamType::Int).with_range(1.0, 99.0))
            .with_iterations(args.iterations),
    )?;

    suite.add(
        TestCase::new("calculate_distance", "Distance between Berlin and London")
            .with_input(ValueSpec::new("lat1", ParamType::Float).with_value(52.5200))
            .with_input(ValueSpec::new("lon1", ParamType::Float).with_value(13.4050))
            .with_input(ValueSpec::new("lat2", ParamType::Float).with_value(51.5074))
            .with_input(ValueSpec::new("lon2", ParamType::Float).with_value(-0.1278)),
    )?;
    suite.add(
        TestCase::new("calculate_distance", "Fuzz coordinates across the globe")
            .with_input(ValueSpec::new("lat1", ParamType::Float).with_range(-90.0, 90.0))
            .with_input(ValueSpec::new("lon1", ParamType::Float).with_range(-180.0, 180.0))
            .with_input(ValueSpec::new("lat2", ParamType::Float).with_range(-90.0, 90.0))
            .with_input(ValueSpec::new("lon2", ParamType::Float).with_range(-180.0, 180.0))
            .with_iterations(args.iterations),
    )?;

    suite.add(
        TestCase::new("validate_email", "Malformed email is rejected, not faulted")
            .with_input(ValueSpec::new("email", ParamType::String).with_value("invalid.email@")),
    )?;
    suite.add(
        TestCase::new("validate_ip_address", "Loopback address is accepted")
            .with_input(ValueSpec::new("ip", ParamType::String).with_value("127.0.0.1")),
    )?;

    suite.add(
        TestCase::new("validate_ip_address", "Disabled: exhaustive address sweep")
            .with_input(ValueSpec::new("ip", ParamType::String).with_value("0.0.0.0"))
            .with_enabled(false),
    )?;

    Ok(suite.run_with_reporter(&registry, &ConsoleReporter)?)
}

fn run_contract_suite() -> anyhow::Result<SuiteResult> {
    let user = Validator::new(
        RuleSetContract::new("user")
            .with_rule(RequiredRule::new("email"))
            .with_rule(StringRegexRule::new(
                "email",
                r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            )?)
            .with_rule(RequiredRule::new("age"))
            .with_rule(NumberRangeRule::new("age").with_min(0.0).with_max(120.0))
            .with_rule(RequiredRule::new("name"))
            .with_rule(StringLengthRule::new("name").with_min(3).with_max(20)),
    );
    let event = Validator::new(
        RuleSetContract::new("event")
            .with_rule(DateOrderRule::new("start_date", "end_date")),
    );

    let mut suite = ContractSuite::new("example contracts");
    suite.expect_valid(
        "Well-formed user record",
        user.clone(),
        object(serde_json::json!({
            "name": "John",
            "email": "test@example.com",
            "age": 30
        })),
    );
    suite.expect_errors(
        "User with malformed email",
        user,
        object(serde_json::json!({
            "name": "John",
            "email": "invalid-email",
            "age": 30
        })),
        [
            "Field 'email' must match the regular expression: \
             [a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\\.[a-zA-Z]{2,}",
        ],
    );
    suite.expect_valid(
        "Event that ends after it starts",
        event.clone(),
        object(serde_json::json!({
            "start_date": "2023-01-15",
            "end_date": "2024-02-16"
        })),
    );
    suite.expect_errors(
        "Event that ends before it starts",
        event,
        object(serde_json::json!({
            "start_date": "2024-02-16",
            "end_date": "2023-01-15"
        })),
        ["Field 'end_date' must be after 'start_date'"],
    );

    Ok(suite.run_with_reporter(&ConsoleReporter))
}

fn object(value: serde_json::Value) -> veritas::rules::Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => veritas::rules::Record::new(),
    }
}

fn build_registry() -> TargetRegistry {
    let mut registry = TargetRegistry::new();

    registry.register("celsius_to_fahrenheit", |inputs: &TrialInputs| {
        let celsius = float_arg(inputs, "celsius")?;
        Ok(Value::Float(celsius * 9.0 / 5.0 + 32.0))
    });

    registry.register("divide", |inputs: &TrialInputs| {
        let a = int_arg(inputs, "a")?;
        let b = int_arg(inputs, "b")?;
        if b == 0 {
            return Err(Fault::new(FaultKind::DivisionByZero, "division by zero"));
        }
        Ok(Value::Int(a / b))
    });

    registry.register("calculate_distance", |inputs: &TrialInputs| {
        let lat1 = float_arg(inputs, "lat1")?.to_radians();
        let lon1 = float_arg(inputs, "lon1")?.to_radians();
        let lat2 = float_arg(inputs, "lat2")?.to_radians();
        let lon2 = float_arg(inputs, "lon2")?.to_radians();

        // Haversine, Earth radius in kilometers.
        let dlat = lat2 - lat1;
        let dlon = lon2 - lon1;
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Ok(Value::Float(6371.0 * c))
    });

    registry.register("validate_email", |inputs: &TrialInputs| {
        let email = string_arg(inputs, "email")?;
        Ok(Value::Bool(email_regex().is_match(email)))
    });

    registry.register("validate_ip_address", |inputs: &TrialInputs| {
        let ip = string_arg(inputs, "ip")?;
        Ok(Value::Bool(ip_regex().is_match(ip)))
    });

    registry
}

fn float_arg(inputs: &TrialInputs, name: &str) -> Result<f64, Fault> {
    inputs
        .get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| Fault::invalid_input(format!("missing float argument '{}'", name)))
}

fn int_arg(inputs: &TrialInputs, name: &str) -> Result<i64, Fault> {
    inputs
        .get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| Fault::invalid_input(format!("missing integer argument '{}'", name)))
}

fn string_arg<'a>(inputs: &'a TrialInputs, name: &str) -> Result<&'a str, Fault> {
    inputs
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| Fault::invalid_input(format!("missing string argument '{}'", name)))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("email pattern")
    })
}

fn ip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
            .expect("ip pattern")
    })
}
