//! Per-trial value synthesis from a `ValueSpec`.
//!
//! Strategy precedence, highest first: literal value, regex-derived numeric,
//! inclusive range, bare type default. Lower strategies are never evaluated
//! once a higher one applies; setting one anyway earns a diagnostic warning
//! rather than a fault.
//!
//! Regex synthesis is deliberately narrow: only digit-count quantifiers
//! (`\d{n}`, and `\.\d{n}` for fractional precision) are recognized. Patterns
//! for non-numeric types cannot drive generation at all.

use crate::error::ConfigError;
use crate::spec::{ParamType, ValueRange, ValueSpec};
use crate::value::Value;
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Widest digit count whose `[10^(n-1), 10^n - 1]` interval still fits `i64`.
const MAX_DIGIT_COUNT: u32 = 18;

/// Fractional digits kept beyond `f64` precision add nothing.
const MAX_DECIMAL_PLACES: u32 = 9;

/// Symmetric integer-part bound for float synthesis with no digit quantifier.
const DEFAULT_FLOAT_INT_BOUND: i64 = 100_000;

/// Fractional precision for float synthesis with no `\.\d{n}` quantifier.
const DEFAULT_DECIMAL_PLACES: u32 = 2;

fn digit_quantifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\d\{(\d+)\}").expect("digit quantifier meta-pattern"))
}

fn fraction_quantifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\\d\{(\d+)\}").expect("fraction quantifier meta-pattern"))
}

/// Produce one concrete value for `spec` using the thread-local RNG.
///
/// Generation is intentionally not seed-reproducible; callers that need
/// deterministic draws use [`generate_with_rng`] with a seeded RNG.
pub fn generate(spec: &ValueSpec) -> Result<Value, ConfigError> {
    generate_with_rng(spec, &mut rand::thread_rng())
}

/// Produce one concrete value for `spec` from the given RNG.
pub fn generate_with_rng<R: Rng>(spec: &ValueSpec, rng: &mut R) -> Result<Value, ConfigError> {
    if let Some(value) = &spec.value {
        match (spec.regex.is_some(), spec.range.is_some()) {
            (true, true) => warn!(
                "'{}' has a literal value; ignoring lower-precedence regular_expression and range",
                spec.name
            ),
            (true, false) => warn!(
                "'{}' has a literal value; ignoring lower-precedence regular_expression",
                spec.name
            ),
            (false, true) => warn!(
                "'{}' has a literal value; ignoring lower-precedence range",
                spec.name
            ),
            (false, false) => {}
        }
        return Ok(value.clone());
    }

    if let Some(pattern) = &spec.regex {
        if spec.range.is_some() {
            warn!(
                "'{}' has a regular_expression; ignoring lower-precedence range",
                spec.name
            );
        }
        return match spec.ty {
            ParamType::Int => Ok(Value::Int(int_from_regex(&spec.name, pattern, rng))),
            ParamType::Float => Ok(Value::Float(float_from_regex(&spec.name, pattern, rng))),
            ty => Err(ConfigError::RegexNotGenerable {
                name: spec.name.clone(),
                ty,
            }),
        };
    }

    if let Some(range) = &spec.range {
        return draw_from_range(spec, range, rng);
    }

    match spec.ty {
        ParamType::Int => Ok(Value::Int(rng.gen())),
        // Full-width magnitude: uniform over the positive normal range.
        ParamType::Float => Ok(Value::Float(rng.gen_range(f64::MIN_POSITIVE..=f64::MAX))),
        ty => Err(ConfigError::UnsupportedType {
            name: spec.name.clone(),
            ty,
        }),
    }
}

/// Integer from a pattern: bounded to exactly `n` digits when the pattern
/// carries a `\d{n}` quantifier, full-width otherwise.
fn int_from_regex<R: Rng>(name: &str, pattern: &str, rng: &mut R) -> i64 {
    match leading_digit_count(pattern).and_then(|n| clamp_digit_count(name, n)) {
        Some(n) => {
            let (lower, upper) = digit_bounds(n);
            rng.gen_range(lower..=upper)
        }
        None => rng.gen(),
    }
}

/// Float from a pattern: integer part bounded by the first digit quantifier
/// not sitting behind a decimal point (wide symmetric default otherwise),
/// composed with a fractional part of the requested precision.
fn float_from_regex<R: Rng>(name: &str, pattern: &str, rng: &mut R) -> f64 {
    let integer_part = match integer_part_digit_count(pattern)
        .and_then(|n| clamp_digit_count(name, n))
    {
        Some(n) => {
            let (lower, upper) = digit_bounds(n);
            rng.gen_range(lower..=upper)
        }
        None => rng.gen_range(-DEFAULT_FLOAT_INT_BOUND..=DEFAULT_FLOAT_INT_BOUND),
    };

    let places = fraction_digit_count(pattern)
        .unwrap_or(DEFAULT_DECIMAL_PLACES)
        .min(MAX_DECIMAL_PLACES);
    let scale = 10u64.pow(places);
    let fraction = rng.gen_range(0..scale) as f64 / scale as f64;

    let magnitude = integer_part.unsigned_abs() as f64 + fraction;
    if integer_part < 0 {
        -magnitude
    } else {
        magnitude
    }
}

fn draw_from_range<R: Rng>(
    spec: &ValueSpec,
    range: &ValueRange,
    rng: &mut R,
) -> Result<Value, ConfigError> {
    // Registration catches inversion first; directly-built specs hit it here.
    if range.is_inverted() {
        return Err(ConfigError::InvalidRange {
            name: spec.name.clone(),
            min: range.min,
            max: range.max,
        });
    }
    match spec.ty {
        ParamType::Int => {
            let lower = range.min.ceil() as i64;
            let upper = range.max.floor() as i64;
            if lower > upper {
                // Real interval like [5.2, 5.8] holds no integer.
                return Err(ConfigError::InvalidRange {
                    name: spec.name.clone(),
                    min: range.min,
                    max: range.max,
                });
            }
            Ok(Value::Int(rng.gen_range(lower..=upper)))
        }
        ParamType::Float => Ok(Value::Float(rng.gen_range(range.min..=range.max))),
        ty => Err(ConfigError::UnsupportedType {
            name: spec.name.clone(),
            ty,
        }),
    }
}

/// First `\d{n}` quantifier anywhere in the pattern text.
fn leading_digit_count(pattern: &str) -> Option<u32> {
    digit_quantifier_re()
        .captures_iter(pattern)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .next()
}

/// First `\d{n}` quantifier not immediately preceded by a decimal point, so a
/// fraction-only pattern like `^-?\d+\.\d{6}$` leaves the integer part at its
/// wide default.
fn integer_part_digit_count(pattern: &str) -> Option<u32> {
    let bytes = pattern.as_bytes();
    digit_quantifier_re()
        .captures_iter(pattern)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if whole.start() > 0 && bytes[whole.start() - 1] == b'.' {
                return None;
            }
            caps.get(1)?.as_str().parse().ok()
        })
        .next()
}

/// First `\.\d{n}` quantifier: requested fractional precision.
fn fraction_digit_count(pattern: &str) -> Option<u32> {
    fraction_quantifier_re()
        .captures_iter(pattern)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .next()
}

/// Zero-width quantifiers are meaningless and ignored; oversized ones clamp
/// so the bounds stay representable.
fn clamp_digit_count(name: &str, n: u32) -> Option<u32> {
    if n == 0 {
        debug!("'{}': zero-width digit quantifier ignored", name);
        None
    } else if n > MAX_DIGIT_COUNT {
        debug!(
            "'{}': digit quantifier {} clamped to {}",
            name, n, MAX_DIGIT_COUNT
        );
        Some(MAX_DIGIT_COUNT)
    } else {
        Some(n)
    }
}

/// Inclusive bounds of the n-digit magnitudes, `[10^(n-1), 10^n - 1]`.
fn digit_bounds(n: u32) -> (i64, i64) {
    let lower = 10_i64.pow(n - 1);
    let upper = 10_i64.pow(n) - 1;
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_literal_is_idempotent() {
        let spec = ValueSpec::new("a", ParamType::Int).with_value(10);
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(generate_with_rng(&spec, &mut rng).unwrap(), Value::Int(10));
        }
    }

    #[test]
    fn test_literal_wins_over_regex_and_range() {
        let spec = ValueSpec::new("a", ParamType::Int)
            .with_value(7)
            .with_regex("^\\d{5}$")
            .with_range(100.0, 200.0);
        let mut rng = rng();
        for _ in 0..20 {
            assert_eq!(generate_with_rng(&spec, &mut rng).unwrap(), Value::Int(7));
        }
    }

    #[test]
    fn test_literal_of_every_type_is_verbatim() {
        let mut rng = rng();
        let spec = ValueSpec::new("s", ParamType::String).with_value("Hello");
        assert_eq!(
            generate_with_rng(&spec, &mut rng).unwrap(),
            Value::Str("Hello".into())
        );
        let spec = ValueSpec::new("b", ParamType::Bool).with_value(true);
        assert_eq!(
            generate_with_rng(&spec, &mut rng).unwrap(),
            Value::Bool(true)
        );
        let spec = ValueSpec::new("f", ParamType::Float).with_value(52.52);
        assert_eq!(
            generate_with_rng(&spec, &mut rng).unwrap(),
            Value::Float(52.52)
        );
    }

    #[test]
    fn test_int_range_containment() {
        let spec = ValueSpec::new("n", ParamType::Int).with_range(-30.0, 300.0);
        let mut rng = rng();
        for _ in 0..500 {
            let v = generate_with_rng(&spec, &mut rng).unwrap();
            let n = v.as_i64().expect("int draw");
            assert!((-30..=300).contains(&n), "out of range: {}", n);
        }
    }

    #[test]
    fn test_float_range_containment() {
        let spec = ValueSpec::new("x", ParamType::Float).with_range(-100.0, 100.0);
        let mut rng = rng();
        for _ in 0..500 {
            let v = generate_with_rng(&spec, &mut rng).unwrap();
            let x = v.as_f64().expect("float draw");
            assert!((-100.0..=100.0).contains(&x), "out of range: {}", x);
        }
    }

    #[test]
    fn test_digit_quantifier_bounds_integers() {
        for n in [1u32, 3, 5, 9, 18] {
            let spec =
                ValueSpec::new("n", ParamType::Int).with_regex(format!("^\\d{{{}}}$", n));
            let (lower, upper) = digit_bounds(n);
            let mut rng = rng();
            for _ in 0..200 {
                let v = generate_with_rng(&spec, &mut rng).unwrap();
                let value = v.as_i64().expect("int draw");
                assert!(
                    (lower..=upper).contains(&value),
                    "{} outside {} digit bounds",
                    value,
                    n
                );
            }
        }
    }

    #[test]
    fn test_oversized_quantifier_clamps() {
        let spec = ValueSpec::new("n", ParamType::Int).with_regex("^\\d{25}$");
        let (lower, upper) = digit_bounds(MAX_DIGIT_COUNT);
        let mut rng = rng();
        for _ in 0..100 {
            let value = generate_with_rng(&spec, &mut rng)
                .unwrap()
                .as_i64()
                .expect("int draw");
            assert!((lower..=upper).contains(&value));
        }
    }

    #[test]
    fn test_unquantified_int_pattern_is_full_width() {
        let spec = ValueSpec::new("n", ParamType::Int).with_regex("^-?\\d+$");
        let mut rng = rng();
        let draws: Vec<i64> = (0..10)
            .map(|_| {
                generate_with_rng(&spec, &mut rng)
                    .unwrap()
                    .as_i64()
                    .expect("int draw")
            })
            .collect();
        let distinct = draws
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        assert!(distinct > 1, "full-width draws should vary: {:?}", draws);
    }

    #[test]
    fn test_float_pattern_with_both_quantifiers() {
        // Five integer digits, five fractional digits.
        let spec = ValueSpec::new("x", ParamType::Float).with_regex("^-?\\d{5}\\.\\d{5}$");
        let mut rng = rng();
        for _ in 0..200 {
            let x = generate_with_rng(&spec, &mut rng)
                .unwrap()
                .as_f64()
                .expect("float draw");
            assert!(
                (10_000.0..100_000.0).contains(&x.abs()),
                "integer part not 5 digits: {}",
                x
            );
        }
    }

    #[test]
    fn test_fraction_only_pattern_keeps_wide_integer_part() {
        let spec = ValueSpec::new("x", ParamType::Float).with_regex("^-?\\d+\\.\\d{6}$");
        let mut rng = rng();
        for _ in 0..200 {
            let x = generate_with_rng(&spec, &mut rng)
                .unwrap()
                .as_f64()
                .expect("float draw");
            assert!(
                x.abs() < DEFAULT_FLOAT_INT_BOUND as f64 + 1.0,
                "integer part should use the wide default: {}",
                x
            );
        }
    }

    #[test]
    fn test_default_fractional_precision_is_two_digits() {
        let spec = ValueSpec::new("x", ParamType::Float).with_regex("^-?\\d{3}$");
        let mut rng = rng();
        for _ in 0..200 {
            let x = generate_with_rng(&spec, &mut rng)
                .unwrap()
                .as_f64()
                .expect("float draw");
            let scaled = x * 100.0;
            assert!(
                (scaled - scaled.round()).abs() < 1e-6,
                "more than 2 fractional digits: {}",
                x
            );
        }
    }

    #[test]
    fn test_bare_int_draws_full_width() {
        let spec = ValueSpec::new("n", ParamType::Int);
        let mut rng = rng();
        let draws: Vec<i64> = (0..10)
            .map(|_| {
                generate_with_rng(&spec, &mut rng)
                    .unwrap()
                    .as_i64()
                    .expect("int draw")
            })
            .collect();
        let distinct = draws
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        assert!(distinct > 1);
    }

    #[test]
    fn test_bare_float_draws_positive_magnitude() {
        let spec = ValueSpec::new("x", ParamType::Float);
        let mut rng = rng();
        for _ in 0..50 {
            let x = generate_with_rng(&spec, &mut rng)
                .unwrap()
                .as_f64()
                .expect("float draw");
            assert!(x > 0.0 && x.is_finite());
        }
    }

    #[test]
    fn test_string_regex_is_not_generable() {
        let spec = ValueSpec::new("label", ParamType::String).with_regex("^[a-z]+$");
        let err = generate_with_rng(&spec, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::RegexNotGenerable {
                name: "label".to_string(),
                ty: ParamType::String,
            }
        );
    }

    #[test]
    fn test_string_range_is_unsupported() {
        let spec = ValueSpec::new("label", ParamType::String).with_range(0.0, 10.0);
        let err = generate_with_rng(&spec, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedType {
                name: "label".to_string(),
                ty: ParamType::String,
            }
        );
    }

    #[test]
    fn test_bare_bool_is_unsupported() {
        let spec = ValueSpec::new("flag", ParamType::Bool);
        let err = generate_with_rng(&spec, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedType {
                name: "flag".to_string(),
                ty: ParamType::Bool,
            }
        );
    }

    #[test]
    fn test_inverted_range_faults_at_generation_too() {
        let spec = ValueSpec::new("n", ParamType::Int).with_range(10.0, -10.0);
        assert!(matches!(
            generate_with_rng(&spec, &mut rng()),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_integer_free_real_interval_faults() {
        let spec = ValueSpec::new("n", ParamType::Int).with_range(5.2, 5.8);
        assert!(matches!(
            generate_with_rng(&spec, &mut rng()),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_quantifier_scan() {
        assert_eq!(leading_digit_count("^\\d{3}$"), Some(3));
        assert_eq!(leading_digit_count("^-?\\d+$"), None);
        assert_eq!(integer_part_digit_count("^-?\\d{5}\\.\\d{5}$"), Some(5));
        assert_eq!(integer_part_digit_count("^-?\\d+\\.\\d{6}$"), None);
        assert_eq!(fraction_digit_count("^-?\\d+\\.\\d{6}$"), Some(6));
        assert_eq!(fraction_digit_count("^-?\\d{4}$"), None);
    }

    #[test]
    fn test_digit_bounds_fit_i64() {
        assert_eq!(digit_bounds(1), (1, 9));
        assert_eq!(digit_bounds(3), (100, 999));
        let (lower, upper) = digit_bounds(18);
        assert_eq!(lower, 100_000_000_000_000_000);
        assert_eq!(upper, 999_999_999_999_999_999);
    }
}
