//! Pluggable interpolation and easing.
//!
//! The engine never does attribute math itself. For every animated
//! attribute it asks an [`InterpolationFactory`] for an [`Interpolator`]
//! once, when a leg begins, and then samples it every tick.

use super::value::Value;
use std::sync::Arc;

/// Maps progress `t` in `[0, 1]` to an attribute value.
pub type Interpolator = Box<dyn Fn(f64) -> Value + Send + Sync>;

/// Builds an interpolator from `(begin, end, attribute, namespace)`.
pub type InterpolationFactory =
    Arc<dyn Fn(&Value, &Value, &str, Option<&str>) -> Interpolator + Send + Sync>;

/// Maps linear progress to eased progress. Must map 0 to 0 and 1 to 1.
pub type Ease = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Default interpolation.
///
/// Numbers are interpolated linearly. Any other pairing holds `begin` until
/// `t` reaches 1 and then jumps to `end`.
///
/// # Example
///
/// ```rust
/// use keyflow::core::{numeric, Value};
///
/// let interp = numeric(&Value::from(0.0), &Value::from(10.0), "x", None);
/// assert_eq!(interp(0.25), Value::from(2.5));
///
/// let step = numeric(&Value::from("a"), &Value::from("b"), "label", None);
/// assert_eq!(step(0.99), Value::from("a"));
/// assert_eq!(step(1.0), Value::from("b"));
/// ```
pub fn numeric(begin: &Value, end: &Value, _attr: &str, _namespace: Option<&str>) -> Interpolator {
    match (begin.as_number(), end.as_number()) {
        (Some(a), Some(b)) => {
            let delta = b - a;
            Box::new(move |t: f64| Value::Number(a + delta * t))
        }
        _ => {
            let begin = begin.clone();
            let end = end.clone();
            Box::new(move |t: f64| if t >= 1.0 { end.clone() } else { begin.clone() })
        }
    }
}

/// The default interpolation as a shareable factory.
pub fn numeric_factory() -> InterpolationFactory {
    Arc::new(numeric)
}

/// Identity easing.
pub fn linear() -> Ease {
    Arc::new(|t: f64| t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_hits_both_ends() {
        let interp = numeric(&Value::from(-4.0), &Value::from(4.0), "x", None);
        assert_eq!(interp(0.0), Value::from(-4.0));
        assert_eq!(interp(0.5), Value::from(0.0));
        assert_eq!(interp(1.0), Value::from(4.0));
    }

    #[test]
    fn mixed_values_step_at_end() {
        let interp = numeric(&Value::from(1.0), &Value::from("auto"), "width", None);
        assert_eq!(interp(0.5), Value::from(1.0));
        assert_eq!(interp(1.0), Value::from("auto"));
    }

    #[test]
    fn factory_receives_attribute_and_namespace() {
        fn tagged(_begin: &Value, end: &Value, attr: &str, ns: Option<&str>) -> Interpolator {
            let tag = format!("{}:{attr}", ns.unwrap_or("-"));
            let end = end.clone();
            Box::new(move |t: f64| if t < 1.0 { Value::from(tag.clone()) } else { end.clone() })
        }

        let factory: InterpolationFactory = Arc::new(tagged);
        let interp = factory(&Value::from(0), &Value::from(1), "r", Some("circle"));
        assert_eq!(interp(0.5), Value::from("circle:r"));
    }

    #[test]
    fn linear_is_identity() {
        let ease = linear();
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(0.3), 0.3);
        assert_eq!(ease(1.0), 1.0);
    }
}
