//! Target-state descriptions.
//!
//! A [`TargetState`] says where a node's attributes should go and how long
//! it should take. A [`TransitionSpec`] is an ordered chain of them, played
//! back to back.

use crate::core::{linear, AttrKey, Ease, Value};
use std::fmt;
use std::time::Duration;

/// How a single attribute moves during one leg.
#[derive(Clone, PartialEq, Debug)]
pub enum Tween {
    /// Set immediately when the leg begins; no interpolation.
    Set(Value),
    /// Interpolate from the current value to this one.
    To(Value),
    /// Jump to the first value, then interpolate to the second.
    FromTo(Value, Value),
}

/// Per-leg timing. Unset fields fall back to the group defaults.
#[derive(Clone, Default)]
pub struct Timing {
    pub duration: Option<Duration>,
    pub delay: Option<Duration>,
    pub ease: Option<Ease>,
}

impl Timing {
    /// Fill unset fields from `defaults`.
    pub fn resolve(&self, defaults: &ResolvedTiming) -> ResolvedTiming {
        ResolvedTiming {
            duration: self.duration.unwrap_or(defaults.duration),
            delay: self.delay.unwrap_or(defaults.delay),
            ease: self.ease.clone().unwrap_or_else(|| defaults.ease.clone()),
        }
    }
}

impl fmt::Debug for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timing")
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("ease", &self.ease.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Timing with every field decided.
#[derive(Clone)]
pub struct ResolvedTiming {
    pub duration: Duration,
    pub delay: Duration,
    pub ease: Ease,
}

impl ResolvedTiming {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(250);

    pub fn new(duration: Duration, delay: Duration) -> Self {
        Self {
            duration,
            delay,
            ease: linear(),
        }
    }
}

impl Default for ResolvedTiming {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION, Duration::ZERO)
    }
}

impl fmt::Debug for ResolvedTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTiming")
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// One leg of a transition: attribute tweens plus timing.
///
/// # Example
///
/// ```rust
/// use keyflow::transition::{TargetState, Tween};
/// use keyflow::core::Value;
/// use std::time::Duration;
///
/// let target = TargetState::new()
///     .from_to("opacity", 0.0, 1.0)
///     .to("x", 120.0)
///     .set("fill", "steelblue")
///     .duration(Duration::from_millis(400));
///
/// assert_eq!(target.tweens().len(), 3);
/// assert_eq!(target.timing().duration, Some(Duration::from_millis(400)));
/// assert!(matches!(target.tweens()[1].1, Tween::To(Value::Number(_))));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TargetState {
    tweens: Vec<(AttrKey, Tween)>,
    timing: Timing,
}

impl TargetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpolate `name` from its current value to `value`.
    pub fn to(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tween(AttrKey::new(name), Tween::To(value.into()))
    }

    /// Jump `name` to `from`, then interpolate to `to`.
    pub fn from_to(
        self,
        name: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.tween(AttrKey::new(name), Tween::FromTo(from.into(), to.into()))
    }

    /// Set `name` without interpolation when the leg begins.
    pub fn set(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tween(AttrKey::new(name), Tween::Set(value.into()))
    }

    pub fn to_in(
        self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.tween(AttrKey::namespaced(namespace, name), Tween::To(value.into()))
    }

    pub fn from_to_in(
        self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.tween(
            AttrKey::namespaced(namespace, name),
            Tween::FromTo(from.into(), to.into()),
        )
    }

    pub fn set_in(
        self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.tween(AttrKey::namespaced(namespace, name), Tween::Set(value.into()))
    }

    /// Add a tween; a later tween for the same attribute replaces the earlier one.
    pub fn tween(mut self, key: AttrKey, tween: Tween) -> Self {
        self.tweens.retain(|(k, _)| *k != key);
        self.tweens.push((key, tween));
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.timing.duration = Some(duration);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.timing.delay = Some(delay);
        self
    }

    pub fn ease<F>(mut self, ease: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.timing.ease = Some(std::sync::Arc::new(ease));
        self
    }

    pub fn tweens(&self) -> &[(AttrKey, Tween)] {
        &self.tweens
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }
}

/// An ordered chain of target states.
///
/// An empty spec completes on the next tick without touching the state.
#[derive(Clone, Debug, Default)]
pub struct TransitionSpec {
    legs: Vec<TargetState>,
}

impl TransitionSpec {
    /// A spec with no legs.
    pub fn none() -> Self {
        Self::default()
    }

    /// Play `legs` back to back.
    pub fn chain(legs: impl IntoIterator<Item = TargetState>) -> Self {
        Self {
            legs: legs.into_iter().collect(),
        }
    }

    /// Append a leg.
    pub fn then(mut self, leg: TargetState) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn legs(&self) -> &[TargetState] {
        &self.legs
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub(crate) fn into_legs(self) -> Vec<TargetState> {
        self.legs
    }
}

impl From<TargetState> for TransitionSpec {
    fn from(leg: TargetState) -> Self {
        Self { legs: vec![leg] }
    }
}

impl From<Vec<TargetState>> for TransitionSpec {
    fn from(legs: Vec<TargetState>) -> Self {
        Self { legs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_tween_replaces_earlier_for_same_attribute() {
        let target = TargetState::new().to("x", 1.0).set("x", 5.0);
        assert_eq!(target.tweens().len(), 1);
        assert_eq!(target.tweens()[0].1, Tween::Set(Value::from(5.0)));
    }

    #[test]
    fn namespaced_tweens_do_not_collide_with_plain_ones() {
        let target = TargetState::new().to("r", 1).to_in("circle", "r", 2);
        assert_eq!(target.tweens().len(), 2);
    }

    #[test]
    fn timing_resolves_against_defaults() {
        let defaults = ResolvedTiming::new(Duration::from_millis(300), Duration::from_millis(10));
        let partial = Timing {
            duration: Some(Duration::from_millis(100)),
            ..Timing::default()
        };
        let resolved = partial.resolve(&defaults);
        assert_eq!(resolved.duration, Duration::from_millis(100));
        assert_eq!(resolved.delay, Duration::from_millis(10));
        assert_eq!((resolved.ease)(0.5), 0.5);
    }

    #[test]
    fn custom_ease_is_kept() {
        let target = TargetState::new().ease(|t| t * t);
        let resolved = target.timing().resolve(&ResolvedTiming::default());
        assert_eq!((resolved.ease)(0.5), 0.25);
    }

    #[test]
    fn spec_conversions() {
        assert!(TransitionSpec::none().is_empty());
        let single: TransitionSpec = TargetState::new().to("x", 1).into();
        assert_eq!(single.legs().len(), 1);
        let chained = TransitionSpec::chain([TargetState::new(), TargetState::new()])
            .then(TargetState::new());
        assert_eq!(chained.legs().len(), 3);
    }
}
