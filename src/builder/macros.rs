//! Macros for ergonomic target-state construction.

/// Build a [`TargetState`](crate::transition::TargetState) from attribute
/// entries.
///
/// - `"attr" => [to]` interpolates from the current value
/// - `"attr" => [from, to]` jumps to `from`, then interpolates
/// - `"attr" => value` sets the value without interpolation
///
/// # Example
///
/// ```
/// use keyflow::target_state;
/// use keyflow::transition::Tween;
/// use keyflow::core::Value;
///
/// let target = target_state! {
///     "x" => [40.0],
///     "opacity" => [0.0, 1.0],
///     "fill" => "tomato",
/// };
///
/// let tweens = target.tweens();
/// assert_eq!(tweens.len(), 3);
/// assert_eq!(tweens[0].1, Tween::To(Value::from(40.0)));
/// assert_eq!(tweens[1].1, Tween::FromTo(Value::from(0.0), Value::from(1.0)));
/// assert_eq!(tweens[2].1, Tween::Set(Value::from("tomato")));
/// ```
#[macro_export]
macro_rules! target_state {
    (@entry $acc:expr;) => { $acc };
    (@entry $acc:expr; $name:literal => [$to:expr] $(, $($rest:tt)*)?) => {
        $crate::target_state!(@entry $acc.to($name, $to); $($($rest)*)?)
    };
    (@entry $acc:expr; $name:literal => [$from:expr, $to:expr] $(, $($rest:tt)*)?) => {
        $crate::target_state!(@entry $acc.from_to($name, $from, $to); $($($rest)*)?)
    };
    (@entry $acc:expr; $name:literal => $value:expr $(, $($rest:tt)*)?) => {
        $crate::target_state!(@entry $acc.set($name, $value); $($($rest)*)?)
    };

    () => {
        $crate::transition::TargetState::new()
    };
    ($($entries:tt)+) => {
        $crate::target_state!(@entry $crate::transition::TargetState::new(); $($entries)+)
    };
}
