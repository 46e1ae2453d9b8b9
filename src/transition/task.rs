//! The running interpolation task of a single node.

use super::target::{ResolvedTiming, TargetState, Tween};
use crate::core::{AttrKey, InterpolationFactory, Interpolator, Snapshot};
use std::collections::VecDeque;
use std::time::Duration;

/// What the group supplies to every node when it advances.
pub struct TickContext<'a> {
    pub interpolation: &'a InterpolationFactory,
    pub defaults: &'a ResolvedTiming,
}

/// Outcome of advancing a task by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Progress {
    /// The first leg began during this advance.
    pub started: bool,
    /// The chain is exhausted.
    pub finished: bool,
}

/// One leg of the chain. `tweens` is filled once the delay has elapsed and
/// begin values have been captured.
struct Leg {
    target: TargetState,
    timing: ResolvedTiming,
    elapsed: Duration,
    tweens: Option<Vec<(AttrKey, Interpolator)>>,
}

impl Leg {
    fn new(target: TargetState, defaults: &ResolvedTiming) -> Self {
        let timing = target.timing().resolve(defaults);
        Self {
            target,
            timing,
            elapsed: Duration::ZERO,
            tweens: None,
        }
    }

    /// Apply set values and capture begin values from `state`.
    fn begin(&mut self, state: &mut Snapshot, interpolation: &InterpolationFactory) {
        let mut tweens = Vec::with_capacity(self.target.tweens().len());
        for (key, tween) in self.target.tweens() {
            match tween {
                Tween::Set(value) => {
                    state.insert(key.clone(), value.clone());
                }
                Tween::To(end) => match state.get_key(key) {
                    Some(begin) => {
                        let interp =
                            interpolation(begin, end, &key.name, key.namespace.as_deref());
                        tweens.push((key.clone(), interp));
                    }
                    None => {
                        state.insert(key.clone(), end.clone());
                    }
                },
                Tween::FromTo(begin, end) => {
                    state.insert(key.clone(), begin.clone());
                    let interp = interpolation(begin, end, &key.name, key.namespace.as_deref());
                    tweens.push((key.clone(), interp));
                }
            }
        }
        self.tweens = Some(tweens);
    }

    fn sample(&self, t: f64, state: &mut Snapshot) {
        let Some(tweens) = &self.tweens else {
            return;
        };
        for (key, interp) in tweens {
            state.insert(key.clone(), interp(t));
        }
    }
}

/// A chain of legs being played against a node's snapshot.
pub(crate) struct ActiveTransition {
    queue: VecDeque<TargetState>,
    current: Option<Leg>,
    started: bool,
    finished: bool,
}

impl ActiveTransition {
    pub fn new(legs: Vec<TargetState>) -> Self {
        Self {
            queue: legs.into(),
            current: None,
            started: false,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `elapsed`, writing interpolated values into `state`.
    ///
    /// Time left over after a leg completes is spent on the next leg.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        state: &mut Snapshot,
        ctx: &TickContext<'_>,
    ) -> Progress {
        let mut progress = Progress::default();
        if self.finished {
            progress.finished = true;
            return progress;
        }

        let mut budget = elapsed;
        loop {
            let mut leg = match self.current.take() {
                Some(leg) => leg,
                None => match self.queue.pop_front() {
                    Some(target) => Leg::new(target, ctx.defaults),
                    None => {
                        self.finished = true;
                        progress.finished = true;
                        return progress;
                    }
                },
            };

            leg.elapsed += budget;
            budget = Duration::ZERO;

            if leg.tweens.is_none() {
                if leg.elapsed < leg.timing.delay {
                    self.current = Some(leg);
                    return progress;
                }
                leg.begin(state, ctx.interpolation);
                if !self.started {
                    self.started = true;
                    progress.started = true;
                }
            }

            let active = leg.elapsed - leg.timing.delay;
            if active < leg.timing.duration {
                let t = active.as_nanos() as f64 / leg.timing.duration.as_nanos() as f64;
                leg.sample((leg.timing.ease)(t), state);
                self.current = Some(leg);
                return progress;
            }

            leg.sample(1.0, state);
            budget = active - leg.timing.duration;
        }
    }
}
