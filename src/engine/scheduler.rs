//! The per-instance animation clock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Identifies one engine instance in logs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One admitted clock tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Frame {
    /// 1-based count of ticks since the instance was created.
    pub number: u64,
    pub elapsed: Duration,
}

/// Restartable frame driver owned by a single engine instance.
///
/// The host calls [`tick`](Self::tick) once per frame; while the scheduler
/// is stopped every tick is refused, so an idle group costs nothing between
/// kicks.
///
/// # Example
///
/// ```rust
/// use keyflow::engine::AnimationScheduler;
/// use std::time::Duration;
///
/// let mut clock = AnimationScheduler::new();
/// assert!(clock.tick(Duration::from_millis(16)).is_none());
///
/// clock.kick();
/// let frame = clock.tick(Duration::from_millis(16)).unwrap();
/// assert_eq!(frame.number, 1);
///
/// clock.stop();
/// assert!(!clock.is_running());
/// ```
#[derive(Debug)]
pub struct AnimationScheduler {
    instance: InstanceId,
    running: bool,
    frames: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_instance(InstanceId::new())
    }

    pub fn with_instance(instance: InstanceId) -> Self {
        Self {
            instance,
            running: false,
            frames: 0,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Start the clock if idle. Returns true if this call started it.
    pub fn kick(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        tracing::debug!(instance = %self.instance, "Animation clock started");
        true
    }

    /// Stop the clock. Returns true if it was running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        tracing::debug!(
            instance = %self.instance,
            frames = self.frames,
            "Animation clock stopped"
        );
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Total ticks admitted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Admit one tick, or refuse it while stopped.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Frame> {
        if !self.running {
            return None;
        }
        self.frames += 1;
        tracing::trace!(
            instance = %self.instance,
            frame = self.frames,
            elapsed_ms = elapsed.as_millis() as u64,
            "Tick"
        );
        Some(Frame {
            number: self.frames,
            elapsed,
        })
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
