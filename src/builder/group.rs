//! Builder for constructing node groups.

use super::error::BuildError;
use super::settings::GroupSettings;
use crate::core::{linear, numeric_factory, Ease, InterpolationFactory, Interpolator, Key, Snapshot, Value};
use crate::engine::{GroupConfig, NodeGroup};
use crate::reconcile::{KeyFn, Lifecycle, MergeOrder, SpecFn, StartFn};
use crate::render::{RenderSurface, Template};
use crate::transition::{ResolvedTiming, TransitionSpec};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`NodeGroup`] with a fluent API.
///
/// `key`, `start` and `template` are required. `enter`, `update` and
/// `leave` default to no animation; interpolation defaults to
/// [`numeric`](crate::core::numeric).
///
/// # Example
///
/// ```rust
/// use keyflow::builder::NodeGroupBuilder;
/// use keyflow::core::{Key, Snapshot, Value};
/// use keyflow::render::{Element, RecordingSurface};
/// use keyflow::transition::TargetState;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let surface = RecordingSurface::new();
/// let container = surface.root();
///
/// let mut group = NodeGroupBuilder::new()
///     .key(|d: &u32, _| Key::new(format!("k{d}")))
///     .start(|_: &u32, _| Snapshot::new().with("width", 0.0))
///     .enter(|d: &u32, _| TargetState::new().to("width", f64::from(*d)))
///     .template(Element::new("rect").dynamic(
///         "width",
///         |s: &Snapshot, _: &u32, _: &Key, _| s.get("width").cloned().unwrap_or(Value::from(0)),
///     ))
///     .duration(Duration::from_millis(100))
///     .build(surface, container)
///     .unwrap();
///
/// group.set_data(Arc::from(vec![10, 20])).unwrap();
/// let report = group.tick(Duration::from_millis(16));
/// assert_eq!(report.mounted.len(), 2);
/// ```
pub struct NodeGroupBuilder<T> {
    key: Option<KeyFn<T>>,
    start: Option<StartFn<T>>,
    enter: Option<SpecFn<T>>,
    update: Option<SpecFn<T>>,
    leave: Option<SpecFn<T>>,
    interpolation: Option<InterpolationFactory>,
    template: Option<Template<T>>,
    ease: Option<Ease>,
    duration: Option<Duration>,
    delay: Option<Duration>,
    settings: GroupSettings,
}

impl<T: Clone + 'static> NodeGroupBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            key: None,
            start: None,
            enter: None,
            update: None,
            leave: None,
            interpolation: None,
            template: None,
            ease: None,
            duration: None,
            delay: None,
            settings: GroupSettings::default(),
        }
    }

    /// Set the key accessor (required).
    pub fn key<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> Key + Send + Sync + 'static,
    {
        self.key = Some(Arc::new(f));
        self
    }

    /// Set the starting snapshot of entering items (required).
    pub fn start<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> Snapshot + Send + Sync + 'static,
    {
        self.start = Some(Arc::new(f));
        self
    }

    pub fn enter<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> R + Send + Sync + 'static,
        R: Into<TransitionSpec> + 'static,
    {
        self.enter = Some(spec_fn(f));
        self
    }

    pub fn update<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> R + Send + Sync + 'static,
        R: Into<TransitionSpec> + 'static,
    {
        self.update = Some(spec_fn(f));
        self
    }

    pub fn leave<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&T, usize) -> R + Send + Sync + 'static,
        R: Into<TransitionSpec> + 'static,
    {
        self.leave = Some(spec_fn(f));
        self
    }

    /// Replace the interpolation factory.
    pub fn interpolation<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value, &str, Option<&str>) -> Interpolator + Send + Sync + 'static,
    {
        self.interpolation = Some(Arc::new(f));
        self
    }

    /// Set the template every item is rendered from (required).
    pub fn template(mut self, template: impl Into<Template<T>>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Replace all scalar settings at once, including any earlier
    /// `duration` or `delay`.
    pub fn settings(mut self, settings: GroupSettings) -> Self {
        self.settings = settings;
        self.duration = None;
        self.delay = None;
        self
    }

    /// Default duration for legs that do not set one. Kept at full
    /// precision, unlike `GroupSettings::duration_ms`.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Default delay for legs that do not set one.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Default easing for legs that do not set one.
    pub fn ease<F>(mut self, ease: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.ease = Some(Arc::new(ease));
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.settings.namespace = Some(namespace.into());
        self
    }

    pub fn merge_order(mut self, order: MergeOrder) -> Self {
        self.settings.merge_order = order;
        self
    }

    /// Build the group over `surface`, mounting into `container`.
    /// Returns an error if required fields are missing.
    pub fn build<S: RenderSurface>(
        self,
        surface: S,
        container: S::Handle,
    ) -> Result<NodeGroup<T, S>, BuildError> {
        let key = self.key.ok_or(BuildError::MissingKeyAccessor)?;
        let start = self.start.ok_or(BuildError::MissingStart)?;
        let template = self.template.ok_or(BuildError::MissingTemplate)?;

        let mut lifecycle = Lifecycle::new(key, start);
        if let Some(enter) = self.enter {
            lifecycle.enter = enter;
        }
        if let Some(update) = self.update {
            lifecycle.update = update;
        }
        if let Some(leave) = self.leave {
            lifecycle.leave = leave;
        }

        let defaults = ResolvedTiming {
            duration: self.duration.unwrap_or_else(|| self.settings.duration()),
            delay: self.delay.unwrap_or_else(|| self.settings.delay()),
            ease: self.ease.unwrap_or_else(linear),
        };

        let config = GroupConfig {
            lifecycle,
            template,
            interpolation: self.interpolation.unwrap_or_else(numeric_factory),
            defaults,
            namespace: self.settings.namespace,
            merge_order: self.settings.merge_order,
        };
        Ok(NodeGroup::new(config, surface, container))
    }
}

impl<T: Clone + 'static> Default for NodeGroupBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn spec_fn<T, F, R>(f: F) -> SpecFn<T>
where
    T: 'static,
    F: Fn(&T, usize) -> R + Send + Sync + 'static,
    R: Into<TransitionSpec> + 'static,
{
    Arc::new(move |d: &T, i| f(d, i).into())
}
