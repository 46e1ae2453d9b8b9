//! Materializes a template for one node.

use super::surface::{RenderSurface, SurfaceError};
use super::template::{AttrValue, Element, Template};
use crate::core::{Key, Snapshot};
use crate::engine::InstanceId;
use crate::transition::{UpdateSlot, Updater};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Why a template subtree was skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateIssue {
    #[error("element has no tag")]
    MissingTag,

    #[error("'{0}' is not a valid tag name")]
    InvalidTag(String),
}

/// A non-fatal template problem found while mounting a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWarning {
    pub key: Key,
    /// Child-index path from the template root, e.g. `0.2`.
    pub path: String,
    pub issue: TemplateIssue,
}

impl fmt::Display for TemplateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node '{}': template subtree at '{}' skipped: {}",
            self.key, self.path, self.issue
        )
    }
}

/// Check a tag name before asking the surface to create it.
pub fn validate_tag(tag: &str) -> Result<(), TemplateIssue> {
    let mut chars = tag.chars();
    let Some(first) = chars.next() else {
        return Err(TemplateIssue::MissingTag);
    };
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
    if valid {
        Ok(())
    } else {
        Err(TemplateIssue::InvalidTag(tag.to_string()))
    }
}

/// Result of materializing a template for one node.
pub(crate) struct Mounted<T, H> {
    pub root: Option<H>,
    pub updaters: Vec<Updater<T, H>>,
    pub warnings: Vec<TemplateWarning>,
}

/// Everything a template binding may read while a node is being mounted.
pub(crate) struct MountScope<'a, T> {
    pub key: &'a Key,
    pub index: usize,
    pub state: &'a Snapshot,
    pub data: &'a T,
    pub namespace: Option<&'a str>,
    /// Engine instance, for log correlation.
    pub instance: InstanceId,
}

/// Walks a template once per mounted node.
///
/// Static attributes are written immediately, dynamic attributes and
/// dynamic text are written once and registered as updaters, listeners are
/// bound once.
pub(crate) struct Instantiator<'s, 'a, S: RenderSurface, T> {
    surface: &'s mut S,
    scope: MountScope<'a, T>,
    updaters: Vec<Updater<T, S::Handle>>,
    warnings: Vec<TemplateWarning>,
}

impl<'s, 'a, S: RenderSurface, T> Instantiator<'s, 'a, S, T> {
    pub fn new(surface: &'s mut S, scope: MountScope<'a, T>) -> Self {
        Self {
            surface,
            scope,
            updaters: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Build `template` and attach it under `parent` before `before`.
    ///
    /// On a surface error the partially built subtree is removed and the
    /// error is returned; nothing stays attached.
    pub fn mount(
        mut self,
        template: &Template<T>,
        parent: &S::Handle,
        before: Option<&S::Handle>,
    ) -> Result<Mounted<T, S::Handle>, SurfaceError> {
        let namespace = self.scope.namespace;
        let root = self.build(template, namespace, "0")?;
        if let Some(root) = &root {
            if let Err(err) = self.surface.insert_child(parent, root, before) {
                self.surface.remove(root);
                return Err(err);
            }
        }
        Ok(Mounted {
            root,
            updaters: self.updaters,
            warnings: self.warnings,
        })
    }

    fn build(
        &mut self,
        template: &Template<T>,
        namespace: Option<&str>,
        path: &str,
    ) -> Result<Option<S::Handle>, SurfaceError> {
        match template {
            Template::Element(element) => self.build_element(element, namespace, path),
            Template::Text(text) => self.surface.create_text(text).map(Some),
            Template::DynamicText(f) => {
                let scope = &self.scope;
                let text = f(scope.state, scope.data, scope.key, scope.index).to_string();
                let handle = self.surface.create_text(&text)?;
                self.updaters.push(Updater {
                    target: handle.clone(),
                    slot: UpdateSlot::Text,
                    value: Arc::clone(f),
                });
                Ok(Some(handle))
            }
        }
    }

    fn build_element(
        &mut self,
        element: &Element<T>,
        inherited: Option<&str>,
        path: &str,
    ) -> Result<Option<S::Handle>, SurfaceError> {
        if let Err(issue) = validate_tag(&element.tag) {
            tracing::warn!(
                instance = %self.scope.instance,
                key = %self.scope.key,
                path,
                %issue,
                "Skipping template subtree"
            );
            self.warnings.push(TemplateWarning {
                key: self.scope.key.clone(),
                path: path.to_string(),
                issue,
            });
            return Ok(None);
        }

        let namespace = element.namespace.as_deref().or(inherited);
        let handle = self.surface.create_element(&element.tag, namespace)?;
        if let Err(err) = self.populate(&handle, element, namespace, path) {
            self.surface.remove(&handle);
            return Err(err);
        }
        Ok(Some(handle))
    }

    fn populate(
        &mut self,
        handle: &S::Handle,
        element: &Element<T>,
        namespace: Option<&str>,
        path: &str,
    ) -> Result<(), SurfaceError> {
        let MountScope {
            key,
            index,
            state,
            data,
            ..
        } = self.scope;

        for (name, attr) in &element.attrs {
            match attr {
                AttrValue::Static(value) => self.surface.set_attribute(handle, name, value),
                AttrValue::Dynamic(f) => {
                    let value = f(state, data, key, index);
                    self.surface.set_attribute(handle, name, &value);
                    self.updaters.push(Updater {
                        target: handle.clone(),
                        slot: UpdateSlot::Attribute(name.clone()),
                        value: Arc::clone(f),
                    });
                }
            }
        }

        for (event, factory) in &element.listeners {
            let listener = factory(state, data, key, index);
            self.surface.add_listener(handle, event, listener);
        }

        for (i, child) in element.children.iter().enumerate() {
            let child_path = format!("{path}.{i}");
            if let Some(child_handle) = self.build(child, namespace, &child_path)? {
                if let Err(err) = self.surface.insert_child(handle, &child_handle, None) {
                    self.surface.remove(&child_handle);
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::render::{RecordingSurface, SurfaceCall, TargetId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Datum {
        label: &'static str,
    }

    fn mount(
        surface: &mut RecordingSurface,
        template: &Template<Datum>,
        state: &Snapshot,
    ) -> Result<Mounted<Datum, TargetId>, SurfaceError> {
        let key = Key::from("k1");
        let datum = Datum { label: "first" };
        let root = surface.root();
        let scope = MountScope {
            key: &key,
            index: 0,
            state,
            data: &datum,
            namespace: Some("svg"),
            instance: InstanceId::new(),
        };
        Instantiator::new(surface, scope).mount(template, &root, None)
    }

    #[test]
    fn tag_validation() {
        assert!(validate_tag("rect").is_ok());
        assert!(validate_tag("svg:g").is_ok());
        assert!(validate_tag("my-widget").is_ok());
        assert_eq!(validate_tag(""), Err(TemplateIssue::MissingTag));
        assert_eq!(
            validate_tag("1div"),
            Err(TemplateIssue::InvalidTag("1div".to_string()))
        );
        assert!(validate_tag("di v").is_err());
    }

    #[test]
    fn static_and_dynamic_attributes_are_written_at_mount() {
        let template: Template<Datum> = Element::new("g")
            .attr("class", "bar")
            .dynamic("opacity", |state: &Snapshot, _: &Datum, _: &Key, _| {
                state.get("opacity").cloned().unwrap_or(Value::from(1))
            })
            .child(Template::dynamic_text(|_: &Snapshot, d: &Datum, _: &Key, _| {
                Value::from(d.label)
            }))
            .into();

        let mut surface = RecordingSurface::new();
        let state = Snapshot::new().with("opacity", 0.25);
        let mounted = mount(&mut surface, &template, &state).unwrap();

        let root = mounted.root.unwrap();
        assert_eq!(surface.tag(root), Some("g"));
        assert_eq!(surface.namespace(root), Some("svg"));
        assert_eq!(surface.attribute(root, "class"), Some(&Value::from("bar")));
        assert_eq!(surface.attribute(root, "opacity"), Some(&Value::from(0.25)));
        assert_eq!(mounted.updaters.len(), 2);

        let text = surface.children(root)[0];
        assert_eq!(surface.text(text), Some("first"));
        assert_eq!(surface.children(surface.root()), vec![root]);
    }

    #[test]
    fn invalid_subtree_is_skipped_and_siblings_continue() {
        let template: Template<Datum> = Element::new("g")
            .child(Element::new("").child(Element::new("rect")))
            .child(Element::new("text"))
            .into();

        let mut surface = RecordingSurface::new();
        let mounted = mount(&mut surface, &template, &Snapshot::new()).unwrap();

        assert_eq!(mounted.warnings.len(), 1);
        assert_eq!(mounted.warnings[0].path, "0.0");
        assert_eq!(mounted.warnings[0].issue, TemplateIssue::MissingTag);

        let root = mounted.root.unwrap();
        let children = surface.children(root);
        assert_eq!(children.len(), 1);
        assert_eq!(surface.tag(children[0]), Some("text"));
        assert_eq!(surface.created_count(), 2);
    }

    #[test]
    fn invalid_root_mounts_nothing() {
        let template: Template<Datum> = Element::new("9").into();
        let mut surface = RecordingSurface::new();
        let mounted = mount(&mut surface, &template, &Snapshot::new()).unwrap();
        assert!(mounted.root.is_none());
        assert_eq!(mounted.warnings.len(), 1);
        assert!(surface.children(surface.root()).is_empty());
    }

    #[test]
    fn creation_failure_removes_partial_subtree() {
        let template: Template<Datum> = Element::new("g")
            .child(Element::new("rect"))
            .child(Element::new("broken"))
            .into();

        let mut surface = RecordingSurface::new();
        surface.fail_on("broken");
        let result = mount(&mut surface, &template, &Snapshot::new());

        assert!(matches!(result, Err(SurfaceError::CreateFailed { .. })));
        assert!(surface.children(surface.root()).is_empty());
        assert!(surface
            .calls()
            .iter()
            .any(|call| matches!(call, SurfaceCall::Remove { .. })));
    }

    #[test]
    fn listeners_are_bound_once_with_mount_context() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let template: Template<Datum> = Element::new("rect")
            .on("click", move |_: &Snapshot, _: &Datum, key: &Key, index| {
                assert_eq!(key.as_str(), "k1");
                assert_eq!(index, 0);
                let counter = Arc::clone(&counter);
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }) as crate::render::Listener
            })
            .into();

        let mut surface = RecordingSurface::new();
        let mounted = mount(&mut surface, &template, &Snapshot::new()).unwrap();
        let root = mounted.root.unwrap();

        assert_eq!(surface.dispatch(root, "click"), 1);
        assert_eq!(surface.dispatch(root, "click"), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert!(mounted.updaters.is_empty());
    }
}
