//! Declarative description of what one item looks like.

use super::surface::Listener;
use crate::core::{Key, Snapshot, Value};
use std::fmt;
use std::sync::Arc;

/// Attribute or text computed from `(state, data, key, index)`.
pub type ValueFn<T> = Arc<dyn Fn(&Snapshot, &T, &Key, usize) -> Value + Send + Sync>;

/// Produces an event listener from `(state, data, key, index)` at mount time.
pub type ListenerFactory<T> = Arc<dyn Fn(&Snapshot, &T, &Key, usize) -> Listener + Send + Sync>;

/// An attribute that is either fixed or re-evaluated every tick.
pub enum AttrValue<T> {
    Static(Value),
    Dynamic(ValueFn<T>),
}

impl<T> Clone for AttrValue<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(value) => Self::Static(value.clone()),
            Self::Dynamic(f) => Self::Dynamic(Arc::clone(f)),
        }
    }
}

/// A node of the template tree.
pub enum Template<T> {
    Element(Element<T>),
    /// Fixed text content.
    Text(String),
    /// Text re-evaluated every tick.
    DynamicText(ValueFn<T>),
}

impl<T> Template<T> {
    /// Dynamic text from a closure.
    pub fn dynamic_text<F>(f: F) -> Self
    where
        F: Fn(&Snapshot, &T, &Key, usize) -> Value + Send + Sync + 'static,
    {
        Self::DynamicText(Arc::new(f))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl<T> From<Element<T>> for Template<T> {
    fn from(element: Element<T>) -> Self {
        Self::Element(element)
    }
}

impl<T> Clone for Template<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Element(element) => Self::Element(element.clone()),
            Self::Text(text) => Self::Text(text.clone()),
            Self::DynamicText(f) => Self::DynamicText(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Template<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => element.fmt(f),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::DynamicText(_) => f.write_str("DynamicText(..)"),
        }
    }
}

/// An element with attributes, listeners and children.
///
/// # Example
///
/// ```rust
/// use keyflow::core::Value;
/// use keyflow::render::{Element, Template};
///
/// let bar: Template<f64> = Element::new("g")
///     .dynamic("transform", |state, _, _, _| {
///         Value::from(format!("translate(0,{})", state.number("y").unwrap_or(0.0)))
///     })
///     .child(Element::new("rect").attr("class", "bar"))
///     .child(Template::<f64>::dynamic_text(|_, value, _, _| Value::from(*value)))
///     .into();
///
/// assert!(matches!(bar, Template::Element(_)));
/// ```
pub struct Element<T> {
    pub tag: String,
    pub namespace: Option<String>,
    pub attrs: Vec<(String, AttrValue<T>)>,
    pub listeners: Vec<(String, ListenerFactory<T>)>,
    pub children: Vec<Template<T>>,
}

impl<T> Element<T> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            namespace: None,
            attrs: Vec::new(),
            listeners: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create the element in `namespace` instead of the inherited one.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// A static attribute, set once at mount.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs
            .push((name.into(), AttrValue::Static(value.into())));
        self
    }

    /// A dynamic attribute, re-evaluated every tick.
    pub fn dynamic<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Snapshot, &T, &Key, usize) -> Value + Send + Sync + 'static,
    {
        self.attrs
            .push((name.into(), AttrValue::Dynamic(Arc::new(f))));
        self
    }

    /// Bind an event listener once at mount.
    pub fn on<F>(mut self, event: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Snapshot, &T, &Key, usize) -> Listener + Send + Sync + 'static,
    {
        self.listeners.push((event.into(), Arc::new(factory)));
        self
    }

    pub fn child(mut self, child: impl Into<Template<T>>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl<T> Clone for Element<T> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            namespace: self.namespace.clone(),
            attrs: self.attrs.clone(),
            listeners: self.listeners.clone(),
            children: self.children.clone(),
        }
    }
}

impl<T> fmt::Debug for Element<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs: Vec<&str> = self.attrs.iter().map(|(name, _)| name.as_str()).collect();
        let listeners: Vec<&str> = self
            .listeners
            .iter()
            .map(|(event, _)| event.as_str())
            .collect();
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("namespace", &self.namespace)
            .field("attrs", &attrs)
            .field("listeners", &listeners)
            .field("children", &self.children)
            .finish()
    }
}
