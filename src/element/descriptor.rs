//! Element descriptors - the declarative input of the reconciler.

use std::fmt;
use std::rc::Rc;

use crate::engine::Features;
use crate::error::Result;
use crate::types::{Key, Props};

// =============================================================================
// Node Types
// =============================================================================

/// Signature of a component function.
///
/// Receives its props, the children it was given at call time and the
/// per-instance [`Features`]. Returns what becomes the node's children.
pub type RenderFn = dyn Fn(&Props, &Children, &Features) -> Children;

/// A component function with a display name.
///
/// Two components are the same type only if they share the same render
/// function allocation; build components once and clone them.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Rc<RenderFn>,
}

impl Component {
    pub fn new<F>(name: &'static str, render: F) -> Self
    where
        F: Fn(&Props, &Children, &Features) -> Children + 'static,
    {
        Self {
            name,
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn call(&self, props: &Props, children: &Children, features: &Features) -> Children {
        (self.render)(props, children, features)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.name)
    }
}

/// Marker of a terminal leaf shape (e.g. `RECT`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag(pub &'static str);

impl Tag {
    pub fn name(self) -> &'static str {
        self.0
    }
}

/// What a descriptor resolves through.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeType {
    /// User-level node, resolved by calling its function.
    Component(Component),
    /// Leaf shape owned by the presentation layer.
    Primitive(Tag),
}

impl NodeType {
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Component(c) => c.name(),
            NodeType::Primitive(tag) => tag.name(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, NodeType::Primitive(_))
    }
}

impl From<Component> for NodeType {
    fn from(value: Component) -> Self {
        NodeType::Component(value)
    }
}

impl From<&Component> for NodeType {
    fn from(value: &Component) -> Self {
        NodeType::Component(value.clone())
    }
}

impl From<Tag> for NodeType {
    fn from(value: Tag) -> Self {
        NodeType::Primitive(value)
    }
}

// =============================================================================
// Children
// =============================================================================

/// Author-supplied children, and the output of a render.
#[derive(Clone, Debug, Default)]
pub enum Children {
    #[default]
    None,
    Text(Rc<str>),
    Number(f64),
    One(Rc<Element>),
    Many(Rc<[Element]>),
}

impl Children {
    pub fn is_none(&self) -> bool {
        matches!(self, Children::None)
    }

    /// The descriptors in here, normalized to a list. Leaves yield nothing.
    pub fn elements(&self) -> &[Element] {
        match self {
            Children::One(e) => std::slice::from_ref(e.as_ref()),
            Children::Many(v) => v,
            _ => &[],
        }
    }
}

impl From<Element> for Children {
    fn from(value: Element) -> Self {
        Children::One(Rc::new(value))
    }
}

impl From<Vec<Element>> for Children {
    fn from(value: Vec<Element>) -> Self {
        Children::Many(value.into())
    }
}

impl From<Option<Element>> for Children {
    fn from(value: Option<Element>) -> Self {
        value.map_or(Children::None, Children::from)
    }
}

impl From<&str> for Children {
    fn from(value: &str) -> Self {
        Children::Text(value.into())
    }
}

impl From<String> for Children {
    fn from(value: String) -> Self {
        Children::Text(value.into())
    }
}

impl From<f64> for Children {
    fn from(value: f64) -> Self {
        Children::Number(value)
    }
}

impl From<i32> for Children {
    fn from(value: i32) -> Self {
        Children::Number(value as f64)
    }
}

impl From<()> for Children {
    fn from(_: ()) -> Self {
        Children::None
    }
}

// =============================================================================
// Element
// =============================================================================

/// Immutable declarative record: `{ ty, props, children, key }`.
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) ty: NodeType,
    pub(crate) props: Props,
    pub(crate) children: Children,
    pub(crate) key: Option<Key>,
}

impl Element {
    /// Same as [`create_element`].
    pub fn new(ty: impl Into<NodeType>, props: Props, children: impl Into<Children>) -> Self {
        create_element(ty, props, children)
    }

    /// Replace the sibling key.
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn ty(&self) -> &NodeType {
        &self.ty
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }
}

/// Build a descriptor, moving a `key` prop out of `props`.
///
/// A `key` that is neither a string nor a number is dropped with a warning;
/// use [`try_create_element`] to reject it instead.
pub fn create_element(ty: impl Into<NodeType>, props: Props, children: impl Into<Children>) -> Element {
    let ty = ty.into();
    let mut props = props;
    let key = props.remove("key").and_then(|value| match Key::from_value(&value) {
        Ok(key) => key,
        Err(err) => {
            tracing::warn!(node = ty.name(), %err, "dropping key");
            None
        }
    });

    Element {
        ty,
        props,
        children: children.into(),
        key,
    }
}

/// Validating variant of [`create_element`].
pub fn try_create_element(
    ty: impl Into<NodeType>,
    props: Props,
    children: impl Into<Children>,
) -> Result<Element> {
    let mut props = props;
    let key = match props.remove("key") {
        Some(value) => Key::from_value(&value)?,
        None => None,
    };

    Ok(Element {
        ty: ty.into(),
        props,
        children: children.into(),
        key,
    })
}
