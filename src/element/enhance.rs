//! Component combinators.

use super::descriptor::{create_element, Children, Component};
use crate::engine::Features;
use crate::types::Props;

/// Wrap `inner` in a component that maps its props through `f` first.
///
/// `f` runs inside the wrapper's own instance, so it can use the wrapper's
/// state and lifecycle (e.g. subscribe on `mounted`, feed results in as
/// props). The wrapper forwards its children to `inner` unchanged.
///
/// ```ignore
/// let with_label = enhance("WithLabel", |features, props| {
///     features.mounted(|| println!("mounted"));
///     props.with("label", "hello")
/// }, Label.clone());
/// ```
pub fn enhance<F>(name: &'static str, f: F, inner: Component) -> Component
where
    F: Fn(&Features, Props) -> Props + 'static,
{
    Component::new(name, move |props, children, features| {
        let mapped = f(features, props.clone());
        Children::from(create_element(inner.clone(), mapped, children.clone()))
    })
}
