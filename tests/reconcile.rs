//! Reconciliation properties driven through the public runtime API.
//!
//! Run with: cargo test --test reconcile

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use spark_vdom::{
    create_element, enhance, Children, Component, Element, Props, Runtime, StateHandle, Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

thread_local! {
    /// Renders the elements passed in its `items` prop.
    static LIST: Component = Component::new("List", |props, _, _| {
        let items = props.get("items").and_then(|v| v.downcast_ref::<Vec<Element>>());
        items.cloned().map_or(Children::None, Children::from)
    });
}

/// A fresh `items` payload is never identical to the last one.
fn list(items: Vec<Element>) -> Element {
    LIST.with(|list| create_element(list, Props::new().with("items", Value::opaque(items)), ()))
}

/// Lifecycle probe: counts renders and mounts, logs unmounts by label.
struct Probe {
    renders: Rc<Cell<u32>>,
    mounts: Rc<Cell<u32>>,
    unmounts: Rc<RefCell<Vec<String>>>,
}

impl Probe {
    fn new() -> Self {
        Self {
            renders: Rc::new(Cell::new(0)),
            mounts: Rc::new(Cell::new(0)),
            unmounts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn component(&self, name: &'static str) -> Component {
        let renders = self.renders.clone();
        let mounts = self.mounts.clone();
        let unmounts = self.unmounts.clone();
        Component::new(name, move |props, _, features| {
            renders.set(renders.get() + 1);
            let mounts = mounts.clone();
            features.mounted(move || mounts.set(mounts.get() + 1));
            let label = props.str("label").unwrap_or_default().to_string();
            let unmounts = unmounts.clone();
            features.unmounted(move || unmounts.borrow_mut().push(label));
            Children::None
        })
    }
}

#[test]
fn test_identical_props_render_once() {
    init_tracing();
    let probe = Probe::new();
    let node = probe.component("Node");
    let shared = Value::from(vec![Value::from(1), Value::from(2)]);
    let props = Props::new().with("a", 1).with("list", shared);

    let rt = Runtime::default();
    rt.reconcile(create_element(&node, props.clone(), ())).unwrap();
    rt.reconcile(create_element(&node, props.clone(), ())).unwrap();
    assert_eq!(probe.renders.get(), 1);

    // Same contents, new list: not identical.
    let rebuilt = props.with("list", vec![Value::from(1), Value::from(2)]);
    rt.reconcile(create_element(&node, rebuilt, ())).unwrap();
    assert_eq!(probe.renders.get(), 2);
}

#[test]
fn test_fresh_children_with_identical_props_render_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let wrapper = Component::new("Wrapper", move |_, children, _| {
        counter.set(counter.get() + 1);
        children.clone()
    });
    let leaf = Component::new("Leaf", |_, _, _| Children::None);
    let wrapped = || create_element(&wrapper, Props::new().with("a", 1), vec![create_element(&leaf, Props::new(), ())]);

    let rt = Runtime::default();
    rt.reconcile(wrapped()).unwrap();
    let tree = rt.reconcile(wrapped()).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(tree.node_count(), 2);
}

#[test]
fn test_prop_count_change_forces_render() {
    let probe = Probe::new();
    let node = probe.component("Node");
    let rt = Runtime::default();

    rt.reconcile(create_element(&node, Props::new().with("a", 1), ())).unwrap();
    rt.reconcile(create_element(&node, Props::new().with("a", 1).with("b", Value::Undefined), ()))
        .unwrap();
    assert_eq!(probe.renders.get(), 2);

    rt.reconcile(create_element(&node, Props::new().with("a", 1), ())).unwrap();
    assert_eq!(probe.renders.get(), 3);
}

#[test]
fn test_dynamic_instance_skips_memo() {
    let renders = Rc::new(Cell::new(0));
    let counter = renders.clone();
    let ticker = Component::new("Ticker", move |_, _, features| {
        counter.set(counter.get() + 1);
        features.dynamic(true);
        Children::None
    });

    let rt = Runtime::default();
    for _ in 0..3 {
        rt.reconcile(create_element(&ticker, Props::new(), ())).unwrap();
    }
    assert_eq!(renders.get(), 3);
}

#[test]
fn test_sibling_state_is_isolated() {
    let handles: Rc<RefCell<Vec<StateHandle>>> = Rc::new(RefCell::new(Vec::new()));
    let collected = handles.clone();
    let cell = Component::new("Cell", move |_, _, features| {
        features.mounted(|| collected.borrow_mut().push(features.setter()));
        Children::Number(features.state().as_number().unwrap_or(0.0))
    });
    let row = || {
        list(vec![
            create_element(&cell, Props::new().with("key", "left"), ()),
            create_element(&cell, Props::new().with("key", "right"), ()),
        ])
    };

    let rt = Runtime::default();
    rt.reconcile(row()).unwrap();
    assert_eq!(handles.borrow().len(), 2);

    handles.borrow()[0].set(7);
    rt.advance(Duration::from_millis(16)).unwrap();
    let tree = rt.reconcile(row()).unwrap();

    assert_eq!(tree.at(&[0]).and_then(|n| n.children.as_number()), Some(7.0));
    assert_eq!(tree.at(&[1]).and_then(|n| n.children.as_number()), Some(0.0));

    handles.borrow()[1].set("x");
    rt.advance(Duration::from_millis(16)).unwrap();
    assert_eq!(rt.state_of(handles.borrow()[0].id()), Some(Value::from(7)));
    assert_eq!(rt.state_of(handles.borrow()[1].id()), Some(Value::from("x")));
}

#[test]
fn test_keyed_reorder_never_unmounts() {
    let probe = Probe::new();
    let item = probe.component("Item");
    let keyed = |key: i32| create_element(&item, Props::new().with("key", key).with("label", key), ());

    let rt = Runtime::default();
    let first = rt.reconcile(list(vec![keyed(1), keyed(2), keyed(3)])).unwrap();
    let second = rt.reconcile(list(vec![keyed(2), keyed(1), keyed(3)])).unwrap();

    assert!(probe.unmounts.borrow().is_empty());
    assert_eq!(probe.mounts.get(), 3);
    assert_eq!(first.at(&[0]).map(|n| n.id), second.at(&[1]).map(|n| n.id));
    assert_eq!(first.at(&[1]).map(|n| n.id), second.at(&[0]).map(|n| n.id));
}

#[test]
fn test_type_change_unmounts_exactly_one() {
    let probe = Probe::new();
    let x = probe.component("X");
    let y = probe.component("Y");
    let z = probe.component("Z");
    let at = |c: &Component, label: &str| create_element(c, Props::new().with("label", label), ());

    let rt = Runtime::default();
    rt.reconcile(list(vec![at(&x, "0"), at(&y, "1"), at(&x, "2")])).unwrap();
    rt.reconcile(list(vec![at(&x, "0"), at(&z, "1"), at(&x, "2")])).unwrap();

    assert_eq!(*probe.unmounts.borrow(), vec!["1".to_string()]);
    assert_eq!(probe.mounts.get(), 4);
}

#[test]
fn test_mounted_runs_once() {
    let probe = Probe::new();
    let node = probe.component("Node");

    let rt = Runtime::default();
    for i in 0..10 {
        rt.reconcile(create_element(&node, Props::new().with("i", i), ())).unwrap();
    }
    assert_eq!(probe.renders.get(), 10);
    assert_eq!(probe.mounts.get(), 1);
}

#[test]
fn test_unmount_fires_every_callback() {
    let probe = Probe::new();
    let item = probe.component("Item");
    let rt = Runtime::default();
    rt.reconcile(list(vec![
        create_element(&item, Props::new().with("label", "a"), ()),
        create_element(&item, Props::new().with("label", "b"), ()),
    ]))
    .unwrap();

    rt.unmount();
    assert_eq!(*probe.unmounts.borrow(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(rt.instance_count(), 0);
    assert!(rt.tree().is_none());
}

#[test]
fn test_enhance_maps_props() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let label = Component::new("Label", move |props, children, _| {
        sink.borrow_mut().push(props.str("text").unwrap_or_default().to_string());
        children.clone()
    });
    let shout = enhance(
        "Shout",
        |_, props| {
            let text = props.str("text").unwrap_or_default().to_uppercase();
            props.with("text", text)
        },
        label,
    );

    let rt = Runtime::default();
    let tree = rt
        .reconcile(create_element(&shout, Props::new().with("text", "hi"), "child"))
        .unwrap();

    assert_eq!(*seen.borrow(), vec!["HI".to_string()]);
    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.at(&[0]).and_then(|n| n.children.as_text()), Some("child"));
}
