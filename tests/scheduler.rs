//! Update scheduling on virtual time: batching, dynamic instances, ordering.
//!
//! Run with: cargo test --test scheduler

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use spark_vdom::{create_element, Children, Component, Config, Props, Runtime, StateHandle, Value};

const MS: Duration = Duration::from_millis(1);

/// Records every state it renders with and hands out its setter.
struct Recorder {
    seen: Rc<RefCell<Vec<Value>>>,
    setter: Rc<RefCell<Option<StateHandle>>>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            seen: Rc::new(RefCell::new(Vec::new())),
            setter: Rc::new(RefCell::new(None)),
        }
    }

    fn component(&self) -> Component {
        let seen = self.seen.clone();
        let setter = self.setter.clone();
        Component::new("Recorder", move |_, _, features| {
            seen.borrow_mut().push(features.state().clone());
            features.mounted(|| *setter.borrow_mut() = Some(features.setter()));
            Children::None
        })
    }

    fn set(&self, value: impl Into<Value>) {
        if let Some(handle) = self.setter.borrow().as_ref() {
            handle.set(value);
        }
    }

    fn renders(&self) -> usize {
        self.seen.borrow().len()
    }
}

#[test]
fn test_updates_in_one_window_flush_once() {
    let recorder = Recorder::new();
    let rt = Runtime::new(Config::default().with_flush_interval(16 * MS));
    rt.reconcile(create_element(recorder.component(), Props::new(), ())).unwrap();

    recorder.set(18);
    rt.advance(5 * MS).unwrap();
    recorder.set(27);
    assert_eq!(rt.pending_updates(), 2);

    rt.advance(11 * MS).unwrap();
    assert_eq!(rt.flush_count(), 1);
    assert_eq!(recorder.renders(), 2);
    assert_eq!(recorder.seen.borrow().last(), Some(&Value::from(27)));

    // Nothing left to do.
    rt.advance(100 * MS).unwrap();
    assert_eq!(rt.flush_count(), 1);
}

#[test]
fn test_updates_to_two_instances_appear_together() {
    let handles: Rc<RefCell<Vec<StateHandle>>> = Rc::new(RefCell::new(Vec::new()));
    let collected = handles.clone();
    let cell = Component::new("Cell", move |_, _, features| {
        features.mounted(|| collected.borrow_mut().push(features.setter()));
        Children::Number(features.state().as_number().unwrap_or(0.0))
    });
    let pair = Component::new("Pair", move |_, _, _| {
        Children::from(vec![
            create_element(&cell, Props::new().with("key", "a"), ()),
            create_element(&cell, Props::new().with("key", "b"), ()),
        ])
    });

    let rt = Runtime::new(Config::default().with_flush_interval(16 * MS));
    rt.reconcile(create_element(pair, Props::new(), ())).unwrap();
    let shown = |rt: &Runtime| {
        let tree = rt.tree();
        let at = |i: usize| tree.as_ref().and_then(|t| t.at(&[i])).and_then(|n| n.children.as_number());
        (at(0), at(1))
    };

    handles.borrow()[0].set(18);
    rt.advance(5 * MS).unwrap();
    handles.borrow()[1].set(27);

    rt.advance(10 * MS).unwrap();
    assert_eq!(shown(&rt), (Some(0.0), Some(0.0)));

    rt.advance(MS).unwrap();
    assert_eq!(shown(&rt), (Some(18.0), Some(27.0)));
    assert_eq!(rt.flush_count(), 1);
}

#[test]
fn test_flush_waits_full_interval() {
    let recorder = Recorder::new();
    let rt = Runtime::new(Config::default().with_flush_interval(40 * MS));
    rt.reconcile(create_element(recorder.component(), Props::new(), ())).unwrap();

    recorder.set(1);
    rt.advance(39 * MS).unwrap();
    assert_eq!(recorder.renders(), 1);
    rt.advance(MS).unwrap();
    assert_eq!(recorder.renders(), 2);
}

#[test]
fn test_dynamic_instance_renders_every_flush() {
    let renders = Rc::new(Cell::new(0u32));
    let counter = renders.clone();
    let clock = Component::new("Clock", move |_, _, features| {
        counter.set(counter.get() + 1);
        features.dynamic(true);
        Children::Number(f64::from(counter.get()))
    });

    let rt = Runtime::default();
    rt.reconcile(create_element(clock, Props::new(), ())).unwrap();
    assert_eq!(renders.get(), 1);

    for frame in 1..=5 {
        rt.advance(16 * MS).unwrap();
        assert_eq!(renders.get(), 1 + frame);
    }
    assert_eq!(rt.flush_count(), 5);
    assert_eq!(rt.tree().and_then(|t| t.children.as_number()), Some(6.0));
}

#[test]
fn test_dynamic_off_stops_rescheduling() {
    let renders = Rc::new(Cell::new(0));
    let counter = renders.clone();
    let once = Component::new("Once", move |_, _, features| {
        counter.set(counter.get() + 1);
        features.dynamic(counter.get() < 3);
        Children::None
    });

    let rt = Runtime::default();
    rt.reconcile(create_element(once, Props::new(), ())).unwrap();
    rt.advance(200 * MS).unwrap();
    assert_eq!(renders.get(), 3);
    assert_eq!(rt.pending_updates(), 0);
}

#[test]
fn test_set_state_during_render_goes_to_next_batch() {
    let renders = Rc::new(Cell::new(0));
    let counter = renders.clone();
    let countdown = Component::new("Countdown", move |_, _, features| {
        counter.set(counter.get() + 1);
        let left = features.state().as_number().unwrap_or(3.0);
        if left > 0.0 {
            features.set_state(left - 1.0);
        }
        Children::Number(left)
    });

    let rt = Runtime::default();
    rt.reconcile(create_element(countdown, Props::new(), ())).unwrap();

    rt.advance(16 * MS).unwrap();
    assert_eq!((rt.flush_count(), renders.get()), (1, 2));

    rt.advance(48 * MS).unwrap();
    assert_eq!(rt.flush_count(), 3);
    assert_eq!(rt.tree().and_then(|t| t.children.as_number()), Some(0.0));
}

#[test]
fn test_child_already_rendered_by_parent_is_skipped() {
    let child_renders = Rc::new(Cell::new(0));
    let child_setter = Rc::new(RefCell::new(None::<StateHandle>));
    let parent_setter = Rc::new(RefCell::new(None::<StateHandle>));

    let (count, slot) = (child_renders.clone(), child_setter.clone());
    let child = Component::new("Child", move |_, _, features| {
        count.set(count.get() + 1);
        features.mounted(|| *slot.borrow_mut() = Some(features.setter()));
        Children::None
    });
    let slot = parent_setter.clone();
    let parent = Component::new("Parent", move |_, _, features| {
        features.mounted(|| *slot.borrow_mut() = Some(features.setter()));
        create_element(&child, Props::new(), ()).into()
    });

    let rt = Runtime::default();
    rt.reconcile(create_element(parent, Props::new(), ())).unwrap();
    assert_eq!(child_renders.get(), 1);

    if let (Some(p), Some(c)) = (parent_setter.borrow().as_ref(), child_setter.borrow().as_ref()) {
        p.set("parent");
        c.set("child");
    }
    rt.advance(16 * MS).unwrap();

    assert_eq!(child_renders.get(), 2);
    assert_eq!(rt.flush_count(), 1);
}

#[test]
fn test_set_state_after_unmount_is_ignored() {
    let recorder = Recorder::new();
    let rt = Runtime::default();
    rt.reconcile(create_element(recorder.component(), Props::new(), ())).unwrap();
    rt.unmount();

    recorder.set(1);
    assert_eq!(rt.pending_updates(), 0);
    rt.advance(100 * MS).unwrap();
    assert_eq!(rt.flush_count(), 0);
    assert_eq!(recorder.renders(), 1);
}

#[test]
fn test_setter_outliving_runtime_is_inert() {
    let recorder = Recorder::new();
    {
        let rt = Runtime::default();
        rt.reconcile(create_element(recorder.component(), Props::new(), ())).unwrap();
    }
    recorder.set(5);
    assert_eq!(recorder.renders(), 1);
}
