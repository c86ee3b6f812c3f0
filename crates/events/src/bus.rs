use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::event::DeviceEvent;

/// Handle returned by [`EventBus::subscribe`]; pass it back to unsubscribe.
///
/// Ids increase monotonically, so ordering by id is subscription order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Something that reacts to device events.
pub trait DeviceEventListener {
    fn on_device_event(&mut self, event: &DeviceEvent);
}

type Callback = Rc<dyn Fn(&DeviceEvent)>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: BTreeMap<SubscriptionId, Callback>,
}

/// Broadcast channel from input producers to any number of listeners.
///
/// The bus is an explicitly constructed value; clones share the same
/// subscriber list, so hand a clone to every producer and consumer that
/// needs it. It is single-threaded (`!Send`): the host frame loop owns it.
///
/// `publish` invokes every subscriber once, synchronously, in subscription
/// order. The subscriber list is snapshotted when a dispatch starts, so
/// subscribing or unsubscribing from inside a callback takes effect on the
/// next publish. A callback that publishes recurses on the same stack.
/// Panics raised by a callback are not caught and unwind through `publish`.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Returns the handle used to unsubscribe.
    pub fn subscribe(&self, callback: impl Fn(&DeviceEvent) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.callbacks.insert(id, Rc::new(callback));
        tracing::debug!(?id, "device event subscriber added");
        id
    }

    /// Register a shared listener object.
    ///
    /// The listener is mutably borrowed for the duration of each callback;
    /// it must not be borrowed elsewhere while an event is published.
    pub fn subscribe_listener<L>(&self, listener: Rc<RefCell<L>>) -> SubscriptionId
    where
        L: DeviceEventListener + 'static,
    {
        self.subscribe(move |event| listener.borrow_mut().on_device_event(event))
    }

    /// Remove a subscriber. Returns false if the handle was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.borrow_mut().callbacks.remove(&id).is_some();
        if removed {
            tracing::debug!(?id, "device event subscriber removed");
        }
        removed
    }

    /// Deliver one event to every current subscriber.
    pub fn publish(&self, event: &DeviceEvent) {
        let callbacks: Vec<Callback> = self.inner.borrow().callbacks.values().cloned().collect();
        tracing::trace!(
            event_type = ?event.event_type,
            action = ?event.action,
            subscribers = callbacks.len(),
            "publishing device event"
        );
        for callback in callbacks {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriber_count() == 0
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DeviceAction, DeviceEventType};

    fn console(text: &str) -> DeviceEvent {
        DeviceEvent::new(DeviceEventType::Console, DeviceAction::Change, text.into())
    }

    fn recorder(log: &Rc<RefCell<Vec<usize>>>, tag: usize) -> impl Fn(&DeviceEvent) + 'static {
        let log = Rc::clone(log);
        move |_: &DeviceEvent| log.borrow_mut().push(tag)
    }

    #[test]
    fn publish_reaches_all_in_subscription_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..5 {
            bus.subscribe(recorder(&log, tag));
        }
        bus.publish(&console("hello"));
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn unsubscribe_one_of_n() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let ids: Vec<SubscriptionId> = (0..4).map(|tag| bus.subscribe(recorder(&log, tag))).collect();

        assert!(bus.unsubscribe(ids[1]));
        bus.publish(&console("x"));

        assert_eq!(*log.borrow(), vec![0, 2, 3]);
        assert_eq!(bus.subscriber_count(), 3);
    }

    #[test]
    fn unsubscribe_unknown_is_false() {
        let bus = EventBus::new();
        let id = bus.subscribe(|_| {});
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = EventBus::new();
        let producer = bus.clone();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe(recorder(&log, 7));
        producer.publish(&console("shared"));
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn subscribe_during_dispatch_applies_to_next_publish() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner_bus = bus.clone();
        let inner_log = Rc::clone(&log);
        let added = Rc::new(RefCell::new(false));
        bus.subscribe(move |_| {
            if !*added.borrow() {
                *added.borrow_mut() = true;
                inner_bus.subscribe(recorder(&inner_log, 99));
            }
        });

        bus.publish(&console("first"));
        assert!(log.borrow().is_empty());
        bus.publish(&console("second"));
        assert_eq!(*log.borrow(), vec![99]);
    }

    #[test]
    fn nested_publish_recurses_in_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::<String>::new()));

        let relay_bus = bus.clone();
        let relay_log = Rc::clone(&log);
        bus.subscribe(move |event| {
            relay_log.borrow_mut().push(format!("a:{}", event.data));
            if event.event_type == DeviceEventType::Custom {
                relay_bus.publish(&console("nested"));
            }
        });
        let tail_log = Rc::clone(&log);
        bus.subscribe(move |event| tail_log.borrow_mut().push(format!("b:{}", event.data)));

        bus.publish(&DeviceEvent::new(
            DeviceEventType::Custom,
            DeviceAction::Change,
            "outer".into(),
        ));

        assert_eq!(
            *log.borrow(),
            vec!["a:outer", "a:nested", "b:nested", "b:outer"]
        );
    }

    struct Counter {
        clicks: usize,
    }

    impl DeviceEventListener for Counter {
        fn on_device_event(&mut self, event: &DeviceEvent) {
            if event.action == DeviceAction::Click {
                self.clicks += 1;
            }
        }
    }

    #[test]
    fn listener_objects_receive_events() {
        let bus = EventBus::new();
        let counter = Rc::new(RefCell::new(Counter { clicks: 0 }));
        bus.subscribe_listener(Rc::clone(&counter));
        bus.publish(&DeviceEvent::click(DeviceEventType::RightGrip, true));
        bus.publish(&console("ignored"));
        assert_eq!(counter.borrow().clicks, 1);
    }

    #[test]
    #[should_panic(expected = "listener defect")]
    fn subscriber_panics_propagate_to_publisher() {
        let bus = EventBus::new();
        bus.subscribe(|_| panic!("listener defect"));
        bus.publish(&console("boom"));
    }
}
