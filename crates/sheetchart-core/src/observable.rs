//! Single-threaded observable slots.
//!
//! A [`Subject`] is a synchronous pub-sub channel: [`Subject::next`] calls every observer before
//! returning. Replaying subjects also remember the last value and hand it to new observers,
//! which is how the chart model exposes its current state. Completing a subject drops its
//! observers and turns every later emission into a no-op.
//!
//! Observers may freely emit, subscribe or unsubscribe from inside a callback; the observer list
//! is snapshotted before it is walked.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Observer<T> = Rc<dyn Fn(&T)>;

struct SubjectInner<T> {
    replay: bool,
    value: Option<T>,
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
    closed: bool,
}

pub struct Subject<T> {
    inner: Rc<RefCell<SubjectInner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Subject")
            .field("replay", &inner.replay)
            .field("observers", &inner.observers.len())
            .field("closed", &inner.closed)
            .finish()
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// A subject without memory: observers only see values emitted after they subscribed.
    pub fn new() -> Self {
        Self::build(false, None)
    }

    /// A subject that replays its last emitted value to new observers.
    pub fn replay() -> Self {
        Self::build(true, None)
    }

    /// A replaying subject seeded with `initial`.
    pub fn with_value(initial: T) -> Self {
        Self::build(true, Some(initial))
    }

    fn build(replay: bool, value: Option<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SubjectInner {
                replay,
                value,
                observers: Vec::new(),
                next_id: 0,
                closed: false,
            })),
        }
    }

    /// Publishes `value` to every observer. No-op once completed.
    pub fn next(&self, value: T) {
        let observers: Vec<Observer<T>> = {
            let mut inner = self.inner.borrow_mut();
            if inner.closed {
                return;
            }
            if inner.replay {
                inner.value = Some(value.clone());
            }
            inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect()
        };
        for observer in observers {
            observer(&value);
        }
    }

    /// Registers `observer`; replaying subjects call it immediately with the current value.
    ///
    /// The observer stays registered until the returned [`Subscription`] is dropped or
    /// [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unsubscribes the observer"]
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        let observer: Observer<T> = Rc::new(observer);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            if inner.closed {
                return Subscription::inert();
            }
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Rc::clone(&observer)));
            (id, inner.value.clone())
        };
        if let Some(current) = current {
            observer(&current);
        }

        let weak: Weak<RefCell<SubjectInner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().observers.retain(|(oid, _)| *oid != id);
                }
            })),
        }
    }

    /// Last value of a replaying subject.
    pub fn value(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }

    /// Drops every observer; later emissions and subscriptions are ignored.
    pub fn complete(&self) {
        let observers = {
            let mut inner = self.inner.borrow_mut();
            inner.closed = true;
            std::mem::take(&mut inner.observers)
        };
        drop(observers);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }

    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

/// Handle of a registered observer. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the observer"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn replaying_subject_hands_current_value_to_new_observers() {
        let subject = Subject::with_value(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = subject.subscribe(move |v| sink.borrow_mut().push(*v));
        subject.next(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let subject = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = subject.subscribe(move |v: &i32| sink.borrow_mut().push(*v));
        subject.next(1);
        drop(sub);
        subject.next(2);
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn completed_subject_is_silent() {
        let subject = Subject::replay();
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        let _sub = subject.subscribe(move |_: &i32| *sink.borrow_mut() += 1);
        subject.complete();
        subject.next(5);
        assert_eq!(*seen.borrow(), 0);
        assert!(subject.is_closed());
        assert_eq!(subject.value(), None);
    }

    #[test]
    fn observers_may_emit_reentrantly() {
        let subject = Subject::new();
        let echo = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let forward = echo.clone();
        let _a = subject.subscribe(move |v: &i32| forward.next(v * 10));
        let sink = Rc::clone(&seen);
        let _b = echo.subscribe(move |v: &i32| sink.borrow_mut().push(*v));

        subject.next(3);
        assert_eq!(*seen.borrow(), vec![30]);
    }
}
