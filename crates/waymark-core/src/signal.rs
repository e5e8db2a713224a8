use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use futures::channel::mpsc::{UnboundedReceiver, unbounded};
use futures::{Stream, StreamExt};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::effects::Subscription;

new_key_type! {
    pub struct SubId;
}

type Callback<T> = Rc<dyn Fn(&T)>;

/// Fan-out shared by `Signal` and `Events`.
///
/// Values emitted while a delivery is running are queued and handed out
/// after it, so every subscriber observes the same order.
struct Hub<T> {
    subs: RefCell<SlotMap<SubId, Callback<T>>>,
    pending: RefCell<VecDeque<T>>,
    emitting: Cell<bool>,
}

struct EmitGuard<'a>(&'a Cell<bool>);

impl Drop for EmitGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T: 'static> Hub<T> {
    fn new() -> Self {
        Self {
            subs: RefCell::new(SlotMap::with_key()),
            pending: RefCell::new(VecDeque::new()),
            emitting: Cell::new(false),
        }
    }

    fn emit(&self, value: T) {
        self.pending.borrow_mut().push_back(value);
        if self.emitting.get() {
            log::trace!(
                "emission queued behind a running delivery ({} pending)",
                self.pending.borrow().len()
            );
            return;
        }
        self.emitting.set(true);
        let _guard = EmitGuard(&self.emitting);

        loop {
            let Some(value) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            // snapshot so callbacks may (un)subscribe while we deliver
            let subs: SmallVec<[Callback<T>; 4]> = self.subs.borrow().values().cloned().collect();
            for s in subs {
                s(&value);
            }
        }
    }

    fn is_delivering_backlog(&self) -> bool {
        self.emitting.get() && !self.pending.borrow().is_empty()
    }

    fn insert(&self, f: Callback<T>) -> SubId {
        self.subs.borrow_mut().insert(f)
    }

    fn remove(&self, id: SubId) {
        self.subs.borrow_mut().remove(id);
    }

    fn len(&self) -> usize {
        self.subs.borrow().len()
    }
}

fn subscription_for<T: 'static>(hub: &Rc<Hub<T>>, id: SubId) -> Subscription {
    let weak: Weak<Hub<T>> = Rc::downgrade(hub);
    Subscription::new(move || {
        if let Some(hub) = weak.upgrade() {
            hub.remove(id);
        }
    })
}

/// Observable value with latest-value replay.
///
/// ```rust
/// use waymark_core::signal;
///
/// let count = signal(0);
/// count.set(1);
/// count.update(|v| *v += 1);
/// assert_eq!(count.get(), 2);
/// ```
pub struct Signal<T: 'static>(Rc<SignalInner<T>>);

struct SignalInner<T: 'static> {
    value: RefCell<T>,
    hub: Rc<Hub<T>>,
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(SignalInner {
            value: RefCell::new(value),
            hub: Rc::new(Hub::new()),
        }))
    }

    pub fn get(&self) -> T {
        self.0.value.borrow().clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.borrow())
    }

    pub fn set(&self, v: T) {
        *self.0.value.borrow_mut() = v.clone();
        self.0.hub.emit(v);
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let next = {
            let mut value = self.0.value.borrow_mut();
            f(&mut value);
            value.clone()
        };
        self.0.hub.emit(next);
    }

    /// Calls `f` with the current value right away, then with every new one.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let f: Callback<T> = Rc::new(f);
        // A queued backlog already ends in the current value; replaying it
        // here as well would hand this subscriber an older value afterwards.
        if !self.0.hub.is_delivering_backlog() {
            f(&self.get());
        }
        let id = self.0.hub.insert(f);
        subscription_for(&self.0.hub, id)
    }

    /// Like `subscribe`, without the replay.
    pub fn subscribe_changes(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.0.hub.insert(Rc::new(f));
        subscription_for(&self.0.hub, id)
    }

    /// Async view of the signal: yields the current value, then every update.
    pub fn stream(&self) -> SignalStream<T> {
        let (tx, rx) = unbounded();
        let sub = self.subscribe(move |v: &T| {
            let _ = tx.unbounded_send(v.clone());
        });
        SignalStream { rx, _sub: sub }
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.hub.len()
    }
}

pub fn signal<T: Clone + 'static>(t: T) -> Signal<T> {
    Signal::new(t)
}

/// Broadcast without a current value; late subscribers see only later emissions.
pub struct Events<T: 'static>(Rc<Hub<T>>);

impl<T: 'static> Clone for Events<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> Default for Events<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Events<T> {
    pub fn new() -> Self {
        Self(Rc::new(Hub::new()))
    }

    pub fn emit(&self, value: T) {
        self.0.emit(value);
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.0.insert(Rc::new(f));
        subscription_for(&self.0, id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.len()
    }

    pub fn has_subscribers(&self) -> bool {
        self.0.len() > 0
    }
}

impl<T: Clone + 'static> Events<T> {
    pub fn stream(&self) -> SignalStream<T> {
        let (tx, rx) = unbounded();
        let sub = self.subscribe(move |v: &T| {
            let _ = tx.unbounded_send(v.clone());
        });
        SignalStream { rx, _sub: sub }
    }
}

/// Stream of values from a `Signal` or `Events`. Unsubscribes when dropped.
pub struct SignalStream<T> {
    rx: UnboundedReceiver<T>,
    _sub: Subscription,
}

impl<T> Stream for SignalStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_next_unpin(cx)
    }
}
