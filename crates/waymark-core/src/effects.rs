/// Guard returned by `subscribe`. Dropping it detaches the callback.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription(Option<Box<dyn FnOnce()>>);

impl Subscription {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(f)))
    }

    /// A subscription with nothing to undo.
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn unsubscribe(mut self) {
        if let Some(f) = self.0.take() {
            f()
        }
    }

    /// Keep the callback attached for as long as its source lives.
    pub fn detach(mut self) {
        self.0 = None;
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f()
        }
    }
}

/// A bag of subscriptions released together.
#[derive(Default)]
pub struct Subscriptions(Vec<Subscription>);

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sub: Subscription) {
        self.0.push(sub);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop every subscription, detaching all callbacks.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Extend<Subscription> for Subscriptions {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
