use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::view_model::{ViewModelRef, same_view_model};

/// Immutable point-in-time copy of a navigation stack, root first.
///
/// Every mutation produces a new snapshot; a published snapshot is never
/// modified in place.
#[derive(Clone)]
pub struct StackSnapshot(Rc<[ViewModelRef]>);

impl StackSnapshot {
    pub fn empty() -> Self {
        Self(Rc::from(Vec::<ViewModelRef>::new()))
    }

    pub fn single(vm: ViewModelRef) -> Self {
        Self(vec![vm].into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn top(&self) -> Option<&ViewModelRef> {
        self.0.last()
    }

    pub fn root(&self) -> Option<&ViewModelRef> {
        self.0.first()
    }

    pub fn get(&self, index: usize) -> Option<&ViewModelRef> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ViewModelRef> + ExactSizeIterator {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ViewModelRef] {
        &self.0
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|vm| vm.id()).collect()
    }

    pub fn position(&self, vm: &ViewModelRef) -> Option<usize> {
        self.0.iter().position(|e| same_view_model(e, vm))
    }

    pub fn contains(&self, vm: &ViewModelRef) -> bool {
        self.position(vm).is_some()
    }

    pub fn pushed(&self, vm: ViewModelRef) -> Self {
        Self(self.0.iter().cloned().chain(std::iter::once(vm)).collect())
    }

    /// The snapshot without its top, and the removed top.
    pub fn popped(&self) -> Option<(Self, ViewModelRef)> {
        let (top, rest) = self.0.split_last()?;
        Some((Self(rest.into()), top.clone()))
    }

    /// The first `len` entries; the retained entries keep their identity.
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].into())
    }
}

impl Default for StackSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Snapshots are equal when they hold the same view models, by identity, in order.
impl PartialEq for StackSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(a, b)| same_view_model(a, b))
    }
}

impl Eq for StackSnapshot {}

impl fmt::Debug for StackSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl Serialize for StackSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|vm| vm.id()))
    }
}

impl<'a> IntoIterator for &'a StackSnapshot {
    type Item = &'a ViewModelRef;
    type IntoIter = std::slice::Iter<'a, ViewModelRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ViewModelRef> for StackSnapshot {
    fn from_iter<I: IntoIterator<Item = ViewModelRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
