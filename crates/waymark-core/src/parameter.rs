use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::ParameterError;

/// Immutable key/value bag handed from the navigating caller to the
/// lifecycle hooks of the view model being navigated to.
///
/// Values are opaque; lookups check both presence and type.
///
/// ```rust
/// use waymark_core::NavigationParameter;
///
/// let p = NavigationParameter::new().with("user", 7u32);
/// assert_eq!(*p.get::<u32>("user").unwrap(), 7);
/// assert!(p.get::<u32>("missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct NavigationParameter(Rc<HashMap<String, Rc<dyn Any>>>);

impl NavigationParameter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a bag with `key` set; clones sharing the old bag are unaffected.
    pub fn with<T: 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        Rc::make_mut(&mut self.0).insert(key.into(), Rc::new(value));
        self
    }

    pub fn get<T: 'static>(&self, key: &str) -> Result<&T, ParameterError> {
        let value = self.0.get(key).ok_or_else(|| ParameterError::Missing {
            key: key.to_string(),
        })?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| ParameterError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn try_get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.0.get(key)?.downcast_ref::<T>()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for NavigationParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("NavigationParameter")
            .field("keys", &keys)
            .finish()
    }
}
