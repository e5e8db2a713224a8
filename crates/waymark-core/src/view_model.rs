//! View-model identity and the optional capabilities the navigation
//! pipeline knows how to drive.
//!
//! A view model opts into lifecycle notifications by returning the matching
//! [`Capabilities`] variant; nothing is discovered by inspecting types at
//! runtime.
//!
//! ```rust
//! use waymark_core::*;
//!
//! struct Detail {
//!     id: String,
//! }
//!
//! impl ViewModel for Detail {
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//!     fn capabilities(&self) -> Capabilities<'_> {
//!         Capabilities::Navigable(self)
//!     }
//! }
//!
//! impl Navigable for Detail {
//!     fn when_navigated_to(&self, parameter: &NavigationParameter) -> anyhow::Result<()> {
//!         let _user = parameter.get::<u32>("user")?;
//!         Ok(())
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::NavigationParameter;

pub trait ViewModel: Any {
    /// Stable identity used in logs and stack dumps.
    fn id(&self) -> &str;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::Plain
    }

    /// Optional veto consulted before a forward transition.
    fn navigation_guard(&self) -> Option<&dyn NavigationGuard> {
        None
    }
}

pub type ViewModelRef = Rc<dyn ViewModel>;

/// Identity comparison; two view models with equal ids are still distinct entries.
pub fn same_view_model(a: &ViewModelRef, b: &ViewModelRef) -> bool {
    Rc::ptr_eq(a, b)
}

impl fmt::Debug for dyn ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewModel").field(&self.id()).finish()
    }
}

#[derive(Clone, Copy)]
pub enum Capabilities<'a> {
    Plain,
    Navigable(&'a dyn Navigable),
    Destructible(&'a dyn Destructible),
    NavigableAndDestructible(&'a dyn Navigable, &'a dyn Destructible),
}

impl<'a> Capabilities<'a> {
    pub fn navigable(self) -> Option<&'a dyn Navigable> {
        match self {
            Self::Navigable(n) | Self::NavigableAndDestructible(n, _) => Some(n),
            Self::Plain | Self::Destructible(_) => None,
        }
    }

    pub fn destructible(self) -> Option<&'a dyn Destructible> {
        match self {
            Self::Destructible(d) | Self::NavigableAndDestructible(_, d) => Some(d),
            Self::Plain | Self::Navigable(_) => None,
        }
    }

    pub fn is_plain(self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// Navigation lifecycle notifications. Every hook defaults to a no-op.
///
/// Hooks are notifications: an `Err` is reported on the lifecycle error
/// channel and never cancels or rolls back the transition.
pub trait Navigable {
    /// Before a forward transition commits.
    fn when_navigating_to(&self, _parameter: &NavigationParameter) -> anyhow::Result<()> {
        Ok(())
    }

    /// After this view model became the top of its stack.
    fn when_navigated_to(&self, _parameter: &NavigationParameter) -> anyhow::Result<()> {
        Ok(())
    }

    /// After this view model stopped being the top of its stack.
    fn when_navigated_from(&self, _parameter: &NavigationParameter) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Called once when the view model is irrevocably removed from a stack.
pub trait Destructible {
    fn destroy(&self);
}

pub trait NavigationGuard {
    /// `false` blocks the transition before anything is resolved or pushed.
    fn can_navigate(&self, parameter: &NavigationParameter) -> bool;
}
