//! # Signals, snapshots, and view-model contracts
//!
//! `waymark-core` holds the UI-agnostic pieces the navigation service is
//! built from:
//!
//! - `Signal<T>`: observable value; subscribers get the latest value on
//!   subscribe, then every change, in mutation order.
//! - `Events<T>`: broadcast of discrete events with no replay.
//! - `StackSnapshot`: immutable copy of a navigation stack.
//! - `ViewModel` and its optional capabilities (`Navigable`, `Destructible`,
//!   `NavigationGuard`).
//! - `NavigationParameter`: the key/value bag passed to lifecycle hooks.
//!
//! ## Signals
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use waymark_core::*;
//!
//! let depth = signal(1usize);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sub = depth.subscribe({
//!     let seen = seen.clone();
//!     move |d| seen.borrow_mut().push(*d)
//! });
//! depth.set(2);
//! drop(sub);
//! depth.set(3);
//!
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! ```
//!
//! Everything here is single-threaded (`Rc`/`RefCell`): a navigation root
//! lives on its UI thread and work from other threads has to be marshalled
//! there first.

pub mod config;
pub mod effects;
pub mod error;
pub mod parameter;
pub mod prelude;
pub mod signal;
pub mod snapshot;
pub mod view_model;

pub use config::*;
pub use effects::*;
pub use error::*;
pub use parameter::*;
pub use signal::*;
pub use snapshot::*;
pub use view_model::*;
