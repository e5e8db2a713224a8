//! # View-stack navigation
//!
//! View models navigate through a [`ViewStackService`] without knowing which
//! UI toolkit shows them. The service keeps the logical page and modal
//! stacks; a [`NavigationView`] host performs the visual transitions.
//!
//! ```rust
//! use std::rc::Rc;
//! use waymark_core::*;
//! use waymark_navigation::*;
//!
//! struct Screen(&'static str);
//! impl ViewModel for Screen {
//!     fn id(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let mut locator = ViewLocator::new();
//! locator.register::<Screen, _>(None, |vm| BoundView::new(vm, None));
//!
//! let surface = NavigationSurface::with_callback(
//!     |_: &SurfaceTransition| -> anyhow::Result<()> { Ok(()) },
//! );
//! let nav = ViewStackService::new(surface, locator);
//!
//! pollster::block_on(async {
//!     nav.push_page(Rc::new(Screen("home")), PageOptions::new()).await.unwrap();
//!     nav.push_page(Rc::new(Screen("detail")), PageOptions::new()).await.unwrap();
//!     nav.pop_to_root_page(true).await.unwrap();
//! });
//! assert_eq!(nav.page_stack().get().ids(), vec!["home"]);
//! ```
//!
//! ## Ordering
//!
//! A stack snapshot is published only after the host finished the
//! transition. Lifecycle hooks run after that, leaving view model first,
//! then the entering one; view models removed from a stack are destroyed
//! last, once, and only if no stack still holds them.
//!
//! While a modal is open, page transitions never animate and send no
//! lifecycle notifications: the modal is what is visible. Closing the last
//! modal notifies whichever page is on top by then.

pub mod lifecycle;
pub mod locator;
pub mod service;
pub mod surface;
pub mod view;

pub use lifecycle::LifecycleDispatcher;
pub use locator::ViewLocator;
pub use service::{ModalOptions, PageOptions, ViewStackService};
pub use surface::{
    FnRenderer, Layer, NavigationSurface, SurfaceRenderer, SurfaceTransition, TransitionDir,
};
pub use view::{BoundView, NavigationView, ViewFor, downcast_view};
