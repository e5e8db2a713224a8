//! Explicit registration context mapping view models to views.
//!
//! Built during application setup and handed to the view-stack service;
//! there is no global locator.
//!
//! ```rust
//! use std::rc::Rc;
//! use waymark_core::ViewModel;
//! use waymark_navigation::{BoundView, ViewLocator};
//!
//! struct Home;
//! impl ViewModel for Home {
//!     fn id(&self) -> &str {
//!         "home"
//!     }
//! }
//!
//! let mut locator = ViewLocator::new();
//! locator.register::<Home, _>(None, |vm| BoundView::new(vm, None));
//!
//! let vm: Rc<dyn ViewModel> = Rc::new(Home);
//! assert!(locator.resolve(&vm, None).is_ok());
//! assert!(matches!(
//!     locator.resolve(&vm, Some("compact")),
//!     Err(e) if e.is_configuration()
//! ));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use waymark_core::{NavigationError, ViewModel, ViewModelRef};

use crate::view::ViewFor;

type ViewFactory = Box<dyn Fn(ViewModelRef) -> Option<Box<dyn ViewFor>>>;
type ViewModelFactory = Box<dyn Fn() -> Rc<dyn Any>>;

struct ViewRegistration {
    view_type: &'static str,
    factory: ViewFactory,
}

#[derive(Default)]
pub struct ViewLocator {
    views: HashMap<(TypeId, Option<String>), ViewRegistration>,
    view_models: HashMap<TypeId, ViewModelFactory>,
}

fn view_model_type(vm: &ViewModelRef) -> TypeId {
    let any: &dyn Any = &**vm;
    any.type_id()
}

impl ViewLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the view built for `VM` under `contract`. A later
    /// registration for the same pair replaces the earlier one.
    pub fn register<VM, V>(
        &mut self,
        contract: Option<&str>,
        factory: impl Fn(Rc<VM>) -> V + 'static,
    ) -> &mut Self
    where
        VM: ViewModel,
        V: ViewFor,
    {
        let key = (TypeId::of::<VM>(), contract.map(str::to_string));
        let factory: ViewFactory = Box::new(move |vm: ViewModelRef| {
            let any: Rc<dyn Any> = vm;
            let vm = any.downcast::<VM>().ok()?;
            Some(Box::new(factory(vm)) as Box<dyn ViewFor>)
        });
        let previous = self.views.insert(
            key,
            ViewRegistration {
                view_type: std::any::type_name::<V>(),
                factory,
            },
        );
        if previous.is_some() {
            log::debug!(
                "view registration for {} (contract {:?}) replaced",
                std::any::type_name::<VM>(),
                contract
            );
        }
        self
    }

    pub fn is_registered(&self, vm: &ViewModelRef, contract: Option<&str>) -> bool {
        self.views
            .contains_key(&(view_model_type(vm), contract.map(str::to_string)))
    }

    /// Build the view for `vm`. A missing registration is a wiring defect and
    /// fails with `NavigationError::ViewNotRegistered`.
    pub fn resolve(
        &self,
        vm: &ViewModelRef,
        contract: Option<&str>,
    ) -> Result<Box<dyn ViewFor>, NavigationError> {
        let not_registered = || NavigationError::ViewNotRegistered {
            view_model: vm.type_name(),
            contract: contract.map(str::to_string),
        };
        let key = (view_model_type(vm), contract.map(str::to_string));
        let registration = self.views.get(&key).ok_or_else(not_registered)?;
        let view = (registration.factory)(vm.clone()).ok_or_else(not_registered)?;
        log::trace!("resolved {} for '{}'", registration.view_type, vm.id());
        Ok(view)
    }

    /// Register how to construct `VM` for `ViewStackService::push_page_of`.
    pub fn register_view_model<VM: ViewModel>(
        &mut self,
        factory: impl Fn() -> VM + 'static,
    ) -> &mut Self {
        self.view_models.insert(
            TypeId::of::<VM>(),
            Box::new(move || Rc::new(factory()) as Rc<dyn Any>),
        );
        self
    }

    pub fn create_view_model<VM: ViewModel>(&self) -> Result<Rc<VM>, NavigationError> {
        let not_registered = || NavigationError::ViewModelNotRegistered {
            view_model: std::any::type_name::<VM>(),
        };
        let factory = self
            .view_models
            .get(&TypeId::of::<VM>())
            .ok_or_else(not_registered)?;
        factory().downcast::<VM>().map_err(|_| not_registered())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
