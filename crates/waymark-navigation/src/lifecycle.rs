use std::rc::Rc;

use waymark_core::{
    Events, LifecycleFailure, LifecycleHook, NavigationParameter, ViewModelRef, same_view_model,
};

/// Runs the optional lifecycle capabilities of view models.
///
/// Capability checks happen here and nowhere else. Hook failures are
/// isolated: each one is published on [`errors`](Self::errors) (or logged
/// when nobody listens) and the navigation that triggered it stands.
///
/// Ordering on every transition: the leaving view model is notified first,
/// then the entering one.
#[derive(Default)]
pub struct LifecycleDispatcher {
    errors: Events<LifecycleFailure>,
}

impl LifecycleDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Events<LifecycleFailure> {
        self.errors.clone()
    }

    pub fn can_navigate(&self, vm: &ViewModelRef, parameter: &NavigationParameter) -> bool {
        vm.navigation_guard()
            .is_none_or(|guard| guard.can_navigate(parameter))
    }

    pub fn navigating_to(&self, vm: &ViewModelRef, parameter: &NavigationParameter) {
        self.run(vm, LifecycleHook::NavigatingTo, parameter);
    }

    pub fn navigated_to(&self, vm: &ViewModelRef, parameter: &NavigationParameter) {
        self.run(vm, LifecycleHook::NavigatedTo, parameter);
    }

    pub fn navigated_from(&self, vm: &ViewModelRef, parameter: &NavigationParameter) {
        self.run(vm, LifecycleHook::NavigatedFrom, parameter);
    }

    /// `from` on the leaving view model, then `to` on the entering one.
    /// Nothing is sent when both are the same entry.
    pub fn transition(
        &self,
        leaving: Option<&ViewModelRef>,
        entering: Option<&ViewModelRef>,
        parameter: &NavigationParameter,
    ) {
        if let (Some(l), Some(e)) = (leaving, entering)
            && same_view_model(l, e)
        {
            return;
        }
        if let Some(vm) = leaving {
            self.navigated_from(vm, parameter);
        }
        if let Some(vm) = entering {
            self.navigated_to(vm, parameter);
        }
    }

    pub fn destroy(&self, vm: &ViewModelRef) {
        if let Some(d) = vm.capabilities().destructible() {
            log::trace!("destroying '{}'", vm.id());
            d.destroy();
        }
    }

    fn run(&self, vm: &ViewModelRef, hook: LifecycleHook, parameter: &NavigationParameter) {
        let Some(navigable) = vm.capabilities().navigable() else {
            return;
        };
        let result = match hook {
            LifecycleHook::NavigatingTo => navigable.when_navigating_to(parameter),
            LifecycleHook::NavigatedTo => navigable.when_navigated_to(parameter),
            LifecycleHook::NavigatedFrom => navigable.when_navigated_from(parameter),
        };
        if let Err(error) = result {
            self.report(LifecycleFailure {
                view_model: vm.id().to_string(),
                hook,
                error: Rc::new(error),
            });
        }
    }

    fn report(&self, failure: LifecycleFailure) {
        if self.errors.has_subscribers() {
            self.errors.emit(failure);
        } else {
            log::error!("{failure}");
        }
    }
}
