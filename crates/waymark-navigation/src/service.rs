use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use waymark_core::{
    Events, LifecycleFailure, NavigationConfig, NavigationError, NavigationParameter, Signal,
    StackSnapshot, Subscription, ViewModel, ViewModelRef, same_view_model,
};

use crate::lifecycle::LifecycleDispatcher;
use crate::locator::ViewLocator;
use crate::view::NavigationView;

/// Per-call options for page pushes.
#[derive(Clone, Debug)]
pub struct PageOptions {
    pub contract: Option<String>,
    /// Replace the whole page stack with the pushed page.
    pub reset_stack: bool,
    pub animate: bool,
    pub parameter: NavigationParameter,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            contract: None,
            reset_stack: false,
            animate: true,
            parameter: NavigationParameter::new(),
        }
    }
}

impl PageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NavigationConfig) -> Self {
        Self {
            animate: config.animate,
            ..Self::default()
        }
    }

    pub fn contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    pub fn reset_stack(mut self, reset: bool) -> Self {
        self.reset_stack = reset;
        self
    }

    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn parameter(mut self, parameter: NavigationParameter) -> Self {
        self.parameter = parameter;
        self
    }
}

/// Per-call options for modal pushes.
#[derive(Clone, Debug)]
pub struct ModalOptions {
    pub contract: Option<String>,
    /// Wrap the modal in its own navigation page.
    pub with_navigation_page: bool,
    pub parameter: NavigationParameter,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            contract: None,
            with_navigation_page: true,
            parameter: NavigationParameter::new(),
        }
    }
}

impl ModalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NavigationConfig) -> Self {
        Self {
            with_navigation_page: config.with_navigation_page,
            ..Self::default()
        }
    }

    pub fn contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    pub fn with_navigation_page(mut self, with: bool) -> Self {
        self.with_navigation_page = with;
        self
    }

    pub fn parameter(mut self, parameter: NavigationParameter) -> Self {
        self.parameter = parameter;
        self
    }
}

/// The single source of truth for what a navigation root displays.
///
/// Owns a page stack and a modal stack, drives the host `V` through every
/// transition, and publishes a complete new snapshot after each one. A
/// snapshot changes only after the host acknowledged the transition; a
/// failed transition leaves both stacks as they were.
///
/// Calls against one service must be serialized: await each operation
/// before issuing the next. Like the host it drives, the service belongs to
/// one UI thread.
pub struct ViewStackService<V: NavigationView + 'static>(Rc<Inner<V>>);

struct Inner<V: NavigationView + 'static> {
    view: V,
    locator: ViewLocator,
    lifecycle: LifecycleDispatcher,
    config: NavigationConfig,
    page_stack: Signal<StackSnapshot>,
    modal_stack: Signal<StackSnapshot>,
    _page_popped: Subscription,
}

impl<V: NavigationView + 'static> Clone for ViewStackService<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

type Removed = SmallVec<[ViewModelRef; 4]>;

impl<V: NavigationView + 'static> ViewStackService<V> {
    pub fn new(view: V, locator: ViewLocator) -> Self {
        Self::with_config(view, locator, NavigationConfig::default())
    }

    pub fn with_config(view: V, locator: ViewLocator, config: NavigationConfig) -> Self {
        Self(Rc::new_cyclic(|weak: &Weak<Inner<V>>| {
            let weak = weak.clone();
            let page_popped = view.page_popped().subscribe(move |vm: &ViewModelRef| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_page_popped(vm);
                }
            });
            Inner {
                view,
                locator,
                lifecycle: LifecycleDispatcher::new(),
                config,
                page_stack: Signal::new(StackSnapshot::empty()),
                modal_stack: Signal::new(StackSnapshot::empty()),
                _page_popped: page_popped,
            }
        }))
    }

    pub fn view(&self) -> &V {
        &self.0.view
    }

    pub fn locator(&self) -> &ViewLocator {
        &self.0.locator
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.0.config
    }

    /// Options seeded from this service's configuration.
    pub fn page_options(&self) -> PageOptions {
        PageOptions::from_config(&self.0.config)
    }

    pub fn modal_options(&self) -> ModalOptions {
        ModalOptions::from_config(&self.0.config)
    }

    /// The page stack, root first. Subscribers get the current snapshot
    /// immediately and every later one in mutation order.
    pub fn page_stack(&self) -> Signal<StackSnapshot> {
        self.0.page_stack.clone()
    }

    pub fn modal_stack(&self) -> Signal<StackSnapshot> {
        self.0.modal_stack.clone()
    }

    pub fn page_count(&self) -> usize {
        self.0.page_stack.with(StackSnapshot::len)
    }

    pub fn modal_count(&self) -> usize {
        self.0.modal_stack.with(StackSnapshot::len)
    }

    /// Failures raised by view-model lifecycle hooks.
    pub fn lifecycle_errors(&self) -> Events<LifecycleFailure> {
        self.0.lifecycle.errors()
    }

    pub fn top_page(&self) -> Result<ViewModelRef, NavigationError> {
        self.0
            .page_stack
            .with(|s| s.top().cloned())
            .ok_or(NavigationError::EmptyPageStack)
    }

    pub fn top_modal(&self) -> Result<ViewModelRef, NavigationError> {
        self.0
            .modal_stack
            .with(|s| s.top().cloned())
            .ok_or(NavigationError::EmptyModalStack)
    }

    pub async fn push_page(
        &self,
        view_model: ViewModelRef,
        options: PageOptions,
    ) -> Result<(), NavigationError> {
        let inner = &self.0;
        let PageOptions {
            contract,
            reset_stack,
            animate,
            parameter,
        } = options;

        inner.check_guard(&view_model, &parameter)?;
        let view = inner.locator.resolve(&view_model, contract.as_deref())?;
        inner.lifecycle.navigating_to(&view_model, &parameter);

        inner
            .view
            .push_page(view, reset_stack, inner.page_animation(animate))
            .await
            .map_err(|e| NavigationError::platform("push_page", e))?;

        let previous = inner.page_stack.get();
        let (next, removed): (StackSnapshot, Removed) = if reset_stack {
            let removed = previous.iter().cloned().collect();
            (StackSnapshot::single(view_model.clone()), removed)
        } else {
            (previous.pushed(view_model.clone()), Removed::new())
        };
        inner.page_stack.set(next);
        log::debug!(
            "pushed page '{}' (depth {}{})",
            view_model.id(),
            inner.page_count(),
            if reset_stack { ", reset" } else { "" }
        );

        if inner.modal_count() == 0 {
            inner
                .lifecycle
                .transition(previous.top(), Some(&view_model), &parameter);
        }
        inner.destroy_removed(&removed);
        Ok(())
    }

    /// Construct `VM` with the locator's view-model factory and push it.
    pub async fn push_page_of<VM: ViewModel>(
        &self,
        options: PageOptions,
    ) -> Result<Rc<VM>, NavigationError> {
        let vm = self.0.locator.create_view_model::<VM>()?;
        self.push_page(vm.clone(), options).await?;
        Ok(vm)
    }

    pub async fn pop_page(&self, animate: bool) -> Result<(), NavigationError> {
        self.pop_page_with(NavigationParameter::new(), animate).await
    }

    /// Pop the top page, handing `parameter` to the leaving and entering
    /// view models. The root page cannot be popped.
    pub async fn pop_page_with(
        &self,
        parameter: NavigationParameter,
        animate: bool,
    ) -> Result<(), NavigationError> {
        let inner = &self.0;
        match inner.page_count() {
            0 => return Err(NavigationError::EmptyPageStack),
            1 => return Err(NavigationError::PopRoot),
            _ => {}
        }

        inner
            .view
            .pop_page(inner.page_animation(animate))
            .await
            .map_err(|e| NavigationError::platform("pop_page", e))?;

        let current = inner.page_stack.get();
        if current.len() <= 1 {
            // the host reported a system pop while ours was in flight
            log::warn!("page stack already at root after pop; nothing to remove");
            return Ok(());
        }
        let Some((rest, removed)) = current.popped() else {
            return Err(NavigationError::EmptyPageStack);
        };
        inner.page_stack.set(rest.clone());
        log::debug!("popped page '{}' (depth {})", removed.id(), rest.len());

        if inner.modal_count() == 0 {
            inner
                .lifecycle
                .transition(Some(&removed), rest.top(), &parameter);
        }
        inner.destroy_removed(&[removed]);
        Ok(())
    }

    pub async fn pop_to_root_page(&self, animate: bool) -> Result<(), NavigationError> {
        self.pop_to_root_page_with(NavigationParameter::new(), animate)
            .await
    }

    /// Collapse the page stack to its root. The root entry is kept as is;
    /// every other instance above it is destroyed once, root side first.
    pub async fn pop_to_root_page_with(
        &self,
        parameter: NavigationParameter,
        animate: bool,
    ) -> Result<(), NavigationError> {
        let inner = &self.0;
        match inner.page_count() {
            0 => return Err(NavigationError::EmptyPageStack),
            1 => return Ok(()),
            _ => {}
        }

        inner
            .view
            .pop_to_root_page(inner.page_animation(animate))
            .await
            .map_err(|e| NavigationError::platform("pop_to_root_page", e))?;

        let current = inner.page_stack.get();
        let root = current.truncated(1);
        inner.page_stack.set(root.clone());
        log::debug!(
            "popped {} page(s) to root '{}'",
            current.len() - root.len(),
            root.top().map(|vm| vm.id()).unwrap_or_default()
        );

        if inner.modal_count() == 0 {
            inner
                .lifecycle
                .transition(current.top(), root.top(), &parameter);
        }
        inner.destroy_removed(&current.as_slice()[1..]);
        Ok(())
    }

    pub async fn push_modal(
        &self,
        view_model: ViewModelRef,
        options: ModalOptions,
    ) -> Result<(), NavigationError> {
        let inner = &self.0;
        let ModalOptions {
            contract,
            with_navigation_page,
            parameter,
        } = options;

        inner.check_guard(&view_model, &parameter)?;
        let view = inner.locator.resolve(&view_model, contract.as_deref())?;
        inner.lifecycle.navigating_to(&view_model, &parameter);

        inner
            .view
            .push_modal(view, with_navigation_page)
            .await
            .map_err(|e| NavigationError::platform("push_modal", e))?;

        let leaving = inner.visible_top();
        inner
            .modal_stack
            .update(|s| *s = s.pushed(view_model.clone()));
        log::debug!(
            "pushed modal '{}' (depth {})",
            view_model.id(),
            inner.modal_count()
        );

        inner
            .lifecycle
            .transition(leaving.as_ref(), Some(&view_model), &parameter);
        Ok(())
    }

    pub async fn push_modal_of<VM: ViewModel>(
        &self,
        options: ModalOptions,
    ) -> Result<Rc<VM>, NavigationError> {
        let vm = self.0.locator.create_view_model::<VM>()?;
        self.push_modal(vm.clone(), options).await?;
        Ok(vm)
    }

    pub async fn pop_modal(&self) -> Result<(), NavigationError> {
        self.pop_modal_with(NavigationParameter::new()).await
    }

    pub async fn pop_modal_with(
        &self,
        parameter: NavigationParameter,
    ) -> Result<(), NavigationError> {
        let inner = &self.0;
        if inner.modal_count() == 0 {
            return Err(NavigationError::EmptyModalStack);
        }

        inner
            .view
            .pop_modal()
            .await
            .map_err(|e| NavigationError::platform("pop_modal", e))?;

        let Some((rest, removed)) = inner.modal_stack.get().popped() else {
            return Err(NavigationError::EmptyModalStack);
        };
        inner.modal_stack.set(rest);
        log::debug!(
            "popped modal '{}' (depth {})",
            removed.id(),
            inner.modal_count()
        );

        let entering = inner.visible_top();
        inner
            .lifecycle
            .transition(Some(&removed), entering.as_ref(), &parameter);
        inner.destroy_removed(&[removed]);
        Ok(())
    }
}

impl<V: NavigationView + 'static> Inner<V> {
    fn page_count(&self) -> usize {
        self.page_stack.with(StackSnapshot::len)
    }

    fn modal_count(&self) -> usize {
        self.modal_stack.with(StackSnapshot::len)
    }

    /// Page transitions are hidden behind any open modal, so they never animate then.
    fn page_animation(&self, requested: bool) -> bool {
        requested && self.modal_count() == 0
    }

    /// Top modal if one is open, else the top page.
    fn visible_top(&self) -> Option<ViewModelRef> {
        self.modal_stack
            .with(|s| s.top().cloned())
            .or_else(|| self.page_stack.with(|s| s.top().cloned()))
    }

    fn check_guard(
        &self,
        vm: &ViewModelRef,
        parameter: &NavigationParameter,
    ) -> Result<(), NavigationError> {
        if self.lifecycle.can_navigate(vm, parameter) {
            Ok(())
        } else {
            log::warn!("navigation to '{}' refused by its guard", vm.id());
            Err(NavigationError::Blocked {
                view_model: vm.id().to_string(),
            })
        }
    }

    /// Reconcile a pop the host performed on its own.
    fn on_page_popped(&self, popped: &ViewModelRef) {
        let current = self.page_stack.get();
        let is_top = current.top().is_some_and(|top| same_view_model(top, popped));
        if !is_top {
            log::warn!(
                "host popped '{}', which is not the top page; ignored",
                popped.id()
            );
            return;
        }
        if current.len() == 1 {
            log::warn!("host popped the root page '{}'; ignored", popped.id());
            return;
        }
        let Some((rest, removed)) = current.popped() else {
            return;
        };
        self.page_stack.set(rest.clone());
        log::debug!(
            "host popped page '{}' (depth {})",
            removed.id(),
            rest.len()
        );

        if self.modal_count() == 0 {
            self.lifecycle
                .transition(Some(&removed), rest.top(), &NavigationParameter::new());
        }
        self.destroy_removed(&[removed]);
    }

    /// Destroy view models taken off a stack, each once, skipping any
    /// instance that is still on either stack.
    fn destroy_removed(&self, removed: &[ViewModelRef]) {
        let mut done = Removed::new();
        for vm in removed {
            let kept = self.page_stack.with(|s| s.contains(vm))
                || self.modal_stack.with(|s| s.contains(vm));
            if kept || done.iter().any(|d| same_view_model(d, vm)) {
                continue;
            }
            self.lifecycle.destroy(vm);
            done.push(vm.clone());
        }
    }
}
