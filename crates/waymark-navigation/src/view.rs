use std::any::Any;
use std::rc::Rc;

use async_trait::async_trait;
use waymark_core::{Events, ViewModelRef};

/// A view resolved for one view model. The view holds its view model; the
/// stack owns the view while it is shown.
pub trait ViewFor: Any {
    fn view_model(&self) -> &ViewModelRef;

    fn contract(&self) -> Option<&str> {
        None
    }
}

/// Downcast a resolved view to the host's concrete type.
pub fn downcast_view<T: ViewFor>(view: &dyn ViewFor) -> Option<&T> {
    let any: &dyn Any = view;
    any.downcast_ref::<T>()
}

/// Plain `ViewFor` for hosts that only need the view model and contract.
pub struct BoundView {
    view_model: ViewModelRef,
    contract: Option<String>,
}

impl BoundView {
    pub fn new(view_model: ViewModelRef, contract: Option<&str>) -> Self {
        Self {
            view_model,
            contract: contract.map(str::to_string),
        }
    }
}

impl ViewFor for BoundView {
    fn view_model(&self) -> &ViewModelRef {
        &self.view_model
    }

    fn contract(&self) -> Option<&str> {
        self.contract.as_deref()
    }
}

/// What a UI host must provide for the view-stack service to drive it.
///
/// Every transition resolves once the host has finished it. `page_popped`
/// reports pops the host performed on its own (back button, swipe), never
/// the ones requested through this trait.
#[async_trait(?Send)]
pub trait NavigationView {
    async fn push_page(
        &self,
        view: Box<dyn ViewFor>,
        reset_stack: bool,
        animate: bool,
    ) -> anyhow::Result<()>;

    async fn pop_page(&self, animate: bool) -> anyhow::Result<()>;

    async fn pop_to_root_page(&self, animate: bool) -> anyhow::Result<()>;

    async fn push_modal(
        &self,
        view: Box<dyn ViewFor>,
        with_navigation_page: bool,
    ) -> anyhow::Result<()>;

    async fn pop_modal(&self) -> anyhow::Result<()>;

    fn page_popped(&self) -> Events<ViewModelRef>;
}

#[async_trait(?Send)]
impl<T: NavigationView + ?Sized> NavigationView for Rc<T> {
    async fn push_page(
        &self,
        view: Box<dyn ViewFor>,
        reset_stack: bool,
        animate: bool,
    ) -> anyhow::Result<()> {
        (**self).push_page(view, reset_stack, animate).await
    }

    async fn pop_page(&self, animate: bool) -> anyhow::Result<()> {
        (**self).pop_page(animate).await
    }

    async fn pop_to_root_page(&self, animate: bool) -> anyhow::Result<()> {
        (**self).pop_to_root_page(animate).await
    }

    async fn push_modal(
        &self,
        view: Box<dyn ViewFor>,
        with_navigation_page: bool,
    ) -> anyhow::Result<()> {
        (**self).push_modal(view, with_navigation_page).await
    }

    async fn pop_modal(&self) -> anyhow::Result<()> {
        (**self).pop_modal().await
    }

    fn page_popped(&self) -> Events<ViewModelRef> {
        (**self).page_popped()
    }
}
