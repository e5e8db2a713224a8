//! One navigation host for every platform.
//!
//! `NavigationSurface` keeps the visual page and modal stacks and describes
//! each transition to a [`SurfaceRenderer`], the only platform-specific part.
//! A renderer can be a type or a plain closure:
//!
//! ```rust
//! use waymark_navigation::{NavigationSurface, SurfaceTransition, TransitionDir};
//!
//! let surface = NavigationSurface::with_callback(
//!     |t: &SurfaceTransition| -> anyhow::Result<()> {
//!         if t.dir == TransitionDir::Push {
//!             // start the platform animation for t.entering ...
//!         }
//!         Ok(())
//!     },
//! );
//! assert_eq!(surface.page_count(), 0);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::bail;
use async_trait::async_trait;
use waymark_core::{Events, NavTransition, ViewModelRef};

use crate::view::{NavigationView, ViewFor};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionDir {
    None,
    Push,
    Pop,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Layer {
    Page,
    Modal,
}

/// Everything a renderer needs to show one transition.
#[derive(Clone)]
pub struct SurfaceTransition {
    pub layer: Layer,
    pub dir: TransitionDir,
    pub animate: bool,
    /// A push that replaces the whole page stack.
    pub reset: bool,
    /// Only meaningful for modal pushes.
    pub with_navigation_page: bool,
    /// The view visible once the transition is done.
    pub entering: Option<Rc<dyn ViewFor>>,
    /// The view visible before it.
    pub leaving: Option<Rc<dyn ViewFor>>,
    /// Depth of the affected stack after the transition.
    pub depth: usize,
    pub spec: NavTransition,
}

impl SurfaceTransition {
    pub fn entering_id(&self) -> Option<&str> {
        self.entering.as_ref().map(|v| v.view_model().id())
    }

    pub fn leaving_id(&self) -> Option<&str> {
        self.leaving.as_ref().map(|v| v.view_model().id())
    }
}

#[async_trait(?Send)]
pub trait SurfaceRenderer {
    /// Perform the transition; resolve once it is on screen.
    async fn render(&self, transition: &SurfaceTransition) -> anyhow::Result<()>;
}

/// Adapts a synchronous callback into a renderer.
pub struct FnRenderer<F>(pub F);

#[async_trait(?Send)]
impl<F> SurfaceRenderer for FnRenderer<F>
where
    F: Fn(&SurfaceTransition) -> anyhow::Result<()>,
{
    async fn render(&self, transition: &SurfaceTransition) -> anyhow::Result<()> {
        (self.0)(transition)
    }
}

pub struct NavigationSurface<R> {
    renderer: R,
    transition: NavTransition,
    pages: RefCell<Vec<Rc<dyn ViewFor>>>,
    modals: RefCell<Vec<Rc<dyn ViewFor>>>,
    popped: Events<ViewModelRef>,
    last_dir: Cell<TransitionDir>,
}

impl<F> NavigationSurface<FnRenderer<F>>
where
    F: Fn(&SurfaceTransition) -> anyhow::Result<()>,
{
    pub fn with_callback(f: F) -> Self {
        Self::new(FnRenderer(f))
    }
}

impl<R: SurfaceRenderer> NavigationSurface<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_transition(renderer, NavTransition::default())
    }

    pub fn with_transition(renderer: R, transition: NavTransition) -> Self {
        Self {
            renderer,
            transition,
            pages: RefCell::new(Vec::new()),
            modals: RefCell::new(Vec::new()),
            popped: Events::new(),
            last_dir: Cell::new(TransitionDir::None),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn page_count(&self) -> usize {
        self.pages.borrow().len()
    }

    pub fn modal_count(&self) -> usize {
        self.modals.borrow().len()
    }

    pub fn last_dir(&self) -> TransitionDir {
        self.last_dir.get()
    }

    /// Ids of the shown pages, root first.
    pub fn page_ids(&self) -> Vec<String> {
        ids(&self.pages.borrow())
    }

    pub fn modal_ids(&self) -> Vec<String> {
        ids(&self.modals.borrow())
    }

    /// Back button or swipe: pop the top page on the host's own initiative
    /// and report it through `page_popped`.
    ///
    /// Returns `false` when there is nothing to go back to, or while a modal
    /// covers the pages.
    pub async fn system_back(&self) -> anyhow::Result<bool> {
        if self.modal_count() > 0 {
            log::debug!("back ignored while a modal is shown");
            return Ok(false);
        }
        let (leaving, entering) = {
            let pages = self.pages.borrow();
            if pages.len() <= 1 {
                return Ok(false);
            }
            (pages[pages.len() - 1].clone(), pages[pages.len() - 2].clone())
        };
        let depth = self.page_count() - 1;
        self.render(
            Layer::Page,
            TransitionDir::Pop,
            true,
            Some(entering),
            Some(leaving.clone()),
            depth,
        )
        .await?;
        self.pages.borrow_mut().pop();
        self.popped.emit(leaving.view_model().clone());
        Ok(true)
    }

    async fn render(
        &self,
        layer: Layer,
        dir: TransitionDir,
        animate: bool,
        entering: Option<Rc<dyn ViewFor>>,
        leaving: Option<Rc<dyn ViewFor>>,
        depth: usize,
    ) -> anyhow::Result<()> {
        self.render_with(SurfaceTransition {
            layer,
            dir,
            animate,
            reset: false,
            with_navigation_page: false,
            entering,
            leaving,
            depth,
            spec: self.transition,
        })
        .await
    }

    async fn render_with(&self, transition: SurfaceTransition) -> anyhow::Result<()> {
        self.renderer.render(&transition).await?;
        self.last_dir.set(transition.dir);
        Ok(())
    }

    fn top_page(&self) -> Option<Rc<dyn ViewFor>> {
        self.pages.borrow().last().cloned()
    }

    fn top_modal(&self) -> Option<Rc<dyn ViewFor>> {
        self.modals.borrow().last().cloned()
    }
}

fn ids(views: &[Rc<dyn ViewFor>]) -> Vec<String> {
    views
        .iter()
        .map(|v| v.view_model().id().to_string())
        .collect()
}

#[async_trait(?Send)]
impl<R: SurfaceRenderer> NavigationView for NavigationSurface<R> {
    async fn push_page(
        &self,
        view: Box<dyn ViewFor>,
        reset_stack: bool,
        animate: bool,
    ) -> anyhow::Result<()> {
        let view: Rc<dyn ViewFor> = view.into();
        let depth = if reset_stack { 1 } else { self.page_count() + 1 };
        self.render_with(SurfaceTransition {
            layer: Layer::Page,
            dir: TransitionDir::Push,
            animate: animate && self.modal_count() == 0,
            reset: reset_stack,
            with_navigation_page: false,
            entering: Some(view.clone()),
            leaving: self.top_page(),
            depth,
            spec: self.transition,
        })
        .await?;

        let mut pages = self.pages.borrow_mut();
        if reset_stack {
            pages.clear();
        }
        pages.push(view);
        Ok(())
    }

    async fn pop_page(&self, animate: bool) -> anyhow::Result<()> {
        let (leaving, entering) = {
            let pages = self.pages.borrow();
            if pages.len() <= 1 {
                bail!("no page to pop");
            }
            (pages[pages.len() - 1].clone(), pages[pages.len() - 2].clone())
        };
        let animate = animate && self.modal_count() == 0;
        let depth = self.page_count() - 1;
        self.render(
            Layer::Page,
            TransitionDir::Pop,
            animate,
            Some(entering),
            Some(leaving),
            depth,
        )
        .await?;
        self.pages.borrow_mut().pop();
        Ok(())
    }

    async fn pop_to_root_page(&self, animate: bool) -> anyhow::Result<()> {
        let Some(root) = self.pages.borrow().first().cloned() else {
            bail!("no root page");
        };
        let animate = animate && self.modal_count() == 0;
        let leaving = self.top_page();
        self.render(Layer::Page, TransitionDir::Pop, animate, Some(root), leaving, 1)
            .await?;
        self.pages.borrow_mut().truncate(1);
        Ok(())
    }

    async fn push_modal(
        &self,
        view: Box<dyn ViewFor>,
        with_navigation_page: bool,
    ) -> anyhow::Result<()> {
        let view: Rc<dyn ViewFor> = view.into();
        let leaving = self.top_modal().or_else(|| self.top_page());
        self.render_with(SurfaceTransition {
            layer: Layer::Modal,
            dir: TransitionDir::Push,
            animate: true,
            reset: false,
            with_navigation_page,
            entering: Some(view.clone()),
            leaving,
            depth: self.modal_count() + 1,
            spec: self.transition,
        })
        .await?;
        self.modals.borrow_mut().push(view);
        Ok(())
    }

    async fn pop_modal(&self) -> anyhow::Result<()> {
        let (leaving, entering) = {
            let modals = self.modals.borrow();
            let Some(leaving) = modals.last().cloned() else {
                bail!("no modal to pop");
            };
            let below = match modals.len() {
                n if n >= 2 => Some(modals[n - 2].clone()),
                _ => None,
            };
            (leaving, below)
        };
        let entering = entering.or_else(|| self.top_page());
        let depth = self.modal_count() - 1;
        self.render(
            Layer::Modal,
            TransitionDir::Pop,
            true,
            entering,
            Some(leaving),
            depth,
        )
        .await?;
        self.modals.borrow_mut().pop();
        Ok(())
    }

    fn page_popped(&self) -> Events<ViewModelRef> {
        self.popped.clone()
    }
}
