use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use waymark_core::{StackSnapshot, Subscriptions};
use waymark_navigation::{NavigationView, ViewStackService};

#[derive(Default)]
struct State {
    pages: StackSnapshot,
    modals: StackSnapshot,
    mutations: u64,
    last_change: Option<Instant>,
}

impl State {
    fn record(&mut self) {
        self.mutations += 1;
        self.last_change = Some(Instant::now());
    }
}

/// Watches a `ViewStackService` and summarizes its stacks for a debug overlay
/// or a log line.
pub struct StackInspector {
    pub enabled: bool,
    state: Rc<RefCell<State>>,
    subs: Subscriptions,
}

impl StackInspector {
    pub fn attach<V: NavigationView + 'static>(service: &ViewStackService<V>) -> Self {
        let state = Rc::new(RefCell::new(State {
            pages: service.page_stack().get(),
            modals: service.modal_stack().get(),
            ..State::default()
        }));

        let pages = service.page_stack().subscribe_changes({
            let state = state.clone();
            move |s: &StackSnapshot| {
                let mut st = state.borrow_mut();
                st.pages = s.clone();
                st.record();
                log::trace!("inspector: page stack {:?}", s);
            }
        });
        let modals = service.modal_stack().subscribe_changes({
            let state = state.clone();
            move |s: &StackSnapshot| {
                let mut st = state.borrow_mut();
                st.modals = s.clone();
                st.record();
                log::trace!("inspector: modal stack {:?}", s);
            }
        });

        let mut subs = Subscriptions::new();
        subs.extend([pages, modals]);
        Self {
            enabled: true,
            state,
            subs,
        }
    }

    /// Stop following the service; the last seen snapshots stay readable.
    pub fn detach(&mut self) {
        self.subs.clear();
    }

    pub fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Committed snapshots seen since attaching, both stacks together.
    pub fn mutations(&self) -> u64 {
        self.state.borrow().mutations
    }

    pub fn pages(&self) -> StackSnapshot {
        self.state.borrow().pages.clone()
    }

    pub fn modals(&self) -> StackSnapshot {
        self.state.borrow().modals.clone()
    }

    pub fn since_last_change(&self) -> Option<Duration> {
        self.state.borrow().last_change.map(|t| t.elapsed())
    }

    /// `pages: home > detail | modals: - | mutations: 2`
    pub fn summary(&self) -> String {
        let st = self.state.borrow();
        format!(
            "pages: {} | modals: {} | mutations: {}",
            path(&st.pages),
            path(&st.modals),
            st.mutations
        )
    }

    /// The summary, or nothing while disabled.
    pub fn overlay(&self) -> Option<String> {
        self.enabled.then(|| self.summary())
    }
}

fn path(stack: &StackSnapshot) -> String {
    if stack.is_empty() {
        "-".to_string()
    } else {
        stack.ids().join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use waymark_core::ViewModel;
    use waymark_navigation::{
        BoundView, ModalOptions, NavigationSurface, PageOptions, SurfaceTransition, ViewLocator,
    };

    struct Screen(&'static str);

    impl ViewModel for Screen {
        fn id(&self) -> &str {
            self.0
        }
    }

    fn service() -> ViewStackService<impl NavigationView + 'static> {
        let mut locator = ViewLocator::new();
        locator.register::<Screen, _>(None, |vm| BoundView::new(vm, None));
        let surface =
            NavigationSurface::with_callback(|_: &SurfaceTransition| -> anyhow::Result<()> {
                Ok(())
            });
        ViewStackService::new(surface, locator)
    }

    #[test]
    fn test_inspector_starts_quiet() {
        let nav = service();
        let inspector = StackInspector::attach(&nav);
        assert_eq!(inspector.mutations(), 0);
        assert!(inspector.since_last_change().is_none());
        assert_eq!(inspector.summary(), "pages: - | modals: - | mutations: 0");
    }

    #[test]
    fn test_inspector_follows_mutations() {
        let nav = service();
        let inspector = StackInspector::attach(&nav);

        block_on(async {
            nav.push_page(Rc::new(Screen("home")), PageOptions::new())
                .await
                .unwrap();
            nav.push_page(Rc::new(Screen("detail")), PageOptions::new())
                .await
                .unwrap();
            nav.push_modal(Rc::new(Screen("login")), ModalOptions::new())
                .await
                .unwrap();
        });

        assert_eq!(inspector.mutations(), 3);
        assert_eq!(inspector.pages().ids(), vec!["home", "detail"]);
        assert!(inspector.since_last_change().is_some());
        assert_eq!(
            inspector.summary(),
            "pages: home > detail | modals: login | mutations: 3"
        );

        block_on(nav.pop_modal()).unwrap();
        assert!(inspector.modals().is_empty());
        assert_eq!(inspector.mutations(), 4);
    }

    #[test]
    fn test_overlay_toggles() {
        let nav = service();
        let mut inspector = StackInspector::attach(&nav);
        assert!(inspector.overlay().is_some());
        inspector.toggle();
        assert!(inspector.overlay().is_none());
    }

    #[test]
    fn test_detached_inspector_keeps_last_view() {
        let nav = service();
        let mut inspector = StackInspector::attach(&nav);
        block_on(nav.push_page(Rc::new(Screen("home")), PageOptions::new())).unwrap();

        inspector.detach();
        assert!(!inspector.is_attached());
        assert_eq!(nav.modal_stack().subscriber_count(), 0);
        block_on(nav.push_page(Rc::new(Screen("detail")), PageOptions::new())).unwrap();

        assert_eq!(inspector.mutations(), 1);
        assert_eq!(inspector.pages().ids(), vec!["home"]);
    }

    #[test]
    fn test_dropping_inspector_unsubscribes() {
        let nav = service();
        let before = nav.page_stack().subscriber_count();
        let inspector = StackInspector::attach(&nav);
        assert_eq!(nav.page_stack().subscriber_count(), before + 1);
        drop(inspector);
        assert_eq!(nav.page_stack().subscriber_count(), before);
    }
}
