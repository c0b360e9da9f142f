//! App Controller - Owns the content root and swaps pages into it.
//!
//! Two containers are created up front:
//!
//! - **root view** - where the active page is rendered
//! - **safe area** - fixed overlay for persistent widgets, untouched by swaps
//!
//! `run` appends both under the configured mount point.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_spa::{AppConfig, AppController, Multiplexer, Page, PathMux};
//!
//! let app = Rc::new(AppController::new(AppConfig::default())?);
//! let mux = PathMux::new();
//!
//! app.route(&mux, "/", Rc::new(Page::new()));
//! app.route_not_found(&mux, Rc::new(Page::new()));
//!
//! app.run()?;
//! mux.serve_and_listen();
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::host::node::{self, NodeId};
use crate::mux::Multiplexer;
use crate::page::{Page, PageError};
use crate::types::{callback, Callback, ListenerFault};

use super::config::AppConfig;
use super::AppError;

/// Application mount controller.
pub struct AppController {
    mount: NodeId,
    root_view: NodeId,
    safe_area_view: NodeId,
    current_page: RefCell<Option<Rc<Page>>>,
}

impl AppController {
    /// Build the root view and safe area from `config`.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let mount = config.app_mount.unwrap_or_else(node::body);

        let root_view = node::create_node("div");
        node::set_style(root_view, "position", "absolute")?;
        node::set_class(root_view, &config.root_view_class)?;

        let safe_area_view = node::create_node("div");
        node::set_class(safe_area_view, &config.safe_area_class)?;

        Ok(Self {
            mount,
            root_view,
            safe_area_view,
            current_page: RefCell::new(None),
        })
    }

    /// Attach the root view and safe area to the mount point.
    pub fn run(&self) -> Result<(), AppError> {
        node::append_child(self.mount, self.root_view)?;
        node::append_child(self.mount, self.safe_area_view)?;
        tracing::debug!(mount = %self.mount, "app mounted");
        Ok(())
    }

    /// Append static widgets to the safe area.
    pub fn render_widget(&self, widgets: &[NodeId]) -> Result<(), AppError> {
        for widget in widgets {
            node::append_child(self.safe_area_view, *widget)?;
        }
        Ok(())
    }

    /// Remove the active page (if any), then render `page` into the root view.
    ///
    /// The swap always completes unless the host rejects the attach. Listener
    /// faults from either side are collected into [`AppError::Listeners`]
    /// after the new page is active.
    ///
    /// A listener may swap again while this runs. Whatever page such a nested
    /// swap leaves active is removed as well, so `page` ends up the only page
    /// under the root view.
    pub fn swap_page_to(&self, page: Rc<Page>) -> Result<(), AppError> {
        let mut faults = Vec::new();

        self.retire_current(&mut faults)?;
        collect(page.render(self.root_view), &mut faults)?;
        // Render listeners may have swapped in another page before the attach
        self.retire_current(&mut faults)?;

        tracing::debug!(root = %page.root(), "page swapped");
        *self.current_page.borrow_mut() = Some(page);

        if faults.is_empty() {
            Ok(())
        } else {
            tracing::warn!(faults = faults.len(), "page swap completed with listener faults");
            Err(AppError::Listeners(faults))
        }
    }

    /// Remove the active page, and any page a nested swap activates meanwhile.
    fn retire_current(&self, faults: &mut Vec<ListenerFault>) -> Result<(), AppError> {
        loop {
            // Release the borrow before removing: remove listeners may swap again
            let active = self.current_page.borrow_mut().take();
            let Some(active) = active else {
                return Ok(());
            };
            collect(active.remove(), faults)?;
        }
    }

    /// Register `path` on `mux` so that it swaps to `page`.
    pub fn route<M: Multiplexer>(self: &Rc<Self>, mux: &M, path: &str, page: Rc<Page>) {
        mux.define_path(path, self.swap_handler(page));
    }

    /// Swap to `page` whenever `mux` sees an unregistered path.
    pub fn route_not_found<M: Multiplexer>(self: &Rc<Self>, mux: &M, page: Rc<Page>) {
        mux.set_not_found(Some(self.swap_handler(page)));
    }

    fn swap_handler(self: &Rc<Self>, page: Rc<Page>) -> Callback {
        let app: Weak<Self> = Rc::downgrade(self);
        callback(move || {
            let Some(app) = app.upgrade() else {
                return;
            };
            if let Err(err) = app.swap_page_to(page.clone()) {
                tracing::error!(error = %err, "page swap failed");
            }
        })
    }

    /// The page currently rendered, if any.
    pub fn current_page(&self) -> Option<Rc<Page>> {
        self.current_page.borrow().clone()
    }

    /// Container pages are rendered into.
    pub fn root_view(&self) -> NodeId {
        self.root_view
    }

    /// Fixed overlay for persistent widgets.
    pub fn safe_area_view(&self) -> NodeId {
        self.safe_area_view
    }

    /// Node the app is mounted under.
    pub fn mount(&self) -> NodeId {
        self.mount
    }
}

/// Keep listener faults, fail on host errors.
fn collect(result: Result<(), PageError>, faults: &mut Vec<ListenerFault>) -> Result<(), AppError> {
    match result {
        Ok(()) => Ok(()),
        Err(PageError::Host(err)) => Err(err.into()),
        Err(err) => {
            faults.extend_from_slice(err.faults());
            Ok(())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{self, push_state, run_frame};
    use crate::mux::PathMux;
    use crate::page::PageEvent;

    fn setup() -> Rc<AppController> {
        host::reset_host();
        let app = AppController::new(AppConfig::default().with_root_view_class("content")).unwrap();
        app.run().unwrap();
        Rc::new(app)
    }

    type Log = Rc<RefCell<Vec<String>>>;

    /// Page whose lifecycle events are appended to `log` as "<name>:<event>",
    /// together with whether its root was attached at that moment.
    fn tracked_page(log: &Log, name: &str) -> Rc<Page> {
        let page = Rc::new(Page::new());
        for event in PageEvent::ALL {
            let log = log.clone();
            let label = format!("{name}:{event}");
            let weak = Rc::downgrade(&page);
            page.add_event_listener(
                event,
                &[callback(move || {
                    let attached = weak.upgrade().map(|p| p.is_attached()).unwrap_or(false);
                    log.borrow_mut().push(format!("{label}:{attached}"));
                })],
            );
        }
        page
    }

    #[test]
    fn test_run_mounts_containers() {
        let app = setup();

        let body = host::body();
        assert_eq!(node::children(body), vec![app.root_view(), app.safe_area_view()]);
        assert_eq!(node::class_name(app.root_view()), "content");
        assert_eq!(node::class_name(app.safe_area_view()), "safe-area");
        assert_eq!(node::style(app.root_view(), "position").as_deref(), Some("absolute"));
    }

    #[test]
    fn test_custom_mount() {
        host::reset_host();
        let mount = node::create_node("main");
        let app = AppController::new(AppConfig::default().with_mount(mount)).unwrap();
        app.run().unwrap();

        assert_eq!(app.mount(), mount);
        assert_eq!(node::children(mount).len(), 2);
        assert!(node::children(host::body()).is_empty());
    }

    #[test]
    fn test_render_widget_goes_to_safe_area() {
        let app = setup();

        let banner = node::create_node("header");
        let toast = node::create_node("aside");
        app.render_widget(&[banner, toast]).unwrap();

        assert_eq!(node::children(app.safe_area_view()), vec![banner, toast]);

        // Swapping pages leaves widgets alone
        app.swap_page_to(Rc::new(Page::new())).unwrap();
        assert_eq!(node::children(app.safe_area_view()), vec![banner, toast]);
    }

    #[test]
    fn test_swap_order() {
        let app = setup();
        let log: Log = Rc::new(RefCell::new(Vec::new()));

        let a = tracked_page(&log, "A");
        let b = tracked_page(&log, "B");

        app.swap_page_to(a.clone()).unwrap();
        app.swap_page_to(b.clone()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "A:render:false",
                "A:remove:true",
                "B:render:false",
            ]
        );
        assert!(!a.is_attached());
        assert_eq!(node::children(app.root_view()), vec![b.root()]);
        assert!(Rc::ptr_eq(&app.current_page().unwrap(), &b));
    }

    #[test]
    fn test_swap_with_faulty_listener_completes() {
        let app = setup();

        let a = Rc::new(Page::new());
        a.add_event_listener(PageEvent::Remove, &[callback(|| panic!("cleanup failed"))]);
        let b = Rc::new(Page::new());

        app.swap_page_to(a.clone()).unwrap();
        let err = app.swap_page_to(b.clone()).unwrap_err();

        match err {
            AppError::Listeners(faults) => {
                assert_eq!(faults.len(), 1);
                assert_eq!(faults[0].context, "remove");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // The swap still happened
        assert!(!a.is_attached());
        assert!(b.is_attached());
        assert!(Rc::ptr_eq(&app.current_page().unwrap(), &b));
    }

    #[test]
    fn test_nested_swap_leaves_one_page() {
        let app = setup();
        let log: Log = Rc::new(RefCell::new(Vec::new()));

        let a = tracked_page(&log, "A");
        let b = tracked_page(&log, "B");
        let c = tracked_page(&log, "C");

        // Leaving A redirects to C while the swap to B is underway
        let weak_app = Rc::downgrade(&app);
        let redirect = c.clone();
        a.add_event_listener(
            PageEvent::Remove,
            &[callback(move || {
                if let Some(app) = weak_app.upgrade() {
                    app.swap_page_to(redirect.clone()).unwrap();
                }
            })],
        );

        app.swap_page_to(a.clone()).unwrap();
        app.swap_page_to(b.clone()).unwrap();

        assert_eq!(node::children(app.root_view()), vec![b.root()]);
        assert!(!a.is_attached());
        assert!(!c.is_attached());
        assert!(Rc::ptr_eq(&app.current_page().unwrap(), &b));
        assert_eq!(
            *log.borrow(),
            vec![
                "A:render:false",
                "A:remove:true",
                "C:render:false",
                "C:remove:true",
                "B:render:false",
            ]
        );
    }

    #[test]
    fn test_swap_from_render_listener_keeps_outer_page() {
        let app = setup();

        let b = Rc::new(Page::new());
        let c = Rc::new(Page::new());

        let weak_app = Rc::downgrade(&app);
        let redirect = c.clone();
        b.add_event_listener(
            PageEvent::Render,
            &[callback(move || {
                if let Some(app) = weak_app.upgrade() {
                    app.swap_page_to(redirect.clone()).unwrap();
                }
            })],
        );

        app.swap_page_to(b.clone()).unwrap();

        assert_eq!(node::children(app.root_view()), vec![b.root()]);
        assert!(!c.is_attached());
        assert!(Rc::ptr_eq(&app.current_page().unwrap(), &b));
    }

    #[test]
    fn test_routes_swap_pages() {
        let app = setup();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mux = PathMux::new();

        let home = tracked_page(&log, "home");
        let missing = tracked_page(&log, "missing");
        app.route(&mux, "/", home.clone());
        app.route_not_found(&mux, missing.clone());

        mux.serve_and_listen();
        assert!(Rc::ptr_eq(&app.current_page().unwrap(), &home));

        push_state("/nope");
        run_frame();
        assert!(Rc::ptr_eq(&app.current_page().unwrap(), &missing));

        assert_eq!(
            *log.borrow(),
            vec![
                "home:render:false",
                "home:remove:true",
                "missing:render:false",
            ]
        );
    }

    #[test]
    fn test_route_handler_outlived_by_mux() {
        let app = setup();
        let mux = PathMux::new();
        app.route(&mux, "/", Rc::new(Page::new()));

        drop(app);
        // Handler only holds a weak reference; nothing to swap into
        mux.serve_and_listen();
        assert_eq!(mux.dispatch_count(), 1);
    }
}
