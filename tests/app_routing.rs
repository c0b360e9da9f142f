//! End-to-end routing through the public API: mux → handler → page swap.

use std::cell::RefCell;
use std::rc::Rc;

use spark_spa::host::{self, node, run_frame, run_frames};
use spark_spa::{
    callback, navigate_page, prev_page, redirect_page, AppConfig, AppController, Multiplexer,
    Page, PageEvent, PathMux,
};

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn logged_page(log: &Log, name: &str) -> Rc<Page> {
    let page = Rc::new(Page::new());
    for event in PageEvent::ALL {
        let log = log.clone();
        let label = format!("{name}:{event}");
        page.add_event_listener(event, &[callback(move || log.borrow_mut().push(label.clone()))]);
    }
    page
}

fn mounted_app() -> Rc<AppController> {
    host::reset_host();
    let app = Rc::new(AppController::new(AppConfig::default()).unwrap());
    app.run().unwrap();
    app
}

#[test]
fn record_dispatch_scenario() {
    host::reset_host();
    let log = new_log();
    let record = |label: &'static str| {
        let log = log.clone();
        callback(move || log.borrow_mut().push(label.to_string()))
    };

    let mux = PathMux::new();
    mux.define_path("/a", record("A"));
    mux.define_path("/b", record("B"));
    mux.set_not_found(Some(record("X")));

    navigate_page("/a");
    mux.serve_and_listen();
    assert_eq!(*log.borrow(), vec!["A"]);

    navigate_page("/b");
    run_frame();
    assert_eq!(*log.borrow(), vec!["A", "B"]);

    navigate_page("/c");
    run_frame();
    assert_eq!(*log.borrow(), vec!["A", "B", "X"]);

    mux.stop_serving();
    navigate_page("/a");
    run_frames(4);
    assert_eq!(*log.borrow(), vec!["A", "B", "X"]);
}

#[test]
fn pages_follow_navigation() {
    let app = mounted_app();
    let log = new_log();
    let mux = PathMux::new();

    let home = logged_page(&log, "home");
    let about = logged_page(&log, "about");
    let missing = logged_page(&log, "missing");
    app.route(&mux, "/", home.clone());
    app.route(&mux, "/about", about.clone());
    app.route_not_found(&mux, missing.clone());

    mux.serve_and_listen();
    navigate_page("/about");
    run_frame();
    redirect_page("/gone");
    run_frame();
    prev_page();

    assert_eq!(
        *log.borrow(),
        vec![
            "home:render",
            "home:remove",
            "about:render",
            "about:remove",
            "missing:render",
            "missing:remove",
            "home:render",
        ]
    );
    assert!(Rc::ptr_eq(&app.current_page().unwrap(), &home));
    assert_eq!(node::children(app.root_view()), vec![home.root()]);
}

#[test]
fn page_content_moves_with_its_root() {
    let app = mounted_app();
    let mux = PathMux::new();

    let page = Rc::new(Page::new());
    let heading = host::view("h1", |e| {
        node::set_class(e, "title").unwrap();
        e
    });
    node::append_child(page.root(), heading).unwrap();

    app.route(&mux, "/", page.clone());
    mux.serve_and_listen();

    assert!(node::is_connected(heading));

    navigate_page("/elsewhere");
    run_frame();
    assert!(!node::is_connected(heading));
    assert_eq!(node::parent(heading), Some(page.root()));
}
