//! Dispatch properties checked against a plain model.
//!
//! - Path registry: for any sequence of registrations and overwrites, split
//!   anywhere around `serve_and_listen`, navigating to a path invokes exactly
//!   one handler: the last one registered for it, else the not-found handler,
//!   else nothing.
//! - Page subscribers: for any sequence of subscribe/unsubscribe calls, a
//!   dispatch reaches every subscribed callback once, in first-subscription
//!   order, and nothing else.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use spark_spa::host::{self, node, push_state, run_frame, run_frames};
use spark_spa::{callback, Callback, Multiplexer, Page, PageEvent, PathMux};

const PATHS: usize = 4;
const CALLBACKS: usize = 4;

type Log = Rc<RefCell<Vec<u32>>>;

fn path(index: usize) -> String {
    format!("/p{index}")
}

fn tagged(log: &Log, id: u32) -> Callback {
    let log = log.clone();
    callback(move || log.borrow_mut().push(id))
}

/// Registration: path index, handler id.
fn registrations() -> impl Strategy<Value = Vec<(usize, u32)>> {
    prop::collection::vec((0..PATHS, 0u32..1000), 0..16)
}

/// Subscription op: subscribe or not, callback index, render or remove,
/// passed twice in one call.
fn subscription_ops() -> impl Strategy<Value = Vec<(bool, usize, bool, bool)>> {
    prop::collection::vec(
        (any::<bool>(), 0..CALLBACKS, any::<bool>(), any::<bool>()),
        0..24,
    )
}

proptest! {
    #[test]
    fn prop_navigation_invokes_last_registered_handler(
        regs in registrations(),
        split in 0usize..=16,
        not_found in proptest::option::of(1000u32..2000),
        // Targets past PATHS are never registered
        target in 0..PATHS + 2,
    ) {
        host::reset_host();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mux = PathMux::new();
        mux.set_not_found(not_found.map(|id| tagged(&log, id)));

        let split = split.min(regs.len());
        for &(index, id) in &regs[..split] {
            mux.define_path(&path(index), tagged(&log, id));
        }
        mux.serve_and_listen();
        for &(index, id) in &regs[split..] {
            mux.define_path(&path(index), tagged(&log, id));
        }

        // Drop whatever the initial "/" observation produced
        log.borrow_mut().clear();

        push_state(&path(target));
        run_frame();
        run_frames(2);

        let expected = regs
            .iter()
            .rev()
            .find(|(index, _)| *index == target)
            .map(|(_, id)| *id)
            .or(not_found);
        let invoked = log.borrow().clone();
        prop_assert_eq!(invoked, expected.into_iter().collect::<Vec<_>>());
        prop_assert_eq!(host::pending_frames(), 1);
    }

    #[test]
    fn prop_page_dispatch_follows_subscriptions(ops in subscription_ops()) {
        host::reset_host();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let callbacks: Vec<Callback> = (0..CALLBACKS as u32).map(|id| tagged(&log, id)).collect();
        let page = Page::new();

        let mut model_render: Vec<u32> = Vec::new();
        let mut model_remove: Vec<u32> = Vec::new();
        for &(subscribe, index, render, twice) in &ops {
            let event = if render { PageEvent::Render } else { PageEvent::Remove };
            let model = if render { &mut model_render } else { &mut model_remove };
            let cb = callbacks[index].clone();
            let batch = if twice { vec![cb.clone(), cb] } else { vec![cb] };
            let id = index as u32;

            if subscribe {
                page.add_event_listener(event, &batch);
                if !model.contains(&id) {
                    model.push(id);
                }
            } else {
                page.remove_event_listener(event, &batch);
                model.retain(|existing| *existing != id);
            }
        }

        prop_assert_eq!(page.listener_count(PageEvent::Render), model_render.len());
        prop_assert_eq!(page.listener_count(PageEvent::Remove), model_remove.len());

        let mount = node::create_node("main");
        prop_assert!(page.render(mount).is_ok());
        prop_assert_eq!(log.borrow().clone(), model_render);

        log.borrow_mut().clear();
        prop_assert!(page.remove().is_ok());
        prop_assert_eq!(log.borrow().clone(), model_remove);
    }
}
