//! Router demo: drives the in-memory host through a few navigations.
//!
//! Run with `RUST_LOG=spark_spa=trace` to see every observation cycle.

use std::rc::Rc;

use spark_spa::host::{node, run_frame};
use spark_spa::{
    callback, navigate_page, prev_page, AppConfig, AppController, HostError, Multiplexer, Page,
    PageEvent, PathMux,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn titled_page(title: &str) -> Result<Rc<Page>, HostError> {
    let page = Rc::new(Page::new());
    let heading = node::create_node("h1");
    node::set_class(heading, "title")?;
    node::append_child(page.root(), heading)?;

    let name = title.to_string();
    page.add_event_listener(
        PageEvent::Render,
        &[callback(move || tracing::info!(page = %name, "showing"))],
    );
    let name = title.to_string();
    page.add_event_listener(
        PageEvent::Remove,
        &[callback(move || tracing::info!(page = %name, "hiding"))],
    );
    Ok(page)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "router=info,spark_spa=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_toml_str(r#"root_view_class = "content""#)?;
    let app = Rc::new(AppController::new(config)?);
    app.render_widget(&[node::create_node("nav")])?;
    app.run()?;

    let mux = PathMux::new();
    app.route(&mux, "/", titled_page("home")?);
    app.route(&mux, "/docs", titled_page("docs")?);
    app.route_not_found(&mux, titled_page("not found")?);

    mux.serve_and_listen();

    for path in ["/docs", "/docs", "/missing"] {
        navigate_page(path);
        run_frame();
    }
    prev_page();
    run_frame();

    mux.stop_serving();
    tracing::info!(
        observed = ?mux.last_observed(),
        dispatches = mux.dispatch_count(),
        "done"
    );
    Ok(())
}
