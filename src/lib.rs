//! # spark-spa
//!
//! Single-page application toolkit: pages with a render/remove lifecycle and
//! a client-side path multiplexer that swaps them without a round-trip.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals); the
//! current location and the multiplexer's observed path are reactive signals.
//!
//! ## Architecture
//!
//! ```text
//! host frame ─▶ PathMux observation cycle ─▶ handler ─▶ AppController::swap_page_to
//!                                                          ├─ old Page: remove → detach
//!                                                          └─ new Page: render → attach
//! ```
//!
//! The multiplexer polls the host location once per frame. Programmatic
//! navigation (push/replace) fires no notification, so polling is the only
//! way to see it; back/forward additionally trigger an immediate cycle.
//!
//! ## Modules
//!
//! - [`host`] - In-memory environment: display nodes, history, frames
//! - [`page`] - Page lifecycle and listener dispatch
//! - [`mux`] - Multiplexer trait and the exact-match [`PathMux`]
//! - [`app`] - App controller and configuration
//! - [`navigation`] - History shorthands

pub mod app;
pub mod host;
pub mod mux;
pub mod navigation;
pub mod page;
pub mod types;

// Re-export commonly used items
pub use types::{callback, same_callback, Callback, ListenerFault};

pub use app::{AppConfig, AppController, AppError, ConfigError};

pub use host::{HostError, NodeId};

pub use mux::{Handler, Multiplexer, PathMux};

pub use navigation::{navigate_page, next_page, prev_page, redirect_page};

pub use page::{Page, PageError, PageEvent};
