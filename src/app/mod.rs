//! Application - Mount controller and configuration
//!
//! - [`AppController`] - root view, safe area, page swapping
//! - [`AppConfig`] - mount point and container classes

use thiserror::Error;

use crate::host::HostError;
use crate::types::ListenerFault;

mod config;
mod controller;

pub use config::{AppConfig, ConfigError, DEFAULT_SAFE_AREA_CLASS};
pub use controller::AppController;

/// Errors reported by the app controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// The host rejected a node operation.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Page listeners panicked during a swap. The swap itself completed.
    #[error("page swap completed with {} listener fault(s)", .0.len())]
    Listeners(Vec<ListenerFault>),
}
