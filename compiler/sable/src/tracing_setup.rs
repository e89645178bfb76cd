//! Tracing subscriber installation.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable read for the log filter, before `RUST_LOG`.
pub const LOG_ENV: &str = "SABLE_LOG";

/// Install a global `fmt` subscriber for debug output.
///
/// Meant for hosts and tools that have no subscriber of their own; building
/// an [`Engine`](crate::Engine) never calls it. Safe to call multiple times.
/// Does nothing unless `SABLE_LOG` or `RUST_LOG` is set, e.g.
/// `SABLE_LOG=sable_eval=debug`, and leaves an already installed global
/// subscriber in place.
pub fn init() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match (std::env::var(LOG_ENV), std::env::var(EnvFilter::DEFAULT_ENV)) {
            (Ok(directives), _) => EnvFilter::new(directives),
            (Err(_), Ok(_)) => EnvFilter::from_default_env(),
            (Err(_), Err(_)) => return,
        };
        let installed = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .try_init();
        if installed.is_err() {
            tracing::debug!("global subscriber already set, keeping it");
        }
    });
}
