//! Logging setup.
//!
//! The library only emits through the `log` facade. Hosts that do not bring
//! their own logger can call [`init`], which installs `env_logger` filtered by
//! `RUST_LOG` (default `info`).

use env_logger::Env;

/// Installs `env_logger` as the global logger. Calling it again is harmless.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`], with `filter` used when `RUST_LOG` is unset.
pub fn init_with_default(filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init();
}
