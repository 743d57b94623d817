//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber: structured fields, spans shown
//! inline, module paths hidden (`with_target(false)`), since every store log line already
//! names its `entity_type` and every dispatched operation runs inside an `invoke` span
//! carrying `address` and `operation`.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Use the configured filter
//! cargo run -p inventory
//!
//! # Show request payloads and store lookups
//! RUST_LOG=debug cargo run -p inventory
//!
//! # Only the framework, verbosely
//! RUST_LOG=service_proxy=trace cargo run -p inventory
//! ```
//!
//! With `RUST_LOG=info` a location create through the dispatcher reads:
//!
//! ```text
//! INFO invoke: Created entity_type="Location" id=0192... key="WH1" size=1 address="service.location" operation="createLocation"
//! ```

use tracing_subscriber::EnvFilter;

/// Initialise the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used. Calling this twice is
/// harmless: the second call leaves the first subscriber in place and returns `false`.
pub fn setup_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type / address fields identify the source
        .compact()
        .try_init()
        .is_ok()
}
