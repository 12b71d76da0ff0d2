//! Tracing subscriber setup for embedding applications.

/// Install the default fmt subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt::try_init();
}
