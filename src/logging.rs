//! Subscriber setup for the binary. The library only emits `tracing` events.

#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call finds a subscriber already installed; that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init() {}
