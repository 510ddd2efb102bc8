use crate::config::MergedConfig;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. RUST_LOG wins over every other setting.
pub fn initialize_logging(config: &MergedConfig) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if config.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::default().add_directive(config.log_level.to_tracing_level_filter().into())
    };

    let init_res = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    let _ = init_res; // ignore AlreadyInit errors silently
}
