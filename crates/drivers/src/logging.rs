use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "imgrater=info";
const VERBOSE_LOG_FILTER: &str = "imgrater=debug";

/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
