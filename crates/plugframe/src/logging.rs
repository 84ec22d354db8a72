use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Installs the global tracing subscriber and routes `log` records from the
/// core library into it.
///
/// Output goes to stderr so command results on stdout stay machine-readable.
/// `RUST_LOG` selects the filter, defaulting to `info`; `--verbose` forces `debug`.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true));

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to bridge log records into tracing: {}", e);
    }
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}
