//! Structured logging for the code table pipeline, built on `tracing`.

pub use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initializes the global logging subscriber. Events go to standard error so
/// that reports on standard output stay clean.
///
/// Call once at startup.
pub fn init_subscriber(max_level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default tracing subscriber failed");
}
