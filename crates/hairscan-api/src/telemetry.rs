//! Tracing initialization

use tracing_subscriber::fmt::format::Format;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the process-wide tracing subscriber.
///
/// Console output uses the compact format; the filter honors `RUST_LOG` and
/// defaults to debug for this crate family.
pub fn init_tracing() {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hairscan=debug,tower_http=debug".into()),
        )
        .with(console_fmt)
        .init();
}
