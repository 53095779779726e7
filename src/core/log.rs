use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Logs fxdesk at debug level when `verbose`, otherwise nothing.
/// A `RUST_LOG` directive replaces that choice entirely.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter = app_targets(verbose, env_filter.is_some());

    // A subscriber may already be installed (e.g. by test-log); keep it.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
        .try_init();
}

fn app_targets(verbose: bool, rust_log_set: bool) -> Option<Targets> {
    if rust_log_set {
        return None;
    }
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    Some(Targets::new().with_target("fxdesk", level))
}
