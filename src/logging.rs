/// Logging setup.
///
/// Logs go to stderr so stdout stays free for results.  `RUST_LOG` wins
/// over the configured filter, which wins over the `warn` default.
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const DEFAULT_FILTER: &str = "warn";

/// Build the filter that `init` would install.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = config.filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|err| {
            eprintln!("ignoring invalid log filter `{directive}`: {err}");
            EnvFilter::new(DEFAULT_FILTER)
        })
    })
}

/// Install the global subscriber.  If one is already installed it is
/// kept and the new filter is ignored.
pub fn init(config: &LogConfig) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(err) = installed {
        tracing::trace!("keeping the existing subscriber: {err}");
    }
}
