use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Crates too chatty to log below `error` unless `RUST_LOG` asks for it.
const QUIET_CRATES: [&str; 3] = ["hyper", "hyper_util", "reqwest"];

/// Filter directives: the verbosity level, the quiet crates, then `RUST_LOG`.
/// A later directive for the same target replaces an earlier one.
fn filter_directives(verbosity_level: Level, rust_log: Option<&str>) -> String {
    let mut directives = vec![verbosity_level.to_string().to_lowercase()];
    directives.extend(QUIET_CRATES.iter().map(|name| format!("{name}=error")));
    directives.extend(
        rust_log
            .into_iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|directive| !directive.is_empty())
            .map(ToString::to_string),
    );
    directives.join(",")
}

/// Initialize logging to stderr so stdout stays free for command output.
/// `RUST_LOG` directives override the verbosity-derived default.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::builder().parse_lossy(filter_directives(
        verbosity_level,
        rust_log.as_deref(),
    ));

    let subscriber = Registry::default().with(fmt_layer).with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
