//! Logging setup for the relay.
//!
//! Logs go through `tracing` with a compact formatter. The filter comes from `RUST_LOG` when
//! it is set, otherwise from the level passed on the command line, otherwise `info`. HTTP and
//! RPC client internals are capped at `warn` unless `RUST_LOG` says otherwise, since they log
//! every request at the relay's poll rate.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Directives appended to the level chosen on the command line
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "reqwest=warn", "alloy_transport_http=warn"];

pub type LoggingResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Setup logging to stdout
pub fn setup_logging(level: Option<&str>) -> LoggingResult {
	setup_logging_with_writer(level, std::io::stdout)
}

/// Setup logging with a custom writer
pub fn setup_logging_with_writer<W>(level: Option<&str>, writer: W) -> LoggingResult
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry()
		.with(build_filter(level))
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(true)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}

fn build_filter(level: Option<&str>) -> EnvFilter {
	if let Ok(filter) = EnvFilter::try_from_default_env() {
		return filter;
	}

	let base = level.unwrap_or("info");
	let directives = std::iter::once(base)
		.chain(QUIET_DEPENDENCIES.iter().copied())
		.collect::<Vec<_>>()
		.join(",");

	EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"))
}
