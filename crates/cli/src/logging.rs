use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Maps `-v` count to a default filter; `RUST_LOG` overrides it.
pub fn filter_for(verbosity: u8) -> &'static str {
	// 0 = errors only, library internals silent
	// 1 (-v) = info for the CLI, warn for the page libraries
	// 2+ (-vv) = debug for everything
	match verbosity {
		0 => "error,webpage=off,webpage_runtime=off",
		1 => "info,webpage=warn,webpage_runtime=warn",
		_ => "debug",
	}
}

pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}
