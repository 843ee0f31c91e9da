use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8) {
	// 0 = only errors; the bridge's session logs are noise for one-shot checks
	// 1 (-v) = info from the bridge
	// 2+ (-vv) = debug for everything, including the RPC client
	let filter = match verbosity {
		0 => "error,rn_debug=warn",
		1 => "warn,rn_debug=info,rn_debug_cli=info",
		_ => "debug",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}
