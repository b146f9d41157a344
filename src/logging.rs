use std::env;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn get_env() -> String {
	env::var("RUST_LOG").unwrap_or_default()
}

/// Install the global tracing subscriber.
///
/// `level` is the default for every target; `RUST_LOG` directives refine it.
pub fn init(level: Level) -> Result<()> {
	let filter = EnvFilter::builder()
		.with_default_directive(LevelFilter::from_level(level).into())
		.parse_lossy(get_env());

	let formatter = tracing_subscriber::fmt::layer().compact();

	tracing_subscriber::registry()
		.with(formatter)
		.with(filter)
		.try_init()?;
	Ok(())
}
