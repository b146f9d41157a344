use std::time::Duration;

use tracing::info;

use crate::config::ResponderConfig;

/// Log the effective configuration before serving.
pub fn log_config_summary(config: &ResponderConfig) {
	info!(listen = %config.listen_addr(), "Responder configuration");
	info!(
		a = %join(&config.answers.a),
		aaaa = %join(&config.answers.aaaa),
		cname_a = %join(&config.answers.cname_a),
		cname_aaaa = %join(&config.answers.cname_aaaa),
		"Answer sets"
	);
	info!(
		delay_a = %format_delay(config.delays.a),
		delay_aaaa = %format_delay(config.delays.aaaa),
		alternate = config.alternate,
		authority = config.authority.as_deref().unwrap_or("none"),
		"Behaviour"
	);
}

fn join(values: &[String]) -> String {
	if values.is_empty() {
		"-".to_string()
	} else {
		values.join(",")
	}
}

fn format_delay(delay: Duration) -> String {
	if delay.is_zero() {
		"none".to_string()
	} else {
		format!("{:?}", delay)
	}
}
