use std::time::Duration;

use crate::error::ConfigError;

/// Default UDP port
pub const DEFAULT_PORT: u16 = 5353;

/// Default listen host
pub const DEFAULT_LISTEN: &str = "0.0.0.0";

/// The four configurable answer sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerKind {
	A,
	AAAA,
	CnameA,
	CnameAAAA,
}

impl AnswerKind {
	/// Record type mnemonic of the records built from this set
	pub fn record_type(self) -> &'static str {
		match self {
			AnswerKind::A | AnswerKind::CnameA => "A",
			AnswerKind::AAAA | AnswerKind::CnameAAAA => "AAAA",
		}
	}
}

/// Address strings to serve, per answer kind.
///
/// Entries are kept verbatim; they are validated each time a reply is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSets {
	pub a: Vec<String>,
	pub aaaa: Vec<String>,
	pub cname_a: Vec<String>,
	pub cname_aaaa: Vec<String>,
}

impl AnswerSets {
	pub fn get(&self, kind: AnswerKind) -> &[String] {
		match kind {
			AnswerKind::A => &self.a,
			AnswerKind::AAAA => &self.aaaa,
			AnswerKind::CnameA => &self.cname_a,
			AnswerKind::CnameAAAA => &self.cname_aaaa,
		}
	}
}

/// Per-type response delays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delays {
	pub a: Duration,
	pub aaaa: Duration,
}

/// Immutable responder configuration, built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderConfig {
	pub listen_host: String,
	pub port: u16,
	pub answers: AnswerSets,
	pub delays: Delays,
	pub alternate: bool,
	/// NS hostname for the authority section, `None` when not configured
	pub authority: Option<String>,
}

impl Default for ResponderConfig {
	fn default() -> Self {
		ResponderConfig {
			listen_host: DEFAULT_LISTEN.to_string(),
			port: DEFAULT_PORT,
			answers: AnswerSets::default(),
			delays: Delays::default(),
			alternate: false,
			authority: None,
		}
	}
}

impl ResponderConfig {
	/// host:port string suitable for binding, with IPv6 hosts bracketed
	pub fn listen_addr(&self) -> String {
		if self.listen_host.contains(':') && !self.listen_host.starts_with('[') {
			format!("[{}]:{}", self.listen_host, self.port)
		} else {
			format!("{}:{}", self.listen_host, self.port)
		}
	}
}

/// Parse a duration written the way Go's `time.ParseDuration` accepts it.
///
/// Supports formats:
///   "0"       -- zero, no unit required
///   "200ms"   -- single component
///   "1.5s"    -- fractional value
///   "1m30s"   -- several components, summed
///
/// Units: ns, us (or µs), ms, s, m, h. Negative durations are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
	let trimmed = input.trim();
	let (negative, mut rest) = match trimmed.strip_prefix('-') {
		Some(r) => (true, r),
		None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
	};

	if rest == "0" {
		return Ok(Duration::ZERO);
	}
	if rest.is_empty() {
		return Err(ConfigError::InvalidDuration(input.to_string()));
	}

	let mut total_nanos = 0f64;
	while !rest.is_empty() {
		let number_end = rest
			.find(|c: char| !(c.is_ascii_digit() || c == '.'))
			.unwrap_or(rest.len());
		let number = &rest[..number_end];
		if number.is_empty() || number == "." {
			return Err(ConfigError::InvalidDuration(input.to_string()));
		}
		let value: f64 = number.parse()
			.map_err(|_| ConfigError::InvalidDuration(input.to_string()))?;
		rest = &rest[number_end..];

		let unit_end = rest
			.find(|c: char| c.is_ascii_digit() || c == '.')
			.unwrap_or(rest.len());
		let unit = &rest[..unit_end];
		let scale = match unit {
			"ns" => 1.0,
			"us" | "µs" | "μs" => 1e3,
			"ms" => 1e6,
			"s" => 1e9,
			"m" => 60e9,
			"h" => 3600e9,
			"" => return Err(ConfigError::InvalidDuration(input.to_string())),
			other => {
				return Err(ConfigError::UnknownUnit {
					unit: other.to_string(),
					input: input.to_string(),
				})
			}
		};
		total_nanos += value * scale;
		rest = &rest[unit_end..];
	}

	if negative && total_nanos > 0.0 {
		return Err(ConfigError::NegativeDuration(input.to_string()));
	}
	if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
		return Err(ConfigError::InvalidDuration(input.to_string()));
	}
	Ok(Duration::from_nanos(total_nanos.round() as u64))
}
