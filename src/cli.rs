use std::time::Duration;

use clap::Parser;
use tracing::Level;

use crate::config::{parse_duration, AnswerSets, Delays, ResponderConfig};

/// DNS responder for provoking TOCTOU races in resolving clients
#[derive(Parser, Debug)]
#[command(name = "toctou-dns")]
#[command(about = "Serve delayed, alternating and CNAME-indirected DNS answers over UDP")]
pub struct Cli {
	/// Port to listen on
	#[arg(short = 'p', long = "port", default_value = "5353")]
	pub port: u16,

	/// Address to listen on
	#[arg(short = 'l', long = "listen", default_value = "0.0.0.0")]
	pub listen: String,

	/// A records to serve (repeatable or comma-separated)
	#[arg(short = 'a', long = "a", value_delimiter = ',')]
	pub a: Vec<String>,

	/// AAAA records to serve (repeatable or comma-separated)
	#[arg(short = '6', long = "aaaa", value_delimiter = ',')]
	pub aaaa: Vec<String>,

	/// Delay before answering A queries, e.g. 200ms or 1.5s
	#[arg(short = 'd', long = "delay-a", default_value = "0s", value_parser = parse_duration)]
	pub delay_a: Duration,

	/// Delay before answering AAAA queries
	#[arg(short = 'D', long = "delay-aaaa", default_value = "0s", value_parser = parse_duration)]
	pub delay_aaaa: Duration,

	/// Alternate records, useful for TOCTOU race conditions
	#[arg(short = 'A', long = "alternate")]
	pub alternate: bool,

	/// A records to serve for cname.* queries.
	/// Give an invalid IP address to serve no A records with CNAMEs
	#[arg(short = 'c', long = "cname-a", value_delimiter = ',')]
	pub cname_a: Vec<String>,

	/// AAAA records to serve for cname.* queries.
	/// Give an invalid IP address to serve no AAAA records with CNAMEs
	#[arg(short = 'C', long = "cname-aaaa", value_delimiter = ',')]
	pub cname_aaaa: Vec<String>,

	/// Hostname to serve as NS in the authority section
	#[arg(long = "authority", default_value = "")]
	pub authority: String,

	/// Default log level; RUST_LOG directives are applied on top
	#[arg(long = "log-level", default_value = "info")]
	pub log_level: Level,
}

impl Cli {
	pub fn into_config(self) -> ResponderConfig {
		let authority = self.authority.trim();
		ResponderConfig {
			listen_host: self.listen,
			port: self.port,
			answers: AnswerSets {
				a: self.a,
				aaaa: self.aaaa,
				cname_a: self.cname_a,
				cname_aaaa: self.cname_aaaa,
			},
			delays: Delays {
				a: self.delay_a,
				aaaa: self.delay_aaaa,
			},
			alternate: self.alternate,
			authority: (!authority.is_empty()).then(|| authority.to_string()),
		}
	}
}
