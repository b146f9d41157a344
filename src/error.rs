use std::net::IpAddr;

use hickory_proto::ProtoError;
use thiserror::Error;

/// Failure to build a single resource record.
///
/// These never abort a reply: the record is logged and dropped.
#[derive(Debug, Error)]
pub enum RecordError {
	#[error("'{0}' is not a valid IP address")]
	InvalidAddress(String),

	#[error("{addr} cannot be served in a {record_type} record")]
	FamilyMismatch { addr: IpAddr, record_type: &'static str },

	#[error("empty domain name")]
	EmptyName,

	#[error("invalid domain name '{name}': {source}")]
	InvalidName {
		name: String,
		#[source]
		source: ProtoError,
	},
}

/// Rejected configuration input, reported by clap as a usage error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("invalid duration '{0}'")]
	InvalidDuration(String),

	#[error("unknown unit '{unit}' in duration '{input}'")]
	UnknownUnit { unit: String, input: String },

	#[error("negative duration '{0}' is not allowed")]
	NegativeDuration(String),
}

/// Transport failures. Only bind failures are fatal.
#[derive(Debug, Error)]
pub enum ServerError {
	#[error("failed to bind UDP socket on {addr}: {source}")]
	Bind {
		addr: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to receive datagram: {0}")]
	Receive(#[source] std::io::Error),
}
