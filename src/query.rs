use std::time::Duration;

use hickory_proto::op::Query;
use hickory_proto::rr::RecordType;

use crate::config::{AnswerKind, ResponderConfig};

/// Names starting with this prefix are CNAME-indirection probes
pub const CNAME_PREFIX: &str = "cname.";

/// What a single question asks for, resolved against the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
	/// Queried name exactly as received; also the alternation key
	pub name: String,
	/// Owner name of the address answers (prefix stripped for probes)
	pub target: String,
	pub cname_probe: bool,
	/// `None` for query types other than A and AAAA
	pub answer_kind: Option<AnswerKind>,
	pub delay: Duration,
}

impl Classification {
	/// Record type mnemonic used in logs, empty for unsupported types
	pub fn record_type(&self) -> &'static str {
		self.answer_kind.map(AnswerKind::record_type).unwrap_or("")
	}

	/// Configured address strings that answer this question
	pub fn answers<'a>(&self, config: &'a ResponderConfig) -> &'a [String] {
		match self.answer_kind {
			Some(kind) => config.answers.get(kind),
			None => &[],
		}
	}
}

/// Classify a question. Pure: no logging, no state.
pub fn classify(query: &Query, config: &ResponderConfig) -> Classification {
	classify_name(&query.name().to_ascii(), query.query_type(), config)
}

fn classify_name(name: &str, query_type: RecordType, config: &ResponderConfig) -> Classification {
	let stripped = name.strip_prefix(CNAME_PREFIX);
	let cname_probe = stripped.is_some();
	let target = stripped.unwrap_or(name).to_string();

	let (answer_kind, delay) = match query_type {
		RecordType::A => {
			let kind = if cname_probe && !config.answers.cname_a.is_empty() {
				AnswerKind::CnameA
			} else {
				AnswerKind::A
			};
			(Some(kind), config.delays.a)
		}
		RecordType::AAAA => {
			let kind = if cname_probe && !config.answers.cname_aaaa.is_empty() {
				AnswerKind::CnameAAAA
			} else {
				AnswerKind::AAAA
			};
			(Some(kind), config.delays.aaaa)
		}
		_ => (None, Duration::ZERO),
	};

	Classification {
		name: name.to_string(),
		target,
		cname_probe,
		answer_kind,
		delay,
	}
}
