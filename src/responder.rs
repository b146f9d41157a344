use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::Record;
use tracing::{debug, info, warn};

use crate::alternation::ChoiceMap;
use crate::config::ResponderConfig;
use crate::query::classify;
use crate::records::{authority_record, build_answers, cname_record};

/// Builds the reply for every inbound request.
///
/// One `Responder` is shared by all in-flight requests. The configuration is
/// read-only; the only mutable state is the alternation counters.
#[derive(Debug)]
pub struct Responder {
	config: ResponderConfig,
	choices: ChoiceMap,
}

impl Responder {
	pub fn new(config: ResponderConfig) -> Self {
		Responder {
			config,
			choices: ChoiceMap::new(),
		}
	}

	pub fn config(&self) -> &ResponderConfig {
		&self.config
	}

	/// Produce the reply for `request`. Never fails: per-record problems are
	/// logged and the record is left out.
	///
	/// A and AAAA questions are held for the configured delay before the
	/// reply is returned. The wait is local to this call.
	pub async fn respond(&self, request: &Message) -> Message {
		let mut reply = reply_to(request);

		if request.op_code() != OpCode::Query {
			warn!(id = request.id(), op_code = ?request.op_code(), "Got a non-query message");
			return reply;
		}

		if let Some(query) = reply.queries().first().cloned() {
			let answers = self.answer(&query).await;
			reply.add_answers(answers);
		}

		if let Some(record) = self.authority(&reply) {
			reply.add_name_server(record);
		}
		reply.set_authoritative(true);

		for answer in reply.answers() {
			info!(record = %answer, "Responding with");
		}

		reply
	}

	async fn answer(&self, query: &Query) -> Vec<Record> {
		let class = classify(query, &self.config);
		let mut answers = Vec::new();

		if class.cname_probe {
			info!(name = %class.name, target = %class.target, "Query for CNAME probe, replying with CNAME");
			match cname_record(&class.name, &class.target) {
				Ok(record) => answers.push(record),
				Err(e) => debug!(name = %class.name, error = %e, "Skipping CNAME record"),
			}
		}

		info!(
			record_type = class.record_type(),
			name = %class.name,
			delay = ?class.delay,
			"Query received, replying after delay"
		);
		if !class.delay.is_zero() {
			tokio::time::sleep(class.delay).await;
		}

		let Some(kind) = class.answer_kind else {
			return answers;
		};

		let mut records = build_answers(&class.target, kind, class.answers(&self.config));
		if self.config.alternate {
			records = self.choices.select(&class.name, records);
		}
		answers.extend(records);
		answers
	}

	fn authority(&self, reply: &Message) -> Option<Record> {
		let host = self.config.authority.as_deref()?;
		let owner = reply.queries().first()?.name();
		match authority_record(owner, host) {
			Ok(record) => Some(record),
			Err(e) => {
				warn!(authority = %host, error = %e, "Failed to create NS record");
				None
			}
		}
	}
}

/// Reply skeleton: ID, opcode and first question of the request, QR set,
/// NOERROR. RD and CD are copied for standard queries only.
fn reply_to(request: &Message) -> Message {
	let mut reply = Message::new();
	reply
		.set_id(request.id())
		.set_message_type(MessageType::Response)
		.set_op_code(request.op_code())
		.set_response_code(ResponseCode::NoError);

	if request.op_code() == OpCode::Query {
		reply
			.set_recursion_desired(request.recursion_desired())
			.set_checking_disabled(request.checking_disabled());
	}

	if let Some(query) = request.queries().first() {
		reply.add_query(query.clone());
	}

	reply
}
