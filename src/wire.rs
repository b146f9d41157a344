use anyhow::{anyhow, Result};
use hickory_proto::op::{Header, Message, MessageType, ResponseCode};
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// Largest datagram the server reads
pub const MAX_DATAGRAM: usize = 4096;

/// Decode an inbound datagram into a DNS request.
///
/// Returns an error if the bytes cannot be parsed or the message is a response.
pub fn decode_request(bytes: &[u8]) -> Result<Message> {
	let message = Message::from_vec(bytes)
		.map_err(|e| anyhow!("failed to parse DNS request: {}", e))?;

	if message.message_type() != MessageType::Query {
		return Err(anyhow!("received a response instead of a query"));
	}

	Ok(message)
}

/// FORMERR reply for a query whose header parses but whose body does not.
///
/// Returns `None` when the datagram is shorter than a header or is a response.
pub fn format_error(bytes: &[u8]) -> Option<Message> {
	let mut decoder = BinDecoder::new(bytes);
	let header = Header::read(&mut decoder).ok()?;
	if header.message_type() != MessageType::Query {
		return None;
	}
	Some(Message::error_msg(header.id(), header.op_code(), ResponseCode::FormErr))
}

/// Serialize a reply with name compression disabled.
///
/// Every name is written out in full; no compression pointers are emitted.
/// Owner names keep their case, but names inside CNAME and NS record data
/// are written lowercase.
pub fn encode_reply(message: &Message) -> Result<Vec<u8>> {
	let mut buffer = Vec::with_capacity(512);
	{
		let mut encoder = BinEncoder::new(&mut buffer);
		encoder.set_canonical_names(true);
		message.emit(&mut encoder)
			.map_err(|e| anyhow!("failed to serialize DNS reply: {}", e))?;
	}
	Ok(buffer)
}

/// Build a DNS query message for the given domain and record type.
#[cfg(test)]
pub fn build_query(
	domain: &str,
	record_type: hickory_proto::rr::RecordType,
	txid: u16,
) -> Result<Vec<u8>> {
	use hickory_proto::op::Query;
	use hickory_proto::rr::Name;

	let name = Name::from_ascii(domain)
		.map_err(|e| anyhow!("invalid domain name '{}': {}", domain, e))?;

	let mut message = Message::new();
	message.set_id(txid);
	message.set_recursion_desired(true);
	message.add_query(Query::query(name, record_type));

	let bytes = message.to_vec()
		.map_err(|e| anyhow!("failed to serialize DNS query: {}", e))?;
	Ok(bytes)
}
