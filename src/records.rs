use std::net::IpAddr;

use hickory_proto::rr::rdata::{A, AAAA, CNAME, NS};
use hickory_proto::rr::{Name, RData, Record};
use tracing::warn;

use crate::config::AnswerKind;
use crate::error::RecordError;

/// TTL of every record this responder synthesizes
pub const RECORD_TTL: u32 = 3600;

/// Parse a textual domain name into a fully qualified `Name`.
pub fn parse_name(name: &str) -> Result<Name, RecordError> {
	if name.is_empty() {
		return Err(RecordError::EmptyName);
	}
	let mut parsed = Name::from_ascii(name).map_err(|source| RecordError::InvalidName {
		name: name.to_string(),
		source,
	})?;
	parsed.set_fqdn(true);
	Ok(parsed)
}

/// Build one address record, validating the literal against the family
/// the answer kind serves. Any IPv6 literal, including `::ffff:a.b.c.d`,
/// is rejected for A records.
pub fn address_record(owner: &Name, kind: AnswerKind, addr: &str) -> Result<Record, RecordError> {
	let ip: IpAddr = addr.parse()
		.map_err(|_| RecordError::InvalidAddress(addr.to_string()))?;

	let rdata = match (kind, ip) {
		(AnswerKind::A | AnswerKind::CnameA, IpAddr::V4(v4)) => RData::A(A(v4)),
		(AnswerKind::AAAA | AnswerKind::CnameAAAA, IpAddr::V6(v6)) => RData::AAAA(AAAA(v6)),
		(AnswerKind::A | AnswerKind::CnameA, IpAddr::V6(_))
		| (AnswerKind::AAAA | AnswerKind::CnameAAAA, IpAddr::V4(_)) => {
			return Err(RecordError::FamilyMismatch {
				addr: ip,
				record_type: kind.record_type(),
			})
		}
	};

	Ok(Record::from_rdata(owner.clone(), RECORD_TTL, rdata))
}

/// Build the address answers for `target` from a configured answer set.
///
/// Output order follows `addrs`. Entries that fail validation or record
/// construction are logged and dropped; they never fail the whole set.
pub fn build_answers(target: &str, kind: AnswerKind, addrs: &[String]) -> Vec<Record> {
	if addrs.is_empty() {
		return Vec::new();
	}

	let owner = match parse_name(target) {
		Ok(owner) => owner,
		Err(e) => {
			warn!(name = %target, error = %e, "Failed to create RR owner name");
			return Vec::new();
		}
	};

	addrs.iter()
		.filter_map(|addr| match address_record(&owner, kind, addr) {
			Ok(record) => Some(record),
			Err(e) => {
				warn!(name = %target, address = %addr, error = %e, "Failed to create RR");
				None
			}
		})
		.collect()
}

/// CNAME record mapping the probe name to its prefix-stripped target.
pub fn cname_record(name: &str, target: &str) -> Result<Record, RecordError> {
	let owner = parse_name(name)?;
	let canonical = parse_name(target)?;
	Ok(Record::from_rdata(owner, RECORD_TTL, RData::CNAME(CNAME(canonical))))
}

/// NS record naming `host` as authoritative for `owner`.
pub fn authority_record(owner: &Name, host: &str) -> Result<Record, RecordError> {
	let host = parse_name(host)?;
	Ok(Record::from_rdata(owner.clone(), RECORD_TTL, RData::NS(NS(host))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use hickory_proto::rr::RecordType;
	use std::net::{Ipv4Addr, Ipv6Addr};

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn test_build_answers_keeps_order() {
		let addrs = strings(&["192.0.2.2", "192.0.2.1", "192.0.2.3"]);
		let records = build_answers("example.com.", AnswerKind::A, &addrs);
		let ips: Vec<RData> = records.iter().map(|r| r.data().clone()).collect();
		assert_eq!(ips, vec![
			RData::A(A(Ipv4Addr::new(192, 0, 2, 2))),
			RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
			RData::A(A(Ipv4Addr::new(192, 0, 2, 3))),
		]);
		assert!(records.iter().all(|r| r.ttl() == RECORD_TTL));
		assert!(records.iter().all(|r| r.name().to_ascii() == "example.com."));
	}

	#[test]
	fn test_build_answers_drops_invalid_entries() {
		let addrs = strings(&["not-an-ip", "192.0.2.1", "2001:db8::1", ""]);
		let records = build_answers("example.com.", AnswerKind::A, &addrs);
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].data(), &RData::A(A(Ipv4Addr::new(192, 0, 2, 1))));
	}

	#[test]
	fn test_build_answers_only_invalid_is_empty() {
		let records = build_answers("example.com.", AnswerKind::AAAA, &strings(&["not-an-ip"]));
		assert!(records.is_empty());
	}

	#[test]
	fn test_aaaa_rejects_ipv4() {
		let owner = parse_name("example.com.").unwrap();
		let err = address_record(&owner, AnswerKind::CnameAAAA, "192.0.2.1").unwrap_err();
		assert!(matches!(err, RecordError::FamilyMismatch { record_type: "AAAA", .. }));

		let record = address_record(&owner, AnswerKind::AAAA, "2001:db8::5").unwrap();
		assert_eq!(record.record_type(), RecordType::AAAA);
		assert_eq!(
			record.data(),
			&RData::AAAA(AAAA("2001:db8::5".parse::<Ipv6Addr>().unwrap())),
		);
	}

	#[test]
	fn test_a_rejects_ipv4_mapped() {
		let owner = parse_name("example.com.").unwrap();
		let err = address_record(&owner, AnswerKind::CnameA, "::ffff:192.0.2.7").unwrap_err();
		assert!(matches!(err, RecordError::FamilyMismatch { record_type: "A", .. }));

		let addrs = strings(&["::ffff:192.0.2.7", "192.0.2.8"]);
		let records = build_answers("Example.COM.", AnswerKind::A, &addrs);
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].data(), &RData::A(A(Ipv4Addr::new(192, 0, 2, 8))));
	}

	#[test]
	fn test_empty_target_yields_no_answers() {
		let records = build_answers("", AnswerKind::A, &strings(&["192.0.2.1"]));
		assert!(records.is_empty());
	}

	#[test]
	fn test_cname_record() {
		let record = cname_record("cname.example.com.", "example.com.").unwrap();
		assert_eq!(record.record_type(), RecordType::CNAME);
		assert_eq!(record.name().to_ascii(), "cname.example.com.");
		assert_eq!(
			record.data(),
			&RData::CNAME(CNAME(Name::from_ascii("example.com.").unwrap())),
		);
		assert!(matches!(cname_record("cname.", ""), Err(RecordError::EmptyName)));
	}

	#[test]
	fn test_authority_record_is_fully_qualified() {
		let owner = parse_name("example.com.").unwrap();
		let record = authority_record(&owner, "ns1.example.net").unwrap();
		assert_eq!(record.record_type(), RecordType::NS);
		match record.data() {
			RData::NS(ns) => {
				assert!(ns.0.is_fqdn());
				assert_eq!(ns.0.to_ascii(), "ns1.example.net.");
			}
			other => panic!("expected NS data, got {:?}", other),
		}
	}
}
