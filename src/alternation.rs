use dashmap::DashMap;
use hickory_proto::rr::Record;

/// Per-name query counters driving answer alternation.
///
/// Counters are created on the first alternating query for a name and never
/// removed. Concurrent queries for the same name share one counter; racing
/// increments are serialized per shard, so the map itself stays consistent
/// while the order clients observe is left to the race.
#[derive(Debug, Default)]
pub struct ChoiceMap {
	counters: DashMap<String, u64>,
}

impl ChoiceMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Narrow `records` to a single record picked by the parity of the
	/// counter for `name`, then advance the counter.
	///
	/// Only the first two records are candidates. With fewer than two
	/// records this is a no-op and the counter is left untouched.
	pub fn select(&self, name: &str, records: Vec<Record>) -> Vec<Record> {
		if records.len() < 2 {
			return records;
		}

		let index = {
			let mut counter = self.counters.entry(name.to_string()).or_insert(0);
			let index = (*counter % 2) as usize;
			*counter += 1;
			index
		};

		records.into_iter().nth(index).into_iter().collect()
	}

	#[cfg(test)]
	fn count(&self, name: &str) -> Option<u64> {
		self.counters.get(name).map(|c| *c)
	}
}
