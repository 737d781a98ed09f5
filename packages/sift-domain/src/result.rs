use serde::{Deserialize, Serialize};

/// One raw answer from a search index.
///
/// `ids` and `reported_total` come from independent backend calls and are not guaranteed to
/// agree. `ids` may contain duplicates and may be empty; `reported_total` may be stale,
/// approximate, or even negative when a backend misbehaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIndexResponse<Id> {
	pub ids: Vec<Id>,
	pub reported_total: i64,
}
impl<Id> RawIndexResponse<Id> {
	pub fn new(ids: Vec<Id>, reported_total: i64) -> Self {
		Self { ids, reported_total }
	}

	/// The response substituted whenever a backend produced no usable signal.
	pub fn empty() -> Self {
		Self { ids: Vec::new(), reported_total: 0 }
	}
}

/// The canonical result of reconciling one [`RawIndexResponse`].
///
/// Only [`crate::ResultReconciler`] and [`ReconciledResult::empty`] construct values, so
/// `is_empty`, `ordered_ids.is_empty()` and `total == 0` always agree. `ordered_ids` never
/// contains duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledResult<Id> {
	ordered_ids: Vec<Id>,
	total: u64,
	is_empty: bool,
}
impl<Id> ReconciledResult<Id> {
	/// Zero matches. Checkable without touching any record store.
	pub fn empty() -> Self {
		Self { ordered_ids: Vec::new(), total: 0, is_empty: true }
	}

	/// Caller must pass ids that are already unique.
	pub(crate) fn from_unique(ordered_ids: Vec<Id>) -> Self {
		if ordered_ids.is_empty() {
			return Self::empty();
		}

		let total = ordered_ids.len() as u64;

		Self { ordered_ids, total, is_empty: false }
	}

	pub fn ordered_ids(&self) -> &[Id] {
		&self.ordered_ids
	}

	pub fn into_ordered_ids(self) -> Vec<Id> {
		self.ordered_ids
	}

	pub fn total(&self) -> u64 {
		self.total
	}

	pub fn is_empty(&self) -> bool {
		self.is_empty
	}

	/// How a backend's claimed count compares with what was actually returned.
	pub fn reported_drift(&self, reported_total: i64) -> ReportedDrift {
		let reported = reported_total.max(0) as u64;

		match reported.cmp(&self.total) {
			std::cmp::Ordering::Equal => ReportedDrift::Consistent,
			std::cmp::Ordering::Greater => ReportedDrift::Overcounted { by: reported - self.total },
			std::cmp::Ordering::Less => ReportedDrift::Undercounted { by: self.total - reported },
		}
	}
}
impl<Id> Default for ReconciledResult<Id> {
	fn default() -> Self {
		Self::empty()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportedDrift {
	Consistent,
	Overcounted { by: u64 },
	Undercounted { by: u64 },
}
impl ReportedDrift {
	pub fn is_consistent(self) -> bool {
		matches!(self, Self::Consistent)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_value_satisfies_emptiness_equivalence() {
		let result = ReconciledResult::<i64>::empty();

		assert!(result.is_empty());
		assert!(result.ordered_ids().is_empty());
		assert_eq!(result.total(), 0);
		assert_eq!(result, ReconciledResult::default());
	}

	#[test]
	fn from_unique_with_no_ids_is_canonical_empty() {
		assert_eq!(ReconciledResult::<i64>::from_unique(Vec::new()), ReconciledResult::empty());
	}

	#[test]
	fn drift_classifies_reported_totals() {
		let result = ReconciledResult::from_unique(vec![1_i64, 2]);

		assert_eq!(result.reported_drift(2), ReportedDrift::Consistent);
		assert_eq!(result.reported_drift(7), ReportedDrift::Overcounted { by: 5 });
		assert_eq!(result.reported_drift(1), ReportedDrift::Undercounted { by: 1 });
		assert_eq!(result.reported_drift(-3), ReportedDrift::Undercounted { by: 2 });
	}
}
