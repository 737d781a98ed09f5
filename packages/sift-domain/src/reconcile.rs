use std::{collections::HashSet, hash::Hash};

use crate::{RawIndexResponse, ReconciledResult};

/// Turns raw `(ids, reported_total)` pairs into a [`ReconciledResult`].
///
/// Stateless and total: every input maps to a defined output, so it is safe to share across
/// threads and call concurrently without coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReconciler;
impl ResultReconciler {
	pub fn new() -> Self {
		Self
	}

	/// Reconciles one index answer.
	///
	/// Duplicates are dropped keeping their first position, and the output total is the number
	/// of unique ids. `reported_total` never influences the result; it is clamped to zero and
	/// only compared for diagnostics.
	pub fn reconcile<Id, I>(&self, ids: I, reported_total: i64) -> ReconciledResult<Id>
	where
		Id: Clone + Eq + Hash,
		I: IntoIterator<Item = Id>,
	{
		let ids = ids.into_iter();
		let (lower, _) = ids.size_hint();
		let mut seen = HashSet::with_capacity(lower);
		let mut ordered = Vec::with_capacity(lower);

		for id in ids {
			if seen.insert(id.clone()) {
				ordered.push(id);
			}
		}

		let result = ReconciledResult::from_unique(ordered);
		let drift = result.reported_drift(reported_total);

		if !drift.is_consistent() {
			tracing::debug!(
				total = result.total(),
				reported_total,
				?drift,
				"Index reported total disagrees with returned ids; using ids."
			);
		}

		result
	}

	pub fn reconcile_raw<Id>(&self, raw: RawIndexResponse<Id>) -> ReconciledResult<Id>
	where
		Id: Clone + Eq + Hash,
	{
		self.reconcile(raw.ids, raw.reported_total)
	}

	/// `None` means the backend produced no answer at all. That is treated exactly like an
	/// answer with no ids, never as "match everything".
	pub fn reconcile_response<Id>(&self, raw: Option<RawIndexResponse<Id>>) -> ReconciledResult<Id>
	where
		Id: Clone + Eq + Hash,
	{
		self.reconcile_raw(raw.unwrap_or_else(RawIndexResponse::empty))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_first_occurrence_position() {
		let result = ResultReconciler::new().reconcile([5_i64, 3, 5, 1], 4);

		assert_eq!(result.ordered_ids(), &[5, 3, 1]);
		assert_eq!(result.total(), 3);
	}

	#[test]
	fn missing_response_is_empty() {
		let result = ResultReconciler::new().reconcile_response::<i64>(None);

		assert_eq!(result, ReconciledResult::empty());
	}
}
