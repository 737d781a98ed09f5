use serde::{Deserialize, Serialize};

use sift_domain::{RecordId, ReconciledResult};
use sift_storage::models::Record;

use crate::{Error, Result, SiftService};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub expression: String,
	pub page: Option<u32>,
	pub per_page: Option<u32>,
}

/// Paging metadata for one [`SearchResponse`].
///
/// A page only ever carries up to `per_page` reconciled ids, so the full result size is unknown.
/// `estimated_pages` and `has_next` are derived from the backend's claimed total, raised to at
/// least the ids seen up to this page, and are advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
	pub page: u32,
	pub per_page: u32,
	pub estimated_pages: u64,
	pub has_prev: bool,
	pub has_next: bool,
}
impl Pagination {
	pub fn new(page: u32, per_page: u32, returned: u64, reported_total: i64) -> Self {
		if returned == 0 || per_page == 0 {
			return Self { page, per_page, estimated_pages: 0, has_prev: false, has_next: false };
		}

		let per_page_wide = u64::from(per_page);
		let seen = u64::from(page.saturating_sub(1)).saturating_mul(per_page_wide) + returned;
		let estimated_total = seen.max(u64::try_from(reported_total).unwrap_or(0));
		let estimated_pages = estimated_total.div_ceil(per_page_wide);
		// A short page is the last one whatever the backend claims.
		let has_next = returned >= per_page_wide && u64::from(page) < estimated_pages;

		Self { page, per_page, estimated_pages, has_prev: page > 1, has_next }
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	pub items: Vec<Record>,
	/// Number of unique ids the index actually returned. Never the backend's claimed count.
	pub total: u64,
	pub is_empty: bool,
	#[serde(flatten)]
	pub pagination: Pagination,
}
impl SearchResponse {
	/// The explicit "no matches" response.
	pub fn empty(page: u32, per_page: u32) -> Self {
		Self {
			items: Vec::new(),
			total: 0,
			is_empty: true,
			pagination: Pagination::new(page, per_page, 0, 0),
		}
	}

	fn from_reconciled(
		items: Vec<Record>,
		reconciled: &ReconciledResult<RecordId>,
		reported_total: i64,
		page: u32,
		per_page: u32,
	) -> Self {
		Self {
			items,
			total: reconciled.total(),
			is_empty: reconciled.is_empty(),
			pagination: Pagination::new(page, per_page, reconciled.total(), reported_total),
		}
	}
}

impl SiftService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let page = req.page.unwrap_or(1);

		if page == 0 {
			return Err(Error::InvalidRequest { message: "page must be 1 or greater.".to_string() });
		}

		let per_page = resolve_per_page(&self.cfg.search, req.per_page)?;
		let expression = req.expression.trim();

		if expression.is_empty() {
			tracing::debug!(page, per_page, "Blank search expression; nothing can match.");

			return Ok(SearchResponse::empty(page, per_page));
		}

		let raw = match self.backends.index.query(expression, page, per_page).await {
			Ok(raw) => Some(raw),
			Err(err) => {
				tracing::warn!(
					error = %err,
					kind = err.kind(),
					page,
					per_page,
					"Search backend failed; treating it as no matches."
				);

				None
			},
		};
		let reported_total = raw.as_ref().map(|raw| raw.reported_total).unwrap_or(0);
		let reconciled = self.reconciler.reconcile_response(raw);
		let items = if reconciled.is_empty() {
			self.backends.store.empty_result_set()
		} else {
			self.backends.store.fetch_by_ids_preserving_order(reconciled.ordered_ids()).await?
		};

		tracing::info!(
			page,
			per_page,
			total = reconciled.total(),
			reported_total,
			fetched = items.len(),
			"Search completed."
		);

		Ok(SearchResponse::from_reconciled(items, &reconciled, reported_total, page, per_page))
	}

	/// First-page empty response, built without consulting any backend.
	pub fn empty_search(&self) -> SearchResponse {
		SearchResponse::empty(1, self.cfg.search.default_per_page)
	}
}

fn resolve_per_page(cfg: &sift_config::Search, requested: Option<u32>) -> Result<u32> {
	match requested {
		None => Ok(cfg.default_per_page),
		Some(0) =>
			Err(Error::InvalidRequest { message: "per_page must be 1 or greater.".to_string() }),
		Some(per_page) => Ok(per_page.min(cfg.max_per_page)),
	}
}
