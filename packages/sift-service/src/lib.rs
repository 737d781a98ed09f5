pub mod search;

mod error;

pub use error::{Error, IndexError, Result};
pub use search::{Pagination, SearchRequest, SearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use qdrant_client::qdrant::ScoredPoint;

use sift_config::Config;
use sift_domain::{RawIndexResponse, RecordId, ResultReconciler};
use sift_storage::{
	db::Db,
	models::Record,
	qdrant::{self, QdrantStore},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Ranked retrieval backend. Returns raw, unreconciled answers.
pub trait IndexAdapter
where
	Self: Send + Sync,
{
	fn query<'a>(
		&'a self,
		expression: &'a str,
		page: u32,
		per_page: u32,
	) -> BoxFuture<'a, Result<RawIndexResponse<RecordId>, IndexError>>;
}

/// Materializes reconciled ids into records.
pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Returns records in the order of `ids`, skipping ids with no stored record.
	fn fetch_by_ids_preserving_order<'a>(
		&'a self,
		ids: &'a [RecordId],
	) -> BoxFuture<'a, Result<Vec<Record>>>;

	fn empty_result_set(&self) -> Vec<Record> {
		Vec::new()
	}
}

#[derive(Clone)]
pub struct Backends {
	pub index: Arc<dyn IndexAdapter>,
	pub store: Arc<dyn RecordStore>,
}
impl Backends {
	pub fn new(index: Arc<dyn IndexAdapter>, store: Arc<dyn RecordStore>) -> Self {
		Self { index, store }
	}
}

pub struct SiftService {
	pub cfg: Config,
	pub backends: Backends,
	pub reconciler: ResultReconciler,
}
impl SiftService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		let backends =
			Backends::new(Arc::new(QdrantIndex::new(qdrant)), Arc::new(PgRecordStore::new(db)));

		Self::with_backends(cfg, backends)
	}

	pub fn with_backends(cfg: Config, backends: Backends) -> Self {
		Self { cfg, backends, reconciler: ResultReconciler::new() }
	}
}

/// [`IndexAdapter`] over a Qdrant collection.
///
/// Ids and the reported total come from two separate Qdrant calls, so they can disagree.
pub struct QdrantIndex {
	store: QdrantStore,
}
impl QdrantIndex {
	pub fn new(store: QdrantStore) -> Self {
		Self { store }
	}

	async fn query_inner(
		&self,
		expression: &str,
		page: u32,
		per_page: u32,
	) -> Result<RawIndexResponse<RecordId>, IndexError> {
		let offset = u64::from(page.saturating_sub(1)) * u64::from(per_page);
		let (points, count) = tokio::join!(
			self.store.query_ids(expression, offset, u64::from(per_page)),
			self.store.count_matches(expression),
		);

		raw_response(points?, count)
	}
}
impl IndexAdapter for QdrantIndex {
	fn query<'a>(
		&'a self,
		expression: &'a str,
		page: u32,
		per_page: u32,
	) -> BoxFuture<'a, Result<RawIndexResponse<RecordId>, IndexError>> {
		Box::pin(self.query_inner(expression, page, per_page))
	}
}

/// [`RecordStore`] over the Postgres `records` table.
pub struct PgRecordStore {
	db: Db,
}
impl PgRecordStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl RecordStore for PgRecordStore {
	fn fetch_by_ids_preserving_order<'a>(
		&'a self,
		ids: &'a [RecordId],
	) -> BoxFuture<'a, Result<Vec<Record>>> {
		Box::pin(async move { Ok(queries::fetch_records_by_ids(&self.db, ids).await?) })
	}
}

/// Builds the raw answer from a page of points and the separately fetched match count.
///
/// The points are authoritative. A failed or missing count only loses the claimed total, which
/// then reads as zero; an unusable point id rejects the whole page.
fn raw_response(
	points: Vec<ScoredPoint>,
	count: sift_storage::Result<Option<u64>>,
) -> Result<RawIndexResponse<RecordId>, IndexError> {
	let mut ids = Vec::with_capacity(points.len());

	for point in &points {
		let id = point.id.as_ref().and_then(qdrant::point_id_to_record_id).ok_or_else(|| {
			IndexError::MalformedBackendResponse {
				message: format!("Point id {:?} is not a record id.", point.id),
			}
		})?;

		ids.push(id);
	}

	let reported_total = match count {
		Ok(Some(count)) => i64::try_from(count).unwrap_or(i64::MAX),
		Ok(None) => {
			tracing::warn!(returned = ids.len(), "Count response is missing its result.");

			0
		},
		Err(err) => {
			tracing::warn!(error = %err, returned = ids.len(), "Failed to count search matches.");

			0
		},
	};

	Ok(RawIndexResponse::new(ids, reported_total))
}
