pub const BM25_VECTOR_NAME: &str = "bm25";
pub const BM25_MODEL: &str = "qdrant/bm25";

use std::{collections::HashMap, time::Duration};

use qdrant_client::{
	client::Payload,
	qdrant::{
		Condition, CountPointsBuilder, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder,
		Document, FieldType, Filter, Modifier, PointId, PointStruct, Query, QueryPointsBuilder,
		ScoredPoint, SparseVectorParamsBuilder, SparseVectorsConfigBuilder, UpsertPointsBuilder,
		Value, Vector, point_id::PointIdOptions,
	},
};

use sift_domain::RecordId;

use crate::{Error, Result, models::Record};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub text_field: String,
	pub exact_count: bool,
}
impl QdrantStore {
	pub fn new(cfg: &sift_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url)
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			text_field: cfg.text_field.clone(),
			exact_count: cfg.exact_count,
		})
	}

	/// Creates the collection with a BM25 sparse vector and a full-text payload index when it does
	/// not exist yet.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		let mut sparse_vectors_config = SparseVectorsConfigBuilder::default();

		sparse_vectors_config.add_named_vector_params(
			BM25_VECTOR_NAME,
			SparseVectorParamsBuilder::default().modifier(Modifier::Idf as i32),
		);

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone())
					.sparse_vectors_config(sparse_vectors_config),
			)
			.await?;
		self.client
			.create_field_index(
				CreateFieldIndexCollectionBuilder::new(
					self.collection.clone(),
					self.text_field.clone(),
					FieldType::Text,
				)
				.wait(true),
			)
			.await?;

		tracing::info!(collection = %self.collection, "Created Qdrant collection.");

		Ok(())
	}

	pub async fn upsert_record(&self, record: &Record) -> Result<()> {
		let point_id = u64::try_from(record.record_id).map_err(|_| {
			Error::InvalidArgument(format!(
				"record_id {} cannot be used as a Qdrant point id.",
				record.record_id
			))
		})?;
		let mut payload = Payload::new();

		payload.insert("record_id", Value::from(record.record_id));
		payload.insert(self.text_field.as_str(), record.body.clone());

		let mut vectors = HashMap::new();

		vectors.insert(
			BM25_VECTOR_NAME.to_string(),
			Vector::from(Document::new(record.body.clone(), BM25_MODEL)),
		);

		let point = PointStruct::new(point_id, vectors, payload);

		self.client
			.upsert_points(
				UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true),
			)
			.await?;

		Ok(())
	}

	/// Ranked ids for one page of `expression`. Duplicates are passed through untouched.
	pub async fn query_ids(
		&self,
		expression: &str,
		offset: u64,
		limit: u64,
	) -> Result<Vec<ScoredPoint>> {
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(Document::new(expression.to_string(), BM25_MODEL)))
			.using(BM25_VECTOR_NAME)
			.filter(self.text_filter(expression))
			.offset(offset)
			.limit(limit)
			.with_payload(false);
		let response = self.client.query(search).await?;

		Ok(response.result)
	}

	/// Claimed match count for `expression`, computed independently of [`Self::query_ids`].
	///
	/// Returns `None` when the backend answered without a count.
	pub async fn count_matches(&self, expression: &str) -> Result<Option<u64>> {
		let response = self
			.client
			.count(
				CountPointsBuilder::new(self.collection.clone())
					.filter(self.text_filter(expression))
					.exact(self.exact_count),
			)
			.await?;

		Ok(response.result.map(|result| result.count))
	}

	fn text_filter(&self, expression: &str) -> Filter {
		Filter::must([Condition::matches_text(self.text_field.clone(), expression.to_string())])
	}
}

pub fn point_id_to_record_id(point_id: &PointId) -> Option<RecordId> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(id)) => RecordId::try_from(*id).ok(),
		_ => None,
	}
}
