use sift_domain::RecordId;

use crate::{Result, db::Db, models::Record};

/// Fetches records in exactly the order of `ids`.
///
/// Ids without a stored record are skipped, so the output may be shorter than the input. An
/// empty `ids` slice returns without touching the database.
pub async fn fetch_records_by_ids(db: &Db, ids: &[RecordId]) -> Result<Vec<Record>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let records = sqlx::query_as::<_, Record>(
		"\
SELECT record_id, body, created_at
FROM records
WHERE record_id = ANY($1)
ORDER BY array_position($1, record_id)",
	)
	.bind(ids)
	.fetch_all(&db.pool)
	.await?;

	if records.len() < ids.len() {
		tracing::debug!(
			requested = ids.len(),
			found = records.len(),
			"Some indexed records are missing from the record store."
		);
	}

	Ok(records)
}

pub async fn insert_record(db: &Db, record: &Record) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO records (record_id, body, created_at)
VALUES ($1, $2, $3)
ON CONFLICT (record_id) DO UPDATE
SET body = EXCLUDED.body",
	)
	.bind(record.record_id)
	.bind(record.body.as_str())
	.bind(record.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn count_records(db: &Db) -> Result<i64> {
	let count = sqlx::query_scalar("SELECT count(*) FROM records").fetch_one(&db.pool).await?;

	Ok(count)
}
