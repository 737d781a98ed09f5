use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use sift_domain::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Record {
	pub record_id: RecordId,
	pub body: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
