use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	/// Payload field carrying the full-text index used to match search expressions.
	#[serde(default = "default_text_field")]
	pub text_field: String,
	/// Exact counts are slow on large collections; the reported total is only advisory anyway.
	#[serde(default)]
	pub exact_count: bool,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	#[serde(default = "default_per_page")]
	pub default_per_page: u32,
	#[serde(default = "default_max_per_page")]
	pub max_per_page: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { default_per_page: default_per_page(), max_per_page: default_max_per_page() }
	}
}

pub(crate) fn default_log_level() -> String {
	"info".to_string()
}

fn default_text_field() -> String {
	"body".to_string()
}

fn default_timeout_ms() -> u64 {
	5_000
}

fn default_per_page() -> u32 {
	20
}

fn default_max_per_page() -> u32 {
	100
}
