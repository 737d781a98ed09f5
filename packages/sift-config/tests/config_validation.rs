use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use sift_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("sift_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> sift_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = sift_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error: {err:?}");
	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn template_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Template config must be valid.");

	assert_eq!(cfg.storage.qdrant.collection, "sift_records");
	assert_eq!(cfg.search.default_per_page, 20);
	assert_eq!(cfg.search.max_per_page, 100);
	assert!(!cfg.storage.qdrant.exact_count);
}

#[test]
fn search_section_is_optional() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.as_table_mut().expect("Template config must be a table.").remove("search");

	let cfg = load_payload(toml::to_string(&root).expect("Failed to render config."))
		.expect("Config without [search] must load.");

	assert_eq!(cfg.search.default_per_page, 20);
	assert_eq!(cfg.search.max_per_page, 100);
}

#[test]
fn blank_log_level_falls_back_to_info() {
	let cfg = load_payload(sample_toml_with(&["service"], "log_level", Value::String("  ".into())))
		.expect("Blank log level must normalize.");

	assert_eq!(cfg.service.log_level, "info");
}

#[test]
fn collection_must_be_non_empty() {
	expect_validation(
		sample_toml_with(&["storage", "qdrant"], "collection", Value::String(" ".into())),
		"storage.qdrant.collection must be non-empty.",
	);
}

#[test]
fn pool_size_must_be_positive() {
	expect_validation(
		sample_toml_with(&["storage", "postgres"], "pool_max_conns", Value::Integer(0)),
		"storage.postgres.pool_max_conns must be greater than zero.",
	);
}

#[test]
fn qdrant_timeout_must_be_positive() {
	expect_validation(
		sample_toml_with(&["storage", "qdrant"], "timeout_ms", Value::Integer(0)),
		"storage.qdrant.timeout_ms must be greater than zero.",
	);
}

#[test]
fn default_per_page_must_be_positive() {
	expect_validation(
		sample_toml_with(&["search"], "default_per_page", Value::Integer(0)),
		"search.default_per_page must be greater than zero.",
	);
}

#[test]
fn default_per_page_is_bounded_by_max() {
	expect_validation(
		sample_toml_with(&["search"], "default_per_page", Value::Integer(500)),
		"search.default_per_page must not exceed search.max_per_page.",
	);
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("sift_config_test_missing_file.toml");
	let err = sift_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[service\nhttp_bind = ".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}
