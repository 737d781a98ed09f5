pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sift_storage::Error> for Error {
	fn from(err: sift_storage::Error) -> Self {
		match err {
			sift_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			sift_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			sift_storage::Error::Qdrant(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

/// Failures of an [`crate::IndexAdapter`].
///
/// These never reach callers of [`crate::SiftService::search`]; the service replaces them with
/// an empty index response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
	#[error("Search backend unavailable: {message}")]
	BackendUnavailable { message: String },
	#[error("Malformed search backend response: {message}")]
	MalformedBackendResponse { message: String },
}
impl IndexError {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::BackendUnavailable { .. } => "backend_unavailable",
			Self::MalformedBackendResponse { .. } => "malformed_backend_response",
		}
	}
}
impl From<sift_storage::Error> for IndexError {
	fn from(err: sift_storage::Error) -> Self {
		match err {
			sift_storage::Error::Qdrant(inner) =>
				Self::BackendUnavailable { message: inner.to_string() },
			other => Self::MalformedBackendResponse { message: other.to_string() },
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Error, IndexError};

	#[test]
	fn storage_errors_map_to_caller_facing_variants() {
		let err = Error::from(sift_storage::Error::InvalidArgument("bad id".to_string()));

		assert!(matches!(err, Error::InvalidRequest { ref message } if message == "bad id"));

		let err = IndexError::from(sift_storage::Error::InvalidArgument("bad id".to_string()));

		assert_eq!(err.kind(), "malformed_backend_response");
	}
}
