pub mod reconcile;
pub mod result;

pub use reconcile::ResultReconciler;
pub use result::{RawIndexResponse, ReconciledResult, ReportedDrift};

/// Identifier type used by the record store and the default index adapter.
pub type RecordId = i64;
