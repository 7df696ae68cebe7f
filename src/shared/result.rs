/// Crate-wide Result alias backed by `anyhow::Error`.
///
/// Setup failures are raised as [`crate::shared::error::AuditError`] and
/// converted into `anyhow::Error` at the boundary.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
