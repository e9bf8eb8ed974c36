#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("query failed: {0}")]
    QueryFailed(String),
    /// Also returned when a guarded status update matched no row, meaning
    /// the session was missing or not in the expected state.
    #[error("not found: {0}")]
    NotFound(String),
}
