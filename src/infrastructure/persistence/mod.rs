mod in_memory_session_repository;
mod sqlite_pool;
mod sqlite_session_repository;

pub use in_memory_session_repository::InMemorySessionRepository;
pub use sqlite_pool::connect_sqlite;
pub use sqlite_session_repository::SqliteSessionRepository;
