mod in_memory_store;
mod local_store;

pub use in_memory_store::InMemoryMediaStore;
pub use local_store::LocalMediaStore;
