//! Key-value store adapters.

mod memory;

pub use memory::MemoryStore;
