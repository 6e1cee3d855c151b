//! Document store adapters that live in process.

mod memory;

pub use memory::MemoryDocumentStore;
