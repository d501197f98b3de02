//! Local store implementations
//!
//! - [`MemoryStore`]: in-memory maps with buffered transactional writes

pub mod memory;

pub use memory::MemoryStore;
