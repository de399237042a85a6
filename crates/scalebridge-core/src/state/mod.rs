//! `StateStore` backends: in-memory and JSON file

pub mod file;
pub mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
