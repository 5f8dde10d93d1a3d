//! Storage backends for Folio.
//!
//! Provides [`MemoryStore`], a `LedgerStore` held entirely in process
//! memory. Each batch write takes one write lock, so a batch is applied
//! completely or not at all.

mod memory;
mod tables;

pub use memory::MemoryStore;
