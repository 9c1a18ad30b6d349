//! Storage implementations for different backends

mod codec;
pub mod in_memory;
pub mod json_file;
#[cfg(feature = "lmdb")]
pub mod lmdb;

pub use codec::DEFAULT_STORAGE_KEY;
pub use in_memory::InMemoryInvoiceStore;
pub use json_file::JsonFileInvoiceStore;
#[cfg(feature = "lmdb")]
pub use lmdb::LmdbInvoiceStore;
