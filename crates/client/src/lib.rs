//! HTTP adapters for the record store and extraction services, plus the
//! system clipboard, used by the `formscan` command line.

pub mod clipboard;
pub mod display;
pub mod extract;
pub mod store;

pub use clipboard::SystemClipboard;
pub use extract::ExtractionClient;
pub use store::HttpRecordStore;
