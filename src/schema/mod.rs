//! Reading, storing and comparing OpenAPI schema documents.

pub mod fetcher;
pub mod store;

pub use fetcher::SchemaInput;
pub use store::{SchemaStore, canonicalize};
