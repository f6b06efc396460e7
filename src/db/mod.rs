pub mod codec;
mod document;
mod store;

pub use document::{Document, RevocationRecord};
pub use store::Store;
