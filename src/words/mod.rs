pub mod model;
pub mod store;

pub use model::{Folder, Word, WordStats};
pub use store::{JsonWordStore, Library, MemoryWordStore, WordStore};
