pub mod site;

pub use site::{ContentExtractor, Indexer, Site};
