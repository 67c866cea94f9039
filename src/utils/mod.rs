pub mod markup;
pub mod links;

pub use self::links::{extract_book_and_page_ids, query_number, resolve_page_url};
