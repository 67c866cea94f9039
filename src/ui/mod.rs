pub mod progress;

pub use progress::{PageProgress, get_multi};
