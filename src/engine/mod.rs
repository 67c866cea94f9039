pub mod assembler;
pub mod pipeline;

pub use assembler::{AccumulatedContent, assemble_chapters};
pub use pipeline::ConvertEngine;
