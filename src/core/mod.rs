pub mod config;
pub mod epub;
pub mod error;
pub mod model;
