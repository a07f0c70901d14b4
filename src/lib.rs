pub mod config;
pub mod directory;
pub mod errors;
pub mod executor;
pub mod render;
pub mod resolution;
pub mod scanner;
pub mod types;
