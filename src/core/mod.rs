pub mod context;
pub mod converter;
pub mod engine;
pub mod types;
