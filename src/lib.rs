pub mod assemble;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod normalize;
pub mod pipeline;
pub mod types;
