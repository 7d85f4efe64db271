pub mod app;
pub mod changes;
pub mod config;
pub mod error;
pub mod filter;
pub mod matrix;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod scan;
