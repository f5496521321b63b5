pub mod analytics;
pub mod config;
pub mod dataset;
pub mod output;
pub mod server;
pub mod store;
