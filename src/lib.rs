pub mod analyzers;
pub mod api;
pub mod config;
pub mod filter;
pub mod output;
pub mod reading;
pub mod stats;
pub mod store;
pub mod validation;
