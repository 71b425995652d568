pub mod api;
pub mod config;
pub mod results;
pub mod search;
