pub mod auth;
pub mod config;
pub mod error;
pub mod listing;
pub mod lookups;
pub mod services;
pub mod store;
