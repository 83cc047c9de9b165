pub mod api;
pub mod error;
pub mod service;
pub mod store;
