pub mod backend;
pub mod migration;
pub mod models;
pub mod query;
pub mod schema;
pub mod sqlite;
