pub mod query;
pub mod schema;
pub mod session;
pub mod types;
