pub mod date;
pub mod query;
pub mod types;
