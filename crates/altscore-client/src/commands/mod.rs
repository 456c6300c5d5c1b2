pub mod common;
pub mod factors;
pub mod import;
pub mod report;
pub mod schema;
pub mod score;
