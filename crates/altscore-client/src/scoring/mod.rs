pub mod aggregate;
pub mod factors;
pub mod policy;
