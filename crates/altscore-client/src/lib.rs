pub mod commands;
pub mod contracts;
pub mod error;
pub mod explain;
mod import;
pub mod ledger;
pub mod migrations;
pub mod report;
pub mod scoring;
pub mod setup;
pub mod state;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
