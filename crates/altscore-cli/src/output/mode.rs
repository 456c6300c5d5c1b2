use crate::cli::{Commands, ImportCommand, ReportCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Score { json, .. } | Commands::Factors { json, .. } => {
            if *json {
                OutputMode::Json
            } else {
                OutputMode::Text
            }
        }
        Commands::Import { command } => match command {
            ImportCommand::Create { json, .. } | ImportCommand::List { json } => {
                if *json {
                    OutputMode::Json
                } else {
                    OutputMode::Text
                }
            }
        },
        Commands::Report { command } => match command {
            ReportCommand::List { json } => {
                if *json {
                    OutputMode::Json
                } else {
                    OutputMode::Text
                }
            }
        },
        Commands::Db { .. } => OutputMode::Text,
    }
}
