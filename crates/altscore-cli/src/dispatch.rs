use altscore_client::commands;
use altscore_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, DbCommand, ImportCommand, ReportCommand, SchemaCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Score {
            from,
            to,
            no_narrative,
            ..
        } => {
            let from_value = from.as_ref().map(|value| value.as_str());
            let to_value = to.as_ref().map(|value| value.as_str());
            commands::score::run(from_value, to_value, *no_narrative)
        }
        Commands::Factors { from, to, .. } => {
            let from_value = from.as_ref().map(|value| value.as_str());
            let to_value = to.as_ref().map(|value| value.as_str());
            commands::factors::run(from_value, to_value)
        }
        Commands::Import { command } => match command {
            ImportCommand::Create {
                dry_run,
                json: _,
                path,
            } => commands::import::run(path.as_deref(), *dry_run),
            ImportCommand::List { .. } => commands::import::list(),
        },
        Commands::Report { command } => match command {
            ReportCommand::List { .. } => commands::report::list(),
        },
        Commands::Db { command } => match command {
            DbCommand::Schema { command } => match command {
                Some(SchemaCommand::View { view_name }) => commands::schema::view(view_name),
                None => commands::schema::summary(),
            },
        },
    }
}
