use crate::commands::{run_batch, run_decide, BatchArgs, DecideArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use repair_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Repair Advisor",
    about = "Decide whether to repair, buy used, donate or recycle a broken item",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a single item and print the ranked options
    Decide(DecideArgs),
    /// Evaluate every row of a CSV file
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Decide(args) => run_decide(args),
        Command::Batch(args) => run_batch(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repair_advisor::decision::{ItemType, Priority, ProblemType};

    #[test]
    fn decide_parses_snake_case_tags() {
        let cli = Cli::try_parse_from([
            "repair-advisor-api",
            "decide",
            "--item",
            "phone",
            "--problem",
            "no-power",
            "--budget",
            "1500",
            "--days",
            "3",
            "--priority",
            "save_time",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Decide(args)) => {
                assert_eq!(args.item, ItemType::Phone);
                assert_eq!(args.problem, ProblemType::NoPower);
                assert_eq!(args.budget, 1500.0);
                assert_eq!(args.priority, Some(Priority::SaveTime));
                assert!(!args.json);
            }
            other => panic!("expected decide command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_item() {
        let result = Cli::try_parse_from([
            "repair-advisor-api",
            "decide",
            "--item",
            "toaster",
            "--problem",
            "other",
            "--budget",
            "100",
            "--days",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["repair-advisor-api"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
