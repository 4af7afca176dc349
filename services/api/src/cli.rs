use crate::quote::{run_quote, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use staybook::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Staybook",
    about = "Serve the short-stay booking API or quote stays from the command line",
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
    /// Price a stay against the standard or a custom package catalog
    Quote(QuoteArgs),
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
        Command::Quote(args) => run_quote(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["staybook"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn quote_arguments_parse() {
        let cli = Cli::try_parse_from([
            "staybook",
            "quote",
            "--from",
            "2026-05-01",
            "--to",
            "2026-05-15",
            "--entitlement",
            "pro",
            "--include-addons",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Quote(args)) => {
                assert_eq!(args.entitlement.label(), "pro");
                assert!(args.include_addons);
                assert!(args.nights.is_none());
                assert!(args.from.is_some());
            }
            other => panic!("expected quote command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_entitlement_is_rejected() {
        assert!(Cli::try_parse_from(["staybook", "quote", "--entitlement", "gold"]).is_err());
    }
}
