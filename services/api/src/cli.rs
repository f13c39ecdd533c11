use crate::demo::run_demo;
use crate::infra::build_desk;
use crate::menu::run_menu;
use crate::server;
use clap::{Args, Parser, Subcommand};
use smart_loan::config::AppConfig;
use smart_loan::error::AppError;
use smart_loan::telemetry;
use std::io;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Smart Loan System",
    about = "Submit, adjudicate, and review loan applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive application menu (default command)
    Menu,
    /// Start the HTTP service
    Serve(ServeArgs),
    /// Submit a scripted set of applications and print the review views
    Demo,
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
    let command = cli.command.unwrap_or(Command::Menu);

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(?config.environment, id_seed = config.intake.id_seed, "smart loan system initialized");

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Menu => {
            let desk = build_desk(config.intake);
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_menu(&desk, stdin.lock(), stdout.lock())
        }
        Command::Demo => {
            let desk = build_desk(config.intake);
            run_demo(&desk, &mut io::stdout().lock())
        }
    }
}
