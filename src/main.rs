use clap::Parser;
use colored::Colorize;

use blogdesk::{
    cli::Cli,
    utils::{init_logger, Reported},
    BlogdeskError,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose, !cli.no_color);

    if let Err(err) = blogdesk::cli::run(cli).await {
        if err.downcast_ref::<Reported>().is_some() {
            std::process::exit(1);
        }
        // Backend messages are shown verbatim, everything else with its context chain
        let message = match err.downcast_ref::<BlogdeskError>() {
            Some(e) => e.user_message(),
            None => format!("{:#}", err),
        };
        eprintln!("{} {}", "error:".red().bold(), message);
        std::process::exit(1);
    }
}
