mod buckets_cmd;
mod cli;
mod info_cmd;
mod page_range;
mod shared;
mod sheets_cmd;

use clap::Parser;
use cli::Cli;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Sheets {
            ref file,
            ref pages,
            ref format,
            ref grid,
            sequential,
        } => sheets_cmd::run(file, pages.as_deref(), format, grid, sequential),
        cli::Commands::Buckets {
            ref file,
            ref pages,
            ref format,
            ref grid,
        } => buckets_cmd::run(file, pages.as_deref(), format, grid),
        cli::Commands::Info {
            ref file,
            ref format,
        } => info_cmd::run(file, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
