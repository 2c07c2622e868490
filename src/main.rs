use clap::Parser;

mod cli;
mod config;
mod download;
mod error;
mod input;
mod logging;
mod resolve;
mod validate;

use cli::Cli;
use download::Downloader;
use error::Result;

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load(&cli.config)?;
    let entries = input::read_entries(&cli.input, &cfg.target_dir)?;

    let downloader = Downloader::new(&cfg.target_dir, cli.verbose, &cfg.network)?;
    downloader.download_all(entries).await
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help / --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    logging::init(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("listdl error: {:#}", anyhow::Error::new(err));
        std::process::exit(code);
    }
}
