mod api;
mod cli;
mod config;
mod fleet;
mod utils;

use std::time::Duration;

use clap::Parser;
use env_logger::Env;

use api::ApiClient;
use cli::Cli;
use fleet::styles::Styles;
use fleet::{output, RunOptions};

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let credentials = config::resolve_credentials()?;
    let client = ApiClient::new(&credentials, cli.timeout.map(Duration::from_secs));

    let options = RunOptions {
        selection: cli.selection(),
        action: cli.action(),
        json: cli.json,
        styles: Styles::for_stdout(cli.no_color),
        width: output::terminal_width(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    fleet::run(&client, &options, &mut out).map_err(|e| {
        if e.is_request() {
            anyhow::Error::new(e).context(format!("request to {} failed", credentials.url))
        } else {
            e.into()
        }
    })
}
