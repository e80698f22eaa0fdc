use std::process::exit;

use anyhow::{Context, Result};
use log::error;
use simple_logger::SimpleLogger;

use analytics_report::cli::Args;
use analytics_report::{ReportConfig, fetch_report, load_client, print_report};

fn run(args: &Args) -> Result<()> {
    let client =
        load_client(&args.key_file).context("Error initializing Analytics Reporting service")?;

    let config = ReportConfig::default().with_view_id(args.view_id.as_str());
    let response = fetch_report(&client, &config).context("Error getting Analytics report")?;

    print_report(&response);
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = SimpleLogger::new().with_level(args.log_level()).init() {
        eprintln!("Failed to initialise logger: {:?}", e);
    }

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        exit(1);
    }
}
