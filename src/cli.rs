use std::path::PathBuf;

use log::LevelFilter;

use crate::config::{DEFAULT_KEY_FILE, DEFAULT_VIEW_ID};

#[derive(clap::Parser, Debug)]
#[command(
    version,
    about = "Fetch a fixed Google Analytics report with a service account and print its rows"
)]
pub struct Args {
    /// Service account JSON key file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_KEY_FILE)]
    pub key_file: PathBuf,

    /// Analytics view to query
    #[arg(long, value_name = "ID", default_value = DEFAULT_VIEW_ID)]
    pub view_id: String,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
