mod adapters;
mod cli;
mod core;
mod error;
mod logging;
mod protocol;
mod view;

use clap::Parser;

use crate::{cli::Args, error::AppResult};

fn main() -> AppResult<()> {
    let args = Args::parse();
    logging::init(&args.log_level, args.browse);

    if args.browse {
        adapters::terminal::run(args)
    } else {
        adapters::vscode_bridge::run(args)
    }
}
