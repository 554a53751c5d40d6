use std::fs::File;
use std::io::{self, BufReader};

use log::debug;
use structopt::StructOpt;

use cmetrics::cliopt::CliOpt;
use cmetrics::runner::Runner;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = CliOpt::from_args();

    let level = if opt.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let runner = Runner::new(opt.encoder());

    let stdout = io::stdout();
    let count = match &opt.input {
        Some(path) => runner.run(BufReader::new(File::open(path)?), stdout.lock())?,
        None => {
            let stdin = io::stdin();
            let reader = stdin.lock();
            runner.run(reader, stdout.lock())?
        }
    };
    debug!("rendered {} records as {:?}", count, opt.format);

    Ok(())
}
