use anyhow::Result;
use decoding_stat::config::GenfigConfig;
use decoding_stat::generate_all;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, Level};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "genfig",
    about = "Generation of the bitmask/union decoding benchmark figures"
)]
struct Opt {
    #[structopt(short = "c", long = "config")]
    config: Option<PathBuf>,

    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

pub fn main() -> Result<()> {
    let opt = Opt::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if opt.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let config = match &opt.config {
        Some(path) => GenfigConfig::from_file(path)?,
        None => GenfigConfig::default(),
    };
    debug!("config: {:?}", config);

    generate_all(&config)?;
    Ok(())
}
