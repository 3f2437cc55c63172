use std::path::Path;

use anyhow::{Context, Result};

use gxp_provision::{
    cli::{Command, DEFAULT_CONFIG_PATH, USAGE, parse_args},
    commands::run,
    config::Config,
    logging::init_tracing,
};

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::load_or_default(
        args.config_path.as_deref(),
        Path::new(DEFAULT_CONFIG_PATH),
    )
    .context("failed to load configuration")?;
    let _logging = init_tracing(&config.logging)?;

    let output = run(&args.command, &config)?;
    println!("{output}");
    Ok(())
}
