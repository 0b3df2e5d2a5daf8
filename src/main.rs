//! Folio - a small, scriptable static site builder.

use anyhow::Result;
use clap::Parser;
use folio::{
    build::build_site,
    cli::{Cli, Commands},
    config::SiteConfig,
    init::new_site,
    log, logger,
};
use std::{env, process};

fn main() {
    let cli = Cli::parse();
    logger::set_quiet(cli.quiet);

    if let Err(err) = run(&cli) {
        log!("error"; "{err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Init { name }) => {
            let cwd = env::current_dir()?;
            let root = name.as_ref().map_or_else(|| cwd.clone(), |name| cwd.join(name));
            new_site(&root)
        }
        Some(Commands::Build { .. }) | None => {
            let config = load_config(cli)?;
            build_site(config).map(|_| ())
        }
    }
}

/// Load the config file and apply CLI overrides.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = SiteConfig::load(&cli.config)?;
    config.update_with_cli(cli);
    Ok(config)
}
