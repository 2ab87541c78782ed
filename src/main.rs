use clap::Parser;

use nightjar::{cli, command, config, result::Result};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let log_config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("nightjar")
        .build();

    simplelog::TermLogger::init(
        filter,
        log_config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = config::Config::load(cli_args.config.as_deref())?;

    match &cli_args.command {
        cli::Command::Nightly { repo } => {
            command::nightly::execute(repo, &config)
        }
        cli::Command::UpdateDeps { path } => command::update_deps::execute(path),
        cli::Command::Refresh => command::refresh::execute(&config),
    }
}
