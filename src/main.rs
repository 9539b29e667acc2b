use clap::Parser;
use miette::Result;
use regions::cli::{Cli, Commands};
use regions::output::Printer;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let printer = Printer::new();
    let settings = cli.settings()?;

    match cli.command {
        Commands::Mask(args) => regions::cli::mask::run(args, &settings, &printer)?,
        Commands::Info(args) => regions::cli::info::run(args, &printer)?,
        Commands::Contains(args) => regions::cli::contains::run(args, &printer)?,
        Commands::Validate(args) => regions::cli::validate::run(args, &settings, &printer)?,
        Commands::Completions(args) => regions::cli::completions::run(args)?,
    }

    Ok(())
}
