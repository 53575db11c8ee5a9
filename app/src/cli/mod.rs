use clap::{Parser, Subcommand};

mod check;
mod clean;
mod gen_completions;

pub fn exec() -> Result<(), Vec<miette::Report>> {
    let cli = Cli::parse();
    // Initialize the logger based on the flags
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp(None).format_level(false).format_target(false);

    if cli.trace {
        builder.filter_level(log::LevelFilter::Trace);
    } else if cli.debug {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    builder.init();

    use Command::*;
    match cli.command {
        Check(args) => check::exec(args),
        Clean(args) => clean::exec(args),
        GenerateCompletion(args) => gen_completions::exec(args),
    }
}

#[derive(Parser)]
#[clap(version, author, about, long_about = None)]
struct Cli {
    /// Enable trace logging
    #[clap(long)]
    trace: bool,
    /// Enable debug logging
    #[clap(long)]
    debug: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Typecheck a module and run its directives
    Check(check::Args),
    /// Remove compiled object files
    Clean(clean::Args),
    /// Generate completion scripts for various shells
    GenerateCompletion(gen_completions::Args),
}
