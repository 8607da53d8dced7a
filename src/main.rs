//! smithy-run CLI - run a feedstock build step inside docker

use clap::Parser;
use smithy_run::cli::Args;
use smithy_run::{
    format_output, BuildConfig, InvocationWrapper, Outcome, OutputFormat, ProcessRuntime,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> smithy_run::Result<()> {
    let output_format = if args.json { OutputFormat::Json } else { OutputFormat::Human };
    let dry_run = args.dry_run;
    let config = BuildConfig::from(args);
    let wrapper = InvocationWrapper::new(config, &ProcessRuntime);

    let outcome = if dry_run {
        Outcome::Planned(wrapper.plan()?)
    } else {
        Outcome::Completed(wrapper.run()?)
    };

    println!("{}", format_output(&outcome, &output_format));
    Ok(())
}
