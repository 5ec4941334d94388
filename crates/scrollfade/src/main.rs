mod bindings;
mod bootstrap;
mod cli;
mod inspect;
mod paths;
mod run;
mod simulate;

use std::io;

use anyhow::Result;
use cli::{Command, RunArgs, SimulateArgs};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Simulate(args)) => run_simulate(&cli.run, &args),
        Some(Command::Inspect) => run_inspect(&cli.run),
        None => run::run(cli.run),
    }
}

fn run_simulate(run_args: &RunArgs, args: &SimulateArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let loaded = bootstrap::load_config(run_args.config.as_deref(), &paths)?;
    let params =
        bindings::transition_params(&loaded.config.transition, args.sensitivity, args.wrap);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(last) = simulate::run(args, params, &mut out)? {
        tracing::debug!(
            frame = last.frame,
            position = last.position,
            current = last.current,
            "simulation finished"
        );
    }
    Ok(())
}

fn run_inspect(run_args: &RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let loaded = bootstrap::load_config(run_args.config.as_deref(), &paths)?;
    let config = bindings::renderer_config(&loaded, run_args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    inspect::report(&mut out, &loaded, &config)
}
