use clap::Parser;
use color_eyre::Result;

use aios_core::{CommandContext, ExecutionOutcome, GlobalOptions};

mod cli;
mod dispatch;
mod output;
mod style;

use cli::AiosCli;
use output::OutputOptions;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = AiosCli::parse();
    init_tracing(cli.trace, cli.verbose, cli.quiet);

    let global = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
        json: cli.json,
    };

    let info = dispatch::command_info(&cli.command);
    let outcome = match CommandContext::new(&global) {
        Ok(ctx) => dispatch::dispatch_command(&ctx, &cli.command)?,
        Err(err) => ExecutionOutcome::from_error(&err),
    };
    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };
    let code = output::emit_output(&opts, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8, quiet: bool) {
    let level = if trace {
        "trace"
    } else if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("aios={level},aios_core={level},aios_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
