mod cli;
mod config;
mod report;
mod runner;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{CheckArgs, Cli, Command};
use recon::{Severity, Verdict};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage problems are configuration errors: the harness must see
            // UNKNOWN, not a drift severity.
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => exit_code(Severity::Unknown),
            };
        }
    };

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Check(args) => run_check(&args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "driftcheck", &mut io::stdout());
            ExitCode::SUCCESS
        }
    }
}

fn run_check(args: &CheckArgs) -> ExitCode {
    let file = match config::FileConfig::load(args.config.as_deref()) {
        Ok(file) => file,
        Err(err) => return report_unknown(&format!("{err:#}")),
    };

    let check = match runner::Check::from_args(args, &file) {
        Ok(check) => check,
        Err(err) => return report_unknown(&format!("{err:#}")),
    };

    let outcome = check.run();
    println!("{}", report::plugin_line(&outcome.verdict));

    if args.details {
        if let Some(drift) = &outcome.drift {
            report::display_details(drift);
        }
    }

    exit_code(outcome.verdict.severity)
}

fn report_unknown(message: &str) -> ExitCode {
    println!("{}", report::plugin_line(&Verdict::unknown(message)));
    exit_code(Severity::Unknown)
}

fn exit_code(severity: Severity) -> ExitCode {
    ExitCode::from(severity.exit_code() as u8)
}
