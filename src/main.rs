//! G2G Delay Recorder - Main CLI Application
//!
//! Collects glass-to-glass delay readings from a serial measurement device,
//! saves them with their statistics and plots a histogram, or replays a
//! previously saved results file.

use anyhow::Context;
use clap::Parser;
use g2g_delay_recorder::{
    app::App,
    cli::Cli,
    config::EnvManager,
    error::{AppError, ErrorReporter, Result},
};
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue together with the command line you used.");
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if cli.print_env_example {
        print!("{}", EnvManager::create_example_env_content());
        return;
    }

    if cli.should_show_topic_help() {
        println!("{}", cli.display_help());
        return;
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    // The acquisition loop blocks on the serial port, so it runs on the
    // blocking pool while this task waits for Ctrl-C
    let run = tokio::task::spawn_blocking(move || run_application(cli));

    tokio::select! {
        joined = run => {
            let outcome = joined
                .context("Application task failed")
                .map_err(AppError::from)
                .and_then(|result| result);

            if let Err(e) = outcome {
                reporter.report_error(&e);
                process::exit(e.exit_code());
            }
        }
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    // Measurements collected so far are discarded
                    println!();
                    println!("Caught interrupt, exiting.");
                    process::exit(0);
                }
                Err(e) => {
                    let error = AppError::from(anyhow::Error::new(e).context("Unable to listen for Ctrl-C"));
                    reporter.report_error(&error);
                    process::exit(error.exit_code());
                }
            }
        }
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    let mut app = App::from_cli(cli)?;
    let summary = app.run()?;

    if app.config().debug {
        println!(
            "Run finished: {:?} mode, {} measurements, session {}",
            summary.mode,
            summary.measurements.len(),
            app.session_id()
        );
    }

    Ok(())
}
