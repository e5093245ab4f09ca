use clap::Parser;

mod args;
mod exit_codes;

use args::Cli;
use descry_core::{RunOutcome, Runner};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            println!("❌ {e}");
            exit_codes::FATAL_ERROR
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let runner = Runner::new(&cli.to_config())?;

    match runner.run(&cli.paths).await? {
        RunOutcome::NoFiles { warnings } => {
            print_warnings(&warnings);
            println!("No descriptor files found to validate");
            Ok(exit_codes::SUCCESS)
        }
        RunOutcome::Completed { warnings, reports } => {
            print_warnings(&warnings);
            println!("Found {} descriptor files to validate", reports.len());

            let mut failed = false;
            for report in &reports {
                for issue in &report.issues {
                    println!("❌ {}: {}", report.path.display(), issue.message);
                    failed = true;
                }
            }

            if failed {
                Ok(exit_codes::VALIDATION_FAILED)
            } else {
                println!("✅ All descriptors validated successfully.");
                Ok(exit_codes::SUCCESS)
            }
        }
    }
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("{warning}");
    }
}
