mod cli;
mod report;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dt_apibuilder::{InvocationForm, Service};

use cli::{Cli, Format};
use report::Report;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(cli: &Cli) -> anyhow::Result<Vec<Service>> {
    let json = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    if cli.invocation_form {
        let form = InvocationForm::from_json(&json).with_context(|| {
            format!("{} is not a valid invocation form", cli.input.display())
        })?;
        info!(
            service = %form.service,
            imported = form.imported_services.len(),
            user_agent = form.user_agent.as_deref().unwrap_or("unknown"),
            "loaded invocation form"
        );
        let mut services = vec![form.service];
        services.extend(form.imported_services);
        Ok(services)
    } else {
        let service = Service::from_json(&json).with_context(|| {
            format!("{} is not a valid service definition", cli.input.display())
        })?;
        Ok(vec![service])
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let services = load(cli)?;

    let mut reports = Vec::with_capacity(services.len());
    for (index, service) in services.iter().enumerate() {
        let mut report = Report::new(service);
        // --type names refer to the primary service only.
        if index == 0 {
            for type_name in &cli.types {
                report.add(service, "argument", type_name);
            }
        }
        if cli.resolves_all_fields() {
            report.add_all(service);
        }
        reports.push(report);
    }

    match cli.format {
        Format::Text => {
            for report in &reports {
                print!("{report}");
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&reports).context("failed to encode report")?;
            println!("{json}");
        }
    }

    let failures: usize = reports.iter().map(Report::failures).sum();
    if failures > 0 {
        warn!(failures, "some type references could not be resolved");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
