use anyhow::Context;
use bypass_alerter::{GitHub, parse_args, run};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The run log is the program's output, so it goes to stdout.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = match parse_args(std::env::args()) {
        Ok(settings) => settings,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let github = GitHub::connect(&settings.credentials, settings.timeout)
        .context("Failed to authenticate as GitHub App")?;

    let summary = run(
        &github,
        settings.credentials.installation_id,
        settings.options,
    )
    .await?;

    if summary.has_failures() {
        anyhow::bail!(
            "{} of {} bypass events could not be processed",
            summary.failures.len(),
            summary.events_found
        );
    }

    Ok(())
}
