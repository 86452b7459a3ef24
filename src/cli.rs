use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{alerter::RunOptions, github::AppCredentials};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

const DEFAULT_TIMEOUT: &str = "30s";

#[derive(Parser, Debug)]
#[command(
    name = "bypass-alerter",
    about = "File a tracking issue for every ruleset bypass by a human in the last hour, asking them to justify it"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// GitHub App id
    #[arg(long, env = "RULESET_BYPASS_ALERTER_APPID", value_name = "ID")]
    pub app_id: String,

    /// GitHub App private key (PEM; literal \n sequences are accepted)
    #[arg(
        long,
        env = "RULESET_BYPASS_ALERTER_PRIVATEKEY",
        value_name = "PEM",
        hide_env_values = true,
        allow_hyphen_values = true
    )]
    pub private_key: String,

    /// Installation id of the app on the target organization
    #[arg(long, env = "RULESET_BYPASS_ALERTER_INSTALLATIONID", value_name = "ID")]
    pub installation_id: String,

    /// HTTP timeout (e.g. 30, 45s, 2m; unitless implies seconds)
    #[arg(
        long,
        env = "RULESET_BYPASS_ALERTER_TIMEOUT",
        default_value = DEFAULT_TIMEOUT,
        value_name = "DURATION"
    )]
    pub timeout: String,

    /// Log what would be filed without creating any issue
    #[arg(long)]
    pub dry_run: bool,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: AppCredentials,
    pub timeout: Duration,
    pub options: RunOptions,
}

fn parse_id(value: &str, what: &str) -> Result<u64> {
    let id: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {what}: '{value}'"))?;
    if id == 0 {
        anyhow::bail!("Invalid {what}: must be positive");
    }
    Ok(id)
}

/// Secrets stores often flatten the key onto one line with escaped newlines.
fn normalise_private_key(raw: &str) -> Result<String> {
    let key = raw.trim().replace("\\n", "\n");
    if !key.contains("-----BEGIN") {
        anyhow::bail!("Private key must be PEM encoded (missing '-----BEGIN' marker)");
    }
    Ok(key)
}

fn parse_timeout(timeout_str: &str) -> Result<Duration> {
    let timeout_str = timeout_str.trim();

    let secs = if let Ok(secs) = timeout_str.parse::<u64>() {
        secs
    } else if let Some(secs_str) = timeout_str.strip_suffix('s') {
        secs_str
            .parse()
            .with_context(|| format!("Invalid timeout seconds: '{secs_str}'"))?
    } else if let Some(mins_str) = timeout_str.strip_suffix('m') {
        let mins: u64 = mins_str
            .parse()
            .with_context(|| format!("Invalid timeout minutes: '{mins_str}'"))?;
        mins.checked_mul(60)
            .with_context(|| format!("Timeout too large: '{timeout_str}'"))?
    } else {
        anyhow::bail!(
            "Invalid timeout format '{timeout_str}'. Supported formats: unitless number (seconds), '45s', '2m'"
        );
    };

    if secs == 0 {
        anyhow::bail!("Timeout must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn build_settings(cli: CliArgs) -> Result<Settings> {
    let credentials = AppCredentials {
        app_id: parse_id(&cli.app_id, "app id")?,
        private_key: normalise_private_key(&cli.private_key)?,
        installation_id: parse_id(&cli.installation_id, "installation id")?,
    };

    Ok(Settings {
        credentials,
        timeout: parse_timeout(&cli.timeout)?,
        options: RunOptions {
            dry_run: cli.dry_run,
        },
    })
}

/// Parses command-line arguments, falling back to the environment for
/// anything not given as a flag.
pub fn parse_args<I, T>(args: I) -> Result<Settings>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_settings(cli)
}
