use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    actor::ActorKind,
    alert::build_alert,
    error::ForgeError,
    types::{EventFailure, Forge, IssueSummary, NewIssue, Outcome, RuleSuite, RunSummary},
};

/// Knobs that change what a run does, not what it looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Decide everything but file nothing.
    pub dry_run: bool,
}

/// Returns the login of the organization the installation belongs to.
pub async fn resolve_organization<F>(forge: &F, installation_id: u64) -> Result<String>
where
    F: Forge + Sync,
{
    forge
        .installation_account(installation_id)
        .await
        .with_context(|| format!("Failed to resolve organization for installation {installation_id}"))
}

/// Returns rule suites bypassed in `org` during the last hour.
pub async fn fetch_bypass_events<F>(forge: &F, org: &str) -> Result<Vec<RuleSuite>>
where
    F: Forge + Sync,
{
    if org.is_empty() {
        anyhow::bail!("Organization name must not be empty");
    }

    forge
        .bypassed_rule_suites(org)
        .await
        .with_context(|| format!("Failed to fetch bypassed rule suites for '{org}'"))
}

/// First open issue in `owner/repo` whose title equals `title` exactly.
///
/// This is a lookup, not a lock: another run may file the same title between
/// this call and [`report_bypass`].
pub async fn find_open_issue_by_title<F>(
    forge: &F,
    owner: &str,
    repo: &str,
    title: &str,
) -> Result<Option<IssueSummary>, ForgeError>
where
    F: Forge + Sync,
{
    let issues = forge.open_issues(owner, repo).await?;
    Ok(issues.into_iter().find(|issue| issue.title == title))
}

/// Files `issue` in `owner/repo` and logs its URL.
pub async fn report_bypass<F>(
    forge: &F,
    owner: &str,
    repo: &str,
    issue: &NewIssue,
) -> Result<IssueSummary, ForgeError>
where
    F: Forge + Sync,
{
    let created = forge.create_issue(owner, repo, issue).await?;
    info!("Created issue: {}", created.html_url);
    Ok(created)
}

/// Runs classify, deduplicate and report for a single bypass event.
pub async fn process_rule_suite<F>(
    forge: &F,
    org: &str,
    suite: &RuleSuite,
    options: RunOptions,
) -> Result<Outcome, ForgeError>
where
    F: Forge + Sync,
{
    if let Ok(json) = serde_json::to_string_pretty(suite) {
        debug!("Rule suite {}:\n{}", suite.id, json);
    }

    let Some(actor) = suite.actor_name.as_deref() else {
        warn!(
            "Ignoring rule suite {} in {}: no actor recorded",
            suite.id, suite.repository_name
        );
        return Ok(Outcome::SkippedNoActor);
    };

    let kind = ActorKind::from_name(actor);
    if kind.is_automated() {
        info!("Ignoring {kind} {actor} (rule suite {})", suite.id);
        return Ok(Outcome::SkippedAutomated);
    }

    let repo = suite.repository_name.as_str();
    match suite.pushed_at {
        Some(pushed_at) => info!(
            "Rule suite {} bypassed by {actor} on {repo} {} at {}",
            suite.id,
            suite.git_ref,
            pushed_at.to_rfc3339()
        ),
        None => info!(
            "Rule suite {} bypassed by {actor} on {repo} {}",
            suite.id, suite.git_ref
        ),
    }

    let alert = build_alert(suite, actor);

    if let Some(existing) = find_open_issue_by_title(forge, org, repo, &alert.title).await? {
        info!("Issue already exists: {}", existing.html_url);
        return Ok(Outcome::AlreadyExists {
            url: existing.html_url,
        });
    }

    if options.dry_run {
        info!(
            "Would create issue in {org}/{repo} for {actor}: {}",
            alert.title
        );
        return Ok(Outcome::WouldCreate);
    }

    let created = report_bypass(forge, org, repo, &alert).await?;
    Ok(Outcome::Created {
        url: created.html_url,
    })
}

/// Resolves the organization, fetches its recent bypasses and files an alert
/// for each one made by a human.
///
/// Setup and fetch failures abort the run. A failure while handling one event
/// is logged and recorded in [`RunSummary::failures`]; the remaining events
/// are still processed.
pub async fn run<F>(forge: &F, installation_id: u64, options: RunOptions) -> Result<RunSummary>
where
    F: Forge + Sync,
{
    let organization = resolve_organization(forge, installation_id).await?;
    let suites = fetch_bypass_events(forge, &organization).await?;

    info!("Organization: {organization}");
    info!("Found {} bypassed suites in the last hour.", suites.len());

    let mut summary = RunSummary {
        organization,
        events_found: suites.len(),
        ..RunSummary::default()
    };

    for suite in &suites {
        match process_rule_suite(forge, &summary.organization, suite, options).await {
            Ok(outcome) => summary.outcomes.push((suite.id, outcome)),
            Err(error) => {
                warn!(
                    "Failed to process rule suite {} in {}: {error}",
                    suite.id, suite.repository_name
                );
                summary.failures.push(EventFailure {
                    rule_suite_id: suite.id,
                    repository_name: suite.repository_name.clone(),
                    error,
                });
            }
        }
    }

    info!(
        created = summary.created(),
        already_existing = summary.already_existing(),
        skipped = summary.skipped(),
        would_create = summary.would_create(),
        failed = summary.failures.len(),
        "Run complete"
    );

    Ok(summary)
}
