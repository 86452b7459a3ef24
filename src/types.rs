use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ForgeError;

/// Result of a single rule-suite evaluation, as returned by the
/// organization rule-suites endpoint.
///
/// Only the fields the alerter acts on are decoded; the rest of the payload
/// is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSuite {
    pub id: u64,
    pub repository_name: String,
    /// Null when the pushing account has since been deleted.
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub result: String,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// An existing issue, reduced to what deduplication and logging need.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub html_url: String,
}

/// Contents of an issue about to be filed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub assignees: Vec<String>,
}

/// The source-control platform operations the alerter depends on.
///
/// [`crate::GitHub`] talks to the GitHub REST API; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait Forge {
    /// Login of the account the installation is bound to.
    async fn installation_account(&self, installation_id: u64) -> Result<String, ForgeError>;

    /// Rule suites bypassed within the last hour, across every page.
    async fn bypassed_rule_suites(&self, org: &str) -> Result<Vec<RuleSuite>, ForgeError>;

    /// Every open issue in `owner/repo`, pull requests excluded.
    async fn open_issues(&self, owner: &str, repo: &str) -> Result<Vec<IssueSummary>, ForgeError>;

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> Result<IssueSummary, ForgeError>;
}

/// What happened to one bypass event during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The actor is a bot or app.
    SkippedAutomated,
    /// The rule suite carries no actor to assign.
    SkippedNoActor,
    AlreadyExists { url: String },
    Created { url: String },
    /// Dry run; an issue would have been filed.
    WouldCreate,
}

/// A bypass event whose processing failed.
#[derive(Debug)]
pub struct EventFailure {
    pub rule_suite_id: u64,
    pub repository_name: String,
    pub error: ForgeError,
}

/// Everything a run did, in fetch order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub organization: String,
    pub events_found: usize,
    pub outcomes: Vec<(u64, Outcome)>,
    pub failures: Vec<EventFailure>,
}

impl RunSummary {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created { .. }))
    }

    pub fn already_existing(&self) -> usize {
        self.count(|o| matches!(o, Outcome::AlreadyExists { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedAutomated | Outcome::SkippedNoActor))
    }

    pub fn would_create(&self) -> usize {
        self.count(|o| matches!(o, Outcome::WouldCreate))
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_suite_decodes_api_payload() {
        let json = r#"{
            "id": 21,
            "actor_id": 12,
            "actor_name": "octocat",
            "before_sha": "893f768e172fb1bc9c5d6f3dd48557e45f14e01d",
            "after_sha": "dedd88641a362b6b4ea872da4847d6131a164d01",
            "ref": "refs/heads/i-see-everything",
            "repository_id": 404,
            "repository_name": "octo-repo",
            "pushed_at": "2023-07-06T08:43:03Z",
            "result": "bypass",
            "evaluation_result": "fail"
        }"#;

        let suite: RuleSuite = serde_json::from_str(json).unwrap();
        assert_eq!(suite.id, 21);
        assert_eq!(suite.repository_name, "octo-repo");
        assert_eq!(suite.actor_name.as_deref(), Some("octocat"));
        assert_eq!(suite.git_ref, "refs/heads/i-see-everything");
        assert_eq!(suite.result, "bypass");
        assert!(suite.pushed_at.is_some());
    }

    #[test]
    fn rule_suite_tolerates_null_actor() {
        let json = r#"{"id": 1, "actor_name": null, "ref": "refs/heads/main",
                       "repository_name": "r", "result": "bypass"}"#;
        let suite: RuleSuite = serde_json::from_str(json).unwrap();
        assert_eq!(suite.actor_name, None);
        assert_eq!(suite.pushed_at, None);
    }

    #[test]
    fn summary_counts_outcomes() {
        let summary = RunSummary {
            organization: "octo-org".into(),
            events_found: 4,
            outcomes: vec![
                (1, Outcome::Created { url: "u1".into() }),
                (2, Outcome::AlreadyExists { url: "u2".into() }),
                (3, Outcome::SkippedAutomated),
                (4, Outcome::SkippedNoActor),
            ],
            failures: vec![],
        };

        assert_eq!(summary.created(), 1);
        assert_eq!(summary.already_existing(), 1);
        assert_eq!(summary.skipped(), 2);
        assert_eq!(summary.would_create(), 0);
        assert!(!summary.has_failures());
    }
}
