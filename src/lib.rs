//! Bypass alerter: follow up on ruleset bypasses in a GitHub organization.
//!
//! Acting as a GitHub App installation, lists the rule suites that were
//! bypassed in the last hour and, for each bypass made by a human, files an
//! issue in the affected repository asking them to justify it. Bots and apps
//! are ignored, and an event that already has an open alert issue is not
//! reported twice.

pub mod actor;
pub mod alert;
pub mod alerter;
pub mod cli;
pub mod error;
pub mod github;
pub mod types;

pub use actor::{ActorKind, is_automated_actor};
pub use alert::{alert_body, alert_title, build_alert};
pub use alerter::{
    RunOptions, fetch_bypass_events, find_open_issue_by_title, process_rule_suite, report_bypass,
    resolve_organization, run,
};
pub use cli::{Settings, parse_args};
pub use error::ForgeError;
pub use github::{AppCredentials, GitHub};
pub use types::{EventFailure, Forge, IssueSummary, NewIssue, Outcome, RuleSuite, RunSummary};
