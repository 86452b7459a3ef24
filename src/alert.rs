use crate::types::{NewIssue, RuleSuite};

/// Title of the tracking issue for a rule suite.
///
/// The rule suite id is embedded verbatim; the title is the only key used to
/// recognise an alert that was already filed.
pub fn alert_title(rule_suite_id: u64) -> String {
    format!("🚨 Rule Suite Bypass Alert {rule_suite_id} 🚨")
}

pub fn alert_body(actor: &str, git_ref: &str) -> String {
    format!(
        "# Rule Suite Bypass Alert

Hello @{actor}!

We noticed that you bypassed a ruleset on ref `{git_ref}`.

We understand there may be valid reasons for this action. However, to ensure transparency and maintain good practices, we kindly request you to justify the bypass.

Please add a comment to this issue explaining the reason for the bypass.

Thank you for your cooperation!
"
    )
}

/// Builds the issue filed for `suite`, assigned to `actor`.
pub fn build_alert(suite: &RuleSuite, actor: &str) -> NewIssue {
    NewIssue {
        title: alert_title(suite.id),
        body: alert_body(actor, &suite.git_ref),
        assignees: vec![actor.to_string()],
    }
}
