use serde_json::Value;
use tracing::{debug, warn};

use crate::models::issues::{Issue, Named};
use crate::models::record::IssueRecord;
use crate::utils::constants::{
    SPRINT_NAME_TOKEN_INDEX, STORY_POINT_PLACEHOLDER, SUBTASK_TYPE_NAME,
};

/// Flattens one raw issue into a report row. Never fails.
pub fn normalize(issue: &Issue) -> IssueRecord {
    let fields = &issue.fields;

    let record = IssueRecord {
        project_key: fields.project.key.clone(),
        parent_key: resolve_parent_key(issue),
        issue_key: issue.key.clone(),
        issue_type: fields.issue_type.name.clone(),
        summary: fields.summary.clone(),
        components: names(fields.components.as_deref()),
        priority: fields.priority.as_ref().map(|p| p.name.clone()),
        assignee: fields.assignee.as_ref().map(|a| a.display_name.clone()),
        story_point: STORY_POINT_PLACEHOLDER.to_string(),
        original_estimate: fields.original_estimate,
        remaining_estimate: fields.remaining_estimate,
        time_spent: fields.time_spent,
        sprint_name: sprint_name(fields.sprint.as_ref()),
        labels: fields.labels.clone().unwrap_or_default(),
        fix_version: names(fields.fix_versions.as_deref()),
    };

    debug!(issue = %record.issue_key, parent = %record.parent_key, "normalized issue");
    record
}

fn resolve_parent_key(issue: &Issue) -> String {
    if issue.fields.issue_type.name != SUBTASK_TYPE_NAME {
        return issue.key.clone();
    }

    match &issue.fields.parent {
        Some(parent) => parent.key.clone(),
        None => {
            warn!(issue = %issue.key, "sub-task has no parent, using its own key");
            issue.key.clone()
        }
    }
}

fn names(values: Option<&[Named]>) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .map(|v| v.name.clone())
        .collect()
}

/// Resolves the sprint name from whatever shape the sprint field has.
///
/// Structured sprint objects are looked up by their `name` key (last sprint
/// wins). Encoded strings go through [`sprint_name_from_encoded`].
pub fn sprint_name(field: Option<&Value>) -> String {
    match field {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(encoded)) => sprint_name_from_encoded(encoded),
        Some(Value::Object(sprint)) => object_name(sprint),
        Some(Value::Array(items)) => {
            if let Some(Value::Object(last)) = items.iter().rev().find(|v| v.is_object()) {
                return object_name(last);
            }
            let encoded: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            sprint_name_from_encoded(&encoded.join(","))
        }
        Some(other) => sprint_name_from_encoded(&other.to_string()),
    }
}

fn object_name(sprint: &serde_json::Map<String, Value>) -> String {
    sprint
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Positional extraction from `key=value,key=value,...`: the value of the
/// token at index 4. A single token, a short list or a token without `=`
/// yields an empty name.
pub fn sprint_name_from_encoded(encoded: &str) -> String {
    let tokens: Vec<&str> = encoded.split(',').collect();
    if tokens.len() <= 1 {
        return String::new();
    }

    tokens
        .get(SPRINT_NAME_TOKEN_INDEX)
        .and_then(|token| token.split('=').nth(1))
        .unwrap_or_default()
        .to_string()
}
