use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "startAt", default)]
    pub start_at: u32,

    #[serde(default)]
    pub total: u32,

    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,

    pub fields: IssueFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueFields {
    pub project: ProjectRef,

    #[serde(rename = "issuetype")]
    pub issue_type: IssueType,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub parent: Option<ParentRef>,

    /// Sprint custom field. Shape depends on the JIRA flavour: an encoded
    /// `key=value,...` string, a list of those, or a list of sprint objects.
    #[serde(rename = "customfield_10020", default)]
    pub sprint: Option<Value>,

    #[serde(rename = "fixVersions", default)]
    pub fix_versions: Option<Vec<Named>>,

    #[serde(default)]
    pub components: Option<Vec<Named>>,

    #[serde(default)]
    pub labels: Option<Vec<String>>,

    #[serde(default)]
    pub priority: Option<Named>,

    #[serde(default)]
    pub assignee: Option<Assignee>,

    #[serde(rename = "timeoriginalestimate", default)]
    pub original_estimate: Option<i64>,

    #[serde(rename = "timeestimate", default)]
    pub remaining_estimate: Option<i64>,

    #[serde(rename = "timespent", default)]
    pub time_spent: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueType {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentRef {
    pub key: String,
}

/// Anything JIRA represents as an object with a `name`: versions,
/// components, priorities.
#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assignee {
    #[serde(rename = "displayName")]
    pub display_name: String,
}
