
/// Hard cap on issues fetched per report. Anything beyond is dropped.
pub const MAX_RESULTS: u32 = 2000;

pub const SUBTASK_TYPE_NAME: &str = "Sub-task";
pub const STORY_POINT_PLACEHOLDER: &str = "0";

pub const SPRINT_NAME_TOKEN_INDEX: usize = 4;

pub const BASE_ISSUE_TYPES: [&str; 3] = ["story", "bug", "task"];
pub const SUBTASK_ISSUE_TYPE: &str = "sub-task";

pub const DEFAULT_CONFIG_PATH: &str = "jira.toml";
pub const DEFAULT_SPRINT_ID: &str = "1";
pub const DEFAULT_RELEASE_NAME: &str = "Release One";

pub const SPRINT_FILE: &str = "Sprint_Issues.xlsx";
pub const SPRINT_SHEET: &str = "sprint_Issues";
pub const RELEASE_FILE: &str = "Release_Issues.xlsx";
pub const RELEASE_SHEET: &str = "release_Issues";

pub const SEARCH_FIELDS: &str = "project,parent,issuetype,summary,components,priority,assignee,\
timeoriginalestimate,timeestimate,timespent,labels,fixVersions,customfield_10020";
