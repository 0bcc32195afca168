/// Header row of every report, in column order.
pub const COLUMNS: [&str; 15] = [
    "Project_Key",
    "Parent_Key",
    "Issue_Key",
    "Issue_Type",
    "Issue_Summary",
    "Components",
    "Priority",
    "Assignee",
    "Story_Point",
    "Original_Estimate",
    "Remaining_Estimate",
    "Time_Spent",
    "Issue_Sprint",
    "Issue_Labels",
    "Fix_Version",
];

/// One flattened issue, one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    pub project_key: String,
    pub parent_key: String,
    pub issue_key: String,
    pub issue_type: String,
    pub summary: Option<String>,
    pub components: Vec<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub story_point: String,
    pub original_estimate: Option<i64>,
    pub remaining_estimate: Option<i64>,
    pub time_spent: Option<i64>,
    pub sprint_name: String,
    pub labels: Vec<String>,
    pub fix_version: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl IssueRecord {
    /// Cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [Cell; COLUMNS.len()] {
        [
            Cell::Text(self.project_key.clone()),
            Cell::Text(self.parent_key.clone()),
            Cell::Text(self.issue_key.clone()),
            Cell::Text(self.issue_type.clone()),
            optional_text(&self.summary),
            list_cell(&self.components),
            optional_text(&self.priority),
            optional_text(&self.assignee),
            Cell::Text(self.story_point.clone()),
            seconds_cell(self.original_estimate),
            seconds_cell(self.remaining_estimate),
            seconds_cell(self.time_spent),
            Cell::Text(self.sprint_name.clone()),
            list_cell(&self.labels),
            list_cell(&self.fix_version),
        ]
    }
}

fn list_cell(values: &[String]) -> Cell {
    if values.is_empty() {
        Cell::Blank
    } else {
        Cell::Text(values.join(", "))
    }
}

fn optional_text(value: &Option<String>) -> Cell {
    match value {
        Some(text) => Cell::Text(text.clone()),
        None => Cell::Blank,
    }
}

fn seconds_cell(value: Option<i64>) -> Cell {
    value.map_or(Cell::Blank, |secs| Cell::Number(secs as f64))
}
