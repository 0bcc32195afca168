use crate::utils::constants::{BASE_ISSUE_TYPES, SUBTASK_ISSUE_TYPE};

/// What a report covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Sprint(String),
    Release(String),
}

impl Scope {
    pub fn kind(&self) -> &'static str {
        match self {
            Scope::Sprint(_) => "sprint",
            Scope::Release(_) => "release",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Scope::Sprint(id) => id,
            Scope::Release(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueTypeFilter {
    pub include_subtasks: bool,
}

impl IssueTypeFilter {
    pub fn types(&self) -> Vec<&'static str> {
        let mut types = BASE_ISSUE_TYPES.to_vec();
        if self.include_subtasks {
            types.push(SUBTASK_ISSUE_TYPE);
        }
        types
    }

    fn clause(&self) -> String {
        format!("type in ({})", self.types().join(","))
    }
}

/// Builds the JQL for one report. Release reports never include sub-tasks.
pub fn build_scope_query(project_key: &str, scope: &Scope, include_subtasks: bool) -> String {
    match scope {
        Scope::Sprint(id) => {
            let filter = IssueTypeFilter { include_subtasks };
            format!(
                "project = {} AND sprint = {} AND {}",
                project_key,
                id,
                filter.clause(),
            )
        }
        Scope::Release(name) => {
            let filter = IssueTypeFilter { include_subtasks: false };
            format!(
                "project = {} AND fixVersion = '{}' AND {}",
                project_key,
                escape_quoted(name),
                filter.clause(),
            )
        }
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
