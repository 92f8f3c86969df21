//! Which step of the upload -> generate -> processing flow a page belongs to

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    Upload,
    Generate,
    Processing,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 3] = [
        WorkflowStep::Upload,
        WorkflowStep::Generate,
        WorkflowStep::Processing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkflowStep::Upload => "upload",
            WorkflowStep::Generate => "generate",
            WorkflowStep::Processing => "processing",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a request path to its workflow step, if any
pub fn step_for_path(path: &str) -> Option<WorkflowStep> {
    if path == "/" {
        Some(WorkflowStep::Upload)
    } else if path.contains("/generate") {
        Some(WorkflowStep::Generate)
    } else if path.contains("/processing") {
        Some(WorkflowStep::Processing)
    } else {
        None
    }
}

/// Every step paired with whether it is the active one; at most one is.
pub fn render_steps(active: Option<WorkflowStep>) -> Vec<(WorkflowStep, bool)> {
    WorkflowStep::ALL
        .iter()
        .map(|step| (*step, Some(*step) == active))
        .collect()
}

/// One-line breadcrumb, active step in brackets: `upload > [generate] > processing`
pub fn breadcrumb(active: Option<WorkflowStep>) -> String {
    render_steps(active)
        .into_iter()
        .map(|(step, is_active)| {
            if is_active {
                format!("[{}]", step)
            } else {
                step.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}
