use std::fmt;

use serde::{Deserialize, Serialize};

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    #[default]
    Employee,
    Upload,
    Split,
    Category,
    Preview,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 5] = [
        WorkflowStep::Employee,
        WorkflowStep::Upload,
        WorkflowStep::Split,
        WorkflowStep::Category,
        WorkflowStep::Preview,
    ];

    pub fn index(&self) -> usize {
        match self {
            WorkflowStep::Employee => 0,
            WorkflowStep::Upload => 1,
            WorkflowStep::Split => 2,
            WorkflowStep::Category => 3,
            WorkflowStep::Preview => 4,
        }
    }

    pub fn next(&self) -> Option<WorkflowStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<WorkflowStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn code(&self) -> &'static str {
        match self {
            WorkflowStep::Employee => "employee",
            WorkflowStep::Upload => "upload",
            WorkflowStep::Split => "split",
            WorkflowStep::Category => "category",
            WorkflowStep::Preview => "preview",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStep::Employee => "Wybór pracownika",
            WorkflowStep::Upload => "Przesyłanie plików",
            WorkflowStep::Split => "Podział na dokumenty",
            WorkflowStep::Category => "Kategorie i metadane",
            WorkflowStep::Preview => "Podgląd i zatwierdzenie",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

/// Status of every step for a progress indicator. Depends on position only.
pub fn step_progress(current: WorkflowStep) -> Vec<(WorkflowStep, StepStatus)> {
    WorkflowStep::ALL
        .iter()
        .map(|step| {
            let status = match step.index().cmp(&current.index()) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Active,
                std::cmp::Ordering::Greater => StepStatus::Pending,
            };
            (*step, status)
        })
        .collect()
}
