use serde::Serialize;

/// One command-level step of an account flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: String,
    pub succeeded: bool,
    pub detail: Option<String>,
}

/// Everything an account flow did, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountReport {
    pub username: String,
    pub operation: String,
    pub steps: Vec<StepRecord>,
    pub notes: Vec<String>,
}

impl AccountReport {
    pub fn new(operation: &str, username: &str) -> Self {
        Self {
            username: username.to_string(),
            operation: operation.to_string(),
            steps: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn record(&mut self, step: impl Into<String>, succeeded: bool, detail: Option<String>) {
        self.steps.push(StepRecord {
            step: step.into(),
            succeeded,
            detail,
        });
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.succeeded)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| !s.succeeded)
    }

    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.step == name)
    }
}
