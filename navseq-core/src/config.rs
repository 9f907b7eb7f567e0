use serde::{Deserialize, Serialize};

/// What the controller does with a validation request for a step that is
/// already validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentrancyPolicy {
    /// Report failure immediately and leave the pending validation alone.
    #[default]
    Reject,
    /// Start another validation; the last one to finish wins.
    Allow,
}

/// Text the presentation layer shows around navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationLabels {
    pub continue_label: String,
    pub error_title: String,
    pub dismiss_label: String,
}

impl Default for NavigationLabels {
    fn default() -> Self {
        Self {
            continue_label: "Continue".to_string(),
            error_title: "Unable to Continue".to_string(),
            dismiss_label: "Dismiss".to_string(),
        }
    }
}

/// Behaviour switches for a sequence controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub reentrancy: ReentrancyPolicy,
    /// Clear a step's stored error when a later validation of it passes.
    pub clear_error_on_success: bool,
    pub labels: NavigationLabels,
}

impl SequenceConfig {
    pub fn with_reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.reentrancy = policy;
        self
    }

    pub fn clear_error_on_success(mut self, clear: bool) -> Self {
        self.clear_error_on_success = clear;
        self
    }

    pub fn with_labels(mut self, labels: NavigationLabels) -> Self {
        self.labels = labels;
        self
    }
}
