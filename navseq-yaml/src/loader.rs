use crate::config::SequenceDocument;
use anyhow::{Context, Result};
use navseq_context::StepIdentity;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Loads sequence documents from files or strings.
pub struct SequenceLoader;

impl SequenceLoader {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<SequenceDocument> {
        let content = fs::read_to_string(&path).with_context(|| {
            format!("Failed to read YAML file: {:?}", path.as_ref())
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<SequenceDocument> {
        serde_yaml::from_str(content).with_context(|| "Failed to parse YAML content")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<SequenceDocument> {
        let content = fs::read_to_string(&path).with_context(|| {
            format!("Failed to read JSON file: {:?}", path.as_ref())
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<SequenceDocument> {
        serde_json::from_str(content).with_context(|| "Failed to parse JSON content")
    }

    /// Picks the format from the file extension; anything but `.json` is YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SequenceDocument> {
        let is_json = path
            .as_ref()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    pub fn save_to_yaml<P: AsRef<Path>>(document: &SequenceDocument, path: P) -> Result<()> {
        let yaml_content = serde_yaml::to_string(document)
            .with_context(|| "Failed to serialize document to YAML")?;

        fs::write(&path, yaml_content).with_context(|| {
            format!("Failed to write YAML file: {:?}", path.as_ref())
        })?;

        Ok(())
    }

    pub fn save_to_json<P: AsRef<Path>>(document: &SequenceDocument, path: P) -> Result<()> {
        let json_content = serde_json::to_string_pretty(document)
            .with_context(|| "Failed to serialize document to JSON")?;

        fs::write(&path, json_content).with_context(|| {
            format!("Failed to write JSON file: {:?}", path.as_ref())
        })?;

        Ok(())
    }

    /// Checks the document on its own: labels present, step ids unique,
    /// every step titled.
    pub fn validate(document: &SequenceDocument) -> Result<()> {
        let labels = &document.sequence.labels;
        for (name, value) in [
            ("continue_label", &labels.continue_label),
            ("error_title", &labels.error_title),
            ("dismiss_label", &labels.dismiss_label),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("Label '{name}' cannot be empty");
            }
        }

        let mut ids = HashSet::new();
        for step in &document.steps {
            if !ids.insert(step.id) {
                anyhow::bail!("Duplicate step id: {}", step.id);
            }
            if step.content.title.trim().is_empty() {
                anyhow::bail!("Step {} has an empty title", step.id);
            }
        }

        Ok(())
    }

    /// [`Self::validate`], plus every configured id must name a step of `I`.
    pub fn validate_for<I: StepIdentity>(document: &SequenceDocument) -> Result<()> {
        Self::validate(document)?;

        let known: HashSet<usize> = I::all().iter().map(StepIdentity::id).collect();
        if let Some(step) = document.steps.iter().find(|step| !known.contains(&step.id)) {
            anyhow::bail!(
                "Step id {} does not exist in a sequence of {} steps",
                step.id,
                I::all().len()
            );
        }

        let missing: Vec<&'static str> = I::all()
            .iter()
            .filter(|step| document.step(step.id()).is_none())
            .map(|step| step.name())
            .collect();
        if !missing.is_empty() {
            tracing::debug!(missing = ?missing, "steps without configured content render empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navseq_core::ReentrancyPolicy;

    const DOCUMENT: &str = r#"
sequence:
  reentrancy: allow
  labels:
    continue_label: "Next"
steps:
  - id: 0
    title: "Location Services"
    body: "Let apps use your approximate location."
    symbol: "location"
  - id: 1
    title: "Siri"
"#;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Two {
        A,
        B,
    }

    impl StepIdentity for Two {
        fn all() -> &'static [Self] {
            &[Two::A, Two::B]
        }

        fn name(&self) -> &'static str {
            match self {
                Two::A => "a",
                Two::B => "b",
            }
        }
    }

    #[test]
    fn test_load_from_yaml_str() {
        let document = SequenceLoader::from_yaml_str(DOCUMENT).unwrap();
        assert_eq!(document.sequence.reentrancy, ReentrancyPolicy::Allow);
        assert_eq!(document.sequence.labels.continue_label, "Next");
        assert_eq!(document.sequence.labels.error_title, "Unable to Continue");
        assert!(!document.sequence.clear_error_on_success);
        assert_eq!(document.steps.len(), 2);
        assert_eq!(document.steps[0].content.symbol.as_deref(), Some("location"));
        assert_eq!(document.steps[1].content.body, "");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let document = SequenceLoader::from_yaml_str("{}").unwrap();
        assert_eq!(document, SequenceDocument::default());
        assert!(SequenceLoader::validate(&document).is_ok());
    }

    #[test]
    fn test_validate_duplicate_step_ids() {
        let yaml_content = r#"
steps:
  - id: 0
    title: "One"
  - id: 0
    title: "Two"
"#;
        let document = SequenceLoader::from_yaml_str(yaml_content).unwrap();
        assert!(SequenceLoader::validate(&document).is_err());
    }

    #[test]
    fn test_validate_empty_label() {
        let yaml_content = r#"
sequence:
  labels:
    dismiss_label: "  "
"#;
        let document = SequenceLoader::from_yaml_str(yaml_content).unwrap();
        let err = SequenceLoader::validate(&document).unwrap_err();
        assert!(err.to_string().contains("dismiss_label"));
    }

    #[test]
    fn test_validate_for_rejects_unknown_step() {
        let document = SequenceLoader::from_yaml_str(DOCUMENT).unwrap();
        assert!(SequenceLoader::validate_for::<Two>(&document).is_ok());

        let extra = SequenceLoader::from_yaml_str("steps:\n  - id: 2\n    title: \"Extra\"\n").unwrap();
        assert!(SequenceLoader::validate_for::<Two>(&extra).is_err());
    }

    #[test]
    fn test_invalid_yaml_reports_context() {
        let err = SequenceLoader::from_yaml_str("steps: [").unwrap_err();
        assert!(err.to_string().contains("Failed to parse YAML content"));
    }
}
