//! Organization profile: the user-supplied description of the target company.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or checking a profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Company size bracket.
///
/// Accepts both the short names and the labels used by the input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "Small", alias = "Small (1-500)")]
    Small,
    #[serde(rename = "Mid-Market", alias = "Mid-Market (501-5000)")]
    MidMarket,
    #[serde(rename = "Enterprise", alias = "Enterprise (5001+)")]
    Enterprise,
}

impl CompanySize {
    /// Descriptive label including the employee range.
    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Small => "Small (1-500 employees)",
            CompanySize::MidMarket => "Mid-Market (501-5,000 employees)",
            CompanySize::Enterprise => "Enterprise (5,001+ employees)",
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanySize::Small => write!(f, "Small"),
            CompanySize::MidMarket => write!(f, "Mid-Market"),
            CompanySize::Enterprise => write!(f, "Enterprise"),
        }
    }
}

/// Description of the organization to analyze.
///
/// Only `name` and `industry` are required for analysis. Missing fields load
/// as empty so that [`OrganizationProfile::check_ready`] can name them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub industry: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CompanySize>,

    /// Strategic initiatives underway
    #[serde(default)]
    pub current_initiatives: String,

    #[serde(default)]
    pub tech_stack: String,

    /// Known security concerns
    #[serde(default)]
    pub concerns: String,
}

impl OrganizationProfile {
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: CompanySize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_initiatives(mut self, initiatives: impl Into<String>) -> Self {
        self.current_initiatives = initiatives.into();
        self
    }

    pub fn with_tech_stack(mut self, tech_stack: impl Into<String>) -> Self {
        self.tech_stack = tech_stack.into();
        self
    }

    pub fn with_concerns(mut self, concerns: impl Into<String>) -> Self {
        self.concerns = concerns.into();
        self
    }

    /// Parse a profile from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a profile from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a profile file; `.json` files parse as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Check that the profile can be submitted for analysis.
    pub fn check_ready(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::MissingField("name".to_string()));
        }

        if self.industry.trim().is_empty() {
            return Err(ProfileError::MissingField("industry".to_string()));
        }

        Ok(())
    }
}
