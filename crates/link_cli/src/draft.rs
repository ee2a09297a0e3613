//! Admin form drafts.
//!
//! A draft is the terminal rendition of the admin configuration form. Every
//! field is optional; fields left out keep the value loaded from the stored
//! configuration.
//!
//! ```toml
//! enterprise_url = "https://github.example.com"
//! token = "ghp_..."
//! webhook_url = "https://jira.example.com/rest/github-integration/1.0/webhook"
//!
//! [[mappings]]
//! project_key = "PROJ"
//! repo_owner = "acme"
//! repo_name = "widgets"
//!
//! [transitions]
//! pr_merged = "31"
//! ```

use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use link_core::{mappings::DEFAULT_BRANCH, ConfigForm, Mapping, MappingCollection, TransitionEvent};
use serde::Deserialize;
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminDraft {
    pub enterprise_url: Option<String>,
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub trust_custom_certificates: Option<bool>,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub branch_naming: Option<String>,

    /// Replaces every mapping row when present.
    pub mappings: Option<Vec<DraftMapping>>,

    /// Keyed by transition event (`pr_opened`, `pr_merged`, ...).
    #[serde(default)]
    pub transitions: BTreeMap<String, String>,
}

/// One `[[mappings]]` row. Blank fields make the row partial.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftMapping {
    #[serde(default)]
    pub project_key: String,
    #[serde(default)]
    pub repo_owner: String,
    #[serde(default)]
    pub repo_name: String,
    pub default_branch: Option<String>,
}

impl DraftMapping {
    fn to_mapping(&self) -> Mapping {
        Mapping {
            project_key: self.project_key.clone(),
            repo_owner: self.repo_owner.clone(),
            repo_name: self.repo_name.clone(),
            default_branch: self
                .default_branch
                .clone()
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        }
    }
}

impl AdminDraft {
    /// Reads a draft from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading admin draft from {:?}", path);

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Draft(format!("Failed to read draft {:?}: {}", path, e)))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        let draft: Self = toml::from_str(content)
            .map_err(|e| Error::Draft(format!("Failed to parse draft: {}", e)))?;

        // Reject typos before anything is applied.
        for event in draft.transitions.keys() {
            TransitionEvent::from_str(event).map_err(Error::Draft)?;
        }

        Ok(draft)
    }

    /// Writes the draft's fields into the form.
    ///
    /// Mapping rows go through [`MappingCollection`], so rows missing a
    /// project, owner or repository are dropped on collect.
    pub fn apply_to(&self, form: &mut ConfigForm) -> Result<(), Error> {
        if let Some(url) = &self.enterprise_url {
            form.enterprise_url = url.clone();
        }
        if let Some(url) = &self.api_url {
            form.api_url = url.clone();
        }
        if let Some(token) = &self.token {
            form.token.set(token);
        }
        if let Some(trust) = self.trust_custom_certificates {
            form.trust_custom_certificates = trust;
        }
        if let Some(url) = &self.webhook_url {
            form.webhook_url = url.clone();
        }
        if let Some(secret) = &self.webhook_secret {
            form.webhook_secret.set(secret);
        }
        if let Some(template) = &self.branch_naming {
            form.branch_naming_template = template.clone();
        }
        if let Some(mappings) = &self.mappings {
            form.mappings =
                MappingCollection::from_mappings(mappings.iter().map(DraftMapping::to_mapping));
        }
        for (event, transition_id) in &self.transitions {
            let event = TransitionEvent::from_str(event).map_err(Error::Draft)?;
            form.transitions.set(event, transition_id);
        }

        debug!(
            mapping_rows = form.mappings.len(),
            "Applied admin draft to configuration form"
        );
        Ok(())
    }
}
