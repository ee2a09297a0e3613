//! Integration configuration: the admin form state, the payload sent on save,
//! and the masked copy returned by the configuration store.
//!
//! The form lives only in page-local state until an explicit save. Two of its
//! fields are write-only (the access token and the webhook secret): the
//! store only echoes back the mask [`MASKED_VALUE`], and receiving that mask
//! on save means "keep the stored value". They are held as [`SecretString`]
//! so they never appear in logs or `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::mappings::{Mapping, MappingCollection};

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;

/// Default branch naming template stored with a fresh configuration.
pub const DEFAULT_BRANCH_NAMING: &str = "feature/{issueKey}-{summary}";

/// Placeholder the configuration store returns in place of a stored secret.
pub const MASKED_VALUE: &str = "********";

/// Pull request lifecycle events that can drive an issue transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionEvent {
    /// A pull request was opened.
    PrOpened,
    /// A pull request was merged.
    PrMerged,
    /// A pull request was closed without merging.
    PrClosed,
    /// A closed pull request was reopened.
    PrReopened,
}

impl TransitionEvent {
    /// Every event, in display order.
    pub const ALL: [TransitionEvent; 4] = [
        TransitionEvent::PrOpened,
        TransitionEvent::PrMerged,
        TransitionEvent::PrClosed,
        TransitionEvent::PrReopened,
    ];

    /// Wire key of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrOpened => "pr_opened",
            Self::PrMerged => "pr_merged",
            Self::PrClosed => "pr_closed",
            Self::PrReopened => "pr_reopened",
        }
    }
}

impl std::str::FromStr for TransitionEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pr_opened" => Ok(Self::PrOpened),
            "pr_merged" => Ok(Self::PrMerged),
            "pr_closed" => Ok(Self::PrClosed),
            "pr_reopened" => Ok(Self::PrReopened),
            _ => Err(format!("unknown transition event: {}", s)),
        }
    }
}

/// Issue status transition to apply for each pull request lifecycle event.
///
/// Every key is always present on the wire; an empty identifier means "no
/// transition".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionMap {
    #[serde(default, deserialize_with = "string_or_null")]
    pr_opened: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pr_merged: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pr_closed: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pr_reopened: String,
}

impl TransitionMap {
    /// Transition identifier configured for `event`.
    pub fn get(&self, event: TransitionEvent) -> &str {
        match event {
            TransitionEvent::PrOpened => &self.pr_opened,
            TransitionEvent::PrMerged => &self.pr_merged,
            TransitionEvent::PrClosed => &self.pr_closed,
            TransitionEvent::PrReopened => &self.pr_reopened,
        }
    }

    /// Sets the transition identifier for `event`. The value is trimmed.
    pub fn set(&mut self, event: TransitionEvent, transition_id: &str) {
        let value = transition_id.trim().to_string();
        match event {
            TransitionEvent::PrOpened => self.pr_opened = value,
            TransitionEvent::PrMerged => self.pr_merged = value,
            TransitionEvent::PrClosed => self.pr_closed = value,
            TransitionEvent::PrReopened => self.pr_reopened = value,
        }
    }
}

/// A write-only form field such as the access token or webhook secret.
///
/// The field knows whether the store already holds a value, so the form can
/// show "is set" hints without ever seeing the value itself.
#[derive(Debug, Default)]
pub struct WriteOnlyField {
    entered: Option<SecretString>,
    stored: bool,
    revealed: bool,
}

impl WriteOnlyField {
    /// Creates a field for a value the store already holds (or not).
    pub fn with_stored(stored: bool) -> Self {
        Self {
            entered: None,
            stored,
            revealed: false,
        }
    }

    /// Replaces the typed value. Blank input clears it.
    pub fn set(&mut self, value: &str) {
        let trimmed = value.trim();
        self.entered = if trimmed.is_empty() {
            None
        } else {
            Some(SecretString::from(trimmed.to_string()))
        };
    }

    /// True when nothing has been typed.
    pub fn is_blank(&self) -> bool {
        self.entered.is_none()
    }

    /// True when the store already holds a value for this field.
    pub fn is_stored(&self) -> bool {
        self.stored
    }

    /// Shows the typed value in clear text (used for generated secrets).
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// True when the field is rendered in clear text.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// The typed value, if any.
    pub fn entered(&self) -> Option<&SecretString> {
        self.entered.as_ref()
    }

    /// Value to submit.
    ///
    /// The typed value when there is one. A blank field over a stored value
    /// submits [`MASKED_VALUE`], which the store reads as "keep the current
    /// value". `None` only when nothing is typed and nothing is stored.
    pub fn submission(&self) -> Option<SecretString> {
        match &self.entered {
            Some(value) => Some(SecretString::from(value.expose_secret().to_string())),
            None if self.stored => Some(SecretString::from(MASKED_VALUE.to_string())),
            None => None,
        }
    }

    /// Clears the typed value after a successful save. A non-blank value
    /// becomes the stored one.
    pub fn mark_saved(&mut self) {
        if self.entered.take().is_some() {
            self.stored = true;
        }
        self.revealed = false;
    }

    /// Hint to show in the empty input, e.g. "Token is set - enter new token
    /// to update".
    pub fn placeholder(&self, noun: &str) -> Option<String> {
        if !self.stored {
            return None;
        }
        let capitalised = capitalise(noun);
        Some(format!(
            "{} is set - enter new {} to update",
            capitalised, noun
        ))
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Configuration sent to `PUT /config`.
///
/// A write-only field left blank over a stored value is sent as
/// [`MASKED_VALUE`], which the store treats as "keep the existing value".
/// With nothing stored the field is omitted.
#[derive(Debug, Serialize)]
pub struct Configuration {
    /// Base URL of the enterprise source hosting instance.
    #[serde(rename = "githubEnterpriseUrl")]
    pub enterprise_url: String,

    /// REST API base URL of the instance.
    #[serde(rename = "githubApiUrl")]
    pub api_url: String,

    /// Access token. Omitted when blank and not stored.
    #[serde(
        rename = "githubToken",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_secret"
    )]
    pub token: Option<SecretString>,

    /// Accept certificates signed by a private authority.
    #[serde(rename = "trustCustomCertificates")]
    pub trust_custom_certificates: bool,

    /// URL webhooks deliver to.
    #[serde(rename = "webhookUrl")]
    pub webhook_url: String,

    /// Webhook signing secret. Omitted when blank and not stored.
    #[serde(
        rename = "webhookSecret",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_secret"
    )]
    pub webhook_secret: Option<SecretString>,

    /// Template for generated branch names.
    #[serde(rename = "branchNaming")]
    pub branch_naming_template: String,

    /// Complete mappings only.
    #[serde(rename = "repositories")]
    pub mappings: Vec<Mapping>,

    /// Lifecycle event to transition mapping.
    #[serde(rename = "transitionMappings")]
    pub transition_mappings: TransitionMap,
}

/// Body of `POST /config/test-connection`.
///
/// A stored token the admin has not retyped is sent as [`MASKED_VALUE`];
/// with nothing typed or stored the token is `null`.
#[derive(Debug, Serialize)]
pub struct ConnectionTest {
    /// URL to test.
    #[serde(rename = "githubEnterpriseUrl")]
    pub enterprise_url: String,

    /// Token to authenticate with, or `null`.
    #[serde(rename = "githubToken", serialize_with = "serialize_secret")]
    pub token: Option<SecretString>,

    /// Accept certificates signed by a private authority.
    #[serde(rename = "trustCustomCertificates")]
    pub trust_custom_certificates: bool,
}

/// Configuration as returned by `GET /config` and `PUT /config`.
///
/// Stored secrets come back masked as [`MASKED_VALUE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteConfiguration {
    #[serde(rename = "githubEnterpriseUrl", default, deserialize_with = "string_or_null")]
    pub enterprise_url: String,

    #[serde(rename = "githubApiUrl", default, deserialize_with = "string_or_null")]
    pub api_url: String,

    #[serde(rename = "githubToken", default)]
    pub token: Option<String>,

    #[serde(rename = "trustCustomCertificates", default)]
    pub trust_custom_certificates: bool,

    #[serde(rename = "webhookUrl", default, deserialize_with = "string_or_null")]
    pub webhook_url: String,

    #[serde(rename = "webhookSecret", default)]
    pub webhook_secret: Option<String>,

    #[serde(rename = "branchNaming", default, deserialize_with = "string_or_null")]
    pub branch_naming_template: String,

    #[serde(rename = "repositories", default, deserialize_with = "vec_or_null")]
    pub mappings: Vec<Mapping>,

    #[serde(rename = "transitionMappings", default, deserialize_with = "default_or_null")]
    pub transition_mappings: TransitionMap,

    /// Registered webhook ids keyed by `owner/repo`.
    #[serde(rename = "webhookIds", default, deserialize_with = "default_or_null")]
    pub webhook_ids: std::collections::BTreeMap<String, String>,
}

impl RemoteConfiguration {
    /// True when the store holds an access token.
    pub fn has_token(&self) -> bool {
        is_present(self.token.as_deref())
    }

    /// True when the store holds a webhook secret.
    pub fn has_webhook_secret(&self) -> bool {
        is_present(self.webhook_secret.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Page-local state of the admin configuration form.
#[derive(Debug)]
pub struct ConfigForm {
    /// Enterprise base URL as typed.
    pub enterprise_url: String,

    /// API URL as typed. Derived from the enterprise URL when left blank.
    pub api_url: String,

    /// Access token input.
    pub token: WriteOnlyField,

    /// Accept certificates signed by a private authority.
    pub trust_custom_certificates: bool,

    /// Webhook delivery URL as typed.
    pub webhook_url: String,

    /// Webhook secret input.
    pub webhook_secret: WriteOnlyField,

    /// Branch naming template as typed.
    pub branch_naming_template: String,

    /// Mapping rows, complete or not.
    pub mappings: MappingCollection,

    /// Transition identifiers per lifecycle event.
    pub transitions: TransitionMap,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self {
            enterprise_url: String::new(),
            api_url: String::new(),
            token: WriteOnlyField::default(),
            trust_custom_certificates: false,
            webhook_url: String::new(),
            webhook_secret: WriteOnlyField::default(),
            branch_naming_template: DEFAULT_BRANCH_NAMING.to_string(),
            mappings: MappingCollection::new(),
            transitions: TransitionMap::default(),
        }
    }
}

impl ConfigForm {
    /// Seeds the form from the stored configuration.
    ///
    /// Masked secrets become "is set" markers; their values are never copied.
    pub fn from_remote(remote: &RemoteConfiguration) -> Self {
        let branch_naming_template = if remote.branch_naming_template.trim().is_empty() {
            DEFAULT_BRANCH_NAMING.to_string()
        } else {
            remote.branch_naming_template.clone()
        };

        Self {
            enterprise_url: remote.enterprise_url.clone(),
            api_url: remote.api_url.clone(),
            token: WriteOnlyField::with_stored(remote.has_token()),
            trust_custom_certificates: remote.trust_custom_certificates,
            webhook_url: remote.webhook_url.clone(),
            webhook_secret: WriteOnlyField::with_stored(remote.has_webhook_secret()),
            branch_naming_template,
            mappings: MappingCollection::from_mappings(remote.mappings.clone()),
            transitions: remote.transition_mappings.clone(),
        }
    }

    /// Builds the save payload from the current form values.
    ///
    /// Text fields are trimmed and incomplete mapping rows are dropped. This
    /// does not validate; see [`crate::validate_config`].
    pub fn to_configuration(&self) -> Configuration {
        let enterprise_url = self.enterprise_url.trim().to_string();
        let api_url = match self.api_url.trim() {
            "" => derive_api_url(&enterprise_url),
            typed => typed.to_string(),
        };

        Configuration {
            enterprise_url,
            api_url,
            token: self.token.submission(),
            trust_custom_certificates: self.trust_custom_certificates,
            webhook_url: self.webhook_url.trim().to_string(),
            webhook_secret: self.webhook_secret.submission(),
            branch_naming_template: self.branch_naming_template.trim().to_string(),
            mappings: self.mappings.collect(),
            transition_mappings: self.transitions.clone(),
        }
    }

    /// Builds the connection test body from the current form values.
    pub fn connection_test(&self) -> ConnectionTest {
        ConnectionTest {
            enterprise_url: self.enterprise_url.trim().to_string(),
            token: self.token.submission(),
            trust_custom_certificates: self.trust_custom_certificates,
        }
    }

    /// Clears the typed secrets after the store accepted them.
    pub fn mark_saved(&mut self) {
        self.token.mark_saved();
        self.webhook_secret.mark_saved();
    }
}

/// Derives the REST API URL of an enterprise instance (`<base>/api/v3`).
///
/// Returns an empty string for an empty base.
pub fn derive_api_url(enterprise_url: &str) -> String {
    if enterprise_url.is_empty() {
        return String::new();
    }

    format!("{}/api/v3", enterprise_url.trim_end_matches('/'))
}

fn serialize_secret<S>(value: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Deserializes a string that the backend may send as `null`.
pub(crate) fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn default_or_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
