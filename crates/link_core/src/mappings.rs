//! Project to repository mappings and the editable row collection behind the
//! admin form.
//!
//! The admin form shows a dynamically sized list of mapping rows. Each row
//! carries a generated [`RowId`] so that add and remove operations never
//! depend on where the row happens to be displayed. Only complete rows are
//! submitted; see [`MappingCollection::collect`].

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::configuration::string_or_null;

#[cfg(test)]
#[path = "mappings_tests.rs"]
mod tests;

/// Default branch pre-filled into every newly added mapping row.
pub const DEFAULT_BRANCH: &str = "main";

/// Association between a tracked project and a source hosting repository.
///
/// Field names on the wire follow the plugin backend
/// (`jiraProject`, `githubOwner`, `githubRepo`, `defaultBranch`).
///
/// # Examples
///
/// ```rust
/// use link_core::Mapping;
///
/// let mapping: Mapping = serde_json::from_str(r#"{
///     "jiraProject": "PROJ",
///     "githubOwner": "acme",
///     "githubRepo": "widgets",
///     "defaultBranch": "main"
/// }"#).unwrap();
///
/// assert_eq!(mapping.full_repo_name(), "acme/widgets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Key of the tracked project, e.g. `PROJ`.
    #[serde(rename = "jiraProject", default, deserialize_with = "string_or_null")]
    pub project_key: String,

    /// Repository owner (user or organization).
    #[serde(rename = "githubOwner", default, deserialize_with = "string_or_null")]
    pub repo_owner: String,

    /// Repository name.
    #[serde(rename = "githubRepo", default, deserialize_with = "string_or_null")]
    pub repo_name: String,

    /// Branch new work is based on.
    #[serde(rename = "defaultBranch", default, deserialize_with = "string_or_null")]
    pub default_branch: String,
}

impl Mapping {
    /// Returns the `owner/repo` form of the repository.
    pub fn full_repo_name(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Stable identifier of a mapping row, independent of display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(Uuid);

impl RowId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One editable row of the mapping list.
///
/// Values are stored exactly as typed; trimming happens when the row is
/// collected for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    id: RowId,

    /// Project key as typed.
    pub project_key: String,

    /// Repository owner as typed.
    pub repo_owner: String,

    /// Repository name as typed.
    pub repo_name: String,

    /// Default branch as typed.
    pub default_branch: String,
}

impl MappingRow {
    fn blank() -> Self {
        Self {
            id: RowId::generate(),
            project_key: String::new(),
            repo_owner: String::new(),
            repo_name: String::new(),
            default_branch: DEFAULT_BRANCH.to_string(),
        }
    }

    fn from_mapping(mapping: Mapping) -> Self {
        Self {
            id: RowId::generate(),
            project_key: mapping.project_key,
            repo_owner: mapping.repo_owner,
            repo_name: mapping.repo_name,
            default_branch: mapping.default_branch,
        }
    }

    /// The row's stable identifier.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns true when project key, owner and repository are all filled in.
    ///
    /// The default branch is not required.
    pub fn is_complete(&self) -> bool {
        !self.project_key.trim().is_empty()
            && !self.repo_owner.trim().is_empty()
            && !self.repo_name.trim().is_empty()
    }

    /// Converts the row into a submittable mapping, or `None` if it is
    /// incomplete.
    pub fn to_mapping(&self) -> Option<Mapping> {
        if !self.is_complete() {
            return None;
        }

        Some(Mapping {
            project_key: self.project_key.trim().to_string(),
            repo_owner: self.repo_owner.trim().to_string(),
            repo_name: self.repo_name.trim().to_string(),
            default_branch: self.default_branch.trim().to_string(),
        })
    }
}

/// Ordered, dynamically sized list of mapping rows.
///
/// The collection never becomes empty: removing the last row inserts a fresh
/// blank row in its place. That blank row is incomplete, so [`collect`]
/// still returns no mappings and saving is rejected by validation.
///
/// [`collect`]: MappingCollection::collect
///
/// # Examples
///
/// ```rust
/// use link_core::MappingCollection;
///
/// let mut rows = MappingCollection::new();
/// let first = rows.rows()[0].id();
///
/// let second = rows.add_row();
/// if let Some(row) = rows.row_mut(second) {
///     row.project_key = "PROJ".to_string();
///     row.repo_owner = "acme".to_string();
///     row.repo_name = "widgets".to_string();
/// }
///
/// // The untouched first row is silently dropped.
/// assert_eq!(rows.collect().len(), 1);
///
/// rows.remove_row(first);
/// assert_eq!(rows.display_index(second), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingCollection {
    rows: Vec<MappingRow>,
}

impl MappingCollection {
    /// Creates a collection holding a single blank row.
    pub fn new() -> Self {
        Self {
            rows: vec![MappingRow::blank()],
        }
    }

    /// Creates a collection seeded from stored mappings.
    ///
    /// An empty input yields a single blank row.
    pub fn from_mappings(mappings: impl IntoIterator<Item = Mapping>) -> Self {
        let rows: Vec<MappingRow> = mappings.into_iter().map(MappingRow::from_mapping).collect();
        if rows.is_empty() {
            return Self::new();
        }

        Self { rows }
    }

    /// Appends a blank row with the default branch pre-filled.
    ///
    /// Returns the identifier of the new row.
    pub fn add_row(&mut self) -> RowId {
        let row = MappingRow::blank();
        let id = row.id;
        self.rows.push(row);
        debug!(row_id = %id, row_count = self.rows.len(), "Added mapping row");
        id
    }

    /// Removes exactly the referenced row.
    ///
    /// Remaining rows keep their relative order. If the collection becomes
    /// empty a blank row is inserted. Returns false when no row has that id.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        if self.rows.len() == before {
            return false;
        }

        if self.rows.is_empty() {
            self.rows.push(MappingRow::blank());
        }

        debug!(row_id = %id, row_count = self.rows.len(), "Removed mapping row");
        true
    }

    /// Looks up a row by id.
    pub fn row(&self, id: RowId) -> Option<&MappingRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Looks up a row by id for editing.
    pub fn row_mut(&mut self, id: RowId) -> Option<&mut MappingRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// All rows in display order.
    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    /// Number of rows, complete or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; the collection keeps at least one row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One-based display position of a row. Recomputed on every call.
    pub fn display_index(&self, id: RowId) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.id == id)
            .map(|index| index + 1)
    }

    /// Returns the complete rows as mappings, in display order.
    ///
    /// Partially filled rows are dropped without error.
    pub fn collect(&self) -> Vec<Mapping> {
        self.rows.iter().filter_map(MappingRow::to_mapping).collect()
    }
}

impl Default for MappingCollection {
    fn default() -> Self {
        Self::new()
    }
}
