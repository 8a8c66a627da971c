//! The entry model predicates are evaluated against.
//!
//! Entries are owned by whatever walks the resource tree; predicates only
//! read them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every action an entry may support.
pub const ACTIONS: &[&str] = &["list", "read", "stream", "write", "exec", "delete", "signal"];

/// Returns `true` if `action` is a known action name.
pub fn is_action(action: &str) -> bool {
    ACTIONS.contains(&action)
}

/// A resource in the tree: a name, a path, supported actions and a
/// nested metadata document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub meta: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<EntrySchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Entry>,
}

/// Describes a kind of entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySchema {
    pub type_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Entry {
            name: name.into(),
            ..Entry::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_schema(mut self, schema: EntrySchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_child(mut self, child: Entry) -> Self {
        self.children.push(child);
        self
    }

    /// Returns `true` if the entry supports `action`.
    pub fn supports(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    /// Fills in every missing path from the names along the tree.
    ///
    /// A root without a path gets `/<name>`.
    pub fn assign_paths(&mut self, parent: &str) {
        if self.path.is_empty() {
            self.path = format!("{}/{}", parent.trim_end_matches('/'), self.name);
        }
        let path = self.path.clone();
        for child in &mut self.children {
            child.assign_paths(&path);
        }
    }
}

impl EntrySchema {
    pub fn new(type_id: impl Into<String>) -> Self {
        EntrySchema {
            type_id: type_id.into(),
            ..EntrySchema::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if entries of this kind support `action`.
    pub fn supports(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}
