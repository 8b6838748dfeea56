//! Build configuration with trim-and-fallback normalization.
//!
//! Field names that are blank after trimming fall back to their defaults;
//! the optional fields (`parent_field`, `data_field`) are disabled by a
//! blank name instead. Malformed configuration therefore degrades to
//! defaults, it never fails.

use std::fmt;

use serde_json::Value;

/// Caller-supplied predicate classifying records during the pass.
pub type Predicate = Box<dyn Fn(&Value) -> bool>;

pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_PARENT_ID_FIELD: &str = "parentId";
pub const DEFAULT_CHILDREN_FIELD: &str = "children";
pub const DEFAULT_DATA_FIELD: &str = "data";

/// Configuration for [`crate::TreeBuilder`].
///
/// Constructed with [`TreeOptions::default`] and refined through the
/// consuming `with_*` setters:
///
/// ```
/// use arbor::TreeOptions;
///
/// let options = TreeOptions::default()
///     .with_id_field("key")
///     .with_children_field("items")
///     .with_orphans_as_root(true);
/// assert_eq!(options.id_field(), "key");
/// ```
pub struct TreeOptions {
    id_field: String,
    parent_id_field: String,
    children_field: String,
    parent_field: Option<String>,
    data_field: Option<String>,
    orphans_as_root: bool,
    is_root: Option<Predicate>,
    has_child: Option<Predicate>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
            parent_id_field: DEFAULT_PARENT_ID_FIELD.to_string(),
            children_field: DEFAULT_CHILDREN_FIELD.to_string(),
            parent_field: None,
            data_field: Some(DEFAULT_DATA_FIELD.to_string()),
            orphans_as_root: false,
            is_root: None,
            has_child: None,
        }
    }
}

impl TreeOptions {
    /// Field holding a record's identifier. Blank falls back to `"id"`.
    pub fn with_id_field(mut self, name: &str) -> Self {
        self.id_field = fallback(name, DEFAULT_ID_FIELD);
        self
    }

    /// Field holding a record's parent identifier. Blank falls back to
    /// `"parentId"`.
    pub fn with_parent_id_field(mut self, name: &str) -> Self {
        self.parent_id_field = fallback(name, DEFAULT_PARENT_ID_FIELD);
        self
    }

    /// Field the rendition nests children under. Blank falls back to
    /// `"children"`.
    pub fn with_children_field(mut self, name: &str) -> Self {
        self.children_field = fallback(name, DEFAULT_CHILDREN_FIELD);
        self
    }

    /// Field the rendition stores the parent back-reference under.
    /// Blank disables the back-reference (the default).
    pub fn with_parent_field(mut self, name: &str) -> Self {
        self.parent_field = optional(name);
        self
    }

    /// Field each entry wraps its record under. Blank disables wrapping so
    /// the record's own fields merge with the structural fields.
    pub fn with_data_field(mut self, name: &str) -> Self {
        self.data_field = optional(name);
        self
    }

    /// Whether records whose parent never appears become roots (`true`) or
    /// are dropped (`false`, the default).
    pub fn with_orphans_as_root(mut self, orphans_as_root: bool) -> Self {
        self.orphans_as_root = orphans_as_root;
        self
    }

    /// Predicate marking records that are emitted as top-level roots
    /// regardless of their parent identifier. Default: the parent
    /// identifier field is null or missing.
    pub fn with_is_root<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.is_root = Some(Box::new(predicate));
        self
    }

    /// Predicate marking records that may have children. Records failing it
    /// are never registered as potential parents, so children naming them
    /// fall to the orphan policy. Default: always true.
    pub fn with_has_child<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.has_child = Some(Box::new(predicate));
        self
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn parent_id_field(&self) -> &str {
        &self.parent_id_field
    }

    pub fn children_field(&self) -> &str {
        &self.children_field
    }

    pub fn parent_field(&self) -> Option<&str> {
        self.parent_field.as_deref()
    }

    pub fn data_field(&self) -> Option<&str> {
        self.data_field.as_deref()
    }

    pub fn orphans_as_root(&self) -> bool {
        self.orphans_as_root
    }

    /// Evaluate the root predicate for a record.
    pub fn is_root(&self, record: &Value) -> bool {
        match &self.is_root {
            Some(predicate) => predicate(record),
            None => record
                .get(&self.parent_id_field)
                .map_or(true, Value::is_null),
        }
    }

    /// Evaluate the has-child predicate for a record.
    pub fn has_child(&self, record: &Value) -> bool {
        match &self.has_child {
            Some(predicate) => predicate(record),
            None => true,
        }
    }
}

impl fmt::Debug for TreeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeOptions")
            .field("id_field", &self.id_field)
            .field("parent_id_field", &self.parent_id_field)
            .field("children_field", &self.children_field)
            .field("parent_field", &self.parent_field)
            .field("data_field", &self.data_field)
            .field("orphans_as_root", &self.orphans_as_root)
            .field("is_root", &self.is_root.as_ref().map(|_| "<predicate>"))
            .field("has_child", &self.has_child.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// Trimmed name, or the default when blank.
fn fallback(name: &str, default: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trimmed name, or `None` when blank.
fn optional(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
