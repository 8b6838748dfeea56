//! JSON rendition of a forest with the configured field names.

use generational_arena::Index;
use serde_json::{Map, Value};

use crate::arena::Forest;
use crate::options::TreeOptions;

impl Forest {
    /// Render the forest as nested JSON values, one per root.
    ///
    /// With a data field configured, each entry wraps its record under that
    /// field; otherwise the record's own fields merge with the structural
    /// fields. The children field appears only when children exist and
    /// holds recursively identical entries. The parent back-reference
    /// field, when configured and linkage occurred, holds the parent
    /// record's identifier value; the index-based [`TreeNode::parent`] link
    /// remains the authoritative back-reference.
    ///
    /// [`TreeNode::parent`]: crate::arena::TreeNode
    pub fn to_values(&self, options: &TreeOptions) -> Vec<Value> {
        self.roots()
            .iter()
            .map(|&root_idx| self.entry_value(root_idx, options))
            .collect()
    }

    fn entry_value(&self, idx: Index, options: &TreeOptions) -> Value {
        let Some(node) = self.get_node(idx) else {
            return Value::Null;
        };

        let mut entry = match options.data_field() {
            Some(field) => {
                let mut wrapper = Map::new();
                wrapper.insert(field.to_string(), node.data.clone());
                wrapper
            }
            None => match &node.data {
                Value::Object(fields) => fields.clone(),
                // A non-object payload has no fields to merge into; it can
                // only occur in hand-built forests and passes through as-is.
                other => return other.clone(),
            },
        };

        if !node.children.is_empty() {
            let children: Vec<Value> = node
                .children
                .iter()
                .map(|&child_idx| self.entry_value(child_idx, options))
                .collect();
            entry.insert(options.children_field().to_string(), Value::Array(children));
        }

        if let (Some(field), Some(parent_idx)) = (options.parent_field(), node.parent) {
            if let Some(parent_id) = self
                .get_node(parent_idx)
                .and_then(|parent| parent.data.get(options.id_field()))
            {
                entry.insert(field.to_string(), parent_id.clone());
            }
        }

        Value::Object(entry)
    }
}
