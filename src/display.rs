//! ASCII rendering of a forest via termtree.

use generational_arena::Index;
use serde_json::Value;
use termtree::Tree;

use crate::arena::Forest;

impl Forest {
    /// Render each tree as an ASCII diagram, labelling nodes by
    /// `label_field`. Nodes without that field are labelled `?`.
    pub fn to_tree_string(&self, label_field: &str) -> Vec<Tree<String>> {
        self.roots()
            .iter()
            .map(|&root_idx| self.subtree_string(root_idx, label_field))
            .collect()
    }

    fn subtree_string(&self, idx: Index, label_field: &str) -> Tree<String> {
        let label = self
            .get_node(idx)
            .and_then(|node| node.data.get(label_field))
            .map(label_text)
            .unwrap_or_else(|| "?".to_string());

        let leaves: Vec<_> = self
            .get_node(idx)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&child_idx| self.subtree_string(child_idx, label_field))
                    .collect()
            })
            .unwrap_or_default();

        Tree::new(label).with_leaves(leaves)
    }
}

/// Strings display without quotes, everything else as JSON.
fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
