use std::collections::HashMap;

use generational_arena::Index;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::arena::Forest;
use crate::key::NodeKey;
use crate::options::TreeOptions;

/// Converts flat parent-linked records into nested trees in one forward
/// pass.
///
/// Two transient registries substitute for sorting or a separate indexing
/// pass: `parents` maps every identifier seen so far (for records that may
/// have children) to its node, and `pending` holds children that arrived
/// before their parent, grouped by the awaited identifier in order of first
/// appearance. The `None` bucket in `pending` collects records whose parent
/// identifier is null or missing but which the root predicate rejected.
pub struct TreeBuilder {
    options: TreeOptions,
    parents: HashMap<NodeKey, Index>,
    pending: IndexMap<Option<NodeKey>, Vec<Index>>,
}

impl TreeBuilder {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            options,
            parents: HashMap::new(),
            pending: IndexMap::new(),
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Build a forest from records in input order.
    ///
    /// Records without an identifier are dropped. Sibling order follows each
    /// record's arrival order relative to its siblings. Records whose parent
    /// never appears follow the orphan policy: appended to the roots after
    /// the pass, grouped by the awaited identifier (first appearance first),
    /// or removed entirely.
    ///
    /// Malformed relationships never fail; the only way out of the forest is
    /// a missing identifier or a discarded orphan.
    #[instrument(level = "debug", skip(self, records), fields(record_count = records.len()))]
    pub fn build(&mut self, records: Vec<Value>) -> Forest {
        // Reset state for a fresh pass
        self.parents.clear();
        self.pending.clear();

        let mut forest = Forest::new();

        for record in records {
            let Some(key) = NodeKey::from_value(record.get(self.options.id_field())) else {
                continue;
            };
            let parent_key = NodeKey::from_value(record.get(self.options.parent_id_field()));
            let may_have_children = self.options.has_child(&record);
            let is_root = self.options.is_root(&record);

            let node_idx = forest.insert_node(record, None);

            // Register as a potential parent and adopt any children that
            // arrived earlier under this identifier. Re-registration of a
            // duplicate identifier overwrites: last registration wins.
            if may_have_children {
                if let Some(waiting) = self.pending.shift_remove(&Some(key.clone())) {
                    debug!(id = %key, count = waiting.len(), "adopting pending children");
                    for child_idx in waiting {
                        forest.attach(node_idx, child_idx);
                    }
                }
                self.parents.insert(key, node_idx);
            }

            // A root is emitted as-is and skips parent linkage entirely,
            // even when its parent identifier would resolve.
            if is_root {
                forest.push_root(node_idx);
                continue;
            }

            match parent_key
                .as_ref()
                .and_then(|awaited| self.parents.get(awaited))
                .copied()
            {
                Some(parent_idx) => forest.attach(parent_idx, node_idx),
                None => self.pending.entry(parent_key).or_default().push(node_idx),
            }
        }

        self.resolve_orphans(&mut forest);
        forest
    }

    /// Apply the orphan policy to pending groups left after the pass.
    fn resolve_orphans(&mut self, forest: &mut Forest) {
        for (awaited, group) in self.pending.drain(..) {
            if self.options.orphans_as_root() {
                debug!(?awaited, count = group.len(), "promoting orphans to roots");
                for node_idx in group {
                    forest.push_root(node_idx);
                }
            } else {
                debug!(?awaited, count = group.len(), "discarding orphans");
                for node_idx in group {
                    forest.remove_subtree(node_idx);
                }
            }
        }
        self.parents.clear();
    }
}
