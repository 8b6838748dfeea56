use generational_arena::{Arena, Index};
use serde_json::Value;
use tracing::instrument;

/// Tree node in the arena-based forest structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Record payload for this node
    pub data: Value,
    /// Index of the parent node in the arena; `None` for roots and for
    /// nodes not yet attached anywhere
    pub parent: Option<Index>,
    /// Indices of child nodes, in attachment order
    pub children: Vec<Index>,
}

/// Arena-based forest for efficient hierarchy management.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Roots form an ordered sequence and membership is explicit: inserting a
/// node without a parent does not make it a root, since children may be
/// created before their parent is known and attached later.
#[derive(Debug)]
pub struct Forest {
    /// Arena storage for all forest nodes
    arena: Arena<TreeNode>,
    /// Indices of the root nodes, in emission order
    roots: Vec<Index>,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a node, linking it under `parent` when given.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: Value, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            self.attach(parent_idx, node_idx);
        }

        node_idx
    }

    /// Link an existing node under a parent, appending it to the parent's
    /// children and setting its back-reference. Stale indices are ignored.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, parent_idx: Index, child_idx: Index) {
        if !self.arena.contains(child_idx) {
            return;
        }
        if let Some(parent) = self.arena.get_mut(parent_idx) {
            parent.children.push(child_idx);
        } else {
            return;
        }
        if let Some(child) = self.arena.get_mut(child_idx) {
            child.parent = Some(parent_idx);
        }
    }

    /// Append a node to the root sequence.
    pub fn push_root(&mut self, node_idx: Index) {
        self.roots.push(node_idx);
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> ForestIterator {
        ForestIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Maximum node depth across all roots; an empty forest has depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects the payloads of all leaf nodes (nodes with no children),
    /// in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_values(&self) -> Vec<&Value> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.data)
            .collect()
    }

    /// Every leaf-to-root path in the forest, walked over the parent
    /// back-references.
    #[instrument(level = "debug", skip(self))]
    pub fn branches(&self) -> Vec<Vec<&Value>> {
        let mut branches = Vec::new();
        for (idx, node) in self.iter() {
            if !node.children.is_empty() {
                continue;
            }
            let mut path = Vec::new();
            let mut current = Some(idx);
            while let Some(current_idx) = current {
                match self.get_node(current_idx) {
                    Some(step) => {
                        path.push(&step.data);
                        current = step.parent;
                    }
                    None => current = None,
                }
            }
            branches.push(path);
        }
        branches
    }

    /// Remove a node and all of its descendants, detaching the node from
    /// its parent and the root sequence. Returns the number of nodes
    /// removed.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, root_idx: Index) -> usize {
        if let Some(parent_idx) = self.arena.get(root_idx).and_then(|node| node.parent) {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&child| child != root_idx);
            }
        }
        self.roots.retain(|&root| root != root_idx);

        let mut removed = 0;
        let mut stack = vec![root_idx];
        while let Some(current_idx) = stack.pop() {
            if let Some(node) = self.arena.remove(current_idx) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }
}

pub struct ForestIterator<'a> {
    forest: &'a Forest,
    stack: Vec<Index>,
}

impl<'a> ForestIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Roots pushed in reverse so the first root is visited first
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest
            .roots
            .iter()
            .rev()
            .map(|&root| (root, false))
            .collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
