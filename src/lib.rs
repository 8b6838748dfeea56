//! Single-pass conversion of flat parent-linked records into nested trees.
//!
//! Records are JSON values carrying an identifier and a parent identifier
//! under configurable field names. One forward pass over the input produces
//! a [`Forest`]: children that arrive before their parent wait in a pending
//! registry and reattach the moment the parent shows up, so no sorting or
//! separate indexing pass is needed. Sibling order follows each record's
//! arrival order relative to its siblings.
//!
//! ```
//! use arbor::{build_trees, TreeOptions};
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({ "id": 1 }),
//!     json!({ "id": 2, "parentId": 1 }),
//! ];
//!
//! let roots = build_trees(records, TreeOptions::default());
//! assert_eq!(roots.len(), 1);
//! assert_eq!(roots[0]["children"][0]["data"]["id"], 2);
//! ```

use serde_json::Value;

pub mod arena;
pub mod builder;
pub mod key;
pub mod options;
pub mod util;

mod display;
mod render;

pub use arena::{Forest, TreeNode};
pub use builder::TreeBuilder;
pub use key::NodeKey;
pub use options::TreeOptions;

/// Build and render in one call: nested JSON values, one per root.
///
/// Empty input yields an empty output. For structured access to the trees
/// before rendering, use [`TreeBuilder::build`] directly.
pub fn build_trees(records: Vec<Value>, options: TreeOptions) -> Vec<Value> {
    let mut builder = TreeBuilder::new(options);
    let forest = builder.build(records);
    forest.to_values(builder.options())
}
