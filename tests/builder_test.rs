//! Tests for TreeBuilder

use generational_arena::Index;
use rstest::{fixture, rstest};
use serde_json::{json, Value};

use arbor::util::testing::init_test_logging;
use arbor::{Forest, TreeBuilder, TreeOptions};

/// Five records forming: item1 -> [item2 -> [item4, item5], item3]
#[fixture]
fn items() -> Vec<Value> {
    vec![
        json!({ "id": 1 }),
        json!({ "id": 2, "parentId": 1 }),
        json!({ "id": 3, "parentId": 1 }),
        json!({ "id": 4, "parentId": 2 }),
        json!({ "id": 5, "parentId": 2 }),
    ]
}

fn node_id(forest: &Forest, idx: Index) -> i64 {
    forest.get_node(idx).unwrap().data["id"].as_i64().unwrap()
}

fn child_ids(forest: &Forest, idx: Index) -> Vec<i64> {
    forest
        .get_node(idx)
        .unwrap()
        .children
        .iter()
        .map(|&child| node_id(forest, child))
        .collect()
}

fn root_ids(forest: &Forest) -> Vec<i64> {
    forest
        .roots()
        .iter()
        .map(|&root| node_id(forest, root))
        .collect()
}

// ============================================================
// Basic Input Tests
// ============================================================

#[test]
fn given_empty_input_when_building_then_forest_is_empty() {
    init_test_logging();
    let mut builder = TreeBuilder::new(TreeOptions::default());

    let forest = builder.build(vec![]);

    assert!(forest.is_empty());
    assert!(forest.roots().is_empty());
}

#[test]
fn given_null_or_missing_id_when_building_then_record_is_dropped() {
    init_test_logging();
    let mut builder = TreeBuilder::new(TreeOptions::default());

    let forest = builder.build(vec![
        json!({ "id": null }),
        json!({ "name": "no id at all" }),
        json!({ "id": 1 }),
    ]);

    assert_eq!(forest.node_count(), 1);
    assert_eq!(root_ids(&forest), vec![1]);
}

// ============================================================
// Arrival Order Tests
// ============================================================

#[rstest]
fn given_forward_order_when_building_then_children_follow_arrival_order(items: Vec<Value>) {
    let mut builder = TreeBuilder::new(TreeOptions::default());

    let forest = builder.build(items);

    assert_eq!(root_ids(&forest), vec![1]);
    let root = forest.roots()[0];
    assert_eq!(child_ids(&forest, root), vec![2, 3]);
    let item2 = forest.get_node(root).unwrap().children[0];
    assert_eq!(child_ids(&forest, item2), vec![4, 5]);
}

#[rstest]
fn given_reversed_order_when_building_then_sibling_order_follows_arrival(items: Vec<Value>) {
    let mut builder = TreeBuilder::new(TreeOptions::default());
    let reversed: Vec<Value> = items.into_iter().rev().collect();

    let forest = builder.build(reversed);

    // Same shape, but each sibling list reflects arrival order: item3 was
    // seen before item2, item5 before item4.
    assert_eq!(root_ids(&forest), vec![1]);
    let root = forest.roots()[0];
    assert_eq!(child_ids(&forest, root), vec![3, 2]);
    let item2 = forest.get_node(root).unwrap().children[1];
    assert_eq!(child_ids(&forest, item2), vec![5, 4]);
}

#[test]
fn given_children_before_parent_when_building_then_pending_children_reattach() {
    let mut builder = TreeBuilder::new(TreeOptions::default());

    let forest = builder.build(vec![
        json!({ "id": 3, "parentId": 1 }),
        json!({ "id": 2, "parentId": 1 }),
        json!({ "id": 1 }),
    ]);

    assert_eq!(root_ids(&forest), vec![1]);
    assert_eq!(child_ids(&forest, forest.roots()[0]), vec![3, 2]);
}

// ============================================================
// Orphan Policy Tests
// ============================================================

#[test]
fn given_unresolved_parent_when_promoting_orphans_then_orphan_becomes_root() {
    let mut builder = TreeBuilder::new(TreeOptions::default().with_orphans_as_root(true));

    let forest = builder.build(vec![
        json!({ "id": 1 }),
        json!({ "id": 2, "parentId": 3 }),
    ]);

    assert_eq!(root_ids(&forest), vec![1, 2]);
}

#[test]
fn given_unresolved_parent_when_discarding_orphans_then_orphan_is_removed() {
    let mut builder = TreeBuilder::new(TreeOptions::default());

    let forest = builder.build(vec![
        json!({ "id": 1 }),
        json!({ "id": 2, "parentId": 3 }),
    ]);

    assert_eq!(root_ids(&forest), vec![1]);
    // The discarded orphan is gone from the arena, not merely unreachable
    assert_eq!(forest.node_count(), 1);
}

#[test]
fn given_orphan_subtree_when_discarding_then_descendants_are_removed_too() {
    let mut builder = TreeBuilder::new(TreeOptions::default());

    // item2's parent never appears; item4 attached under item2 meanwhile
    let forest = builder.build(vec![
        json!({ "id": 1 }),
        json!({ "id": 2, "parentId": 3 }),
        json!({ "id": 4, "parentId": 2 }),
    ]);

    assert_eq!(root_ids(&forest), vec![1]);
    assert_eq!(forest.node_count(), 1);
}

#[test]
fn given_several_orphan_groups_when_promoting_then_groups_follow_first_appearance() {
    let mut builder = TreeBuilder::new(TreeOptions::default().with_orphans_as_root(true));

    let forest = builder.build(vec![
        json!({ "id": 1 }),
        json!({ "id": 10, "parentId": "x" }),
        json!({ "id": 11, "parentId": "y" }),
        json!({ "id": 12, "parentId": "x" }),
    ]);

    // Promoted orphans come after the true roots, grouped by the awaited
    // identifier in order of first appearance, not by input position.
    assert_eq!(root_ids(&forest), vec![1, 10, 12, 11]);
}

// ============================================================
// Predicate Tests
// ============================================================

#[test]
fn given_has_child_false_when_building_then_no_children_accumulate() {
    let options = TreeOptions::default()
        .with_has_child(|_| false)
        .with_orphans_as_root(true);
    let mut builder = TreeBuilder::new(options);

    let forest = builder.build(vec![
        json!({ "id": 1 }),
        json!({ "id": 2, "parentId": 1 }),
        json!({ "id": 3, "parentId": 1 }),
    ]);

    // Nobody registered as a parent, so every non-root became its own root
    assert_eq!(root_ids(&forest), vec![1, 2, 3]);
    for (_, node) in forest.iter() {
        assert!(node.children.is_empty());
    }
}

#[test]
fn given_is_root_always_false_when_discarding_orphans_then_forest_is_empty() {
    let options = TreeOptions::default().with_is_root(|_| false);
    let mut builder = TreeBuilder::new(options);

    let forest = builder.build(vec![
        json!({ "id": 1 }),
        json!({ "id": 2, "parentId": 1 }),
    ]);

    // item1 waits for a parent that never comes and takes item2 down with it
    assert!(forest.roots().is_empty());
    assert_eq!(forest.node_count(), 0);
}

#[test]
fn given_is_root_always_true_when_building_then_every_record_is_a_root() {
    let options = TreeOptions::default().with_is_root(|_| true);
    let mut builder = TreeBuilder::new(options);

    let forest = builder.build(vec![
        json!({ "id": 1 }),
        json!({ "id": 2, "parentId": 1 }),
    ]);

    assert_eq!(root_ids(&forest), vec![1, 2]);
    assert!(child_ids(&forest, forest.roots()[0]).is_empty());
}

#[test]
fn given_root_with_resolvable_parent_when_building_then_root_is_not_attached() {
    let options = TreeOptions::default().with_is_root(|record| record["top"] == json!(true));
    let mut builder = TreeBuilder::new(options);

    let forest = builder.build(vec![
        json!({ "id": 1, "top": true }),
        json!({ "id": 2, "parentId": 1, "top": true }),
    ]);

    // item2's parent identifier resolves, but the root flag wins
    assert_eq!(root_ids(&forest), vec![1, 2]);
    assert!(child_ids(&forest, forest.roots()[0]).is_empty());
}

#[test]
fn given_child_of_root_when_building_then_root_gains_children() {
    let options = TreeOptions::default().with_is_root(|record| record["top"] == json!(true));
    let mut builder = TreeBuilder::new(options);

    let forest = builder.build(vec![
        json!({ "id": 1, "top": true, "parentId": 9 }),
        json!({ "id": 2, "parentId": 1 }),
    ]);

    assert_eq!(root_ids(&forest), vec![1]);
    assert_eq!(child_ids(&forest, forest.roots()[0]), vec![2]);
}

// ============================================================
// Duplicate Identifier Tests
// ============================================================

#[test]
fn given_duplicate_ids_when_building_then_last_registration_wins() {
    let mut builder = TreeBuilder::new(TreeOptions::default());

    let forest = builder.build(vec![
        json!({ "id": 1, "tag": "first" }),
        json!({ "id": 1, "tag": "second" }),
        json!({ "id": 2, "parentId": 1 }),
    ]);

    assert_eq!(root_ids(&forest), vec![1, 1]);
    let first = forest.roots()[0];
    let second = forest.roots()[1];
    assert!(child_ids(&forest, first).is_empty());
    assert_eq!(child_ids(&forest, second), vec![2]);
    assert_eq!(forest.get_node(second).unwrap().data["tag"], "second");
}

// ============================================================
// Back-Reference Tests
// ============================================================

#[rstest]
fn given_attached_child_when_walking_back_then_parent_index_round_trips(items: Vec<Value>) {
    let mut builder = TreeBuilder::new(TreeOptions::default());

    let forest = builder.build(items);

    for (idx, node) in forest.iter() {
        if let Some(parent_idx) = node.parent {
            let parent = forest.get_node(parent_idx).unwrap();
            assert!(parent.children.contains(&idx));
        } else {
            assert!(forest.roots().contains(&idx));
        }
    }
}

// ============================================================
// Identifier Key Tests
// ============================================================

#[test]
fn given_string_and_number_identifiers_when_building_then_keys_collide() {
    let mut builder = TreeBuilder::new(TreeOptions::default());

    // Parent declares id "1" as a string; child points at number 1
    let forest = builder.build(vec![
        json!({ "id": "1" }),
        json!({ "id": 2, "parentId": 1 }),
    ]);

    assert_eq!(forest.roots().len(), 1);
    assert_eq!(child_ids(&forest, forest.roots()[0]), vec![2]);
}
