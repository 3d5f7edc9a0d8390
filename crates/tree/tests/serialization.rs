//! External serialized form of documents and compiled trees.
//!
//! The node editor owns persistence; these tests pin the field names it
//! exchanges with this crate.

use ai_tree::{BranchKind, ExecutableTree, NAV_ROOT_ID, Operation, TreeDocument, Vec2};

fn sample_document() -> TreeDocument {
    let mut doc = TreeDocument::new(BranchKind::Navigation);
    doc.add_node("check", "If HP > 50%", Vec2::new(4.0, 30.0));
    doc.add_node("fire", "Fire", Vec2::new(8.0, 20.0));
    doc.add_node("run", "Flee", Vec2::new(8.0, 10.0));
    doc.add_connection(NAV_ROOT_ID, "check");
    doc.add_connection("check", "fire");
    doc.add_connection("check", "run");
    doc
}

#[test]
fn document_round_trips_through_json() {
    let doc = sample_document();
    let json = serde_json::to_string(&doc).unwrap();
    let back: TreeDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(doc, back);
}

#[test]
fn document_uses_editor_field_names() {
    let doc = sample_document();
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["branchKind"], "Navigation");
    let node = &value["nodes"][0];
    assert_eq!(node["id"], "check");
    assert_eq!(node["type"], "Condition");
    assert_eq!(node["label"], "If HP > 50%");
    assert_eq!(node["x"], 4.0);
    assert_eq!(node["y"], 30.0);

    let conn = &value["connections"][0];
    assert_eq!(conn["fromId"], NAV_ROOT_ID);
    assert_eq!(conn["toId"], "check");
    assert!(conn["fromPort"].is_string());
    assert!(conn["toPort"].is_string());
}

#[test]
fn executable_tree_round_trips_with_rebuilt_indexes() {
    let tree = ExecutableTree::compile(&sample_document()).unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    let back: ExecutableTree = serde_json::from_str(&json).unwrap();

    assert_eq!(tree, back);
    // Derived lookups survive the round trip.
    assert_eq!(back.entry_index(), tree.entry_index());
    assert_eq!(back.parent_index_of("fire"), tree.parent_index_of("fire"));
    assert_eq!(back.root_children(), tree.root_children());
}

#[test]
fn executable_nodes_use_external_field_names() {
    let tree = ExecutableTree::compile(&sample_document()).unwrap();
    let value = serde_json::to_value(&tree).unwrap();

    assert_eq!(value["startNodeId"], "check");
    let node = &value["executableNodes"][0];
    assert_eq!(node["id"], "check");
    assert_eq!(node["operation"], "IfHP");
    assert_eq!(node["label"], "If HP > 50%");
    assert_eq!(node["kind"], "Condition");
    assert_eq!(node["operand"], 50.0);
    assert_eq!(node["connectedIds"][0], "fire");
    assert_eq!(node["y"], 30.0);
}

#[test]
fn operations_serialize_as_canonical_strings() {
    let ops = vec![
        Operation::IfRange,
        Operation::TrackTarget,
        Operation::SubTree("Flank".to_string()),
        Operation::Custom("HoldTheLine".to_string()),
    ];
    let json = serde_json::to_string(&ops).unwrap();
    assert_eq!(json, r#"["IfRange","TrackTarget","SubAI_Flank","HoldTheLine"]"#);
    let back: Vec<Operation> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ops);
}
