//! Tests for TermTreeBuilder

use uuid::Uuid;

use sptoolbelt::domain::{
    DomainError, DuplicatePathPolicy, NodePayload, Term, TermTreeBuilder, TreeNodeConvert,
};
use sptoolbelt::util::testing;

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn term(n: u128, path: &str) -> Term {
    let name = path.rsplit(';').next().unwrap_or(path);
    Term::new(id(n), name, path)
}

fn produce() -> Vec<Term> {
    vec![
        term(1, "Fruit"),
        term(2, "Fruit;Apple"),
        term(3, "Fruit;Banana"),
        term(4, "Vegetable"),
        term(5, "Vegetable;Carrot"),
    ]
}

#[test]
fn given_shared_prefixes_when_building_then_collapses_into_one_node() {
    // Arrange: only leaf paths, no separate terms for the parents
    testing::init_test_setup();
    let terms = vec![
        term(1, "Fruit;Apple"),
        term(2, "Fruit;Banana"),
        term(3, "Vegetable;Carrot"),
    ];

    // Act
    let tree = TermTreeBuilder::new().build(terms).unwrap();

    // Assert
    assert_eq!(tree.child_names(tree.root()), vec!["Fruit", "Vegetable"]);
    let fruit = tree.find_by_path(&["Fruit"]).unwrap();
    assert_eq!(tree.child_names(fruit), vec!["Apple", "Banana"]);
    let vegetable = tree.find_by_path(&["Vegetable"]).unwrap();
    assert_eq!(tree.child_names(vegetable), vec!["Carrot"]);
    assert_eq!(tree.depth(), 2);
}

#[test]
fn given_intermediate_segment_without_term_then_node_has_path_payload() {
    let tree = TermTreeBuilder::new()
        .build(vec![term(1, "Fruit;Apple")])
        .unwrap();

    let fruit = tree.get_node(tree.find_by_path(&["Fruit"]).unwrap()).unwrap();
    assert_eq!(fruit.payload, NodePayload::Path);
    assert_eq!(fruit.display_title(), "Fruit");

    let apple = tree
        .get_node(tree.find_by_path(&["Fruit", "Apple"]).unwrap())
        .unwrap();
    let info = apple.payload.term_info().unwrap();
    assert_eq!(info.title, "Apple");
    assert_eq!(info.guid, id(1).to_string());
}

#[test]
fn given_child_before_parent_when_building_then_parent_term_attaches_to_existing_node() {
    // Arrange: enumeration order is not guaranteed parent-first
    let parent = term(10, "Fruit").with_description("All fruit");
    let terms = vec![term(11, "Fruit;Apple"), parent];

    // Act
    let tree = TermTreeBuilder::new().build(terms).unwrap();

    // Assert: no duplicate sibling, payload lands on the intermediate node
    assert_eq!(tree.child_names(tree.root()), vec!["Fruit"]);
    let fruit = tree.get_node(tree.find_by_path(&["Fruit"]).unwrap()).unwrap();
    let info = fruit.payload.term_info().unwrap();
    assert_eq!(info.guid, id(10).to_string());
    assert_eq!(info.description, "All fruit");
    assert_eq!(tree.child_names(tree.find_by_path(&["Fruit"]).unwrap()), vec!["Apple"]);
}

#[test]
fn given_identical_paths_when_building_with_default_policy_then_first_writer_wins() {
    // Arrange
    let first = term(1, "Fruit;Apple").with_description("first");
    let second = term(2, "Fruit;Apple").with_description("second");

    // Act
    let tree = TermTreeBuilder::new().build(vec![first, second]).unwrap();

    // Assert
    let fruit = tree.find_by_path(&["Fruit"]).unwrap();
    assert_eq!(tree.child_names(fruit), vec!["Apple"]);
    let apple = tree.get_node(tree.find_by_path(&["Fruit", "Apple"]).unwrap()).unwrap();
    let info = apple.payload.term_info().unwrap();
    assert_eq!(info.guid, id(1).to_string());
    assert_eq!(info.description, "first");
    // Both terms are still part of the source collection
    assert_eq!(tree.source_terms().len(), 2);
}

#[test]
fn given_identical_paths_when_building_with_last_wins_then_second_replaces_first() {
    let first = term(1, "Fruit;Apple").with_description("first");
    let second = term(2, "Fruit;Apple").with_description("second");

    let tree = TermTreeBuilder::new()
        .with_duplicate_policy(DuplicatePathPolicy::LastWins)
        .build(vec![first, second])
        .unwrap();

    let apple = tree.get_node(tree.find_by_path(&["Fruit", "Apple"]).unwrap()).unwrap();
    assert_eq!(apple.payload.term_info().unwrap().description, "second");
}

#[test]
fn given_identical_paths_when_building_with_reject_then_errors() {
    let result = TermTreeBuilder::new()
        .with_duplicate_policy(DuplicatePathPolicy::Reject)
        .build(vec![term(1, "Fruit;Apple"), term(2, "Fruit;Apple")]);

    assert_eq!(
        result.unwrap_err(),
        DomainError::DuplicateTermPath {
            path: "Fruit;Apple".into()
        }
    );
}

#[test]
fn given_reject_policy_when_parent_arrives_after_child_then_still_attaches() {
    // A Path node is not a duplicate
    let tree = TermTreeBuilder::new()
        .with_duplicate_policy(DuplicatePathPolicy::Reject)
        .build(vec![term(2, "Fruit;Apple"), term(1, "Fruit")])
        .unwrap();

    let fruit = tree.get_node(tree.find_by_path(&["Fruit"]).unwrap()).unwrap();
    assert!(fruit.payload.term_info().is_some());
}

#[test]
fn given_segment_names_differing_in_case_then_nodes_are_distinct() {
    let tree = TermTreeBuilder::new()
        .build(vec![term(1, "fruit;apple"), term(2, "Fruit;Apple")])
        .unwrap();

    assert_eq!(tree.child_names(tree.root()), vec!["fruit", "Fruit"]);
}

#[test]
fn given_selected_id_when_building_then_only_that_node_is_selected() {
    // Act
    let tree = TermTreeBuilder::new()
        .with_selected(Some(id(3)))
        .build(produce())
        .unwrap();

    // Assert
    let selected: Vec<_> = tree
        .iter()
        .filter(|(_, n)| n.is_selected())
        .map(|(_, n)| n.name.clone())
        .collect();
    assert_eq!(selected, vec!["Banana"]);
}

#[test]
fn given_no_selected_id_when_building_then_nothing_is_selected() {
    let tree = TermTreeBuilder::new().build(produce()).unwrap();

    assert!(tree.iter().all(|(_, n)| !n.is_selected()));
}

#[test]
fn given_lazy_enumeration_when_building_then_root_keeps_input_collection() {
    // Arrange: forward-only iterator, no length known up front
    let terms = produce();
    let expected = terms.clone();
    let lazy = terms.into_iter().filter(|_| true);

    // Act
    let tree = TermTreeBuilder::new().build(lazy).unwrap();

    // Assert
    let root = tree.root_node();
    assert_eq!(root.name, "");
    assert!(matches!(root.payload, NodePayload::Collection(_)));
    assert_eq!(tree.source_terms(), expected.as_slice());
    assert_eq!(tree.len(), 6);
}

#[test]
fn given_tree_when_rendering_then_shows_titles_and_selection() {
    let tree = TermTreeBuilder::new()
        .with_selected(Some(id(2)))
        .build(produce())
        .unwrap();

    let rendered = tree.to_tree_string().to_string();

    assert!(rendered.starts_with("(term set)"));
    assert!(rendered.contains("Apple [selected]"));
    assert!(rendered.contains("Carrot"));
}

#[test]
fn given_tree_when_nesting_then_serializes_children() {
    let tree = TermTreeBuilder::new().build(produce()).unwrap();

    let nested = tree.to_nested();
    let json = serde_json::to_value(&nested).unwrap();

    assert_eq!(json["children"][0]["name"], "Fruit");
    assert_eq!(json["children"][0]["children"][1]["title"], "Banana");
    assert_eq!(json["children"][1]["guid"], id(4).to_string());
}
