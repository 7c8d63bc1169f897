use rstest::rstest;
use treeness_core::{ByHandle, Error, Forest, Hierarchical, NodeId};
use treeness_test_support::{init_tracing, sample_tree, snapshot, OrgUnit, SampleTree};

type Pick = fn(&SampleTree) -> (NodeId<OrgUnit>, NodeId<OrgUnit>);

#[test]
fn set_parent_links_both_sides() {
    init_tracing();
    let mut forest = Forest::new();
    let parent = forest.insert(OrgUnit::new("p", "Parent"));
    let child = forest.insert(OrgUnit::new("c", "Child"));

    forest.set_parent(child, parent).unwrap();

    assert_eq!(forest.parent(child).unwrap(), Some(parent));
    assert_eq!(forest.children(parent).unwrap(), vec![child]);
    assert!(!forest.is_root(child).unwrap());
    assert!(forest.is_root(parent).unwrap());
    forest.validate_invariants().unwrap();
}

#[test]
fn add_child_returns_parent_and_keeps_insertion_order() {
    let mut forest = Forest::new();
    let parent = forest.insert(OrgUnit::new("p", "Parent"));
    let kids: Vec<_> = ["x", "y", "z"]
        .iter()
        .map(|id| forest.insert(OrgUnit::new(id, id)))
        .collect();

    for &kid in &kids {
        assert_eq!(forest.add_child(parent, kid).unwrap(), parent);
    }

    assert_eq!(forest.children(parent).unwrap(), kids);
    assert_eq!(forest.child_count(parent).unwrap(), 3);
    for &kid in &kids {
        assert_eq!(forest.parent(kid).unwrap(), Some(parent));
    }
}

#[test]
fn a_node_keeps_a_single_parent() {
    let (mut forest, t) = sample_tree();
    let before = snapshot(&forest, &[t.r, t.a, t.b, t.c]);

    let err = forest.set_parent(t.c, t.b).unwrap_err();

    assert_eq!(err, Error::IllegalArgument("this already has a parent".into()));
    assert_eq!(snapshot(&forest, &[t.r, t.a, t.b, t.c]), before);
}

#[test]
fn moving_a_node_means_detaching_first() {
    let (mut forest, t) = sample_tree();

    forest.unset_parent(t.c).unwrap();
    forest.set_parent(t.c, t.b).unwrap();

    assert!(forest.children(t.a).unwrap().is_empty());
    assert_eq!(forest.children(t.b).unwrap(), vec![t.c]);
    assert_eq!(forest.parent(t.c).unwrap(), Some(t.b));
    forest.validate_invariants().unwrap();
}

#[test]
fn self_attach_is_circular() {
    let mut forest = Forest::new();
    let node = forest.insert(OrgUnit::new("n", "Node"));

    let err = forest.set_parent(node, node).unwrap_err();

    assert_eq!(err, Error::TreeCircularity("parent is this".into()));
    assert!(forest.is_root(node).unwrap());
    assert_eq!(forest.child_count(node).unwrap(), 0);
}

#[test]
fn mutual_attach_is_rejected() {
    let mut forest = Forest::new();
    let a = forest.insert(OrgUnit::new("a", "A"));
    let b = forest.insert(OrgUnit::new("b", "B"));
    forest.set_parent(a, b).unwrap();

    let err = forest.set_parent(b, a).unwrap_err();

    assert!(matches!(err, Error::TreeCircularity(_)));
    assert_eq!(forest.parent(a).unwrap(), Some(b));
    assert_eq!(forest.parent(b).unwrap(), None);
    forest.validate_invariants().unwrap();
}

#[test]
fn root_cannot_move_under_its_descendant() {
    let (mut forest, t) = sample_tree();
    let before = snapshot(&forest, &[t.r, t.a, t.b, t.c]);

    let err = forest.set_parent(t.r, t.c).unwrap_err();

    assert_eq!(
        err,
        Error::TreeCircularity("parent already contained by this".into())
    );
    assert_eq!(snapshot(&forest, &[t.r, t.a, t.b, t.c]), before);
}

#[test]
fn equal_id_elsewhere_in_tree_is_rejected() {
    let (mut forest, t) = sample_tree();
    let twin = forest.insert(OrgUnit::new("c", "Gamma twin"));

    let err = forest.set_parent(twin, t.b).unwrap_err();

    assert_eq!(
        err,
        Error::TreeCircularity("this already exists in tree".into())
    );
    assert!(forest.is_root(twin).unwrap());
    assert_eq!(forest.children(t.b).unwrap(), Vec::new());
}

#[test]
fn handle_identity_allows_equal_ids() {
    let (mut forest, t) = sample_tree();
    let twin = forest.insert(OrgUnit::new("c", "Gamma twin"));

    forest.set_parent_with(twin, t.b, &ByHandle).unwrap();

    assert_eq!(forest.children(t.b).unwrap(), vec![twin]);
    forest.validate_invariants().unwrap();
}

#[test]
fn grafting_a_separate_tree() {
    let (mut forest, t) = sample_tree();
    let x = forest.insert(OrgUnit::new("x", "X"));
    let y = forest.insert(OrgUnit::new("y", "Y"));
    forest.add_child(x, y).unwrap();

    forest.set_parent(x, t.c).unwrap();

    assert_eq!(forest.root(y).unwrap(), t.r);
    assert_eq!(forest.children_recursively(t.a).unwrap(), vec![t.c, x, y]);
    forest.validate_invariants().unwrap();
}

#[test]
fn unset_parent_on_root_is_a_no_op() {
    let (mut forest, t) = sample_tree();
    let before = snapshot(&forest, &[t.r, t.a, t.b, t.c]);

    assert_eq!(forest.unset_parent(t.r).unwrap(), t.r);
    assert_eq!(snapshot(&forest, &[t.r, t.a, t.b, t.c]), before);
}

#[test]
fn unset_parent_detaches_both_sides() {
    let (mut forest, t) = sample_tree();

    assert_eq!(forest.unset_parent(t.a).unwrap(), t.a);

    assert!(forest.is_root(t.a).unwrap());
    assert_eq!(forest.children(t.r).unwrap(), vec![t.b]);
    // the detached subtree stays intact
    assert_eq!(forest.children(t.a).unwrap(), vec![t.c]);
    assert_eq!(forest.roots().len(), 2);
    forest.validate_invariants().unwrap();
}

#[test]
fn remove_child_returns_parent() {
    let (mut forest, t) = sample_tree();

    assert_eq!(forest.remove_child(t.r, t.b).unwrap(), t.r);

    assert_eq!(forest.children(t.r).unwrap(), vec![t.a]);
    assert!(forest.is_root(t.b).unwrap());
    forest.validate_invariants().unwrap();

    assert_eq!(
        forest.remove_child(t.r, t.b).unwrap_err(),
        Error::IllegalArgument("this does not contain child".into())
    );
}

#[rstest]
#[case::grandchild(|t: &SampleTree| (t.r, t.c))]
#[case::sibling(|t: &SampleTree| (t.a, t.b))]
#[case::own_parent(|t: &SampleTree| (t.c, t.a))]
fn remove_child_rejects_non_children(#[case] pick: Pick) {
    let (mut forest, t) = sample_tree();
    let (parent, child) = pick(&t);
    let before = snapshot(&forest, &[t.r, t.a, t.b, t.c]);

    let err = forest.remove_child(parent, child).unwrap_err();

    assert_eq!(err, Error::IllegalArgument("this does not contain child".into()));
    assert_eq!(snapshot(&forest, &[t.r, t.a, t.b, t.c]), before);
}

#[test]
fn stale_handles_are_missing_arguments() {
    let mut forest = Forest::new();
    let parent = forest.insert(OrgUnit::new("p", "Parent"));
    let gone = forest.insert(OrgUnit::new("g", "Gone"));
    forest.remove(gone).unwrap();

    assert_eq!(
        forest.set_parent(parent, gone).unwrap_err(),
        Error::MissingRequiredArgument("parent".into())
    );
    assert_eq!(
        forest.add_child(parent, gone).unwrap_err(),
        Error::MissingRequiredArgument("child".into())
    );
    assert_eq!(
        forest.set_parent(gone, parent).unwrap_err(),
        Error::MissingRequiredArgument("node".into())
    );
    assert!(forest.is_root(parent).unwrap());
}

#[test]
fn stale_parent_is_named_the_same_by_every_mutation() {
    let mut forest = Forest::new();
    let child = forest.insert(OrgUnit::new("c", "Child"));
    let gone = forest.insert(OrgUnit::new("g", "Gone"));
    forest.remove(gone).unwrap();
    let expected = Error::MissingRequiredArgument("parent".into());

    assert_eq!(forest.set_parent(child, gone).unwrap_err(), expected);
    assert_eq!(forest.add_child(gone, child).unwrap_err(), expected);
    assert_eq!(forest.remove_child(gone, child).unwrap_err(), expected);
    assert_eq!(
        forest.remove_child_with(gone, child, &ByHandle).unwrap_err(),
        expected
    );
    assert!(forest.is_root(child).unwrap());
}

#[test]
fn handles_from_another_forest_are_illegal() {
    let mut left = Forest::new();
    let mut right = Forest::new();
    let here = left.insert(OrgUnit::new("h", "Here"));
    let there = right.insert(OrgUnit::new("t", "There"));

    let err = left.set_parent(here, there).unwrap_err();

    assert_eq!(
        err,
        Error::IllegalArgument("parent must be the same type of node as this".into())
    );
    assert!(matches!(
        left.add_child(here, there),
        Err(Error::IllegalArgument(_))
    ));
    assert!(matches!(left.entity(there), Err(Error::IllegalArgument(_))));
}

#[test]
fn errors_render_with_their_kind() {
    let mut forest = Forest::new();
    let node = forest.insert(OrgUnit::new("n", "Node"));
    let err = forest.set_parent(node, node).unwrap_err();
    assert_eq!(err.to_string(), "tree circularity: parent is this");
}
