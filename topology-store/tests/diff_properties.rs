use std::collections::BTreeSet;
use topology_store::meta::{Alias, App, Channel, ChannelType, Node};
use topology_store::{diff, render_changelog, ChangeKind, Changelog};
use topology_test_utils::{billing_app, init_logging, printer_app};

fn revised_billing() -> App {
    let printer = printer_app()
        .with_output("receipts")
        .with_node(Node::new("registry.local/printer:1.1", 2).with_env("FORMAT", "ps"));
    let mut billing = billing_app()
        .with_app(printer)
        .with_channel(Channel::new("receipts", "Invoice").with_priority(&["kafka"]))
        .with_type(ChannelType::new("Invoice", r#"{"type":"string"}"#))
        .with_alias(Alias::new("feed", "invoices"))
        .with_app(App::named("archive"));
    billing.meta = billing.meta.with_annotation("owner", "finance");
    billing
}

fn path_set(changelog: &Changelog) -> BTreeSet<String> {
    changelog.paths().into_iter().map(str::to_string).collect()
}

#[test]
fn diff_of_independent_copies_is_empty() {
    init_logging();
    for tree in [billing_app(), revised_billing(), App::default()] {
        let copy = tree.clone();
        assert!(diff(Some(&tree), Some(&copy)).unwrap().is_empty());
    }
}

#[test]
fn reversed_diff_swaps_kinds_and_values() {
    init_logging();
    let old = billing_app();
    let new = revised_billing();

    let forward = diff(Some(&old), Some(&new)).unwrap();
    let backward = diff(Some(&new), Some(&old)).unwrap();
    assert!(!forward.is_empty());
    assert_eq!(path_set(&forward), path_set(&backward));
    assert_eq!(forward.len(), backward.len());

    for change in forward.iter() {
        assert!(
            backward.iter().any(|candidate| *candidate == change.inverse()),
            "no inverse for {change:?}"
        );
    }
}

#[test]
fn reversed_diff_of_whole_trees_swaps_created_and_deleted() {
    init_logging();
    let tree = billing_app();
    let created = diff(None, Some(&tree)).unwrap();
    let deleted = diff(Some(&tree), None).unwrap();

    assert_eq!(created.paths(), deleted.paths());
    assert!(created.iter().all(|change| change.kind.is_creation()));
    assert!(deleted.iter().all(|change| change.kind.is_deletion()));
}

#[test]
fn revised_billing_reports_every_touched_field() {
    init_logging();
    let changelog = diff(Some(&billing_app()), Some(&revised_billing())).unwrap();
    let kinds: BTreeSet<&str> = changelog.iter().map(|change| change.kind.as_str()).collect();

    for expected in [
        ChangeKind::AppUpdated,
        ChangeKind::AppCreated,
        ChangeKind::NodeUpdated,
        ChangeKind::BoundaryChanged,
        ChangeKind::ChannelCreated,
        ChangeKind::TypeUpdated,
        ChangeKind::AliasCreated,
    ] {
        assert!(kinds.contains(expected.as_str()), "missing {expected}");
    }

    let rendered = render_changelog(&changelog);
    assert!(rendered.contains("billing.archive"));
    assert!(rendered.contains("Meta.Annotations[owner]: <none> -> finance"));
}
