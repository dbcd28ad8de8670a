#![forbid(unsafe_code)]

use super::*;
use crate::page::INFINITY;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn recorded_events(chart: &mut SpectralSequenceChart) -> Rc<RefCell<Vec<&'static str>>> {
    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = names.clone();
    chart
        .events_mut()
        .subscribe_all(move |event| sink.borrow_mut().push(event.name()));
    names
}

#[test]
fn add_class_assigns_dense_idx_per_degree() {
    let mut chart = SpectralSequenceChart::new();
    let a = chart.add_class(&json!({ "x": 1, "y": 2 })).unwrap();
    let b = chart.add_class(&json!({ "x": 1, "y": 2 })).unwrap();
    let c = chart.add_class(&json!({ "x": 3, "y": 0 })).unwrap();

    assert_eq!(chart.class(a).unwrap().idx, 0);
    assert_eq!(chart.class(b).unwrap().idx, 1);
    assert_eq!(chart.class(c).unwrap().idx, 0);
    assert_eq!(chart.classes_in_degree(1, 2), &[a, b]);
}

#[test]
fn invalid_classes_are_compacted_before_next_insert() {
    let mut chart = SpectralSequenceChart::new();
    let a = chart.add_class(&json!({ "x": 0, "y": 0 })).unwrap();
    let b = chart.add_class(&json!({ "x": 0, "y": 0 })).unwrap();
    chart
        .update_class(&json!({ "uuid": a, "invalid": true }))
        .unwrap();
    // Still listed until something new lands in the same bidegree.
    assert_eq!(chart.classes_in_degree(0, 0), &[a, b]);

    let c = chart.add_class(&json!({ "x": 0, "y": 0 })).unwrap();
    assert_eq!(chart.classes_in_degree(0, 0), &[b, c]);
    assert_eq!(chart.class(b).unwrap().idx, 0);
    assert_eq!(chart.class(c).unwrap().idx, 1);
    assert_eq!(chart.class_by_degree_and_index(0, 0, 0).unwrap().uuid, b);
    assert_eq!(chart.class_by_degree_and_index(0, 0, 1).unwrap().uuid, c);
    let idxs = chart
        .classes_in_degree(0, 0)
        .iter()
        .map(|uuid| chart.class(*uuid).unwrap().idx)
        .collect::<Vec<_>>();
    assert_eq!(idxs, vec![0, 1]);
}

#[test]
fn explicit_idx_survives_when_nothing_is_compacted() {
    let mut chart = SpectralSequenceChart::new();
    let a = chart.add_class(&json!({ "x": 5, "y": 5, "idx": 3 })).unwrap();
    let b = chart.add_class(&json!({ "x": 5, "y": 5 })).unwrap();
    assert_eq!(chart.class(a).unwrap().idx, 3);
    assert_eq!(chart.class(b).unwrap().idx, 1);
}

#[test]
fn add_class_emits_class_added_then_update() {
    let mut chart = SpectralSequenceChart::new();
    let names = recorded_events(&mut chart);
    let uuid = chart.add_class(&json!({ "x": 1, "y": 2 })).unwrap();
    assert_eq!(*names.borrow(), vec!["class-added", "update"]);
    assert_eq!(chart.class_by_degree_and_index(1, 2, 0).unwrap().uuid, uuid);
}

#[test]
fn structline_uuid_is_distinct_from_every_existing_uuid() {
    let mut chart = SpectralSequenceChart::new();
    let a = chart.add_class(&json!({ "x": 0, "y": 0 })).unwrap();
    let b = chart.add_class(&json!({ "uuid": 7, "x": 1, "y": 1 })).unwrap();
    let names = recorded_events(&mut chart);

    let edge = chart
        .add_edge(&json!({ "type": "structline", "source": a, "target": b }))
        .unwrap();
    assert_ne!(edge, a);
    assert_ne!(edge, b);
    assert_eq!(edge, 8);
    assert_eq!(
        *names.borrow(),
        vec!["structline-added", "edge-added", "update"]
    );
}

#[test]
fn duplicate_uuid_is_rejected_without_side_effects() {
    let mut chart = SpectralSequenceChart::new();
    chart.add_class(&json!({ "uuid": 3, "x": 0, "y": 0 })).unwrap();
    let before = chart.next_uuid();
    let names = recorded_events(&mut chart);

    let err = chart
        .add_edge(&json!({ "type": "extension", "uuid": 3, "source": 3, "target": 3 }))
        .unwrap_err();
    assert_eq!(err, ChartError::DuplicateUuid(3));
    assert_eq!(err.kind(), crate::ChartErrorKind::Validation);
    assert_eq!(chart.next_uuid(), before);
    assert!(chart.edges().is_empty());
    assert!(names.borrow().is_empty());
}

#[test]
fn failed_validation_leaves_chart_untouched() {
    let mut chart = SpectralSequenceChart::new();
    let names = recorded_events(&mut chart);

    assert!(chart.add_class(&json!({ "x": 0 })).is_err());
    assert!(chart.add_class(&json!({ "x": 0, "y": 0, "colour": "red" })).is_err());
    assert!(
        chart
            .add_edge(&json!({ "type": "differential", "source": 0, "target": 1 }))
            .is_err()
    );
    assert!(chart.classes().is_empty());
    assert!(chart.edges().is_empty());
    assert_eq!(chart.next_uuid(), 0);
    assert!(chart.classes_in_degree(0, 0).is_empty());
    assert!(names.borrow().is_empty());
}

#[test]
fn unknown_edge_type_names_accepted_variants() {
    let mut chart = SpectralSequenceChart::new();
    let err = chart
        .add_edge(&json!({ "type": "arrow", "source": 0, "target": 0 }))
        .unwrap_err();
    let message = err.to_string();
    for variant in ["differential", "structline", "extension", "arrow"] {
        assert!(message.contains(variant), "{message}");
    }
    let err = chart.add_edge(&json!({ "source": 0, "target": 0 })).unwrap_err();
    assert!(err.to_string().contains("undefined"));
}

#[test]
fn lookup_errors_distinguish_empty_degree_and_bad_index() {
    let mut chart = SpectralSequenceChart::new();
    chart.add_class(&json!({ "x": 1, "y": 1 })).unwrap();

    assert_eq!(
        chart.class_by_degree_and_index(5, 5, 0).unwrap_err(),
        ChartError::NoClassesInDegree { x: 5, y: 5 }
    );
    assert_eq!(
        chart.class_by_degree_and_index(1, 1, 1).unwrap_err(),
        ChartError::ClassIndexOutOfBounds {
            x: 1,
            y: 1,
            idx: 1,
            len: 1
        }
    );
    let err = chart
        .class_by_degree_and_index_json(&json!(1), &json!("1"), &json!(0))
        .unwrap_err();
    assert_eq!(
        err,
        ChartError::NotAnInteger {
            name: "y",
            value: "\"1\"".to_string()
        }
    );
    assert!(
        chart
            .class_by_degree_and_index_json(&json!(1.0), &json!(1), &json!(0))
            .is_ok()
    );
}

#[test]
fn class_update_rejects_moving_the_class() {
    let mut chart = SpectralSequenceChart::new();
    let uuid = chart.add_class(&json!({ "x": 1, "y": 1, "name": "h0" })).unwrap();
    let err = chart
        .update_class(&json!({ "uuid": uuid, "x": 2 }))
        .unwrap_err();
    assert_eq!(
        err,
        ChartError::ImmutableField {
            entity: "class",
            field: "x"
        }
    );

    chart
        .update_class(&json!({ "uuid": uuid, "x": 1, "max_page": 3, "name": null }))
        .unwrap();
    let class = chart.class(uuid).unwrap();
    assert_eq!(class.max_page, 3);
    assert_eq!(class.name, None);

    assert_eq!(
        chart.update_class(&json!({ "uuid": 99 })).unwrap_err(),
        ChartError::UnknownClass(99)
    );
}

#[test]
fn set_class_name_targets_degree_and_index() {
    let mut chart = SpectralSequenceChart::new();
    chart.add_class(&json!({ "x": 2, "y": 0 })).unwrap();
    let second = chart.add_class(&json!({ "x": 2, "y": 0 })).unwrap();
    let names = recorded_events(&mut chart);

    chart
        .set_class_name(2, 0, 1, Some("h1".to_string()))
        .unwrap();
    assert_eq!(chart.class(second).unwrap().name.as_deref(), Some("h1"));
    assert_eq!(*names.borrow(), vec!["class-updated", "update"]);
}

#[test]
fn set_class_name_uses_list_position_not_stored_idx() {
    let mut chart = SpectralSequenceChart::new();
    let lone = chart.add_class(&json!({ "x": 5, "y": 5, "idx": 3 })).unwrap();
    chart
        .set_class_name(5, 5, 0, Some("x5".to_string()))
        .unwrap();
    assert_eq!(chart.class(lone).unwrap().name.as_deref(), Some("x5"));
    assert_eq!(
        chart.set_class_name_by_uuid(77, None).unwrap_err(),
        ChartError::UnknownClass(77)
    );
}

#[test]
fn edge_update_keeps_kind() {
    let mut chart = SpectralSequenceChart::new();
    let a = chart.add_class(&json!({ "x": 0, "y": 0 })).unwrap();
    let b = chart.add_class(&json!({ "x": 1, "y": 2 })).unwrap();
    let d = chart
        .add_edge(&json!({ "type": "differential", "source": a, "target": b, "page": 2 }))
        .unwrap();

    chart
        .update_edge(&json!({ "uuid": d, "page": 3, "color": "red" }))
        .unwrap();
    let edge = chart.edge(d).unwrap();
    assert_eq!(edge.kind, EdgeKind::Differential { page: 3 });
    assert_eq!(edge.color.as_deref(), Some("red"));

    let err = chart
        .update_edge(&json!({ "uuid": d, "type": "structline" }))
        .unwrap_err();
    assert!(matches!(err, ChartError::UnknownField { .. } | ChartError::InvalidField { .. }));
    assert_eq!(
        chart.update_edge(&json!({ "uuid": 42 })).unwrap_err(),
        ChartError::UnknownEdge(42)
    );
}

#[test]
fn page_list_inserts_within_bounds() {
    let mut chart = SpectralSequenceChart::new();
    chart
        .insert_page_range(1, PageEntry::Range(3, INFINITY))
        .unwrap();
    assert_eq!(
        chart.page_list(),
        &[PageEntry::Page(2), PageEntry::Range(3, INFINITY)]
    );
    assert_eq!(
        chart.insert_page_range(5, PageEntry::Page(9)).unwrap_err(),
        ChartError::PageIndexOutOfRange { idx: 5, len: 2 }
    );
}

#[test]
fn nodes_are_indexed_in_insertion_order() {
    let mut chart = SpectralSequenceChart::new();
    let names = recorded_events(&mut chart);
    assert_eq!(chart.add_node(&json!({ "shape": "circle" })).unwrap(), 0);
    assert_eq!(chart.add_node(&json!({ "shape": "square" })).unwrap(), 1);
    assert_eq!(chart.nodes()[1].shape.as_deref(), Some("square"));
    assert_eq!(
        *names.borrow(),
        vec!["node-added", "update", "node-added", "update"]
    );
}

#[test]
fn snapshot_requires_entity_collections() {
    let err = SpectralSequenceChart::from_json(&json!({ "nodes": [], "classes": {} }))
        .unwrap_err();
    assert_eq!(err, ChartError::MissingSnapshotField("edges"));
    assert_eq!(err.kind(), crate::ChartErrorKind::Reference);
}

#[test]
fn snapshot_assigns_scalars_before_entities() {
    let chart = SpectralSequenceChart::from_json(&json!({
        "nodes": [],
        "classes": { "10": { "x": 0, "y": 0 }, "2": { "uuid": 2, "x": 0, "y": 0 } },
        "edges": [],
        "next_uuid": 5,
        "x_range": [-1, 20],
        "page_list": [2, [3, 4]],
    }))
    .unwrap();
    assert_eq!(chart.x_range(), (-1.0, 20.0));
    assert_eq!(chart.page_list(), &[PageEntry::Page(2), PageEntry::Range(3, 4)]);
    // Key "2" is inserted first; the entry under "10" has no uuid and takes the counter.
    assert_eq!(chart.classes_in_degree(0, 0), &[2, 5]);
    assert_eq!(chart.next_uuid(), 6);
}
