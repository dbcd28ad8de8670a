#![forbid(unsafe_code)]

use serde_json::json;
use sseq_core::{ChartError, INFINITY, PageQuery, SpectralSequenceChart};

fn chart_with_edge(edge: serde_json::Value) -> SpectralSequenceChart {
    let mut chart = SpectralSequenceChart::new();
    chart.add_node(&json!({ "shape": "circle" })).expect("node");
    chart
        .add_class(&json!({ "uuid": 0, "x": 1, "y": 1, "node_list": [0] }))
        .expect("inside");
    chart
        .add_class(&json!({ "uuid": 1, "x": 20, "y": 1, "node_list": [0] }))
        .expect("outside");
    chart.add_edge(&edge).expect("edge");
    chart
}

fn uuids(list: &sseq_core::DrawList<'_>) -> Vec<(u64, bool)> {
    list.classes
        .iter()
        .map(|drawn| (drawn.class.uuid, drawn.in_range))
        .collect()
}

#[test]
fn off_viewport_endpoint_is_forced_in_once() {
    let mut chart = chart_with_edge(json!({ "type": "structline", "source": 0, "target": 1 }));
    chart
        .add_edge(&json!({ "type": "structline", "source": 1, "target": 0 }))
        .expect("second structline");

    let list = chart
        .elements_to_draw(2, 0.0, 10.0, 0.0, 10.0)
        .expect("draw");
    assert_eq!(uuids(&list), vec![(0, true), (1, false)]);
    assert_eq!(list.edges.len(), 2);

    // A later query starts from a clean slate.
    let again = chart
        .elements_to_draw(2, 0.0, 10.0, 0.0, 10.0)
        .expect("draw again");
    assert_eq!(uuids(&again), vec![(0, true), (1, false)]);
    assert_eq!(again.edges.len(), 2);
}

#[test]
fn edge_with_both_endpoints_outside_is_skipped() {
    let chart = chart_with_edge(json!({ "type": "structline", "source": 0, "target": 1 }));
    let list = chart
        .elements_to_draw(2, 30.0, 40.0, 0.0, 10.0)
        .expect("draw");
    assert!(list.classes.is_empty());
    assert!(list.edges.is_empty());
}

#[test]
fn differential_visibility_follows_page_range() {
    let chart = chart_with_edge(json!({ "type": "differential", "source": 0, "target": 1, "page": 3 }));
    let edges_on = |query: PageQuery| {
        chart
            .elements_to_draw(query, 0.0, 10.0, 0.0, 10.0)
            .expect("draw")
            .edges
            .len()
    };
    assert_eq!(edges_on(PageQuery::Range(0, 0)), 1);
    assert_eq!(edges_on(PageQuery::Range(2, 4)), 1);
    assert_eq!(edges_on(PageQuery::Range(4, 4)), 0);
    assert_eq!(edges_on(PageQuery::Page(3)), 1);
}

#[test]
fn extension_only_draws_on_infinity_page() {
    let chart = chart_with_edge(json!({ "type": "extension", "source": 0, "target": 1 }));
    let on_e2 = chart.elements_to_draw(2, 0.0, 10.0, 0.0, 10.0).expect("draw");
    assert!(on_e2.edges.is_empty());
    let on_einf = chart
        .elements_to_draw(INFINITY, 0.0, 10.0, 0.0, 10.0)
        .expect("draw");
    assert_eq!(on_einf.edges.len(), 1);
}

#[test]
fn classes_past_max_page_and_invalid_classes_are_hidden() {
    let mut chart = SpectralSequenceChart::new();
    chart
        .add_class(&json!({ "uuid": 0, "x": 0, "y": 0, "node_list": [{ "shape": "circle" }], "max_page": 3 }))
        .expect("class");
    chart
        .add_class(&json!({ "uuid": 1, "x": 1, "y": 0, "node_list": [{}], "invalid": true }))
        .expect("class");

    let on_e3 = chart.elements_to_draw(3, 0.0, 5.0, 0.0, 5.0).expect("draw");
    assert_eq!(uuids(&on_e3), vec![(0, true)]);
    let on_e4 = chart.elements_to_draw(4, 0.0, 5.0, 0.0, 5.0).expect("draw");
    assert!(on_e4.classes.is_empty());
}

#[test]
fn node_follows_transition_pages() {
    let mut chart = SpectralSequenceChart::new();
    chart.add_node(&json!({ "shape": "circle" })).expect("node");
    chart.add_node(&json!({ "shape": "square" })).expect("node");
    chart
        .add_class(&json!({ "x": 0, "y": 0, "node_list": [0, 1], "transition_pages": [3] }))
        .expect("class");

    let shape_on = |page: i64| {
        let list = chart.elements_to_draw(page, 0.0, 1.0, 0.0, 1.0).expect("draw");
        list.classes[0].node.shape.clone()
    };
    assert_eq!(shape_on(3).as_deref(), Some("circle"));
    assert_eq!(shape_on(4).as_deref(), Some("square"));
    assert_eq!(shape_on(INFINITY).as_deref(), Some("square"));
}

#[test]
fn missing_render_data_is_a_reference_error() {
    let mut chart = SpectralSequenceChart::new();
    chart.add_class(&json!({ "uuid": 0, "x": 0, "y": 0 })).expect("class");
    let err = chart.elements_to_draw(2, 0.0, 1.0, 0.0, 1.0).unwrap_err();
    assert_eq!(err, ChartError::MissingNode { class: 0, page: 2 });

    let mut chart = SpectralSequenceChart::new();
    chart
        .add_class(&json!({ "uuid": 0, "x": 0, "y": 0, "node_list": [{}] }))
        .expect("class");
    chart
        .add_edge(&json!({ "type": "structline", "source": 0, "target": 9 }))
        .expect("edge");
    let err = chart.elements_to_draw(2, 0.0, 1.0, 0.0, 1.0).unwrap_err();
    assert_eq!(
        err,
        ChartError::DanglingEndpoint {
            edge: 1,
            endpoint: "target",
            class: 9
        }
    );
    assert_eq!(err.kind().as_str(), "ReferenceError");
}

#[test]
fn draw_query_leaves_chart_unchanged() {
    let chart = chart_with_edge(json!({ "type": "structline", "source": 0, "target": 1 }));
    let before = chart.to_json();
    let first = uuids(&chart.elements_to_draw(2, 0.0, 10.0, 0.0, 10.0).expect("draw"));
    let second = uuids(&chart.elements_to_draw(2, 0.0, 10.0, 0.0, 10.0).expect("draw"));
    assert_eq!(first, second);
    assert_eq!(chart.to_json(), before);
}
