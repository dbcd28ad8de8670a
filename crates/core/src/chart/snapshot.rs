#![forbid(unsafe_code)]

use super::SpectralSequenceChart;
use crate::ChartError;
use crate::fields::Fields;
use crate::node::ChartNode;
use crate::page::PageEntry;
use serde_json::{Map, Value, json};

const SNAPSHOT_FIELDS: &[&str] = &[
    "type",
    "nodes",
    "classes",
    "edges",
    "x_range",
    "y_range",
    "initial_x_range",
    "initial_y_range",
    "page_list",
    "min_page_idx",
    "next_uuid",
    "offset_size",
    "min_class_size",
    "max_class_size",
    "class_scale",
];

const SNAPSHOT_TYPE_TAG: &str = "SpectralSequenceChart";

/// Entries of a `classes`/`edges` collection: an array in order, or an object
/// keyed by uuid. Numeric keys come first in numeric order.
fn collection_entries(value: &Value) -> Result<Vec<&Value>, ChartError> {
    match value {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => {
            let mut keyed: Vec<(Option<u64>, &String, &Value)> = map
                .iter()
                .map(|(key, v)| (key.parse::<u64>().ok(), key, v))
                .collect();
            keyed.sort_by(|a, b| match (a.0, b.0) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.1.cmp(b.1),
            });
            Ok(keyed.into_iter().map(|(_, _, v)| v).collect())
        }
        other => Err(ChartError::InvalidField {
            entity: "chart",
            field: "classes",
            expected: "an array or an object keyed by uuid",
            value: other.to_string(),
        }),
    }
}

impl SpectralSequenceChart {
    /// Builds a chart from a full snapshot.
    ///
    /// Scalars are assigned first, then every node, class and edge goes through the
    /// regular insertion path. Listeners registered later see none of these events.
    pub fn from_json(value: &Value) -> Result<Self, ChartError> {
        let Some(obj) = value.as_object() else {
            return Err(ChartError::NotAnObject { entity: "chart" });
        };
        for field in ["nodes", "classes", "edges"] {
            if obj.get(field).is_none_or(Value::is_null) {
                return Err(ChartError::MissingSnapshotField(field));
            }
        }
        let fields = Fields::new("chart", value, SNAPSHOT_FIELDS)?;
        if let Some(tag) = fields.get("type")
            && tag.as_str() != Some(SNAPSHOT_TYPE_TAG)
        {
            return Err(ChartError::InvalidField {
                entity: "chart",
                field: "type",
                expected: "\"SpectralSequenceChart\"",
                value: tag.to_string(),
            });
        }

        let mut chart = Self::new();
        if let Some(range) = fields.opt_pair("x_range")? {
            chart.x_range = range;
        }
        if let Some(range) = fields.opt_pair("y_range")? {
            chart.y_range = range;
        }
        if let Some(range) = fields.opt_pair("initial_x_range")? {
            chart.initial_x_range = range;
        }
        if let Some(range) = fields.opt_pair("initial_y_range")? {
            chart.initial_y_range = range;
        }
        if let Some(items) = fields.opt_array("page_list")? {
            chart.page_list = items
                .iter()
                .map(|item| {
                    PageEntry::from_json(item).ok_or_else(|| ChartError::InvalidField {
                        entity: "chart",
                        field: "page_list",
                        expected: "pages or [min, max] page ranges",
                        value: item.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(idx) = fields.opt_u64("min_page_idx")? {
            chart.min_page_idx = usize::try_from(idx).unwrap_or(usize::MAX);
        }
        if let Some(next_uuid) = fields.opt_u64("next_uuid")? {
            chart.next_uuid = next_uuid;
        }
        if let Some(v) = fields.opt_f64("offset_size")? {
            chart.offset_size = v;
        }
        if let Some(v) = fields.opt_f64("min_class_size")? {
            chart.min_class_size = v;
        }
        if let Some(v) = fields.opt_f64("max_class_size")? {
            chart.max_class_size = v;
        }
        if let Some(v) = fields.opt_f64("class_scale")? {
            chart.class_scale = v;
        }

        let nodes = fields.opt_array("nodes")?.map_or(&[][..], Vec::as_slice);
        for node in nodes {
            chart.nodes.push(ChartNode::from_json(node)?);
        }
        if let Some(classes) = fields.get("classes") {
            for class in collection_entries(classes)? {
                chart.add_class(class)?;
            }
        }
        if let Some(edges) = fields.get("edges") {
            for edge in collection_entries(edges)? {
                chart.add_edge(edge)?;
            }
        }
        Ok(chart)
    }

    /// Snapshot in the shape `from_json` accepts.
    pub fn to_json(&self) -> Value {
        let classes: Map<String, Value> = self
            .classes
            .iter()
            .map(|(uuid, class)| (uuid.to_string(), class.to_json()))
            .collect();
        let edges: Map<String, Value> = self
            .edges
            .iter()
            .map(|(uuid, edge)| (uuid.to_string(), edge.to_json()))
            .collect();
        json!({
            "type": SNAPSHOT_TYPE_TAG,
            "nodes": self.nodes.iter().map(ChartNode::to_json).collect::<Vec<_>>(),
            "classes": classes,
            "edges": edges,
            "x_range": [self.x_range.0, self.x_range.1],
            "y_range": [self.y_range.0, self.y_range.1],
            "initial_x_range": [self.initial_x_range.0, self.initial_x_range.1],
            "initial_y_range": [self.initial_y_range.0, self.initial_y_range.1],
            "page_list": self.page_list.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
            "min_page_idx": self.min_page_idx,
            "next_uuid": self.next_uuid,
            "offset_size": self.offset_size,
            "min_class_size": self.min_class_size,
            "max_class_size": self.max_class_size,
            "class_scale": self.class_scale,
        })
    }

    /// Display hints: `(offset_size, min_class_size, max_class_size, class_scale)`.
    pub fn class_sizing(&self) -> (f64, f64, f64, f64) {
        (
            self.offset_size,
            self.min_class_size,
            self.max_class_size,
            self.class_scale,
        )
    }
}
