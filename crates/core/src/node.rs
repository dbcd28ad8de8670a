#![forbid(unsafe_code)]

use crate::ChartError;
use crate::fields::{Fields, as_integer};
use serde::Serialize;
use serde_json::Value;

const NODE_FIELDS: &[&str] = &["shape", "color", "fill", "stroke", "scale", "opacity"];

/// Rendering descriptor for a class on some range of pages.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl ChartNode {
    pub fn from_json(value: &Value) -> Result<Self, ChartError> {
        let fields = Fields::new("node", value, NODE_FIELDS)?;
        Ok(Self {
            shape: fields.opt_string("shape")?,
            color: fields.opt_string("color")?,
            fill: fields.opt_string("fill")?,
            stroke: fields.opt_string("stroke")?,
            scale: fields.opt_f64("scale")?,
            opacity: fields.opt_f64("opacity")?,
        })
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Entry of a class's `node_list`: an index into the chart node table or an inline node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeRef {
    Index(usize),
    Inline(ChartNode),
}

impl NodeRef {
    /// Parses one `node_list` entry; `null` means no node for that page range.
    pub(crate) fn parse_slot(value: &Value) -> Result<Option<Self>, ChartError> {
        if value.is_null() {
            return Ok(None);
        }
        if value.is_object() {
            return Ok(Some(Self::Inline(ChartNode::from_json(value)?)));
        }
        as_integer(value)
            .and_then(|n| usize::try_from(n).ok())
            .map(|n| Some(Self::Index(n)))
            .ok_or_else(|| ChartError::InvalidField {
                entity: "class",
                field: "node_list",
                expected: "a node index, a node object, or null",
                value: value.to_string(),
            })
    }

    pub(crate) fn slot_to_json(slot: &Option<Self>) -> Value {
        match slot {
            None => Value::Null,
            Some(Self::Index(idx)) => Value::from(*idx),
            Some(Self::Inline(node)) => node.to_json(),
        }
    }
}
