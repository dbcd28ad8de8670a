#![forbid(unsafe_code)]

use crate::fields::Fields;
use crate::page::INFINITY;
use crate::{ChartError, Uuid};
use serde_json::{Map, Value, json};

const COMMON_EDGE_FIELDS: &[&str] = &[
    "type",
    "uuid",
    "source",
    "target",
    "visible",
    "invalid",
    "color",
    "opacity",
    "bend",
    "control_points",
    "arrow_type",
];

/// Kind-specific edge data. Each kind keeps its own page-visibility rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Differential { page: i64 },
    Structline { min_page: i64, max_page: i64 },
    Extension,
}

impl EdgeKind {
    pub const DIFFERENTIAL: &'static str = "differential";
    pub const STRUCTLINE: &'static str = "structline";
    pub const EXTENSION: &'static str = "extension";

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Differential { .. } => Self::DIFFERENTIAL,
            Self::Structline { .. } => Self::STRUCTLINE,
            Self::Extension => Self::EXTENSION,
        }
    }

    /// Page-range membership. Page `0` as the range start means "all pages" for
    /// differentials only; structlines and extensions look at the first page alone.
    pub fn draw_on_page(self, (first, last): (i64, i64)) -> bool {
        match self {
            Self::Differential { page } => first == 0 || (first <= page && page <= last),
            Self::Structline { min_page, max_page } => first <= max_page && min_page <= first,
            Self::Extension => first == INFINITY,
        }
    }

    fn extra_fields(type_name: &str) -> &'static [&'static str] {
        match type_name {
            Self::DIFFERENTIAL => &["page"],
            Self::STRUCTLINE => &["min_page", "max_page"],
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartEdge {
    pub uuid: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    pub kind: EdgeKind,
    pub visible: bool,
    pub invalid: bool,
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub bend: Option<f64>,
    pub control_points: Option<Vec<Value>>,
    pub arrow_type: Option<String>,
}

impl ChartEdge {
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn draw_on_page(&self, range: (i64, i64)) -> bool {
        self.kind.draw_on_page(range)
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), json!(self.type_name()));
        out.insert("uuid".to_string(), json!(self.uuid));
        out.insert("source".to_string(), json!(self.source));
        out.insert("target".to_string(), json!(self.target));
        out.insert("visible".to_string(), json!(self.visible));
        out.insert("invalid".to_string(), json!(self.invalid));
        match self.kind {
            EdgeKind::Differential { page } => {
                out.insert("page".to_string(), json!(page));
            }
            EdgeKind::Structline { min_page, max_page } => {
                out.insert("min_page".to_string(), json!(min_page));
                out.insert("max_page".to_string(), json!(max_page));
            }
            EdgeKind::Extension => {}
        }
        if let Some(color) = &self.color {
            out.insert("color".to_string(), json!(color));
        }
        if let Some(opacity) = self.opacity {
            out.insert("opacity".to_string(), json!(opacity));
        }
        if let Some(bend) = self.bend {
            out.insert("bend".to_string(), json!(bend));
        }
        if let Some(points) = &self.control_points {
            out.insert("control_points".to_string(), Value::Array(points.clone()));
        }
        if let Some(arrow_type) = &self.arrow_type {
            out.insert("arrow_type".to_string(), json!(arrow_type));
        }
        Value::Object(out)
    }
}

fn allowed_fields(type_name: &str) -> Vec<&'static str> {
    let mut allowed = COMMON_EDGE_FIELDS.to_vec();
    allowed.extend_from_slice(EdgeKind::extra_fields(type_name));
    allowed
}

/// Parsed and validated edge fields, not yet attached to a chart.
#[derive(Clone, Debug)]
pub(crate) struct EdgeFields {
    pub(crate) type_name: &'static str,
    pub(crate) uuid: Option<Uuid>,
    pub(crate) source: Option<Uuid>,
    pub(crate) target: Option<Uuid>,
    pub(crate) page: Option<i64>,
    pub(crate) min_page: Option<i64>,
    pub(crate) max_page: Option<i64>,
    pub(crate) visible: Option<bool>,
    pub(crate) invalid: Option<bool>,
    pub(crate) color: Option<String>,
    pub(crate) opacity: Option<f64>,
    pub(crate) bend: Option<f64>,
    pub(crate) control_points: Option<Vec<Value>>,
    pub(crate) arrow_type: Option<String>,
}

impl EdgeFields {
    /// Parses fields for an edge of the given kind. `type`, when present, must agree.
    pub(crate) fn parse(type_name: &'static str, value: &Value) -> Result<Self, ChartError> {
        let allowed = allowed_fields(type_name);
        let fields = Fields::new("edge", value, &allowed)?;
        if let Some(tag) = fields.get("type")
            && tag.as_str() != Some(type_name)
        {
            return Err(ChartError::InvalidField {
                entity: "edge",
                field: "type",
                expected: "the edge's own type",
                value: tag.to_string(),
            });
        }
        Ok(Self {
            type_name,
            uuid: fields.opt_u64("uuid")?,
            source: fields.opt_u64("source")?,
            target: fields.opt_u64("target")?,
            page: fields.opt_i64("page")?,
            min_page: fields.opt_i64("min_page")?,
            max_page: fields.opt_i64("max_page")?,
            visible: fields.opt_bool("visible")?,
            invalid: fields.opt_bool("invalid")?,
            color: fields.opt_string("color")?,
            opacity: fields.opt_f64("opacity")?,
            bend: fields.opt_f64("bend")?,
            control_points: fields.opt_array("control_points")?.cloned(),
            arrow_type: fields.opt_string("arrow_type")?,
        })
    }

    pub(crate) fn into_edge(self, uuid: Uuid) -> Result<ChartEdge, ChartError> {
        let missing = |field: &'static str| ChartError::MissingField {
            entity: "edge",
            field,
        };
        let source = self.source.ok_or_else(|| missing("source"))?;
        let target = self.target.ok_or_else(|| missing("target"))?;
        let kind = match self.type_name {
            EdgeKind::DIFFERENTIAL => EdgeKind::Differential {
                page: self.page.ok_or_else(|| missing("page"))?,
            },
            EdgeKind::STRUCTLINE => EdgeKind::Structline {
                min_page: self.min_page.unwrap_or(0),
                max_page: self.max_page.unwrap_or(INFINITY),
            },
            _ => EdgeKind::Extension,
        };
        Ok(ChartEdge {
            uuid,
            source,
            target,
            kind,
            visible: self.visible.unwrap_or(true),
            invalid: self.invalid.unwrap_or(false),
            color: self.color,
            opacity: self.opacity,
            bend: self.bend,
            control_points: self.control_points,
            arrow_type: self.arrow_type,
        })
    }

    pub(crate) fn apply_to(self, edge: &mut ChartEdge) {
        if let Some(source) = self.source {
            edge.source = source;
        }
        if let Some(target) = self.target {
            edge.target = target;
        }
        match &mut edge.kind {
            EdgeKind::Differential { page } => {
                if let Some(new_page) = self.page {
                    *page = new_page;
                }
            }
            EdgeKind::Structline { min_page, max_page } => {
                if let Some(v) = self.min_page {
                    *min_page = v;
                }
                if let Some(v) = self.max_page {
                    *max_page = v;
                }
            }
            EdgeKind::Extension => {}
        }
        if let Some(visible) = self.visible {
            edge.visible = visible;
        }
        if let Some(invalid) = self.invalid {
            edge.invalid = invalid;
        }
        if self.color.is_some() {
            edge.color = self.color;
        }
        if self.opacity.is_some() {
            edge.opacity = self.opacity;
        }
        if self.bend.is_some() {
            edge.bend = self.bend;
        }
        if self.control_points.is_some() {
            edge.control_points = self.control_points;
        }
        if self.arrow_type.is_some() {
            edge.arrow_type = self.arrow_type;
        }
    }
}

/// Maps a wire `type` tag to the static kind name, if it is one of the three kinds.
pub(crate) fn edge_type_name(value: Option<&Value>) -> Result<&'static str, ChartError> {
    match value.and_then(Value::as_str) {
        Some(EdgeKind::DIFFERENTIAL) => Ok(EdgeKind::DIFFERENTIAL),
        Some(EdgeKind::STRUCTLINE) => Ok(EdgeKind::STRUCTLINE),
        Some(EdgeKind::EXTENSION) => Ok(EdgeKind::EXTENSION),
        _ => Err(ChartError::UnknownEdgeType(
            value.map_or_else(|| "undefined".to_string(), Value::to_string),
        )),
    }
}
