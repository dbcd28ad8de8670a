#![forbid(unsafe_code)]

use crate::fields::Fields;
use crate::node::NodeRef;
use crate::page::INFINITY;
use crate::stringifying_map::CanonicalKey;
use crate::{ChartError, Uuid};
use serde_json::{Map, Value, json};

const CLASS_FIELDS: &[&str] = &[
    "type",
    "uuid",
    "x",
    "y",
    "idx",
    "name",
    "node_list",
    "transition_pages",
    "max_page",
    "visible",
    "invalid",
];

const CLASS_TYPE_TAG: &str = "ChartClass";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bidegree {
    pub x: i64,
    pub y: i64,
}

impl Bidegree {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl CanonicalKey for Bidegree {
    fn canonical_key(&self) -> String {
        (self.x, self.y).canonical_key()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartClass {
    pub uuid: Uuid,
    pub x: i64,
    pub y: i64,
    pub idx: usize,
    pub name: Option<String>,
    pub node_list: Vec<Option<NodeRef>>,
    /// Pages on which the class's node changes, ascending.
    pub transition_pages: Vec<i64>,
    pub max_page: i64,
    pub visible: bool,
    pub invalid: bool,
}

impl ChartClass {
    pub fn degree(&self) -> Bidegree {
        Bidegree::new(self.x, self.y)
    }

    /// Index into `node_list` for `page`: the number of transition pages strictly below it.
    pub fn page_index(&self, page: i64) -> usize {
        if page >= INFINITY {
            return self.transition_pages.len();
        }
        self.transition_pages.iter().filter(|t| **t < page).count()
    }

    pub fn draw_on_page(&self, page: i64) -> bool {
        !self.invalid && page <= self.max_page
    }

    pub fn in_range(&self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> bool {
        let (x, y) = (self.x as f64, self.y as f64);
        xmin <= x && x <= xmax && ymin <= y && y <= ymax
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), json!(CLASS_TYPE_TAG));
        out.insert("uuid".to_string(), json!(self.uuid));
        out.insert("x".to_string(), json!(self.x));
        out.insert("y".to_string(), json!(self.y));
        out.insert("idx".to_string(), json!(self.idx));
        if let Some(name) = &self.name {
            out.insert("name".to_string(), json!(name));
        }
        out.insert(
            "node_list".to_string(),
            Value::Array(self.node_list.iter().map(NodeRef::slot_to_json).collect()),
        );
        out.insert("transition_pages".to_string(), json!(self.transition_pages));
        out.insert("max_page".to_string(), json!(self.max_page));
        out.insert("visible".to_string(), json!(self.visible));
        out.insert("invalid".to_string(), json!(self.invalid));
        Value::Object(out)
    }
}

/// Parsed and validated class fields, not yet attached to a chart.
#[derive(Clone, Debug)]
pub(crate) struct ClassFields {
    pub(crate) uuid: Option<Uuid>,
    pub(crate) x: Option<i64>,
    pub(crate) y: Option<i64>,
    pub(crate) idx: Option<usize>,
    pub(crate) name: Option<String>,
    pub(crate) node_list: Option<Vec<Option<NodeRef>>>,
    pub(crate) transition_pages: Option<Vec<i64>>,
    pub(crate) max_page: Option<i64>,
    pub(crate) visible: Option<bool>,
    pub(crate) invalid: Option<bool>,
    pub(crate) clear_name: bool,
}

impl ClassFields {
    pub(crate) fn parse(value: &Value) -> Result<Self, ChartError> {
        let fields = Fields::new("class", value, CLASS_FIELDS)?;
        if let Some(tag) = fields.get("type")
            && tag.as_str() != Some(CLASS_TYPE_TAG)
        {
            return Err(ChartError::InvalidField {
                entity: "class",
                field: "type",
                expected: "\"ChartClass\"",
                value: tag.to_string(),
            });
        }
        let node_list = match fields.opt_array("node_list")? {
            None => None,
            Some(items) => Some(
                items
                    .iter()
                    .map(NodeRef::parse_slot)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        let transition_pages = fields.opt_i64_list("transition_pages")?.map(|mut pages| {
            pages.sort_unstable();
            pages
        });
        let idx = match fields.opt_u64("idx")? {
            None => None,
            Some(idx) => Some(usize::try_from(idx).map_err(|_| ChartError::InvalidField {
                entity: "class",
                field: "idx",
                expected: "an index",
                value: idx.to_string(),
            })?),
        };
        let clear_name = value
            .as_object()
            .is_some_and(|obj| obj.get("name").is_some_and(Value::is_null));
        Ok(Self {
            uuid: fields.opt_u64("uuid")?,
            x: fields.opt_i64("x")?,
            y: fields.opt_i64("y")?,
            idx,
            name: fields.opt_string("name")?,
            node_list,
            transition_pages,
            max_page: fields.opt_i64("max_page")?,
            visible: fields.opt_bool("visible")?,
            invalid: fields.opt_bool("invalid")?,
            clear_name,
        })
    }

    /// Checks the fields a brand new class needs and returns its bidegree.
    pub(crate) fn require_degree(&self) -> Result<Bidegree, ChartError> {
        let x = self.x.ok_or(ChartError::MissingField {
            entity: "class",
            field: "x",
        })?;
        let y = self.y.ok_or(ChartError::MissingField {
            entity: "class",
            field: "y",
        })?;
        Ok(Bidegree::new(x, y))
    }

    pub(crate) fn into_class(self, uuid: Uuid, degree: Bidegree, idx: usize) -> ChartClass {
        ChartClass {
            uuid,
            x: degree.x,
            y: degree.y,
            idx,
            name: self.name,
            node_list: self.node_list.unwrap_or_default(),
            transition_pages: self.transition_pages.unwrap_or_default(),
            max_page: self.max_page.unwrap_or(INFINITY),
            visible: self.visible.unwrap_or(true),
            invalid: self.invalid.unwrap_or(false),
        }
    }

    /// Rejects changes to identity and placement fields of an existing class.
    pub(crate) fn check_update_of(&self, class: &ChartClass) -> Result<(), ChartError> {
        let immutable = |field: &'static str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(ChartError::ImmutableField {
                    entity: "class",
                    field,
                })
            }
        };
        immutable("x", self.x.is_none_or(|x| x == class.x))?;
        immutable("y", self.y.is_none_or(|y| y == class.y))?;
        immutable("idx", self.idx.is_none_or(|idx| idx == class.idx))
    }

    pub(crate) fn apply_to(self, class: &mut ChartClass) {
        if self.clear_name {
            class.name = None;
        } else if let Some(name) = self.name {
            class.name = Some(name);
        }
        if let Some(node_list) = self.node_list {
            class.node_list = node_list;
        }
        if let Some(pages) = self.transition_pages {
            class.transition_pages = pages;
        }
        if let Some(max_page) = self.max_page {
            class.max_page = max_page;
        }
        if let Some(visible) = self.visible {
            class.visible = visible;
        }
        if let Some(invalid) = self.invalid {
            class.invalid = invalid;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn class(transition_pages: Vec<i64>) -> ChartClass {
        ClassFields::parse(&json!({ "x": 0, "y": 0, "transition_pages": transition_pages }))
            .unwrap()
            .into_class(0, Bidegree::new(0, 0), 0)
    }

    #[test]
    fn page_index_counts_earlier_transitions() {
        let c = class(vec![5, 3]);
        assert_eq!(c.transition_pages, vec![3, 5]);
        assert_eq!(c.page_index(2), 0);
        assert_eq!(c.page_index(3), 0);
        assert_eq!(c.page_index(4), 1);
        assert_eq!(c.page_index(6), 2);
        assert_eq!(c.page_index(INFINITY), 2);
    }

    #[test]
    fn draw_on_page_respects_max_page_and_invalid() {
        let mut c = class(vec![]);
        c.max_page = 4;
        assert!(c.draw_on_page(4));
        assert!(!c.draw_on_page(5));
        c.invalid = true;
        assert!(!c.draw_on_page(2));
    }

    #[test]
    fn viewport_bounds_are_inclusive() {
        let c = ClassFields::parse(&json!({ "x": 2, "y": 3 }))
            .unwrap()
            .into_class(0, Bidegree::new(2, 3), 0);
        assert!(c.in_range(2.0, 2.0, 3.0, 3.0));
        assert!(!c.in_range(2.5, 4.0, 0.0, 10.0));
    }

    #[test]
    fn foreign_type_tag_is_rejected() {
        let err = ClassFields::parse(&json!({ "type": "ChartEdge", "x": 0, "y": 0 })).unwrap_err();
        assert!(matches!(err, ChartError::InvalidField { field: "type", .. }));
    }
}
