#![forbid(unsafe_code)]

mod draw;
mod snapshot;

pub use draw::{DrawList, DrawnClass, DrawnEdge};

use crate::class::{Bidegree, ChartClass, ClassFields};
use crate::edge::{ChartEdge, EdgeFields, EdgeKind, edge_type_name};
use crate::events::{ChartEvent, EventBus};
use crate::fields::as_integer;
use crate::node::ChartNode;
use crate::page::PageEntry;
use crate::stringifying_map::StringifyingMap;
use crate::{ChartError, Uuid};
use serde_json::Value;
use std::collections::BTreeMap;

/// Client-side replica of a spectral sequence chart.
///
/// Classes and edges share one uuid space. `classes_by_degree` is a derived index
/// kept in step with `classes` on every insertion; invalidated classes are dropped
/// from it lazily, the next time a class lands in the same bidegree.
#[derive(Debug)]
pub struct SpectralSequenceChart {
    classes: BTreeMap<Uuid, ChartClass>,
    edges: BTreeMap<Uuid, ChartEdge>,
    nodes: Vec<ChartNode>,
    classes_by_degree: StringifyingMap<Bidegree, Vec<Uuid>>,
    next_uuid: Uuid,

    x_range: (f64, f64),
    y_range: (f64, f64),
    initial_x_range: (f64, f64),
    initial_y_range: (f64, f64),
    page_list: Vec<PageEntry>,
    min_page_idx: usize,

    offset_size: f64,
    min_class_size: f64,
    max_class_size: f64,
    class_scale: f64,

    events: EventBus,
}

impl Default for SpectralSequenceChart {
    fn default() -> Self {
        Self {
            classes: BTreeMap::new(),
            edges: BTreeMap::new(),
            nodes: Vec::new(),
            classes_by_degree: StringifyingMap::new(),
            next_uuid: 0,
            x_range: (0.0, 10.0),
            y_range: (0.0, 10.0),
            initial_x_range: (0.0, 10.0),
            initial_y_range: (0.0, 10.0),
            page_list: vec![PageEntry::Page(2)],
            min_page_idx: 0,
            offset_size: 8.0,
            min_class_size: 1.0,
            max_class_size: 3.0,
            class_scale: 10.0,
            events: EventBus::default(),
        }
    }
}

impl SpectralSequenceChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn classes(&self) -> &BTreeMap<Uuid, ChartClass> {
        &self.classes
    }

    pub fn edges(&self) -> &BTreeMap<Uuid, ChartEdge> {
        &self.edges
    }

    pub fn nodes(&self) -> &[ChartNode] {
        &self.nodes
    }

    pub fn class(&self, uuid: Uuid) -> Option<&ChartClass> {
        self.classes.get(&uuid)
    }

    pub fn edge(&self, uuid: Uuid) -> Option<&ChartEdge> {
        self.edges.get(&uuid)
    }

    pub fn next_uuid(&self) -> Uuid {
        self.next_uuid
    }

    pub fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    pub fn y_range(&self) -> (f64, f64) {
        self.y_range
    }

    pub fn initial_x_range(&self) -> (f64, f64) {
        self.initial_x_range
    }

    pub fn initial_y_range(&self) -> (f64, f64) {
        self.initial_y_range
    }

    pub fn page_list(&self) -> &[PageEntry] {
        &self.page_list
    }

    pub fn min_page_idx(&self) -> usize {
        self.min_page_idx
    }

    /// Uuids stored for a bidegree, in idx order. Includes not-yet-compacted invalid classes.
    pub fn classes_in_degree(&self, x: i64, y: i64) -> &[Uuid] {
        self.classes_by_degree
            .get(&Bidegree::new(x, y))
            .map_or(&[], Vec::as_slice)
    }

    fn check_uuid_free(&self, uuid: Uuid) -> Result<(), ChartError> {
        if self.classes.contains_key(&uuid) || self.edges.contains_key(&uuid) {
            return Err(ChartError::DuplicateUuid(uuid));
        }
        Ok(())
    }

    /// Hands out `requested` or the next free uuid, keeping `next_uuid` above every
    /// uuid in use. Callers validate everything first.
    fn claim_uuid(&mut self, requested: Option<Uuid>) -> Uuid {
        match requested {
            Some(uuid) => {
                if uuid >= self.next_uuid {
                    self.next_uuid = uuid.saturating_add(1);
                }
                uuid
            }
            None => {
                let uuid = self.next_uuid;
                self.next_uuid += 1;
                uuid
            }
        }
    }

    pub fn add_class(&mut self, fields: &Value) -> Result<Uuid, ChartError> {
        let parsed = ClassFields::parse(fields)?;
        let degree = parsed.require_degree()?;
        if let Some(uuid) = parsed.uuid {
            self.check_uuid_free(uuid)?;
        }

        let uuid = self.claim_uuid(parsed.uuid);
        let listed = self.classes_in_degree(degree.x, degree.y).len();
        let classes = &self.classes;
        self.classes_by_degree
            .filter_dictionary_of_lists(degree, |existing| {
                classes.get(existing).is_some_and(|c| !c.invalid)
            });
        if self.classes_in_degree(degree.x, degree.y).len() != listed {
            self.renumber_degree(degree);
        }
        let idx = match parsed.idx {
            Some(idx) => idx,
            None => self.classes_in_degree(degree.x, degree.y).len(),
        };
        self.classes
            .insert(uuid, parsed.into_class(uuid, degree, idx));
        self.classes_by_degree
            .add_to_dictionary_of_lists(degree, uuid);

        self.events.emit(ChartEvent::ClassAdded(uuid));
        self.events.emit(ChartEvent::Update);
        Ok(uuid)
    }

    pub fn add_edge(&mut self, fields: &Value) -> Result<Uuid, ChartError> {
        let type_name = edge_type_name(fields.get("type"))?;
        match type_name {
            EdgeKind::DIFFERENTIAL => self.add_differential(fields),
            EdgeKind::STRUCTLINE => self.add_structline(fields),
            _ => self.add_extension(fields),
        }
    }

    pub fn add_differential(&mut self, fields: &Value) -> Result<Uuid, ChartError> {
        self.insert_edge(EdgeKind::DIFFERENTIAL, fields, ChartEvent::DifferentialAdded)
    }

    pub fn add_structline(&mut self, fields: &Value) -> Result<Uuid, ChartError> {
        self.insert_edge(EdgeKind::STRUCTLINE, fields, ChartEvent::StructlineAdded)
    }

    pub fn add_extension(&mut self, fields: &Value) -> Result<Uuid, ChartError> {
        self.insert_edge(EdgeKind::EXTENSION, fields, ChartEvent::ExtensionAdded)
    }

    fn insert_edge(
        &mut self,
        type_name: &'static str,
        fields: &Value,
        added: fn(Uuid) -> ChartEvent,
    ) -> Result<Uuid, ChartError> {
        let parsed = EdgeFields::parse(type_name, fields)?;
        let requested = parsed.uuid;
        if let Some(uuid) = requested {
            self.check_uuid_free(uuid)?;
        }
        // Placeholder uuid: a missing field must fail before the counter moves.
        let mut edge = parsed.into_edge(0)?;
        let uuid = self.claim_uuid(requested);
        edge.uuid = uuid;
        self.edges.insert(uuid, edge);

        self.events.emit(added(uuid));
        self.events.emit(ChartEvent::EdgeAdded(uuid));
        self.events.emit(ChartEvent::Update);
        Ok(uuid)
    }

    pub fn add_node(&mut self, fields: &Value) -> Result<usize, ChartError> {
        let node = ChartNode::from_json(fields)?;
        self.nodes.push(node);
        let idx = self.nodes.len() - 1;
        self.events.emit(ChartEvent::NodeAdded(idx));
        self.events.emit(ChartEvent::Update);
        Ok(idx)
    }

    pub fn class_by_degree_and_index(
        &self,
        x: i64,
        y: i64,
        idx: usize,
    ) -> Result<&ChartClass, ChartError> {
        let Some(list) = self.classes_by_degree.get(&Bidegree::new(x, y)) else {
            return Err(ChartError::NoClassesInDegree { x, y });
        };
        let Some(uuid) = list.get(idx) else {
            return Err(ChartError::ClassIndexOutOfBounds {
                x,
                y,
                idx: idx as i64,
                len: list.len(),
            });
        };
        self.classes.get(uuid).ok_or(ChartError::UnknownClass(*uuid))
    }

    /// Same lookup for untyped wire arguments; each one must be an integer.
    pub fn class_by_degree_and_index_json(
        &self,
        x: &Value,
        y: &Value,
        idx: &Value,
    ) -> Result<&ChartClass, ChartError> {
        let x = check_argument_is_integer("x", x)?;
        let y = check_argument_is_integer("y", y)?;
        let idx = check_argument_is_integer("idx", idx)?;
        let Ok(idx) = usize::try_from(idx) else {
            let len = self.classes_in_degree(x, y).len();
            if len == 0 {
                return Err(ChartError::NoClassesInDegree { x, y });
            }
            return Err(ChartError::ClassIndexOutOfBounds { x, y, idx, len });
        };
        self.class_by_degree_and_index(x, y, idx)
    }

    pub fn set_class_name(
        &mut self,
        x: i64,
        y: i64,
        idx: usize,
        name: Option<String>,
    ) -> Result<Uuid, ChartError> {
        let uuid = self.class_by_degree_and_index(x, y, idx)?.uuid;
        self.set_class_name_by_uuid(uuid, name)
    }

    /// Renames a class already resolved to its uuid.
    pub fn set_class_name_by_uuid(
        &mut self,
        uuid: Uuid,
        name: Option<String>,
    ) -> Result<Uuid, ChartError> {
        let Some(class) = self.classes.get_mut(&uuid) else {
            return Err(ChartError::UnknownClass(uuid));
        };
        class.name = name;
        self.events.emit(ChartEvent::ClassUpdated(uuid));
        self.events.emit(ChartEvent::Update);
        Ok(uuid)
    }

    /// Gives the classes listed at `degree` the idx of their list position.
    fn renumber_degree(&mut self, degree: Bidegree) {
        let listed = self.classes_in_degree(degree.x, degree.y).to_vec();
        for (position, uuid) in listed.into_iter().enumerate() {
            if let Some(class) = self.classes.get_mut(&uuid) {
                class.idx = position;
            }
        }
    }

    /// Partial update of an existing class located by `uuid`.
    pub fn update_class(&mut self, fields: &Value) -> Result<Uuid, ChartError> {
        let parsed = ClassFields::parse(fields)?;
        let uuid = parsed.uuid.ok_or(ChartError::MissingField {
            entity: "class",
            field: "uuid",
        })?;
        let Some(class) = self.classes.get_mut(&uuid) else {
            return Err(ChartError::UnknownClass(uuid));
        };
        parsed.check_update_of(class)?;
        parsed.apply_to(class);
        self.events.emit(ChartEvent::ClassUpdated(uuid));
        self.events.emit(ChartEvent::Update);
        Ok(uuid)
    }

    /// Partial update of an existing edge located by `uuid`. The edge kind cannot change.
    pub fn update_edge(&mut self, fields: &Value) -> Result<Uuid, ChartError> {
        let uuid = fields
            .get("uuid")
            .and_then(as_integer)
            .and_then(|n| Uuid::try_from(n).ok())
            .ok_or(ChartError::MissingField {
                entity: "edge",
                field: "uuid",
            })?;
        let Some(edge) = self.edges.get_mut(&uuid) else {
            return Err(ChartError::UnknownEdge(uuid));
        };
        let parsed = EdgeFields::parse(edge.type_name(), fields)?;
        parsed.apply_to(edge);
        self.events.emit(ChartEvent::EdgeUpdated(uuid));
        self.events.emit(ChartEvent::Update);
        Ok(uuid)
    }

    pub fn insert_page_range(&mut self, idx: usize, entry: PageEntry) -> Result<(), ChartError> {
        if idx > self.page_list.len() {
            return Err(ChartError::PageIndexOutOfRange {
                idx,
                len: self.page_list.len(),
            });
        }
        self.page_list.insert(idx, entry);
        self.events.emit(ChartEvent::Update);
        Ok(())
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) {
        self.x_range = (min, max);
        self.events.emit(ChartEvent::Update);
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) {
        self.y_range = (min, max);
        self.events.emit(ChartEvent::Update);
    }

    pub fn set_initial_x_range(&mut self, min: f64, max: f64) {
        self.initial_x_range = (min, max);
        self.events.emit(ChartEvent::Update);
    }

    pub fn set_initial_y_range(&mut self, min: f64, max: f64) {
        self.initial_y_range = (min, max);
        self.events.emit(ChartEvent::Update);
    }
}

fn check_argument_is_integer(name: &'static str, value: &Value) -> Result<i64, ChartError> {
    as_integer(value).ok_or_else(|| ChartError::NotAnInteger {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests;
