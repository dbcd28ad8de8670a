#![forbid(unsafe_code)]

use super::SpectralSequenceChart;
use crate::class::ChartClass;
use crate::edge::ChartEdge;
use crate::node::{ChartNode, NodeRef};
use crate::page::PageQuery;
use crate::{ChartError, Uuid};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
pub struct DrawnClass<'a> {
    pub class: &'a ChartClass,
    pub node: &'a ChartNode,
    /// False when the class sits outside the viewport and is only drawn as an edge endpoint.
    pub in_range: bool,
}

#[derive(Clone, Debug)]
pub struct DrawnEdge<'a> {
    pub edge: &'a ChartEdge,
    pub source: &'a ChartClass,
    pub target: &'a ChartClass,
}

/// Everything a renderer needs for one redraw. Recomputed on every query.
#[derive(Clone, Debug, Default)]
pub struct DrawList<'a> {
    pub classes: Vec<DrawnClass<'a>>,
    pub edges: Vec<DrawnEdge<'a>>,
}

impl SpectralSequenceChart {
    /// Node to draw for `class` on `page`.
    pub fn class_node<'a>(
        &'a self,
        class: &'a ChartClass,
        page: i64,
    ) -> Result<&'a ChartNode, ChartError> {
        match class.node_list.get(class.page_index(page)) {
            Some(Some(NodeRef::Inline(node))) => Ok(node),
            Some(Some(NodeRef::Index(index))) => {
                self.nodes
                    .get(*index)
                    .ok_or(ChartError::UnknownNodeIndex {
                        class: class.uuid,
                        page,
                        index: *index,
                    })
            }
            Some(None) | None => Err(ChartError::MissingNode {
                class: class.uuid,
                page,
            }),
        }
    }

    fn resolve_endpoint(
        &self,
        edge: &ChartEdge,
        endpoint: &'static str,
        uuid: Uuid,
    ) -> Result<&ChartClass, ChartError> {
        self.classes
            .get(&uuid)
            .ok_or(ChartError::DanglingEndpoint {
                edge: edge.uuid,
                endpoint,
                class: uuid,
            })
    }

    /// Classes and edges to draw for a page (or page range) inside a viewport.
    ///
    /// Edges with one endpoint inside the viewport pull the other endpoint into the
    /// class list even when it lies outside, exactly once per query.
    pub fn elements_to_draw(
        &self,
        query: impl Into<PageQuery>,
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    ) -> Result<DrawList<'_>, ChartError> {
        let query = query.into();
        let page = query.page();
        let range = query.range();

        let mut selected: Vec<(&ChartClass, bool)> = self
            .classes
            .values()
            .filter(|c| !c.invalid && c.in_range(xmin, xmax, ymin, ymax) && c.draw_on_page(page))
            .map(|c| (c, true))
            .collect();
        let mut drawn: BTreeSet<Uuid> = selected.iter().map(|(c, _)| c.uuid).collect();

        let mut edges = Vec::new();
        for edge in self.edges.values() {
            if edge.invalid || !edge.draw_on_page(range) {
                continue;
            }
            let source = self.resolve_endpoint(edge, "source", edge.source)?;
            let target = self.resolve_endpoint(edge, "target", edge.target)?;
            if !source.draw_on_page(page) || !target.draw_on_page(page) {
                continue;
            }
            if !source.in_range(xmin, xmax, ymin, ymax) && !target.in_range(xmin, xmax, ymin, ymax)
            {
                continue;
            }
            edges.push(DrawnEdge {
                edge,
                source,
                target,
            });
        }

        for drawn_edge in &edges {
            for endpoint in [drawn_edge.source, drawn_edge.target] {
                if drawn.insert(endpoint.uuid) {
                    selected.push((endpoint, false));
                }
            }
        }

        let mut classes = Vec::with_capacity(selected.len());
        for (class, in_range) in selected {
            classes.push(DrawnClass {
                class,
                node: self.class_node(class, page)?,
                in_range,
            });
        }
        Ok(DrawList { classes, edges })
    }
}
