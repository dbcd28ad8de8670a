#![forbid(unsafe_code)]

//! Client-side replica of a spectral sequence chart: classes placed at bidegrees,
//! typed edges between them, and the page-aware draw query a renderer consumes.

mod chart;
mod class;
mod edge;
mod error;
mod events;
mod fields;
mod node;
mod page;
mod stringifying_map;

/// Identity shared by classes and edges within one chart.
pub type Uuid = u64;

pub use chart::{DrawList, DrawnClass, DrawnEdge, SpectralSequenceChart};
pub use class::{Bidegree, ChartClass};
pub use edge::{ChartEdge, EdgeKind};
pub use error::{ChartError, ChartErrorKind};
pub use events::{ChartEvent, EventBus, Listener};
pub use node::{ChartNode, NodeRef};
pub use page::{INFINITY, PageEntry, PageQuery};
pub use stringifying_map::{CanonicalKey, StringifyingMap};
