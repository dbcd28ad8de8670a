#![forbid(unsafe_code)]

use crate::Uuid;

/// Broad classification used when an error crosses the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartErrorKind {
    Validation,
    Reference,
}

impl ChartErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Reference => "ReferenceError",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartError {
    NotAnObject {
        entity: &'static str,
    },
    UnknownField {
        entity: &'static str,
        field: String,
    },
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    InvalidField {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    ImmutableField {
        entity: &'static str,
        field: &'static str,
    },
    NotAnInteger {
        name: &'static str,
        value: String,
    },
    UnknownEdgeType(String),
    DuplicateUuid(Uuid),
    PageIndexOutOfRange {
        idx: usize,
        len: usize,
    },
    MissingSnapshotField(&'static str),
    NoClassesInDegree {
        x: i64,
        y: i64,
    },
    ClassIndexOutOfBounds {
        x: i64,
        y: i64,
        idx: i64,
        len: usize,
    },
    UnknownClass(Uuid),
    UnknownEdge(Uuid),
    MissingNode {
        class: Uuid,
        page: i64,
    },
    UnknownNodeIndex {
        class: Uuid,
        page: i64,
        index: usize,
    },
    DanglingEndpoint {
        edge: Uuid,
        endpoint: &'static str,
        class: Uuid,
    },
}

impl ChartError {
    pub fn kind(&self) -> ChartErrorKind {
        match self {
            Self::NotAnObject { .. }
            | Self::UnknownField { .. }
            | Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::ImmutableField { .. }
            | Self::NotAnInteger { .. }
            | Self::UnknownEdgeType(_)
            | Self::DuplicateUuid(_)
            | Self::PageIndexOutOfRange { .. } => ChartErrorKind::Validation,
            Self::MissingSnapshotField(_)
            | Self::NoClassesInDegree { .. }
            | Self::ClassIndexOutOfBounds { .. }
            | Self::UnknownClass(_)
            | Self::UnknownEdge(_)
            | Self::MissingNode { .. }
            | Self::UnknownNodeIndex { .. }
            | Self::DanglingEndpoint { .. } => ChartErrorKind::Reference,
        }
    }
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject { entity } => write!(f, "{entity} must be a JSON object"),
            Self::UnknownField { entity, field } => {
                write!(f, "{entity} does not accept field \"{field}\"")
            }
            Self::MissingField { entity, field } => {
                write!(f, "{entity} is missing argument \"{field}\"")
            }
            Self::InvalidField {
                entity,
                field,
                expected,
                value,
            } => write!(
                f,
                "{entity} field \"{field}\" is {value} which is not {expected}"
            ),
            Self::ImmutableField { entity, field } => {
                write!(f, "{entity} field \"{field}\" cannot be changed by an update")
            }
            Self::NotAnInteger { name, value } => write!(
                f,
                "Argument \"{name}\" is {value} which is not an integer. \"{name}\" is expected to be an integer."
            ),
            Self::UnknownEdgeType(value) => write!(
                f,
                "Argument \"type\" expected to contain one of \"differential\", \"structline\", or \"extension\", not {value}."
            ),
            Self::DuplicateUuid(uuid) => write!(f, "uuid {uuid} is already in use"),
            Self::PageIndexOutOfRange { idx, len } => write!(
                f,
                "page_list insertion index {idx} is out of range for a list of length {len}"
            ),
            Self::MissingSnapshotField(field) => write!(f, "json.{field} is undefined."),
            Self::NoClassesInDegree { x, y } => {
                write!(f, "No classes exist in bidegree ({x}, {y}).")
            }
            Self::ClassIndexOutOfBounds { x, y, idx, len } => write!(
                f,
                "Class index {idx} is out of bounds: only {len} classes exist in bidegree ({x}, {y})."
            ),
            Self::UnknownClass(uuid) => write!(f, "No class with uuid {uuid}."),
            Self::UnknownEdge(uuid) => write!(f, "No edge with uuid {uuid}."),
            Self::MissingNode { class, page } => {
                write!(f, "Undefined node on page {page} for class {class}.")
            }
            Self::UnknownNodeIndex { class, page, index } => write!(
                f,
                "Undefined node on page {page} for class {class}: node index {index} is not in the node table."
            ),
            Self::DanglingEndpoint {
                edge,
                endpoint,
                class,
            } => write!(
                f,
                "Edge {edge} has {endpoint} {class} which is not a class of this chart."
            ),
        }
    }
}

impl std::error::Error for ChartError {}
