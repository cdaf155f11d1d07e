use crate::Timestamp;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(Uuid);

impl MarkerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MarkerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Annotation anchor shown in the frame tracker gutter. Owned by the
/// annotation collaborator; this subsystem only reads positions to compute
/// pixel marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub id: MarkerId,
    pub shape: MarkerShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// A single instant, e.g. a key image.
    Point { at: Timestamp },
    /// An interval, e.g. a stopwatch or a tracked trajectory.
    Span { start: Timestamp, end: Timestamp },
}

impl Marker {
    pub fn point(at: Timestamp) -> Self {
        Self {
            id: MarkerId::new(),
            shape: MarkerShape::Point { at },
        }
    }

    pub fn span(start: Timestamp, end: Timestamp) -> Self {
        Self {
            id: MarkerId::new(),
            shape: MarkerShape::Span {
                start,
                end: end.max(start),
            },
        }
    }
}
