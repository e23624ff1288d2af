//! Shape of each body segment, derived from where its neighbors sit.
//!
//! Renderers use this to pick a glyph or sprite without looking at the
//! snake's velocity. `prev` is the neighbor toward the head, `next` the one
//! toward the tail.

use crate::grid::{Direction, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentShape {
    /// Head, facing away from the body.
    Head(Direction),
    /// Tail, pointing at the segment it follows.
    Tail(Direction),
    /// Body segment on a straight run, with the direction of travel.
    Straight(Direction),
    /// Body segment on a corner, joining the side toward the head with the
    /// side toward the tail.
    Bend {
        toward_head: Direction,
        toward_tail: Direction,
    },
    /// A lone segment with no neighbors.
    Single,
    /// Neighbors stacked on the same cell or not adjacent.
    Unclassified,
}

pub fn classify_segment(
    prev: Option<Position>,
    cur: Position,
    next: Option<Position>,
) -> SegmentShape {
    match (prev, next) {
        (None, None) => SegmentShape::Single,
        (None, Some(next)) => match cur.direction_to(next) {
            Some(body) => SegmentShape::Head(body.opposite()),
            None => SegmentShape::Unclassified,
        },
        (Some(prev), None) => match cur.direction_to(prev) {
            Some(toward_head) => SegmentShape::Tail(toward_head),
            None => SegmentShape::Unclassified,
        },
        (Some(prev), Some(next)) => {
            match (cur.direction_to(prev), cur.direction_to(next)) {
                (Some(toward_head), Some(toward_tail)) if toward_head == toward_tail.opposite() => {
                    SegmentShape::Straight(toward_head)
                }
                (Some(toward_head), Some(toward_tail))
                    if toward_head.is_perpendicular(toward_tail) =>
                {
                    SegmentShape::Bend {
                        toward_head,
                        toward_tail,
                    }
                }
                _ => SegmentShape::Unclassified,
            }
        }
    }
}

/// Classifies every segment of a head-first body.
pub fn classify_body<'a, I>(segments: I) -> Vec<(Position, SegmentShape)>
where
    I: IntoIterator<Item = &'a Position>,
{
    let cells: Vec<Position> = segments.into_iter().copied().collect();
    cells
        .iter()
        .enumerate()
        .map(|(i, &cur)| {
            let prev = i.checked_sub(1).map(|p| cells[p]);
            let next = cells.get(i + 1).copied();
            (cur, classify_segment(prev, cur, next))
        })
        .collect()
}
