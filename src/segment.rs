use std::fmt;

use tracing::trace;

use crate::direction::Direction;
use crate::error::Result;
use crate::grid::{Grid, Location};
use crate::level::{Level, MoveOutcome};
use crate::path::shortest_path;

/// A walk from `start` to `end` followed by a single push in direction
/// `push`. `snapshot` is the grid as it was when the walk began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub push: Direction,
    pub start: Location,
    pub end: Location,
    pub snapshot: Grid,
}

impl Segment {
    /// The shortest walk from `start` to `end` within `snapshot`.
    pub fn walk(&self) -> Option<Vec<Direction>> {
        shortest_path(&self.snapshot, self.start, self.end)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start at {} move to {} and push {}",
            self.start, self.end, self.push
        )
    }
}

/// Replay `moves` from the start of `level` and split them into push
/// segments. Walking moves only determine where each segment starts; the
/// walk itself is recomputed later. The level is reset before returning.
pub fn extract_segments(level: &mut Level, moves: &[Direction]) -> Result<Vec<Segment>> {
    level.reset();
    let result = replay(level, moves);
    level.reset();
    result
}

fn replay(level: &mut Level, moves: &[Direction]) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut walk_start = level.player();
    let mut walk_snapshot = level.grid().clone();

    for &dir in moves {
        let before_push = level.player();
        let result = level.apply_move(dir)?;
        if result.outcome == MoveOutcome::Pushed {
            let segment = Segment {
                push: dir,
                start: walk_start,
                end: before_push,
                snapshot: walk_snapshot,
            };
            trace!("segment {}: {}", segments.len(), segment);
            segments.push(segment);

            walk_start = level.player();
            walk_snapshot = level.grid().clone();
        }
    }

    Ok(segments)
}
