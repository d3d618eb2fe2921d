use tracing::{debug, warn};

use crate::direction::{Direction, format_moves, parse_moves};
use crate::error::Result;
use crate::level::Level;
use crate::merge::merge_to_fixed_point;
use crate::segment::{Segment, extract_segments};

/// An optimized solution together with what it took to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimized {
    pub moves: Vec<Direction>,
    /// Number of pushes in the input solution.
    pub segments: usize,
    /// Number of segments left after merging.
    pub merged_segments: usize,
    /// Segments whose walk could not be reconstructed; only their push was
    /// emitted.
    pub anomalies: usize,
}

/// Shortens solutions for one level. Owns the level it replays on.
pub struct Optimizer {
    level: Level,
    merge: bool,
}

impl Optimizer {
    pub fn new(level: Level, merge: bool) -> Self {
        Optimizer { level, merge }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Rebuild `solution` from its pushes, replacing every walk between two
    /// pushes by a shortest walk and, if enabled, merging runs of pushes
    /// that leave the boxes where they started.
    pub fn optimize(&mut self, solution: &[Direction]) -> Result<Optimized> {
        let segments = extract_segments(&mut self.level, solution)?;
        let raw_count = segments.len();

        let segments = if self.merge {
            merge_to_fixed_point(segments)
        } else {
            segments
        };

        let (moves, anomalies) = rebuild(&segments);
        self.level.reset();

        debug!(
            "optimized {} -> {} moves, {} -> {} segments",
            solution.len(),
            moves.len(),
            raw_count,
            segments.len()
        );

        Ok(Optimized {
            moves,
            segments: raw_count,
            merged_segments: segments.len(),
            anomalies,
        })
    }

    /// Replay `moves` from the start of the level and report whether they
    /// solve it. The level is reset afterwards.
    pub fn verify(&mut self, moves: &[Direction]) -> Result<bool> {
        self.level.reset();
        let solved = self.level.play(moves);
        self.level.reset();
        solved
    }
}

/// Concatenate the shortest walk and the push of every segment. A segment
/// whose walk cannot be found contributes only its push and is counted in
/// the returned anomaly total.
pub fn rebuild(segments: &[Segment]) -> (Vec<Direction>, usize) {
    let mut moves = Vec::new();
    let mut anomalies = 0;
    for (index, segment) in segments.iter().enumerate() {
        match segment.walk() {
            Some(walk) => moves.extend(walk),
            None => {
                warn!("no walk for segment {}: {}", index, segment);
                anomalies += 1;
            }
        }
        moves.push(segment.push);
    }
    (moves, anomalies)
}

/// Optimize a solution string for the level described by `definition`.
pub fn optimize(definition: &str, solution: &str, merge: bool) -> Result<String> {
    let level = Level::from_text(definition)?;
    let moves = parse_moves(solution)?;
    let optimized = Optimizer::new(level, merge).optimize(&moves)?;
    Ok(format_moves(&optimized.moves))
}
