use std::fmt;

use crate::direction::Direction;
use crate::error::{Result, SokoError};
use crate::grid::{Grid, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player stayed put (wall, edge of the grid or a blocked box).
    Blocked,
    /// The player walked onto an empty cell.
    Moved,
    /// The player pushed a box one cell.
    Pushed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub outcome: MoveOutcome,
    pub solved: bool,
}

/// A playable level: the current grid and player location, plus the
/// starting position kept for `reset`.
#[derive(Debug, Clone)]
pub struct Level {
    grid: Grid,
    player: Location,
    solved: bool,
    start_grid: Grid,
    start_player: Location,
}

impl Level {
    pub fn from_text(text: &str) -> Result<Self> {
        let (grid, player) = Grid::parse(text)?;
        Ok(Level {
            grid: grid.clone(),
            player,
            solved: false,
            start_grid: grid,
            start_player: player,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Location {
        self.player
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Restore the starting grid and player location.
    pub fn reset(&mut self) {
        self.solved = false;
        self.grid = self.start_grid.clone();
        self.player = self.start_player;
    }

    /// Apply a single move, pushing a box if one is in the way.
    /// Fails if the level has already been solved.
    pub fn apply_move(&mut self, dir: Direction) -> Result<MoveResult> {
        if self.solved {
            return Err(SokoError::LevelSolved);
        }

        let outcome = self.attempt_move(dir);
        if outcome == MoveOutcome::Pushed {
            self.solved = self.grid.is_solved();
        }

        Ok(MoveResult {
            outcome,
            solved: self.solved,
        })
    }

    /// Apply each move in turn and return whether the level ends up solved.
    pub fn play(&mut self, moves: &[Direction]) -> Result<bool> {
        for &dir in moves {
            self.apply_move(dir)?;
        }
        Ok(self.solved)
    }

    fn attempt_move(&mut self, dir: Direction) -> MoveOutcome {
        let target = self.player.step(dir);
        let Some(cell) = self.grid.get(target) else {
            return MoveOutcome::Blocked;
        };
        if cell.has_wall() {
            return MoveOutcome::Blocked;
        }

        let has_box = cell.has_box();
        if has_box {
            let landing = target.step(dir);
            if self.grid.get(landing).is_none_or(|cell| cell.is_occupied()) {
                return MoveOutcome::Blocked;
            }
            self.grid.move_box(target, landing);
        }

        self.player = target;
        if has_box {
            MoveOutcome::Pushed
        } else {
            MoveOutcome::Moved
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid.render(self.player))
    }
}
