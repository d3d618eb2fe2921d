use std::fmt;

use arrayvec::ArrayVec;

use crate::direction::{ALL_DIRECTIONS, Direction};
use crate::error::{Result, SokoError};

/// A (row, column) position on the grid. Coordinates may step outside the
/// grid; lookups then return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub fn new(row: i32, col: i32) -> Self {
        Location { row, col }
    }

    /// The adjacent location one step in `dir`.
    pub fn step(self, dir: Direction) -> Location {
        let (dr, dc) = dir.delta();
        Location {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Box,
    Wall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    occupant: Option<Occupant>,
    goal: bool,
}

impl Cell {
    pub fn new(occupant: Option<Occupant>, goal: bool) -> Self {
        Cell { occupant, goal }
    }

    pub fn has_box(&self) -> bool {
        self.occupant == Some(Occupant::Box)
    }

    pub fn has_wall(&self) -> bool {
        self.occupant == Some(Occupant::Wall)
    }

    /// True if the player cannot walk into this cell without pushing.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_goal(&self) -> bool {
        self.goal
    }

    /// A goal must hold a box, and a non-goal must not.
    pub fn is_solved(&self) -> bool {
        self.goal == self.has_box()
    }

    pub fn put_box(&mut self) {
        self.occupant = Some(Occupant::Box);
    }

    pub fn remove_box(&mut self) {
        self.occupant = None;
    }

    fn to_char(self, has_player: bool) -> char {
        match (self.occupant, self.goal) {
            (Some(Occupant::Wall), _) => '#',
            (Some(Occupant::Box), true) => '*',
            (Some(Occupant::Box), false) => '$',
            (None, true) if has_player => '+',
            (None, false) if has_player => '@',
            (None, true) => '.',
            (None, false) => ' ',
        }
    }
}

/// Cell state of a level. Rows may have different lengths; the shape never
/// changes after parsing, only box placement does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Parse a Sokoban grid from text format, returning the grid and the
    /// player's starting location.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - ` ` = Floor (empty space)
    /// - `.` = Goal (target location for boxes)
    /// - `$` = Box
    /// - `@` = Player
    /// - `*` = Box on goal
    /// - `+` = Player on goal
    ///
    /// Carriage returns are dropped and blank lines skipped. Any other
    /// character is read as floor.
    pub fn parse(text: &str) -> Result<(Grid, Location)> {
        let mut cells: Vec<Vec<Cell>> = Vec::new();
        let mut player = None;

        for line in text.split('\n') {
            let row = cells.len();
            let mut grid_line = Vec::with_capacity(line.len());

            for ch in line.chars().filter(|&ch| ch != '\r') {
                let col = grid_line.len();
                let cell = match ch {
                    '#' => Cell::new(Some(Occupant::Wall), false),
                    '.' => Cell::new(None, true),
                    '$' => Cell::new(Some(Occupant::Box), false),
                    '*' => Cell::new(Some(Occupant::Box), true),
                    '@' | '+' => {
                        if player.is_some() {
                            return Err(SokoError::InvalidLevel(
                                "Multiple players found".to_string(),
                            ));
                        }
                        player = Some(Location::new(row as i32, col as i32));
                        Cell::new(None, ch == '+')
                    }
                    _ => Cell::new(None, false),
                };
                grid_line.push(cell);
            }

            if !grid_line.is_empty() {
                cells.push(grid_line);
            }
        }

        if cells.is_empty() {
            return Err(SokoError::InvalidLevel("Empty board".to_string()));
        }
        let player =
            player.ok_or_else(|| SokoError::InvalidLevel("No player found".to_string()))?;

        Ok((Grid { cells }, player))
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    pub fn get(&self, loc: Location) -> Option<&Cell> {
        let row = usize::try_from(loc.row).ok()?;
        let col = usize::try_from(loc.col).ok()?;
        self.cells.get(row)?.get(col)
    }

    fn get_mut(&mut self, loc: Location) -> Option<&mut Cell> {
        let row = usize::try_from(loc.row).ok()?;
        let col = usize::try_from(loc.col).ok()?;
        self.cells.get_mut(row)?.get_mut(col)
    }

    /// Move the box at `from` to `to`. Both locations must be on the grid.
    pub fn move_box(&mut self, from: Location, to: Location) {
        if let Some(cell) = self.get_mut(from) {
            cell.remove_box();
        }
        if let Some(cell) = self.get_mut(to) {
            cell.put_box();
        }
    }

    /// Check if boxes occupy exactly the goal cells (win condition).
    pub fn is_solved(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_solved())
    }

    /// Walkable neighbors of `loc`, in search order.
    pub fn open_neighbors(&self, loc: Location) -> ArrayVec<(Direction, Location), 4> {
        let mut neighbors = ArrayVec::new();
        for dir in ALL_DIRECTIONS {
            let next = loc.step(dir);
            if self.get(next).is_some_and(|cell| !cell.is_occupied()) {
                neighbors.push((dir, next));
            }
        }
        neighbors
    }

    /// Render the grid in XSB format with the player at `player`.
    pub fn render(&self, player: Location) -> String {
        let mut out = String::new();
        for (row, cells) in self.cells.iter().enumerate() {
            let line: String = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    cell.to_char(player == Location::new(row as i32, col as i32))
                })
                .collect();
            // Trim trailing spaces to match original input format
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_grid() {
        let input = "####\n# .#\n#  ###\n#*@  #\n#  $ #\n#  ###\n####";
        let (grid, player) = Grid::parse(input).unwrap();

        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 7);
        assert_eq!(player, Location::new(3, 2));
        assert!(grid.get(Location::new(3, 1)).unwrap().has_box());
        assert!(grid.get(Location::new(3, 1)).unwrap().is_goal());
        assert!(grid.get(Location::new(4, 3)).unwrap().has_box());
        assert!(grid.get(Location::new(0, 0)).unwrap().has_wall());
    }

    #[test]
    fn test_no_player() {
        let input = "####\n#  #\n####";
        assert!(matches!(
            Grid::parse(input),
            Err(SokoError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_multiple_players() {
        let input = "####\n#@+#\n####";
        assert!(matches!(
            Grid::parse(input),
            Err(SokoError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(Grid::parse("").is_err());
        assert!(Grid::parse("\n\r\n").is_err());
    }

    #[test]
    fn test_player_on_goal() {
        let input = "####\n#$+ #\n#$. #\n####";
        let (grid, player) = Grid::parse(input).unwrap();
        assert_eq!(player, Location::new(1, 2));
        let cell = grid.get(player).unwrap();
        assert!(cell.is_goal());
        assert!(!cell.is_occupied());
    }

    #[test]
    fn test_carriage_returns_and_blank_lines() {
        let input = "\r\n#####\r\n#@$.#\r\n#####\r\n";
        let (grid, player) = Grid::parse(input).unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 5);
        assert_eq!(player, Location::new(1, 1));
        assert!(grid.get(Location::new(1, 2)).unwrap().has_box());
    }

    #[test]
    fn test_unknown_characters_are_floor() {
        let (grid, _) = Grid::parse("#####\n#@x-#\n#####").unwrap();
        let cell = grid.get(Location::new(1, 2)).unwrap();
        assert!(!cell.is_occupied());
        assert!(!cell.is_goal());
    }

    #[test]
    fn test_ragged_rows_out_of_bounds() {
        let (grid, _) = Grid::parse("####\n# @ ###\n####").unwrap();
        assert!(grid.get(Location::new(1, 6)).is_some());
        assert!(grid.get(Location::new(0, 4)).is_none());
        assert!(grid.get(Location::new(2, 6)).is_none());
        assert!(grid.get(Location::new(-1, 0)).is_none());
        assert!(grid.get(Location::new(0, -1)).is_none());
        assert!(grid.get(Location::new(3, 0)).is_none());
    }

    #[test]
    fn test_is_solved() {
        let (grid, _) = Grid::parse("####\n#*@#\n####").unwrap();
        assert!(grid.is_solved());

        let (grid, _) = Grid::parse("####\n#$.#\n# @#\n####").unwrap();
        assert!(!grid.is_solved());

        // A box off goal is unsolved even when every goal is covered
        let (grid, _) = Grid::parse("#####\n#*$@#\n#####").unwrap();
        assert!(!grid.is_solved());
    }

    #[test]
    fn test_move_box() {
        let (mut grid, _) = Grid::parse("#####\n#@$.#\n#####").unwrap();
        grid.move_box(Location::new(1, 2), Location::new(1, 3));
        assert!(!grid.get(Location::new(1, 2)).unwrap().has_box());
        assert!(grid.get(Location::new(1, 3)).unwrap().has_box());
        assert!(grid.is_solved());
    }

    #[test]
    fn test_equality_tracks_boxes() {
        let (a, _) = Grid::parse("######\n#@$ .#\n######").unwrap();
        let (b, _) = Grid::parse("######\n# $@.#\n######").unwrap();
        // Player position is not part of the grid
        assert_eq!(a, b);

        let mut c = a.clone();
        c.move_box(Location::new(1, 2), Location::new(1, 3));
        assert_ne!(a, c);
    }

    #[test]
    fn test_open_neighbors_order() {
        let (grid, player) = Grid::parse("#####\n#   #\n# @$#\n#   #\n#####").unwrap();
        let neighbors: Vec<Direction> = grid
            .open_neighbors(player)
            .iter()
            .map(|(dir, _)| *dir)
            .collect();
        assert_eq!(
            neighbors,
            vec![Direction::Down, Direction::Left, Direction::Up]
        );
    }

    #[test]
    fn test_render() {
        let input = "####\n# .#\n#  ###\n#*@  #\n#  $ #\n#  ###\n####";
        let (grid, player) = Grid::parse(input).unwrap();
        assert_eq!(grid.render(player).trim_end(), input);
    }
}
