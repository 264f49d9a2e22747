// Grid geometry shared by the simulation, the AI and the HTTP surface
// Screen convention: x grows to the right, y grows downward

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 2D cell coordinate on the grid
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }
}

/// Represents the four possible movement directions for a snake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    /// The order is fixed and doubles as the pathfinder's neighbour order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to its lowercase string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// The direction pointing the other way (involutive)
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit vector of this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        let (dx, dy) = self.delta();
        Coord {
            x: coord.x + dx,
            y: coord.y + dy,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Playable area in cells: `0..width` by `0..height`
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
}

impl GridBounds {
    /// Creates bounds, rejecting empty or negative grids
    pub fn new(width: i32, height: i32) -> Result<Self, String> {
        if width <= 0 || height <= 0 {
            return Err(format!(
                "Grid dimensions must be positive, got {}x{}",
                width, height
            ));
        }
        Ok(GridBounds { width, height })
    }

    /// Derives the cell grid from a canvas size in pixels
    ///
    /// # Arguments
    /// * `canvas_width` / `canvas_height` - Canvas size reported by the front-end
    /// * `cell_px` - Edge length of one cell in pixels
    pub fn from_canvas(canvas_width: u32, canvas_height: u32, cell_px: u32) -> Result<Self, String> {
        if cell_px == 0 {
            return Err("Cell size must be positive".to_string());
        }
        Self::new((canvas_width / cell_px) as i32, (canvas_height / cell_px) as i32)
    }

    /// True when the coordinate lies on the grid; total over all integers
    pub fn contains(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Iterates every cell row by row
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord { x, y }))
    }
}

/// Calculates Manhattan distance between two coordinates
pub fn manhattan_distance(a: Coord, b: Coord) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Direction of a single step from `from` toward `to`, x axis first
/// Returns None when both cells are the same
pub fn direction_toward(from: Coord, to: Coord) -> Option<Direction> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    if dx > 0 {
        Some(Direction::Right)
    } else if dx < 0 {
        Some(Direction::Left)
    } else if dy > 0 {
        Some(Direction::Down)
    } else if dy < 0 {
        Some(Direction::Up)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involutive() {
        for dir in Direction::all() {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_apply_uses_screen_coordinates() {
        let origin = Coord::new(3, 3);
        assert_eq!(Direction::Up.apply(&origin), Coord::new(3, 2));
        assert_eq!(Direction::Down.apply(&origin), Coord::new(3, 4));
        assert_eq!(Direction::Left.apply(&origin), Coord::new(2, 3));
        assert_eq!(Direction::Right.apply(&origin), Coord::new(4, 3));
    }

    #[test]
    fn test_contains_is_total() {
        let bounds = GridBounds::new(10, 5).unwrap();
        assert!(bounds.contains(&Coord::new(0, 0)));
        assert!(bounds.contains(&Coord::new(9, 4)));
        assert!(!bounds.contains(&Coord::new(10, 4)));
        assert!(!bounds.contains(&Coord::new(-1, 0)));
        assert!(!bounds.contains(&Coord::new(i32::MIN, i32::MAX)));
    }

    #[test]
    fn test_bounds_reject_non_positive_sizes() {
        assert!(GridBounds::new(0, 10).is_err());
        assert!(GridBounds::new(10, -3).is_err());
    }

    #[test]
    fn test_bounds_from_canvas() {
        let bounds = GridBounds::from_canvas(600, 400, 20).unwrap();
        assert_eq!(bounds, GridBounds { width: 30, height: 20 });

        let bounds = GridBounds::from_canvas(359, 130, 12).unwrap();
        assert_eq!(bounds, GridBounds { width: 29, height: 10 });

        assert!(GridBounds::from_canvas(600, 400, 0).is_err());
    }

    #[test]
    fn test_direction_toward_prefers_x_axis() {
        let from = Coord::new(2, 2);
        assert_eq!(direction_toward(from, Coord::new(5, 9)), Some(Direction::Right));
        assert_eq!(direction_toward(from, Coord::new(2, 0)), Some(Direction::Up));
        assert_eq!(direction_toward(from, from), None);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("Down".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(manhattan_distance(Coord::new(0, 0), Coord::new(3, 4)), 7);
        assert_eq!(manhattan_distance(Coord::new(-2, 1), Coord::new(-2, 1)), 0);
    }
}
