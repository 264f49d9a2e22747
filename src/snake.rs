// Snake body and movement
//
// Movement, growth and collision tests live here once for both snakes;
// controllers only supply the next direction.

use crate::types::{Coord, Direction, GridBounds};

/// A snake on the grid, body ordered head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Coord>,
    direction: Direction,
    growing: bool,
}

impl Snake {
    /// Spawns a straight snake whose body trails behind the head
    ///
    /// # Arguments
    /// * `head` - Head position
    /// * `direction` - Initial heading; the body extends the opposite way
    /// * `length` - Number of cells, at least one
    pub fn spawn(head: Coord, direction: Direction, length: usize) -> Self {
        let back = direction.opposite();
        let mut body = Vec::with_capacity(length.max(1));
        let mut cell = head;
        body.push(cell);
        for _ in 1..length {
            cell = back.apply(&cell);
            body.push(cell);
        }

        Snake {
            body,
            direction,
            growing: false,
        }
    }

    /// Builds a snake from an explicit body
    pub fn from_body(body: Vec<Coord>, direction: Direction) -> Result<Self, String> {
        if body.is_empty() {
            return Err("Snake body must contain at least one cell".to_string());
        }
        Ok(Snake {
            body,
            direction,
            growing: false,
        })
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &[Coord] {
        &self.body
    }

    pub fn body_without_head(&self) -> &[Coord] {
        &self.body[1..]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    /// Changes heading unless it would reverse into the neck
    ///
    /// # Returns
    /// * `true` if the new direction was accepted
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Cell the head would enter on the next advance
    pub fn next_head(&self) -> Coord {
        self.direction.apply(&self.head())
    }

    /// Moves one cell in the current direction
    /// The tail stays in place when growth is pending
    pub fn advance(&mut self) {
        let new_head = self.next_head();
        self.body.insert(0, new_head);

        if self.growing {
            self.growing = false;
        } else {
            self.body.pop();
        }
    }

    /// Schedules one cell of growth for the next advance
    pub fn grow(&mut self) {
        self.growing = true;
    }

    pub fn hits_wall(&self, bounds: &GridBounds) -> bool {
        !bounds.contains(&self.head())
    }

    pub fn hits_self(&self) -> bool {
        let head = self.head();
        self.body[1..].contains(&head)
    }

    /// True when this snake's head lies on any cell of `other`
    pub fn hits_body(&self, other: &[Coord]) -> bool {
        other.contains(&self.head())
    }

    pub fn occupies(&self, coord: &Coord) -> bool {
        self.body.contains(coord)
    }
}
