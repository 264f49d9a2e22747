// Occupancy queries over the snake bodies present on the grid
//
// An Occupancy borrows body slices for the duration of a single decision.
// Nothing here mutates state; every query is total.

use crate::types::{manhattan_distance, Coord, GridBounds};

/// Borrowed set of bodies treated as impassable cells
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    bodies: [&'a [Coord]; 2],
}

impl<'a> Occupancy<'a> {
    /// Builds the obstacle set used for one AI decision
    ///
    /// # Arguments
    /// * `own_body_without_head` - The deciding snake's body minus its head
    /// * `opponent_body` - The other snake's full body
    pub fn new(own_body_without_head: &'a [Coord], opponent_body: &'a [Coord]) -> Self {
        Occupancy {
            bodies: [own_body_without_head, opponent_body],
        }
    }

    /// Occupancy with no obstacles at all
    pub fn empty() -> Self {
        Occupancy { bodies: [&[], &[]] }
    }

    /// True iff the cell equals any cell of any tracked body
    pub fn is_occupied(&self, coord: &Coord) -> bool {
        is_occupied(coord, &self.bodies)
    }

    /// True when the cell is on the grid and not covered by a body
    pub fn is_free(&self, coord: &Coord, bounds: &GridBounds) -> bool {
        bounds.contains(coord) && !self.is_occupied(coord)
    }

    /// True when the cell touches (orthogonally) any tracked body segment
    pub fn adjacent_to_body(&self, coord: &Coord) -> bool {
        self.bodies
            .iter()
            .flat_map(|body| body.iter())
            .any(|segment| manhattan_distance(*coord, *segment) == 1)
    }
}

/// Checks whether a coordinate is covered by any of the given bodies
pub fn is_occupied(coord: &Coord, bodies: &[&[Coord]]) -> bool {
    bodies.iter().any(|body| body.contains(coord))
}
