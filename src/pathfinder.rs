// A* pathfinding from a snake head to a target cell
//
// The search runs on a 4-connected uniform-cost grid with the Manhattan
// distance as heuristic, so the first time the goal is popped the path is
// optimal. Both snake bodies are static obstacles for the duration of a call.

use log::debug;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::occupancy::Occupancy;
use crate::types::{manhattan_distance, Coord, Direction, GridBounds};

/// Open-set entry: ordered by lowest f, then by insertion order
#[derive(Debug, PartialEq, Eq)]
struct SearchNode {
    coord: Coord,
    g_score: i32,
    f_score: i32,
    sequence: u32,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so both keys are reversed
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest path from `start` to `goal`
///
/// # Arguments
/// * `start` - Cell the search starts from (normally the AI head)
/// * `goal` - Target cell (normally the food)
/// * `obstacles` - Bodies that cannot be entered
/// * `max_distance` - Sight distance; goals farther away (Manhattan) are never searched
/// * `bounds` - Grid dimensions
///
/// # Returns
/// * Cells ordered start to goal inclusive, or an empty Vec when the goal is
///   unreachable or beyond `max_distance`
pub fn find_path(
    start: Coord,
    goal: Coord,
    obstacles: &Occupancy,
    max_distance: i32,
    bounds: &GridBounds,
) -> Vec<Coord> {
    let distance = manhattan_distance(start, goal);
    if distance > max_distance {
        debug!(
            "Pathfinder: goal {:?} at distance {} is beyond sight {}",
            goal, distance, max_distance
        );
        return Vec::new();
    }

    if start == goal {
        return vec![start];
    }

    if !bounds.contains(&start) || !obstacles.is_free(&goal, bounds) {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut g_scores: HashMap<Coord, i32> = HashMap::new();
    let mut sequence: u32 = 0;

    g_scores.insert(start, 0);
    open_set.push(SearchNode {
        coord: start,
        g_score: 0,
        f_score: distance,
        sequence,
    });

    while let Some(current) = open_set.pop() {
        // Skip entries superseded by a cheaper route found later
        if g_scores.get(&current.coord).is_some_and(|&g| g < current.g_score) {
            continue;
        }

        if current.coord == goal {
            let path = reconstruct_path(&came_from, current.coord);
            debug!(
                "Pathfinder: {:?} -> {:?} found {} cells",
                start,
                goal,
                path.len()
            );
            return path;
        }

        for dir in Direction::all() {
            let neighbor = dir.apply(&current.coord);
            if !obstacles.is_free(&neighbor, bounds) {
                continue;
            }

            let tentative_g = current.g_score + 1;
            let improves = g_scores
                .get(&neighbor)
                .map_or(true, |&known| tentative_g < known);

            if improves {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                sequence += 1;
                open_set.push(SearchNode {
                    coord: neighbor,
                    g_score: tentative_g,
                    f_score: tentative_g + manhattan_distance(neighbor, goal),
                    sequence,
                });
            }
        }
    }

    debug!("Pathfinder: {:?} -> {:?} unreachable", start, goal);
    Vec::new()
}

/// Walks the parent chain back from the goal
fn reconstruct_path(came_from: &HashMap<Coord, Coord>, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(&parent) = came_from.get(&current) {
        path.push(parent);
        current = parent;
    }

    path.reverse();
    path
}
