// Difficulty policy engine
//
// Turns one tick's view of the board into a heading for the AI snake.
// HARD always searches, MEDIUM mixes in random moves and skipped searches,
// EASY runs a cascade of deliberately bad overrides before it ever searches.
//
// Directions returned here may be the reverse of the current heading; the
// snake itself refuses those (see Snake::set_direction).

use log::debug;
use serde::Serialize;

use crate::config::{Difficulty, EasyBehaviorConfig, TierConfig};
use crate::occupancy::Occupancy;
use crate::pathfinder::find_path;
use crate::rng::{shuffle, RandomSource};
use crate::snake::Snake;
use crate::types::{direction_toward, manhattan_distance, Coord, Direction, GridBounds};

/// Why the policy picked a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Inside the update-rate window; previous decision held
    Throttled,
    Frozen,
    RandomMove,
    AwayFromFood,
    RiskyMove,
    ForcedTurn,
    CloseFoodRetreat,
    SuicideMove,
    PathStep,
    Greedy,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::Throttled => "throttled",
            DecisionReason::Frozen => "frozen",
            DecisionReason::RandomMove => "random_move",
            DecisionReason::AwayFromFood => "away_from_food",
            DecisionReason::RiskyMove => "risky_move",
            DecisionReason::ForcedTurn => "forced_turn",
            DecisionReason::CloseFoodRetreat => "close_food_retreat",
            DecisionReason::SuicideMove => "suicide_move",
            DecisionReason::PathStep => "path_step",
            DecisionReason::Greedy => "greedy",
        }
    }
}

/// A chosen heading and the branch that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub direction: Direction,
    pub reason: DecisionReason,
}

impl Decision {
    pub fn new(direction: Direction, reason: DecisionReason) -> Self {
        Decision { direction, reason }
    }
}

/// Read-only view of the board for one decision
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub me: &'a Snake,
    pub opponent: &'a [Coord],
    pub food: Coord,
    pub bounds: GridBounds,
    pub tick: u64,
    /// Evaluations made so far, including the current one
    pub decisions_made: u64,
}

impl<'a> DecisionContext<'a> {
    pub fn head(&self) -> Coord {
        self.me.head()
    }

    pub fn current(&self) -> Direction {
        self.me.direction()
    }

    /// Own body minus head plus the opponent's body
    pub fn obstacles(&self) -> Occupancy<'a> {
        Occupancy::new(self.me.body_without_head(), self.opponent)
    }

    fn is_reversal(&self, dir: Direction) -> bool {
        dir == self.current().opposite()
    }

    /// Out of bounds or on the AI's own body
    fn hits_wall_or_self(&self, cell: &Coord) -> bool {
        !self.bounds.contains(cell) || self.me.body_without_head().contains(cell)
    }
}

/// Which axis the greedy move tries first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPreference {
    /// The axis with the larger distance to the target
    Primary,
    /// The other axis; the EASY tier's deliberate mistake
    Secondary,
}

/// Runs the policy of the given tier
///
/// # Arguments
/// * `tier` - Active difficulty
/// * `tier_config` - Knobs of that tier
/// * `easy` - EASY cascade odds (only read by the EASY tier)
/// * `ctx` - Board view for this tick
/// * `rng` - Random source for every probabilistic branch
pub fn decide(
    tier: Difficulty,
    tier_config: &TierConfig,
    easy: &EasyBehaviorConfig,
    ctx: &DecisionContext,
    rng: &mut dyn RandomSource,
) -> Decision {
    let decision = match tier {
        Difficulty::Hard => hard_policy(tier_config, ctx, rng),
        Difficulty::Medium => medium_policy(tier_config, ctx, rng),
        Difficulty::Easy => easy_policy(tier_config, easy, ctx, rng),
    };

    debug!(
        "AI ({}) tick {}: {} via {}",
        tier,
        ctx.tick,
        decision.direction,
        decision.reason.as_str()
    );
    decision
}

/// Always search; greedy fallback with collision avoidance
fn hard_policy(tier: &TierConfig, ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Decision {
    let path = find_path(
        ctx.head(),
        ctx.food,
        &ctx.obstacles(),
        tier.sight_distance,
        &ctx.bounds,
    );
    if path.len() >= 2 {
        return Decision::new(path_step(ctx, &path), DecisionReason::PathStep);
    }

    Decision::new(
        greedy_move(ctx, AxisPreference::Primary, true, rng),
        DecisionReason::Greedy,
    )
}

/// Random move, then a probabilistic search, then greedy
fn medium_policy(tier: &TierConfig, ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Decision {
    if rng.chance(tier.random_move_chance) {
        return Decision::new(random_move(ctx, rng), DecisionReason::RandomMove);
    }

    if rng.chance(tier.path_finding_chance) {
        let path = find_path(
            ctx.head(),
            ctx.food,
            &ctx.obstacles(),
            tier.sight_distance,
            &ctx.bounds,
        );
        if path.len() >= 2 {
            return Decision::new(path_step(ctx, &path), DecisionReason::PathStep);
        }
    }

    Decision::new(
        greedy_move(ctx, AxisPreference::Primary, true, rng),
        DecisionReason::Greedy,
    )
}

/// The EASY override cascade; the first override that fires decides
fn easy_policy(
    tier: &TierConfig,
    easy: &EasyBehaviorConfig,
    ctx: &DecisionContext,
    rng: &mut dyn RandomSource,
) -> Decision {
    // 1. Freeze
    if easy.freeze_period > 0 && ctx.tick % easy.freeze_period == 0 && rng.chance(easy.freeze_chance)
    {
        return Decision::new(ctx.current(), DecisionReason::Frozen);
    }

    // 2. Pure random move
    if rng.chance(easy.random_move_chance) {
        return Decision::new(random_move(ctx, rng), DecisionReason::RandomMove);
    }

    // 3. Walk away from the food
    if rng.chance(easy.move_away_chance) {
        return Decision::new(move_away_from_food(ctx, rng), DecisionReason::AwayFromFood);
    }

    // 4. Hug a wall or a body
    if rng.chance(easy.risky_move_chance) {
        if let Some(dir) = risky_move(ctx, rng) {
            return Decision::new(dir, DecisionReason::RiskyMove);
        }
    }

    // 5. Forced turn every Nth decision
    if easy.forced_turn_period > 0 && ctx.decisions_made % easy.forced_turn_period == 0 {
        return Decision::new(random_turn(ctx, rng), DecisionReason::ForcedTurn);
    }

    // 6. Shy away when the food is close
    if manhattan_distance(ctx.head(), ctx.food) < easy.close_food_distance
        && rng.chance(easy.close_food_retreat_chance)
    {
        return Decision::new(
            move_away_from_food(ctx, rng),
            DecisionReason::CloseFoodRetreat,
        );
    }

    // 7. Steer into a wall or a body
    if rng.chance(easy.suicide_chance) {
        if let Some(dir) = suicide_move(ctx, easy.tail_bite_min_length) {
            return Decision::new(dir, DecisionReason::SuicideMove);
        }
    }

    // 8. Rarely search, and even then badly
    if rng.next_f64() > tier.path_finding_chance {
        return Decision::new(easy_greedy(easy, ctx, rng), DecisionReason::Greedy);
    }

    let sight = if rng.chance(easy.sight_clamp_chance) {
        easy.clamped_sight_distance
    } else {
        tier.sight_distance
    };
    let path = degraded_search(easy, ctx, sight, rng);

    if !path.is_empty() && rng.next_f64() > easy.follow_path_threshold {
        if rng.chance(easy.path_random_turn_chance) {
            return Decision::new(random_move(ctx, rng), DecisionReason::RandomMove);
        }
        return Decision::new(path_step(ctx, &path), DecisionReason::PathStep);
    }

    Decision::new(easy_greedy(easy, ctx, rng), DecisionReason::Greedy)
}

/// Greedy step for EASY: sometimes the wrong axis first, never a safety check
fn easy_greedy(easy: &EasyBehaviorConfig, ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Direction {
    let axis = if rng.chance(easy.greedy_secondary_axis_chance) {
        AxisPreference::Secondary
    } else {
        AxisPreference::Primary
    };
    greedy_move(ctx, axis, false, rng)
}

/// Search with the EASY tier's skips, truncation and abandonment
///
/// # Returns
/// * Empty when beyond sight or unreachable, `[start]` when the search was
///   skipped or abandoned, otherwise a (possibly truncated) path prefix
pub fn degraded_search(
    easy: &EasyBehaviorConfig,
    ctx: &DecisionContext,
    sight: i32,
    rng: &mut dyn RandomSource,
) -> Vec<Coord> {
    let start = ctx.head();
    let goal = ctx.food;

    if manhattan_distance(start, goal) > sight {
        return Vec::new();
    }

    if rng.chance(easy.skip_search_chance) {
        return vec![start];
    }

    let diagonal = (goal.x - start.x).abs() > 0 && (goal.y - start.y).abs() > 0;
    if diagonal && rng.chance(easy.diagonal_skip_chance) {
        return vec![start];
    }

    let mut path = find_path(start, goal, &ctx.obstacles(), sight, &ctx.bounds);
    if path.is_empty() {
        return path;
    }

    if path.len() > easy.truncate_min_length && rng.chance(easy.truncate_chance) {
        let keep = (path.len() / easy.truncate_divisor.max(1)).max(1);
        path.truncate(keep);
        return path;
    }

    if rng.chance(easy.abandon_path_chance) {
        path.truncate(1);
    }
    path
}

/// Step toward the second cell of a path; a one-cell path holds course
pub fn path_step(ctx: &DecisionContext, path: &[Coord]) -> Direction {
    path.get(1)
        .and_then(|next| direction_toward(ctx.head(), *next))
        .unwrap_or_else(|| ctx.current())
}

/// Uniform over non-reversing directions whose next cell is in bounds
pub fn random_move(ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Direction {
    let head = ctx.head();
    let options: Vec<Direction> = Direction::all()
        .iter()
        .copied()
        .filter(|&dir| !ctx.is_reversal(dir) && ctx.bounds.contains(&dir.apply(&head)))
        .collect();

    if options.is_empty() {
        return ctx.current();
    }
    options[rng.pick_index(options.len())]
}

/// Uniform over non-reversing directions into free cells
/// Falls back to `random_move` when every option is blocked
pub fn safe_random_move(ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Direction {
    let head = ctx.head();
    let obstacles = ctx.obstacles();
    let options: Vec<Direction> = Direction::all()
        .iter()
        .copied()
        .filter(|&dir| !ctx.is_reversal(dir) && obstacles.is_free(&dir.apply(&head), &ctx.bounds))
        .collect();

    if options.is_empty() {
        return random_move(ctx, rng);
    }
    options[rng.pick_index(options.len())]
}

/// Any non-reversing direction, walls ignored
pub fn random_turn(ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Direction {
    let options: Vec<Direction> = Direction::all()
        .iter()
        .copied()
        .filter(|&dir| !ctx.is_reversal(dir))
        .collect();
    options[rng.pick_index(options.len())]
}

/// Candidate steps toward (dx, dy), ordered by axis preference
fn axis_steps(dx: i32, dy: i32, x_first: bool) -> Vec<Direction> {
    let x_step = match dx.signum() {
        1 => Some(Direction::Right),
        -1 => Some(Direction::Left),
        _ => None,
    };
    let y_step = match dy.signum() {
        1 => Some(Direction::Down),
        -1 => Some(Direction::Up),
        _ => None,
    };

    let ordered = if x_first {
        [x_step, y_step]
    } else {
        [y_step, x_step]
    };
    ordered.iter().flatten().copied().collect()
}

/// Single step reducing distance to the food without searching
///
/// # Arguments
/// * `axis` - Whether to try the larger-distance axis first
/// * `avoid_collisions` - Re-roll into a safe random move when the step
///   would hit a wall or a body
pub fn greedy_move(
    ctx: &DecisionContext,
    axis: AxisPreference,
    avoid_collisions: bool,
    rng: &mut dyn RandomSource,
) -> Direction {
    let head = ctx.head();
    let dx = ctx.food.x - head.x;
    let dy = ctx.food.y - head.y;

    let larger_is_x = dx.abs() > dy.abs();
    let x_first = match axis {
        AxisPreference::Primary => larger_is_x,
        AxisPreference::Secondary => !larger_is_x,
    };

    let chosen = axis_steps(dx, dy, x_first)
        .into_iter()
        .find(|&dir| !ctx.is_reversal(dir))
        .unwrap_or_else(|| ctx.current());

    if avoid_collisions {
        let next = chosen.apply(&head);
        if !ctx.obstacles().is_free(&next, &ctx.bounds) {
            return safe_random_move(ctx, rng);
        }
    }
    chosen
}

/// Inverse of the greedy rule: step away along the dominant axis
/// A step into a wall or the AI's own body becomes a random move instead
pub fn move_away_from_food(ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Direction {
    let head = ctx.head();
    let dx = ctx.food.x - head.x;
    let dy = ctx.food.y - head.y;

    let away = if dx.abs() > dy.abs() {
        if dx > 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if dy > 0 {
        Direction::Up
    } else if dy < 0 {
        Direction::Down
    } else {
        ctx.current()
    };

    if ctx.hits_wall_or_self(&away.apply(&head)) {
        return random_move(ctx, rng);
    }
    away
}

/// A direction whose next cell sits one cell inside a wall line or touches a body
/// Candidates are tried in shuffled order; None when nothing qualifies
pub fn risky_move(ctx: &DecisionContext, rng: &mut dyn RandomSource) -> Option<Direction> {
    let head = ctx.head();
    let bounds = ctx.bounds;
    let mut candidates = Direction::all();
    shuffle(&mut candidates, rng);

    // Segments behind the neck; the neck always touches the head's neighbours
    let own_far_body = ctx.me.body().get(2..).unwrap_or(&[]);
    let contact = Occupancy::new(own_far_body, ctx.opponent);

    candidates.into_iter().find(|dir| {
        let next = dir.apply(&head);
        let near_wall = next.x == 1
            || next.x == bounds.width - 2
            || next.y == 1
            || next.y == bounds.height - 2;

        near_wall || contact.adjacent_to_body(&next)
    })
}

/// A direction that ends the game if one is identifiable
///
/// Preference: bite an adjacent tail (long snakes only), then the nearest
/// wall when within one cell of it, then any body segment in the 3x3
/// neighbourhood of the head.
pub fn suicide_move(ctx: &DecisionContext, tail_bite_min_length: usize) -> Option<Direction> {
    let head = ctx.head();
    let body = ctx.me.body();

    if body.len() > tail_bite_min_length {
        let tail = ctx.me.tail();
        if manhattan_distance(head, tail) == 1 {
            return direction_toward(head, tail);
        }
    }

    let bounds = ctx.bounds;
    if head.x <= 1 {
        return Some(Direction::Left);
    }
    if head.x >= bounds.width - 2 {
        return Some(Direction::Right);
    }
    if head.y <= 1 {
        return Some(Direction::Up);
    }
    if head.y >= bounds.height - 2 {
        return Some(Direction::Down);
    }

    body[1..]
        .iter()
        .filter(|segment| (segment.x - head.x).abs() <= 1 && (segment.y - head.y).abs() <= 1)
        .find_map(|segment| direction_toward(head, *segment))
}
