// Two-snake arena: the game-loop collaborator around the AI core
//
// One tick runs strictly in sequence: both controllers choose a heading,
// both snakes advance, collisions are checked (player first), then food.
// Nothing here blocks; the tick timer belongs to whoever drives `step`.

use log::{debug, info};
use serde::Serialize;

use crate::config::{Config, Difficulty};
use crate::controller::{AiController, Controller, HumanController, TickView};
use crate::policy::Decision;
use crate::rng::RandomSource;
use crate::snake::Snake;
use crate::types::{Coord, Direction, GridBounds};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Ready,
    Playing,
    Paused,
    GameOver,
}

/// Who won a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player,
    Ai,
    Draw,
}

/// What ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCause {
    Wall,
    SelfCollision,
    OpponentCollision,
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub winner: Winner,
    pub cause: EndCause,
}

/// Result of one simulation step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub ai_decision: Option<Decision>,
    /// AI head and food as the decision saw them, before the advance
    pub ai_head: Coord,
    pub food: Coord,
    pub player_ate: bool,
    pub ai_ate: bool,
    pub outcome: Option<Outcome>,
}

/// Serializable view of one snake
#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
    pub body: Vec<Coord>,
    pub direction: Direction,
    pub score: u32,
}

/// Serializable view of the whole arena
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub bounds: GridBounds,
    pub food: Coord,
    pub player: SnakeSnapshot,
    pub ai: SnakeSnapshot,
    pub outcome: Option<Outcome>,
}

/// Spawn cells for (player head, AI head) on a grid
fn spawn_heads(bounds: &GridBounds) -> (Coord, Coord) {
    let mid_y = bounds.height / 2;
    let player_x = (bounds.width * 3 / 4).min(bounds.width - 2);
    let ai_x = (bounds.width / 4).max(1);
    (Coord::new(player_x, mid_y), Coord::new(ai_x, mid_y))
}

pub struct Arena {
    config: Config,
    bounds: GridBounds,
    tier: Difficulty,
    phase: GamePhase,
    tick: u64,
    player: Snake,
    ai: Snake,
    player_controller: Controller,
    ai_controller: Controller,
    food: Coord,
    player_score: u32,
    ai_score: u32,
    outcome: Option<Outcome>,
}

impl Arena {
    /// Creates a session in the Ready phase
    ///
    /// # Arguments
    /// * `config` - Grid size, snake length and AI knobs
    /// * `tier` - Difficulty of the AI snake
    /// * `rng` - Used for the first food placement
    ///
    /// # Returns
    /// * Err when the grid cannot hold both starting snakes
    pub fn new(config: &Config, tier: Difficulty, rng: &mut dyn RandomSource) -> Result<Self, String> {
        let bounds = config.arena.bounds()?;
        let (player, ai) = Self::spawn_snakes(&bounds, config.arena.initial_snake_length)?;

        let mut arena = Arena {
            config: config.clone(),
            bounds,
            tier,
            phase: GamePhase::Ready,
            tick: 0,
            player,
            ai,
            player_controller: Controller::Human(HumanController::new()),
            ai_controller: Controller::Ai(AiController::new(tier, config)),
            food: Coord::new(0, 0),
            player_score: 0,
            ai_score: 0,
            outcome: None,
        };

        if !arena.spawn_food(rng) {
            return Err("Grid has no free cell for food".to_string());
        }

        info!(
            "Arena created: {}x{} grid, difficulty {}",
            bounds.width, bounds.height, tier
        );
        Ok(arena)
    }

    /// Places both snakes at their starting cells
    fn spawn_snakes(bounds: &GridBounds, length: usize) -> Result<(Snake, Snake), String> {
        if length == 0 {
            return Err("Initial snake length must be at least 1".to_string());
        }

        let (player_head, ai_head) = spawn_heads(bounds);
        let player = Snake::spawn(player_head, Direction::Right, length);
        let ai = Snake::spawn(ai_head, Direction::Left, length);

        let all_in_bounds = player
            .body()
            .iter()
            .chain(ai.body().iter())
            .all(|c| bounds.contains(c));
        let overlap = player.body().iter().any(|c| ai.occupies(c));

        if !all_in_bounds || overlap {
            return Err(format!(
                "Grid {}x{} is too small for two snakes of length {}",
                bounds.width, bounds.height, length
            ));
        }
        Ok((player, ai))
    }

    /// Moves food to a uniformly chosen cell not covered by either snake
    ///
    /// # Returns
    /// * `false` when every cell is occupied
    pub fn spawn_food(&mut self, rng: &mut dyn RandomSource) -> bool {
        let free: Vec<Coord> = self
            .bounds
            .cells()
            .filter(|c| !self.player.occupies(c) && !self.ai.occupies(c))
            .collect();

        if free.is_empty() {
            return false;
        }

        self.food = free[rng.pick_index(free.len())];
        debug!("Food spawned at ({}, {})", self.food.x, self.food.y);
        true
    }

    /// Back to a fresh Ready session with the current difficulty
    pub fn reset(&mut self, rng: &mut dyn RandomSource) -> Result<(), String> {
        let (player, ai) = Self::spawn_snakes(&self.bounds, self.config.arena.initial_snake_length)?;
        self.player = player;
        self.ai = ai;
        self.player_controller.reset();
        self.ai_controller.reset();
        self.tick = 0;
        self.player_score = 0;
        self.ai_score = 0;
        self.outcome = None;
        self.phase = GamePhase::Ready;

        if !self.spawn_food(rng) {
            return Err("Grid has no free cell for food".to_string());
        }
        info!("Arena reset");
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), String> {
        match self.phase {
            GamePhase::Ready => {
                self.phase = GamePhase::Playing;
                info!("Game started ({})", self.tier);
                Ok(())
            }
            other => Err(format!("Cannot start a game in phase {:?}", other)),
        }
    }

    pub fn pause(&mut self) -> Result<(), String> {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                info!("Game paused at tick {}", self.tick);
                Ok(())
            }
            other => Err(format!("Cannot pause a game in phase {:?}", other)),
        }
    }

    pub fn resume(&mut self) -> Result<(), String> {
        match self.phase {
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                info!("Game resumed at tick {}", self.tick);
                Ok(())
            }
            other => Err(format!("Cannot resume a game in phase {:?}", other)),
        }
    }

    /// Single start/pause button: Ready starts, Playing pauses,
    /// Paused resumes, GameOver resets
    pub fn toggle_pause(&mut self, rng: &mut dyn RandomSource) -> Result<GamePhase, String> {
        match self.phase {
            GamePhase::Ready => self.start()?,
            GamePhase::Playing => self.pause()?,
            GamePhase::Paused => self.resume()?,
            GamePhase::GameOver => self.reset(rng)?,
        }
        Ok(self.phase)
    }

    /// Switches the AI tier; refused while a game is running
    pub fn set_difficulty(&mut self, tier: Difficulty) -> Result<(), String> {
        if self.phase == GamePhase::Playing {
            return Err("Difficulty cannot change while a game is running".to_string());
        }
        self.tier = tier;
        self.ai_controller = Controller::Ai(AiController::new(tier, &self.config));
        info!("Difficulty set to {}", tier);
        Ok(())
    }

    /// Queues the human player's next heading
    pub fn queue_player_direction(&mut self, direction: Direction) -> Result<(), String> {
        if self.phase != GamePhase::Playing {
            return Err(format!("Input ignored in phase {:?}", self.phase));
        }
        self.player_controller.queue_input(direction);
        Ok(())
    }

    /// Advances the simulation by one tick
    ///
    /// Order: decide, move both snakes, check collisions, check food.
    pub fn step(&mut self, rng: &mut dyn RandomSource) -> Result<TickReport, String> {
        if self.phase != GamePhase::Playing {
            return Err(format!("Cannot step a game in phase {:?}", self.phase));
        }

        self.tick += 1;
        let tick = self.tick;

        let player_view = TickView {
            tick,
            me: &self.player,
            opponent: self.ai.body(),
            food: self.food,
            bounds: self.bounds,
        };
        let player_direction = self.player_controller.next_direction(&player_view, rng);

        let ai_view = TickView {
            tick,
            me: &self.ai,
            opponent: self.player.body(),
            food: self.food,
            bounds: self.bounds,
        };
        let ai_direction = self.ai_controller.next_direction(&ai_view, rng);
        let ai_decision = self.ai_controller.as_ai().and_then(|ai| ai.last_decision());
        let ai_head = self.ai.head();
        let food = self.food;

        self.player.set_direction(player_direction);
        self.ai.set_direction(ai_direction);
        self.player.advance();
        self.ai.advance();

        let mut report = TickReport {
            tick,
            ai_decision,
            ai_head,
            food,
            player_ate: false,
            ai_ate: false,
            outcome: None,
        };

        if let Some(cause) = collision_cause(&self.player, &self.ai, &self.bounds) {
            self.finish(Outcome {
                winner: Winner::Ai,
                cause,
            });
            report.outcome = self.outcome;
            return Ok(report);
        }

        if let Some(cause) = collision_cause(&self.ai, &self.player, &self.bounds) {
            self.finish(Outcome {
                winner: Winner::Player,
                cause,
            });
            report.outcome = self.outcome;
            return Ok(report);
        }

        if self.player.head() == self.food {
            self.player.grow();
            self.player_score += 1;
            report.player_ate = true;
            if !self.spawn_food(rng) {
                self.finish(Outcome {
                    winner: Winner::Draw,
                    cause: EndCause::BoardFull,
                });
            }
        }

        if self.phase == GamePhase::Playing && self.ai.head() == self.food {
            self.ai.grow();
            self.ai_score += 1;
            report.ai_ate = true;
            if !self.spawn_food(rng) {
                self.finish(Outcome {
                    winner: Winner::Draw,
                    cause: EndCause::BoardFull,
                });
            }
        }

        report.outcome = self.outcome;
        debug!(
            "Tick {}: player {:?} ai {:?} food {:?}",
            tick,
            self.player.head(),
            self.ai.head(),
            self.food
        );
        Ok(report)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.phase = GamePhase::GameOver;
        self.outcome = Some(outcome);
        info!(
            "Game over at tick {}: {:?} ({:?}), score {}",
            self.tick, outcome.winner, outcome.cause, self.player_score
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            phase: self.phase,
            difficulty: self.tier,
            bounds: self.bounds,
            food: self.food,
            player: SnakeSnapshot {
                body: self.player.body().to_vec(),
                direction: self.player.direction(),
                score: self.player_score,
            },
            ai: SnakeSnapshot {
                body: self.ai.body().to_vec(),
                direction: self.ai.direction(),
                score: self.ai_score,
            },
            outcome: self.outcome,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn difficulty(&self) -> Difficulty {
        self.tier
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn food(&self) -> Coord {
        self.food
    }

    pub fn player(&self) -> &Snake {
        &self.player
    }

    pub fn ai(&self) -> &Snake {
        &self.ai
    }

    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Places food explicitly (scripted scenarios)
    pub fn place_food(&mut self, food: Coord) -> Result<(), String> {
        if !self.bounds.contains(&food) || self.player.occupies(&food) || self.ai.occupies(&food) {
            return Err(format!("Food cannot be placed at ({}, {})", food.x, food.y));
        }
        self.food = food;
        Ok(())
    }
}

/// Why `snake` died this tick, if it did
fn collision_cause(snake: &Snake, other: &Snake, bounds: &GridBounds) -> Option<EndCause> {
    if snake.hits_wall(bounds) {
        Some(EndCause::Wall)
    } else if snake.hits_self() {
        Some(EndCause::SelfCollision)
    } else if snake.hits_body(other.body()) {
        Some(EndCause::OpponentCollision)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    #[test]
    fn test_spawn_heads_default_grid() {
        let bounds = GridBounds::new(30, 20).unwrap();
        assert_eq!(spawn_heads(&bounds), (Coord::new(22, 10), Coord::new(7, 10)));
    }

    #[test]
    fn test_small_grid_is_rejected() {
        let mut config = Config::default_hardcoded();
        config.arena.width = 8;
        config.arena.height = 6;
        let mut rng = SeededRandom::new(1);
        assert!(Arena::new(&config, Difficulty::Easy, &mut rng).is_err());
    }

    #[test]
    fn test_food_never_on_a_snake() {
        let config = Config::default_hardcoded();
        let mut rng = SeededRandom::new(3);
        let mut arena = Arena::new(&config, Difficulty::Hard, &mut rng).unwrap();
        for _ in 0..200 {
            assert!(arena.spawn_food(&mut rng));
            let food = arena.food();
            assert!(!arena.player().occupies(&food));
            assert!(!arena.ai().occupies(&food));
            assert!(arena.bounds().contains(&food));
        }
    }

    #[test]
    fn test_collision_cause_precedence() {
        let bounds = GridBounds::new(10, 10).unwrap();
        let outside = Snake::from_body(vec![Coord::new(-1, 0)], Direction::Left).unwrap();
        let other = Snake::from_body(vec![Coord::new(-1, 0)], Direction::Left).unwrap();
        assert_eq!(collision_cause(&outside, &other, &bounds), Some(EndCause::Wall));

        let head_on = Snake::from_body(vec![Coord::new(4, 4)], Direction::Left).unwrap();
        let blocker = Snake::from_body(vec![Coord::new(4, 4), Coord::new(5, 4)], Direction::Left).unwrap();
        assert_eq!(
            collision_cause(&head_on, &blocker, &bounds),
            Some(EndCause::OpponentCollision)
        );
    }

    /// Playing EASY arena on the default grid; EASY holds course on tick 1
    fn playing_arena() -> Arena {
        let config = Config::default_hardcoded();
        let mut rng = SeededRandom::new(5);
        let mut arena = Arena::new(&config, Difficulty::Easy, &mut rng).unwrap();
        arena.start().unwrap();
        arena
    }

    #[test]
    fn test_ai_hitting_the_wall_hands_the_win_to_the_player() {
        let mut arena = playing_arena();
        let ai_body = vec![Coord::new(0, 10), Coord::new(1, 10), Coord::new(2, 10)];
        arena.ai = Snake::from_body(ai_body, Direction::Left).unwrap();
        let food = arena.food();

        let report = arena.step(&mut SeededRandom::new(1)).unwrap();
        assert_eq!(
            report.outcome,
            Some(Outcome {
                winner: Winner::Player,
                cause: EndCause::Wall,
            })
        );
        assert_eq!(arena.phase(), GamePhase::GameOver);

        // The report keeps the head the decision was made from
        assert_eq!(report.ai_head, Coord::new(0, 10));
        assert_eq!(arena.ai().head(), Coord::new(-1, 10));
        assert_eq!(report.food, food);
    }

    #[test]
    fn test_ai_running_into_the_player_loses() {
        let mut arena = playing_arena();
        let ai_body = vec![Coord::new(21, 9), Coord::new(21, 8), Coord::new(21, 7)];
        arena.ai = Snake::from_body(ai_body, Direction::Down).unwrap();

        let report = arena.step(&mut SeededRandom::new(1)).unwrap();
        assert_eq!(
            report.outcome,
            Some(Outcome {
                winner: Winner::Player,
                cause: EndCause::OpponentCollision,
            })
        );
    }

    #[test]
    fn test_player_biting_itself_ends_the_game() {
        let mut arena = playing_arena();
        let coiled = vec![
            Coord::new(10, 5),
            Coord::new(11, 5),
            Coord::new(11, 6),
            Coord::new(10, 6),
            Coord::new(9, 6),
        ];
        arena.player = Snake::from_body(coiled, Direction::Left).unwrap();
        arena.queue_player_direction(Direction::Down).unwrap();

        let report = arena.step(&mut SeededRandom::new(1)).unwrap();
        assert_eq!(
            report.outcome,
            Some(Outcome {
                winner: Winner::Ai,
                cause: EndCause::SelfCollision,
            })
        );
    }

    #[test]
    fn test_eating_the_last_free_cell_is_a_draw() {
        let mut arena = playing_arena();
        arena.bounds = GridBounds::new(3, 2).unwrap();
        arena.player = Snake::from_body(vec![Coord::new(1, 0), Coord::new(0, 0)], Direction::Right).unwrap();
        arena.ai = Snake::from_body(vec![Coord::new(1, 1), Coord::new(0, 1)], Direction::Right).unwrap();
        arena.player.grow();
        arena.ai.grow();
        arena.food = Coord::new(2, 0);

        let report = arena.step(&mut SeededRandom::new(1)).unwrap();
        assert!(report.player_ate);
        assert!(!report.ai_ate);
        assert_eq!(
            report.outcome,
            Some(Outcome {
                winner: Winner::Draw,
                cause: EndCause::BoardFull,
            })
        );
        assert_eq!(arena.player_score(), 1);
        assert_eq!(arena.phase(), GamePhase::GameOver);
    }
}
