// Offline tier evaluation
//
// Replays many AI decisions against a frozen scenario and measures how often
// each tier steps toward the food. Tiers run in parallel on the rayon pool.

use log::info;
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

use crate::config::{Config, Difficulty};
use crate::controller::{AiController, TickView};
use crate::policy::{Decision, DecisionReason};
use crate::rng::SeededRandom;
use crate::snake::Snake;
use crate::types::{manhattan_distance, Coord, Direction, GridBounds};

/// A frozen board the AI is re-placed on before every decision
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub bounds: GridBounds,
    pub me: Snake,
    pub opponent: Vec<Coord>,
    pub food: Coord,
}

impl Scenario {
    pub fn new(
        name: &str,
        bounds: GridBounds,
        body: Vec<Coord>,
        direction: Direction,
        opponent: Vec<Coord>,
        food: Coord,
    ) -> Result<Self, String> {
        let me = Snake::from_body(body, direction)?;
        if !me.body().iter().all(|c| bounds.contains(c)) {
            return Err(format!("Scenario '{}': snake leaves the grid", name));
        }
        if !bounds.contains(&food) || me.occupies(&food) || opponent.contains(&food) {
            return Err(format!("Scenario '{}': food cell is not free", name));
        }
        Ok(Scenario {
            name: name.to_string(),
            bounds,
            me,
            opponent,
            food,
        })
    }

    /// Straight snake heading at food seven cells ahead, opponent far away
    pub fn open_field() -> Self {
        Scenario {
            name: "open_field".to_string(),
            bounds: GridBounds { width: 20, height: 20 },
            me: Snake::spawn(Coord::new(5, 10), Direction::Right, 3),
            opponent: vec![Coord::new(15, 3), Coord::new(16, 3), Coord::new(17, 3)],
            food: Coord::new(12, 10),
        }
    }

    /// Food straight ahead but the cell in front is the opponent's body
    pub fn blocked_lane() -> Self {
        Scenario {
            name: "blocked_lane".to_string(),
            bounds: GridBounds { width: 20, height: 20 },
            me: Snake::spawn(Coord::new(5, 10), Direction::Right, 3),
            opponent: vec![Coord::new(6, 10), Coord::new(6, 11), Coord::new(6, 12)],
            food: Coord::new(12, 10),
        }
    }

    /// True when moving `direction` shortens the Manhattan distance to food
    pub fn approaches_food(&self, direction: Direction) -> bool {
        let head = self.me.head();
        manhattan_distance(direction.apply(&head), self.food) < manhattan_distance(head, self.food)
    }
}

/// Aggregated outcome of one tier on one scenario
#[derive(Debug, Clone)]
pub struct TierStats {
    pub tier: Difficulty,
    pub scenario: String,
    pub decisions: usize,
    pub approaches: usize,
    /// Decisions that named the reverse of the current heading
    pub reversal_attempts: usize,
    pub reasons: HashMap<DecisionReason, usize>,
    pub elapsed_ms: u128,
}

impl TierStats {
    fn new(tier: Difficulty, scenario: &str) -> Self {
        TierStats {
            tier,
            scenario: scenario.to_string(),
            decisions: 0,
            approaches: 0,
            reversal_attempts: 0,
            reasons: HashMap::new(),
            elapsed_ms: 0,
        }
    }

    fn record(&mut self, scenario: &Scenario, decision: Decision) {
        self.decisions += 1;
        if scenario.approaches_food(decision.direction) {
            self.approaches += 1;
        }
        if decision.direction == scenario.me.direction().opposite() {
            self.reversal_attempts += 1;
        }
        *self.reasons.entry(decision.reason).or_insert(0) += 1;
    }

    /// Fraction of decisions that moved toward the food
    pub fn approach_rate(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.approaches as f64 / self.decisions as f64
        }
    }

    pub fn reason_count(&self, reason: DecisionReason) -> usize {
        self.reasons.get(&reason).copied().unwrap_or(0)
    }
}

/// Runs tier controllers against scenarios
pub struct TierEvaluator {
    config: Config,
}

impl TierEvaluator {
    pub fn new(config: Config) -> Self {
        TierEvaluator { config }
    }

    /// Collects `decisions` fresh decisions of one tier
    ///
    /// Calls land on ticks `update_rate, 2 * update_rate, ...`, the same
    /// ticks a live session evaluates on, so none is throttled and tick-keyed
    /// overrides such as the EASY freeze show up in the counts.
    ///
    /// # Arguments
    /// * `tier` - Difficulty under test
    /// * `scenario` - Board the AI is placed on for every decision
    /// * `decisions` - Number of decisions to sample
    /// * `seed` - Seed for the policy's random source
    pub fn run(&self, tier: Difficulty, scenario: &Scenario, decisions: usize, seed: u64) -> TierStats {
        let start = Instant::now();
        let mut controller = AiController::new(tier, &self.config);
        let mut rng = SeededRandom::new(seed);
        let stride = controller.tier_config().update_rate.max(1);
        let mut stats = TierStats::new(tier, &scenario.name);

        for i in 0..decisions as u64 {
            let view = TickView {
                tick: (i + 1) * stride,
                me: &scenario.me,
                opponent: &scenario.opponent,
                food: scenario.food,
                bounds: scenario.bounds,
            };
            let decision = controller.decide_next_move(&view, &mut rng);
            stats.record(scenario, decision);
        }

        stats.elapsed_ms = start.elapsed().as_millis();
        info!(
            "{} on {}: {}/{} approaches",
            tier, scenario.name, stats.approaches, stats.decisions
        );
        stats
    }

    /// Evaluates every tier in parallel, in easy/medium/hard order
    pub fn evaluate_all(&self, scenario: &Scenario, decisions: usize, seed: u64) -> Vec<TierStats> {
        Difficulty::all()[..]
            .par_iter()
            .map(|tier| self.run(*tier, scenario, decisions, seed))
            .collect()
    }

    /// Prints a table of approach rates and decision reasons
    pub fn print_report(&self, results: &[TierStats]) {
        println!("\n═══════════════════════════════════════════════════════════");
        println!("                  TIER EVALUATION REPORT");
        println!("═══════════════════════════════════════════════════════════");

        for stats in results {
            println!(
                "{:<7} {:<14} approach {:>5.1}%  reversals {:>4}  ({} decisions, {}ms)",
                stats.tier.as_str(),
                stats.scenario,
                stats.approach_rate() * 100.0,
                stats.reversal_attempts,
                stats.decisions,
                stats.elapsed_ms
            );

            let mut reasons: Vec<_> = stats.reasons.iter().collect();
            reasons.sort_by(|a, b| b.1.cmp(a.1).then(a.0.as_str().cmp(b.0.as_str())));
            for (reason, count) in reasons {
                println!("          {:<20} {}", reason.as_str(), count);
            }
        }
        println!("═══════════════════════════════════════════════════════════\n");
    }
}
