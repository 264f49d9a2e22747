// Controllers supply each snake's next heading
//
// A snake is driven either by queued human input or by the AI decision
// orchestrator. The orchestrator throttles re-decisions by the tier's update
// rate and otherwise delegates to the difficulty policy engine.

use log::debug;

use crate::config::{Config, Difficulty, EasyBehaviorConfig, TierConfig};
use crate::policy::{self, Decision, DecisionContext, DecisionReason};
use crate::rng::RandomSource;
use crate::snake::Snake;
use crate::types::{Coord, Direction, GridBounds};

/// Everything a controller may look at during one tick
#[derive(Debug, Clone, Copy)]
pub struct TickView<'a> {
    pub tick: u64,
    pub me: &'a Snake,
    pub opponent: &'a [Coord],
    pub food: Coord,
    pub bounds: GridBounds,
}

/// Per-snake decision counters, never shared between snakes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiState {
    /// Calls to decide_next_move, throttled or not
    pub ticks_seen: u64,
    /// Tick of the last evaluation; a fresh session counts from tick 0
    pub last_decision_tick: u64,
    pub decisions_made: u64,
    /// Direction returned while throttled
    pub held: Option<Direction>,
}

/// Decision orchestrator for the computer-controlled snake
pub struct AiController {
    tier: Difficulty,
    tier_config: TierConfig,
    easy: EasyBehaviorConfig,
    state: AiState,
    last_decision: Option<Decision>,
}

impl AiController {
    /// Creates a controller for a tier using the knobs from the configuration
    pub fn new(tier: Difficulty, config: &Config) -> Self {
        Self::with_settings(tier, *config.tiers.for_tier(tier), config.easy.clone())
    }

    /// Creates a controller with explicit knobs (tests and tuning)
    pub fn with_settings(tier: Difficulty, tier_config: TierConfig, easy: EasyBehaviorConfig) -> Self {
        AiController {
            tier,
            tier_config,
            easy,
            state: AiState::default(),
            last_decision: None,
        }
    }

    pub fn tier(&self) -> Difficulty {
        self.tier
    }

    pub fn tier_config(&self) -> &TierConfig {
        &self.tier_config
    }

    pub fn state(&self) -> &AiState {
        &self.state
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    /// Clears all counters, as at the start of a session
    pub fn reset(&mut self) {
        self.state = AiState::default();
        self.last_decision = None;
    }

    /// Chooses the AI snake's heading for this tick
    ///
    /// Must be called once per simulation step, before the snakes advance.
    /// Within the update-rate window the previously chosen direction is
    /// returned unchanged; the window of a fresh controller opens at tick 0.
    ///
    /// # Arguments
    /// * `view` - Current tick, own snake, opponent body, food and grid
    /// * `rng` - Random source for the tier policy
    pub fn decide_next_move(&mut self, view: &TickView, rng: &mut dyn RandomSource) -> Decision {
        self.state.ticks_seen += 1;

        if view.tick.saturating_sub(self.state.last_decision_tick) < self.tier_config.update_rate {
            let held = self.state.held.unwrap_or_else(|| view.me.direction());
            let decision = Decision::new(held, DecisionReason::Throttled);
            self.last_decision = Some(decision);
            return decision;
        }

        self.state.last_decision_tick = view.tick;
        self.state.decisions_made += 1;

        let ctx = DecisionContext {
            me: view.me,
            opponent: view.opponent,
            food: view.food,
            bounds: view.bounds,
            tick: view.tick,
            decisions_made: self.state.decisions_made,
        };
        let decision = policy::decide(self.tier, &self.tier_config, &self.easy, &ctx, rng);

        self.state.held = Some(decision.direction);
        self.last_decision = Some(decision);
        decision
    }
}

/// Latest-wins buffer for player input between ticks
#[derive(Debug, Clone, Default)]
pub struct HumanController {
    pending: Option<Direction>,
}

impl HumanController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a requested heading; applied at the next tick
    pub fn queue(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Takes the queued heading, or keeps the current one
    pub fn take(&mut self, current: Direction) -> Direction {
        self.pending.take().unwrap_or(current)
    }
}

/// How a snake gets its next heading
pub enum Controller {
    Human(HumanController),
    Ai(AiController),
}

impl Controller {
    /// Heading to apply before this tick's advance
    pub fn next_direction(&mut self, view: &TickView, rng: &mut dyn RandomSource) -> Direction {
        match self {
            Controller::Human(human) => {
                let direction = human.take(view.me.direction());
                debug!("Player tick {}: {}", view.tick, direction);
                direction
            }
            Controller::Ai(ai) => ai.decide_next_move(view, rng).direction,
        }
    }

    /// Forwards input to a human controller; ignored for the AI
    pub fn queue_input(&mut self, direction: Direction) -> bool {
        match self {
            Controller::Human(human) => {
                human.queue(direction);
                true
            }
            Controller::Ai(_) => false,
        }
    }

    pub fn as_ai(&self) -> Option<&AiController> {
        match self {
            Controller::Ai(ai) => Some(ai),
            Controller::Human(_) => None,
        }
    }

    pub fn reset(&mut self) {
        match self {
            Controller::Human(human) => *human = HumanController::new(),
            Controller::Ai(ai) => ai.reset(),
        }
    }
}
