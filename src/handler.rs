// HTTP handler bindings for the Snake Duel session API
//
// The front-end owns rendering, input capture and the tick timer. These
// routes expose one arena session to it:
// - Deserializing incoming JSON requests
// - Locking the shared session from Rocket's managed state
// - Delegating to Arena methods
// - Serializing snapshots back

use log::{error, info};
use parking_lot::Mutex;
use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::arena::{Arena, Snapshot, TickReport};
use crate::config::{Config, Difficulty};
use crate::debug_logger::{DebugLogger, DecisionLogEntry};
use crate::rng::SeededRandom;
use crate::types::Direction;

type ApiResult<T> = Result<Json<T>, (Status, String)>;

struct Session {
    arena: Arena,
    rng: SeededRandom,
}

/// Shared server state: configuration, the live session and the decision log
pub struct SessionServer {
    config: Config,
    session: Mutex<Session>,
    logger: DebugLogger,
}

impl SessionServer {
    pub fn new(config: Config, logger: DebugLogger) -> Result<Self, String> {
        let session = Self::new_session(&config, config.arena.default_difficulty)?;
        Ok(SessionServer {
            config,
            session: Mutex::new(session),
            logger,
        })
    }

    fn new_session(config: &Config, difficulty: Difficulty) -> Result<Session, String> {
        let mut rng = match config.arena.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        let arena = Arena::new(config, difficulty, &mut rng)?;
        info!("New session (difficulty {}, seed {})", difficulty, rng.seed());
        Ok(Session { arena, rng })
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.lock().arena.snapshot()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyRequest {
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
pub struct TickResponse {
    pub report: TickReport,
    pub snapshot: Snapshot,
}

fn conflict(message: String) -> (Status, String) {
    (Status::Conflict, message)
}

/// GET / endpoint
/// Returns game metadata for the front-end
#[get("/")]
pub fn index(server: &State<SessionServer>) -> Json<Value> {
    let arena = &server.config.arena;
    Json(json!({
        "name": "snake-duel",
        "version": env!("CARGO_PKG_VERSION"),
        "difficulties": Difficulty::all(),
        "default_difficulty": arena.default_difficulty,
        "grid": { "width": arena.width, "height": arena.height },
        "tick_interval_ms": arena.tick_interval_ms,
    }))
}

/// POST /session endpoint
/// Replaces the current session with a fresh Ready arena
#[post("/session", format = "json", data = "<req>")]
pub fn new_session(server: &State<SessionServer>, req: Json<NewSessionRequest>) -> ApiResult<Snapshot> {
    let difficulty = req
        .difficulty
        .unwrap_or(server.config.arena.default_difficulty);
    let session = SessionServer::new_session(&server.config, difficulty)
        .map_err(|e| (Status::BadRequest, e))?;

    let mut guard = server.session.lock();
    *guard = session;
    Ok(Json(guard.arena.snapshot()))
}

/// GET /session endpoint
#[get("/session")]
pub fn get_session(server: &State<SessionServer>) -> Json<Snapshot> {
    Json(server.snapshot())
}

/// POST /session/direction endpoint
/// Queues the player's heading for the next tick
#[post("/session/direction", format = "json", data = "<req>")]
pub fn queue_direction(server: &State<SessionServer>, req: Json<DirectionRequest>) -> ApiResult<Snapshot> {
    let mut guard = server.session.lock();
    guard
        .arena
        .queue_player_direction(req.direction)
        .map_err(conflict)?;
    Ok(Json(guard.arena.snapshot()))
}

/// POST /session/tick endpoint
/// Advances the game by one step
#[post("/session/tick")]
pub fn tick(server: &State<SessionServer>) -> ApiResult<TickResponse> {
    let mut guard = server.session.lock();
    let session = &mut *guard;
    let report = session.arena.step(&mut session.rng).map_err(conflict)?;

    if let Some(decision) = report.ai_decision {
        server.logger.log_decision(DecisionLogEntry::new(
            report.tick,
            session.arena.difficulty(),
            decision,
            report.ai_head,
            report.food,
        ));
    }

    Ok(Json(TickResponse {
        report,
        snapshot: session.arena.snapshot(),
    }))
}

/// POST /session/toggle endpoint
/// Start, pause, resume or restart depending on the phase
#[post("/session/toggle")]
pub fn toggle(server: &State<SessionServer>) -> ApiResult<Snapshot> {
    let mut guard = server.session.lock();
    let session = &mut *guard;
    session
        .arena
        .toggle_pause(&mut session.rng)
        .map_err(|e| (Status::InternalServerError, e))?;
    Ok(Json(session.arena.snapshot()))
}

/// POST /session/difficulty endpoint
/// Refused while a game is running
#[post("/session/difficulty", format = "json", data = "<req>")]
pub fn set_difficulty(server: &State<SessionServer>, req: Json<DifficultyRequest>) -> ApiResult<Snapshot> {
    let mut guard = server.session.lock();
    guard.arena.set_difficulty(req.difficulty).map_err(conflict)?;
    Ok(Json(guard.arena.snapshot()))
}

/// Builds the Rocket instance around a session server
pub fn build_rocket(config: Config, logger: DebugLogger) -> Result<Rocket<Build>, String> {
    let server = SessionServer::new(config, logger).map_err(|e| {
        error!("Could not create session: {}", e);
        e
    })?;

    Ok(rocket::build()
        .manage(server)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "snake-duel");
            })
        }))
        .mount(
            "/",
            routes![
                index,
                new_session,
                get_session,
                queue_direction,
                tick,
                toggle,
                set_difficulty
            ],
        ))
}
