// Integration tests for the arena game loop: lifecycle, movement, food and collisions

use snake_duel::arena::{Arena, EndCause, GamePhase, Winner};
use snake_duel::config::{Config, Difficulty};
use snake_duel::rng::SeededRandom;
use snake_duel::types::{Coord, Direction};

fn new_arena(tier: Difficulty, seed: u64) -> (Arena, SeededRandom) {
    let mut rng = SeededRandom::new(seed);
    let arena = Arena::new(&Config::default_hardcoded(), tier, &mut rng).unwrap();
    (arena, rng)
}

#[test]
fn test_new_arena_is_ready_with_spawned_snakes() {
    let (arena, _) = new_arena(Difficulty::Easy, 1);

    assert_eq!(arena.phase(), GamePhase::Ready);
    assert_eq!(arena.tick(), 0);
    assert_eq!(
        arena.player().body(),
        &[Coord::new(22, 10), Coord::new(21, 10), Coord::new(20, 10)]
    );
    assert_eq!(arena.player().direction(), Direction::Right);
    assert_eq!(
        arena.ai().body(),
        &[Coord::new(7, 10), Coord::new(8, 10), Coord::new(9, 10)]
    );
    assert_eq!(arena.ai().direction(), Direction::Left);

    let food = arena.food();
    assert!(arena.bounds().contains(&food));
    assert!(!arena.player().occupies(&food));
    assert!(!arena.ai().occupies(&food));
}

#[test]
fn test_step_and_input_require_playing_phase() {
    let (mut arena, mut rng) = new_arena(Difficulty::Easy, 2);
    assert!(arena.step(&mut rng).is_err());
    assert!(arena.queue_player_direction(Direction::Up).is_err());
    assert_eq!(arena.tick(), 0);
}

#[test]
fn test_toggle_cycles_through_phases() {
    let (mut arena, mut rng) = new_arena(Difficulty::Medium, 3);

    assert_eq!(arena.toggle_pause(&mut rng).unwrap(), GamePhase::Playing);
    assert_eq!(arena.toggle_pause(&mut rng).unwrap(), GamePhase::Paused);
    assert!(arena.step(&mut rng).is_err());
    assert_eq!(arena.toggle_pause(&mut rng).unwrap(), GamePhase::Playing);
    assert!(arena.step(&mut rng).is_ok());
    assert_eq!(arena.tick(), 1);
}

#[test]
fn test_difficulty_locked_while_playing() {
    let (mut arena, _) = new_arena(Difficulty::Easy, 4);

    arena.start().unwrap();
    assert!(arena.set_difficulty(Difficulty::Hard).is_err());
    assert_eq!(arena.difficulty(), Difficulty::Easy);

    arena.pause().unwrap();
    arena.set_difficulty(Difficulty::Hard).unwrap();
    assert_eq!(arena.difficulty(), Difficulty::Hard);
    assert_eq!(arena.snapshot().difficulty, Difficulty::Hard);
}

#[test]
fn test_player_input_turns_and_reversal_is_ignored() {
    let (mut arena, mut rng) = new_arena(Difficulty::Hard, 5);
    arena.start().unwrap();

    arena.queue_player_direction(Direction::Left).unwrap();
    arena.step(&mut rng).unwrap();
    assert_eq!(arena.player().head(), Coord::new(23, 10));
    assert_eq!(arena.player().direction(), Direction::Right);

    arena.queue_player_direction(Direction::Up).unwrap();
    arena.step(&mut rng).unwrap();
    assert_eq!(arena.player().head(), Coord::new(23, 9));
    assert_eq!(arena.player().direction(), Direction::Up);
}

#[test]
fn test_player_eats_and_grows_next_tick() {
    let (mut arena, mut rng) = new_arena(Difficulty::Hard, 6);
    arena.place_food(Coord::new(23, 10)).unwrap();
    arena.start().unwrap();

    let report = arena.step(&mut rng).unwrap();
    assert!(report.player_ate);
    assert_eq!(arena.player_score(), 1);
    assert_eq!(arena.player().len(), 3);
    assert_ne!(arena.food(), Coord::new(23, 10));
    assert!(!arena.player().occupies(&arena.food()));

    arena.step(&mut rng).unwrap();
    assert_eq!(arena.player().len(), 4);
    assert_eq!(arena.snapshot().player.score, 1);
}

#[test]
fn test_player_hitting_the_wall_hands_the_win_to_the_ai() {
    let (mut arena, mut rng) = new_arena(Difficulty::Hard, 7);
    arena.place_food(Coord::new(2, 10)).unwrap();
    arena.start().unwrap();

    for tick in 1..=7 {
        let report = arena.step(&mut rng).unwrap();
        assert_eq!(report.outcome, None, "game ended early at tick {}", tick);
        assert!(report.ai_decision.is_some());
        if tick == 5 {
            assert!(report.ai_ate, "HARD should reach food five cells ahead");
        }
    }
    assert_eq!(arena.player().head(), Coord::new(29, 10));
    assert!(arena.ai().len() >= 4);

    let report = arena.step(&mut rng).unwrap();
    let outcome = report.outcome.unwrap();
    assert_eq!(outcome.winner, Winner::Ai);
    assert_eq!(outcome.cause, EndCause::Wall);
    assert_eq!(arena.phase(), GamePhase::GameOver);
    assert!(arena.step(&mut rng).is_err());

    assert_eq!(arena.toggle_pause(&mut rng).unwrap(), GamePhase::Ready);
    assert_eq!(arena.tick(), 0);
    assert_eq!(arena.outcome(), None);
    assert_eq!(arena.player().head(), Coord::new(22, 10));
    assert_eq!(arena.ai().len(), 3);
}

#[test]
fn test_snapshot_serializes_for_the_front_end() {
    let (arena, _) = new_arena(Difficulty::Medium, 8);
    let value = serde_json::to_value(arena.snapshot()).unwrap();

    assert_eq!(value["phase"], "ready");
    assert_eq!(value["difficulty"], "medium");
    assert_eq!(value["bounds"]["width"], 30);
    assert_eq!(value["player"]["body"][0]["x"], 22);
    assert_eq!(value["ai"]["direction"], "left");
    assert!(value["outcome"].is_null());
}

#[test]
fn test_long_game_never_places_food_on_a_snake() {
    let (mut arena, mut rng) = new_arena(Difficulty::Easy, 9);
    arena.start().unwrap();

    for _ in 0..300 {
        match arena.step(&mut rng) {
            Ok(report) if report.outcome.is_none() => {
                let food = arena.food();
                assert!(!arena.player().occupies(&food));
                assert!(!arena.ai().occupies(&food));
            }
            _ => break,
        }
    }
}
