// Integration tests for the HTTP session routes using Rocket's local client

use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::Value;

use snake_duel::config::Config;
use snake_duel::debug_logger::DebugLogger;
use snake_duel::handler::build_rocket;

fn client() -> Client {
    let mut config = Config::default_hardcoded();
    config.arena.seed = Some(17);
    let rocket = build_rocket(config, DebugLogger::disabled()).expect("session should build");
    Client::tracked(rocket).expect("valid rocket instance")
}

fn post_json(client: &Client, uri: &str, body: &str) -> (Status, Option<Value>) {
    let response = client
        .post(uri)
        .header(ContentType::JSON)
        .body(body)
        .dispatch();
    let status = response.status();
    (status, response.into_json::<Value>())
}

fn post_empty(client: &Client, uri: &str) -> (Status, Option<Value>) {
    let response = client.post(uri).dispatch();
    let status = response.status();
    (status, response.into_json::<Value>())
}

#[test]
fn test_index_reports_metadata() {
    let client = client();
    let response = client.get("/").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().unwrap();
    assert_eq!(body["name"], "snake-duel");
    assert_eq!(body["grid"]["width"], 30);
    assert_eq!(body["tick_interval_ms"], 150);
    assert_eq!(body["difficulties"][2], "hard");
}

#[test]
fn test_new_session_uses_requested_difficulty() {
    let client = client();
    let (status, body) = post_json(&client, "/session", r#"{"difficulty":"hard"}"#);
    assert_eq!(status, Status::Ok);
    let body = body.unwrap();
    assert_eq!(body["phase"], "ready");
    assert_eq!(body["difficulty"], "hard");

    let (status, body) = post_json(&client, "/session", "{}");
    assert_eq!(status, Status::Ok);
    assert_eq!(body.unwrap()["difficulty"], "easy");
}

#[test]
fn test_tick_before_start_is_a_conflict() {
    let client = client();
    let (status, _) = post_empty(&client, "/session/tick");
    assert_eq!(status, Status::Conflict);
}

#[test]
fn test_full_round_trip_through_a_game() {
    let client = client();
    post_json(&client, "/session", r#"{"difficulty":"medium"}"#);

    let (status, body) = post_empty(&client, "/session/toggle");
    assert_eq!(status, Status::Ok);
    assert_eq!(body.unwrap()["phase"], "playing");

    let (status, _) = post_json(&client, "/session/direction", r#"{"direction":"up"}"#);
    assert_eq!(status, Status::Ok);

    let (status, body) = post_empty(&client, "/session/tick");
    assert_eq!(status, Status::Ok);
    let body = body.unwrap();
    assert_eq!(body["report"]["tick"], 1);
    assert!(body["report"]["ai_decision"]["reason"].is_string());
    assert_eq!(body["report"]["ai_head"]["x"], 7);
    assert_eq!(body["report"]["ai_head"]["y"], 10);
    assert_eq!(body["snapshot"]["player"]["direction"], "up");
    assert_eq!(body["snapshot"]["player"]["body"][0]["y"], 9);

    let (status, _) = post_json(&client, "/session/difficulty", r#"{"difficulty":"hard"}"#);
    assert_eq!(status, Status::Conflict);

    let (status, body) = post_empty(&client, "/session/toggle");
    assert_eq!(status, Status::Ok);
    assert_eq!(body.unwrap()["phase"], "paused");

    let (status, body) = post_json(&client, "/session/difficulty", r#"{"difficulty":"hard"}"#);
    assert_eq!(status, Status::Ok);
    assert_eq!(body.unwrap()["difficulty"], "hard");

    let response = client.get("/session").dispatch();
    let snapshot: Value = response.into_json().unwrap();
    assert_eq!(snapshot["tick"], 1);
    assert_eq!(snapshot["phase"], "paused");
}

#[test]
fn test_unknown_direction_is_rejected() {
    let client = client();
    post_empty(&client, "/session/toggle");
    let (status, _) = post_json(&client, "/session/direction", r#"{"direction":"sideways"}"#);
    assert_eq!(status, Status::UnprocessableEntity);
}
