// Library exports for Snake Duel
// The server binary, the tier evaluator and the integration tests share the core

#[macro_use]
extern crate rocket;

pub mod arena;
pub mod config;
pub mod controller;
pub mod debug_logger;
pub mod evaluation;
pub mod handler;
pub mod occupancy;
pub mod pathfinder;
pub mod policy;
pub mod rng;
pub mod snake;
pub mod types;
