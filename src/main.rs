#[macro_use]
extern crate rocket;

use log::{error, info};
use std::env;
use std::process;

use snake_duel::config::Config;
use snake_duel::debug_logger::DebugLogger;
use snake_duel::handler;

#[launch]
async fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Snake Duel server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;

    match handler::build_rocket(config, logger) {
        Ok(rocket) => rocket,
        Err(e) => {
            error!("Startup failed: {}", e);
            process::exit(1);
        }
    }
}
