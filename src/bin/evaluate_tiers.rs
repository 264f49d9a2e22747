// Offline tier evaluation tool
//
// Usage:
//   cargo run --bin evaluate_tiers -- [options]
//
// Options:
//   --decisions <n>        Decisions sampled per tier (default: 1000)
//   --seed <n>             Seed for the policy random source (default: 42)
//   --scenario <name>      open_field | blocked_lane | all (default: all)
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use snake_duel::config::Config;
use snake_duel::evaluation::{Scenario, TierEvaluator};

fn print_usage() {
    eprintln!("Snake Duel Tier Evaluator");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  evaluate_tiers [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --decisions <N>         Decisions sampled per tier (default: 1000)");
    eprintln!("  --seed <N>              Seed for the policy random source (default: 42)");
    eprintln!("  --scenario <NAME>       open_field, blocked_lane or all (default: all)");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} requires a value", flag))?;
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid value '{}' for {}", value, flag))
}

fn scenarios_for(name: &str) -> Result<Vec<Scenario>, String> {
    match name {
        "open_field" => Ok(vec![Scenario::open_field()]),
        "blocked_lane" => Ok(vec![Scenario::blocked_lane()]),
        "all" => Ok(vec![Scenario::open_field(), Scenario::blocked_lane()]),
        other => Err(format!("Unknown scenario: {}", other)),
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let mut decisions: usize = 1000;
    let mut seed: u64 = 42;
    let mut scenario_name = "all".to_string();
    let mut config_path = "Snake.toml".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--decisions" => {
                decisions = parse_number("--decisions", args.get(i + 1))?;
                i += 1;
            }
            "--seed" => {
                seed = parse_number("--seed", args.get(i + 1))?;
                i += 1;
            }
            "--scenario" => {
                scenario_name = args
                    .get(i + 1)
                    .cloned()
                    .ok_or_else(|| "--scenario requires a value".to_string())?;
                i += 1;
            }
            "--config" => {
                config_path = args
                    .get(i + 1)
                    .cloned()
                    .ok_or_else(|| "--config requires a value".to_string())?;
                i += 1;
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        log::warn!("{}; using hardcoded defaults", e);
        Config::default_hardcoded()
    });
    let evaluator = TierEvaluator::new(config);

    for scenario in scenarios_for(&scenario_name)? {
        let results = evaluator.evaluate_all(&scenario, decisions, seed);
        evaluator.print_report(&results);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        print_usage();
        process::exit(1);
    }
}
