use beneme::engine::{EngineConfig, WellnessEngine};
use beneme::observer::EngineAdapter;
use beneme::pathway::generate_pathway;
use beneme::status::cloud_density;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("logging disabled: {e}");
    }

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return;
    }
    if args.len() >= 2 && args[1] == "pathway" {
        let goal = args[2..].join(" ");
        run_pathway(&goal);
        return;
    }
    if args.len() >= 2 && args[1] != "demo" {
        eprintln!("Unknown command: {}", args[1]);
        print_help();
        std::process::exit(2);
    }

    let seconds = match args.get(2).map(|s| s.parse::<u64>()) {
        None => 60,
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            eprintln!("Invalid duration: {}", args[2]);
            std::process::exit(2);
        }
    };
    run_demo(seconds);
}

/// Library events (connect, challenge completion, insight failures) go to
/// stderr; RUST_LOG overrides the default level.
fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
}

/// Headless session on a virtual clock: one loop iteration is one second.
fn run_demo(seconds: u64) {
    let mut engine = WellnessEngine::new(EngineConfig::default());
    let period_ms = engine.config().simulation.period_ms.max(1);

    engine.connect();
    if let Err(e) = engine.toggle_challenge("c1") {
        eprintln!("{e}");
        return;
    }
    if let Err(e) = engine.start_session() {
        eprintln!("{e}");
        return;
    }

    let mut sim_elapsed_ms = 0u64;
    for t in 1..=seconds {
        let now = Duration::from_secs(t);

        sim_elapsed_ms += 1000;
        while sim_elapsed_ms >= period_ms {
            sim_elapsed_ms -= period_ms;
            engine.simulation_tick();
        }
        engine.refresh_insight(now);
        let tick = engine.session_tick();

        if t % 5 == 0 || tick.expired {
            let snap = EngineAdapter::new(&engine).snapshot();
            let m = snap.metrics;
            println!(
                "t={t:4}s focus={:5.1} calm={:5.1} aqi={:5.1} o2={:4.1}  mood={:<9} air={:<8} clouds={:2}  challenge={:5.1}%  left={}",
                m.focus_score,
                m.calm_score,
                m.aqi,
                m.oxygenation,
                snap.status.mood.label(),
                format!("{:?}", snap.status.air_tier),
                cloud_density(&m),
                snap.challenge.as_ref().map_or(0.0, |c| c.progress),
                snap.session.remaining,
            );
            println!("        insight: {}", snap.insight);
        }
        if tick.expired {
            println!("session complete");
            break;
        }
    }

    engine.disconnect();
}

fn run_pathway(goal: &str) {
    let engine = WellnessEngine::new(EngineConfig::default());
    match generate_pathway(goal, &engine.metrics()) {
        Ok(pathway) => match serde_json::to_string_pretty(&pathway) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("failed to encode pathway: {e}"),
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}

fn print_help() {
    println!("beneme (simulated bio-feedback wellness core)");
    println!("usage:");
    println!("  cargo run");
    println!("  cargo run -- demo [seconds]");
    println!("  cargo run -- pathway <goal>");
    println!("  cargo run -- --help");
    println!("log level: RUST_LOG (default info, written to stderr)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_installs_a_global_subscriber() {
        assert!(init_logging().is_ok());
        assert!(tracing::dispatcher::has_been_set());
        // A second subscriber is refused rather than replacing the first.
        assert!(init_logging().is_err());
    }
}
