use cornhole_core::{BoardGeometry, MatchOutcome, WindState};
use cornhole_host::{load_log, load_report, replay_match, save_report, simulate_throw, MatchReport};
use std::env;
use std::time::Instant;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    println!("🌽 Cornhole Match Simulator");
    println!("{}", "=".repeat(70));
    println!();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "replay" => {
            if args.len() < 3 {
                eprintln!("Usage: {} replay <log_file> [output_file]", args[0]);
                std::process::exit(1);
            }
            let output_file = args.get(3).map(|s| s.as_str());
            replay_command(&args[2], output_file);
        }

        "check" => {
            if args.len() < 4 {
                eprintln!("Usage: {} check <log_file> <report_file>", args[0]);
                eprintln!("Error: Missing required argument");
                std::process::exit(1);
            }
            check_command(&args[2], &args[3]);
        }

        "throw" => {
            if args.len() < 4 {
                eprintln!(
                    "Usage: {} throw <angle> <power> [wind_speed wind_direction]",
                    args[0]
                );
                std::process::exit(1);
            }
            let angle = parse_number(&args[2], "angle");
            let power = parse_number(&args[3], "power");
            let wind = if args.len() >= 6 {
                WindState::new(
                    parse_number(&args[4], "wind_speed"),
                    parse_number(&args[5], "wind_direction"),
                )
            } else {
                WindState::CALM
            };
            throw_command(angle, power, wind);
        }

        "--help" | "-h" => {
            print_usage(&args[0]);
            std::process::exit(0);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  replay <log_file> [output_file]");
    eprintln!("      Replay a throw log and write a match report");
    eprintln!("      - log_file: JSON file containing the throw log");
    eprintln!("      - output_file: Optional file to save the report (JSON)");
    eprintln!("                     Defaults to: cornhole-report_seed<seed>_<timestamp>.json");
    eprintln!();
    eprintln!("  check <log_file> <report_file>");
    eprintln!("      Replay a log and confirm it reproduces a saved report");
    eprintln!();
    eprintln!("  throw <angle> <power> [wind_speed wind_direction]");
    eprintln!("      Simulate one throw against the standard board");
    eprintln!("      - angle: degrees, strictly between 0 and 180 (90 = straight up)");
    eprintln!("      - power: 0-100");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. Replay:  {} replay match-log.json", program);
    eprintln!("  2. Check:   {} check match-log.json cornhole-report_seed<seed>_<timestamp>.json", program);
}

fn parse_number(s: &str, name: &str) -> f64 {
    s.parse().unwrap_or_else(|e| {
        eprintln!("❌ Error: invalid {} '{}': {}", name, s, e);
        std::process::exit(1);
    })
}

fn describe_outcome(report: &MatchReport) -> String {
    match report.summary.outcome {
        Some(MatchOutcome::Winner(i)) => format!("Player {} wins", i + 1),
        Some(MatchOutcome::Draw) => "Draw".to_string(),
        None => format!("Unfinished ({})", report.summary.status),
    }
}

fn replay_command(log_file: &str, output_file: Option<&str>) {
    println!("📋 Replaying throw log");
    println!("  Log file: {}", log_file);
    println!();

    let log = load_log(log_file).unwrap_or_else(|e| {
        eprintln!("❌ Error loading log '{}': {}", log_file, e);
        std::process::exit(1);
    });

    println!("📦 Loaded {} throws from log", log.throws.len());
    println!("  Seed: {}", log.seed);
    println!();

    let start = Instant::now();
    let report = replay_match(&log).unwrap_or_else(|e| {
        eprintln!();
        eprintln!("❌ Replay failed: {}", e);
        std::process::exit(1);
    });
    println!("  Replay time: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
    println!();

    let default_filename = format!(
        "cornhole-report_seed{}_{}.json",
        report.seed,
        chrono::Utc::now().timestamp()
    );
    let file_to_save = output_file.unwrap_or(&default_filename);

    match save_report(&report, file_to_save) {
        Ok(_) => {
            println!("✅ Replay complete!");
            println!("  Result: {}", describe_outcome(&report));
            println!(
                "  Score: {}-{}",
                report.summary.scores[0], report.summary.scores[1]
            );
            println!("  Rounds: {}", report.summary.rounds);
            println!("  Log Hash: 0x{}", report.log_hash);
            println!("  Final wind: {}", report.final_wind.display());
            println!();
            println!("💾 Report saved to: {}", file_to_save);
            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!("❌ Error saving report: {}", e);
            std::process::exit(1);
        }
    }
}

fn check_command(log_file: &str, report_file: &str) {
    println!("📋 Checking report against log");
    println!("  Log file: {}", log_file);
    println!("  Report file: {}", report_file);
    println!();

    let saved = load_report(report_file).unwrap_or_else(|e| {
        eprintln!("❌ Error loading report: {}", e);
        std::process::exit(1);
    });
    let log = load_log(log_file).unwrap_or_else(|e| {
        eprintln!("❌ Error loading log: {}", e);
        std::process::exit(1);
    });
    let replayed = replay_match(&log).unwrap_or_else(|e| {
        eprintln!("❌ Replay failed: {}", e);
        std::process::exit(1);
    });

    if replayed.log_hash == saved.log_hash
        && replayed.summary == saved.summary
        && replayed.final_wind == saved.final_wind
    {
        println!("✅ Report matches the log");
        println!(
            "  Score: {}-{} ({})",
            saved.summary.scores[0],
            saved.summary.scores[1],
            describe_outcome(&saved)
        );
        println!("{}", "=".repeat(70));
    } else {
        eprintln!("❌ Report does not match the log");
        eprintln!(
            "  Saved:    {}-{} hash 0x{}",
            saved.summary.scores[0], saved.summary.scores[1], saved.log_hash
        );
        eprintln!(
            "  Replayed: {}-{} hash 0x{}",
            replayed.summary.scores[0], replayed.summary.scores[1], replayed.log_hash
        );
        eprintln!("{}", "=".repeat(70));
        std::process::exit(1);
    }
}

fn throw_command(angle: f64, power: f64, wind: WindState) {
    let board = BoardGeometry::standard();
    let throw = simulate_throw(angle, power, &wind, &board).unwrap_or_else(|e| {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    });

    println!("🎯 Throw: angle {:.1}°, power {:.1}%", angle, power);
    println!("  Wind: {}", wind.display());
    println!("  Steps: {}", throw.trajectory.len());
    println!(
        "  Landing: ({:.1}, {:.1})",
        throw.landing_point.x, throw.landing_point.y
    );
    println!("  Result: {} (+{})", throw.result, throw.points);
    println!("{}", "=".repeat(70));
}
