//! Headless Cursed Clash
//!
//! Seeded AI-vs-AI матч без рендера: печатает HUD раз в 120 кадров и итог.

use clash_simulation::ai::AIConfig;
use clash_simulation::logger;
use clash_simulation::{CharacterKind, Match, MatchConfig, Side};

const MAX_FRAMES: u32 = 60 * 60 * 3;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    println!("Starting Cursed Clash headless match (seed: {})", seed);

    let config = MatchConfig {
        seed,
        ..MatchConfig::default()
    };
    let mut game = Match::new(config, CharacterKind::Yuji, CharacterKind::Sukuna);

    // P1 тоже под AI
    game.hand_to_ai(Side::P1, AIConfig::default());

    for frame in 0..MAX_FRAMES {
        game.advance();

        if frame % 120 == 0 {
            for row in &game.hud().fighters {
                println!(
                    "Frame {}: {:?} {} hp {}/{} ce {:.0} gauge {:.0}",
                    frame, row.side, row.name, row.health, row.max_health, row.ce, row.domain_gauge
                );
            }
        }

        if game.outcome().is_finished() {
            break;
        }
    }

    match game.outcome().winner {
        Some(side) => logger::log_info(&format!("{:?} wins at frame {}", side, game.clock().tick)),
        None => logger::log_info("time up, no winner"),
    }
    println!("Simulation complete!");
}
