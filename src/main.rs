//! Pig Sling entry point
//!
//! Native builds run a headless session in autoplay mode and log each round.
//! Usage: `pig-sling [tuning.json] [seed] [rounds]`
//!
//! The browser build uses `platform::web::WebGame` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use pig_sling::highscores::HighScores;
    use pig_sling::platform::{LogSink, Tee};
    use pig_sling::sim::GameEvent;
    use pig_sling::{Game, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = match args.first().map(String::as_str) {
        Some(path) if path != "-" => Tuning::load(Path::new(path)),
        _ => Tuning::default(),
    };
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
    let rounds = args.get(2).and_then(|s| s.parse::<u32>().ok()).unwrap_or(3);

    log::info!("Starting headless session: seed {}, {} rounds", seed, rounds);

    let scores = Rc::new(RefCell::new(HighScores::new()));
    let mut game = Game::new(seed, tuning, Box::new(Tee(LogSink, scores.clone())));
    game.set_autoplay(true);

    // Safety net in case autoplay can never finish a round
    let max_frames = 20_000u64 * rounds as u64;

    while scores.borrow().rounds_played < rounds && game.state().time_ticks < max_frames {
        for event in game.step() {
            if let GameEvent::TargetHit { target_id, points } = event {
                log::debug!("Hit target {} for {}", target_id, points);
            }
        }
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = game.view().to_json() {
                log::trace!("{}", json);
            }
        }
    }

    match scores.borrow().to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize high scores: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
