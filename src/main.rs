//! Flip Dash headless runner
//!
//! Plays one autopilot session with a fixed seed and reports how it went.
//! Usage: `flip-dash [--seed N] [--frames N] [--tuning PATH]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flip_dash::sim::{GamePhase, GameState, TickInput, tick};
    use flip_dash::{AudioManager, Tuning};

    env_logger::init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            log::error!("{msg}");
            eprintln!("usage: flip-dash [--seed N] [--frames N] [--tuning PATH]");
            std::process::exit(2);
        }
    };

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load tuning from {path}: {e} - using defaults");
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    log::info!("Flip Dash starting (seed {}, {} frames)", args.seed, args.frames);

    let mut state = GameState::with_tuning(args.seed, tuning).unwrap_or_else(|e| {
        log::warn!("Rejected tuning: {e} - using defaults");
        GameState::new(args.seed)
    });
    let mut audio = AudioManager::disabled();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut ticks = 0;
    while ticks < args.frames {
        tick(&mut state, &input);
        audio.handle(&state.drain_events());
        audio.update();
        ticks += 1;
        if matches!(state.phase, GamePhase::GameOver | GamePhase::Victory) {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks: {:?}, score {}, coins {}",
        ticks,
        state.phase,
        state.progression.score,
        state.progression.coins
    );
    println!(
        "{:?} score={} coins={} frames={}",
        state.phase, state.progression.score, state.progression.coins, state.frame
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, PartialEq)]
struct Args {
    seed: u64,
    frames: u64,
    tuning: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Args {
    const DEFAULT_SEED: u64 = 12345;
    /// Ten minutes at 60 fps
    const DEFAULT_FRAMES: u64 = 36_000;

    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self {
            seed: Self::DEFAULT_SEED,
            frames: Self::DEFAULT_FRAMES,
            tuning: None,
        };
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--seed" => {
                    let raw = value()?;
                    parsed.seed = raw.parse().map_err(|_| format!("bad seed: {raw}"))?;
                }
                "--frames" => {
                    let raw = value()?;
                    parsed.frames = raw.parse().map_err(|_| format!("bad frame count: {raw}"))?;
                }
                "--tuning" => parsed.tuning = Some(value()?),
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(parsed)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.seed, Args::DEFAULT_SEED);
        assert_eq!(args.frames, Args::DEFAULT_FRAMES);
        assert!(args.tuning.is_none());
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&["--seed", "7", "--frames", "120", "--tuning", "t.json"]).unwrap();
        assert_eq!(
            args,
            Args {
                seed: 7,
                frames: 120,
                tuning: Some("t.json".to_string())
            }
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["--seed"]).is_err());
        assert!(parse(&["--seed", "abc"]).is_err());
        assert!(parse(&["--fast"]).is_err());
    }
}
