//! New Moon headless runner
//!
//! Plays the attract mode, then lets the autopilot play one run per
//! contour, carrying the session high score from run to run.
//!
//! Usage: `new-moon [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
use new_moon::{
    ConfigError, Contour, HighScores, Settings,
    consts::SIM_DT,
    sim::{Effect, World, autopilot, step_simulation},
};

/// Upper bound on one demo run (two simulated minutes)
#[cfg(not(target_arch = "wasm32"))]
const MAX_RUN_FRAMES: u64 = 60 * 120;

/// Attract-mode frames shown after the splash
#[cfg(not(target_arch = "wasm32"))]
const MENU_FRAMES: u32 = 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("New Moon (headless) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), ConfigError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(std::path::Path::new(&path))?,
        None => Settings::default(),
    };
    settings.validate()?;

    let mut menu = World::new_menu(settings.clone());
    for _ in 0..settings.splash_frames + MENU_FRAMES {
        step_simulation(&mut menu, &[], SIM_DT);
    }
    log::info!(
        "Menu scrolled {:.0} units, {} columns generated",
        menu.camera.scroll_distance,
        menu.tile_map.cols()
    );

    let mut scores = HighScores::new();
    for contour in Contour::ALL {
        let run = Settings {
            contour,
            ..settings.clone()
        };
        let (score, frames) = play(run, scores.high_score());
        let best = if scores.record(score, contour) {
            "  (best)"
        } else {
            ""
        };
        println!(
            "{:<9}  {:>8}  {:.1}s{best}",
            contour.as_str(),
            score,
            frames as f32 * SIM_DT
        );
    }

    if let Some(best) = scores.best() {
        println!(
            "High score over {} runs: {} on {}",
            scores.runs(),
            best.score,
            best.contour.as_str()
        );
    }
    Ok(())
}

/// One autopilot run. Returns the final score and the frames played.
#[cfg(not(target_arch = "wasm32"))]
fn play(settings: Settings, high_score: u64) -> (u64, u64) {
    let mut world = World::new_game(settings).with_high_score(high_score);
    let mut sounds = 0usize;

    while world.time_ticks < MAX_RUN_FRAMES && !world.is_over() {
        let inputs = autopilot::drive(&world);
        let effects = step_simulation(&mut world, &inputs, SIM_DT);
        for effect in &effects {
            log::trace!("frame {}: {effect:?}", world.time_ticks);
        }
        sounds += effects
            .iter()
            .filter(|e| matches!(e, Effect::PlaySound(_)))
            .count();
    }

    let hud = world.hud();
    log::info!(
        "{} run ended after {:.1}s: score {} / high {} ({} sounds, boss {:?})",
        hud.contour.as_str(),
        world.elapsed,
        hud.score,
        hud.high_score,
        sounds,
        world.boss_event
    );
    (hud.score, world.time_ticks)
}
