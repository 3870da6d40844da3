//! Scrolling camera, screen rumble and the boss event
//!
//! The world scrolls by moving every entity left instead of moving a view.
//! `scroll_distance` tracks how far the map has moved so newly generated
//! columns line up with the tiles already on screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::MoonEnemy;
use super::physics::Facing;
use super::state::{Effect, SoundId, World};
use crate::consts::*;
use crate::settings::Settings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Players crossing this x push the world left
    pub scroll_point: f32,
    /// Total distance the map has moved left
    pub scroll_distance: f32,
    /// Locked cameras never scroll; set for the rest of the boss encounter
    pub locked: bool,
    /// Direction of the next rumble shift
    pub rumble_direction: Facing,
    pub rumble_power: f32,
}

impl Camera {
    pub fn new(settings: &Settings) -> Self {
        Self {
            scroll_point: settings.scroll_point(),
            scroll_distance: 0.0,
            locked: false,
            rumble_direction: Facing::Left,
            rumble_power: settings.rumble_power,
        }
    }
}

/// Boss encounter progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BossEvent {
    #[default]
    Idle,
    /// The ground shakes until the boss drops in
    Pending { delay: u32 },
    Active,
    /// Terminal: the fight can't be re-entered
    Defeated,
}

/// Shift every scrolling group by `delta` along x
fn shift_world(world: &mut World, delta: f32) {
    let delta = Vec2::new(delta, 0.0);
    for tile in world.terrain.iter_mut().chain(world.underground.iter_mut()) {
        tile.rect.translate(delta);
    }
    for player in &mut world.players {
        player.body.rect.translate(delta);
    }
    for bullet in &mut world.bullets {
        bullet.rect.translate(delta);
    }
    for jumper in &mut world.enemies {
        jumper.mobile.body.rect.translate(delta);
    }
    if let Some(boss) = &mut world.boss {
        boss.mobile.body.rect.translate(delta);
    }
    for explosion in &mut world.explosions {
        explosion.rect.translate(delta);
    }
    for blast in &mut world.moon_explosions {
        blast.rect.translate(delta);
    }
}

/// Scroll the world when a player passes the scroll point.
///
/// Each player's overflow is applied in turn, so the leading player ends on
/// the scroll point. Returns the distance scrolled, which is also added to
/// the score.
pub fn adjust_camera(world: &mut World) -> f32 {
    if world.camera.locked {
        return 0.0;
    }

    let mut scrolled = 0.0;
    for i in 0..world.players.len() {
        let overflow = world.players[i].body.rect.right() - world.camera.scroll_point;
        if overflow > 0.0 {
            shift_world(world, -overflow);
            world.camera.scroll_distance += overflow;
            world.score += overflow as f64;
            scrolled += overflow;
        }
    }
    scrolled
}

/// Attract-mode scroll: only the landscape moves, and nothing is scored
pub fn auto_scroll(world: &mut World, speed: f32) {
    let delta = Vec2::new(-speed, 0.0);
    for tile in world.terrain.iter_mut().chain(world.underground.iter_mut()) {
        tile.rect.translate(delta);
    }
    world.camera.scroll_distance += speed;
}

/// Shake the landscape and players one step, alternating direction.
///
/// Rumble is cosmetic: the scroll distance is offset so terrain generated
/// afterward still lines up, and the score is untouched.
pub fn rumble(world: &mut World) {
    let camera = &mut world.camera;
    let delta = camera.rumble_power * camera.rumble_direction.sign();
    camera.scroll_distance -= delta;
    camera.rumble_direction = match camera.rumble_direction {
        Facing::Left => Facing::Right,
        Facing::Right => Facing::Left,
    };

    let delta = Vec2::new(delta, 0.0);
    for tile in world.terrain.iter_mut().chain(world.underground.iter_mut()) {
        tile.rect.translate(delta);
    }
    for player in &mut world.players {
        player.body.rect.translate(delta);
    }
}

/// The moon clock ran out: clear it, lock the camera, silence the music and
/// start the countdown. Fires at most once per world.
pub fn begin_boss_event(world: &mut World, effects: &mut Vec<Effect>) -> bool {
    if world.boss_event != BossEvent::Idle {
        return false;
    }
    log::info!("Boss event begun at score {}", world.score_points());
    world.moon = None;
    world.camera.locked = true;
    world.boss_event = BossEvent::Pending {
        delay: BOSS_DELAY_FRAMES,
    };
    effects.push(Effect::StopAllSounds);
    effects.push(Effect::PlaySound(SoundId::Earthquake));
    true
}

/// Run the pre-fight countdown, rumbling on every fifth frame, then drop the boss in
pub fn advance_boss_event(world: &mut World) {
    let BossEvent::Pending { delay } = world.boss_event else {
        return;
    };

    if delay > 0 {
        let delay = delay - 1;
        world.boss_event = BossEvent::Pending { delay };
        if delay % RUMBLE_EVERY == 0 {
            rumble(world);
        }
        return;
    }

    let x = world.settings.width / 2.0;
    log::info!("Moon boss spawned at ({x}, {BOSS_SPAWN_Y})");
    world.boss = Some(MoonEnemy::new(x, BOSS_SPAWN_Y));
    world.boss_event = BossEvent::Active;
}

/// Boss health ran out: double the score, show it, and set off the final blast
pub fn defeat_boss(world: &mut World, effects: &mut Vec<Effect>) {
    let Some(boss) = world.boss.take() else {
        return;
    };
    world.score *= 2.0;
    world.display_score = true;
    world.boss_event = BossEvent::Defeated;
    log::info!("Moon boss defeated, final score {}", world.score_points());

    effects.push(Effect::StopSound(SoundId::MoonBattleMusic));
    effects.push(Effect::PlaySound(SoundId::FinalExplosion));
    world.spawn_moon_explosion(boss.mobile.body.rect.center(), effects);
}
