//! Timed world entities: explosions and the moon countdown

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::state::{Effect, SoundId};
use crate::consts::*;

/// Short four-frame blast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub rect: Rect,
    pub frame: u8,
    pub frame_cooldown: u32,
    /// Sound plays on the first update only
    pub play_sound: bool,
}

impl Explosion {
    pub fn new(center: Vec2, play_sound: bool) -> Self {
        Self {
            rect: Rect::centered(center, EXPLOSION_SIZE, EXPLOSION_SIZE),
            frame: 0,
            frame_cooldown: EXPLOSION_FRAME_DURATION,
            play_sound,
        }
    }

    /// Advance the animation. Returns false once the last frame has played out.
    pub fn update(&mut self, effects: &mut Vec<Effect>) -> bool {
        if self.play_sound {
            effects.push(Effect::PlaySound(SoundId::Explosion));
            self.play_sound = false;
        }

        if self.frame_cooldown > 0 {
            self.frame_cooldown -= 1;
            return true;
        }
        if self.frame + 1 >= EXPLOSION_FRAMES {
            return false;
        }
        self.frame += 1;
        self.frame_cooldown = EXPLOSION_FRAME_DURATION;
        true
    }
}

/// The boss's death blast: scatters small explosions, then ends the fight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonExplosion {
    pub rect: Rect,
    pub frame: u8,
    pub frame_cooldown: u32,
    /// Frames until the blast is gone
    pub lifetime: u32,
}

impl MoonExplosion {
    pub fn new(center: Vec2) -> Self {
        Self {
            rect: Rect::centered(center, MOON_EXPLOSION_SIZE, MOON_EXPLOSION_SIZE),
            frame: 0,
            frame_cooldown: MOON_EXPLOSION_FRAME_DURATION,
            lifetime: MOON_EXPLOSION_LIFETIME,
        }
    }

    /// Advance the blast, pushing scattered small explosions into `burst`.
    /// Returns false once the lifetime runs out.
    pub fn update<R: Rng>(
        &mut self,
        rng: &mut R,
        burst: &mut Vec<Explosion>,
        effects: &mut Vec<Effect>,
    ) -> bool {
        self.lifetime = self.lifetime.saturating_sub(1);

        if self.frame_cooldown > 0 {
            self.frame_cooldown -= 1;
        } else {
            let center = self.rect.center();
            let reach = (self.rect.w / 2.0) as i32;
            for _ in 0..MOON_EXPLOSION_BURST {
                let offset = Vec2::new(
                    rng.random_range(-reach..=reach) as f32,
                    rng.random_range(-reach..=reach) as f32,
                );
                burst.push(Explosion::new(center + offset, false));
            }
            self.frame = (self.frame + 1).min(MOON_EXPLOSION_FRAMES - 1);
            self.frame_cooldown = MOON_EXPLOSION_FRAME_DURATION;
        }

        if self.lifetime == 0 {
            effects.push(Effect::PlaySound(SoundId::VictoryMusic));
            return false;
        }
        true
    }
}

/// Sky clock counting down to the boss fight through eight moon phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonTimer {
    pub rect: Rect,
    /// Phases completed, 0..=8
    pub phase: u8,
    pub phase_cooldown: u32,
}

impl MoonTimer {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, MOON_SIZE, MOON_SIZE),
            phase: 0,
            phase_cooldown: MOON_PHASE_DURATION,
        }
    }

    /// Count down one frame. Returns true once every phase has elapsed.
    pub fn update(&mut self) -> bool {
        if self.phase_cooldown > 0 {
            self.phase_cooldown -= 1;
        } else if self.phase < MOON_PHASES {
            self.phase += 1;
            self.phase_cooldown = MOON_PHASE_DURATION;
        } else {
            return true;
        }
        false
    }

    /// Sprite frame for the current phase
    pub fn frame(&self) -> u8 {
        self.phase.min(MOON_PHASES - 1)
    }
}
