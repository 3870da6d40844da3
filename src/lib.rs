//! New Moon - simulation core of a side-scrolling action platformer
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (terrain, physics, collisions, boss event)
//! - `settings`: World configuration and terrain contour presets
//! - `highscores`: Session high score
//! - `error`: Configuration errors

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use highscores::{BestRun, HighScores};
pub use settings::{Contour, Settings};

/// Game configuration constants
///
/// Every velocity and timer here is expressed per simulation frame.
pub mod consts {
    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Air physics
    pub const GRAVITY: f32 = 1.0;
    pub const TERMINAL_VELOCITY: f32 = 10.0;

    /// Wall-slide physics
    pub const WALL_GRAVITY: f32 = 0.5;
    pub const WALL_TERMINAL_VELOCITY: f32 = 5.0;

    /// Horizontal speed lost per grounded frame
    pub const GROUND_FRICTION: f32 = 0.4;

    /// Penetration distances closer than this are treated as a corner graze
    pub const CORNER_HIT_THRESHOLD: f32 = 1.0;

    /// Player defaults
    pub const PLAYER_HP: i32 = 10;
    pub const PLAYER_WIDTH: f32 = 28.0;
    pub const PLAYER_HEIGHT: f32 = 44.0;
    pub const PLAYER_ACCELERATION: f32 = 0.4;
    pub const PLAYER_GROUND_DECELERATION: f32 = 3.0;
    pub const PLAYER_TOP_SPEED: f32 = 5.0;
    pub const DASH_MULTIPLIER: f32 = 2.0;
    pub const JUMP_POWER: f32 = 14.0;
    /// Launch angle above the horizontal for wall jumps (60 degrees)
    pub const WALL_JUMP_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Player timers (frames)
    pub const DASH_DURATION: u32 = 10;
    pub const WALL_JUMP_WINDOW: u32 = 5;
    pub const STUN_DURATION: u32 = 20;
    /// Frames after landing during which wall contact cannot turn the player.
    /// Tuned by play, not derived.
    pub const LANDING_FACING_LOCK: u32 = 5;

    /// Bullets
    pub const BULLET_SPEED: f32 = 20.0;
    pub const BULLET_WIDTH: f32 = 16.0;
    pub const BULLET_HEIGHT: f32 = 6.0;
    /// Bullets leave the gun this far above the shooter's center
    pub const BULLET_MUZZLE_RISE: f32 = 9.0;

    /// Jumper enemy
    pub const JUMPER_SIZE: f32 = 32.0;
    pub const JUMPER_HORIZONTAL_TOP_SPEED: i32 = 15;
    pub const JUMPER_VERTICAL_TOP_SPEED: i32 = 20;
    pub const JUMPER_KNOCKBACK: f32 = 10.0;
    pub const JUMPER_KILL_SCORE: f64 = 1000.0;

    /// Bounce impulse lower bounds shared by every enemy
    pub const BOUNCE_MIN_HORIZONTAL: i32 = 5;
    pub const BOUNCE_MIN_VERTICAL: i32 = 10;

    /// Contact damage dealt by any enemy
    pub const ENEMY_DAMAGE: i32 = 1;

    /// Moon boss
    pub const BOSS_HP: i32 = 25;
    pub const BOSS_SIZE: f32 = 128.0;
    pub const BOSS_DAMAGED_SIZE: f32 = 160.0;
    pub const BOSS_HORIZONTAL_TOP_SPEED: i32 = 30;
    pub const BOSS_VERTICAL_TOP_SPEED: i32 = 50;
    pub const BOSS_KNOCKBACK: f32 = 15.0;
    pub const BOSS_CRACKED_BELOW: i32 = 13;
    pub const BOSS_CRUMBLING_BELOW: i32 = 8;
    pub const BOSS_RUMBLE_DURATION: u32 = 20;
    pub const BOSS_CRASH_SOUND_COOLDOWN: u32 = 5;
    /// Frames between debris explosions once the boss is crumbling
    pub const BOSS_DEBRIS_INTERVAL: u64 = 30;
    /// Debris scatter radius, in tiles
    pub const BOSS_DEBRIS_SCATTER_TILES: f32 = 5.0;
    pub const BOSS_SPAWN_Y: f32 = -200.0;

    /// Boss event
    pub const BOSS_DELAY_FRAMES: u32 = 100;
    pub const RUMBLE_EVERY: u32 = 5;

    /// Moon timer
    pub const MOON_PHASES: u8 = 8;
    pub const MOON_PHASE_DURATION: u32 = 175;
    pub const MOON_SIZE: f32 = 96.0;

    /// Explosions
    pub const EXPLOSION_SIZE: f32 = 32.0;
    pub const EXPLOSION_FRAMES: u8 = 4;
    pub const EXPLOSION_FRAME_DURATION: u32 = 5;
    pub const MOON_EXPLOSION_SIZE: f32 = 192.0;
    pub const MOON_EXPLOSION_FRAMES: u8 = 3;
    pub const MOON_EXPLOSION_FRAME_DURATION: u32 = 10;
    pub const MOON_EXPLOSION_LIFETIME: u32 = 100;
    pub const MOON_EXPLOSION_BURST: usize = 3;

    /// Player start position
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 50.0;
}

/// Returns `a` carrying the sign of `b`, or 0 when `b` is 0
#[inline]
pub fn same_sign(a: f32, b: f32) -> f32 {
    if b < 0.0 {
        -a.abs()
    } else if b > 0.0 {
        a.abs()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_sign() {
        assert_eq!(same_sign(3.0, -0.5), -3.0);
        assert_eq!(same_sign(-3.0, 2.0), 3.0);
        assert_eq!(same_sign(3.0, 0.0), 0.0);
    }
}
