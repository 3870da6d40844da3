//! Enemies
//!
//! Both enemies are bouncing bodies sharing `Mobile`: they fall, and every
//! time they touch terrain they leap again toward the players. The moon boss
//! layers health, damage stages and screen rumble on top.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::overlapping_tiles;
use super::geom::Rect;
use super::physics::{self, Body};
use super::state::{Effect, SoundId};
use super::tilemap::Tile;
use crate::consts::*;
use crate::same_sign;

/// Gravity-bound body that hops toward the players whenever it lands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mobile {
    pub body: Body,
    pub horizontal_top_speed: i32,
    pub vertical_top_speed: i32,
    pub damage: i32,
    pub knockback: f32,
    /// -1, 0 or +1: which way the players are on average
    pub bias: f32,
}

impl Mobile {
    pub fn new(
        rect: Rect,
        horizontal_top_speed: i32,
        vertical_top_speed: i32,
        knockback: f32,
    ) -> Self {
        Self {
            body: Body::new(rect),
            horizontal_top_speed,
            vertical_top_speed,
            damage: ENEMY_DAMAGE,
            knockback,
            bias: 0.0,
        }
    }

    /// Point toward the mean horizontal position of the given players
    pub fn track(&mut self, player_centers: &[Vec2]) {
        if player_centers.is_empty() {
            self.bias = 0.0;
            return;
        }
        let mean_x = player_centers.iter().map(|c| c.x).sum::<f32>() / player_centers.len() as f32;
        self.bias = same_sign(1.0, mean_x - self.body.rect.center().x);
    }

    pub fn touches_terrain(&self, terrain: &[Tile]) -> bool {
        !overlapping_tiles(&self.body.rect, terrain).is_empty()
    }

    /// Random leap: horizontal toward the players, vertical always upward
    pub fn bounce<R: Rng>(&mut self, rng: &mut R) {
        let horizontal = rng.random_range(BOUNCE_MIN_HORIZONTAL..=self.horizontal_top_speed);
        let vertical = rng.random_range(BOUNCE_MIN_VERTICAL..=self.vertical_top_speed);
        self.body.vel.x = self.bias * horizontal as f32;
        self.body.vel.y = -(vertical as f32);
    }
}

/// Small hopping enemy, destroyed by a single shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumperEnemy {
    pub mobile: Mobile,
}

impl JumperEnemy {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            mobile: Mobile::new(
                Rect::new(x, y, JUMPER_SIZE, JUMPER_SIZE),
                JUMPER_HORIZONTAL_TOP_SPEED,
                JUMPER_VERTICAL_TOP_SPEED,
                JUMPER_KNOCKBACK,
            ),
        }
    }

    pub fn advance(&mut self, player_centers: &[Vec2]) {
        physics::integrate(&mut self.mobile.body);
        physics::gravitate(&mut self.mobile.body);
        self.mobile.track(player_centers);
    }
}

/// Visual damage stage of the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BossStage {
    #[default]
    Intact,
    Cracked,
    /// Sheds debris explosions
    Crumbling,
    Shattered,
}

impl BossStage {
    pub fn for_hp(hp: i32) -> Self {
        if hp <= 0 {
            BossStage::Shattered
        } else if hp < BOSS_CRUMBLING_BELOW {
            BossStage::Crumbling
        } else if hp < BOSS_CRACKED_BELOW {
            BossStage::Cracked
        } else {
            BossStage::Intact
        }
    }
}

/// What the boss asks of the world after its frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BossFrame {
    /// Center of a debris explosion to spawn
    pub debris: Option<Vec2>,
    pub defeated: bool,
}

/// The falling moon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonEnemy {
    pub mobile: Mobile,
    pub hp: i32,
    pub stage: BossStage,
    pub rumble_cooldown: u32,
    pub sound_cooldown: u32,
    /// Battle music starts on the first frame
    pub first_frame: bool,
    /// Frames alive
    pub timer: u64,
}

impl MoonEnemy {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            mobile: Mobile::new(
                Rect::new(x, y, BOSS_SIZE, BOSS_SIZE),
                BOSS_HORIZONTAL_TOP_SPEED,
                BOSS_VERTICAL_TOP_SPEED,
                BOSS_KNOCKBACK,
            ),
            hp: BOSS_HP,
            stage: BossStage::Intact,
            rumble_cooldown: 0,
            sound_cooldown: 0,
            first_frame: true,
            timer: 0,
        }
    }

    /// The moon drifts at half its velocity. Cooldowns tick here, before this
    /// frame's landing can reset them. Returns true when the screen should rumble.
    pub fn advance(&mut self, player_centers: &[Vec2]) -> bool {
        self.timer += 1;
        physics::integrate_scaled(&mut self.mobile.body, Vec2::splat(0.5));
        physics::gravitate(&mut self.mobile.body);
        self.mobile.track(player_centers);

        self.sound_cooldown = self.sound_cooldown.saturating_sub(1);
        if self.rumble_cooldown > 0 {
            self.rumble_cooldown -= 1;
            return self.rumble_cooldown % RUMBLE_EVERY == 0;
        }
        false
    }

    /// Crash into terrain: leap again and start shaking the screen
    pub fn land<R: Rng>(&mut self, rng: &mut R, effects: &mut Vec<Effect>) {
        if self.sound_cooldown == 0 {
            effects.push(Effect::PlaySound(SoundId::MoonCrash));
            self.sound_cooldown = BOSS_CRASH_SOUND_COOLDOWN;
        }
        self.mobile.bounce(rng);
        self.rumble_cooldown = BOSS_RUMBLE_DURATION;
    }

    pub fn take_hits(&mut self, hits: u32) {
        self.hp -= hits as i32;
    }

    /// React to health after this frame's collisions
    pub fn update<R: Rng>(
        &mut self,
        rng: &mut R,
        tile_size: f32,
        effects: &mut Vec<Effect>,
    ) -> BossFrame {
        let mut frame = BossFrame::default();

        if self.first_frame {
            effects.push(Effect::PlaySound(SoundId::MoonBattleMusic));
            self.first_frame = false;
        }

        let stage = BossStage::for_hp(self.hp);
        if stage != self.stage {
            log::debug!("Moon boss at {} hp: {:?}", self.hp, stage);
            self.stage = stage;
            let size = if stage == BossStage::Intact {
                BOSS_SIZE
            } else {
                BOSS_DAMAGED_SIZE
            };
            self.mobile.body.rect.resize_centered(size, size);
        }

        if self.stage >= BossStage::Crumbling && self.timer % BOSS_DEBRIS_INTERVAL == 0 {
            let reach = (tile_size * BOSS_DEBRIS_SCATTER_TILES) as i32;
            let offset = Vec2::new(
                rng.random_range(-reach..=reach) as f32,
                rng.random_range(-reach..=reach) as f32,
            );
            frame.debris = Some(self.mobile.body.rect.center() + offset);
        }

        frame.defeated = self.hp <= 0;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_track_points_at_mean_player() {
        let mut jumper = JumperEnemy::new(500.0, 0.0);
        jumper.mobile.track(&[Vec2::new(100.0, 0.0), Vec2::new(300.0, 0.0)]);
        assert_eq!(jumper.mobile.bias, -1.0);

        jumper.mobile.track(&[Vec2::new(900.0, 0.0)]);
        assert_eq!(jumper.mobile.bias, 1.0);

        jumper.mobile.track(&[]);
        assert_eq!(jumper.mobile.bias, 0.0);
    }

    #[test]
    fn test_bounce_ranges() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut jumper = JumperEnemy::new(0.0, 0.0);
        jumper.mobile.bias = -1.0;
        for _ in 0..200 {
            jumper.mobile.bounce(&mut rng);
            let vel = jumper.mobile.body.vel;
            assert!((-15.0..=-5.0).contains(&vel.x));
            assert!((-20.0..=-10.0).contains(&vel.y));
        }
    }

    #[test]
    fn test_jumper_falls() {
        let mut jumper = JumperEnemy::new(0.0, 0.0);
        for _ in 0..30 {
            jumper.advance(&[]);
        }
        assert_eq!(jumper.mobile.body.vel.y, TERMINAL_VELOCITY);
        assert!(jumper.mobile.body.rect.y > 0.0);
    }

    #[test]
    fn test_boss_stages() {
        assert_eq!(BossStage::for_hp(25), BossStage::Intact);
        assert_eq!(BossStage::for_hp(13), BossStage::Intact);
        assert_eq!(BossStage::for_hp(12), BossStage::Cracked);
        assert_eq!(BossStage::for_hp(8), BossStage::Cracked);
        assert_eq!(BossStage::for_hp(7), BossStage::Crumbling);
        assert_eq!(BossStage::for_hp(0), BossStage::Shattered);
    }

    #[test]
    fn test_boss_update_degrades_and_sheds_debris() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut effects = Vec::new();
        let mut boss = MoonEnemy::new(400.0, 100.0);
        let center = boss.mobile.body.rect.center();

        boss.take_hits(13);
        let frame = boss.update(&mut rng, 32.0, &mut effects);
        assert_eq!(boss.stage, BossStage::Cracked);
        assert_eq!(boss.mobile.body.rect.center(), center);
        assert_eq!(boss.mobile.body.rect.w, BOSS_DAMAGED_SIZE);
        assert!(!frame.defeated);
        assert_eq!(effects, vec![Effect::PlaySound(SoundId::MoonBattleMusic)]);

        boss.take_hits(5);
        boss.timer = BOSS_DEBRIS_INTERVAL;
        let frame = boss.update(&mut rng, 32.0, &mut effects);
        assert_eq!(boss.stage, BossStage::Crumbling);
        let debris = frame.debris.expect("crumbling boss sheds debris");
        assert!((debris - center).abs().max_element() <= 160.0);

        boss.take_hits(7);
        assert!(boss.update(&mut rng, 32.0, &mut effects).defeated);
    }

    #[test]
    fn test_landing_starts_rumble() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut effects = Vec::new();
        let mut boss = MoonEnemy::new(0.0, 0.0);

        boss.land(&mut rng, &mut effects);
        boss.land(&mut rng, &mut effects);
        assert_eq!(effects, vec![Effect::PlaySound(SoundId::MoonCrash)]);
        assert!(boss.mobile.body.vel.y < 0.0);

        let rumbles = (0..BOSS_RUMBLE_DURATION + 5)
            .filter(|_| boss.advance(&[]))
            .count();
        assert_eq!(rumbles as u32, BOSS_RUMBLE_DURATION / RUMBLE_EVERY);
    }

    #[test]
    fn test_first_rumble_waits_a_full_interval() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut boss = MoonEnemy::new(0.0, 0.0);
        boss.land(&mut rng, &mut Vec::new());
        assert_eq!(boss.rumble_cooldown, BOSS_RUMBLE_DURATION);

        // Landing frame's update never consumes the fresh cooldown
        boss.update(&mut rng, 32.0, &mut Vec::new());
        assert_eq!(boss.rumble_cooldown, BOSS_RUMBLE_DURATION);

        let rumbles: Vec<bool> = (0..RUMBLE_EVERY).map(|_| boss.advance(&[])).collect();
        assert_eq!(rumbles, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_crash_sound_cooldown_spans_full_frames() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut effects = Vec::new();
        let mut boss = MoonEnemy::new(0.0, 0.0);

        boss.land(&mut rng, &mut effects);
        for _ in 0..BOSS_CRASH_SOUND_COOLDOWN - 1 {
            boss.advance(&[]);
            boss.land(&mut rng, &mut effects);
        }
        assert_eq!(effects.len(), 1);

        boss.advance(&[]);
        boss.land(&mut rng, &mut effects);
        assert_eq!(effects.len(), 2);
    }
}
