//! World state and the data exchanged with collaborators
//!
//! `World` owns every entity group. Membership in a group is an entity's only
//! lifetime: removing it from its group destroys it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::camera::{BossEvent, Camera};
use super::enemy::{BossStage, JumperEnemy, MoonEnemy};
use super::fx::{Explosion, MoonExplosion, MoonTimer};
use super::physics::Facing;
use super::player::Player;
use super::tilemap::{Tile, TileMap};
use crate::consts::*;
use crate::settings::{Contour, Settings};

/// Sound and music cues for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    Death,
    MoonCrash,
    Explosion,
    Earthquake,
    FinalExplosion,
    /// Ground or wall jump
    Jump,
    /// Mid-air second jump
    AirJump,
    Pause,
    Hurt,
    MoonBattleMusic,
    MountainMusic,
    HillsMusic,
    PlainsMusic,
    VictoryMusic,
}

/// Transient visuals the renderer may embellish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualKind {
    Explosion,
    MoonExplosion,
}

/// Side effects requested by one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    PlaySound(SoundId),
    StopSound(SoundId),
    StopAllSounds,
    PauseAudio,
    ResumeAudio,
    SpawnVisualEffect(VisualKind, Vec2),
}

/// Sprite identifiers for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Moon,
    Bullet(Facing),
    Boss(BossStage),
    Jumper,
    Player(Facing),
    Underground,
    Terrain,
    Explosion,
    MoonExplosion,
    /// Health point, colored by player slot
    Heart(u8),
}

/// One sprite to draw at a top-left position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub sprite: SpriteKind,
    pub pos: Vec2,
    pub frame: u8,
}

/// Text overlay state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    /// Best of the session's earlier runs and this one so far
    pub high_score: u64,
    pub show_score: bool,
    pub paused: bool,
    pub contour: Contour,
}

/// Attract-mode menu or live play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Splash countdown, then auto-scrolling terrain
    Menu { splash_frames: u32 },
    Playing,
}

/// Everything one running world owns
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub mode: Mode,
    pub paused: bool,

    // === Entity groups ===
    pub tile_map: TileMap,
    pub terrain: Vec<Tile>,
    pub underground: Vec<Tile>,
    pub players: Vec<Player>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<JumperEnemy>,
    pub boss: Option<MoonEnemy>,
    pub moon: Option<MoonTimer>,
    pub explosions: Vec<Explosion>,
    pub moon_explosions: Vec<MoonExplosion>,

    pub camera: Camera,
    pub boss_event: BossEvent,
    /// Distance scrolled, plus kill bonuses
    pub score: f64,
    /// Final score is showing
    pub display_score: bool,
    /// Best score from earlier runs this session
    pub high_score: u64,
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,

    /// Effects raised outside a step, handed out with the next one
    pub(crate) queued: Vec<Effect>,
    pub(crate) rng: Pcg32,
}

impl World {
    /// A fresh run: one player, the moon clock, and the contour's music
    pub fn new_game(settings: Settings) -> Self {
        let mut world = Self::build(settings, Mode::Playing);
        world
            .players
            .push(Player::new(0, PLAYER_START_X, PLAYER_START_Y));
        world.queued.push(Effect::PlaySound(world.settings.contour.music()));
        log::info!(
            "New {} run (seed {:#x})",
            world.settings.contour.as_str(),
            world.settings.seed
        );
        world
    }

    /// Attract mode shown behind the title menu
    pub fn new_menu(settings: Settings) -> Self {
        let splash_frames = settings.splash_frames;
        Self::build(settings, Mode::Menu { splash_frames })
    }

    fn build(settings: Settings, mode: Mode) -> Self {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let (tile_map, spawns) = TileMap::generate(&settings, 0.0, &mut rng);
        let moon = MoonTimer::new(settings.width - 200.0, 200.0);

        Self {
            camera: Camera::new(&settings),
            mode,
            paused: false,
            tile_map,
            terrain: spawns.terrain,
            underground: spawns.underground,
            players: Vec::new(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            moon: Some(moon),
            explosions: Vec::new(),
            moon_explosions: Vec::new(),
            boss_event: BossEvent::Idle,
            score: 0.0,
            display_score: false,
            high_score: 0,
            time_ticks: 0,
            elapsed: 0.0,
            queued: Vec::new(),
            rng,
            settings,
        }
    }

    /// Carry the session's best score into this world
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    pub fn in_menu(&self) -> bool {
        matches!(self.mode, Mode::Menu { .. })
    }

    /// The run is over once nobody is left or the final score is up
    pub fn is_over(&self) -> bool {
        self.mode == Mode::Playing && (self.players.is_empty() || self.display_score)
    }

    /// Score rounded down for display
    pub fn score_points(&self) -> u64 {
        self.score.max(0.0) as u64
    }

    pub fn hud(&self) -> Hud {
        let score = self.score_points();
        Hud {
            score,
            high_score: self.high_score.max(score),
            show_score: self.display_score,
            paused: self.paused,
            contour: self.settings.contour,
        }
    }

    /// Drop tiles that scrolled fully past the left edge, then grow the map
    /// by a column while live terrain is below the cap.
    pub fn maintain_terrain(&mut self) {
        let cutoff = -self.settings.rumble_power;
        self.terrain.retain(|tile| tile.rect.right() >= cutoff);
        self.underground.retain(|tile| tile.rect.right() >= cutoff);

        if self.terrain.len() >= self.settings.max_terrain_tiles {
            return;
        }
        let ext = self
            .tile_map
            .extend(1, self.camera.scroll_distance, &mut self.rng);
        self.terrain.extend(ext.tiles.terrain);
        self.underground.extend(ext.tiles.underground);
        if ext.spawn_enemy && !self.in_menu() {
            self.spawn_jumper_offscreen();
        }
    }

    /// New jumper just past the right edge, near the top
    pub fn spawn_jumper_offscreen(&mut self) {
        let tile = self.settings.tile_size;
        let jumper = JumperEnemy::new(self.settings.width + tile, tile);
        log::debug!("Jumper spawned at column {}", self.tile_map.cols());
        self.enemies.push(jumper);
    }

    pub fn spawn_explosion(&mut self, explosion: Explosion, effects: &mut Vec<Effect>) {
        effects.push(Effect::SpawnVisualEffect(
            VisualKind::Explosion,
            explosion.rect.center(),
        ));
        self.explosions.push(explosion);
    }

    pub fn spawn_moon_explosion(&mut self, center: Vec2, effects: &mut Vec<Effect>) {
        effects.push(Effect::SpawnVisualEffect(VisualKind::MoonExplosion, center));
        self.moon_explosions.push(MoonExplosion::new(center));
    }

    /// Centers of every living player
    pub fn player_centers(&self) -> Vec<Vec2> {
        self.players.iter().map(Player::center).collect()
    }

    /// Everything to draw this frame, back to front
    pub fn renderable_state(&self) -> Vec<Renderable> {
        let mut out = Vec::new();
        let mut push = |sprite, pos, frame| out.push(Renderable { sprite, pos, frame });

        if let Some(moon) = &self.moon {
            push(SpriteKind::Moon, moon.rect.origin(), moon.frame());
        }
        for bullet in &self.bullets {
            push(SpriteKind::Bullet(bullet.facing), bullet.rect.origin(), 0);
        }
        if let Some(boss) = &self.boss {
            push(SpriteKind::Boss(boss.stage), boss.mobile.body.rect.origin(), 0);
        }
        for jumper in &self.enemies {
            push(SpriteKind::Jumper, jumper.mobile.body.rect.origin(), 0);
        }
        for player in &self.players {
            push(SpriteKind::Player(player.facing), player.body.rect.origin(), 0);
        }
        for tile in &self.underground {
            push(SpriteKind::Underground, tile.rect.origin(), 0);
        }
        for tile in &self.terrain {
            push(SpriteKind::Terrain, tile.rect.origin(), 0);
        }
        for blast in &self.moon_explosions {
            push(SpriteKind::MoonExplosion, blast.rect.origin(), blast.frame);
        }
        for explosion in &self.explosions {
            push(SpriteKind::Explosion, explosion.rect.origin(), explosion.frame);
        }

        let tile = self.settings.tile_size;
        for player in &self.players {
            for i in 0..player.hp.max(0) {
                let pos = Vec2::new(tile * (i + 1) as f32, tile) - Vec2::splat(HEART_SIZE / 2.0);
                push(SpriteKind::Heart(player.id), pos, 0);
            }
        }

        out
    }
}

/// Heart icon edge length
const HEART_SIZE: f32 = 24.0;
