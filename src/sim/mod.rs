//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame; velocities and timers are per frame
//! - Seeded RNG only, and only for cosmetic or spawn variance
//! - Stable iteration order (entity groups are plain vectors)
//! - No rendering, audio or platform dependencies: side effects are returned as data

pub mod autopilot;
pub mod bullet;
pub mod camera;
pub mod collision;
pub mod enemy;
pub mod fx;
pub mod geom;
pub mod physics;
pub mod player;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use bullet::Bullet;
pub use camera::{BossEvent, Camera};
pub use collision::{Penetration, TileHit, TileResponder, resolve_tile_collisions};
pub use enemy::{BossStage, JumperEnemy, Mobile, MoonEnemy};
pub use fx::{Explosion, MoonExplosion, MoonTimer};
pub use geom::Rect;
pub use physics::{Body, Facing, Footing};
pub use player::Player;
pub use state::{Effect, Hud, Mode, Renderable, SoundId, SpriteKind, VisualKind, World};
pub use tick::{InputEvent, step_simulation};
pub use tilemap::{Cell, Tile, TileMap};
