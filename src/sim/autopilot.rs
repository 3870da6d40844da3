//! Demo mode: the game plays itself
//!
//! Produces one frame of input for the first player: run right, hop walls,
//! and shoot at anything ahead.

use super::geom::Rect;
use super::state::World;
use super::tick::InputEvent;

/// Bullets allowed in flight before the autopilot holds fire
const MAX_BULLETS_IN_FLIGHT: usize = 3;

/// How far ahead (in tiles) the autopilot looks for walls
const WALL_LOOKAHEAD_TILES: f32 = 1.0;

pub fn drive(world: &World) -> Vec<InputEvent> {
    let Some(player) = world.players.first() else {
        return Vec::new();
    };
    if world.paused || world.in_menu() {
        return Vec::new();
    }

    let mut inputs = vec![InputEvent::Right];
    let body = player.body.rect;
    let tile = world.settings.tile_size;

    // Anything solid just ahead, above our feet
    let ahead = Rect::new(
        body.right(),
        body.top(),
        tile * WALL_LOOKAHEAD_TILES,
        body.h - tile / 2.0,
    );
    let wall_ahead = world.terrain.iter().any(|t| ahead.intersects(&t.rect));
    let falling = player.body.vel.y > 0.0;
    if wall_ahead && (player.body.is_grounded() || player.body.is_wall_sliding() || falling) {
        inputs.push(InputEvent::Jump);
    }

    // Shoot at enemies in front, roughly level with us
    let lane = body.top() - tile * 2.0..body.bottom() + tile * 2.0;
    let target_ahead = world.enemies.iter().any(|jumper| {
        let center = jumper.mobile.body.rect.center();
        center.x > body.right() && lane.contains(&center.y)
    }) || world.boss.is_some();
    if target_ahead && world.bullets.len() < MAX_BULLETS_IN_FLIGHT {
        inputs.push(InputEvent::Shoot);
    }

    inputs
}
