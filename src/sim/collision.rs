//! Collision detection and resolution
//!
//! Tile collisions pick a side by comparing edge-to-edge penetration. The
//! fiddly case is a body sliding across the seam between two tiles, where two
//! sides are almost equally close: those corner grazes are ignored so bodies
//! don't snag on the grid.
//!
//! Group collisions (bullets, enemies, players) are two-phase: `detect_groups`
//! reads every collection and returns decisions, the caller applies them.
//! A bullet is claimed by at most one target per frame.

use super::bullet::Bullet;
use super::enemy::{JumperEnemy, MoonEnemy};
use super::geom::Rect;
use super::physics::{Body, Facing};
use super::player::Player;
use super::tilemap::Tile;
use crate::consts::*;

/// Landed bodies sink this far into the floor so they keep touching it next frame
pub const FLOOR_SINK: f32 = 1.0;

/// Side of a tile a body was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileHit {
    /// Landed on top of the tile
    Floor,
    /// Bumped the underside of the tile
    Ceiling,
    /// Pushed out sideways; the facing points away from the wall
    Wall(Facing),
}

/// Edge-to-edge distances between a body and an overlapping tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub ceiling: f32,
    pub ground: f32,
    /// Tile's right edge to the body's left edge (wall on the body's left)
    pub right_wall: f32,
    /// Tile's left edge to the body's right edge (wall on the body's right)
    pub left_wall: f32,
}

impl Penetration {
    pub fn between(body: &Rect, tile: &Rect) -> Self {
        Self {
            ceiling: (tile.bottom() - body.top()).abs(),
            ground: (tile.top() - body.bottom()).abs(),
            right_wall: (tile.right() - body.left()).abs(),
            left_wall: (tile.left() - body.right()).abs(),
        }
    }

    /// Decide which side to resolve against, or `None` for a corner graze.
    ///
    /// A ground distance smaller than the fall speed still counts as a landing
    /// so fast fallers don't clip into thin ledges.
    pub fn classify(&self, fall_speed: f32) -> Option<TileHit> {
        let mut sorted = [self.ceiling, self.ground, self.right_wall, self.left_wall];
        sorted.sort_by(f32::total_cmp);

        if (sorted[0] - sorted[1]).abs() < CORNER_HIT_THRESHOLD {
            return None;
        }

        let nearest = sorted[0];
        if self.right_wall == nearest {
            Some(TileHit::Wall(Facing::Right))
        } else if self.left_wall == nearest {
            Some(TileHit::Wall(Facing::Left))
        } else if self.ground == nearest || self.ground < fall_speed.abs() {
            Some(TileHit::Floor)
        } else {
            Some(TileHit::Ceiling)
        }
    }
}

/// An entity whose state machine reacts to tile contact
pub trait TileResponder {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    /// Called after the body was moved flush against the tile
    fn on_tile_hit(&mut self, hit: TileHit);
    /// Called when no tile overlaps the body this frame
    fn on_airborne(&mut self);
}

/// Indices of tiles overlapping `rect`
pub fn overlapping_tiles(rect: &Rect, tiles: &[Tile]) -> Vec<usize> {
    tiles
        .iter()
        .enumerate()
        .filter(|(_, tile)| rect.intersects(&tile.rect))
        .map(|(i, _)| i)
        .collect()
}

/// Push a body out of every overlapping tile and notify its state machine.
///
/// Must run after this frame's integration. Returns whether any tile overlapped,
/// corner grazes included.
pub fn resolve_tile_collisions<E: TileResponder>(entity: &mut E, tiles: &[Tile]) -> bool {
    let hits = overlapping_tiles(&entity.body().rect, tiles);

    for &index in &hits {
        let tile = tiles[index].rect;
        let body = entity.body_mut();
        let Some(hit) = Penetration::between(&body.rect, &tile).classify(body.vel.y) else {
            continue;
        };

        match hit {
            TileHit::Wall(Facing::Right) => body.rect.set_left(tile.right()),
            TileHit::Wall(Facing::Left) => body.rect.set_right(tile.left()),
            TileHit::Floor => body.rect.set_bottom(tile.top() + FLOOR_SINK),
            TileHit::Ceiling => body.rect.set_top(tile.bottom()),
        }
        entity.on_tile_hit(hit);
    }

    if hits.is_empty() {
        entity.on_airborne();
    }
    !hits.is_empty()
}

/// Keep a player inside [0, width]. Returns true if the player was stopped.
pub fn clamp_player_to_world(body: &mut Body, width: f32) -> bool {
    if body.rect.left() >= 0.0 && body.rect.right() <= width {
        return false;
    }
    body.vel.x = 0.0;
    if body.rect.left() <= 0.0 {
        body.rect.set_left(1.0);
    } else if body.rect.right() >= width {
        body.rect.set_right(width - 1.0);
    }
    true
}

/// Keep an enemy inside [0, width], bouncing it off the edge
pub fn bounce_enemy_off_world_edge(body: &mut Body, width: f32) {
    if body.rect.left() <= 0.0 {
        body.rect.set_left(0.0);
        body.vel.x = -body.vel.x;
    } else if body.rect.right() >= width {
        body.rect.set_right(width);
        body.vel.x = -body.vel.x;
    }
}

/// Who touched a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attacker {
    Jumper(usize),
    Boss,
}

/// Every group collision decided for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupCollisions {
    /// Bullet indices to destroy, ascending
    pub spent_bullets: Vec<usize>,
    /// Jumper indices destroyed by bullets, ascending
    pub jumpers_shot: Vec<usize>,
    /// Bullets that struck the boss
    pub boss_hits: u32,
    /// Enemy-vs-player contacts as (attacker, player index)
    pub player_contacts: Vec<(Attacker, usize)>,
}

/// Detect bullet-vs-tile, bullet-vs-enemy and enemy-vs-player collisions.
///
/// Bullets that hit terrain are spent before enemies are considered, and each
/// bullet is claimed by the first enemy it overlaps.
pub fn detect_groups(
    bullets: &[Bullet],
    terrain: &[Tile],
    jumpers: &[JumperEnemy],
    boss: Option<&MoonEnemy>,
    players: &[Player],
) -> GroupCollisions {
    let mut spent = vec![false; bullets.len()];
    let mut out = GroupCollisions::default();

    for (i, bullet) in bullets.iter().enumerate() {
        if terrain.iter().any(|tile| bullet.rect.intersects(&tile.rect)) {
            spent[i] = true;
        }
    }

    for (j, jumper) in jumpers.iter().enumerate() {
        let rect = jumper.mobile.body.rect;
        for (p, player) in players.iter().enumerate() {
            if rect.intersects(&player.body.rect) {
                out.player_contacts.push((Attacker::Jumper(j), p));
            }
        }

        let mut shot = false;
        for (i, bullet) in bullets.iter().enumerate() {
            if !spent[i] && rect.intersects(&bullet.rect) {
                spent[i] = true;
                shot = true;
            }
        }
        if shot {
            out.jumpers_shot.push(j);
        }
    }

    if let Some(boss) = boss {
        let rect = boss.mobile.body.rect;
        for (p, player) in players.iter().enumerate() {
            if rect.intersects(&player.body.rect) {
                out.player_contacts.push((Attacker::Boss, p));
            }
        }
        for (i, bullet) in bullets.iter().enumerate() {
            if !spent[i] && rect.intersects(&bullet.rect) {
                spent[i] = true;
                out.boss_hits += 1;
            }
        }
    }

    out.spent_bullets = spent
        .iter()
        .enumerate()
        .filter(|(_, spent)| **spent)
        .map(|(i, _)| i)
        .collect();
    out
}

/// Remove the elements at the given ascending indices
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) {
    let mut next = indices.iter().peekable();
    let mut index = 0;
    items.retain(|_| {
        let remove = next.peek().is_some_and(|&&i| i == index);
        if remove {
            next.next();
        }
        index += 1;
        !remove
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Minimal responder recording what it was told
    struct Recorder {
        body: Body,
        hits: Vec<TileHit>,
        airborne: bool,
    }

    impl Recorder {
        fn new(rect: Rect, vel: Vec2) -> Self {
            Self {
                body: Body { rect, vel, ..Body::new(rect) },
                hits: Vec::new(),
                airborne: false,
            }
        }
    }

    impl TileResponder for Recorder {
        fn body(&self) -> &Body {
            &self.body
        }
        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }
        fn on_tile_hit(&mut self, hit: TileHit) {
            self.hits.push(hit);
        }
        fn on_airborne(&mut self) {
            self.airborne = true;
        }
    }

    fn tile(x: f32, y: f32) -> Tile {
        Tile {
            rect: Rect::new(x, y, 32.0, 32.0),
        }
    }

    #[test]
    fn test_landing_resolves_to_floor() {
        // Bottom edge 5 units into a tile whose top is at y=100
        let mut recorder = Recorder::new(Rect::new(10.0, 61.0, 28.0, 44.0), Vec2::new(0.0, 8.0));
        let collided = resolve_tile_collisions(&mut recorder, &[tile(0.0, 100.0)]);

        assert!(collided);
        assert_eq!(recorder.hits, vec![TileHit::Floor]);
        assert_eq!(recorder.body.rect.bottom(), 100.0 + FLOOR_SINK);
    }

    #[test]
    fn test_fast_fall_counts_as_landing() {
        // Penetration 12 from the top, but the left edge is 10 past the tile's right edge
        let pen = Penetration {
            ceiling: 40.0,
            ground: 12.0,
            right_wall: 10.0,
            left_wall: 50.0,
        };
        assert_eq!(pen.classify(0.0), Some(TileHit::Wall(Facing::Right)));

        let pen = Penetration {
            ceiling: 10.0,
            ground: 12.0,
            right_wall: 40.0,
            left_wall: 50.0,
        };
        assert_eq!(pen.classify(2.0), Some(TileHit::Ceiling));
        assert_eq!(pen.classify(15.0), Some(TileHit::Floor));
    }

    #[test]
    fn test_corner_graze_is_ignored_but_collided() {
        // Ground penetration 3.0 and right-wall penetration 3.5: ambiguous
        let rect = Rect::new(28.5, -9.0, 28.0, 44.0);
        let pen = Penetration::between(&rect, &tile(0.0, 32.0).rect);
        assert!((pen.ground - 3.0).abs() < 1e-4);
        assert!((pen.right_wall - 3.5).abs() < 1e-4);

        let mut recorder = Recorder::new(rect, Vec2::new(0.0, 0.0));
        let collided = resolve_tile_collisions(&mut recorder, &[tile(0.0, 32.0)]);
        assert!(collided);
        assert!(recorder.hits.is_empty());
        assert!(!recorder.airborne);
        assert_eq!(recorder.body.rect, rect);
    }

    #[test]
    fn test_walls() {
        // Overlapping the left side of a tile by 4 units
        let mut recorder = Recorder::new(Rect::new(0.0, 40.0, 28.0, 20.0), Vec2::new(3.0, 0.0));
        resolve_tile_collisions(&mut recorder, &[tile(24.0, 32.0)]);
        assert_eq!(recorder.hits, vec![TileHit::Wall(Facing::Left)]);
        assert_eq!(recorder.body.rect.right(), 24.0);

        // Overlapping the right side of a tile by 4 units
        let mut recorder = Recorder::new(Rect::new(28.0, 40.0, 28.0, 20.0), Vec2::new(-3.0, 0.0));
        resolve_tile_collisions(&mut recorder, &[tile(0.0, 32.0)]);
        assert_eq!(recorder.hits, vec![TileHit::Wall(Facing::Right)]);
        assert_eq!(recorder.body.rect.left(), 32.0);
    }

    #[test]
    fn test_no_overlap_is_airborne() {
        let mut recorder = Recorder::new(Rect::new(0.0, 0.0, 10.0, 10.0), Vec2::ZERO);
        assert!(!resolve_tile_collisions(&mut recorder, &[tile(100.0, 100.0)]));
        assert!(recorder.airborne);
    }

    fn shot(x: f32, y: f32) -> Bullet {
        Bullet {
            rect: Rect::new(x, y, BULLET_WIDTH, BULLET_HEIGHT),
            dx: BULLET_SPEED,
            facing: Facing::Right,
        }
    }

    #[test]
    fn test_terrain_spends_bullet() {
        let bullets = [shot(10.0, 110.0), shot(300.0, 10.0)];
        let out = detect_groups(&bullets, &[tile(0.0, 100.0)], &[], None, &[]);
        assert_eq!(out.spent_bullets, vec![0]);
        assert!(out.jumpers_shot.is_empty());
        assert_eq!(out.boss_hits, 0);
    }

    #[test]
    fn test_terrain_claims_bullet_before_jumper() {
        // Jumper standing in the same spot as the tile the bullet hits
        let bullets = [shot(10.0, 110.0)];
        let jumpers = [JumperEnemy::new(0.0, 100.0)];
        let out = detect_groups(&bullets, &[tile(0.0, 100.0)], &jumpers, None, &[]);
        assert_eq!(out.spent_bullets, vec![0]);
        assert!(out.jumpers_shot.is_empty());
    }

    #[test]
    fn test_bullet_claimed_by_first_jumper_only() {
        let bullets = [shot(20.0, 10.0)];
        let jumpers = [JumperEnemy::new(0.0, 0.0), JumperEnemy::new(16.0, 0.0)];
        let boss = MoonEnemy::new(0.0, 0.0);
        let out = detect_groups(&bullets, &[], &jumpers, Some(&boss), &[]);
        assert_eq!(out.spent_bullets, vec![0]);
        assert_eq!(out.jumpers_shot, vec![0]);
        assert_eq!(out.boss_hits, 0);
    }

    #[test]
    fn test_player_clamp() {
        let mut body = Body::new(Rect::new(-3.0, 0.0, 10.0, 10.0));
        body.vel.x = -4.0;
        assert!(clamp_player_to_world(&mut body, 100.0));
        assert_eq!(body.rect.left(), 1.0);
        assert_eq!(body.vel.x, 0.0);

        let mut body = Body::new(Rect::new(95.0, 0.0, 10.0, 10.0));
        body.vel.x = 4.0;
        assert!(clamp_player_to_world(&mut body, 100.0));
        assert_eq!(body.rect.right(), 99.0);

        let mut body = Body::new(Rect::new(50.0, 0.0, 10.0, 10.0));
        assert!(!clamp_player_to_world(&mut body, 100.0));
    }

    #[test]
    fn test_enemy_bounces_off_edges() {
        let mut body = Body::new(Rect::new(95.0, 0.0, 10.0, 10.0));
        body.vel.x = 6.0;
        bounce_enemy_off_world_edge(&mut body, 100.0);
        assert_eq!(body.rect.right(), 100.0);
        assert_eq!(body.vel.x, -6.0);
    }

    #[test]
    fn test_remove_indices() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        remove_indices(&mut items, &[0, 2, 4]);
        assert_eq!(items, vec!['b', 'd']);

        let mut items = vec![1, 2, 3];
        remove_indices(&mut items, &[]);
        assert_eq!(items, vec![1, 2, 3]);
    }
}
