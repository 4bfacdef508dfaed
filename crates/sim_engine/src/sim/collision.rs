//! Broad-phase collision detection
//!
//! Rebuilds the spatial hash from this frame's snapshots, then tests every
//! active player-side missile against the 3x3x3 cell neighborhood around it.
//! Per missile and target class only the closest contact is reported, so a
//! missile passing between two aliens damages exactly one. Alien missiles
//! skip the grid entirely and are tested against the player directly.

use crate::buffer::{MissileViews, PROP_DAMAGE, PROP_SIZE};
use crate::core::config::SimConfig;
use crate::foundation::math::{is_finite, Vec3};
use crate::protocol::{AlienHit, AsteroidHit, FrameRequest, FrameResults, PlayerHit};
use crate::sim::hit_resolver;
use crate::sim::resolve_missile_id;
use crate::spatial::{GridEntry, SpatialHashGrid, TargetKind};

/// Run the collision pass over the slot prefix
pub fn run(
    grid: &mut SpatialHashGrid,
    views: &MissileViews<'_>,
    slot_count: usize,
    request: &FrameRequest,
    config: &SimConfig,
    results: &mut FrameResults,
) {
    rebuild_grid(grid, request, results);

    let input = &request.input;
    let player = is_finite(&input.player.position).then_some(input.player.position);
    if player.is_none() {
        results.stats.skipped_snapshots += 1;
    }

    for slot in 0..slot_count {
        if !views.is_active(slot) {
            continue;
        }

        let position = views.position(slot);
        let size = views.property(slot, PROP_SIZE);
        let damage = views.property(slot, PROP_DAMAGE);
        let missile_id = resolve_missile_id(&request.id_table, views.external_id(slot));

        if views.kind(slot).is_player_side() {
            test_against_grid(grid, slot, position, size, missile_id, damage, config, results);
        } else if let Some(player_position) = player {
            test_against_player(
                slot,
                position,
                player_position,
                size,
                missile_id,
                damage,
                config,
                results,
            );
        }
    }
}

/// Rebuild the grid from this frame's snapshots
///
/// Invulnerable aliens and decorative asteroids never enter the grid, so no
/// later check has to re-filter them. Entries with non-finite positions are
/// dropped and counted rather than poisoning every distance compare.
fn rebuild_grid(grid: &mut SpatialHashGrid, request: &FrameRequest, results: &mut FrameResults) {
    grid.clear();

    for alien in &request.input.aliens {
        if alien.invulnerable {
            continue;
        }
        if !is_finite(&alien.position) {
            results.stats.skipped_snapshots += 1;
            continue;
        }
        grid.insert(GridEntry {
            id: alien.id,
            position: alien.position,
            radius: alien.radius,
            kind: TargetKind::Alien {
                saucer: alien.saucer,
            },
        });
    }

    for asteroid in &request.input.asteroids {
        if asteroid.doodad {
            continue;
        }
        if !is_finite(&asteroid.position) {
            results.stats.skipped_snapshots += 1;
            continue;
        }
        grid.insert(GridEntry {
            id: asteroid.id,
            position: asteroid.position,
            radius: asteroid.radius,
            kind: TargetKind::Asteroid,
        });
    }

    results.stats.grid_cells = grid.occupied_cells() as u32;
}

/// Closest-contact test for a player-side missile against the grid
fn test_against_grid(
    grid: &SpatialHashGrid,
    slot: usize,
    position: Vec3,
    size: f32,
    missile_id: u64,
    damage: f32,
    config: &SimConfig,
    results: &mut FrameResults,
) {
    let mut best_alien: Option<(GridEntry, f32)> = None;
    let mut best_alien_d2 = f32::INFINITY;
    let mut best_asteroid: Option<(GridEntry, f32)> = None;
    let mut best_asteroid_d2 = f32::INFINITY;

    grid.visit_neighborhood(position, |entry| {
        results.stats.candidates_tested += 1;
        let threshold = entry.radius + size + config.collision_margin;
        let d2 = (entry.position - position).norm_squared();
        if d2 > threshold * threshold {
            return;
        }
        // Square root only on a new closest candidate
        match entry.kind {
            TargetKind::Alien { .. } => {
                if d2 < best_alien_d2 {
                    best_alien_d2 = d2;
                    best_alien = Some((*entry, d2.sqrt()));
                }
            }
            TargetKind::Asteroid => {
                if d2 < best_asteroid_d2 {
                    best_asteroid_d2 = d2;
                    best_asteroid = Some((*entry, d2.sqrt()));
                }
            }
        }
    });

    if let Some((entry, distance)) = best_alien {
        let saucer = matches!(entry.kind, TargetKind::Alien { saucer: true });
        results.alien_hits.push(AlienHit {
            slot,
            missile_id,
            alien_id: entry.id,
            distance,
            component: hit_resolver::resolve(position, entry.position, entry.radius, saucer),
            damage,
        });
    }

    if let Some((entry, distance)) = best_asteroid {
        results.asteroid_hits.push(AsteroidHit {
            slot,
            missile_id,
            asteroid_id: entry.id,
            distance,
            damage,
        });
    }
}

/// Direct contact test for an alien missile against the player
fn test_against_player(
    slot: usize,
    position: Vec3,
    player_position: Vec3,
    size: f32,
    missile_id: u64,
    damage: f32,
    config: &SimConfig,
    results: &mut FrameResults,
) {
    let d2 = (player_position - position).norm_squared();
    // Generous outer bound first, so the common far-away case costs one
    // squared compare
    if d2 > config.player_hit_outer * config.player_hit_outer {
        return;
    }
    results.stats.candidates_tested += 1;

    let threshold = config.player_radius + size + config.collision_margin;
    if d2 > threshold * threshold {
        return;
    }

    results.player_hits.push(PlayerHit {
        slot,
        missile_id,
        distance: d2.sqrt(),
        component: hit_resolver::resolve(position, player_position, config.player_radius, false),
        damage,
    });
}
