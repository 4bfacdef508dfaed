//! Physics integration, homing guidance, and boundary culling
//!
//! Runs over every active slot in increasing order (order only matters for
//! cache locality). Integration uses the uniform missile speed constant;
//! culling policy depends on the active game mode and the missile's owner.

use crate::buffer::{MissileFlags, MissileViews, PROP_BOMB_TIMER};
use crate::core::config::SimConfig;
use crate::entities::{AlienSnapshot, GameMode, MissileKind, WeaponKind};
use crate::foundation::math::{is_finite, Vec3};
use crate::protocol::{BombExplosion, FrameRequest, FrameResults};
use crate::sim::resolve_missile_id;

/// Run the physics and culling pass over the slot prefix
pub fn run(
    views: &mut MissileViews<'_>,
    slot_count: usize,
    request: &FrameRequest,
    config: &SimConfig,
    results: &mut FrameResults,
) {
    let input = &request.input;
    let scale = input.delta_time * input.time_multiplier;
    let step = scale * config.missile_speed;

    for slot in 0..slot_count {
        let flags = views.flags(slot);
        if !flags.is_active() {
            continue;
        }

        let kind = views.kind(slot);

        // Deployed alien bombs count down to a forced detonation instead of
        // flying forever.
        if kind == MissileKind::AlienOwned && flags.is_bomb_deployed() {
            let timer = views.property(slot, PROP_BOMB_TIMER) + scale;
            views.set_property(slot, PROP_BOMB_TIMER, timer);
            if timer >= config.bomb_explosion_delay {
                // Detonation retires the slot: the host learns of it from
                // the explosion entry and may reuse the slot immediately
                views.set_flags(
                    slot,
                    (flags | MissileFlags::EXPLODED) & !MissileFlags::ACTIVE,
                );
                results.explosions.push(BombExplosion {
                    slot,
                    missile_id: resolve_missile_id(&request.id_table, views.external_id(slot)),
                    position: views.position(slot),
                });
                continue;
            }
        }

        let position = views.position(slot);
        let mut velocity = views.velocity(slot);

        if flags.is_homing() {
            if let Some(steered) = steer_toward_nearest(
                position,
                velocity,
                &input.aliens,
                config.homing_range,
                config.homing_strength,
            ) {
                velocity = steered;
                views.set_velocity(slot, velocity);
                results.stats.homing_updates += 1;
            }
        }

        let integrated = position + velocity * step;
        results.stats.integrated += 1;

        if should_cull(input.mode, kind, views.weapon(slot), integrated, config) {
            views.set_flags(slot, flags & !MissileFlags::ACTIVE);
            results.culled_slots.push(slot as u32);
            results.stats.culled += 1;
        } else {
            views.set_position(slot, integrated);
        }
    }
}

/// Steer a homing missile toward the nearest valid alien
///
/// Proportional-only guidance: the velocity direction is blended toward the
/// target direction by a fixed strength and rescaled to the original speed.
/// Returns `None` when no alien lies within homing range, leaving velocity
/// untouched that frame.
fn steer_toward_nearest(
    position: Vec3,
    velocity: Vec3,
    aliens: &[AlienSnapshot],
    range: f32,
    strength: f32,
) -> Option<Vec3> {
    let mut best_d2 = range * range;
    let mut best: Option<(Vec3, f32)> = None;

    for alien in aliens {
        if alien.invulnerable || !is_finite(&alien.position) {
            continue;
        }
        let d2 = (alien.position - position).norm_squared();
        if d2 > best_d2 {
            continue;
        }
        best_d2 = d2;
        // Square root only when a new nearest candidate is found
        best = Some((alien.position, d2.sqrt()));
    }

    let (target, distance) = best?;
    if distance <= f32::EPSILON {
        return None;
    }
    let speed = velocity.norm();
    if speed <= f32::EPSILON {
        return None;
    }

    let target_dir = (target - position) / distance;
    let current_dir = velocity / speed;
    let blended = current_dir.lerp(&target_dir, strength);
    let norm = blended.norm();
    if norm <= f32::EPSILON {
        return None;
    }
    // Guidance adjusts direction, never speed
    Some(blended * (speed / norm))
}

/// Whether an integrated position is out of play for this mode and owner
///
/// Comparisons are inclusive: a missile exactly at a limit is culled.
fn should_cull(
    mode: GameMode,
    kind: MissileKind,
    weapon: WeaponKind,
    position: Vec3,
    config: &SimConfig,
) -> bool {
    match mode {
        GameMode::FreeFlight => {
            position.norm_squared() >= config.free_flight_radius * config.free_flight_radius
        }
        GameMode::Campaign => {
            if position.x.abs() >= config.lateral_bound
                || position.y.abs() >= config.vertical_bound
            {
                return true;
            }
            match kind {
                // Player missiles fly toward -Z; heavier weapons reach further
                MissileKind::Player | MissileKind::Wingman => {
                    position.z <= -config.weapon_ranges.range(weapon)
                }
                // Alien missiles fly toward +Z and stop on the player's side
                MissileKind::AlienOwned => position.z >= config.alien_depth_limit,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BufferLayout, MissileBuffer};
    use crate::entities::MissileRecord;
    use crate::protocol::FrameInput;
    use approx::assert_relative_eq;

    fn request(input: FrameInput, slot_count: usize) -> FrameRequest {
        FrameRequest {
            slot_count,
            id_table: Vec::new(),
            input,
        }
    }

    fn alien_at(position: Vec3) -> AlienSnapshot {
        AlienSnapshot {
            id: 1,
            position,
            radius: 2.0,
            invulnerable: false,
            saucer: false,
        }
    }

    fn run_frame(buffer: &mut MissileBuffer, req: &FrameRequest, config: &SimConfig) -> FrameResults {
        let mut results = FrameResults::default();
        let mut views = buffer.views();
        run(&mut views, req.slot_count, req, config, &mut results);
        results
    }

    #[test]
    fn test_constant_velocity_integration() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        buffer.write_slot(
            0,
            &MissileRecord::alien_shot(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0)),
        );

        let req = request(FrameInput::campaign(0.1, 1.0), 1);
        run_frame(&mut buffer, &req, &config);
        // 50 units/s * 0.1 s = 5 units along +Z
        assert_relative_eq!(buffer.views().position(0).z, 5.0, epsilon = 1e-5);

        for _ in 0..3 {
            run_frame(&mut buffer, &req, &config);
        }
        assert_relative_eq!(buffer.views().position(0).z, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_time_multiplier_scales_integration() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        buffer.write_slot(
            0,
            &MissileRecord::alien_shot(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0)),
        );
        let req = request(FrameInput::campaign(0.1, 0.5), 1);
        run_frame(&mut buffer, &req, &config);
        assert_relative_eq!(buffer.views().position(0).z, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_inactive_slots_are_skipped() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        buffer.write_slot(
            0,
            &MissileRecord::alien_shot(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0)),
        );
        {
            let mut views = buffer.views();
            let flags = views.flags(0) & !MissileFlags::ACTIVE;
            views.set_flags(0, flags);
        }
        let req = request(FrameInput::campaign(0.1, 1.0), 1);
        let results = run_frame(&mut buffer, &req, &config);
        assert_eq!(results.stats.integrated, 0);
        assert_eq!(buffer.views().position(0).z, 0.0);
    }

    #[test]
    fn test_homing_preserves_speed() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        let record = MissileRecord::player_shot(
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, -5.0),
            WeaponKind::Rocket,
        )
        .with_homing();
        buffer.write_slot(0, &record);

        let mut input = FrameInput::campaign(0.016, 1.0);
        input.aliens.push(alien_at(Vec3::new(30.0, 0.0, -60.0)));
        let req = request(input, 1);
        let results = run_frame(&mut buffer, &req, &config);

        assert_eq!(results.stats.homing_updates, 1);
        let velocity = buffer.views().velocity(0);
        assert_relative_eq!(velocity.norm(), 5.0, epsilon = 1e-4);
        // Steered toward the alien on +X
        assert!(velocity.x > 0.0);
    }

    #[test]
    fn test_homing_without_target_in_range_leaves_velocity() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        let record = MissileRecord::player_shot(
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, -5.0),
            WeaponKind::Default,
        )
        .with_homing();
        buffer.write_slot(0, &record);

        let mut input = FrameInput::campaign(0.016, 1.0);
        // Far beyond the 120-unit homing range
        input.aliens.push(alien_at(Vec3::new(0.0, 0.0, -500.0)));
        let req = request(input, 1);
        let results = run_frame(&mut buffer, &req, &config);

        assert_eq!(results.stats.homing_updates, 0);
        assert_eq!(buffer.views().velocity(0), Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_homing_skips_invulnerable_aliens() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        let record = MissileRecord::player_shot(
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, -5.0),
            WeaponKind::Default,
        )
        .with_homing();
        buffer.write_slot(0, &record);

        let mut input = FrameInput::campaign(0.016, 1.0);
        let mut shielded = alien_at(Vec3::new(10.0, 0.0, -20.0));
        shielded.invulnerable = true;
        input.aliens.push(shielded);
        let req = request(input, 1);
        let results = run_frame(&mut buffer, &req, &config);

        assert_eq!(results.stats.homing_updates, 0);
        assert_eq!(buffer.views().velocity(0), Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_homing_picks_nearest_of_two() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        let record = MissileRecord::player_shot(
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, -5.0),
            WeaponKind::Default,
        )
        .with_homing();
        buffer.write_slot(0, &record);

        let mut input = FrameInput::campaign(0.016, 1.0);
        input.aliens.push(alien_at(Vec3::new(-40.0, 0.0, -40.0)));
        input.aliens.push(alien_at(Vec3::new(15.0, 0.0, -15.0)));
        let req = request(input, 1);
        run_frame(&mut buffer, &req, &config);

        // Steered toward the nearer alien, which sits on +X
        assert!(buffer.views().velocity(0).x > 0.0);
    }

    #[test]
    fn test_campaign_cull_exact_weapon_range() {
        let config = SimConfig::default();
        let range = config.weapon_ranges.range(WeaponKind::Default);
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));

        // Exactly at range after one 5-unit step: culled
        buffer.write_slot(
            0,
            &MissileRecord::player_shot(
                Vec3::new(0.0, 0.0, -(range - 5.0)),
                Vec3::new(0.0, 0.0, -1.0),
                WeaponKind::Default,
            ),
        );
        // One unit short of range: survives
        buffer.write_slot(
            1,
            &MissileRecord::player_shot(
                Vec3::new(0.0, 0.0, -(range - 6.0)),
                Vec3::new(0.0, 0.0, -1.0),
                WeaponKind::Default,
            ),
        );

        let req = request(FrameInput::campaign(0.1, 1.0), 2);
        let results = run_frame(&mut buffer, &req, &config);

        assert_eq!(results.culled_slots, vec![0]);
        assert_eq!(results.stats.culled, 1);
        let views = buffer.views();
        assert!(!views.is_active(0));
        assert!(views.is_active(1));
    }

    #[test]
    fn test_campaign_heavier_weapon_outranges_default() {
        let config = SimConfig::default();
        let default_range = config.weapon_ranges.range(WeaponKind::Default);
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        // Past the default range but well within railgun range
        buffer.write_slot(
            0,
            &MissileRecord::player_shot(
                Vec3::new(0.0, 0.0, -(default_range + 50.0)),
                Vec3::new(0.0, 0.0, -1.0),
                WeaponKind::Railgun,
            ),
        );
        let req = request(FrameInput::campaign(0.1, 1.0), 1);
        let results = run_frame(&mut buffer, &req, &config);
        assert!(results.culled_slots.is_empty());
        assert!(buffer.views().is_active(0));
    }

    #[test]
    fn test_campaign_alien_missile_culled_past_player_side() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        buffer.write_slot(
            0,
            &MissileRecord::alien_shot(Vec3::new(0.0, 0.0, 41.0), Vec3::new(0.0, 0.0, 1.0)),
        );
        let req = request(FrameInput::campaign(0.1, 1.0), 1);
        let results = run_frame(&mut buffer, &req, &config);
        // 41 + 5 = 46 >= 45: gone
        assert_eq!(results.culled_slots, vec![0]);
        assert!(!buffer.views().is_active(0));
    }

    #[test]
    fn test_campaign_lateral_bound_cull() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        buffer.write_slot(
            0,
            &MissileRecord::player_shot(
                Vec3::new(58.0, 0.0, -20.0),
                Vec3::new(1.0, 0.0, 0.0),
                WeaponKind::Default,
            ),
        );
        let req = request(FrameInput::campaign(0.1, 1.0), 1);
        let results = run_frame(&mut buffer, &req, &config);
        assert_eq!(results.stats.culled, 1);
    }

    #[test]
    fn test_free_flight_radius_boundary() {
        let config = SimConfig::default();
        let radius = config.free_flight_radius;
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        // Ends at radius - 5: survives
        buffer.write_slot(
            0,
            &MissileRecord::player_shot(
                Vec3::new(0.0, 0.0, radius - 10.0),
                Vec3::new(0.0, 0.0, 1.0),
                WeaponKind::Default,
            ),
        );
        // Ends at radius: culled
        buffer.write_slot(
            1,
            &MissileRecord::player_shot(
                Vec3::new(0.0, 0.0, radius - 5.0),
                Vec3::new(0.0, 0.0, 1.0),
                WeaponKind::Default,
            ),
        );
        let req = request(FrameInput::free_flight(0.1, 1.0), 2);
        let results = run_frame(&mut buffer, &req, &config);
        assert_eq!(results.culled_slots, vec![1]);
        let views = buffer.views();
        assert!(views.is_active(0));
        assert!(!views.is_active(1));
    }

    #[test]
    fn test_bomb_detonates_after_delay() {
        let config = SimConfig::default();
        let mut buffer = MissileBuffer::new(BufferLayout::new(4));
        // Start deep enough that three 1 s frames (50 units each) fit before
        // the 45-unit alien depth limit would cull the bomb (see F6)
        let mut bomb =
            MissileRecord::alien_shot(Vec3::new(0.0, 0.0, -120.0), Vec3::new(0.0, 0.0, 1.0));
        bomb.weapon = WeaponKind::Bomb;
        buffer.write_slot(0, &bomb);

        let req = request(FrameInput::campaign(1.0, 1.0), 1);

        // Two seconds in: timer at 2.0 < 2.5, still flying
        run_frame(&mut buffer, &req, &config);
        let results = run_frame(&mut buffer, &req, &config);
        assert!(results.explosions.is_empty());
        let z_before = buffer.views().position(0).z;

        // Third second crosses the 2.5 s delay: detonate, retire the slot,
        // no integration
        let results = run_frame(&mut buffer, &req, &config);
        assert_eq!(results.explosions.len(), 1);
        assert_eq!(results.explosions[0].slot, 0);
        let views = buffer.views();
        assert!(views.flags(0).has_exploded());
        assert!(!views.is_active(0));
        assert_eq!(views.position(0).z, z_before);

        // Retired bombs neither integrate nor re-emit
        drop(views);
        let results = run_frame(&mut buffer, &req, &config);
        assert!(results.explosions.is_empty());
        assert_eq!(results.stats.integrated, 0);
    }
}
