//! Impact offset to hit component resolution
//!
//! Turns a contact between a missile and a target into a named sub-part of
//! the target, from the missile's offset in the target's local frame. Two
//! body plans exist: the standard fighter silhouette and the flying saucer,
//! whose dome is narrower and whose rim extends further out.

use crate::entities::HitComponent;
use crate::foundation::math::Vec3;

// Region thresholds as fractions of the target's bounding radius.
const FIGHTER_NOSE_DEPTH: f32 = 0.35;
const FIGHTER_WING_SPAN: f32 = 0.4;
const SAUCER_NOSE_DEPTH: f32 = 0.5;
const SAUCER_NOSE_WIDTH: f32 = 0.3;
const SAUCER_WING_SPAN: f32 = 0.6;

/// Resolve which sub-part of a target a missile struck
///
/// Targets face the player along +Z, so a positive local Z offset is the
/// forward section. Ties resolve toward the nose: the forward check runs
/// before the span check.
pub fn resolve(missile_position: Vec3, target_position: Vec3, radius: f32, saucer: bool) -> HitComponent {
    let local = missile_position - target_position;
    if saucer {
        resolve_saucer(local, radius)
    } else {
        resolve_fighter(local, radius)
    }
}

fn resolve_fighter(local: Vec3, radius: f32) -> HitComponent {
    if local.z > FIGHTER_NOSE_DEPTH * radius {
        HitComponent::Nose
    } else if local.x < -FIGHTER_WING_SPAN * radius {
        HitComponent::LeftWing
    } else if local.x > FIGHTER_WING_SPAN * radius {
        HitComponent::RightWing
    } else {
        HitComponent::Body
    }
}

fn resolve_saucer(local: Vec3, radius: f32) -> HitComponent {
    if local.z > SAUCER_NOSE_DEPTH * radius && local.x.abs() < SAUCER_NOSE_WIDTH * radius {
        HitComponent::Nose
    } else if local.x < -SAUCER_WING_SPAN * radius {
        HitComponent::LeftWing
    } else if local.x > SAUCER_WING_SPAN * radius {
        HitComponent::RightWing
    } else {
        HitComponent::Body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Vec3 = Vec3::new(10.0, 0.0, -30.0);
    const RADIUS: f32 = 2.0;

    fn fighter_hit(offset: Vec3) -> HitComponent {
        resolve(TARGET + offset, TARGET, RADIUS, false)
    }

    fn saucer_hit(offset: Vec3) -> HitComponent {
        resolve(TARGET + offset, TARGET, RADIUS, true)
    }

    #[test]
    fn test_fighter_regions() {
        assert_eq!(fighter_hit(Vec3::new(0.0, 0.0, 1.0)), HitComponent::Nose);
        assert_eq!(fighter_hit(Vec3::new(-1.5, 0.0, 0.0)), HitComponent::LeftWing);
        assert_eq!(fighter_hit(Vec3::new(1.5, 0.0, 0.0)), HitComponent::RightWing);
        assert_eq!(fighter_hit(Vec3::new(0.2, 0.5, -0.3)), HitComponent::Body);
    }

    #[test]
    fn test_fighter_forward_wins_over_span() {
        // Forward and far out on X at once: the nose check runs first
        assert_eq!(fighter_hit(Vec3::new(1.5, 0.0, 1.5)), HitComponent::Nose);
    }

    #[test]
    fn test_saucer_dome_is_narrower() {
        // Forward but off-center: a fighter nose, a saucer body
        let offset = Vec3::new(0.9, 0.0, 1.1);
        assert_eq!(fighter_hit(offset), HitComponent::Nose);
        assert_eq!(saucer_hit(offset), HitComponent::Body);
    }

    #[test]
    fn test_saucer_rim_extends_further() {
        // Between the two span thresholds: a fighter wing, a saucer body
        let offset = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(fighter_hit(offset), HitComponent::RightWing);
        assert_eq!(saucer_hit(offset), HitComponent::Body);
        assert_eq!(saucer_hit(Vec3::new(-1.5, 0.0, 0.0)), HitComponent::LeftWing);
    }
}
