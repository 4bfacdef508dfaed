//! Headless skirmish demo
//!
//! Drives the missile engine without a renderer: a formation of aliens
//! creeps toward the player while both sides trade fire. Everything the
//! worker reports back (hits, bomb detonations, culled shots) is logged, so
//! the engine's behavior is observable from a terminal. Run with
//! `RUST_LOG=info` to watch the skirmish unfold.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_engine::prelude::*;

const FRAME_DT: f32 = 1.0 / 60.0;
const SKIRMISH_SECONDS: f32 = 30.0;
const PLAYER_FIRE_PERIOD: f32 = 0.4;
const WINGMAN_FIRE_PERIOD: f32 = 1.1;
const ALIEN_FIRE_PERIOD: f32 = 0.9;
const FORMATION_ROWS: usize = 3;
const FORMATION_COLS: usize = 6;
const FORMATION_ADVANCE_SPEED: f32 = 0.8;

struct Alien {
    snapshot: AlienSnapshot,
    health: f32,
}

struct SkirmishApp {
    host: SimHost,
    aliens: Vec<Alien>,
    player: PlayerSnapshot,
    rng: StdRng,
    /// Compact external id -> stable missile id, grows over the skirmish
    id_table: Vec<u64>,
    next_missile_id: u64,
    player_cooldown: f32,
    wingman_cooldown: f32,
    alien_cooldown: f32,
    kills: u32,
    player_damage_taken: f32,
}

impl SkirmishApp {
    fn new() -> Result<Self, SimError> {
        log::info!("spawning simulation worker");
        let host = SimHost::spawn(SimConfig::default())?;

        let mut player = PlayerSnapshot::default();
        player.position = Vec3::new(0.0, 0.0, 40.0);

        Ok(Self {
            host,
            aliens: create_formation(),
            player,
            rng: StdRng::seed_from_u64(0x5eed),
            id_table: Vec::new(),
            next_missile_id: 1,
            player_cooldown: 0.0,
            wingman_cooldown: WINGMAN_FIRE_PERIOD / 2.0,
            alien_cooldown: ALIEN_FIRE_PERIOD,
            kills: 0,
            player_damage_taken: 0.0,
        })
    }

    /// Fire a missile, assigning it the next stable id
    ///
    /// A full buffer drops the shot instead of failing the skirmish; every
    /// other error is real.
    fn fire(&mut self, record: MissileRecord) -> Result<(), SimError> {
        let external = self.id_table.len() as i32;
        let record = record.with_external_id(external);
        match self.host.fire(&record) {
            Ok(_) => {
                self.id_table.push(self.next_missile_id);
                self.next_missile_id += 1;
                Ok(())
            }
            Err(SimError::CapacityExhausted { capacity }) => {
                log::debug!("all {capacity} slots busy, shot dropped");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn fire_player_side(&mut self) -> Result<(), SimError> {
        self.player_cooldown -= FRAME_DT;
        if self.player_cooldown <= 0.0 {
            self.player_cooldown = PLAYER_FIRE_PERIOD;
            let weapon = if self.rng.gen_bool(0.25) {
                WeaponKind::Rocket
            } else {
                WeaponKind::Default
            };
            let record = MissileRecord::player_shot(
                self.player.position,
                Vec3::new(0.0, 0.0, -1.0),
                weapon,
            );
            let record = if weapon == WeaponKind::Rocket {
                record.with_homing()
            } else {
                record
            };
            self.fire(record)?;
        }

        self.wingman_cooldown -= FRAME_DT;
        if self.wingman_cooldown <= 0.0 {
            self.wingman_cooldown = WINGMAN_FIRE_PERIOD;
            let mut record = MissileRecord::player_shot(
                self.player.position + Vec3::new(6.0, 0.0, 2.0),
                Vec3::new(0.0, 0.0, -1.0),
                WeaponKind::Chaingun,
            );
            record.kind = MissileKind::Wingman;
            self.fire(record)?;
        }
        Ok(())
    }

    fn fire_alien_side(&mut self) -> Result<(), SimError> {
        self.alien_cooldown -= FRAME_DT;
        if self.alien_cooldown > 0.0 || self.aliens.is_empty() {
            return Ok(());
        }
        self.alien_cooldown = ALIEN_FIRE_PERIOD;

        let shooter = &self.aliens[self.rng.gen_range(0..self.aliens.len())].snapshot;
        let offset = self.player.position - shooter.position;
        let distance = offset.norm();
        if distance <= f32::EPSILON {
            return Ok(());
        }
        let mut record = MissileRecord::alien_shot(shooter.position, offset / distance);
        if self.rng.gen_bool(0.15) {
            record.weapon = WeaponKind::Bomb;
        }
        self.fire(record)
    }

    fn advance_formation(&mut self) {
        for alien in &mut self.aliens {
            alien.snapshot.position.z += FORMATION_ADVANCE_SPEED * FRAME_DT;
        }
    }

    fn apply_results(&mut self, results: &FrameResults) -> Result<(), SimError> {
        for hit in &results.alien_hits {
            // A missile is spent on contact; free its slot before anything
            // else so a lingering overlap cannot deal damage twice
            self.host.retire_slot(hit.slot)?;
            if let Some(index) = self
                .aliens
                .iter()
                .position(|a| a.snapshot.id == hit.alien_id)
            {
                let alien = &mut self.aliens[index];
                alien.health -= hit.damage;
                log::info!(
                    "missile {} hit alien {} on the {} ({:.2} dmg)",
                    hit.missile_id,
                    hit.alien_id,
                    hit.component.name(),
                    hit.damage
                );
                if alien.health <= 0.0 {
                    log::info!("alien {} destroyed", hit.alien_id);
                    self.aliens.swap_remove(index);
                    self.kills += 1;
                }
            }
        }

        for hit in &results.player_hits {
            self.host.retire_slot(hit.slot)?;
            self.player_damage_taken += hit.damage;
            log::warn!(
                "player struck on the {} by missile {} ({:.2} dmg)",
                hit.component.name(),
                hit.missile_id,
                hit.damage
            );
        }

        for explosion in &results.explosions {
            log::info!(
                "bomb {} detonated at ({:.1}, {:.1}, {:.1})",
                explosion.missile_id,
                explosion.position.x,
                explosion.position.y,
                explosion.position.z
            );
        }

        if !results.culled_slots.is_empty() {
            log::debug!("{} missiles left the play area", results.culled_slots.len());
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), SimError> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total_frames = (SKIRMISH_SECONDS / FRAME_DT) as u32;

        let mut last_stats = FrameStats::default();
        for frame in 0..total_frames {
            if self.aliens.is_empty() {
                log::info!("formation wiped out after {frame} frames");
                break;
            }

            self.fire_player_side()?;
            self.fire_alien_side()?;
            self.advance_formation();

            let mut input = FrameInput::campaign(FRAME_DT, 1.0);
            input.player = self.player;
            input.aliens = self.aliens.iter().map(|a| a.snapshot).collect();

            self.host.set_id_table(self.id_table.clone());
            self.host.begin_frame(input)?;
            let results = self.host.wait()?;
            self.apply_results(&results)?;
            last_stats = results.stats;
        }

        log::info!(
            "skirmish over: {} kills, {:.1} damage taken, {} aliens remain",
            self.kills,
            self.player_damage_taken,
            self.aliens.len()
        );
        log::info!(
            "last frame: {} integrated, {} grid cells, {} candidates, physics {}us, collision {}us",
            last_stats.integrated,
            last_stats.grid_cells,
            last_stats.candidates_tested,
            last_stats.physics_micros,
            last_stats.collision_micros
        );
        Ok(())
    }
}

/// Classic rows-by-columns alien formation, centered on the lane
fn create_formation() -> Vec<Alien> {
    let mut aliens = Vec::with_capacity(FORMATION_ROWS * FORMATION_COLS);
    let mut id = 1;
    for row in 0..FORMATION_ROWS {
        for col in 0..FORMATION_COLS {
            #[allow(clippy::cast_precision_loss)]
            let x = (col as f32 - (FORMATION_COLS - 1) as f32 / 2.0) * 8.0;
            #[allow(clippy::cast_precision_loss)]
            let z = -40.0 - row as f32 * 6.0;
            // The back row is the tougher saucer escort
            let saucer = row == FORMATION_ROWS - 1;
            aliens.push(Alien {
                snapshot: AlienSnapshot {
                    id,
                    position: Vec3::new(x, 0.0, z),
                    radius: 2.0,
                    invulnerable: false,
                    saucer,
                },
                health: if saucer { 3.0 } else { 1.0 },
            });
            id += 1;
        }
    }
    aliens
}

fn main() -> Result<(), SimError> {
    sim_engine::foundation::logging::init();
    let mut app = SkirmishApp::new()?;
    app.run()
}
