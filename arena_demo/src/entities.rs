//! Arena entities: the player ship, asteroids, projectiles and explosions

use crate::arena::{wrap_into_arena, SharedStats};
use arcade_engine::foundation::math::constants::TAU;
use arcade_engine::prelude::*;
use log::info;
use rand::Rng;
use std::rc::Rc;

// Ship tuning
const SHIP_MAX_SPEED: f64 = 300.0;
const SHIP_THRUST: f64 = 120.0; // units per second squared
const SHIP_TURN_RATE: f64 = 0.8; // radians per second
const SHIP_HEALTH: u32 = 3;
const GUN_MOUNT_OFFSET: f64 = 20.0; // ahead of the nose
const FIRE_INTERVAL: f64 = 0.25; // seconds between shots

// Projectile tuning
const BULLET_SPEED: f64 = 450.0;
const BULLET_LIFETIME: f64 = 1.2;

// Asteroid tuning
const ASTEROID_MAX_SPEED: f64 = 120.0;
const ASTEROID_MAX_SPIN: f64 = 1.5;

const EXPLOSION_LIFETIME: f64 = 0.4;

/// Random drift velocity for a new asteroid
pub fn random_drift(rng: &mut impl Rng) -> Vec2 {
    from_heading(rng.gen_range(0.0..TAU)) * rng.gen_range(20.0..60.0)
}

/// Player ship that turns, thrusts and fires on its own
pub struct Ship {
    body: PhysicsBody,
    gun_mount: TransformId,
    health: u32,
    fire_cooldown: f64,
    stats: SharedStats,
}

impl Ship {
    /// Build the ship and its gun mount at `position`
    pub fn spawn(scene: &mut SceneGraph, position: Vec2, stats: &SharedStats) -> Result<Self, WorldError> {
        let root = scene.root();
        let mut body = PhysicsBody::new(scene, root, position, 0.0, SHIP_MAX_SPEED)?;
        let hull = Shape::new(vec![
            Vec2::new(15.0, 0.0),
            Vec2::new(-10.0, 8.0),
            Vec2::new(-10.0, -8.0),
        ])?;
        body.set_shape(scene, hull)?;

        let gun_mount = scene.spawn(body.transform(), Vec2::new(GUN_MOUNT_OFFSET, 0.0), 0.0)?;
        scene.set_label(gun_mount, "gun_mount")?;

        Ok(Self {
            body,
            gun_mount,
            health: SHIP_HEALTH,
            fire_cooldown: FIRE_INTERVAL,
            stats: Rc::clone(stats),
        })
    }

    /// Remaining hit points
    pub fn health(&self) -> u32 {
        self.health
    }

    fn fire(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), WorldError> {
        let heading = self.body.forward(ctx.scene())?;
        let muzzle = ctx.scene().global_position(self.gun_mount)?;
        let velocity = heading * BULLET_SPEED + self.body.velocity;
        let config = ctx.config();
        let bullet = Projectile::spawn(ctx.scene_mut(), muzzle, velocity, config)?;
        ctx.create(Box::new(bullet));
        self.stats.borrow_mut().shots_fired += 1;
        Ok(())
    }
}

impl GameObject for Ship {
    fn name(&self) -> &str {
        "ship"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn transform(&self) -> TransformId {
        self.body.transform()
    }

    fn body(&self) -> Option<&PhysicsBody> {
        Some(&self.body)
    }

    fn body_mut(&mut self) -> Option<&mut PhysicsBody> {
        Some(&mut self.body)
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, dt: f64) -> Result<(), WorldError> {
        self.body.rotate_by(ctx.scene_mut(), SHIP_TURN_RATE * dt)?;
        let heading = self.body.forward(ctx.scene())?;
        self.body.apply_force(heading * SHIP_THRUST);
        wrap_into_arena(ctx.scene_mut(), self.body.transform())?;

        self.fire_cooldown -= dt;
        if self.fire_cooldown <= 0.0 {
            self.fire_cooldown += FIRE_INTERVAL;
            self.fire(ctx)?;
        }
        Ok(())
    }

    fn on_trigger_enter(&mut self, ctx: &mut FrameContext<'_>, other: &ContactPeer) -> Result<(), WorldError> {
        // own shots pass through
        if !other.kind.is_hazard() || other.spawned_by == Some(ctx.id()) {
            return Ok(());
        }
        self.health = self.health.saturating_sub(1);
        self.stats.borrow_mut().ship_hits += 1;
        info!("Ship hit by {:?}, {} health left", other.kind, self.health);
        if self.health == 0 {
            ctx.destroy_player()?;
        }
        Ok(())
    }

    fn on_death(&mut self, _ctx: &mut FrameContext<'_>) -> Result<(), WorldError> {
        info!("Ship destroyed");
        Ok(())
    }

    fn draw(&self, scene: &SceneGraph, ctx: &mut dyn RenderContext) {
        if let Some(Ok(hull)) = self.body.collider().map(|collider| collider.world_polygon(scene)) {
            ctx.draw_polygon(&hull.vertices, Color::GREEN);
        }
        if let Ok(muzzle) = scene.global_position(self.gun_mount) {
            ctx.draw_cross(muzzle, 4.0, Color::GREEN.darker());
        }
    }
}

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidSize {
    /// Breaks into two medium asteroids
    Large,
    /// Breaks into two small asteroids
    Medium,
    /// Gone for good
    Small,
}

impl AsteroidSize {
    /// Corner radius
    pub fn radius(self) -> f64 {
        match self {
            Self::Large => 40.0,
            Self::Medium => 25.0,
            Self::Small => 12.0,
        }
    }

    /// Hits needed to break it
    pub fn health(self) -> u32 {
        match self {
            Self::Large => 3,
            Self::Medium => 2,
            Self::Small => 1,
        }
    }

    /// Size of the fragments left behind
    pub fn smaller(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }
}

/// Spinning, drifting hazard
pub struct Asteroid {
    body: PhysicsBody,
    size: AsteroidSize,
    spin: f64,
    health: u32,
    stats: SharedStats,
}

impl Asteroid {
    /// Build an asteroid with a random outline and spin
    pub fn spawn(
        scene: &mut SceneGraph,
        position: Vec2,
        velocity: Vec2,
        size: AsteroidSize,
        rng: &mut impl Rng,
        stats: &SharedStats,
    ) -> Result<Self, WorldError> {
        let root = scene.root();
        let mut body = PhysicsBody::new(scene, root, position, rng.gen_range(0.0..TAU), ASTEROID_MAX_SPEED)?;
        let outline = Shape::regular_polygon(Vec2::zeros(), size.radius(), rng.gen_range(5..=8))?;
        body.set_shape(scene, outline)?;
        body.velocity = velocity;

        Ok(Self {
            body,
            size,
            spin: rng.gen_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN),
            health: size.health(),
            stats: Rc::clone(stats),
        })
    }

    /// Size class
    pub fn size(&self) -> AsteroidSize {
        self.size
    }
}

impl GameObject for Asteroid {
    fn name(&self) -> &str {
        match self.size {
            AsteroidSize::Large => "asteroid_large",
            AsteroidSize::Medium => "asteroid_medium",
            AsteroidSize::Small => "asteroid_small",
        }
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Environment
    }

    fn transform(&self) -> TransformId {
        self.body.transform()
    }

    fn body(&self) -> Option<&PhysicsBody> {
        Some(&self.body)
    }

    fn body_mut(&mut self) -> Option<&mut PhysicsBody> {
        Some(&mut self.body)
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, dt: f64) -> Result<(), WorldError> {
        self.body.rotate_by(ctx.scene_mut(), self.spin * dt)?;
        wrap_into_arena(ctx.scene_mut(), self.body.transform())?;
        Ok(())
    }

    fn on_collision(&mut self, ctx: &mut FrameContext<'_>, event: &CollisionEvent) -> Result<(), WorldError> {
        if self.health == 0 || !event.began || event.other.kind != EntityKind::Projectile {
            return Ok(());
        }
        self.health -= 1;
        if self.health > 0 {
            return Ok(());
        }

        // the shooter may have died while the shot was in flight
        if let Some(shooter) = event.other.spawned_by {
            if ctx.is_alive(shooter) {
                self.stats.borrow_mut().kills_credited += 1;
            }
        }
        ctx.destroy_self()
    }

    fn on_death(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), WorldError> {
        self.stats.borrow_mut().asteroids_destroyed += 1;
        let position = self.body.position(ctx.scene())?;

        let explosion = Explosion::spawn(ctx.scene_mut(), position, self.size.radius())?;
        ctx.create(Box::new(explosion));

        if let Some(smaller) = self.size.smaller() {
            let mut rng = rand::thread_rng();
            for _ in 0..2 {
                let velocity = self.body.velocity + random_drift(&mut rng);
                let fragment = Asteroid::spawn(ctx.scene_mut(), position, velocity, smaller, &mut rng, &self.stats)?;
                ctx.create(Box::new(fragment));
            }
        }
        Ok(())
    }
}

/// Short-lived shot
pub struct Projectile {
    body: PhysicsBody,
    remaining: f64,
}

impl Projectile {
    /// Build a projectile moving with `velocity`, capped at the configured default speed
    pub fn spawn(
        scene: &mut SceneGraph,
        position: Vec2,
        velocity: Vec2,
        config: &SimulationConfig,
    ) -> Result<Self, WorldError> {
        let root = scene.root();
        let mut body = PhysicsBody::with_default_speed(scene, root, position, velocity.heading(), config)?;
        body.set_shape(scene, Shape::centered_rectangle(Vec2::zeros(), 6.0, 2.0))?;
        body.velocity = velocity;
        Ok(Self { body, remaining: BULLET_LIFETIME })
    }
}

impl GameObject for Projectile {
    fn name(&self) -> &str {
        "projectile"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn transform(&self) -> TransformId {
        self.body.transform()
    }

    fn body(&self) -> Option<&PhysicsBody> {
        Some(&self.body)
    }

    fn body_mut(&mut self) -> Option<&mut PhysicsBody> {
        Some(&mut self.body)
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, dt: f64) -> Result<(), WorldError> {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            return ctx.destroy_self();
        }
        wrap_into_arena(ctx.scene_mut(), self.body.transform())?;
        Ok(())
    }

    fn on_collision(&mut self, ctx: &mut FrameContext<'_>, event: &CollisionEvent) -> Result<(), WorldError> {
        if matches!(event.other.kind, EntityKind::Environment | EntityKind::Enemy) {
            ctx.destroy_self()?;
        }
        Ok(())
    }
}

/// Visual-only burst left behind by a destroyed asteroid
pub struct Explosion {
    transform: TransformId,
    size: f64,
    remaining: f64,
}

impl Explosion {
    /// Place an explosion at `position`
    pub fn spawn(scene: &mut SceneGraph, position: Vec2, size: f64) -> Result<Self, WorldError> {
        let transform = scene.spawn(scene.root(), position, 0.0)?;
        Ok(Self { transform, size, remaining: EXPLOSION_LIFETIME })
    }
}

impl GameObject for Explosion {
    fn name(&self) -> &str {
        "explosion"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Effect
    }

    fn transform(&self) -> TransformId {
        self.transform
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, dt: f64) -> Result<(), WorldError> {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            ctx.destroy_self()?;
        }
        Ok(())
    }

    fn draw(&self, scene: &SceneGraph, ctx: &mut dyn RenderContext) {
        if let Ok(at) = scene.global_position(self.transform) {
            let fade = (self.remaining / EXPLOSION_LIFETIME).clamp(0.0, 1.0);
            ctx.draw_cross(at, self.size * (2.0 - fade), Color::RED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaStats;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn level() -> (World, SharedStats, StdRng) {
        (World::new(SimulationConfig::default()), SharedStats::default(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_ship_takes_one_hit_per_contact() {
        let (mut world, stats, mut rng) = level();
        let ship = Ship::spawn(world.scene_mut(), Vec2::zeros(), &stats).unwrap();
        world.create(Box::new(ship));
        let rock = Asteroid::spawn(world.scene_mut(), Vec2::new(10.0, 0.0), Vec2::zeros(), AsteroidSize::Small, &mut rng, &stats).unwrap();
        world.create(Box::new(rock));
        world.flush().unwrap();
        let player = world.player().unwrap();

        world.step(0.016).unwrap();
        world.step(0.016).unwrap();

        assert_eq!(stats.borrow().ship_hits, 1);
        assert!(world.is_alive(player));
        assert_eq!(world.scene().label(world.get(player).unwrap().transform()).unwrap(), "ship");
    }

    #[test]
    fn test_small_asteroid_shatters_without_fragments() {
        let (mut world, stats, mut rng) = level();
        let rock = Asteroid::spawn(world.scene_mut(), Vec2::zeros(), Vec2::zeros(), AsteroidSize::Small, &mut rng, &stats).unwrap();
        world.create(Box::new(rock));
        let config = world.config().clone();
        let shot = Projectile::spawn(world.scene_mut(), Vec2::new(2.0, 0.0), Vec2::zeros(), &config).unwrap();
        world.create(Box::new(shot));
        world.flush().unwrap();

        let report = world.step(0.016).unwrap();
        assert_eq!(report.destroyed.len(), 2);
        assert_eq!(report.created.len(), 1);
        assert_eq!(world.kind_of(report.created[0]), Some(EntityKind::Effect));
        assert_eq!(
            *stats.borrow(),
            ArenaStats { asteroids_destroyed: 1, ..ArenaStats::default() }
        );
    }

    #[test]
    fn test_medium_asteroid_splits_in_two() {
        let (mut world, stats, mut rng) = level();
        let mut rock = Asteroid::spawn(world.scene_mut(), Vec2::zeros(), Vec2::zeros(), AsteroidSize::Medium, &mut rng, &stats).unwrap();
        rock.health = 1;
        world.create(Box::new(rock));
        let config = world.config().clone();
        let shot = Projectile::spawn(world.scene_mut(), Vec2::zeros(), Vec2::zeros(), &config).unwrap();
        world.create(Box::new(shot));
        world.flush().unwrap();

        let report = world.step(0.016).unwrap();
        let fragments = report
            .created
            .iter()
            .filter(|&&id| world.kind_of(id) == Some(EntityKind::Environment))
            .count();
        assert_eq!(fragments, 2);
        assert_eq!(report.created.len(), 3);
    }

    #[test]
    fn test_projectile_expires() {
        let (mut world, _stats, _rng) = level();
        let config = world.config().clone();
        let shot = Projectile::spawn(world.scene_mut(), Vec2::zeros(), Vec2::new(10.0, 0.0), &config).unwrap();
        world.create(Box::new(shot));
        let id = world.flush().unwrap().created[0];

        let mut frames = 0;
        while world.is_alive(id) {
            world.step(0.1).unwrap();
            frames += 1;
            assert!(frames < 20);
        }
        assert!(frames >= 12);
    }
}
