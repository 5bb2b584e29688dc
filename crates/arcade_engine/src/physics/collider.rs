//! Polygon collider: bounding-circle broad phase, SAT narrow phase and
//! contact manifold clipping
//!
//! # Architecture
//!
//! - **Model space storage**: the [`Shape`] stays in the owner's local frame
//! - **On-demand transformation**: vertices and edge normals are moved to
//!   world space only while a pair is being tested
//! - **Touch tracking**: each collider remembers which peers it currently
//!   overlaps, keyed by the peer owner's [`TransformId`], so the caller can
//!   tell a new contact from a persisting one
//!
//! The broad phase uses the *minimum* vertex-to-centroid distance as the
//! circle radius by default ([`BoundingMode::Inscribed`]). That circle can
//! miss overlaps at the tips of irregular shapes; it never reports an
//! overlap the exact test would reject on its own. Pass
//! [`BoundingMode::Circumscribed`] to opt into the enclosing circle instead.

use crate::foundation::math::{Vec2, Vec2Ext};
use crate::physics::shape::{compute_edge_normals, edge_endpoints, Shape, ShapeError};
use crate::render::{Color, Drawable, RenderContext};
use crate::scene::{SceneError, SceneGraph, TransformId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Slack allowed when filtering clipped contact points
pub const CONTACT_TOLERANCE: f64 = 1e-6;

/// Collider construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColliderError {
    /// The vertex list cannot form a polygon
    #[error("Invalid collider shape: {0}. Try checking object instantiation")]
    Shape(#[from] ShapeError),

    /// The owner handle is not part of the scene graph
    #[error("Collider owner {0:?} is not in the scene graph. Try checking object instantiation")]
    UnknownOwner(TransformId),
}

/// How the broad-phase circle radius is derived from the shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundingMode {
    /// Smallest vertex-to-centroid distance
    #[default]
    Inscribed,
    /// Largest vertex-to-centroid distance
    Circumscribed,
}

/// Circle used for the broad phase, in the owner's local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    /// Center (the vertex centroid)
    pub center: Vec2,
    /// Radius
    pub radius: f64,
}

impl BoundingCircle {
    /// Compute the circle for `shape`
    pub fn from_shape(shape: &Shape, mode: BoundingMode) -> Self {
        let center = shape.centroid();
        let distances = shape.points().iter().map(|p| (p - center).magnitude());
        let radius = match mode {
            BoundingMode::Inscribed => distances.fold(f64::INFINITY, f64::min),
            BoundingMode::Circumscribed => distances.fold(0.0, f64::max),
        };
        Self { center, radius }
    }

    /// Whether two world-space circles touch or overlap
    pub fn intersects(&self, other: &BoundingCircle) -> bool {
        (self.center - other.center).magnitude() <= self.radius + other.radius
    }
}

/// Which collider of a tested pair a value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    /// The collider the test was invoked on
    First,
    /// The collider passed as the other argument
    Second,
}

impl PairSide {
    /// The opposite side
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Contact geometry for an overlapping pair, in world space
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    /// Unit collision normal, pointing from the reference collider towards the incident one
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f64,
    /// Zero to two contact points
    pub contacts: Vec<Vec2>,
    /// Which collider owns the reference edge
    pub reference: PairSide,
}

impl ContactManifold {
    /// Collision normal oriented from `side` towards its partner
    pub fn normal_from(&self, side: PairSide) -> Vec2 {
        if side == self.reference {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// How a pair's touching state moved during one test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactChange {
    /// Were apart, now overlap
    Began,
    /// Overlapped before and still do
    Persisted,
    /// Overlapped before, now apart
    Ended,
    /// Apart before and after, or the test was skipped
    Idle,
}

/// Outcome of testing one pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairTest {
    /// Contact geometry when the pair overlaps
    pub manifold: Option<ContactManifold>,
    /// Touching-state transition caused by this test
    pub change: ContactChange,
}

impl PairTest {
    fn skipped() -> Self {
        Self { manifold: None, change: ContactChange::Idle }
    }

    /// Whether the pair overlaps
    pub fn is_colliding(&self) -> bool {
        self.manifold.is_some()
    }
}

/// World-space copy of a collider's polygon for one test
#[derive(Debug, Clone)]
pub struct WorldPolygon {
    /// Vertices in world space
    pub vertices: Vec<Vec2>,
    /// Outward edge normals in world space
    pub normals: Vec<Vec2>,
}

impl WorldPolygon {
    /// Build from raw world-space vertices (counter-clockwise)
    pub fn from_vertices(vertices: Vec<Vec2>) -> Self {
        let normals = compute_edge_normals(&vertices);
        Self { vertices, normals }
    }

    #[allow(clippy::cast_precision_loss)]
    fn center(&self) -> Vec2 {
        self.vertices.iter().fold(Vec2::zeros(), |acc, v| acc + v) / self.vertices.len() as f64
    }

    /// `(low, high)` interval of the vertices projected onto `axis`
    fn project(&self, axis: &Vec2) -> (f64, f64) {
        self.vertices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), v| {
            let projected = axis.dot(v);
            (low.min(projected), high.max(projected))
        })
    }
}

/// Minimum-penetration axis found by the separating axis test
#[derive(Debug, Clone, Copy, PartialEq)]
struct SeparatingAxisHit {
    axis: Vec2,
    penetration: f64,
    reference: PairSide,
}

/// Separating axis test over the edge normals of `a`, then `b`
///
/// Returns `None` on the first axis whose projections do not overlap.
fn separating_axis_test(a: &WorldPolygon, b: &WorldPolygon) -> Option<SeparatingAxisHit> {
    let mut best: Option<SeparatingAxisHit> = None;
    let candidates = a
        .normals
        .iter()
        .map(|n| (n, PairSide::First))
        .chain(b.normals.iter().map(|n| (n, PairSide::Second)));

    for (axis, owner) in candidates {
        let (low_a, high_a) = a.project(axis);
        let (low_b, high_b) = b.project(axis);

        if high_a < low_b || low_a > high_b {
            return None;
        }

        let penetration = (high_a - low_b).min(high_b - low_a);
        if best.map_or(true, |hit| penetration < hit.penetration) {
            best = Some(SeparatingAxisHit { axis: *axis, penetration, reference: owner });
        }
    }
    best
}

/// Clip the point list (one or two points) against the half-plane `n·p >= offset`
fn clip_to_half_plane(points: &[Vec2], n: &Vec2, offset: f64) -> Vec<Vec2> {
    let mut output = Vec::with_capacity(2);
    match points {
        [v1, v2] => {
            let d1 = n.dot(v1) - offset;
            let d2 = n.dot(v2) - offset;
            if d1 >= 0.0 {
                output.push(*v1);
            }
            if d2 >= 0.0 {
                output.push(*v2);
            }
            if d1 * d2 < 0.0 {
                let t = d1 / (d1 - d2);
                output.push(v1 + (v2 - v1) * t);
            }
        }
        [v] => {
            if n.dot(v) - offset >= 0.0 {
                output.push(*v);
            }
        }
        _ => {}
    }
    output
}

/// Index of the edge whose normal best matches `direction`
fn most_aligned_edge(polygon: &WorldPolygon, direction: &Vec2) -> usize {
    extreme_edge(polygon, |n| direction.dot(n))
}

/// Index of the edge whose normal is most anti-parallel to `direction`
fn most_opposed_edge(polygon: &WorldPolygon, direction: &Vec2) -> usize {
    extreme_edge(polygon, |n| -direction.dot(n))
}

fn extreme_edge(polygon: &WorldPolygon, score: impl Fn(&Vec2) -> f64) -> usize {
    let mut best_index = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, normal) in polygon.normals.iter().enumerate() {
        let s = score(normal);
        if s > best_score {
            best_score = s;
            best_index = i;
        }
    }
    best_index
}

/// Clip the incident edge against the reference edge's side planes
fn clip_contacts(
    reference: &WorldPolygon,
    incident: &WorldPolygon,
    normal: &Vec2,
    penetration: f64,
) -> Vec<Vec2> {
    let ref_index = most_aligned_edge(reference, normal);
    let (ref_v1, ref_v2) = edge_endpoints(&reference.vertices, ref_index);

    let inc_index = most_opposed_edge(incident, normal);
    let (inc_v1, inc_v2) = edge_endpoints(&incident.vertices, inc_index);

    // Side planes run perpendicular to the reference edge through its endpoints
    let side = (ref_v2 - ref_v1).normalized_or_zero();
    let clipped = clip_to_half_plane(&[inc_v1, inc_v2], &side, side.dot(&ref_v1));
    let clipped = clip_to_half_plane(&clipped, &-side, -side.dot(&ref_v2));

    let ref_offset = normal.dot(&ref_v1);
    clipped
        .into_iter()
        .filter(|p| normal.dot(p) - ref_offset <= penetration + CONTACT_TOLERANCE)
        .collect()
}

/// Full narrow phase on two world-space polygons
pub fn collide_polygons(a: &WorldPolygon, b: &WorldPolygon) -> Option<ContactManifold> {
    let hit = separating_axis_test(a, b)?;

    let (reference, incident) = match hit.reference {
        PairSide::First => (a, b),
        PairSide::Second => (b, a),
    };

    // Orient the axis from the reference polygon towards the incident one
    let mut normal = hit.axis;
    if normal.dot(&(incident.center() - reference.center())) < 0.0 {
        normal = -normal;
    }

    let contacts = clip_contacts(reference, incident, &normal, hit.penetration);
    Some(ContactManifold {
        normal,
        penetration: hit.penetration,
        contacts,
        reference: hit.reference,
    })
}

/// Convex polygon collider attached to a transform
#[derive(Debug, Clone)]
pub struct Collider {
    owner: TransformId,
    shape: Shape,
    bounds: BoundingCircle,
    touching: HashSet<TransformId>,
    enabled: bool,
}

impl Collider {
    /// Create a collider for `owner` using the default (inscribed) broad phase
    pub fn new(scene: &SceneGraph, owner: TransformId, shape: Shape) -> Result<Self, ColliderError> {
        Self::with_bounding_mode(scene, owner, shape, BoundingMode::default())
    }

    /// Create a collider from raw local-space vertices
    pub fn from_points(
        scene: &SceneGraph,
        owner: TransformId,
        vertices: Vec<Vec2>,
    ) -> Result<Self, ColliderError> {
        Self::new(scene, owner, Shape::new(vertices)?)
    }

    /// Create a collider with an explicit broad-phase radius rule
    pub fn with_bounding_mode(
        scene: &SceneGraph,
        owner: TransformId,
        shape: Shape,
        mode: BoundingMode,
    ) -> Result<Self, ColliderError> {
        if !scene.contains(owner) || scene.is_root(owner) {
            return Err(ColliderError::UnknownOwner(owner));
        }
        let bounds = BoundingCircle::from_shape(&shape, mode);
        Ok(Self {
            owner,
            shape,
            bounds,
            touching: HashSet::new(),
            enabled: true,
        })
    }

    /// Owning transform; also identifies this collider to its peers
    pub fn owner(&self) -> TransformId {
        self.owner
    }

    /// Local-space shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Local-space bounding circle
    pub fn bounds(&self) -> BoundingCircle {
        self.bounds
    }

    /// Whether the collider takes part in tests
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the collider
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether any peer currently overlaps this collider
    pub fn is_colliding(&self) -> bool {
        !self.touching.is_empty()
    }

    /// Whether the collider owned by `peer` currently overlaps this one
    pub fn is_touching(&self, peer: TransformId) -> bool {
        self.touching.contains(&peer)
    }

    /// Owners of all currently overlapping peers
    pub fn touching(&self) -> impl Iterator<Item = TransformId> + '_ {
        self.touching.iter().copied()
    }

    /// Drop `peer` from the touching set (no-op when absent)
    pub fn forget(&mut self, peer: TransformId) {
        self.touching.remove(&peer);
    }

    /// Empty the touching set, returning the peers that were in it
    pub fn take_touching(&mut self) -> Vec<TransformId> {
        self.touching.drain().collect()
    }

    /// Bounding circle moved into world space
    pub fn global_bounds(&self, scene: &SceneGraph) -> Result<BoundingCircle, SceneError> {
        Ok(BoundingCircle {
            center: scene.transform_point(self.owner, self.bounds.center)?,
            radius: self.bounds.radius,
        })
    }

    /// Polygon moved into world space
    pub fn world_polygon(&self, scene: &SceneGraph) -> Result<WorldPolygon, SceneError> {
        let rotation = scene.global_rotation(self.owner)?;
        let vertices = scene.transform_points(self.owner, self.shape.points())?;
        let normals = self.shape.edge_normals().iter().map(|n| n.rotated(rotation)).collect();
        Ok(WorldPolygon { vertices, normals })
    }

    /// Broad phase: do the world-space bounding circles touch?
    pub fn is_bounding_colliding(&self, other: &Collider, scene: &SceneGraph) -> Result<bool, SceneError> {
        Ok(self.global_bounds(scene)?.intersects(&other.global_bounds(scene)?))
    }

    /// Broad and narrow phase without touching any state
    ///
    /// Disabled colliders never collide.
    pub fn test(&self, other: &Collider, scene: &SceneGraph) -> Result<Option<ContactManifold>, SceneError> {
        if !self.enabled || !other.enabled {
            return Ok(None);
        }
        if !self.is_bounding_colliding(other, scene)? {
            return Ok(None);
        }
        let a = self.world_polygon(scene)?;
        let b = other.world_polygon(scene)?;
        Ok(collide_polygons(&a, &b))
    }

    /// Test the pair and update both touching sets
    ///
    /// On overlap each collider records the other; otherwise each drops the
    /// other. A test involving a disabled collider returns a non-colliding
    /// result and leaves both sets as they were.
    pub fn check_collision_with(
        &mut self,
        other: &mut Collider,
        scene: &SceneGraph,
    ) -> Result<PairTest, SceneError> {
        if !self.enabled || !other.enabled {
            return Ok(PairTest::skipped());
        }

        let was_touching = self.touching.contains(&other.owner);
        let manifold = self.test(other, scene)?;

        let change = if manifold.is_some() {
            self.touching.insert(other.owner);
            other.touching.insert(self.owner);
            if was_touching {
                ContactChange::Persisted
            } else {
                ContactChange::Began
            }
        } else {
            self.touching.remove(&other.owner);
            other.touching.remove(&self.owner);
            if was_touching {
                ContactChange::Ended
            } else {
                ContactChange::Idle
            }
        };

        Ok(PairTest { manifold, change })
    }
}

impl Drawable for Collider {
    fn draw(&self, scene: &SceneGraph, ctx: &mut dyn RenderContext) {
        let color = if self.is_colliding() {
            Color::RED.darker()
        } else {
            Color::GREEN.darker()
        };
        if let Ok(bounds) = self.global_bounds(scene) {
            ctx.draw_circle(bounds.center, bounds.radius, color);
        }
        if let Ok(polygon) = self.world_polygon(scene) {
            ctx.draw_polygon(&polygon.vertices, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::{HALF_PI, QUARTER_PI};
    use approx::assert_relative_eq;

    fn square_at(scene: &mut SceneGraph, x: f64, y: f64, side: f64) -> Collider {
        let owner = scene.spawn(scene.root(), Vec2::new(x, y), 0.0).unwrap();
        Collider::new(scene, owner, Shape::centered_rectangle(Vec2::zeros(), side, side)).unwrap()
    }

    fn diamond_at(scene: &mut SceneGraph, x: f64) -> Collider {
        // long, thin rhombus: tips 50 away, flanks 1 away from the centroid
        let owner = scene.spawn(scene.root(), Vec2::new(x, 0.0), 0.0).unwrap();
        let points = vec![
            Vec2::new(50.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-50.0, 0.0),
            Vec2::new(0.0, -1.0),
        ];
        Collider::from_points(scene, owner, points).unwrap()
    }

    #[test]
    fn test_construction_validation() {
        let mut scene = SceneGraph::new();
        let owner = scene.spawn(scene.root(), Vec2::zeros(), 0.0).unwrap();

        let too_few = Collider::from_points(&scene, owner, vec![Vec2::zeros(), Vec2::new(1.0, 0.0)]);
        assert_eq!(too_few.unwrap_err(), ColliderError::Shape(ShapeError::TooFewVertices(2)));

        scene.despawn(owner).unwrap();
        let orphan = Collider::new(&scene, owner, Shape::triangle(Vec2::zeros(), 1.0));
        assert_eq!(orphan.unwrap_err(), ColliderError::UnknownOwner(owner));

        let root = scene.root();
        let on_root = Collider::new(&scene, root, Shape::triangle(Vec2::zeros(), 1.0));
        assert_eq!(on_root.unwrap_err(), ColliderError::UnknownOwner(root));
    }

    #[test]
    fn test_bounding_circle_uses_minimum_distance() {
        let mut scene = SceneGraph::new();
        let diamond = diamond_at(&mut scene, 0.0);
        assert_relative_eq!(diamond.bounds().radius, 1.0);
        assert_relative_eq!(diamond.bounds().center, Vec2::zeros());

        let wide = BoundingCircle::from_shape(diamond.shape(), BoundingMode::Circumscribed);
        assert_relative_eq!(wide.radius, 50.0);
    }

    #[test]
    fn test_sat_squares_overlapping() {
        let mut scene = SceneGraph::new();
        let mut a = square_at(&mut scene, 0.0, 0.0, 10.0);
        let mut b = square_at(&mut scene, 5.0, 0.0, 10.0);

        let result = a.check_collision_with(&mut b, &scene).unwrap();
        assert!(result.is_colliding());
        assert_eq!(result.change, ContactChange::Began);
        assert!(a.is_touching(b.owner()));
        assert!(b.is_touching(a.owner()));
    }

    #[test]
    fn test_sat_squares_separated() {
        let mut scene = SceneGraph::new();
        let mut a = square_at(&mut scene, 0.0, 0.0, 10.0);
        let mut b = square_at(&mut scene, 11.0, 0.0, 10.0);

        // circles still reach each other, so this is the exact test's call
        assert!(a.is_bounding_colliding(&b, &scene).unwrap());
        let result = a.check_collision_with(&mut b, &scene).unwrap();
        assert!(!result.is_colliding());
        assert_eq!(result.change, ContactChange::Idle);
        assert!(!a.is_colliding());
    }

    #[test]
    fn test_penetration_depth_and_normal() {
        let mut scene = SceneGraph::new();
        let a = square_at(&mut scene, 0.0, 0.0, 10.0);
        let b = square_at(&mut scene, 8.0, 0.0, 10.0);

        let manifold = a.test(&b, &scene).unwrap().expect("squares overlap by 2");
        assert_relative_eq!(manifold.penetration, 2.0, epsilon = 1e-9);
        assert_relative_eq!(manifold.normal.x.abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(manifold.normal.y, 0.0, epsilon = 1e-9);
        // oriented from a towards b when seen from a
        assert!(manifold.normal_from(PairSide::First).x > 0.0);
    }

    #[test]
    fn test_inscribed_broad_phase_misses_tip_overlap() {
        let mut scene = SceneGraph::new();
        let mut a = diamond_at(&mut scene, 0.0);
        let mut b = diamond_at(&mut scene, 90.0);

        // the polygons overlap between x = 40 and x = 50 ...
        let exact = collide_polygons(&a.world_polygon(&scene).unwrap(), &b.world_polygon(&scene).unwrap());
        assert!(exact.is_some());

        // ... but circles of radius 1 ninety units apart do not, so the pair is culled
        assert!(!a.is_bounding_colliding(&b, &scene).unwrap());
        let result = a.check_collision_with(&mut b, &scene).unwrap();
        assert!(!result.is_colliding());
    }

    #[test]
    fn test_broad_phase_has_no_false_positives() {
        let mut scene = SceneGraph::new();
        let a = square_at(&mut scene, 0.0, 0.0, 10.0);
        let b = square_at(&mut scene, 30.0, 0.0, 10.0);

        let ca = a.global_bounds(&scene).unwrap();
        let cb = b.global_bounds(&scene).unwrap();
        assert!((ca.center - cb.center).magnitude() > ca.radius + cb.radius);
        assert!(!a.is_bounding_colliding(&b, &scene).unwrap());
    }

    #[test]
    fn test_shared_edge_yields_two_contacts() {
        let mut scene = SceneGraph::new();
        let a = square_at(&mut scene, 0.0, 0.0, 10.0);
        let b = square_at(&mut scene, 8.0, 0.0, 10.0);

        let manifold = a.test(&b, &scene).unwrap().unwrap();
        assert_eq!(manifold.contacts.len(), 2);
        for contact in &manifold.contacts {
            assert!(contact.x >= 3.0 - 1e-9 && contact.x <= 5.0 + 1e-9);
            assert!(contact.y.abs() <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn test_corner_contact_yields_at_most_one_point() {
        let mut scene = SceneGraph::new();
        let a = square_at(&mut scene, 0.0, 0.0, 10.0);

        // square turned 45 degrees, its left corner pushed 1 unit into a's right face
        let half_diagonal = 50.0_f64.sqrt();
        let owner = scene
            .spawn(scene.root(), Vec2::new(4.0 + half_diagonal, 0.0), QUARTER_PI)
            .unwrap();
        let b = Collider::new(&scene, owner, Shape::centered_rectangle(Vec2::zeros(), 10.0, 10.0)).unwrap();

        let manifold = a.test(&b, &scene).unwrap().expect("corner overlaps face");
        assert_relative_eq!(manifold.penetration, 1.0, epsilon = 1e-6);
        assert!(manifold.contacts.len() <= 1);
        if let Some(contact) = manifold.contacts.first() {
            assert_relative_eq!(*contact, Vec2::new(4.0, 0.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_rotated_owner_moves_normals() {
        let mut scene = SceneGraph::new();
        let owner = scene.spawn(scene.root(), Vec2::new(2.0, 0.0), HALF_PI).unwrap();
        let collider = Collider::new(&scene, owner, Shape::centered_rectangle(Vec2::zeros(), 2.0, 2.0)).unwrap();

        let polygon = collider.world_polygon(&scene).unwrap();
        // local left normal (-1, 0) turns into (0, -1)
        assert_relative_eq!(polygon.normals[0], Vec2::new(0.0, -1.0), epsilon = 1e-9);
        assert_relative_eq!(polygon.vertices[1], Vec2::new(3.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_touching_state_transitions() {
        let mut scene = SceneGraph::new();
        let mut a = square_at(&mut scene, 0.0, 0.0, 10.0);
        let mut b = square_at(&mut scene, 5.0, 0.0, 10.0);

        assert_eq!(a.check_collision_with(&mut b, &scene).unwrap().change, ContactChange::Began);
        assert_eq!(a.check_collision_with(&mut b, &scene).unwrap().change, ContactChange::Persisted);

        scene.set_local_position(b.owner(), Vec2::new(40.0, 0.0)).unwrap();
        assert_eq!(a.check_collision_with(&mut b, &scene).unwrap().change, ContactChange::Ended);
        assert!(!a.is_colliding());
        assert!(!b.is_colliding());

        // removal is idempotent
        assert_eq!(a.check_collision_with(&mut b, &scene).unwrap().change, ContactChange::Idle);
    }

    #[test]
    fn test_disabled_collider_never_participates() {
        let mut scene = SceneGraph::new();
        let mut a = square_at(&mut scene, 0.0, 0.0, 10.0);
        let mut b = square_at(&mut scene, 5.0, 0.0, 10.0);

        a.check_collision_with(&mut b, &scene).unwrap();
        assert!(a.is_touching(b.owner()));

        b.set_enabled(false);
        scene.set_local_position(b.owner(), Vec2::new(100.0, 0.0)).unwrap();
        let result = a.check_collision_with(&mut b, &scene).unwrap();
        assert!(!result.is_colliding());
        assert_eq!(result.change, ContactChange::Idle);
        // no state was touched
        assert!(a.is_touching(b.owner()));
        assert!(b.is_touching(a.owner()));
    }
}
