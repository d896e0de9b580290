//! A single flocking koi.
//!
//! Agents live in a normalised `[0, 1] x [0, 1]` pond and steer with the
//! three Reynolds rules plus a push away from walls they are heading into.

use core::f64::consts::PI;

use crate::body::KoiBody;
use crate::params::SteeringParams;
use crate::surface::{Colour, DrawSurface, SpriteSheet};
use crate::vector::Vector2;

/// Converts the normalised swim speed into body undulation rate.
pub const SWIM_SPEED_SCALE: f64 = 20000.0;
/// Converts the normalised swim speed into displacement per second.
pub const DISPLACEMENT_SCALE: f64 = 1000.0;

/// What every agent may read about its peers during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub id: u32,
    pub position: Vector2,
    pub heading: Vector2,
}

#[derive(Debug, Clone)]
pub struct FlockAgent {
    id: u32,
    position: Vector2,
    heading: Vector2,
    body: KoiBody,
}

impl FlockAgent {
    /// Agent at `(x, y)` facing `direction` radians. The heading starts as a
    /// unit vector.
    pub fn new(id: u32, x: f64, y: f64, direction: f64) -> Self {
        let mut heading = Vector2::right();
        heading.set_angle(direction);
        Self {
            id,
            position: Vector2::new(x, y),
            heading,
            body: KoiBody::new(Vector2::zero(), 0.0, 1.0, 1.0),
        }
    }

    #[cfg(feature = "std")]
    pub fn random<R: rand::Rng + ?Sized>(id: u32, rng: &mut R) -> Self {
        Self::new(
            id,
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..2.0 * PI),
        )
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn heading(&self) -> Vector2 {
        self.heading
    }

    pub fn body(&self) -> &KoiBody {
        &self.body
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            heading: self.heading,
        }
    }

    /// Push away from any wall within `wall_detect_radius` that the agent is
    /// heading towards. The push grows from 0 at the edge of the radius to 1
    /// at the wall.
    pub fn boundary_acceleration(&self, wall_detect_radius: f64) -> Vector2 {
        let mut acceleration = Vector2::zero();
        let walls = [
            (self.position.y, Vector2::up(), Vector2::down()),
            (self.position.x, Vector2::left(), Vector2::right()),
            (1.0 - self.position.y, Vector2::down(), Vector2::up()),
            (1.0 - self.position.x, Vector2::right(), Vector2::left()),
        ];

        for (distance, towards_wall, away) in walls {
            if distance < wall_detect_radius && self.heading.dot(&towards_wall) > 0.0 {
                let proximity = 1.0 - distance / wall_detect_radius;
                acceleration.add([away * proximity.min(1.0)]);
            }
        }
        acceleration
    }

    /// Other agents within `radius`, by squared distance.
    pub fn neighbours<'a>(
        &'a self,
        others: &'a [AgentSnapshot],
        radius: f64,
    ) -> impl Iterator<Item = &'a AgentSnapshot> + 'a {
        let radius_sqr = radius * radius;
        others.iter().filter(move |other| {
            other.id != self.id && (self.position - other.position).get_squared_magnitude() <= radius_sqr
        })
    }

    /// Cohesion, alignment and separation summed. Zero when nobody is in range.
    pub fn flocking_acceleration(&self, others: &[AgentSnapshot], params: &SteeringParams) -> Vector2 {
        let radius = params.other_detect_radius;
        let mut center_of_mass = Vector2::zero();
        let mut heading_sum = Vector2::zero();
        let mut close_masses = Vector2::zero();
        let mut count = 0usize;

        for other in self.neighbours(others, radius) {
            center_of_mass.add([other.position]);
            heading_sum.add([other.heading]);

            let mut offset = other.position - self.position;
            let distance = offset.get_magnitude();
            if distance > 0.0 {
                close_masses.add([*offset.set_magnitude(radius - distance)]);
            }
            count += 1;
        }

        if count == 0 {
            return Vector2::zero();
        }

        let mut acceleration = Vector2::zero();

        center_of_mass.divide([count as f64]);
        acceleration.add([*center_of_mass.sub([self.position]).multiply([params.cohesion])]);

        if heading_sum.get_squared_magnitude() > 0.0 {
            acceleration.add([*heading_sum.normalise().multiply([params.alignment])]);
        } else {
            log::trace!("agent {}: neighbour headings cancel out", self.id);
        }

        if close_masses.get_squared_magnitude() > 0.0 {
            acceleration.add([*close_masses.multiply([-1.0]).normalise().multiply([params.separation])]);
        }

        acceleration
    }

    /// Total steering acceleration for this frame.
    pub fn steering_acceleration(&self, others: &[AgentSnapshot], params: &SteeringParams) -> Vector2 {
        self.boundary_acceleration(params.wall_detect_radius) + self.flocking_acceleration(others, params)
    }

    /// Advances the swim cycle, steers, and moves. `others` is the frame-start
    /// snapshot of the whole flock and may include this agent.
    pub fn update(&mut self, dt: f64, others: &[AgentSnapshot], params: &SteeringParams) {
        self.body.set_anim_speed(params.speed * SWIM_SPEED_SCALE);
        self.body.update(dt);

        let acceleration = self.steering_acceleration(others, params);
        self.apply_acceleration(acceleration);

        let mut aspect = Vector2::new(1.0, params.aspect_ratio);
        aspect.normalise();
        let mut displacement = self.heading.copy();
        displacement.multiply([
            crate::vector::Operand::Scalar(DISPLACEMENT_SCALE * dt * params.speed),
            aspect.into(),
        ]);
        self.position.add([displacement]);

        params.boundary.apply(&mut self.position);
    }

    /// Adds `acceleration` to the heading and renormalises. A sum of zero
    /// length leaves the heading unchanged.
    fn apply_acceleration(&mut self, acceleration: Vector2) {
        let steered = self.heading + acceleration;
        if steered.get_squared_magnitude() > 0.0 && steered.get_squared_magnitude().is_finite() {
            self.heading = steered.get_norm();
        } else {
            log::trace!("agent {}: degenerate steering, heading kept", self.id);
        }
    }

    /// Maps the agent into a `width` x `height` viewport and draws its body.
    pub fn draw<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        width: f64,
        height: f64,
        scale: f64,
        colour: Colour,
        sprites: &SpriteSheet,
    ) {
        let mut pixel = Vector2::new(width, height);
        pixel.multiply([self.position]);
        self.body.set_position(pixel);
        // The body's forward axis is a quarter turn from the steering heading.
        self.body.set_heading(self.heading.get_angle() + PI / 2.0);
        self.body.set_scale(scale);
        self.body.set_colour(colour);
        self.body.draw(surface, sprites);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SteeringParams {
        SteeringParams {
            speed: 0.0001,
            wall_detect_radius: 0.1,
            other_detect_radius: 0.2,
            separation: 1.0,
            alignment: 1.0,
            cohesion: 1.0,
            aspect_ratio: 1.0,
            boundary: crate::params::BoundaryPolicy::Advisory,
        }
    }

    #[test]
    fn test_new_heading_is_unit() {
        let agent = FlockAgent::new(0, 0.5, 0.5, 1.2);
        assert!((agent.heading().get_magnitude() - 1.0).abs() < 1e-12);
        assert!((agent.heading().get_angle() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_wall_avoidance_activation() {
        let towards = FlockAgent::new(0, 0.01, 0.5, PI);
        let push = towards.boundary_acceleration(0.1);
        assert!(push.x > 0.0);
        assert!((push.x - 0.9).abs() < 1e-9);
        assert!(push.y.abs() < 1e-12);

        let away = FlockAgent::new(0, 0.01, 0.5, 0.0);
        assert_eq!(away.boundary_acceleration(0.1), Vector2::zero());
    }

    #[test]
    fn test_wall_push_strengthens_near_wall() {
        let far = FlockAgent::new(0, 0.5, 0.92, PI / 2.0).boundary_acceleration(0.1);
        let near = FlockAgent::new(0, 0.5, 0.99, PI / 2.0).boundary_acceleration(0.1);
        assert!(far.y < 0.0 && near.y < far.y);

        // Past the wall the push saturates at 1.
        let beyond = FlockAgent::new(0, 1.2, 0.5, 0.0).boundary_acceleration(0.1);
        assert_eq!(beyond, Vector2::new(-1.0, 0.0));
    }

    #[test]
    fn test_corner_pushes_on_both_axes() {
        let agent = FlockAgent::new(0, 0.02, 0.02, 5.0 * PI / 4.0);
        let push = agent.boundary_acceleration(0.1);
        assert!(push.x > 0.0 && push.y > 0.0);
    }

    #[test]
    fn test_no_neighbours_is_boundary_only() {
        let p = params();
        let agent = FlockAgent::new(1, 0.05, 0.5, PI);
        let far_away = [
            FlockAgent::new(2, 0.9, 0.9, 0.0).snapshot(),
            agent.snapshot(),
        ];

        assert_eq!(agent.flocking_acceleration(&[], &p), Vector2::zero());
        assert_eq!(agent.flocking_acceleration(&far_away, &p), Vector2::zero());
        assert_eq!(
            agent.steering_acceleration(&far_away, &p),
            agent.boundary_acceleration(p.wall_detect_radius)
        );

        let mut alone = agent.clone();
        let mut with_far = agent.clone();
        alone.update(0.016, &[], &p);
        with_far.update(0.016, &far_away, &p);
        assert_eq!(alone.position(), with_far.position());
        assert_eq!(alone.heading(), with_far.heading());
    }

    #[test]
    fn test_self_is_not_a_neighbour() {
        let agent = FlockAgent::new(4, 0.5, 0.5, 0.0);
        let snapshot = [agent.snapshot()];
        assert_eq!(agent.neighbours(&snapshot, 1.0).count(), 0);
    }

    #[test]
    fn test_flocking_terms() {
        let mut p = params();
        p.separation = 0.0;
        p.alignment = 0.0;
        let agent = FlockAgent::new(0, 0.5, 0.5, 0.0);
        let others = [
            FlockAgent::new(1, 0.6, 0.5, PI / 2.0).snapshot(),
            FlockAgent::new(2, 0.5, 0.6, PI / 2.0).snapshot(),
        ];

        let cohesion = agent.flocking_acceleration(&others, &p);
        assert!((cohesion.x - 0.05).abs() < 1e-12);
        assert!((cohesion.y - 0.05).abs() < 1e-12);

        p.cohesion = 0.0;
        p.alignment = 2.0;
        let alignment = agent.flocking_acceleration(&others, &p);
        assert!(alignment.x.abs() < 1e-12 && (alignment.y - 2.0).abs() < 1e-12);

        p.alignment = 0.0;
        p.separation = 1.0;
        let separation = agent.flocking_acceleration(&others, &p);
        // Pushed away from both neighbours, towards (-1, -1).
        assert!(separation.x < 0.0 && separation.y < 0.0);
        assert!((separation.get_magnitude() - 1.0).abs() < 1e-12);
        assert!((separation.x - separation.y).abs() < 1e-12);
    }

    #[test]
    fn test_opposing_headings_skip_alignment() {
        let agent = FlockAgent::new(0, 0.5, 0.5, 0.0);
        let others = [
            FlockAgent::new(1, 0.55, 0.5, 0.0).snapshot(),
            FlockAgent::new(2, 0.45, 0.5, PI).snapshot(),
        ];
        let mut p = params();
        p.cohesion = 0.0;
        let acc = agent.flocking_acceleration(&others, &p);
        assert!(acc.x.is_finite() && acc.y.is_finite());
    }

    #[test]
    fn test_coincident_neighbour_is_finite() {
        let mut agent = FlockAgent::new(0, 0.5, 0.5, 0.3);
        let others = [FlockAgent::new(1, 0.5, 0.5, 0.3).snapshot()];
        agent.update(0.016, &others, &params());
        assert!(agent.position().x.is_finite() && agent.position().y.is_finite());
        assert!((agent.heading().get_magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_moves_along_heading() {
        let mut p = params();
        p.wall_detect_radius = 0.0;
        let mut agent = FlockAgent::new(0, 0.5, 0.5, 0.0);
        agent.update(0.5, &[], &p);
        // 1000 * 0.5 * 0.0001 = 0.05, scaled by the normalised (1, 1).
        let expected = 0.5 + 0.05 / 2f64.sqrt();
        assert!((agent.position().x - expected).abs() < 1e-12);
        assert_eq!(agent.position().y, 0.5);
        assert!((agent.body().phase() - 0.5 * 0.0001 * SWIM_SPEED_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_aspect_ratio_scales_displacement() {
        let mut p = params();
        p.wall_detect_radius = 0.0;
        p.aspect_ratio = 2.0;
        let mut agent = FlockAgent::new(0, 0.5, 0.5, PI / 4.0);
        let before = agent.position();
        agent.update(0.1, &[], &p);
        let moved = agent.position() - before;
        assert!((moved.y / moved.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_is_not_clamped() {
        let mut p = params();
        p.speed = 0.01;
        let mut agent = FlockAgent::new(0, 0.99, 0.5, 0.0);
        agent.update(0.016, &[], &p);
        // The wall turns the heading but the step still carries the agent out.
        assert!(agent.position().x > 1.0);
    }

    #[test]
    fn test_boundary_policy_contains() {
        let mut p = params();
        p.speed = 0.01;
        p.boundary = crate::params::BoundaryPolicy::Clamp;
        let mut agent = FlockAgent::new(0, 0.99, 0.5, 0.0);
        agent.update(0.016, &[], &p);
        assert_eq!(agent.position().x, 1.0);
    }
}
