//! Procedural koi body.
//!
//! A koi is a four-point spine that undulates with a sine wave travelling
//! from head to tail. Everything drawn (outline, fins, tail, eyes) is derived
//! from that spine each frame, so the only state that evolves is `phase`.

use core::f64::consts::PI;

use crate::surface::{Colour, DrawSurface, Sprite, SpriteKind, SpritePlacement, SpriteSheet};
use crate::vector::Vector2;

/// Number of spine points, head first.
pub const SEGMENTS: usize = 4;
/// Phase lag between neighbouring spine points.
pub const SECTION_CURVE_DELAY: f64 = PI * (2.0 / 5.0);
pub const SECTION_SPACING: f64 = 5.0;
pub const BODY_OFFSET: f64 = 2.0;
pub const HALF_HEAD_SEPARATION: f64 = 2.5;
/// Body half-width per segment as a fraction of the head. The tail closes to a point.
pub const BODY_RADII: [f64; SEGMENTS] = [1.0, 0.75, 0.5, 0.0];

const FIN_SCALE_DIVISOR: f64 = 50.0;
const FIN_LERP: f64 = 0.5;
const FIN_ROTATION: f64 = PI / 1.9;
const FIN_FORWARD_OFFSET: f64 = 300.0;
const FIN_WIDTH_OFFSET: f64 = 0.4;
const TAIL_SCALE_DIVISOR: f64 = 70.0;
const TAIL_OFFSET_DIVISOR: f64 = 2.3;
const TAIL_ROTATION: f64 = PI * 1.24;
const EYE_ANGLE: f64 = PI / 3.0;
const EYE_DISTANCE: f64 = 0.95;
const EYE_RADIUS: f64 = 0.3;

/// Left and right edge of the body at one spine point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePair {
    pub left: Vector2,
    pub right: Vector2,
}

/// Spine, orientation and outline for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShape {
    pub centers: [Vector2; SEGMENTS],
    pub angles: [f64; SEGMENTS],
    pub points: [OutlinePair; SEGMENTS],
}

#[derive(Debug, Clone, PartialEq)]
pub struct KoiBody {
    position: Vector2,
    heading: f64,
    scale: f64,
    phase: f64,
    anim_speed: f64,
    colour: Colour,
}

impl KoiBody {
    pub fn new(position: Vector2, heading: f64, scale: f64, anim_speed: f64) -> Self {
        Self {
            position,
            heading,
            scale,
            phase: 0.0,
            anim_speed,
            colour: Colour::default(),
        }
    }

    /// Advances the swim cycle.
    pub fn update(&mut self, dt: f64) {
        self.phase += dt * self.anim_speed;
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position.set_head(position);
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn set_heading(&mut self, heading: f64) {
        self.heading = heading;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn anim_speed(&self) -> f64 {
        self.anim_speed
    }

    pub fn set_anim_speed(&mut self, anim_speed: f64) {
        self.anim_speed = anim_speed;
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn set_colour(&mut self, colour: Colour) {
        self.colour = colour;
    }

    /// Spine points, head to tail, in world space.
    pub fn body_centers(&self) -> [Vector2; SEGMENTS] {
        let (sin_h, cos_h) = (crate::math::sin(self.heading), crate::math::cos(self.heading));
        core::array::from_fn(|i| {
            let lag = (SEGMENTS - 1 - i) as f64 * SECTION_CURVE_DELAY;
            let local = Vector2::new(
                crate::math::sin(self.phase + lag) * self.scale * BODY_OFFSET,
                i as f64 * self.scale * SECTION_SPACING,
            );
            Vector2::new(
                cos_h * local.x - sin_h * local.y,
                sin_h * local.x + cos_h * local.y,
            ) + self.position
        })
    }

    /// Facing of each spine point, read from the local tangent.
    pub fn body_angles(centers: &[Vector2; SEGMENTS]) -> [f64; SEGMENTS] {
        let last = SEGMENTS - 1;
        core::array::from_fn(|i| {
            let tangent = if i > 0 && i < last {
                (centers[i - 1] - centers[i]) + (centers[i] - centers[i + 1])
            } else if i > 0 {
                centers[i - 1] - centers[i]
            } else {
                centers[i] - centers[i + 1]
            };
            tangent.get_angle()
        })
    }

    /// Left and right body edge at each spine point.
    pub fn body_points(&self, centers: &[Vector2; SEGMENTS], angles: &[f64; SEGMENTS]) -> [OutlinePair; SEGMENTS] {
        core::array::from_fn(|i| {
            let center = centers[i];
            let reference = Vector2::new(
                center.x + self.scale * HALF_HEAD_SEPARATION * BODY_RADII[i],
                center.y,
            );
            OutlinePair {
                right: rotate_point_on_circumference(center, reference, angles[i] + PI / 2.0),
                left: rotate_point_on_circumference(center, reference, angles[i] - PI / 2.0),
            }
        })
    }

    pub fn shape(&self) -> BodyShape {
        let centers = self.body_centers();
        let angles = Self::body_angles(&centers);
        let points = self.body_points(&centers, &angles);
        BodyShape {
            centers,
            angles,
            points,
        }
    }

    /// Pectoral fin placements `[right, left]`, or `None` until both fin
    /// sprites are loaded.
    pub fn fin_placements(&self, shape: &BodyShape, sprites: &SpriteSheet) -> Option<[(Sprite, SpritePlacement); 2]> {
        let right_fin = *sprites.ready(SpriteKind::FinRight)?;
        let left_fin = *sprites.ready(SpriteKind::FinLeft)?;

        let fin_scale = self.scale / FIN_SCALE_DIVISOR;
        let [c0, _, _, _] = shape.centers;
        let forward = Vector2::polar(fin_scale * FIN_FORWARD_OFFSET, shape.angles[0] + PI);

        let right = c0.lerp(&shape.points[0].right, FIN_LERP)
            + Vector2::polar(
                crate::math::abs(right_fin.width * fin_scale * FIN_WIDTH_OFFSET),
                shape.angles[1] + PI / 2.0,
            )
            + forward;
        let left = c0.lerp(&shape.points[0].left, FIN_LERP)
            + Vector2::polar(
                crate::math::abs(left_fin.width * fin_scale * FIN_WIDTH_OFFSET),
                shape.angles[1] - PI / 2.0,
            )
            + forward;

        Some([
            (
                right_fin,
                SpritePlacement {
                    kind: SpriteKind::FinRight,
                    x: right.x,
                    y: right.y,
                    angle: shape.angles[1] + FIN_ROTATION,
                    scale: fin_scale,
                },
            ),
            (
                left_fin,
                SpritePlacement {
                    kind: SpriteKind::FinLeft,
                    x: left.x,
                    y: left.y,
                    angle: shape.angles[1] + PI - FIN_ROTATION,
                    scale: fin_scale,
                },
            ),
        ])
    }

    /// Tail placement behind the last spine point, or `None` until the tail
    /// sprite is loaded.
    pub fn tail_placement(&self, shape: &BodyShape, sprites: &SpriteSheet) -> Option<(Sprite, SpritePlacement)> {
        let tail = *sprites.ready(SpriteKind::Tail)?;
        let tail_scale = self.scale / TAIL_SCALE_DIVISOR;
        let diagonal = Vector2::new(tail.width, tail.height).get_magnitude();
        let pos = Vector2::polar(
            crate::math::abs(diagonal * tail_scale / TAIL_OFFSET_DIVISOR),
            shape.angles[3] + PI,
        ) + shape.centers[3];

        Some((
            tail,
            SpritePlacement {
                kind: SpriteKind::Tail,
                x: pos.x,
                y: pos.y,
                angle: shape.angles[3] + TAIL_ROTATION,
                scale: tail_scale,
            },
        ))
    }

    /// Eye centres `[right, left]`.
    pub fn eye_positions(&self, shape: &BodyShape) -> [Vector2; 2] {
        let distance = HALF_HEAD_SEPARATION * self.scale * EYE_DISTANCE;
        [
            Vector2::polar(distance, shape.angles[0] + EYE_ANGLE) + shape.centers[0],
            Vector2::polar(distance, shape.angles[0] - EYE_ANGLE) + shape.centers[0],
        ]
    }

    pub fn eye_radius(&self) -> f64 {
        EYE_RADIUS * self.scale
    }

    /// Draws fins, tail, body and eyes, in that order. The surface's fill
    /// colour is restored afterwards.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, sprites: &SpriteSheet) {
        let previous_fill = surface.fill_colour();
        let shape = self.shape();

        if let Some(fins) = self.fin_placements(&shape, sprites) {
            for (sprite, placement) in &fins {
                surface.blit(sprite, placement);
            }
        }
        if let Some((sprite, placement)) = self.tail_placement(&shape, sprites) {
            surface.blit(&sprite, &placement);
        }
        self.draw_body(surface, &shape);
        self.draw_eyes(surface, &shape);

        surface.set_fill_colour(previous_fill);
    }

    fn draw_body<S: DrawSurface + ?Sized>(&self, surface: &mut S, shape: &BodyShape) {
        let BodyShape {
            centers,
            angles,
            points,
        } = shape;

        surface.set_fill_colour(self.colour);
        surface.begin_path();
        surface.move_to(points[0].right.x, points[0].right.y);
        surface.bezier_curve_to(
            points[1].right.x,
            points[1].right.y,
            points[2].right.x,
            points[2].right.y,
            centers[3].x,
            centers[3].y,
        );
        surface.bezier_curve_to(
            points[2].left.x,
            points[2].left.y,
            points[1].left.x,
            points[1].left.y,
            points[0].left.x,
            points[0].left.y,
        );
        surface.arc(
            centers[0].x,
            centers[0].y,
            HALF_HEAD_SEPARATION * self.scale,
            angles[0] - PI / 2.0,
            angles[0] + PI / 2.0,
        );
        surface.fill();
    }

    fn draw_eyes<S: DrawSurface + ?Sized>(&self, surface: &mut S, shape: &BodyShape) {
        surface.set_fill_colour(Colour::BLACK);
        for eye in self.eye_positions(shape) {
            surface.begin_path();
            surface.arc(eye.x, eye.y, self.eye_radius(), 0.0, 2.0 * PI);
            surface.fill();
        }
    }
}

/// Moves `point` around `center` by `angle`, keeping its distance.
///
/// A point sitting on `center` stays there.
pub fn rotate_point_on_circumference(center: Vector2, point: Vector2, angle: f64) -> Vector2 {
    let mut relative = point.copy();
    relative.sub([center]);
    let radius = relative.get_magnitude();
    if radius == 0.0 {
        return center;
    }
    let mut offset = Vector2::up();
    offset.multiply([radius]).set_angle(relative.get_angle() + angle).add([center]);
    offset
}
