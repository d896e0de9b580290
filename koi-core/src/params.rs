//! Runtime parameters and the key-value source they are read from.

use core::fmt;
use core::str::FromStr;

use crate::math;
use crate::surface::Colour;
use crate::vector::Vector2;

pub const SPEED: &str = "speed";
pub const WALL_DETECT_RADIUS: &str = "wall_detect_radius";
pub const OTHER_DETECT_RADIUS: &str = "other_detect_radius";
pub const SEPARATION: &str = "separation";
pub const ALIGNMENT: &str = "alignment";
pub const COHESION: &str = "cohesion";
pub const SCALE: &str = "scale";
pub const BODY_COLOUR: &str = "body_colour";
pub const COUNT: &str = "count";
pub const BOUNDARY: &str = "boundary";

/// Largest flock a parameter source can ask for.
pub const MAX_KOI: usize = 2000;

/// Every parameter name a [`ParamSource`] is asked for.
pub const PARAM_NAMES: [&str; 10] = [
    SPEED,
    WALL_DETECT_RADIUS,
    OTHER_DETECT_RADIUS,
    SEPARATION,
    ALIGNMENT,
    COHESION,
    SCALE,
    BODY_COLOUR,
    COUNT,
    BOUNDARY,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue<'a> {
    Number(f64),
    Bool(bool),
    Text(&'a str),
    Colour(Colour),
}

impl<'a> ParamValue<'a> {
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            ParamValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// A colour value, or text holding a hex colour.
    pub fn as_colour(&self) -> Option<Colour> {
        match *self {
            ParamValue::Colour(c) => Some(c),
            ParamValue::Text(s) => Colour::parse_hex(s),
            _ => None,
        }
    }
}

/// Anything that can answer "what is the current value of `name`".
pub trait ParamSource {
    fn get_val(&self, name: &str) -> Option<ParamValue<'_>>;
}

impl<T: ParamSource + ?Sized> ParamSource for &T {
    fn get_val(&self, name: &str) -> Option<ParamValue<'_>> {
        (**self).get_val(name)
    }
}

/// What happens to an agent that drifts out of the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Walls only steer; positions are left untouched.
    #[default]
    Advisory,
    /// Positions wrap around to the opposite edge.
    Wrap,
    /// Positions are clamped to the edge.
    Clamp,
}

impl BoundaryPolicy {
    pub fn name(self) -> &'static str {
        match self {
            BoundaryPolicy::Advisory => "advisory",
            BoundaryPolicy::Wrap => "wrap",
            BoundaryPolicy::Clamp => "clamp",
        }
    }

    pub fn apply(self, position: &mut Vector2) {
        match self {
            BoundaryPolicy::Advisory => {}
            BoundaryPolicy::Wrap => {
                position.x = wrap_unit(position.x);
                position.y = wrap_unit(position.y);
            }
            BoundaryPolicy::Clamp => {
                position.x = position.x.clamp(0.0, 1.0);
                position.y = position.y.clamp(0.0, 1.0);
            }
        }
    }
}

/// Maps `v` into `[0, 1)`. Tiny negatives can round up to exactly 1.
fn wrap_unit(v: f64) -> f64 {
    let wrapped = v - math::floor(v);
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseBoundaryError;

impl fmt::Display for ParseBoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boundary policy must be one of advisory, wrap, clamp")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseBoundaryError {}

impl FromStr for BoundaryPolicy {
    type Err = ParseBoundaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("advisory") => Ok(BoundaryPolicy::Advisory),
            s if s.eq_ignore_ascii_case("wrap") => Ok(BoundaryPolicy::Wrap),
            s if s.eq_ignore_ascii_case("clamp") => Ok(BoundaryPolicy::Clamp),
            _ => Err(ParseBoundaryError),
        }
    }
}

/// Inputs to one agent's steering update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    pub speed: f64,
    pub wall_detect_radius: f64,
    pub other_detect_radius: f64,
    pub separation: f64,
    pub alignment: f64,
    pub cohesion: f64,
    /// Viewport width over height.
    pub aspect_ratio: f64,
    pub boundary: BoundaryPolicy,
}

impl Default for SteeringParams {
    fn default() -> Self {
        FlockParams::default().steering(1.0)
    }
}

/// Everything the simulation reads from its parameter source once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockParams {
    pub speed: f64,
    pub wall_detect_radius: f64,
    pub other_detect_radius: f64,
    pub separation: f64,
    pub alignment: f64,
    pub cohesion: f64,
    pub scale: f64,
    pub body_colour: Colour,
    pub count: usize,
    pub boundary: BoundaryPolicy,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            speed: 0.0001,
            wall_detect_radius: 0.1,
            other_detect_radius: 0.1,
            separation: 1.0,
            alignment: 1.0,
            cohesion: 1.0,
            scale: 5.0,
            body_colour: Colour::PEARL,
            count: 20,
            boundary: BoundaryPolicy::Advisory,
        }
    }
}

impl FlockParams {
    /// Reads every parameter from `source`. Missing or ill-typed values keep
    /// their default.
    pub fn from_source<P: ParamSource + ?Sized>(source: &P) -> Self {
        let defaults = Self::default();
        let number = |name: &str, fallback: f64| {
            source
                .get_val(name)
                .and_then(|v| v.as_number())
                .filter(|n| n.is_finite())
                .unwrap_or(fallback)
        };

        let body_colour = source
            .get_val(BODY_COLOUR)
            .and_then(|v| v.as_colour())
            .unwrap_or(defaults.body_colour);
        let boundary = source
            .get_val(BOUNDARY)
            .and_then(|v| v.as_text())
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.boundary);
        let count = number(COUNT, defaults.count as f64);
        let count = if count < 0.0 {
            0
        } else {
            (count as usize).min(MAX_KOI)
        };

        Self {
            speed: number(SPEED, defaults.speed),
            wall_detect_radius: number(WALL_DETECT_RADIUS, defaults.wall_detect_radius),
            other_detect_radius: number(OTHER_DETECT_RADIUS, defaults.other_detect_radius),
            separation: number(SEPARATION, defaults.separation),
            alignment: number(ALIGNMENT, defaults.alignment),
            cohesion: number(COHESION, defaults.cohesion),
            scale: number(SCALE, defaults.scale),
            body_colour,
            count,
            boundary,
        }
    }

    pub fn steering(&self, aspect_ratio: f64) -> SteeringParams {
        SteeringParams {
            speed: self.speed,
            wall_detect_radius: self.wall_detect_radius,
            other_detect_radius: self.other_detect_radius,
            separation: self.separation,
            alignment: self.alignment,
            cohesion: self.cohesion,
            aspect_ratio,
            boundary: self.boundary,
        }
    }
}

impl ParamSource for FlockParams {
    fn get_val(&self, name: &str) -> Option<ParamValue<'_>> {
        let value = match name {
            SPEED => ParamValue::Number(self.speed),
            WALL_DETECT_RADIUS => ParamValue::Number(self.wall_detect_radius),
            OTHER_DETECT_RADIUS => ParamValue::Number(self.other_detect_radius),
            SEPARATION => ParamValue::Number(self.separation),
            ALIGNMENT => ParamValue::Number(self.alignment),
            COHESION => ParamValue::Number(self.cohesion),
            SCALE => ParamValue::Number(self.scale),
            COUNT => ParamValue::Number(self.count as f64),
            BOUNDARY => ParamValue::Text(self.boundary.name()),
            BODY_COLOUR => ParamValue::Colour(self.body_colour),
            _ => return None,
        };
        Some(value)
    }
}

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, or 1 for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static [(&'static str, ParamValue<'static>)]);

    impl ParamSource for Fixed {
        fn get_val(&self, name: &str) -> Option<ParamValue<'_>> {
            self.0.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
    }

    #[test]
    fn test_defaults_when_source_is_empty() {
        assert_eq!(FlockParams::from_source(&Fixed(&[])), FlockParams::default());
    }

    #[test]
    fn test_reads_typed_values() {
        let source = Fixed(&[
            (SPEED, ParamValue::Number(0.5)),
            (COUNT, ParamValue::Number(7.0)),
            (BODY_COLOUR, ParamValue::Text("#E34427")),
            (BOUNDARY, ParamValue::Text("Wrap")),
            (SEPARATION, ParamValue::Text("lots")),
            (COHESION, ParamValue::Number(f64::NAN)),
        ]);
        let params = FlockParams::from_source(&source);
        assert_eq!(params.speed, 0.5);
        assert_eq!(params.count, 7);
        assert_eq!(params.body_colour, Colour::new(0xE3, 0x44, 0x27));
        assert_eq!(params.boundary, BoundaryPolicy::Wrap);
        assert_eq!(params.separation, 1.0);
        assert_eq!(params.cohesion, 1.0);
    }

    #[test]
    fn test_negative_count_is_empty() {
        let params = FlockParams::from_source(&Fixed(&[(COUNT, ParamValue::Number(-3.0))]));
        assert_eq!(params.count, 0);
    }

    #[test]
    fn test_huge_count_is_capped() {
        let params = FlockParams::from_source(&Fixed(&[(COUNT, ParamValue::Number(1e30))]));
        assert_eq!(params.count, MAX_KOI);
        let params = FlockParams::from_source(&Fixed(&[(COUNT, ParamValue::Number(1999.0))]));
        assert_eq!(params.count, 1999);
    }

    #[test]
    fn test_colour_values() {
        let red = Colour::new(0xFF, 0, 0);
        assert_eq!(ParamValue::Colour(red).as_colour(), Some(red));
        assert_eq!(ParamValue::Text("#FF0000").as_colour(), Some(red));
        assert_eq!(ParamValue::Text("red").as_colour(), None);
        assert_eq!(ParamValue::Bool(true).as_colour(), None);
        assert_eq!(ParamValue::Colour(red).as_text(), None);
    }

    #[test]
    fn test_boundary_policies() {
        let mut p = Vector2::new(1.25, -0.25);
        BoundaryPolicy::Advisory.apply(&mut p);
        assert_eq!(p, Vector2::new(1.25, -0.25));

        BoundaryPolicy::Clamp.apply(&mut p);
        assert_eq!(p, Vector2::new(1.0, 0.0));

        let mut p = Vector2::new(1.25, -0.25);
        BoundaryPolicy::Wrap.apply(&mut p);
        assert_eq!(p, Vector2::new(0.25, 0.75));
    }

    #[test]
    fn test_params_round_trip_through_source() {
        let params = FlockParams {
            speed: 0.002,
            count: 3,
            body_colour: Colour::new(0xE3, 0x44, 0x27),
            boundary: BoundaryPolicy::Clamp,
            ..FlockParams::default()
        };
        assert_eq!(FlockParams::from_source(&params), params);
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(Viewport::new(800.0, 400.0).aspect_ratio(), 2.0);
        assert_eq!(Viewport::new(0.0, 0.0).aspect_ratio(), 1.0);
    }
}
