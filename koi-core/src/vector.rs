use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

use crate::math;

/// A 2D vector used for positions, headings and body geometry.
///
/// The chained operations (`add`, `sub`, `multiply`, `divide`, `pow`,
/// `set_head`, `set_angle`, ...) mutate the receiver and hand it back so calls
/// can be strung together. Take a [`Vector2::copy`] first when the original
/// value is still needed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

/// A single operand of a chained arithmetic call.
///
/// `Scalar` applies to both components, `Pair` applies component-wise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Scalar(f64),
    Pair(f64, f64),
}

impl Operand {
    fn components(self) -> (f64, f64) {
        match self {
            Operand::Scalar(s) => (s, s),
            Operand::Pair(x, y) => (x, y),
        }
    }
}

impl From<f64> for Operand {
    fn from(s: f64) -> Self {
        Operand::Scalar(s)
    }
}

impl From<Vector2> for Operand {
    fn from(v: Vector2) -> Self {
        Operand::Pair(v.x, v.y)
    }
}

impl From<&Vector2> for Operand {
    fn from(v: &Vector2) -> Self {
        Operand::Pair(v.x, v.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Vector2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of the given length pointing along `angle`.
    pub fn polar(magnitude: f64, angle: f64) -> Self {
        Self {
            x: magnitude * math::cos(angle),
            y: magnitude * math::sin(angle),
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn one() -> Self {
        Self::new(1.0, 1.0)
    }

    pub fn right() -> Self {
        Self::new(1.0, 0.0)
    }

    pub fn left() -> Self {
        Self::new(-1.0, 0.0)
    }

    /// Screen-space up, i.e. towards negative y.
    pub fn up() -> Self {
        Self::new(0.0, -1.0)
    }

    pub fn down() -> Self {
        Self::new(0.0, 1.0)
    }

    fn fold<I>(&mut self, operands: I, op: impl Fn(f64, f64) -> f64) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        for operand in operands {
            let (ox, oy) = operand.into().components();
            self.x = op(self.x, ox);
            self.y = op(self.y, oy);
        }
        self
    }

    pub fn add<I>(&mut self, operands: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.fold(operands, |a, b| a + b)
    }

    pub fn sub<I>(&mut self, operands: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.fold(operands, |a, b| a - b)
    }

    pub fn multiply<I>(&mut self, operands: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.fold(operands, |a, b| a * b)
    }

    pub fn divide<I>(&mut self, operands: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.fold(operands, |a, b| a / b)
    }

    pub fn pow<I>(&mut self, operands: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.fold(operands, math::powf)
    }

    /// Point at `t` along the line from `self` to `other`. `t` is not clamped.
    pub fn lerp(&self, other: &Vector2, t: f64) -> Vector2 {
        Vector2::new(
            self.x - (self.x - other.x) * t,
            self.y - (self.y - other.y) * t,
        )
    }

    pub fn dot(&self, other: &Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn get_max(&self) -> f64 {
        self.x.max(self.y)
    }

    pub fn get_min(&self) -> f64 {
        self.x.min(self.y)
    }

    pub fn set_head(&mut self, head: impl Into<Vector2>) -> &mut Self {
        let head = head.into();
        self.x = head.x;
        self.y = head.y;
        self
    }

    pub fn get_squared_magnitude(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn get_magnitude(&self) -> f64 {
        math::sqrt(self.get_squared_magnitude())
    }

    /// Rescales to `magnitude`. Undefined for the zero vector.
    pub fn set_magnitude(&mut self, magnitude: f64) -> &mut Self {
        let ratio = magnitude / self.get_magnitude();
        self.x *= ratio;
        self.y *= ratio;
        self
    }

    /// Normalised copy. Undefined for the zero vector.
    pub fn get_norm(&self) -> Vector2 {
        let magnitude = self.get_magnitude();
        Vector2::new(self.x / magnitude, self.y / magnitude)
    }

    /// Normalises in place. Undefined for the zero vector.
    pub fn normalise(&mut self) -> &mut Self {
        let magnitude = self.get_magnitude();
        self.x /= magnitude;
        self.y /= magnitude;
        self
    }

    pub fn abs(&mut self) -> &mut Self {
        self.x = math::abs(self.x);
        self.y = math::abs(self.y);
        self
    }

    /// Per-component sign, where zero counts as positive.
    pub fn get_sign(&self) -> Vector2 {
        Vector2::new(
            if self.x >= 0.0 { 1.0 } else { -1.0 },
            if self.y >= 0.0 { 1.0 } else { -1.0 },
        )
    }

    /// Angle in `[0, 2π)` measured from +x towards +y.
    ///
    /// This is a quadrant-wise arctangent rather than `atan2`: the branches
    /// mirror each other around the axes and every angle computed elsewhere
    /// in the crate is read through it. NaN components are treated as zero.
    /// Undefined for the zero vector.
    pub fn get_angle(&self) -> f64 {
        let x = if self.x.is_nan() { 0.0 } else { self.x };
        let y = if self.y.is_nan() { 0.0 } else { self.y };
        if x >= 0.0 && y >= 0.0 {
            math::atan(y / x)
        } else if x >= 0.0 {
            PI * 3.0 / 2.0 + math::atan(x / -y)
        } else if y >= 0.0 {
            PI - math::atan(y / -x)
        } else {
            PI * 3.0 / 2.0 - math::atan(x / y)
        }
    }

    /// Points the vector along `angle`, keeping its magnitude.
    pub fn set_angle(&mut self, angle: f64) -> &mut Self {
        let magnitude = self.get_magnitude();
        self.x = magnitude * math::cos(angle);
        self.y = magnitude * math::sin(angle);
        self
    }

    pub fn copy(&self) -> Vector2 {
        *self
    }

    /// Exact component equality, no tolerance.
    pub fn equals(&self, other: &Vector2) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Parses the `x:<X>,y:<Y>` form written by `Display`.
    pub fn parse_string(s: &str) -> Option<Vector2> {
        s.parse().ok()
    }
}

impl core::ops::Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f64> for Vector2 {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x:{},y:{}", self.x, self.y)
    }
}

/// Error returned when a string is not in the `x:<X>,y:<Y>` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseVectorError {
    /// The string does not have the `x:..,y:..` shape.
    Format,
    /// One of the components is not a number.
    Component,
}

impl fmt::Display for ParseVectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseVectorError::Format => write!(f, "expected a vector in the form x:<X>,y:<Y>"),
            ParseVectorError::Component => write!(f, "vector component is not a number"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseVectorError {}

impl FromStr for Vector2 {
    type Err = ParseVectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("x:").ok_or(ParseVectorError::Format)?;
        let (x, rest) = rest.split_once(',').ok_or(ParseVectorError::Format)?;
        let y = rest.strip_prefix("y:").ok_or(ParseVectorError::Format)?;
        if x.is_empty() || y.is_empty() {
            return Err(ParseVectorError::Format);
        }

        let x = x.parse::<f64>().map_err(|_| ParseVectorError::Component)?;
        let y = y.parse::<f64>().map_err(|_| ParseVectorError::Component)?;
        Ok(Vector2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> [Vector2; 6] {
        [
            Vector2::new(3.0, 4.0),
            Vector2::new(-1.5, 0.25),
            Vector2::new(0.0, -7.0),
            Vector2::new(1e-3, 2048.0),
            Vector2::new(-0.5, -0.5),
            Vector2::new(12.0, 0.0),
        ]
    }

    #[test]
    fn test_chained_operands() {
        let mut v = Vector2::new(1.0, 2.0);
        v.add([Operand::Scalar(1.0), Operand::from(Vector2::new(2.0, 3.0))])
            .multiply([2.0]);
        assert_eq!(v, Vector2::new(8.0, 12.0));

        let mut v = Vector2::new(9.0, 4.0);
        v.pow([0.5]).divide([Vector2::new(3.0, 4.0)]).sub([1.0]);
        assert_eq!(v, Vector2::new(0.0, -0.5));
    }

    #[test]
    fn test_add_sub_inverse() {
        let b = Vector2::new(0.5, -2.0);
        for a in samples() {
            let mut c = a.copy();
            c.add([b]).sub([b]);
            assert!((c.x - a.x).abs() <= 1e-12 && (c.y - a.y).abs() <= 1e-12);
        }
        // Exactly representable values round-trip bit for bit.
        let a = Vector2::new(3.0, -4.0);
        assert!(a.copy().add([b]).sub([b]).equals(&a));
    }

    #[test]
    fn test_multiply_divide_inverse() {
        for s in [2.0, -0.5, 4.0, 0.125] {
            for a in samples() {
                assert!(a.copy().multiply([s]).divide([s]).equals(&a));
            }
        }
        let a = Vector2::new(0.1, 0.7);
        let mut c = a.copy();
        c.multiply([3.0]).divide([3.0]);
        assert!((c.x - a.x).abs() < 1e-15 && (c.y - a.y).abs() < 1e-15);
    }

    #[test]
    fn test_magnitude_and_normalise() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.get_magnitude(), 5.0);
        assert_eq!(v.get_squared_magnitude(), 25.0);

        let mut n = v.copy();
        n.normalise();
        assert!((n.get_magnitude() - 1.0).abs() < 1e-12);
        assert_eq!(v.get_norm(), n);

        let mut m = v.copy();
        m.set_magnitude(10.0);
        assert!((m.x - 6.0).abs() < 1e-12 && (m.y - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_round_trip() {
        let steps = 72;
        for k in 0..steps {
            let theta = (k as f64 + 0.5) * 2.0 * PI / steps as f64;
            let angle = Vector2::right().copy().set_angle(theta).get_angle();
            assert!(
                (angle - theta).abs() < 1e-9,
                "theta {} came back as {}",
                theta,
                angle
            );
        }
    }

    #[test]
    fn test_angle_quadrants() {
        assert!((Vector2::new(1.0, 1.0).get_angle() - PI / 4.0).abs() < 1e-12);
        assert!((Vector2::new(-1.0, 1.0).get_angle() - 3.0 * PI / 4.0).abs() < 1e-12);
        assert!((Vector2::new(-1.0, -1.0).get_angle() - 5.0 * PI / 4.0).abs() < 1e-12);
        assert!((Vector2::new(1.0, -1.0).get_angle() - 7.0 * PI / 4.0).abs() < 1e-12);
        assert!((Vector2::down().get_angle() - PI / 2.0).abs() < 1e-12);
        assert!((Vector2::up().get_angle() - 3.0 * PI / 2.0).abs() < 1e-12);
        assert_eq!(Vector2::right().get_angle(), 0.0);
    }

    #[test]
    fn test_lerp_extrapolates() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(2.0, -4.0);
        assert_eq!(a.lerp(&b, 0.5), Vector2::new(1.0, -2.0));
        assert_eq!(a.lerp(&b, 1.5), Vector2::new(3.0, -6.0));
        assert_eq!(a.lerp(&b, -1.0), Vector2::new(-2.0, 4.0));
    }

    #[test]
    fn test_queries() {
        let v = Vector2::new(-2.0, 5.0);
        assert_eq!(v.dot(&Vector2::new(3.0, 1.0)), -1.0);
        assert_eq!(v.get_max(), 5.0);
        assert_eq!(v.get_min(), -2.0);
        assert_eq!(v.get_sign(), Vector2::new(-1.0, 1.0));
        assert_eq!(Vector2::zero().get_sign(), Vector2::one());

        let mut a = v.copy();
        a.abs();
        assert_eq!(a, Vector2::new(2.0, 5.0));

        let mut h = Vector2::zero();
        h.set_head((4.0, 5.0));
        assert_eq!(h, Vector2::new(4.0, 5.0));
        h.set_head(Vector2::left());
        assert!(h.equals(&Vector2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_factories_are_fresh() {
        let mut first = Vector2::one();
        first.multiply([5.0]);
        assert_eq!(Vector2::one(), Vector2::new(1.0, 1.0));
        assert_eq!(Vector2::up(), Vector2::new(0.0, -1.0));
        assert_eq!(Vector2::down(), Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_string_round_trip() {
        for v in samples() {
            let s = v.to_string();
            let parsed = Vector2::parse_string(&s).expect("should parse");
            assert!(parsed.equals(&v), "{} parsed as {:?}", s, parsed);
        }
        assert_eq!(Vector2::new(1.0, -2.5).to_string(), "x:1,y:-2.5");
        let tiny = Vector2::new(1e-300, -3.5e200);
        assert!(Vector2::parse_string(&tiny.to_string()).unwrap().equals(&tiny));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Vector2::parse_string("1,2"), None);
        assert_eq!(Vector2::parse_string("x:,y:2"), None);
        assert_eq!(Vector2::parse_string("x:1;y:2"), None);
        assert_eq!(Vector2::parse_string("x:a,y:2"), None);
        assert_eq!(
            "y:1,x:2".parse::<Vector2>(),
            Err(ParseVectorError::Format)
        );
        assert_eq!(
            "x:1,y:two".parse::<Vector2>(),
            Err(ParseVectorError::Component)
        );
    }
}
