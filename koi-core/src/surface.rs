//! The drawing surface and sprite descriptors the renderer talks to.

use core::fmt;
use core::str::FromStr;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::new(0, 0, 0);
    pub const WHITE: Colour = Colour::new(0xFF, 0xFF, 0xFF);
    /// Default koi body colour.
    pub const PEARL: Colour = Colour::new(0xF2, 0xF3, 0xF4);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn parse_hex(s: &str) -> Option<Colour> {
        s.parse().ok()
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::PEARL
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseColourError;

impl fmt::Display for ParseColourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a colour in the form #RRGGBB")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseColourError {}

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColourError);
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColourError);
        Ok(Colour::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// The sprites a koi is decorated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    FinLeft,
    FinRight,
    Tail,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 3] = [SpriteKind::FinLeft, SpriteKind::FinRight, SpriteKind::Tail];

    /// Conventional asset file name.
    pub fn file_name(self) -> &'static str {
        match self {
            SpriteKind::FinLeft => "fin-left.png",
            SpriteKind::FinRight => "fin-right.png",
            SpriteKind::Tail => "tail.png",
        }
    }
}

/// Pixel size of a sprite image, valid only once `loaded` is set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sprite {
    pub width: f64,
    pub height: f64,
    pub loaded: bool,
}

impl Sprite {
    pub fn loaded(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            loaded: true,
        }
    }

    pub fn pending() -> Self {
        Self::default()
    }
}

/// Load state of every sprite a koi uses. Images are loaded out of band;
/// until a sprite reports `loaded` the renderer skips it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteSheet {
    pub fin_left: Sprite,
    pub fin_right: Sprite,
    pub tail: Sprite,
}

impl SpriteSheet {
    pub fn get(&self, kind: SpriteKind) -> &Sprite {
        match kind {
            SpriteKind::FinLeft => &self.fin_left,
            SpriteKind::FinRight => &self.fin_right,
            SpriteKind::Tail => &self.tail,
        }
    }

    pub fn get_mut(&mut self, kind: SpriteKind) -> &mut Sprite {
        match kind {
            SpriteKind::FinLeft => &mut self.fin_left,
            SpriteKind::FinRight => &mut self.fin_right,
            SpriteKind::Tail => &mut self.tail,
        }
    }

    /// The sprite if it has finished loading.
    pub fn ready(&self, kind: SpriteKind) -> Option<&Sprite> {
        Some(self.get(kind)).filter(|sprite| sprite.loaded)
    }
}

/// Where and how to blit a sprite: centred on `(x, y)`, rotated by `angle`,
/// scaled by `scale` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePlacement {
    pub kind: SpriteKind,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub scale: f64,
}

/// A 2D immediate-mode drawing target with a canvas-like path model.
///
/// Angles are in radians, increasing from +x towards +y.
pub trait DrawSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_colour(&self) -> Colour;
    fn set_fill_colour(&mut self, colour: Colour);
    fn set_stroke_colour(&mut self, colour: Colour);

    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    /// Blits `kind` into the rectangle `(x, y, width, height)` of the current
    /// transform.
    fn draw_image(&mut self, kind: SpriteKind, x: f64, y: f64, width: f64, height: f64);

    /// Draws `sprite` per `placement`, leaving the transform as it found it.
    fn blit(&mut self, sprite: &Sprite, placement: &SpritePlacement) {
        let SpritePlacement {
            kind,
            x,
            y,
            angle,
            scale,
        } = *placement;
        self.translate(x, y);
        self.rotate(angle);
        self.draw_image(
            kind,
            -sprite.width / 2.0 * scale,
            -sprite.height / 2.0 * scale,
            sprite.width * scale,
            sprite.height * scale,
        );
        self.rotate(-angle);
        self.translate(-x, -y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_parse() {
        assert_eq!(Colour::parse_hex("#F2F3F4"), Some(Colour::PEARL));
        assert_eq!(Colour::parse_hex("ff0080"), Some(Colour::new(255, 0, 128)));
        assert_eq!(Colour::parse_hex("#FFF"), None);
        assert_eq!(Colour::parse_hex("#GG0000"), None);
        assert_eq!(Colour::parse_hex("#ÿÿÿ"), None);
        assert_eq!(Colour::parse_hex("#+F+F+F"), None);
        assert_eq!(Colour::parse_hex("-10000"), None);
    }

    #[test]
    fn test_colour_display() {
        let c = Colour::new(0xE3, 0x44, 0x27);
        let mut buf = heapless::String::<8>::new();
        core::fmt::write(&mut buf, format_args!("{}", c)).unwrap();
        assert_eq!(buf.as_str(), "#E34427");
    }

    #[test]
    fn test_sprite_sheet_ready() {
        let mut sheet = SpriteSheet::default();
        assert!(sheet.ready(SpriteKind::Tail).is_none());
        *sheet.get_mut(SpriteKind::Tail) = Sprite::loaded(40.0, 30.0);
        assert_eq!(sheet.ready(SpriteKind::Tail).map(|s| s.width), Some(40.0));
        assert!(sheet.ready(SpriteKind::FinLeft).is_none());
    }
}
