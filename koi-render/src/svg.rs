//! A [`DrawSurface`] that records draw calls as an SVG document.

use std::f64::consts::PI;

use koi_core::{Colour, DrawSurface, SpriteKind};

/// Canvas-style affine transform `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.e += self.a * x + self.c * y;
        self.f += self.b * x + self.d * y;
    }

    fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let Affine { a, b, c, d, .. } = *self;
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }
}

pub struct SvgSurface {
    width: f64,
    height: f64,
    sprite_dir: String,
    background: Option<Colour>,
    elements: Vec<String>,
    path: String,
    fill: Colour,
    stroke: Colour,
    transform: Affine,
}

impl SvgSurface {
    /// Empty document of the given size. Sprites are referenced relative to
    /// `sprite_dir`.
    pub fn new(width: f64, height: f64, sprite_dir: impl Into<String>) -> Self {
        Self {
            width,
            height,
            sprite_dir: sprite_dir.into(),
            background: None,
            elements: Vec::new(),
            path: String::new(),
            fill: Colour::BLACK,
            stroke: Colour::WHITE,
            transform: Affine::IDENTITY,
        }
    }

    pub fn set_background(&mut self, colour: Option<Colour>) {
        self.background = colour;
    }

    /// Number of recorded shapes and images.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn finish(&self) -> String {
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        );
        if let Some(background) = self.background {
            out.push_str(&format!(
                "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
                background
            ));
        }
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    fn push_point(&mut self, command: char, x: f64, y: f64) {
        let (x, y) = self.transform.apply(x, y);
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push_str(&format!("{} {:.3} {:.3}", command, x, y));
    }
}

impl DrawSurface for SvgSurface {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push_point('M', x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        let (c1x, c1y) = self.transform.apply(cp1x, cp1y);
        let (c2x, c2y) = self.transform.apply(cp2x, cp2y);
        let (ex, ey) = self.transform.apply(x, y);
        self.path.push_str(&format!(
            " C {:.3} {:.3} {:.3} {:.3} {:.3} {:.3}",
            c1x, c1y, c2x, c2y, ex, ey
        ));
    }

    /// Clockwise arc with canvas semantics: a line joins the current point
    /// to the arc start, and sweeps of a full turn or more draw a circle.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let raw = end_angle - start_angle;
        let sweep = if raw >= 2.0 * PI {
            2.0 * PI
        } else {
            raw.rem_euclid(2.0 * PI)
        };

        let start = (x + radius * start_angle.cos(), y + radius * start_angle.sin());
        let command = if self.path.is_empty() { 'M' } else { 'L' };
        self.push_point(command, start.0, start.1);

        // SVG arcs of a half turn or more are ambiguous, so split.
        let segments = (sweep / PI).floor() as usize + 1;
        let step = sweep / segments as f64;
        for i in 1..=segments {
            let angle = start_angle + step * i as f64;
            let (ex, ey) = self
                .transform
                .apply(x + radius * angle.cos(), y + radius * angle.sin());
            self.path.push_str(&format!(
                " A {r:.3} {r:.3} 0 0 1 {:.3} {:.3}",
                ex,
                ey,
                r = radius
            ));
        }
    }

    fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements
            .push(format!("<path d=\"{} Z\" fill=\"{}\"/>", self.path, self.fill));
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\"/>",
            self.path, self.stroke
        ));
    }

    fn fill_colour(&self) -> Colour {
        self.fill
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        self.fill = colour;
    }

    fn set_stroke_colour(&mut self, colour: Colour) {
        self.stroke = colour;
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform.translate(x, y);
    }

    fn rotate(&mut self, angle: f64) {
        self.transform.rotate(angle);
    }

    fn draw_image(&mut self, kind: SpriteKind, x: f64, y: f64, width: f64, height: f64) {
        let t = self.transform;
        let href = if self.sprite_dir.is_empty() {
            kind.file_name().to_string()
        } else {
            format!("{}/{}", self.sprite_dir.trim_end_matches('/'), kind.file_name())
        };
        self.elements.push(format!(
            "<image href=\"{}\" x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" transform=\"matrix({:.5} {:.5} {:.5} {:.5} {:.3} {:.3})\"/>",
            href, x, y, width, height, t.a, t.b, t.c, t.d, t.e, t.f
        ));
    }
}
