use koi_core::{Colour, DrawSurface, Sprite, SpriteKind, SpriteSheet};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Fin and tail images, loaded by the browser in the background.
pub struct SpriteImages {
    fin_left: HtmlImageElement,
    fin_right: HtmlImageElement,
    tail: HtmlImageElement,
}

impl SpriteImages {
    /// Starts loading every sprite from `base_path`.
    pub fn load(base_path: &str) -> Result<Self, JsValue> {
        let base = base_path.trim_end_matches('/');
        let start = |kind: SpriteKind| -> Result<HtmlImageElement, JsValue> {
            let img = HtmlImageElement::new()?;
            img.set_src(&format!("{}/{}", base, kind.file_name()));
            Ok(img)
        };

        Ok(Self {
            fin_left: start(SpriteKind::FinLeft)?,
            fin_right: start(SpriteKind::FinRight)?,
            tail: start(SpriteKind::Tail)?,
        })
    }

    pub fn element(&self, kind: SpriteKind) -> &HtmlImageElement {
        match kind {
            SpriteKind::FinLeft => &self.fin_left,
            SpriteKind::FinRight => &self.fin_right,
            SpriteKind::Tail => &self.tail,
        }
    }

    /// Current load state. An image counts as loaded once it has decoded to
    /// a non-empty size.
    pub fn sheet(&self) -> SpriteSheet {
        let mut sheet = SpriteSheet::default();
        for kind in SpriteKind::ALL {
            let img = self.element(kind);
            *sheet.get_mut(kind) = Sprite {
                width: img.natural_width() as f64,
                height: img.natural_height() as f64,
                loaded: img.complete() && img.natural_width() > 0,
            };
        }
        sheet
    }
}

/// [`DrawSurface`] over a 2D canvas context. Canvas errors are dropped: a
/// missed draw call only costs one frame.
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    images: SpriteImages,
    fill: Colour,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d, images: SpriteImages) -> Self {
        let mut surface = Self {
            context,
            images,
            fill: Colour::BLACK,
        };
        surface.set_fill_colour(Colour::BLACK);
        surface.set_stroke_colour(Colour::WHITE);
        surface
    }

    pub fn sprites(&self) -> SpriteSheet {
        self.images.sheet()
    }

    pub fn clear(&mut self, background: Colour, width: f64, height: f64) {
        let previous = self.fill;
        self.set_fill_colour(background);
        self.context.fill_rect(0.0, 0.0, width, height);
        self.set_fill_colour(previous);
    }
}

impl DrawSurface for CanvasSurface {
    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.context.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let _ = self.context.arc(x, y, radius, start_angle, end_angle);
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill_colour(&self) -> Colour {
        self.fill
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        self.fill = colour;
        self.context.set_fill_style_str(&colour.to_string());
    }

    fn set_stroke_colour(&mut self, colour: Colour) {
        self.context.set_stroke_style_str(&colour.to_string());
    }

    fn translate(&mut self, x: f64, y: f64) {
        let _ = self.context.translate(x, y);
    }

    fn rotate(&mut self, angle: f64) {
        let _ = self.context.rotate(angle);
    }

    fn draw_image(&mut self, kind: SpriteKind, x: f64, y: f64, width: f64, height: f64) {
        let img = self.images.element(kind);
        let _ = self
            .context
            .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, width, height);
    }
}
