use koi_core::params::ParamValue;
use koi_core::{Colour, FlockSimulation, Viewport};
use koi_shared::{PondSettings, PondStatus};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

mod canvas;

use canvas::{CanvasSurface, SpriteImages};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A koi pond on an HTML canvas. The page drives it by calling `frame`
/// once per animation frame.
#[wasm_bindgen]
pub struct KoiPond {
    flock: FlockSimulation,
    settings: PondSettings,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    background: Colour,
    frames: u64,
}

impl KoiPond {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }
}

#[wasm_bindgen]
impl KoiPond {
    /// Binds to the canvas with id `canvas_id` and starts loading sprites
    /// from `sprite_path`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, sprite_path: &str) -> Result<KoiPond, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let images = SpriteImages::load(sprite_path)?;
        let settings = PondSettings::default();
        console_log!(
            "Initializing koi pond with {} koi on a {}x{} canvas",
            settings.count,
            canvas.width(),
            canvas.height()
        );

        Ok(KoiPond {
            flock: FlockSimulation::new(),
            settings,
            surface: CanvasSurface::new(context, images),
            canvas,
            background: Colour::BLACK,
            frames: 0,
        })
    }

    /// Clears the canvas, steps every koi by `dt` seconds and draws them.
    pub fn frame(&mut self, dt: f64) {
        let viewport = self.viewport();
        self.surface
            .clear(self.background, viewport.width, viewport.height);
        let sprites = self.surface.sprites();
        self.flock
            .frame(dt, &self.settings, &mut self.surface, viewport, &sprites);
        self.frames += 1;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        console_log!("Resized to {}x{}", width, height);
    }

    /// Replaces all settings from a JSON document.
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.settings = PondSettings::from_json(json).map_err(js_error)?;
        Ok(())
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.settings.to_json().map_err(js_error)
    }

    pub fn set_number(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        self.settings
            .set_param(name, ParamValue::Number(value))
            .map_err(js_error)
    }

    pub fn set_text(&mut self, name: &str, value: &str) -> Result<(), JsValue> {
        self.settings
            .set_param(name, ParamValue::Text(value))
            .map_err(js_error)
    }

    pub fn set_background(&mut self, colour: &str) -> Result<(), JsValue> {
        self.background = colour.parse().map_err(js_error)?;
        Ok(())
    }

    /// Drops a koi at canvas pixel `(x, y)` swimming in a random direction.
    pub fn add_koi_at(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        let viewport = self.viewport();
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Ok(());
        }
        self.settings
            .set_param(
                koi_core::params::COUNT,
                ParamValue::Number((self.flock.len() + 1) as f64),
            )
            .map_err(js_error)?;
        let direction = js_sys::Math::random() * 2.0 * std::f64::consts::PI;
        self.flock
            .spawn_at(x / viewport.width, y / viewport.height, direction);
        console_log!(
            "Added koi at ({}, {}). Total koi: {}",
            x,
            y,
            self.flock.len()
        );
        Ok(())
    }

    pub fn koi_count(&self) -> usize {
        self.flock.len()
    }

    pub fn status_json(&self) -> Result<String, JsValue> {
        let status = PondStatus::from_flock(&self.flock, self.frames);
        status.to_json().map_err(js_error)
    }
}
