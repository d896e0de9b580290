//! Headless koi pond: runs the flock for a number of frames and renders the
//! last one to SVG.

use std::path::Path;

use koi_core::{Colour, FlockSimulation, Sprite, SpriteKind, SpriteSheet, Viewport};
use koi_shared::{PondSettings, PondStatus};
use serde::Serialize;

pub mod svg;

pub use svg::SvgSurface;

/// How long to run and what to render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub frames: u64,
    pub dt: f64,
    pub width: f64,
    pub height: f64,
    /// Seed for spawning. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Log a status line every this many frames. 0 disables it.
    pub log_every: u64,
    pub background: Colour,
    /// Directory the SVG refers to for sprite images.
    pub sprite_dir: String,
    pub sprites: SpriteSheet,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            frames: 600,
            dt: 1.0 / 60.0,
            width: 800.0,
            height: 600.0,
            seed: None,
            log_every: 100,
            background: Colour::BLACK,
            sprite_dir: String::new(),
            sprites: SpriteSheet::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub settings: PondSettings,
    pub status: PondStatus,
    pub svg_elements: usize,
}

/// Reads sprite sizes from `dir`. A sprite that cannot be read stays
/// pending, so the koi are drawn without it.
pub fn load_sprites(dir: &Path) -> SpriteSheet {
    let mut sheet = SpriteSheet::default();
    for kind in SpriteKind::ALL {
        let path = dir.join(kind.file_name());
        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                log::debug!("loaded {} ({}x{})", path.display(), width, height);
                *sheet.get_mut(kind) = Sprite::loaded(width as f64, height as f64);
            }
            Err(e) => log::warn!("sprite {} unavailable: {}", path.display(), e),
        }
    }
    sheet
}

/// Runs `options.frames` frames of the pond described by `settings` and
/// draws the final one. With zero frames the freshly spawned pond is drawn.
pub fn render(settings: &PondSettings, options: &RenderOptions) -> (SvgSurface, RenderReport) {
    let viewport = Viewport::new(options.width, options.height);
    let params = settings.flock_params();
    let mut flock = match options.seed {
        Some(seed) => FlockSimulation::seeded(seed),
        None => FlockSimulation::new(),
    };
    flock.resize(params.count);
    log::info!(
        "rendering {} koi for {} frames on a {}x{} pond",
        flock.len(),
        options.frames,
        options.width,
        options.height
    );

    let steering = params.steering(viewport.aspect_ratio());
    let warmup = options.frames.saturating_sub(1);
    for frame in 1..=warmup {
        flock.update(options.dt, &steering);
        if options.log_every > 0 && frame % options.log_every == 0 {
            log_status(&flock, frame);
        }
    }

    let mut surface = SvgSurface::new(options.width, options.height, options.sprite_dir.clone());
    surface.set_background(Some(options.background));
    if options.frames == 0 {
        flock.draw(&mut surface, viewport, &params, &options.sprites);
    } else {
        flock.frame(options.dt, settings, &mut surface, viewport, &options.sprites);
    }

    let status = PondStatus::from_flock(&flock, options.frames);
    let report = RenderReport {
        settings: settings.clone(),
        status,
        svg_elements: surface.element_count(),
    };
    (surface, report)
}

fn log_status(flock: &FlockSimulation, frame: u64) {
    let status = PondStatus::from_flock(flock, frame);
    match status.centroid {
        Some([x, y]) => log::info!(
            "frame {}: {} koi, centroid ({:.3}, {:.3}), polarisation {:.3}",
            frame,
            status.koi_count,
            x,
            y,
            status.polarisation
        ),
        None => log::info!("frame {}: empty pond", frame),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sprites_stay_pending() {
        let sheet = load_sprites(Path::new("/nonexistent/koi-sprites"));
        for kind in SpriteKind::ALL {
            assert!(sheet.ready(kind).is_none());
        }
    }

    #[test]
    fn test_zero_frames_draws_spawned_pond() {
        let mut settings = PondSettings::default();
        settings.count = 2;
        let options = RenderOptions {
            frames: 0,
            seed: Some(3),
            ..RenderOptions::default()
        };
        let (_, report) = render(&settings, &options);
        assert_eq!(report.status.koi_count, 2);
        assert_eq!(report.status.frames, 0);
        // Body and two eyes per koi.
        assert_eq!(report.svg_elements, 6);
    }
}
