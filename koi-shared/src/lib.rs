use koi_core::params::{self, BoundaryPolicy, FlockParams, ParamSource, ParamValue};
use koi_core::{Colour, FlockSimulation, Vector2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use koi_core::params::MAX_KOI;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown parameter `{0}`")]
    UnknownParam(String),
    #[error("invalid value for `{name}`: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl SettingsError {
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Pond configuration as the UI and settings files see it.
///
/// Any field missing from JSON takes its default, so a file only needs the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PondSettings {
    pub speed: f64,
    pub wall_detect_radius: f64,
    pub other_detect_radius: f64,
    pub separation: f64,
    pub alignment: f64,
    pub cohesion: f64,
    pub scale: f64,
    pub body_colour: String,
    pub count: usize,
    pub boundary: String,
}

impl Default for PondSettings {
    fn default() -> Self {
        let defaults = FlockParams::default();
        Self {
            speed: defaults.speed,
            wall_detect_radius: defaults.wall_detect_radius,
            other_detect_radius: defaults.other_detect_radius,
            separation: defaults.separation,
            alignment: defaults.alignment,
            cohesion: defaults.cohesion,
            scale: defaults.scale,
            body_colour: defaults.body_colour.to_string(),
            count: defaults.count,
            boundary: defaults.boundary.name().to_string(),
        }
    }
}

impl PondSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: PondSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every value is something the simulation can run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let non_negative = [
            (params::SPEED, self.speed),
            (params::WALL_DETECT_RADIUS, self.wall_detect_radius),
            (params::OTHER_DETECT_RADIUS, self.other_detect_radius),
            (params::SCALE, self.scale),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::invalid(name, format!("{} must be a non-negative number", value)));
            }
        }

        let weights = [
            (params::SEPARATION, self.separation),
            (params::ALIGNMENT, self.alignment),
            (params::COHESION, self.cohesion),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(SettingsError::invalid(name, "weight must be finite"));
            }
        }

        if self.count > MAX_KOI {
            return Err(SettingsError::invalid(
                params::COUNT,
                format!("at most {} koi are supported, got {}", MAX_KOI, self.count),
            ));
        }
        self.body_colour
            .parse::<Colour>()
            .map_err(|e| SettingsError::invalid(params::BODY_COLOUR, e.to_string()))?;
        self.boundary
            .parse::<BoundaryPolicy>()
            .map_err(|e| SettingsError::invalid(params::BOUNDARY, e.to_string()))?;
        Ok(())
    }

    /// Updates one parameter by name, as a UI control would.
    pub fn set_param(&mut self, name: &str, value: ParamValue<'_>) -> Result<(), SettingsError> {
        let mut updated = self.clone();
        match name {
            params::BODY_COLOUR => {
                updated.body_colour = match value {
                    ParamValue::Colour(colour) => colour.to_string(),
                    _ => text(name, value)?.to_string(),
                };
            }
            params::BOUNDARY => {
                updated.boundary = text(name, value)?.to_string();
            }
            params::COUNT => {
                let n = number(name, value)?;
                if n < 0.0 {
                    return Err(SettingsError::invalid(name, "count cannot be negative"));
                }
                updated.count = n as usize;
            }
            _ => {
                let n = number(name, value)?;
                let field = updated
                    .number_field_mut(name)
                    .ok_or_else(|| SettingsError::UnknownParam(name.to_string()))?;
                *field = n;
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn number_field_mut(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            params::SPEED => Some(&mut self.speed),
            params::WALL_DETECT_RADIUS => Some(&mut self.wall_detect_radius),
            params::OTHER_DETECT_RADIUS => Some(&mut self.other_detect_radius),
            params::SEPARATION => Some(&mut self.separation),
            params::ALIGNMENT => Some(&mut self.alignment),
            params::COHESION => Some(&mut self.cohesion),
            params::SCALE => Some(&mut self.scale),
            _ => None,
        }
    }

    pub fn flock_params(&self) -> FlockParams {
        FlockParams::from_source(self)
    }
}

fn number(name: &str, value: ParamValue<'_>) -> Result<f64, SettingsError> {
    value
        .as_number()
        .ok_or_else(|| SettingsError::invalid(name, "expected a number"))
}

fn text<'a>(name: &str, value: ParamValue<'a>) -> Result<&'a str, SettingsError> {
    value
        .as_text()
        .ok_or_else(|| SettingsError::invalid(name, "expected text"))
}

impl ParamSource for PondSettings {
    fn get_val(&self, name: &str) -> Option<ParamValue<'_>> {
        let value = match name {
            params::SPEED => ParamValue::Number(self.speed),
            params::WALL_DETECT_RADIUS => ParamValue::Number(self.wall_detect_radius),
            params::OTHER_DETECT_RADIUS => ParamValue::Number(self.other_detect_radius),
            params::SEPARATION => ParamValue::Number(self.separation),
            params::ALIGNMENT => ParamValue::Number(self.alignment),
            params::COHESION => ParamValue::Number(self.cohesion),
            params::SCALE => ParamValue::Number(self.scale),
            params::BODY_COLOUR => ParamValue::Text(&self.body_colour),
            params::COUNT => ParamValue::Number(self.count as f64),
            params::BOUNDARY => ParamValue::Text(&self.boundary),
            _ => return None,
        };
        Some(value)
    }
}

/// Snapshot of a running pond for status displays and logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PondStatus {
    pub koi_count: usize,
    pub frames: u64,
    /// Mean normalised position, absent for an empty pond.
    pub centroid: Option<[f64; 2]>,
    /// Length of the mean heading: 1 when everyone swims the same way.
    pub polarisation: f64,
}

impl PondStatus {
    pub fn from_flock(flock: &FlockSimulation, frames: u64) -> Self {
        let count = flock.len();
        if count == 0 {
            return Self {
                koi_count: 0,
                frames,
                centroid: None,
                polarisation: 0.0,
            };
        }

        let mut position_sum = Vector2::zero();
        let mut heading_sum = Vector2::zero();
        for agent in flock.agents() {
            position_sum.add([agent.position()]);
            heading_sum.add([agent.heading()]);
        }
        position_sum.divide([count as f64]);
        heading_sum.divide([count as f64]);

        Self {
            koi_count: count,
            frames,
            centroid: Some([position_sum.x, position_sum.y]),
            polarisation: heading_sum.get_magnitude(),
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }
}
