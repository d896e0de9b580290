#![cfg_attr(not(feature = "std"), no_std)]

//! Flocking koi: Reynolds steering in a normalised pond plus a procedural,
//! undulating fish body that renders onto any [`DrawSurface`].

pub mod agent;
pub mod body;
pub mod flock;
mod math;
pub mod params;
pub mod surface;
pub mod vector;

pub use agent::{AgentSnapshot, FlockAgent};
pub use body::{BodyShape, KoiBody, OutlinePair};
pub use flock::{AgentIds, FixedFlock};
#[cfg(feature = "std")]
pub use flock::FlockSimulation;
pub use params::{BoundaryPolicy, FlockParams, ParamSource, ParamValue, SteeringParams, Viewport};
pub use surface::{Colour, DrawSurface, Sprite, SpriteKind, SpritePlacement, SpriteSheet};
pub use vector::{Operand, ParseVectorError, Vector2};
