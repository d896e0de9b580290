//! Flock drivers: a growable `std` flock and a fixed-capacity one for
//! `no_std` targets. Both run every update against a frame-start snapshot
//! and only then draw.

use crate::agent::{AgentSnapshot, FlockAgent};
use crate::params::{FlockParams, SteeringParams, Viewport};
use crate::surface::{DrawSurface, SpriteSheet};

/// Hands out agent ids in increasing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentIds {
    next: u32,
}

impl AgentIds {
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// A collection of koi for `no_std` environments.
pub struct FixedFlock<const N: usize> {
    pub agents: heapless::Vec<FlockAgent, N>,
    ids: AgentIds,
}

impl<const N: usize> Default for FixedFlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FixedFlock<N> {
    pub fn new() -> Self {
        Self {
            agents: heapless::Vec::new(),
            ids: AgentIds::default(),
        }
    }

    pub fn next_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Adds an agent, handing it back when the flock is full.
    pub fn add_agent(&mut self, agent: FlockAgent) -> Result<(), FlockAgent> {
        self.agents.push(agent)
    }

    pub fn truncate(&mut self, len: usize) {
        self.agents.truncate(len);
    }

    pub fn update(&mut self, dt: f64, params: &SteeringParams) {
        let mut snapshot = heapless::Vec::<AgentSnapshot, N>::new();
        for agent in self.agents.iter() {
            let _ = snapshot.push(agent.snapshot());
        }

        for agent in self.agents.iter_mut() {
            agent.update(dt, &snapshot, params);
        }
    }

    pub fn draw<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        viewport: Viewport,
        params: &FlockParams,
        sprites: &SpriteSheet,
    ) {
        for agent in self.agents.iter_mut() {
            agent.draw(
                surface,
                viewport.width,
                viewport.height,
                params.scale,
                params.body_colour,
                sprites,
            );
        }
    }
}

#[cfg(feature = "std")]
pub use self::growable::FlockSimulation;

#[cfg(feature = "std")]
mod growable {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::params::ParamSource;

    /// A collection of koi for std environments.
    pub struct FlockSimulation {
        agents: Vec<FlockAgent>,
        ids: AgentIds,
        rng: StdRng,
    }

    impl Default for FlockSimulation {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FlockSimulation {
        /// Empty flock with an entropy-seeded spawner.
        pub fn new() -> Self {
            Self::with_rng(StdRng::from_entropy())
        }

        /// Empty flock whose spawns are reproducible from `seed`.
        pub fn seeded(seed: u64) -> Self {
            Self::with_rng(StdRng::seed_from_u64(seed))
        }

        fn with_rng(rng: StdRng) -> Self {
            Self {
                agents: Vec::new(),
                ids: AgentIds::default(),
                rng,
            }
        }

        pub fn with_count(count: usize, seed: u64) -> Self {
            let mut flock = Self::seeded(seed);
            flock.resize(count);
            flock
        }

        pub fn agents(&self) -> &[FlockAgent] {
            &self.agents
        }

        pub fn len(&self) -> usize {
            self.agents.len()
        }

        pub fn is_empty(&self) -> bool {
            self.agents.is_empty()
        }

        /// Restarts id assignment at zero. Only safe once every agent that
        /// holds an old id has been removed.
        pub fn reset_ids(&mut self) {
            self.ids.reset();
        }

        pub fn add_agent(&mut self, agent: FlockAgent) {
            self.agents.push(agent);
        }

        /// Spawns an agent with a fresh id at `(x, y)`.
        pub fn spawn_at(&mut self, x: f64, y: f64, direction: f64) -> u32 {
            let id = self.ids.next_id();
            self.agents.push(FlockAgent::new(id, x, y, direction));
            id
        }

        /// Grows with randomly placed agents or drops agents from the end.
        /// Surviving agents are untouched.
        pub fn resize(&mut self, count: usize) {
            let current = self.agents.len();
            if count == current {
                return;
            }
            if count < current {
                self.agents.truncate(count);
            } else {
                self.agents.reserve(count - current);
                for _ in current..count {
                    let id = self.ids.next_id();
                    self.agents.push(FlockAgent::random(id, &mut self.rng));
                }
            }
            log::debug!("flock resized from {} to {} agents", current, count);
        }

        pub fn snapshot(&self) -> Vec<AgentSnapshot> {
            self.agents.iter().map(FlockAgent::snapshot).collect()
        }

        /// Steps every agent against the positions and headings they all had
        /// at the start of the call.
        pub fn update(&mut self, dt: f64, params: &SteeringParams) {
            let snapshot = self.snapshot();
            for agent in self.agents.iter_mut() {
                agent.update(dt, &snapshot, params);
            }
        }

        pub fn draw<S: DrawSurface + ?Sized>(
            &mut self,
            surface: &mut S,
            viewport: Viewport,
            params: &FlockParams,
            sprites: &SpriteSheet,
        ) {
            for agent in self.agents.iter_mut() {
                agent.draw(
                    surface,
                    viewport.width,
                    viewport.height,
                    params.scale,
                    params.body_colour,
                    sprites,
                );
            }
        }

        /// One full frame: read parameters, resize, update everyone, then
        /// draw everyone. Returns the parameters that were used.
        pub fn frame<P, S>(
            &mut self,
            dt: f64,
            source: &P,
            surface: &mut S,
            viewport: Viewport,
            sprites: &SpriteSheet,
        ) -> FlockParams
        where
            P: ParamSource + ?Sized,
            S: DrawSurface + ?Sized,
        {
            let params = FlockParams::from_source(source);
            self.resize(params.count);
            self.update(dt, &params.steering(viewport.aspect_ratio()));
            self.draw(surface, viewport, &params, sprites);
            params
        }
    }
}
