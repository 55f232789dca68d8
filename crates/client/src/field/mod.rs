// Worm registry: owns every live worm plus the surface they draw on
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use protocol::{Position, WormId};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::ViewportConfig;
use crate::error::FlowError;
use crate::surface::{Color, Surface};
use crate::worm::Worm;

/// Upper bound of each random color channel. Keeps worms readable on a
/// white board.
const COLOR_CHANNEL_MAX: u8 = 200;

/// Id → worm mapping plus the shared viewport.
///
/// Constructed once at startup and passed by reference to the router and the
/// render loop.
pub struct Field<S: Surface> {
    surface: S,
    config: ViewportConfig,
    worms: HashMap<WormId, Worm<S::Handle>>,
    rng: SmallRng,
    next_serial: u64,
    grid_visible: bool,
}

impl<S: Surface> Field<S> {
    pub fn new(mut surface: S, config: ViewportConfig, seed: u64) -> Self {
        let (width, height) = config.stage_size();
        surface.set_stage_size(width, height);

        Self {
            surface,
            config,
            worms: HashMap::new(),
            rng: SmallRng::seed_from_u64(seed),
            next_serial: 0,
            grid_visible: false,
        }
    }

    /// Existing worm for `id`, or a new empty one. There is no separate spawn
    /// command: the first MOVE creates the worm.
    pub fn resolve(&mut self, id: &WormId) -> &mut Worm<S::Handle> {
        Self::resolve_in(&mut self.worms, &mut self.rng, &mut self.next_serial, id)
    }

    /// `resolve` over the registry fields only, so callers can keep the
    /// surface borrowed alongside the worm.
    fn resolve_in<'a>(
        worms: &'a mut HashMap<WormId, Worm<S::Handle>>,
        rng: &mut SmallRng,
        next_serial: &mut u64,
        id: &WormId,
    ) -> &'a mut Worm<S::Handle> {
        let total = worms.len() + 1;
        match worms.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let color = Color::new(
                    rng.random_range(0..=COLOR_CHANNEL_MAX),
                    rng.random_range(0..=COLOR_CHANNEL_MAX),
                    rng.random_range(0..=COLOR_CHANNEL_MAX),
                );
                *next_serial += 1;
                info!("new worm: {} - total worms: {}", id, total);
                entry.insert(Worm::new(id.clone(), *next_serial, color))
            }
        }
    }

    /// Resolve `id` and re-derive its segments from `positions`.
    ///
    /// Returns the worm's segment pool size after the update.
    pub fn apply_positions(
        &mut self,
        id: &WormId,
        positions: &[Position],
    ) -> Result<usize, FlowError> {
        let cell_size = self.config.cell_size as f32;
        let worm = Self::resolve_in(&mut self.worms, &mut self.rng, &mut self.next_serial, id);
        worm.apply_positions(&mut self.surface, cell_size, positions)?;

        debug!(
            "worm {} moved: {} positions, {} segments",
            id,
            positions.len(),
            worm.segment_count()
        );
        Ok(worm.segment_count())
    }

    /// Release and forget `id`. Returns whether it existed.
    pub fn remove(&mut self, id: &WormId) -> bool {
        match self.worms.remove(id) {
            Some(mut worm) => {
                worm.release(&mut self.surface);
                info!("killed worm: {} - total worms: {}", id, self.worms.len());
                true
            }
            None => {
                debug!("kill for unknown worm {}", id);
                false
            }
        }
    }

    /// Swap the viewport. Existing worms pick up the new cell size on their
    /// next update; nothing is redrawn here.
    ///
    /// Returns whether the cell size changed.
    pub fn reconfigure(&mut self, config: ViewportConfig) -> bool {
        if config == self.config {
            return false;
        }

        let resized = config.cell_size != self.config.cell_size;
        self.config = config;
        let (width, height) = config.stage_size();
        self.surface.set_stage_size(width, height);
        if self.grid_visible {
            self.push_grid();
        }

        if resized {
            info!("cell size is now {}", config.cell_size);
        }
        resized
    }

    /// Flip the grid overlay. Returns the new visibility.
    pub fn toggle_grid(&mut self) -> bool {
        let visible = !self.grid_visible;
        self.set_grid_visible(visible);
        visible
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid_visible = visible;
        self.push_grid();
        self.surface.request_redraw();
    }

    fn push_grid(&mut self) {
        self.surface.set_grid(
            self.grid_visible,
            self.config.cell_size as f32,
            self.config.cols,
            self.config.rows,
        );
    }

    /// Release every worm.
    pub fn shutdown(&mut self) {
        let count = self.worms.len();
        for (_, mut worm) in self.worms.drain() {
            worm.release(&mut self.surface);
        }
        if count > 0 {
            info!("released {} worms", count);
        }
    }

    pub fn len(&self) -> usize {
        self.worms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worms.is_empty()
    }

    pub fn contains(&self, id: &WormId) -> bool {
        self.worms.contains_key(id)
    }

    pub fn get(&self, id: &WormId) -> Option<&Worm<S::Handle>> {
        self.worms.get(id)
    }

    pub fn worms(&self) -> impl Iterator<Item = &Worm<S::Handle>> {
        self.worms.values()
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
