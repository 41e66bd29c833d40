//! Rendering surface lifecycle, tracked separately from decoder readiness.

use tracing::debug;

/// Where the OS-owned rendering surface is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    NoSurface,
    Created,
    /// Destroyed by the OS, not yet released by the binding.
    Destroyed,
}

/// A load that has to wait for a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub path: String,
}

/// Tracks surface existence and holds at most one load waiting for it.
///
/// Cycle: `NoSurface → Created → Destroyed → NoSurface`. A load requested
/// while no drawable surface exists is kept until the next valid
/// `surface_created`, which hands it back exactly once. A newer request
/// replaces an older one.
#[derive(Debug, Default)]
pub struct SurfaceTracker {
    state: SurfaceState,
    pending: Option<LoadRequest>,
}

impl SurfaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn has_surface(&self) -> bool {
        self.state == SurfaceState::Created
    }

    pub fn pending(&self) -> Option<&LoadRequest> {
        self.pending.as_ref()
    }

    /// Returns `request` back if it can run now, otherwise keeps it.
    pub fn request_load(&mut self, request: LoadRequest) -> Option<LoadRequest> {
        if self.has_surface() {
            return Some(request);
        }
        self.defer(request);
        None
    }

    /// Keeps `request` for the next surface, replacing any older one.
    pub fn defer(&mut self, request: LoadRequest) {
        if self.pending.replace(request).is_some() {
            debug!("Replaced load waiting for a surface");
        }
    }

    /// Records a new surface. A drawable one releases the waiting load.
    pub fn surface_created(&mut self, valid: bool) -> Option<LoadRequest> {
        if !valid {
            self.state = SurfaceState::NoSurface;
            return None;
        }
        self.state = SurfaceState::Created;
        self.pending.take()
    }

    pub fn surface_destroyed(&mut self) {
        self.state = SurfaceState::Destroyed;
    }

    /// The destroyed surface was released; wait for the next one.
    pub fn surface_released(&mut self) {
        if self.state == SurfaceState::Destroyed {
            self.state = SurfaceState::NoSurface;
        }
    }

    pub fn clear(&mut self) {
        self.state = SurfaceState::NoSurface;
        self.pending = None;
    }
}
