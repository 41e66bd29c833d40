//! Geometry shared between the layout collaborator and native backends.

use serde::{Deserialize, Serialize};

/// Frame rectangle in host layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same size, anchored at the origin. Native layers are positioned
    /// relative to their parent view, so they take the bounds rather than the
    /// frame.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Pixel dimensions of a decoded video track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub const ZERO: VideoSize = VideoSize {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A size counts as discovered once both dimensions are known.
    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Applies a track's preferred transform to its natural size.
    ///
    /// Rotated tracks report a natural size in storage orientation; the
    /// transformed size is what the viewer sees. Negative components produced
    /// by rotation are folded back to magnitudes.
    pub fn from_natural(width: f64, height: f64, transform: &Transform) -> Self {
        let w = transform.a * width + transform.c * height;
        let h = transform.b * width + transform.d * height;
        Self::new(w.abs().round() as u32, h.abs().round() as u32)
    }
}

/// Affine transform in the `[a b; c d]` + translation convention used by
/// native track metadata. Translation never affects a size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Quarter-turn rotation, as recorded for portrait phone footage.
    pub const ROTATE_90: Transform = Transform {
        a: 0.0,
        b: 1.0,
        c: -1.0,
        d: 0.0,
        tx: 0.0,
        ty: 0.0,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
