//! Surface-style native backend.
//!
//! Models platforms where the decoder and the rendering surface have separate
//! lifecycles: the decoder (`MediaPlayer`-like) is created with the view, while
//! the surface is created and destroyed by the OS windowing system whenever
//! the view is attached, detached, or backgrounded.
//!
//! Native implementations translate their callbacks into [`SurfaceSignal`]s
//! and emit them through the listener registered with `set_listener`. Calls on
//! these traits always arrive on the UI-affine context.

use std::time::Duration;

use crate::{error::Result, geometry::Rect, geometry::VideoSize, signal::SignalSink};

/// Opaque reference to a native surface, passed to the decoder as its display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// How decoded frames are fitted into the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Letterbox; the whole frame stays visible.
    ScaleToFit,
    /// Fill the surface, cropping whatever overflows.
    #[default]
    ScaleToFitWithCropping,
}

/// Callbacks from the decoder and the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSignal {
    /// Asynchronous prepare finished; the source is decodable.
    Prepared,
    /// Playback reached the end of the stream.
    Completed,
    /// Track geometry became available or changed.
    VideoSizeChanged(VideoSize),
    /// The OS created the rendering surface. `valid` is false when the
    /// surface object exists but cannot be drawn into yet.
    SurfaceCreated { valid: bool },
    /// Surface format or size changed.
    SurfaceChanged { width: u32, height: u32 },
    /// The OS destroyed the rendering surface.
    SurfaceDestroyed,
}

/// Native decoder with a separately attached display surface.
pub trait SurfaceDecoder: Send {
    /// Register (`Some`) or unregister (`None`) the callback listener.
    fn set_listener(&mut self, listener: Option<SignalSink<SurfaceSignal>>);

    /// Route decoded frames to `surface`.
    fn attach_display(&mut self, surface: SurfaceHandle) -> Result<()>;

    /// Return to the idle native state, dropping any data source.
    fn reset(&mut self) -> Result<()>;

    /// Assign the source URI. Only valid right after [`reset`](Self::reset).
    fn set_data_source(&mut self, uri: &str) -> Result<()>;

    /// Start preparing the source without blocking; completion arrives as
    /// [`SurfaceSignal::Prepared`].
    fn prepare_async(&mut self) -> Result<()>;

    fn set_scaling_mode(&mut self, mode: ScalingMode) -> Result<()>;

    fn set_looping(&mut self, looping: bool) -> Result<()>;

    fn start(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn seek_to(&mut self, position: Duration) -> Result<()>;

    fn is_playing(&self) -> bool;

    /// Free the native decoder. No other call is valid afterwards.
    fn release(&mut self);
}

/// Native rendering surface owned by the player view.
pub trait RenderSurface: Send {
    /// Register (`Some`) or unregister (`None`) the lifecycle listener.
    fn set_listener(&mut self, listener: Option<SignalSink<SurfaceSignal>>);

    fn handle(&self) -> SurfaceHandle;

    /// Keep the surface aligned with the player view's frame.
    fn set_frame(&mut self, frame: Rect);

    /// Release the current OS surface object after it was destroyed. The view
    /// stays attached and may receive a new surface later.
    fn release_surface(&mut self);

    /// Remove the surface view for good.
    fn detach(&mut self);
}
