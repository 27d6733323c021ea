//! The drawing surface: pointer gestures in, raster strokes out.
//!
//! A [`DrawingSurface`] owns an opaque white [`PixelBuffer`] and interprets
//! a stream of begin/extend/end gesture events under a caller-owned
//! [`ToolConfig`]. The gesture lifecycle is an explicit two-state machine,
//! so a pointer moving without a prior press structurally cannot draw.
//!
//! # Example
//!
//! ```
//! use memvault::canvas::{DrawingSurface, ToolConfig};
//!
//! let mut surface = DrawingSurface::new(800);
//! let tools = ToolConfig::default();
//!
//! surface.begin_gesture((10.0, 10.0), &tools);
//! surface.extend_gesture((10.0, 60.0), &tools);
//! surface.end_gesture();
//!
//! let uri = surface.export_data_uri().unwrap();
//! assert!(uri.starts_with("data:image/png;base64,"));
//! ```

pub mod raster;
pub mod snapshot;

pub use raster::{PixelBuffer, Rgb};
pub use snapshot::Snapshot;

use crate::Result;

/// Fixed buffer height; only the width tracks the containing layout box.
pub const CANVAS_HEIGHT: u32 = 500;

/// The eraser paints this many times wider than the configured brush size.
const ERASER_WIDTH_FACTOR: u32 = 4;

/// Drawing tools. Pen and brush differ only in how a shell presents them;
/// the eraser is opaque-white paint at four times the width, never a
/// transparency operation (the buffer has no alpha channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pen,
    Brush,
    Eraser,
}

/// Current drawing parameters, owned by the enclosing UI state.
///
/// The surface reads this on every stroke segment rather than snapshotting
/// it at gesture start, so changing color or size mid-stroke takes effect
/// on the next segment.
#[derive(Debug, Clone, Copy)]
pub struct ToolConfig {
    pub tool: Tool,
    pub color: Rgb,
    /// Logical brush diameter in buffer pixels. Must be positive.
    pub size: u32,
}

impl ToolConfig {
    /// Effective (width, color) for the next segment.
    fn resolve(&self) -> (u32, Rgb) {
        match self.tool {
            Tool::Eraser => (self.size * ERASER_WIDTH_FACTOR, Rgb::WHITE),
            Tool::Pen | Tool::Brush => (self.size, self.color),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            tool: Tool::Pen,
            color: Rgb(0x4c, 0x9a, 0xff),
            size: 8,
        }
    }
}

/// Per-gesture state. `Drawing` carries the previous buffer-local point so
/// each extend renders exactly one fresh segment.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StrokeState {
    Idle,
    Drawing { last: (f32, f32) },
}

/// An interactive raster canvas.
///
/// All operations are infallible except export and resize, which encode or
/// decode PNG data. There is no locking: the surface is a plain owned value
/// driven from a single logical thread of control.
#[derive(Debug)]
pub struct DrawingSurface {
    buffer: PixelBuffer,
    /// On-screen top-left of the buffer in viewport coordinates.
    origin: (f32, f32),
    stroke: StrokeState,
}

impl DrawingSurface {
    /// Allocate the buffer at the container's width and fill it opaque
    /// white. Height is fixed at [`CANVAS_HEIGHT`].
    pub fn new(container_width: u32) -> Self {
        DrawingSurface {
            buffer: PixelBuffer::filled(container_width, CANVAS_HEIGHT, Rgb::WHITE),
            origin: (0.0, 0.0),
            stroke: StrokeState::Idle,
        }
    }

    /// Record the buffer's on-screen offset; pointer coordinates are mapped
    /// to buffer-local space by subtracting it.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin = (x, y);
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// True while a gesture is active.
    pub fn is_drawing(&self) -> bool {
        matches!(self.stroke, StrokeState::Drawing { .. })
    }

    fn to_local(&self, viewport: (f32, f32)) -> (f32, f32) {
        (viewport.0 - self.origin.0, viewport.1 - self.origin.1)
    }

    /// Begin a gesture at a viewport point (pointer-down / touch-start).
    ///
    /// The point is sampled immediately and rendered as a zero-length
    /// segment, so a tap leaves a visible dot rather than being a no-op.
    /// A gesture always begins successfully.
    pub fn begin_gesture(&mut self, viewport: (f32, f32), tools: &ToolConfig) {
        let p = self.to_local(viewport);
        self.stroke = StrokeState::Drawing { last: p };
        let (width, color) = tools.resolve();
        raster::stroke_segment(&mut self.buffer, p, p, width, color);
    }

    /// Extend the active gesture to a new viewport point (pointer-move /
    /// touch-move).
    ///
    /// A no-op while idle: pointer motion without a prior press must not
    /// draw. While drawing, renders one segment from the previous point
    /// under the *current* tool configuration, then advances the point.
    pub fn extend_gesture(&mut self, viewport: (f32, f32), tools: &ToolConfig) {
        let last = match self.stroke {
            StrokeState::Idle => return,
            StrokeState::Drawing { last } => last,
        };
        let p = self.to_local(viewport);
        let (width, color) = tools.resolve();
        raster::stroke_segment(&mut self.buffer, last, p, width, color);
        self.stroke = StrokeState::Drawing { last: p };
    }

    /// End the gesture (pointer-up / pointer-leave / touch-end). The next
    /// begin starts a fresh, disconnected path. Idempotent; never mutates
    /// the buffer.
    pub fn end_gesture(&mut self) {
        self.stroke = StrokeState::Idle;
    }

    /// Fill the buffer opaque white, discarding all strokes. Idempotent.
    pub fn reset(&mut self) {
        self.buffer.fill(Rgb::WHITE);
    }

    /// Capture the buffer's current contents as a PNG snapshot. Pure; may
    /// be called at any time.
    pub fn export(&self) -> Result<Snapshot> {
        Snapshot::capture(&self.buffer)
    }

    /// [`DrawingSurface::export`] packed as a base64 data URI, the form
    /// persisted in a memory record's `imageUrl`.
    pub fn export_data_uri(&self) -> Result<String> {
        Ok(self.export()?.to_data_uri())
    }

    /// Reallocate the buffer at a new container width, preserving contents.
    ///
    /// The current contents are exported to a snapshot, the buffer is
    /// reallocated white at the new width, and the returned
    /// [`PendingRestore`] composites the snapshot back at the origin when
    /// completed. Restoring is a separate step by contract: it stands in
    /// for an asynchronous image decode, and strokes drawn between resize
    /// and completion are overwritten by the restore.
    #[must_use = "the old contents reappear only when the PendingRestore completes"]
    pub fn resize(&mut self, container_width: u32) -> Result<PendingRestore> {
        let snapshot = self.export()?;
        tracing::debug!(
            from = self.buffer.width(),
            to = container_width,
            "resizing drawing surface"
        );
        self.buffer = PixelBuffer::filled(container_width, CANVAS_HEIGHT, Rgb::WHITE);
        Ok(PendingRestore { snapshot })
    }
}

/// The deferred half of [`DrawingSurface::resize`].
#[derive(Debug)]
pub struct PendingRestore {
    snapshot: Snapshot,
}

impl PendingRestore {
    /// Decode the snapshot and composite it onto the surface at (0,0),
    /// clipped to the current bounds.
    pub fn complete(self, surface: &mut DrawingSurface) -> Result<()> {
        self.snapshot.composite_onto(&mut surface.buffer)
    }
}
