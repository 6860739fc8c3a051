//! Interactive crop session.
//!
//! A [`CropSession`] owns the viewport, the crop rectangle and the history
//! for one editing session. UI layers drive it with discrete commands:
//!
//! ```text
//! layout(container)           first call creates the default crop
//! begin_resize(handle)        anchor the crop rectangle
//! update_drag(translation)    cumulative translation since begin
//! end_gesture()               commit a snapshot
//! undo() / redo()
//! ```
//!
//! Every update is computed from the state captured by the `begin_*` call
//! and the cumulative gesture amount, never from the previous update.
//!
//! The session is single-owner and not meant to be shared across threads.

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::error::CropError;
use crate::geometry::{Point, Rect, Size};
use crate::handles::{self, CropHandle, DEFAULT_MIN_SIDE};
use crate::history::{History, Snapshot};
use crate::process::CropRequest;
use crate::transform::OutOfBoundsPolicy;
use crate::viewport::{ViewportState, MAX_SCALE, MIN_SCALE};

/// Tuning for an interactive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum crop side length in container units.
    pub min_side: f64,
    /// Smallest zoom factor.
    pub min_scale: f64,
    /// Largest zoom factor.
    pub max_scale: f64,
    /// Side of the initial square crop, as a fraction of the shorter side
    /// of the display frame.
    pub initial_crop_fraction: f64,
    pub policy: OutOfBoundsPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_side: DEFAULT_MIN_SIDE,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            initial_crop_fraction: 0.6,
            policy: OutOfBoundsPolicy::Clamp,
        }
    }
}

impl SessionConfig {
    /// Check that every value is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns `CropError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), CropError> {
        let invalid = |message: &str| Err(CropError::InvalidConfig(message.to_string()));
        if !(self.min_side.is_finite() && self.min_side > 0.0) {
            return invalid("min_side must be positive");
        }
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return invalid("min_scale must be positive");
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            return invalid("max_scale must be at least min_scale");
        }
        if !(self.initial_crop_fraction > 0.0 && self.initial_crop_fraction <= 1.0) {
            return invalid("initial_crop_fraction must be in (0, 1]");
        }
        Ok(())
    }
}

/// An in-progress gesture and the state it started from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Resize { handle: CropHandle, base: Rect },
    Move { base: Rect },
    Pan { base: ViewportState },
    Zoom { base: ViewportState },
}

/// Viewport, crop rectangle and history for one editing session.
#[derive(Debug, Clone)]
pub struct CropSession {
    config: SessionConfig,
    image_size: Size,
    container: Option<Size>,
    viewport: ViewportState,
    crop: Option<Rect>,
    history: History<Snapshot>,
    gesture: Option<Gesture>,
}

impl CropSession {
    /// Start a session for an image displayed at `image_size` (upright).
    ///
    /// # Errors
    ///
    /// Returns `CropError::EmptyImage` if the size has no extent and
    /// `CropError::InvalidConfig` if `config` fails validation.
    pub fn new(image_size: Size, config: SessionConfig) -> Result<Self, CropError> {
        if image_size.is_empty() {
            return Err(CropError::EmptyImage);
        }
        config.validate()?;
        Ok(Self {
            config,
            image_size,
            container: None,
            viewport: ViewportState::default(),
            crop: None,
            history: History::new(),
            gesture: None,
        })
    }

    /// Start a session for `image`, using its upright dimensions.
    pub fn for_bitmap(image: &Bitmap, config: SessionConfig) -> Result<Self, CropError> {
        Self::new(image.upright_size(), config)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn policy(&self) -> OutOfBoundsPolicy {
        self.config.policy
    }

    /// Change the out-of-bounds policy. Takes effect on the next gesture.
    pub fn set_policy(&mut self, policy: OutOfBoundsPolicy) {
        self.config.policy = policy;
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn container(&self) -> Option<Size> {
        self.container
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// Crop rectangle in container coordinates, once laid out.
    pub fn crop(&self) -> Option<Rect> {
        self.crop
    }

    pub fn gesture(&self) -> Option<Gesture> {
        self.gesture
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Rectangle the image currently occupies in the container.
    pub fn display_frame(&self) -> Option<Rect> {
        self.container
            .map(|container| self.viewport.frame(self.image_size, container))
    }

    /// Bounds that resizes are confined to, `None` under the pad policy.
    fn bounds(&self) -> Option<Rect> {
        match self.config.policy {
            OutOfBoundsPolicy::Clamp => self.display_frame(),
            OutOfBoundsPolicy::Pad => None,
        }
    }

    /// Record the container size.
    ///
    /// The first call creates the default centered crop and the initial
    /// history entry. Later calls keep the current state, re-confining the
    /// crop under the clamp policy.
    ///
    /// # Errors
    ///
    /// Returns `CropError::DegenerateFrame` if the container has no extent.
    pub fn layout(&mut self, container: Size) -> Result<(), CropError> {
        if container.is_empty() {
            return Err(CropError::DegenerateFrame);
        }
        self.container = Some(container);

        match self.crop {
            None => {
                self.reset_state();
                tracing::debug!(
                    width = container.width,
                    height = container.height,
                    "Session laid out"
                );
            }
            Some(crop) if self.gesture.is_none() => {
                if let Some(bounds) = self.bounds() {
                    self.crop = Some(handles::confine(&crop, &bounds, self.config.min_side));
                }
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Restore the default viewport and crop and commit a snapshot unless
    /// the state already matches the current one.
    pub fn reset(&mut self) -> bool {
        if self.container.is_none() {
            return false;
        }
        self.gesture = None;
        self.reset_state();
        true
    }

    fn reset_state(&mut self) {
        self.viewport = ViewportState::default();
        if let Some(frame) = self.display_frame() {
            self.crop = Some(handles::default_crop(
                &frame,
                self.config.initial_crop_fraction,
                self.config.min_side,
            ));
            self.commit();
        }
    }

    /// Start dragging a resize handle. Returns false before layout.
    pub fn begin_resize(&mut self, handle: CropHandle) -> bool {
        self.begin(|session| session.crop.map(|base| Gesture::Resize { handle, base }))
    }

    /// Start moving the whole crop rectangle. Returns false before layout.
    pub fn begin_move(&mut self) -> bool {
        self.begin(|session| session.crop.map(|base| Gesture::Move { base }))
    }

    /// Start panning the image. Returns false before layout.
    pub fn begin_pan(&mut self) -> bool {
        self.begin(|session| {
            session
                .crop
                .map(|_| Gesture::Pan { base: session.viewport })
        })
    }

    /// Start a pinch zoom. Returns false before layout.
    pub fn begin_zoom(&mut self) -> bool {
        self.begin(|session| {
            session
                .crop
                .map(|_| Gesture::Zoom { base: session.viewport })
        })
    }

    fn begin(&mut self, anchor: impl FnOnce(&Self) -> Option<Gesture>) -> bool {
        if self.gesture.is_some() {
            self.end_gesture();
        }
        self.gesture = anchor(self);
        self.gesture.is_some()
    }

    /// Apply the cumulative translation since the gesture began.
    ///
    /// Ignored for zoom gestures and when no gesture is active.
    pub fn update_drag(&mut self, translation: Point) {
        let bounds = self.bounds();
        let min_side = self.config.min_side;
        match self.gesture {
            Some(Gesture::Resize { handle, base }) => {
                self.crop = Some(handles::resize(
                    &base,
                    handle,
                    translation,
                    bounds.as_ref(),
                    min_side,
                ));
            }
            Some(Gesture::Move { base }) => {
                self.crop = Some(handles::translate(&base, translation, bounds.as_ref(), min_side));
            }
            Some(Gesture::Pan { base }) => {
                self.viewport = ViewportState::panned(&base, translation);
            }
            Some(Gesture::Zoom { .. }) | None => {}
        }
    }

    /// Apply the cumulative pinch magnification since the gesture began.
    ///
    /// Ignored unless a zoom gesture is active.
    pub fn update_zoom(&mut self, magnification: f64) {
        if let Some(Gesture::Zoom { base }) = self.gesture {
            self.viewport = ViewportState::zoomed(
                &base,
                magnification,
                self.config.min_scale,
                self.config.max_scale,
            );
        }
    }

    /// Finish the active gesture, committing a snapshot if anything changed.
    ///
    /// Returns true when a snapshot was committed.
    pub fn end_gesture(&mut self) -> bool {
        if self.gesture.take().is_none() {
            return false;
        }
        self.commit()
    }

    /// Abandon the active gesture, restoring the state it started from.
    pub fn cancel_gesture(&mut self) {
        match self.gesture.take() {
            Some(Gesture::Resize { base, .. }) | Some(Gesture::Move { base }) => {
                self.crop = Some(base);
            }
            Some(Gesture::Pan { base }) | Some(Gesture::Zoom { base }) => {
                self.viewport = base;
            }
            None => {}
        }
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let restored = self.history.undo().copied();
        self.restore(restored)
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let restored = self.history.redo().copied();
        self.restore(restored)
    }

    fn restore(&mut self, snapshot: Option<Snapshot>) -> bool {
        match snapshot {
            Some(snapshot) => {
                self.viewport = snapshot.viewport;
                self.crop = Some(snapshot.crop);
                true
            }
            None => false,
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.crop.map(|crop| Snapshot {
            viewport: self.viewport,
            crop,
        })
    }

    /// Push the current state. Returns false when there is no crop yet or
    /// the state equals the current snapshot.
    fn commit(&mut self) -> bool {
        let Some(snapshot) = self.snapshot() else {
            return false;
        };
        if self.history.current() == Some(&snapshot) {
            return false;
        }
        self.history.push(snapshot);
        true
    }

    /// Pipeline request for the current state, `None` before layout.
    pub fn crop_request(&self, image: Bitmap) -> Option<CropRequest> {
        Some(CropRequest {
            image,
            container: self.container?,
            viewport: self.viewport,
            crop: self.crop?,
            policy: self.config.policy,
        })
    }
}
