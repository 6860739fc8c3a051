//! Aspect-fit placement and the user-controlled viewport.
//!
//! The *display frame* is the rectangle, in container coordinates, that the
//! image occupies after it is fitted into the container, scaled by the user
//! zoom and translated by the user pan offset.
//!
//! Pan and zoom are always computed from a base value captured when the
//! gesture starts plus the cumulative gesture amount. Per-event deltas are
//! never chained, so dropped or reordered events cannot make the image drift.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Smallest user zoom factor.
pub const MIN_SCALE: f64 = 0.5;

/// Largest user zoom factor.
pub const MAX_SCALE: f64 = 4.0;

/// Largest size with `image`'s aspect ratio that fits inside `container`.
///
/// The image must have a positive width and height. Callers guard against
/// empty images before fitting.
///
/// # Example
///
/// ```
/// use croppane_core::geometry::Size;
/// use croppane_core::viewport::fit;
///
/// let fitted = fit(Size::new(100.0, 50.0), Size::new(200.0, 200.0));
/// assert_eq!(fitted, Size::new(200.0, 100.0));
/// ```
pub fn fit(image: Size, container: Size) -> Size {
    debug_assert!(!image.is_empty(), "fit requires a non-empty image size");
    let factor = (container.width / image.width).min(container.height / image.height);
    image.scaled(factor)
}

/// Rectangle the image occupies in the container.
///
/// The fitted size is multiplied by `scale`, centered in the container and
/// then translated by `offset`.
pub fn display_frame(image: Size, container: Size, scale: f64, offset: Size) -> Rect {
    let size = fit(image, container).scaled(scale);
    let center = Point::new(
        container.width / 2.0 + offset.width,
        container.height / 2.0 + offset.height,
    );
    Rect::centered(center, size)
}

/// User zoom and pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Zoom factor relative to the fitted size.
    pub scale: f64,
    /// Pan offset of the image center from the container center.
    pub offset: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Size::ZERO,
        }
    }
}

impl ViewportState {
    pub fn new(scale: f64, offset: Size) -> Self {
        Self { scale, offset }
    }

    /// Display frame for this viewport.
    pub fn frame(&self, image: Size, container: Size) -> Rect {
        display_frame(image, container, self.scale, self.offset)
    }

    /// Viewport after panning by `translation` from `base`.
    ///
    /// Panning is unclamped: the image may be dragged fully off-screen.
    pub fn panned(base: &ViewportState, translation: Point) -> ViewportState {
        ViewportState {
            scale: base.scale,
            offset: Size::new(
                base.offset.width + translation.x,
                base.offset.height + translation.y,
            ),
        }
    }

    /// Viewport after a pinch of `magnification` starting from `base`.
    ///
    /// The resulting scale is clamped to `[min_scale, max_scale]`. Inverted
    /// bounds resolve to `max_scale` and a NaN bound is ignored.
    pub fn zoomed(
        base: &ViewportState,
        magnification: f64,
        min_scale: f64,
        max_scale: f64,
    ) -> ViewportState {
        let scale = base.scale * magnification;
        let scale = if scale.is_finite() {
            scale.max(min_scale).min(max_scale)
        } else {
            base.scale
        };
        ViewportState {
            scale,
            offset: base.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_examples() {
        assert_eq!(
            fit(Size::new(100.0, 50.0), Size::new(200.0, 200.0)),
            Size::new(200.0, 100.0)
        );
        assert_eq!(
            fit(Size::new(100.0, 50.0), Size::new(50.0, 100.0)),
            Size::new(50.0, 25.0)
        );
        assert_eq!(
            fit(Size::new(30.0, 30.0), Size::new(100.0, 50.0)),
            Size::new(50.0, 50.0)
        );
    }

    #[test]
    fn test_display_frame_centered() {
        let frame = display_frame(Size::new(100.0, 50.0), Size::new(200.0, 200.0), 1.0, Size::ZERO);
        assert_eq!(frame, Rect::new(0.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn test_display_frame_scaled_and_offset() {
        let frame = display_frame(
            Size::new(100.0, 100.0),
            Size::new(100.0, 100.0),
            2.0,
            Size::new(10.0, -5.0),
        );
        assert_eq!(frame, Rect::new(-40.0, -55.0, 200.0, 200.0));
    }

    #[test]
    fn test_pan_from_base() {
        let base = ViewportState::new(1.5, Size::new(10.0, 10.0));
        let panned = ViewportState::panned(&base, Point::new(-30.0, 5.0));
        assert_eq!(panned.offset, Size::new(-20.0, 15.0));
        assert_eq!(panned.scale, 1.5);

        // Same cumulative translation from the same base gives the same result
        let again = ViewportState::panned(&base, Point::new(-30.0, 5.0));
        assert_eq!(again, panned);
    }

    #[test]
    fn test_pan_unclamped() {
        let base = ViewportState::default();
        let panned = ViewportState::panned(&base, Point::new(-10_000.0, 10_000.0));
        assert_eq!(panned.offset, Size::new(-10_000.0, 10_000.0));
    }

    #[test]
    fn test_zoom_clamped() {
        let base = ViewportState::default();
        assert_eq!(ViewportState::zoomed(&base, 10.0, MIN_SCALE, MAX_SCALE).scale, MAX_SCALE);
        assert_eq!(ViewportState::zoomed(&base, 0.1, MIN_SCALE, MAX_SCALE).scale, MIN_SCALE);
        assert_eq!(ViewportState::zoomed(&base, 2.0, MIN_SCALE, MAX_SCALE).scale, 2.0);
    }

    #[test]
    fn test_zoom_non_finite_keeps_base() {
        let base = ViewportState::new(2.0, Size::ZERO);
        assert_eq!(ViewportState::zoomed(&base, f64::NAN, MIN_SCALE, MAX_SCALE).scale, 2.0);
    }

    #[test]
    fn test_zoom_with_inverted_bounds_does_not_panic() {
        let base = ViewportState::default();
        assert_eq!(ViewportState::zoomed(&base, 2.0, 5.0, 1.0).scale, 1.0);
        assert_eq!(ViewportState::zoomed(&base, 2.0, f64::NAN, 3.0).scale, 2.0);
    }
}
