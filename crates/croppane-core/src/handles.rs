//! Interactive crop handles and the resize/clamp algorithm.
//!
//! A resize is a pure function of the rectangle captured when the drag
//! started, the handle being dragged and the cumulative drag translation.
//! After the handle mutation the rectangle is grown back to the minimum side
//! length from its dragged edge, and, when bounds are given, confined to
//! them.
//!
//! # Confinement
//!
//! Each axis is resolved independently:
//!
//! 1. The dragged edge is clamped to its bound.
//! 2. If the fixed edge is outside the bounds, the span slides inside, and
//!    shrinks when it is larger than the bounds.
//! 3. If the span is now shorter than the minimum side, it grows from the
//!    lower edge, moving the lower edge back when the upper bound is hit.
//!
//! When the bounds themselves are shorter than the minimum side, the
//! minimum side wins and the span overflows the upper bound.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Default minimum crop side length, in container units.
pub const DEFAULT_MIN_SIDE: f64 = 40.0;

/// One of the eight resize handles around a crop rectangle.
///
/// The discriminant is the handle index used by UI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CropHandle {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
    /// Left side midpoint, changes width only.
    LeftMid = 4,
    /// Right side midpoint, changes width only.
    RightMid = 5,
    /// Top side midpoint, changes height only.
    TopMid = 6,
    /// Bottom side midpoint, changes height only.
    BottomMid = 7,
}

/// Which edge of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Min,
    Max,
}

impl CropHandle {
    pub const ALL: [CropHandle; 8] = [
        CropHandle::TopLeft,
        CropHandle::TopRight,
        CropHandle::BottomRight,
        CropHandle::BottomLeft,
        CropHandle::LeftMid,
        CropHandle::RightMid,
        CropHandle::TopMid,
        CropHandle::BottomMid,
    ];

    /// Handle for a UI index, `None` for indices outside 0..=7.
    pub fn from_index(index: u8) -> Option<CropHandle> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Edges dragged on the (x, y) axes.
    fn edges(self) -> (Option<Edge>, Option<Edge>) {
        match self {
            CropHandle::TopLeft => (Some(Edge::Min), Some(Edge::Min)),
            CropHandle::TopRight => (Some(Edge::Max), Some(Edge::Min)),
            CropHandle::BottomRight => (Some(Edge::Max), Some(Edge::Max)),
            CropHandle::BottomLeft => (Some(Edge::Min), Some(Edge::Max)),
            CropHandle::LeftMid => (Some(Edge::Min), None),
            CropHandle::RightMid => (Some(Edge::Max), None),
            CropHandle::TopMid => (None, Some(Edge::Min)),
            CropHandle::BottomMid => (None, Some(Edge::Max)),
        }
    }

    /// Where the handle sits on `rect`, for hit testing and rendering.
    pub fn position(self, rect: &Rect) -> Point {
        let coord = |edge: Option<Edge>, lo: f64, hi: f64| match edge {
            Some(Edge::Min) => lo,
            Some(Edge::Max) => hi,
            None => (lo + hi) / 2.0,
        };
        let (ex, ey) = self.edges();
        Point::new(
            coord(ex, rect.min_x(), rect.max_x()),
            coord(ey, rect.min_y(), rect.max_y()),
        )
    }
}

/// Resize `base` by dragging `handle` by `translation`.
///
/// `bounds` is the display frame the rectangle must stay inside, or `None`
/// when the rectangle is allowed to overflow (pad policy, or before the
/// container size is known). The result is never narrower or shorter than
/// `min_side`.
pub fn resize(
    base: &Rect,
    handle: CropHandle,
    translation: Point,
    bounds: Option<&Rect>,
    min_side: f64,
) -> Rect {
    let translation = finite_or_zero(translation);
    let (ex, ey) = handle.edges();
    let (min_x, max_x) = resolve_axis(
        base.min_x(),
        base.max_x(),
        ex,
        translation.x,
        bounds.map(|b| (b.min_x(), b.max_x())),
        min_side,
    );
    let (min_y, max_y) = resolve_axis(
        base.min_y(),
        base.max_y(),
        ey,
        translation.y,
        bounds.map(|b| (b.min_y(), b.max_y())),
        min_side,
    );
    Rect::from_edges(min_x, min_y, max_x, max_y)
}

/// Move `base` by `translation` without changing its size, then confine it.
pub fn translate(base: &Rect, translation: Point, bounds: Option<&Rect>, min_side: f64) -> Rect {
    let moved = base.offset(finite_or_zero(translation));
    match bounds {
        Some(bounds) => confine(&moved, bounds, min_side),
        None => moved,
    }
}

/// Slide `rect` inside `bounds`, shrinking it when it is larger, but never
/// below `min_side`.
pub fn confine(rect: &Rect, bounds: &Rect, min_side: f64) -> Rect {
    let (min_x, max_x) = confine_span(
        rect.min_x(),
        rect.max_x(),
        bounds.min_x(),
        bounds.max_x(),
        min_side,
    );
    let (min_y, max_y) = confine_span(
        rect.min_y(),
        rect.max_y(),
        bounds.min_y(),
        bounds.max_y(),
        min_side,
    );
    Rect::from_edges(min_x, min_y, max_x, max_y)
}

/// Centered square crop covering `fraction` of the shorter side of `frame`.
pub fn default_crop(frame: &Rect, fraction: f64, min_side: f64) -> Rect {
    let side = (frame.size().min_side() * fraction).max(min_side);
    let square = Rect::centered(frame.center(), Size::new(side, side));
    confine(&square, frame, min_side)
}

/// Gesture recognizers occasionally report NaN or infinite deltas.
fn finite_or_zero(translation: Point) -> Point {
    let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
    Point::new(clean(translation.x), clean(translation.y))
}

fn resolve_axis(
    lo: f64,
    hi: f64,
    edge: Option<Edge>,
    delta: f64,
    bounds: Option<(f64, f64)>,
    min_side: f64,
) -> (f64, f64) {
    let (mut lo, mut hi) = match edge {
        Some(Edge::Min) => (lo + delta, hi),
        Some(Edge::Max) => (lo, hi + delta),
        None => (lo, hi),
    };

    // Grow back to the minimum from the dragged edge, keeping the fixed edge.
    if hi - lo < min_side {
        match edge {
            Some(Edge::Min) => lo = hi - min_side,
            _ => hi = lo + min_side,
        }
    }

    let Some((b_lo, b_hi)) = bounds else {
        return (lo, hi);
    };

    match edge {
        Some(Edge::Min) => lo = lo.max(b_lo),
        Some(Edge::Max) => hi = hi.min(b_hi),
        None => {}
    }
    confine_span(lo, hi, b_lo, b_hi, min_side)
}

fn confine_span(lo: f64, hi: f64, b_lo: f64, b_hi: f64, min_side: f64) -> (f64, f64) {
    let available = b_hi - b_lo;
    let extent = (hi - lo).min(available);
    let (mut lo, mut hi) = if available > 0.0 {
        let lo = lo.clamp(b_lo, b_hi - extent);
        (lo, lo + extent)
    } else {
        (lo, hi)
    };

    if hi - lo < min_side {
        hi = lo + min_side;
        if hi > b_hi {
            hi = b_hi;
            lo = hi - min_side;
        }
        if lo < b_lo {
            lo = b_lo;
            hi = lo + min_side;
        }
    }
    (lo, hi)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn handle_strategy() -> impl Strategy<Value = CropHandle> {
        (0u8..8).prop_map(|i| CropHandle::from_index(i).unwrap())
    }

    /// A base rectangle inside a 500x400 frame at the origin.
    fn base_strategy() -> impl Strategy<Value = Rect> {
        (0.0f64..=400.0, 0.0f64..=300.0).prop_flat_map(|(x, y)| {
            (
                Just(x),
                Just(y),
                DEFAULT_MIN_SIDE..=(500.0 - x).max(DEFAULT_MIN_SIDE),
                DEFAULT_MIN_SIDE..=(400.0 - y).max(DEFAULT_MIN_SIDE),
            )
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        })
    }

    fn translation_strategy() -> impl Strategy<Value = Point> {
        (-2000.0f64..=2000.0, -2000.0f64..=2000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        /// Property: bottom-right drags never leave the frame.
        #[test]
        fn prop_bottom_right_inside_frame(
            base in base_strategy(),
            t in translation_strategy(),
        ) {
            let frame = Rect::new(0.0, 0.0, 500.0, 400.0);
            let result = resize(&base, CropHandle::BottomRight, t, Some(&frame), DEFAULT_MIN_SIDE);
            prop_assert!(result.max_x() <= frame.max_x() + 1e-9);
            prop_assert!(result.max_y() <= frame.max_y() + 1e-9);
        }

        /// Property: the minimum side holds for every handle and drag.
        #[test]
        fn prop_min_side_holds(
            base in base_strategy(),
            handle in handle_strategy(),
            t in translation_strategy(),
            bounded in any::<bool>(),
        ) {
            let frame = Rect::new(0.0, 0.0, 500.0, 400.0);
            let bounds = bounded.then_some(&frame);
            let result = resize(&base, handle, t, bounds, DEFAULT_MIN_SIDE);
            prop_assert!(result.width >= DEFAULT_MIN_SIDE - 1e-9);
            prop_assert!(result.height >= DEFAULT_MIN_SIDE - 1e-9);
        }

        /// Property: with bounds, every handle keeps the rectangle in the frame.
        #[test]
        fn prop_bounded_resize_inside_frame(
            base in base_strategy(),
            handle in handle_strategy(),
            t in translation_strategy(),
        ) {
            let frame = Rect::new(0.0, 0.0, 500.0, 400.0);
            let result = resize(&base, handle, t, Some(&frame), DEFAULT_MIN_SIDE);
            prop_assert!(frame.contains_rect(&result), "{:?} escaped {:?}", result, frame);
        }

        /// Property: a large negative bottom-right drag bottoms out at the minimum.
        #[test]
        fn prop_negative_drag_bottoms_out(base in base_strategy(), amount in 1000.0f64..=5000.0) {
            let frame = Rect::new(0.0, 0.0, 500.0, 400.0);
            let t = Point::new(-amount, -amount);
            let result = resize(&base, CropHandle::BottomRight, t, Some(&frame), DEFAULT_MIN_SIDE);
            prop_assert!((result.width - DEFAULT_MIN_SIDE).abs() < 1e-9);
            prop_assert!((result.height - DEFAULT_MIN_SIDE).abs() < 1e-9);
        }
    }
}
