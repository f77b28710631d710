//! Pure calculation functions for reduction planning.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::Quality;

/// Scale `source` so its longer edge equals `max_edge`, preserving aspect ratio.
///
/// The shorter edge is `round(shorter * max_edge / longer)`, rounded half away
/// from zero and never below 1. Images already within `max_edge` are returned
/// unchanged.
///
/// # Examples
/// ```
/// # use coverfit::imaging::{Dimensions, fit_within};
/// // 3000x2000 into 500 → 500x333
/// assert_eq!(fit_within(Dimensions::new(3000, 2000), 500), Dimensions::new(500, 333));
///
/// // Portrait keeps the height as the longer edge
/// assert_eq!(fit_within(Dimensions::new(600, 1200), 300), Dimensions::new(150, 300));
/// ```
pub fn fit_within(source: Dimensions, max_edge: u32) -> Dimensions {
    let Dimensions { width, height } = source;
    let longer = source.longer_edge();

    if longer <= max_edge || max_edge == 0 {
        return source;
    }

    let scale = max_edge as f64 / longer as f64;
    let shrink = |edge: u32| ((edge as f64 * scale).round() as u32).clamp(1, max_edge);

    if width >= height {
        Dimensions::new(max_edge, shrink(height))
    } else {
        Dimensions::new(shrink(width), max_edge)
    }
}

/// Next pass of lossless dimension reduction: halve the longer edge.
///
/// Returns `None` once the halved longer edge would drop below `min_edge`,
/// which bounds the number of passes to `log2(longer / min_edge)`.
pub fn next_halving(current: Dimensions, min_edge: u32) -> Option<Dimensions> {
    let target = current.longer_edge() / 2;
    if target < min_edge.max(1) {
        return None;
    }
    Some(fit_within(current, target))
}

/// Quality ladder for lossy reduction: `initial`, `initial - step`, … ending
/// at `floor` exactly (the floor is always tried once).
pub fn quality_steps(initial: Quality, step: u32, floor: Quality) -> Vec<Quality> {
    let step = step.max(1);
    let floor = floor.min(initial);

    let mut steps = Vec::new();
    let mut q = initial.value();
    while q > floor.value() {
        steps.push(Quality::new(q));
        q = q.saturating_sub(step);
    }
    steps.push(floor);
    steps
}
