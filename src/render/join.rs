//! Enter/update/exit classification between frames, and the animated
//! transition a renderer plays between them.

use plotters::style::RGBColor;
use std::collections::{HashMap, HashSet};

use crate::data::RowId;
use crate::ir::{BarGeometry, Frame};

/// Row identities of `next` classified against `previous`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Join {
    pub enter: Vec<RowId>,
    pub update: Vec<RowId>,
    pub exit: Vec<RowId>,
}

impl Join {
    pub fn is_pure_update(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

/// Key both frames by row identity. With no previous frame every bar enters.
pub fn join(previous: Option<&Frame>, next: &Frame) -> Join {
    let before: HashSet<RowId> = previous
        .map(|f| f.bars.iter().map(|b| b.id).collect())
        .unwrap_or_default();
    let after: HashSet<RowId> = next.bars.iter().map(|b| b.id).collect();

    let mut result = Join::default();
    for bar in &next.bars {
        if before.contains(&bar.id) {
            result.update.push(bar.id);
        } else {
            result.enter.push(bar.id);
        }
    }
    if let Some(prev) = previous {
        result.exit = prev
            .bars
            .iter()
            .map(|b| b.id)
            .filter(|id| !after.contains(id))
            .collect();
    }
    result
}

/// Cubic in-out easing on [0, 1].
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Interpolation of bar geometry from one state to a target frame.
///
/// `RecordingSink` builds one per frame; an animating renderer samples it on
/// each tick and calls `retarget` when a new frame arrives mid-flight.
///
/// Entering bars grow from zero width at their target position. Bars absent
/// from the target are dropped immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pairs: Vec<(BarGeometry, BarGeometry)>,
    duration_ms: u64,
}

impl Transition {
    pub fn new(from: &[BarGeometry], to: &Frame) -> Self {
        let start: HashMap<RowId, &BarGeometry> = from.iter().map(|b| (b.id, b)).collect();
        let pairs = to
            .bars
            .iter()
            .map(|target| {
                let origin = match start.get(&target.id) {
                    Some(b) => (*b).clone(),
                    None => BarGeometry {
                        width: 0.0,
                        ..target.clone()
                    },
                };
                (origin, target.clone())
            })
            .collect();
        Self {
            pairs,
            duration_ms: to.transition_ms,
        }
    }

    /// Transition between two whole frames.
    pub fn between(previous: Option<&Frame>, next: &Frame) -> Self {
        let from = previous.map(|f| f.bars.as_slice()).unwrap_or(&[]);
        Self::new(from, next)
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn is_finished(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.duration_ms
    }

    /// Geometry at `elapsed_ms` into the transition.
    pub fn sample(&self, elapsed_ms: u64) -> Vec<BarGeometry> {
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            ease_cubic_in_out(elapsed_ms as f64 / self.duration_ms as f64)
        };
        self.pairs.iter().map(|(a, b)| lerp_bar(a, b, t)).collect()
    }

    /// Start a new transition toward `next` from wherever this one is at
    /// `elapsed_ms`.
    pub fn retarget(&self, elapsed_ms: u64, next: &Frame) -> Self {
        Self::new(&self.sample(elapsed_ms), next)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_bar(a: &BarGeometry, b: &BarGeometry, t: f64) -> BarGeometry {
    let channel = |x: u8, y: u8| lerp(x as f64, y as f64, t).round() as u8;
    BarGeometry {
        id: b.id,
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
        width: lerp(a.width, b.width, t),
        height: lerp(a.height, b.height, t),
        fill: RGBColor(
            channel(a.fill.0, b.fill.0),
            channel(a.fill.1, b.fill.1),
            channel(a.fill.2, b.fill.2),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::AxisGeometry;

    fn bar(id: usize, x: f64, fill: RGBColor) -> BarGeometry {
        BarGeometry {
            id: RowId(id),
            x,
            y: 10.0,
            width: 20.0,
            height: 12.0,
            fill,
        }
    }

    fn frame(bars: Vec<BarGeometry>) -> Frame {
        Frame {
            width: 100.0,
            height: 100.0,
            bars,
            axes: AxisGeometry::default(),
            transition_ms: 1000,
        }
    }

    #[test]
    fn test_join_first_frame_all_enter() {
        let next = frame(vec![bar(0, 0.0, RGBColor(0, 0, 0)), bar(1, 5.0, RGBColor(0, 0, 0))]);
        let j = join(None, &next);
        assert_eq!(j.enter, vec![RowId(0), RowId(1)]);
        assert!(j.update.is_empty());
        assert!(j.exit.is_empty());
    }

    #[test]
    fn test_join_classifies() {
        let prev = frame(vec![bar(0, 0.0, RGBColor(0, 0, 0)), bar(1, 5.0, RGBColor(0, 0, 0))]);
        let next = frame(vec![bar(1, 9.0, RGBColor(0, 0, 0)), bar(2, 5.0, RGBColor(0, 0, 0))]);
        let j = join(Some(&prev), &next);
        assert_eq!(j.enter, vec![RowId(2)]);
        assert_eq!(j.update, vec![RowId(1)]);
        assert_eq!(j.exit, vec![RowId(0)]);
        assert!(!j.is_pure_update());
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_eq!(ease_cubic_in_out(2.0), 1.0);
    }

    #[test]
    fn test_transition_endpoints() {
        let prev = frame(vec![bar(0, 0.0, RGBColor(0, 0, 0))]);
        let next = frame(vec![bar(0, 100.0, RGBColor(200, 100, 50))]);
        let t = Transition::between(Some(&prev), &next);
        assert_eq!(t.sample(0), prev.bars);
        assert_eq!(t.sample(1000), next.bars);
        let mid = &t.sample(500)[0];
        assert_eq!(mid.x, 50.0);
        assert_eq!(mid.fill, RGBColor(100, 50, 25));
        assert!(t.is_finished(1000));
    }

    #[test]
    fn test_entering_bar_grows_from_zero() {
        let next = frame(vec![bar(3, 40.0, RGBColor(1, 2, 3))]);
        let t = Transition::between(None, &next);
        let start = &t.sample(0)[0];
        assert_eq!(start.width, 0.0);
        assert_eq!(start.x, 40.0);
    }

    #[test]
    fn test_retarget_starts_from_current_sample() {
        let a = frame(vec![bar(0, 0.0, RGBColor(0, 0, 0))]);
        let b = frame(vec![bar(0, 100.0, RGBColor(0, 0, 0))]);
        let c = frame(vec![bar(0, 0.0, RGBColor(0, 0, 0))]);
        let first = Transition::between(Some(&a), &b);
        let second = first.retarget(500, &c);
        assert_eq!(second.sample(0)[0].x, 50.0);
        assert_eq!(second.sample(1000)[0].x, 0.0);
    }
}
