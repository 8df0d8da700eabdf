//! Finger curl from segment traces against the grabbed body.
//!
//! Each finger's reference curve is sampled once into `steps + 1` points in
//! hand-mesh space. On grab, consecutive points are traced against the
//! object's collision; the first blocking segment sets the curl. A finger
//! that hits nothing, or has nothing to hit, reports fully curled (1.0),
//! which doubles as the rest pose.

use crate::components::{Body, Transform};
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Control points of a finger's curl path, in hand-mesh space
#[derive(Debug, Clone)]
pub struct FingerCurve {
    pub points: Vec<Vec3>,
}

impl FingerCurve {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Catmull-Rom position at `t` in [0, 1] across all control points
    pub fn sample(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        match n {
            0 => return Vec3::ZERO,
            1 => return self.points[0],
            _ => {}
        }
        let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
        let i = (scaled.floor() as usize).min(n - 2);
        let local = scaled - i as f32;

        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        let p0 = if i == 0 { p1 } else { self.points[i - 1] };
        let p3 = if i + 2 < n { self.points[i + 2] } else { p2 };

        let t2 = local * local;
        let t3 = t2 * local;
        0.5 * ((2.0 * p1)
            + (-p0 + p2) * local
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
    }

    /// `steps + 1` evenly spaced samples
    pub fn steps(&self, steps: usize) -> Vec<Vec3> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|i| self.sample(i as f32 / steps as f32))
            .collect()
    }
}

/// Curl per finger, 0 = straight, 1 = fully curled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerCurls([f32; 5]);

impl FingerCurls {
    pub const REST: FingerCurls = FingerCurls([1.0; 5]);

    pub fn get(&self, finger: Finger) -> f32 {
        self.0[finger.index()]
    }

    pub fn values(&self) -> [f32; 5] {
        self.0
    }
}

impl Default for FingerCurls {
    fn default() -> Self {
        Self::REST
    }
}

/// Sampled finger paths and their last traced curls
#[derive(Debug, Clone)]
pub struct FingerRig {
    cache: [Vec<Vec3>; 5],
    curls: FingerCurls,
}

impl FingerRig {
    pub fn from_curves(curves: [FingerCurve; 5], steps: usize) -> Self {
        Self {
            cache: curves.map(|c| c.steps(steps)),
            curls: FingerCurls::REST,
        }
    }

    /// Default right-hand curves; `mirror` flips them for a left hand
    pub fn default_hand(steps: usize, mirror: bool) -> Self {
        let side = if mirror { -1.0 } else { 1.0 };
        let curve = |y: f32, base: f32, length: f32| {
            FingerCurve::new(vec![
                Vec3::new(base, y * side, 0.0),
                Vec3::new(base + length * 0.5, y * side, -length * 0.1),
                Vec3::new(base + length * 0.7, y * side, -length * 0.5),
                Vec3::new(base + length * 0.4, y * side, -length * 0.8),
            ])
        };
        Self::from_curves(
            [
                curve(4.0, 3.0, 6.0),
                curve(2.0, 8.0, 8.0),
                curve(0.0, 8.5, 9.0),
                curve(-2.0, 8.0, 8.5),
                curve(-4.0, 7.0, 6.5),
            ],
            steps,
        )
    }

    pub fn curls(&self) -> FingerCurls {
        self.curls
    }

    pub fn samples(&self, finger: Finger) -> &[Vec3] {
        &self.cache[finger.index()]
    }

    /// Trace every finger against `target` with the hand mesh at `hand`
    pub fn trace(&mut self, hand: &Transform, target: Option<&Body>) {
        let mut values = [1.0; 5];
        for finger in Finger::ALL {
            values[finger.index()] = trace_finger(&self.cache[finger.index()], hand, target);
        }
        self.curls = FingerCurls(values);
    }

    pub fn reset(&mut self) {
        self.curls = FingerCurls::REST;
    }
}

/// Curl of one finger. A hit at the very start of the first segment reads as
/// no hit and reports 1.0, same as a miss.
pub fn trace_finger(samples: &[Vec3], hand: &Transform, target: Option<&Body>) -> f32 {
    let Some(body) = target else {
        return 1.0;
    };
    let segments = samples.len().saturating_sub(1);
    let mut bend = 0.0;
    for (i, pair) in samples.windows(2).enumerate() {
        let start = hand.transform_point(pair[0]);
        let end = hand.transform_point(pair[1]);
        if let Some(fraction) = body.line_trace(start, end) {
            let contribution = 1.0 / segments as f32;
            bend = i as f32 * contribution + fraction * contribution;
            break;
        }
    }
    if bend == 0.0 && samples.len() > 1 {
        return 1.0;
    }
    bend.clamp(0.0, 1.0)
}
