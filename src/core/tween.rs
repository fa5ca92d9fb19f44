//! Eased opacity animation for hovered click regions.

use super::constants::{HOVER_TWEEN_SEC, OPACITY_HOVER};
use fnv::FnvHashMap;

/// Anything that stores per-region opacity (the processed building, or a
/// plain buffer in tests).
pub trait RegionOpacity {
    fn region_count(&self) -> usize;
    fn region_opacity(&self, region: usize) -> Option<f32>;
    fn set_region_opacity(&mut self, region: usize, opacity: f32);
}

impl RegionOpacity for Vec<f32> {
    fn region_count(&self) -> usize {
        self.len()
    }
    fn region_opacity(&self, region: usize) -> Option<f32> {
        self.get(region).copied()
    }
    fn set_region_opacity(&mut self, region: usize, opacity: f32) {
        if let Some(v) = self.get_mut(region) {
            *v = opacity;
        }
    }
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpacityTween {
    pub from: f32,
    pub to: f32,
    elapsed: f32,
    duration: f32,
}

impl OpacityTween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_out_cubic(self.elapsed / self.duration)
    }

    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        self.elapsed = (self.elapsed + dt_sec.max(0.0)).min(self.duration);
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Tracks the single hovered region and the in-flight tween of every region.
#[derive(Clone, Debug)]
pub struct HoverAnimator {
    tweens: FnvHashMap<usize, OpacityTween>,
    hovered: Option<usize>,
    baseline: f32,
    duration: f32,
}

impl HoverAnimator {
    pub fn new(baseline: f32) -> Self {
        Self::with_duration(baseline, HOVER_TWEEN_SEC)
    }

    pub fn with_duration(baseline: f32, duration: f32) -> Self {
        Self {
            tweens: FnvHashMap::default(),
            hovered: None,
            baseline,
            duration,
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn active_tween(&self, region: usize) -> Option<&OpacityTween> {
        self.tweens.get(&region)
    }

    /// Starts a tween from the region's current opacity, replacing any tween
    /// already running on it.
    fn start<S: RegionOpacity>(&mut self, scene: &S, region: usize, to: f32) {
        let Some(from) = scene.region_opacity(region) else {
            return;
        };
        self.tweens
            .insert(region, OpacityTween::new(from, to, self.duration));
    }

    pub fn pointer_enter<S: RegionOpacity>(&mut self, scene: &S, region: usize) {
        if self.hovered == Some(region) || region >= scene.region_count() {
            return;
        }
        if let Some(prev) = self.hovered.take() {
            self.start(scene, prev, self.baseline);
        }
        self.start(scene, region, OPACITY_HOVER);
        self.hovered = Some(region);
    }

    pub fn pointer_leave<S: RegionOpacity>(&mut self, scene: &S) {
        if let Some(prev) = self.hovered.take() {
            self.start(scene, prev, self.baseline);
        }
    }

    /// Moves every region that is not hovered straight to the new baseline.
    pub fn set_baseline<S: RegionOpacity>(&mut self, scene: &mut S, baseline: f32) {
        self.baseline = baseline;
        for region in 0..scene.region_count() {
            if Some(region) == self.hovered {
                continue;
            }
            self.tweens.remove(&region);
            scene.set_region_opacity(region, baseline);
        }
    }

    pub fn tick<S: RegionOpacity>(&mut self, scene: &mut S, dt_sec: f32) {
        self.tweens.retain(|&region, tween| {
            let v = tween.advance(dt_sec);
            scene.set_region_opacity(region, v);
            !tween.is_finished()
        });
    }
}
