//! Per-frame camera constraints: collision with the building and the pan
//! envelope for the orbit target.

use super::camera::{Camera, OrbitControls};
use super::constants::{
    COLLISION_MARGIN, COLLISION_MIN_DISTANCE, PAN_MAX_DEFAULT, PAN_MIN_DEFAULT, PAN_MIN_Y,
    PAN_PADDING_X, PAN_PADDING_Y, PAN_PADDING_Z,
};
use super::geometry::{Aabb, Ray};
use super::scene::{MeshId, ProcessedScene};
use glam::Vec3;

/// A value computed once, the first time its inputs are available.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OnceState<T> {
    #[default]
    Pending,
    Ready(T),
}

impl<T> OnceState<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            OnceState::Pending => None,
            OnceState::Ready(v) => Some(v),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, OnceState::Ready(_))
    }

    /// Runs `init` while pending; a `None` result leaves the state pending.
    pub fn get_or_try_init(&mut self, init: impl FnOnce() -> Option<T>) -> Option<&T> {
        if let OnceState::Pending = self {
            if let Some(v) = init() {
                *self = OnceState::Ready(v);
            }
        }
        self.get()
    }
}

/// Keeps the camera on the target side of the first building surface.
#[derive(Clone, Debug)]
pub struct CollisionGuard {
    colliders: OnceState<Vec<MeshId>>,
    margin: f32,
}

impl Default for CollisionGuard {
    fn default() -> Self {
        Self::new(COLLISION_MARGIN)
    }
}

impl CollisionGuard {
    pub fn new(margin: f32) -> Self {
        Self {
            colliders: OnceState::Pending,
            margin,
        }
    }

    pub fn colliders(&self) -> Option<&[MeshId]> {
        self.colliders.get().map(Vec::as_slice)
    }

    /// Returns true if the camera was pulled in.
    pub fn apply(
        &mut self,
        building: Option<&ProcessedScene>,
        camera: &mut Camera,
        controls: Option<&mut OrbitControls>,
    ) -> bool {
        let Some(scene) = building else {
            return false;
        };
        let Some(colliders) = self
            .colliders
            .get_or_try_init(|| Some(scene.partition.collidable.clone()))
        else {
            return false;
        };
        let Some(controls) = controls else {
            return false;
        };
        if colliders.is_empty() {
            return false;
        }

        let offset = camera.eye - camera.target;
        let distance = offset.length();
        if distance < COLLISION_MIN_DISTANCE {
            return false;
        }
        let dir = offset / distance;
        let ray = Ray::new(camera.target, dir, distance + self.margin);

        match scene.raycast_meshes(colliders, &ray) {
            Some((_, hit)) if hit < distance => {
                let safe = (hit - self.margin).max(self.margin);
                camera.eye = camera.target + dir * safe;
                controls.sync(camera);
                true
            }
            _ => false,
        }
    }
}

/// Per-axis envelope for the orbit target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanLimits {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for PanLimits {
    fn default() -> Self {
        Self {
            min: Vec3::from(PAN_MIN_DEFAULT),
            max: Vec3::from(PAN_MAX_DEFAULT),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanPadding {
    pub x: f32,
    pub z: f32,
    /// Added above the top of the box.
    pub y: f32,
    pub min_y: f32,
}

impl Default for PanPadding {
    fn default() -> Self {
        Self {
            x: PAN_PADDING_X,
            z: PAN_PADDING_Z,
            y: PAN_PADDING_Y,
            min_y: PAN_MIN_Y,
        }
    }
}

impl PanLimits {
    /// Limits around a bounding box, or `None` for an empty box.
    pub fn from_bounds(bounds: &Aabb, pad: &PanPadding) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        let center = bounds.center();
        let size = bounds.size();
        Some(Self {
            min: Vec3::new(bounds.min.x - pad.x, pad.min_y, bounds.min.z - pad.z),
            max: Vec3::new(
                bounds.max.x + pad.x,
                center.y + size.y * 0.5 + pad.y,
                bounds.max.z + pad.z,
            ),
        })
    }

    pub fn clamp(&self, p: Vec3) -> Vec3 {
        p.max(self.min).min(self.max)
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Clamps the camera target. Returns true if it had to move.
    pub fn apply(&self, camera: &mut Camera, controls: &mut OrbitControls) -> bool {
        let clamped = self.clamp(camera.target);
        if clamped == camera.target {
            return false;
        }
        camera.target = clamped;
        controls.sync(camera);
        true
    }
}

/// Pan limits derived once from the building's bounding box.
#[derive(Clone, Debug, Default)]
pub struct PanLimitsAuto {
    pub padding: PanPadding,
    limits: OnceState<PanLimits>,
}

impl PanLimitsAuto {
    pub fn new(padding: PanPadding) -> Self {
        Self {
            padding,
            limits: OnceState::Pending,
        }
    }

    pub fn limits(&self) -> Option<&PanLimits> {
        self.limits.get()
    }

    pub fn apply(
        &mut self,
        building: Option<&ProcessedScene>,
        camera: &mut Camera,
        controls: &mut OrbitControls,
    ) -> bool {
        let pad = self.padding;
        let limits = self
            .limits
            .get_or_try_init(|| PanLimits::from_bounds(&building?.bounds(), &pad));
        match limits {
            Some(l) => l.apply(camera, controls),
            None => false,
        }
    }
}

#[derive(Clone, Debug)]
pub enum PanEnvelope {
    Fixed(PanLimits),
    Auto(PanLimitsAuto),
}

impl Default for PanEnvelope {
    fn default() -> Self {
        PanEnvelope::Auto(PanLimitsAuto::default())
    }
}

impl PanEnvelope {
    pub fn apply(
        &mut self,
        building: Option<&ProcessedScene>,
        camera: &mut Camera,
        controls: &mut OrbitControls,
    ) -> bool {
        match self {
            PanEnvelope::Fixed(l) => l.apply(camera, controls),
            PanEnvelope::Auto(a) => a.apply(building, camera, controls),
        }
    }

    pub fn current(&self) -> Option<&PanLimits> {
        match self {
            PanEnvelope::Fixed(l) => Some(l),
            PanEnvelope::Auto(a) => a.limits(),
        }
    }
}

/// Camera, controller and constraints, advanced once per frame in a fixed
/// order: controller input, collision, pan clamp.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub camera: Camera,
    pub controls: OrbitControls,
    pub collision: CollisionGuard,
    pub pan: PanEnvelope,
}

impl CameraRig {
    pub fn new(camera: Camera, controls: OrbitControls, pan: PanEnvelope) -> Self {
        Self {
            camera,
            controls,
            collision: CollisionGuard::default(),
            pan,
        }
    }

    pub fn frame(&mut self, building: Option<&ProcessedScene>) {
        self.controls.update(&mut self.camera);
        self.collision
            .apply(building, &mut self.camera, Some(&mut self.controls));
        self.pan.apply(building, &mut self.camera, &mut self.controls);
    }
}
