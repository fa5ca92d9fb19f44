//! Camera description and an orbit controller with damping.
//!
//! The controller behaves like the usual three-style orbit controls: pointer
//! input accumulates rotate/pan/dolly deltas, and `update` applies a damped
//! fraction of them each frame around the camera target.

use super::geometry::Ray;
use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::PI;

const SPHERICAL_EPS: f32 = 1e-6;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).length()
    }
}

/// Compute a world-space ray from canvas pixel coordinates.
///
/// `sx`, `sy` are in the canvas backing-store space of size `width` x `height`.
pub fn screen_to_world_ray(camera: &Camera, width: f32, height: f32, sx: f32, sy: f32) -> Ray {
    let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
    let inv = camera.view_proj().inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p1: Vec3 = p_far.truncate() / p_far.w;
    Ray::new(camera.eye, p1 - camera.eye, camera.zfar)
}

/// Radius plus polar (`phi`, from +Y) and azimuth (`theta`, around +Y from +Z).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }

    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(SPHERICAL_EPS, PI - SPHERICAL_EPS);
    }
}

#[derive(Clone, Debug)]
pub struct OrbitSettings {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            min_distance: 30.0,
            max_distance: 150.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI / 2.1,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(camera: &Camera, settings: OrbitSettings) -> Self {
        Self {
            settings,
            spherical: Spherical::from_offset(camera.eye - camera.target),
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// Pointer drag rotation; a drag across the full viewport height turns a
    /// full circle.
    pub fn rotate(&mut self, dx_px: f32, dy_px: f32, viewport_h: f32) {
        let h = viewport_h.max(1.0);
        self.delta_theta -= 2.0 * PI * dx_px / h * self.settings.rotate_speed;
        self.delta_phi -= 2.0 * PI * dy_px / h * self.settings.rotate_speed;
    }

    /// Screen-space pan scaled so the point under the target tracks the
    /// pointer.
    pub fn pan(&mut self, camera: &Camera, dx_px: f32, dy_px: f32, viewport_h: f32) {
        let h = viewport_h.max(1.0);
        let offset = camera.eye - camera.target;
        let target_distance = offset.length() * (camera.fovy_radians * 0.5).tan();
        let view = camera.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();
        let left_amt = 2.0 * dx_px * target_distance / h * self.settings.pan_speed;
        let up_amt = 2.0 * dy_px * target_distance / h * self.settings.pan_speed;
        self.pan_offset += -right * left_amt + up * up_amt;
    }

    /// Wheel zoom; positive `delta_y` moves away from the target.
    pub fn dolly(&mut self, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let zoom = 0.95_f32.powf(self.settings.zoom_speed * (delta_y * 0.01).abs());
        if delta_y < 0.0 {
            self.scale *= zoom;
        } else {
            self.scale /= zoom;
        }
    }

    /// Applies pending input to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let s = &self.settings;
        let mut sph = Spherical::from_offset(camera.eye - camera.target);
        let damp = if s.enable_damping { s.damping_factor } else { 1.0 };

        sph.theta += self.delta_theta * damp;
        sph.phi += self.delta_phi * damp;
        sph.phi = sph.phi.clamp(s.min_polar_angle, s.max_polar_angle);
        sph.make_safe();
        sph.radius = (sph.radius * self.scale).clamp(s.min_distance, s.max_distance);

        let target = camera.target + self.pan_offset * damp;
        let eye = target + sph.to_offset();
        let moved = eye.distance_squared(camera.eye) > SPHERICAL_EPS
            || target.distance_squared(camera.target) > SPHERICAL_EPS;
        camera.eye = eye;
        camera.target = target;
        self.spherical = sph;

        if s.enable_damping {
            self.delta_theta *= 1.0 - s.damping_factor;
            self.delta_phi *= 1.0 - s.damping_factor;
            self.pan_offset *= 1.0 - s.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
        moved
    }

    /// Re-reads the camera after something other than the controller moved it.
    /// Distance limits are not re-applied here.
    pub fn sync(&mut self, camera: &Camera) {
        self.spherical = Spherical::from_offset(camera.eye - camera.target);
    }
}
