//! World-space triangle geometry, bounds and ray queries.

use glam::{Mat4, Vec3};

const TRI_EPSILON: f32 = 1e-7;

/// Axis-aligned bounding box. A box with `max < min` on any axis is empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.expand_to(p);
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn expand_to(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Slab test. Returns the entry distance (0 when the origin is inside) if
    /// the box is hit within `[0, ray.far]`.
    pub fn ray_entry(&self, ray: &Ray) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let inv = ray.dir.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let t_near = t0.min(t1).max_element().max(0.0);
        let t_far = t0.max(t1).min_element().min(ray.far);
        (t_near <= t_far).then_some(t_near)
    }
}

/// Half-line with a normalized direction and a far cut-off.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub far: f32,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3, far: f32) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
            far,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Moller-Trumbore. Counter-clockwise triangles face the viewer; when
/// `double_sided` is false, back faces are not hit.
#[inline]
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3, double_sided: bool) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < TRI_EPSILON || (!double_sided && det < 0.0) {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t >= 0.0 && t <= ray.far).then_some(t)
}

/// Indexed triangle list already transformed to world space.
#[derive(Clone, Debug, Default)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl TriMesh {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(positions.iter().copied());
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            flat_normals(&positions, &indices)
        };
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    /// Builds a mesh from local-space data and a node transform.
    pub fn transformed(
        positions: &[Vec3],
        normals: &[Vec3],
        indices: Vec<u32>,
        world: Mat4,
    ) -> Self {
        let normal_mat = world.inverse().transpose();
        let world_pos = positions.iter().map(|p| world.transform_point3(*p)).collect();
        let world_nrm = normals
            .iter()
            .map(|n| normal_mat.transform_vector3(*n).normalize_or_zero())
            .collect();
        // Mirroring transforms flip winding; restore counter-clockwise fronts.
        let indices = if world.determinant() < 0.0 {
            indices
                .chunks_exact(3)
                .flat_map(|t| [t[0], t[2], t[1]])
                .collect()
        } else {
            indices
        };
        Self::new(world_pos, world_nrm, indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |t| {
            Some([
                *self.positions.get(t[0] as usize)?,
                *self.positions.get(t[1] as usize)?,
                *self.positions.get(t[2] as usize)?,
            ])
        })
    }

    /// Nearest hit distance along the ray, if any.
    pub fn raycast(&self, ray: &Ray, double_sided: bool) -> Option<f32> {
        self.bounds.ray_entry(ray)?;
        let mut best: Option<f32> = None;
        for [a, b, c] in self.triangles() {
            if let Some(t) = ray_triangle(ray, a, b, c, double_sided) {
                match best {
                    Some(bt) if t >= bt => {}
                    _ => best = Some(t),
                }
            }
        }
        best
    }
}

fn flat_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for t in indices.chunks_exact(3) {
        let (ia, ib, ic) = (t[0] as usize, t[1] as usize, t[2] as usize);
        if ia >= positions.len() || ib >= positions.len() || ic >= positions.len() {
            continue;
        }
        let n = (positions[ib] - positions[ia]).cross(positions[ic] - positions[ia]);
        normals[ia] += n;
        normals[ib] += n;
        normals[ic] += n;
    }
    for n in &mut normals {
        let unit = n.normalize_or_zero();
        *n = if unit == Vec3::ZERO { Vec3::Y } else { unit };
    }
    normals
}
