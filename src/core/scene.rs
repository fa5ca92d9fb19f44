//! Loaded scene assets and the one-time processing that turns them into a
//! classified, renderable scene.
//!
//! A [`SceneAsset`] is immutable once parsed and may be shared between mounts.
//! Processing always works on a copy, so running it twice on the same asset
//! gives the same result and never touches the original.

use super::apartments::{status_color, ApartmentStore};
use super::constants::{CLICK_PLANE_PREFIX, OPACITY_HIDDEN};
use super::geometry::{Aabb, Ray, TriMesh};
use super::tween::RegionOpacity;
use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Linear RGB plus the authored alpha.
    pub base_color: [f32; 4],
    pub opacity: f32,
    pub transparent: bool,
    pub depth_write: bool,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            double_sided: false,
        }
    }
}

impl Material {
    /// Copy of `self` turned into a click-region surface: status color,
    /// fully transparent, double-sided and never writing depth.
    pub fn click_plane(&self, color_hex: &str) -> Self {
        let [r, g, b] = hex_to_linear_rgb(color_hex);
        let mut m = self.clone();
        m.base_color = [r, g, b, 1.0];
        m.opacity = OPACITY_HIDDEN;
        m.transparent = true;
        m.depth_write = false;
        m.double_sided = true;
        m
    }

    /// Alpha written for a draw. Opaque materials ignore their authored alpha.
    pub fn draw_alpha(&self) -> f32 {
        if self.transparent {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneMesh {
    pub name: String,
    pub geometry: TriMesh,
    pub material: Material,
}

/// A parsed 3D asset: a flat list of world-space meshes.
#[derive(Clone, Debug, Default)]
pub struct SceneAsset {
    pub meshes: Vec<SceneMesh>,
}

impl SceneAsset {
    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .fold(Aabb::EMPTY, |acc, m| acc.union(&m.geometry.bounds))
    }
}

/// Placement of a static model in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelTransform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl ModelTransform {
    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let r = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, r, self.position)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

/// An apartment click region found in the building.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickRegion {
    pub mesh: MeshId,
    /// Mesh name with the reserved prefix removed. May be empty.
    pub apartment_id: String,
    pub has_record: bool,
    pub color_hex: &'static str,
}

/// Role of every mesh, decided once when the scene is processed.
#[derive(Clone, Debug, Default)]
pub struct ScenePartition {
    pub interactive: Vec<ClickRegion>,
    /// Mesh of each click region, in `interactive` order.
    pub region_meshes: Vec<MeshId>,
    pub collidable: Vec<MeshId>,
    pub decorative: Vec<MeshId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub mesh: MeshId,
    pub distance: f32,
    /// Index into `ScenePartition::interactive` when the hit is a click region.
    pub region: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct ProcessedScene {
    pub meshes: Vec<SceneMesh>,
    pub partition: ScenePartition,
}

/// Apartment id carried by a click-region mesh name.
pub fn apartment_id_from_name(name: &str) -> Option<&str> {
    name.strip_prefix(CLICK_PLANE_PREFIX)
}

/// Clones and classifies the building. Click regions get a new material
/// colored by apartment status; every other mesh is collidable.
pub fn process_building(asset: &SceneAsset, store: &ApartmentStore) -> ProcessedScene {
    let mut meshes = asset.meshes.clone();
    let mut partition = ScenePartition::default();

    for (i, mesh) in meshes.iter_mut().enumerate() {
        match apartment_id_from_name(&mesh.name) {
            Some(id) => {
                let record = store.get(id);
                let color_hex = status_color(record.and_then(|r| r.status_text()));
                mesh.material = mesh.material.click_plane(color_hex);
                partition.region_meshes.push(MeshId(i));
                partition.interactive.push(ClickRegion {
                    mesh: MeshId(i),
                    apartment_id: id.to_string(),
                    has_record: record.is_some(),
                    color_hex,
                });
            }
            None => partition.collidable.push(MeshId(i)),
        }
    }

    log::info!(
        "[scene] building processed: {} click planes, {} colliders",
        partition.interactive.len(),
        partition.collidable.len()
    );
    ProcessedScene { meshes, partition }
}

/// Clones a static model into decorative-only geometry placed by `transform`.
pub fn process_static(asset: &SceneAsset, transform: &ModelTransform) -> ProcessedScene {
    let m = transform.matrix();
    let meshes: Vec<SceneMesh> = asset
        .meshes
        .iter()
        .map(|mesh| {
            let geometry = if transform.is_identity() {
                mesh.geometry.clone()
            } else {
                TriMesh::transformed(
                    &mesh.geometry.positions,
                    &mesh.geometry.normals,
                    mesh.geometry.indices.clone(),
                    m,
                )
            };
            SceneMesh {
                name: mesh.name.clone(),
                geometry,
                material: mesh.material.clone(),
            }
        })
        .collect();
    let decorative = (0..meshes.len()).map(MeshId).collect();
    ProcessedScene {
        meshes,
        partition: ScenePartition {
            decorative,
            ..Default::default()
        },
    }
}

impl ProcessedScene {
    pub fn mesh(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(id.0)
    }

    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .fold(Aabb::EMPTY, |acc, m| acc.union(&m.geometry.bounds))
    }

    pub fn region(&self, index: usize) -> Option<&ClickRegion> {
        self.partition.interactive.get(index)
    }

    /// Index of the click region for a mesh, if it is one.
    pub fn region_for_mesh(&self, id: MeshId) -> Option<usize> {
        self.partition.region_meshes.iter().position(|&m| m == id)
    }

    /// Nearest hit against the given meshes.
    pub fn raycast_meshes(&self, ids: &[MeshId], ray: &Ray) -> Option<(MeshId, f32)> {
        let mut best: Option<(MeshId, f32)> = None;
        for &id in ids {
            let Some(mesh) = self.meshes.get(id.0) else {
                continue;
            };
            if let Some(t) = mesh.geometry.raycast(ray, mesh.material.double_sided) {
                match best {
                    Some((_, bt)) if t >= bt => {}
                    _ => best = Some((id, t)),
                }
            }
        }
        best
    }

    /// Apartment id under the ray. Only a click region that is the nearest
    /// hit counts; empty ids are ignored.
    pub fn clicked_apartment(&self, ray: &Ray) -> Option<&str> {
        let region = self.pick(ray)?.region?;
        let id = self.partition.interactive.get(region)?.apartment_id.as_str();
        (!id.is_empty()).then_some(id)
    }

    /// Nearest hit among click regions and collidable geometry. Walls in front
    /// of a click region win, so hidden regions cannot be clicked through.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        let mut candidates: SmallVec<[(MeshId, f32); 2]> = SmallVec::new();
        if let Some(hit) = self.raycast_meshes(&self.partition.region_meshes, ray) {
            candidates.push(hit);
        }
        if let Some(hit) = self.raycast_meshes(&self.partition.collidable, ray) {
            candidates.push(hit);
        }
        let (mesh, distance) = candidates
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        Some(PickHit {
            mesh,
            distance,
            region: self.region_for_mesh(mesh),
        })
    }
}

impl RegionOpacity for ProcessedScene {
    fn region_count(&self) -> usize {
        self.partition.interactive.len()
    }

    fn region_opacity(&self, region: usize) -> Option<f32> {
        let r = self.partition.interactive.get(region)?;
        self.meshes.get(r.mesh.0).map(|m| m.material.opacity)
    }

    fn set_region_opacity(&mut self, region: usize, opacity: f32) {
        if let Some(r) = self.partition.interactive.get(region) {
            if let Some(mesh) = self.meshes.get_mut(r.mesh.0) {
                mesh.material.opacity = opacity;
            }
        }
    }
}

/// Parses `#rrggbb` (or `rrggbb`) as sRGB and returns linear RGB. Invalid
/// input yields mid gray.
pub fn hex_to_linear_rgb(hex: &str) -> [f32; 3] {
    let s = hex.trim().trim_start_matches('#');
    let channel = |i: usize| -> Option<f32> {
        let byte = u8::from_str_radix(s.get(i..i + 2)?, 16).ok()?;
        Some(srgb_to_linear(byte as f32 / 255.0))
    };
    match (s.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => [r, g, b],
        _ => [srgb_to_linear(0.5); 3],
    }
}

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
