//! Binary glTF (GLB) to [`SceneAsset`].
//!
//! Only self-contained assets are supported: all geometry must live in the
//! GLB binary chunk. Textures are ignored; materials contribute their base
//! color factor, alpha mode and double-sidedness.

use super::geometry::TriMesh;
use super::scene::{Material, SceneAsset, SceneMesh};
use glam::{Mat4, Vec3};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("asset has no scene")]
    NoScene,
    #[error("GLB binary chunk missing")]
    MissingBlob,
    #[error("external buffer {0:?} is not supported")]
    ExternalBuffer(String),
}

pub fn parse_glb(bytes: &[u8]) -> Result<SceneAsset, SceneError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = document
        .buffers()
        .map(|b| match b.source() {
            gltf::buffer::Source::Bin => blob.as_deref().ok_or(SceneError::MissingBlob),
            gltf::buffer::Source::Uri(uri) => Err(SceneError::ExternalBuffer(uri.to_string())),
        })
        .collect::<Result<Vec<&[u8]>, _>>()?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(SceneError::NoScene)?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes);
    }
    log::debug!("[assets] parsed {} meshes", meshes.len());
    Ok(SceneAsset { meshes })
}

fn collect_node(node: &gltf::Node, parent: Mat4, buffers: &[&[u8]], out: &mut Vec<SceneMesh>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = node.name().or_else(|| mesh.name()).unwrap_or_default();
        for prim in mesh.primitives() {
            if prim.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = prim.reader(|b| buffers.get(b.index()).copied());
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from).collect();
            let normals: Vec<Vec3> = reader
                .read_normals()
                .map(|n| n.map(Vec3::from).collect())
                .unwrap_or_default();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(ix) => ix.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            out.push(SceneMesh {
                name: name.to_string(),
                geometry: TriMesh::transformed(&positions, &normals, indices, world),
                material: material_from(&prim.material()),
            });
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn material_from(mat: &gltf::Material) -> Material {
    let color = mat.pbr_metallic_roughness().base_color_factor();
    Material {
        base_color: color,
        opacity: color[3],
        transparent: mat.alpha_mode() == gltf::material::AlphaMode::Blend,
        depth_write: true,
        double_sided: mat.double_sided(),
    }
}
