// Host-side tests for scene classification, picking and GLB import.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
#[path = "../src/core/mod.rs"]
mod core;

use crate::core::constants::{OPACITY_DEBUG, OPACITY_HIDDEN};
use crate::core::*;
use glam::Vec3;

const STORE: &str = r#"{
  "APT_A01": { "status": "sold" },
  "APT_A02": { "status": "Available" }
}"#;

/// Unit quad in the plane z = `z`, centered on (`cx`, `cy`). Front face
/// looks down +Z when `toward_pos_z`, otherwise down -Z.
fn quad(name: &str, cx: f32, cy: f32, z: f32, half: f32, toward_pos_z: bool) -> SceneMesh {
    let positions = vec![
        Vec3::new(cx - half, cy - half, z),
        Vec3::new(cx + half, cy - half, z),
        Vec3::new(cx + half, cy + half, z),
        Vec3::new(cx - half, cy + half, z),
    ];
    let indices = if toward_pos_z {
        vec![0, 1, 2, 0, 2, 3]
    } else {
        vec![0, 2, 1, 0, 3, 2]
    };
    SceneMesh {
        name: name.to_string(),
        geometry: TriMesh::new(positions, Vec::new(), indices),
        material: Material::default(),
    }
}

fn building() -> SceneAsset {
    SceneAsset {
        meshes: vec![
            quad("Facade", 0.0, 0.0, 0.0, 5.0, true),
            quad("AC_APT_A01", -2.0, 0.0, 1.0, 1.0, true),
            quad("AC_APT_A02", 2.0, 0.0, 1.0, 1.0, true),
            quad("AC_UNKNOWN", 2.0, 3.0, 1.0, 0.5, true),
            quad("AC_", -2.0, 3.0, 1.0, 0.5, true),
            // hidden behind the facade from the +Z side
            quad("AC_APT_A02", 0.0, -3.0, -1.0, 0.5, true),
        ],
    }
}

fn ray_down_z(x: f32, y: f32) -> Ray {
    Ray::new(Vec3::new(x, y, 20.0), Vec3::NEG_Z, 100.0)
}

#[test]
fn classification_partitions_every_mesh_once() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&building(), &store);
    let p = &scene.partition;
    assert_eq!(p.interactive.len(), 5);
    assert_eq!(p.collidable, vec![MeshId(0)]);
    assert!(p.decorative.is_empty());

    let ids: Vec<&str> = p.interactive.iter().map(|r| r.apartment_id.as_str()).collect();
    assert_eq!(ids, ["APT_A01", "APT_A02", "UNKNOWN", "", "APT_A02"]);
    assert!(p.interactive[0].has_record);
    assert!(!p.interactive[2].has_record);
}

#[test]
fn click_regions_get_status_material() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&building(), &store);
    let sold = &scene.partition.interactive[0];
    assert_eq!(sold.color_hex, "#ec4747");
    assert_eq!(scene.partition.interactive[1].color_hex, "#61ff61");
    assert_eq!(scene.partition.interactive[2].color_hex, "#cccccc");

    let m = &scene.mesh(sold.mesh).unwrap().material;
    assert_eq!(m.opacity, 0.0);
    assert!(m.transparent);
    assert!(!m.depth_write);
    assert!(m.double_sided);
    let [r, g, b] = hex_to_linear_rgb("#ec4747");
    assert_eq!(&m.base_color[..3], &[r, g, b]);

    // walls keep their own material
    assert_eq!(scene.meshes[0].material, Material::default());
}

#[test]
fn sold_region_keeps_its_color_across_debug_modes() {
    let store = ApartmentStore::from_json(r#"{ "APT_A01": { "status": "sold" } }"#).unwrap();
    let asset = SceneAsset {
        meshes: vec![quad("AC_APT_A01", 0.0, 0.0, 0.0, 1.0, true)],
    };
    let mut scene = process_building(&asset, &store);
    assert_eq!(scene.partition.interactive[0].color_hex, "#ec4747");
    let color = scene.meshes[0].material.base_color;
    assert_eq!(scene.region_opacity(0), Some(OPACITY_HIDDEN));

    let mut hover = HoverAnimator::new(OPACITY_HIDDEN);
    hover.set_baseline(&mut scene, OPACITY_DEBUG);
    assert_eq!(scene.region_opacity(0), Some(0.3));
    assert_eq!(scene.meshes[0].material.base_color, color);

    hover.set_baseline(&mut scene, OPACITY_HIDDEN);
    assert_eq!(scene.region_opacity(0), Some(0.0));
    assert_eq!(scene.meshes[0].material.base_color, color);
}

#[test]
fn opaque_materials_draw_fully_opaque() {
    let authored = Material {
        base_color: [1.0, 1.0, 1.0, 0.4],
        opacity: 0.4,
        ..Material::default()
    };
    assert_eq!(authored.draw_alpha(), 1.0);

    let blended = Material {
        transparent: true,
        ..authored.clone()
    };
    assert_eq!(blended.draw_alpha(), 0.4);
    assert_eq!(authored.click_plane("#ec4747").draw_alpha(), 0.0);
}

#[test]
fn region_meshes_follow_click_region_order() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&building(), &store);
    let expected: Vec<MeshId> = scene.partition.interactive.iter().map(|r| r.mesh).collect();
    assert_eq!(scene.partition.region_meshes, expected);
    assert_eq!(scene.region_for_mesh(MeshId(2)), Some(1));
    assert_eq!(scene.region_for_mesh(MeshId(0)), None);
    assert!(process_static(&building(), &ModelTransform::default())
        .partition
        .region_meshes
        .is_empty());
}

#[test]
fn processing_never_mutates_the_asset() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let asset = building();
    let mut first = process_building(&asset, &store);
    first.set_region_opacity(0, 0.7);
    assert!(asset.meshes.iter().all(|m| m.material == Material::default()));

    let second = process_building(&asset, &store);
    assert_eq!(second.region_opacity(0), Some(0.0));
    assert_eq!(second.partition.interactive, first.partition.interactive);
}

#[test]
fn click_on_region_yields_apartment_id() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&building(), &store);
    assert_eq!(scene.clicked_apartment(&ray_down_z(-2.0, 0.0)), Some("APT_A01"));
    assert_eq!(scene.clicked_apartment(&ray_down_z(2.0, 0.0)), Some("APT_A02"));
    // unknown ids are still reported; the popup decides what to show
    assert_eq!(scene.clicked_apartment(&ray_down_z(2.0, 3.0)), Some("UNKNOWN"));
}

#[test]
fn clicks_on_walls_and_empty_ids_are_ignored() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&building(), &store);
    // facade only
    assert_eq!(scene.clicked_apartment(&ray_down_z(4.0, -4.0)), None);
    // a region named exactly "AC_"
    assert_eq!(scene.clicked_apartment(&ray_down_z(-2.0, 3.0)), None);
    // region behind the facade is occluded
    assert_eq!(scene.clicked_apartment(&ray_down_z(0.0, -3.0)), None);
    // nothing at all
    assert_eq!(scene.clicked_apartment(&ray_down_z(50.0, 50.0)), None);
}

#[test]
fn pick_reports_region_index_and_distance() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&building(), &store);
    let hit = scene.pick(&ray_down_z(2.0, 0.0)).unwrap();
    assert_eq!(hit.region, Some(1));
    assert_eq!(hit.mesh, MeshId(2));
    assert!((hit.distance - 19.0).abs() < 1e-4);

    let wall = scene.pick(&ray_down_z(4.0, 4.0)).unwrap();
    assert_eq!(wall.region, None);
    assert!((wall.distance - 20.0).abs() < 1e-4);
}

#[test]
fn building_bounds_include_click_regions() {
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&building(), &store);
    let b = scene.bounds();
    assert_eq!(b.min, Vec3::new(-5.0, -5.0, -1.0));
    assert_eq!(b.max, Vec3::new(5.0, 5.0, 1.0));
}

#[test]
fn static_model_is_decorative_and_transformed() {
    let ground = SceneAsset {
        meshes: vec![quad("Ground", 0.0, 0.0, 0.0, 1.0, true)],
    };
    let transform = ModelTransform {
        position: Vec3::new(0.0, -1.0, 0.0),
        ..Default::default()
    }
    .with_uniform_scale(10.0);
    let scene = process_static(&ground, &transform);
    assert!(scene.partition.interactive.is_empty());
    assert!(scene.partition.collidable.is_empty());
    assert_eq!(scene.partition.decorative, vec![MeshId(0)]);
    let b = scene.bounds();
    assert!((b.min.x + 10.0).abs() < 1e-4 && (b.max.x - 10.0).abs() < 1e-4);
    assert!((b.min.y + 11.0).abs() < 1e-4 && (b.max.y - 9.0).abs() < 1e-4);
    // the shared asset keeps its original size
    assert_eq!(ground.bounds().max.x, 1.0);
}

#[test]
fn mirrored_transform_keeps_front_faces() {
    let ground = SceneAsset {
        meshes: vec![quad("Ground", 0.0, 0.0, 0.0, 1.0, true)],
    };
    let transform = ModelTransform {
        scale: Vec3::new(-1.0, 1.0, 1.0),
        ..Default::default()
    };
    let scene = process_static(&ground, &transform);
    let mesh = &scene.meshes[0];
    assert!(mesh.geometry.raycast(&ray_down_z(0.2, 0.2), false).is_some());
}

#[test]
fn single_sided_triangles_cull_back_faces() {
    let a = Vec3::new(-1.0, -1.0, 0.0);
    let b = Vec3::new(1.0, -1.0, 0.0);
    let c = Vec3::new(0.0, 1.0, 0.0);
    let front = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 10.0);
    let back = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 10.0);
    assert_eq!(ray_triangle(&front, a, b, c, false), Some(5.0));
    assert_eq!(ray_triangle(&back, a, b, c, false), None);
    assert_eq!(ray_triangle(&back, a, b, c, true), Some(5.0));
    // beyond the far cut-off
    let short = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 4.0);
    assert_eq!(ray_triangle(&short, a, b, c, true), None);
}

#[test]
fn hex_colors_convert_to_linear() {
    assert_eq!(hex_to_linear_rgb("#ffffff"), [1.0, 1.0, 1.0]);
    assert_eq!(hex_to_linear_rgb("000000"), [0.0, 0.0, 0.0]);
    let gray = hex_to_linear_rgb("not a color");
    assert!((gray[0] - srgb_to_linear(0.5)).abs() < 1e-6);
}

// --- GLB import ---

fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

fn quad_bin() -> Vec<u8> {
    let positions: [[f32; 3]; 4] = [
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ];
    let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
    let mut bin = Vec::new();
    for p in positions.iter().flatten() {
        bin.extend_from_slice(&p.to_le_bytes());
    }
    for i in indices {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin
}

const QUAD_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [ { "nodes": [0, 1] } ],
  "nodes": [
    { "name": "Wall", "mesh": 0 },
    { "name": "AC_APT_A01", "mesh": 0, "translation": [0.0, 0.0, 1.0], "children": [2] },
    { "mesh": 0, "translation": [0.0, 3.0, 0.0] }
  ],
  "meshes": [ { "name": "quad", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] } ],
  "buffers": [ { "byteLength": 60 } ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 48, "target": 34962 },
    { "buffer": 0, "byteOffset": 48, "byteLength": 12, "target": 34963 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3",
      "min": [-1.0, -1.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5123, "count": 6, "type": "SCALAR" }
  ]
}"#;

#[test]
fn glb_meshes_are_flattened_to_world_space() {
    let asset = parse_glb(&glb(QUAD_GLTF, &quad_bin())).expect("valid glb");
    let names: Vec<&str> = asset.meshes.iter().map(|m| m.name.as_str()).collect();
    // unnamed node falls back to the mesh name
    assert_eq!(names, ["Wall", "AC_APT_A01", "quad"]);

    let region = &asset.meshes[1].geometry;
    assert_eq!(region.triangle_count(), 2);
    assert_eq!(region.bounds.min.z, 1.0);
    assert_eq!(region.bounds.max.z, 1.0);

    // child inherits the parent's translation
    let child = &asset.meshes[2].geometry.bounds;
    assert_eq!(child.min, Vec3::new(-1.0, 2.0, 1.0));
    assert_eq!(child.max, Vec3::new(1.0, 4.0, 1.0));

    // missing normals are derived from the winding
    for n in &asset.meshes[0].geometry.normals {
        assert!((*n - Vec3::Z).length() < 1e-5);
    }
}

#[test]
fn glb_feeds_scene_processing() {
    let asset = parse_glb(&glb(QUAD_GLTF, &quad_bin())).unwrap();
    let store = ApartmentStore::from_json(STORE).unwrap();
    let scene = process_building(&asset, &store);
    assert_eq!(scene.partition.interactive.len(), 1);
    assert_eq!(scene.partition.collidable.len(), 2);
    assert_eq!(scene.clicked_apartment(&ray_down_z(0.0, 0.0)), Some("APT_A01"));
}

#[test]
fn garbage_is_not_a_glb() {
    assert!(parse_glb(b"definitely not a model").is_err());
}
