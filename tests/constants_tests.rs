// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}

use constants::*;
use core_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn opacity_levels_are_ordered() {
    assert_eq!(OPACITY_HIDDEN, 0.0);
    assert!(OPACITY_HIDDEN < OPACITY_DEBUG);
    assert!(OPACITY_DEBUG < OPACITY_HOVER);
    assert!(OPACITY_HOVER <= 1.0);
    // hidden regions are skipped by the renderer, debug ones are not
    assert!(OPACITY_HIDDEN < OVERLAY_MIN_VISIBLE_OPACITY);
    assert!(OPACITY_DEBUG > OVERLAY_MIN_VISIBLE_OPACITY);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn timing_and_thresholds_are_positive() {
    assert!(HOVER_TWEEN_SEC > 0.0);
    assert!(HOVER_TWEEN_SEC < 1.0);
    assert!(MAX_FRAME_DT_SEC > 0.0);
    assert!(CLICK_DRAG_THRESHOLD_PX > 0.0);
    assert!(COLLISION_MARGIN > 0.0);
    assert!(COLLISION_MIN_DISTANCE > 0.0 && COLLISION_MIN_DISTANCE < COLLISION_MARGIN);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn pan_envelope_is_well_formed() {
    for axis in 0..3 {
        assert!(PAN_MIN_DEFAULT[axis] < PAN_MAX_DEFAULT[axis]);
    }
    assert!(PAN_PADDING_X >= 0.0 && PAN_PADDING_Z >= 0.0 && PAN_PADDING_Y >= 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_and_display_settings_are_sane() {
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);
    assert!(DPR_MAX_MOBILE <= DPR_MAX_DESKTOP);
    assert!(MOBILE_BREAKPOINT_PX > 0.0);
    assert_eq!(CLEAR_COLOR[3], 0.0);
}

#[test]
fn palette_and_paths_are_well_formed() {
    for hex in [STATUS_COLOR_SOLD, STATUS_COLOR_AVAILABLE, STATUS_COLOR_DEFAULT] {
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
        assert!(hex[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }
    assert!(!CLICK_PLANE_PREFIX.is_empty());
    assert!(BUILDING_MODEL_URL.ends_with(".glb"));
    assert!(GROUND_MODEL_URL.ends_with(".glb"));
    assert!(PLAN_PLACEHOLDER_SRC.starts_with('/'));
    assert!(FLOORPLAN_DIR.starts_with('/') && !FLOORPLAN_DIR.ends_with('/'));
    assert!(!DEBUG_STORAGE_KEY.is_empty() && !DEBUG_QUERY_PARAM.is_empty());
}
