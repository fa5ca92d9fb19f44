// Host-side tests for the hover opacity animation.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
#[path = "../src/core/mod.rs"]
mod core;

use crate::core::constants::{HOVER_TWEEN_SEC, OPACITY_DEBUG, OPACITY_HOVER};
use crate::core::*;

const EPS: f32 = 1e-5;

fn run(anim: &mut HoverAnimator, regions: &mut Vec<f32>, steps: usize, dt: f32) -> Vec<f32> {
    let mut samples = Vec::with_capacity(steps);
    for _ in 0..steps {
        anim.tick(regions, dt);
        samples.push(regions[0]);
    }
    samples
}

#[test]
fn easing_hits_both_ends() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert_eq!(ease_out_cubic(2.0), 1.0);
    assert!(ease_out_cubic(0.5) > 0.5);
}

#[test]
fn enter_rises_monotonically_to_hover_opacity() {
    let mut regions = vec![0.0, 0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 0);
    assert_eq!(anim.hovered(), Some(0));

    let samples = run(&mut anim, &mut regions, 20, 0.016);
    for pair in samples.windows(2) {
        assert!(pair[1] >= pair[0] - EPS, "not monotonic: {:?}", pair);
    }
    assert!(samples.iter().all(|v| (0.0..=OPACITY_HOVER + EPS).contains(v)));
    assert!((regions[0] - OPACITY_HOVER).abs() < EPS);
    assert_eq!(regions[1], 0.0);
    assert!(!anim.is_animating());
}

#[test]
fn tween_finishes_after_its_duration() {
    let mut regions = vec![0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 0);
    anim.tick(&mut regions, HOVER_TWEEN_SEC * 0.5);
    assert!(anim.is_animating());
    assert!(regions[0] > 0.0 && regions[0] < OPACITY_HOVER);
    anim.tick(&mut regions, HOVER_TWEEN_SEC);
    assert!(!anim.is_animating());
    assert_eq!(regions[0], OPACITY_HOVER);
}

#[test]
fn leave_falls_back_to_baseline() {
    let mut regions = vec![0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 0);
    run(&mut anim, &mut regions, 30, 0.016);

    anim.pointer_leave(&regions);
    assert_eq!(anim.hovered(), None);
    let samples = run(&mut anim, &mut regions, 30, 0.016);
    for pair in samples.windows(2) {
        assert!(pair[1] <= pair[0] + EPS, "not monotonic: {:?}", pair);
    }
    assert!(regions[0].abs() < EPS);
}

#[test]
fn new_hover_replaces_running_tween_from_current_value() {
    let mut regions = vec![0.0, 0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 0);
    anim.tick(&mut regions, 0.05);
    let midway = regions[0];
    assert!(midway > 0.0 && midway < OPACITY_HOVER);

    // moving to region 1 reverses region 0 from where it is now
    anim.pointer_enter(&regions, 1);
    assert_eq!(anim.hovered(), Some(1));
    let back = anim.active_tween(0).copied().unwrap();
    assert_eq!(back.from, midway);
    assert_eq!(back.to, 0.0);

    // no jump on the first tick
    anim.tick(&mut regions, 0.0);
    assert!((regions[0] - midway).abs() < EPS);

    run(&mut anim, &mut regions, 30, 0.016);
    assert!(regions[0].abs() < EPS);
    assert!((regions[1] - OPACITY_HOVER).abs() < EPS);
}

#[test]
fn entering_the_same_region_twice_keeps_the_tween() {
    let mut regions = vec![0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 0);
    anim.tick(&mut regions, 0.05);
    let before = anim.active_tween(0).copied();
    anim.pointer_enter(&regions, 0);
    assert_eq!(anim.active_tween(0).copied(), before);
}

#[test]
fn out_of_range_region_is_ignored() {
    let regions = vec![0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 5);
    assert_eq!(anim.hovered(), None);
    assert!(!anim.is_animating());
}

#[test]
fn baseline_change_snaps_only_idle_regions() {
    let mut regions = vec![0.0, 0.0, 0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 1);
    anim.tick(&mut regions, 0.05);
    let hovered_value = regions[1];

    anim.set_baseline(&mut regions, OPACITY_DEBUG);
    assert_eq!(anim.baseline(), OPACITY_DEBUG);
    assert_eq!(regions[0], OPACITY_DEBUG);
    assert_eq!(regions[2], OPACITY_DEBUG);
    assert_eq!(regions[1], hovered_value);

    // leaving now settles on the new baseline
    run(&mut anim, &mut regions, 30, 0.016);
    anim.pointer_leave(&regions);
    run(&mut anim, &mut regions, 30, 0.016);
    assert!((regions[1] - OPACITY_DEBUG).abs() < EPS);
}

#[test]
fn baseline_change_cancels_fade_out() {
    let mut regions = vec![0.0];
    let mut anim = HoverAnimator::new(0.0);
    anim.pointer_enter(&regions, 0);
    run(&mut anim, &mut regions, 30, 0.016);
    anim.pointer_leave(&regions);
    anim.tick(&mut regions, 0.05);

    anim.set_baseline(&mut regions, OPACITY_DEBUG);
    assert!(anim.active_tween(0).is_none());
    anim.tick(&mut regions, 0.05);
    assert_eq!(regions[0], OPACITY_DEBUG);
}

#[test]
fn zero_duration_jumps_to_target() {
    let mut t = OpacityTween::new(0.2, 0.9, 0.0);
    assert_eq!(t.value(), 0.9);
    assert_eq!(t.advance(0.0), 0.9);
    assert!(t.is_finished());
}
