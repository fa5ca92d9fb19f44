//! Browser-side state shared by event handlers and the frame loop.

use crate::constants::{CAMERA_FOV_DEG, CAMERA_START_EYE, CAMERA_ZFAR, CAMERA_ZNEAR};
use crate::core::{
    ApartmentStore, Camera, CameraRig, DebugMode, HoverAnimator, MobileMenu, OrbitControls,
    OrbitSettings, PanEnvelope, PopupState, ProcessedScene,
};
use crate::storage::LocalStorage;
use glam::Vec3;

pub struct Viewer {
    pub store: ApartmentStore,
    pub building: Option<ProcessedScene>,
    pub ground: Option<ProcessedScene>,
    /// Bumped whenever a scene is replaced so the renderer re-uploads.
    pub revision: u32,
    pub rig: CameraRig,
    pub hover: HoverAnimator,
    pub debug: DebugMode,
    pub popup: PopupState,
    pub menu: MobileMenu,
    pub storage: LocalStorage,
}

impl Viewer {
    pub fn new(store: ApartmentStore, storage: LocalStorage, url_debug: bool) -> Self {
        let debug = DebugMode::initial(url_debug, &storage);
        let camera = Camera {
            eye: Vec3::from(CAMERA_START_EYE),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        };
        let controls = OrbitControls::new(&camera, OrbitSettings::default());
        Self {
            store,
            building: None,
            ground: None,
            revision: 0,
            rig: CameraRig::new(camera, controls, PanEnvelope::default()),
            hover: HoverAnimator::new(debug.baseline_opacity()),
            debug,
            popup: PopupState::default(),
            menu: MobileMenu::default(),
            storage,
        }
    }

    /// Installs a freshly processed building at the current baseline opacity.
    pub fn set_building(&mut self, mut scene: ProcessedScene) {
        self.hover
            .set_baseline(&mut scene, self.debug.baseline_opacity());
        self.building = Some(scene);
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn set_ground(&mut self, scene: ProcessedScene) {
        self.ground = Some(scene);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Flips debug mode, persists it and re-bases every click region.
    pub fn toggle_debug(&mut self) -> bool {
        let on = self.debug.toggle(&mut self.storage);
        let baseline = self.debug.baseline_opacity();
        match self.building.as_mut() {
            Some(scene) => self.hover.set_baseline(scene, baseline),
            None => self.hover.set_baseline(&mut Vec::<f32>::new(), baseline),
        }
        on
    }
}
