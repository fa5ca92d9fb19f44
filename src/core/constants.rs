// Shared interaction/scene tuning constants used by the web frontend.

// Scene tagging
pub const CLICK_PLANE_PREFIX: &str = "AC_"; // marks a mesh as an apartment click region

// Click region opacity
pub const OPACITY_HIDDEN: f32 = 0.0; // baseline with debug mode off
pub const OPACITY_DEBUG: f32 = 0.3; // baseline with debug mode on
pub const OPACITY_HOVER: f32 = 0.7;
pub const HOVER_TWEEN_SEC: f32 = 0.2;

// Camera collision
pub const COLLISION_MARGIN: f32 = 0.3; // safety margin in world units
pub const COLLISION_MIN_DISTANCE: f32 = 0.01; // target->camera distances below this are skipped

// Pan envelope (fixed variant)
pub const PAN_MIN_DEFAULT: [f32; 3] = [-10.0, 0.0, -10.0];
pub const PAN_MAX_DEFAULT: [f32; 3] = [10.0, 8.0, 10.0];

// Pan envelope (auto variant)
pub const PAN_PADDING_X: f32 = 2.0;
pub const PAN_PADDING_Z: f32 = 2.0;
pub const PAN_PADDING_Y: f32 = 1.0; // added above the top of the bounding box
pub const PAN_MIN_Y: f32 = 0.0;

// Status highlight palette (sRGB hex)
pub const STATUS_COLOR_SOLD: &str = "#ec4747";
pub const STATUS_COLOR_AVAILABLE: &str = "#61ff61";
pub const STATUS_COLOR_DEFAULT: &str = "#cccccc";

// Persisted debug flag
pub const DEBUG_STORAGE_KEY: &str = "debugMode";
pub const DEBUG_QUERY_PARAM: &str = "debug";

// Popup images
pub const PLAN_PLACEHOLDER_SRC: &str = "/plans/placeholder.png";
pub const FLOORPLAN_DIR: &str = "/floorplans";

// Assets
pub const BUILDING_MODEL_URL: &str = "/models/building.glb";
pub const GROUND_MODEL_URL: &str = "/models/ground.glb";
