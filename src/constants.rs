/// Web-side tuning constants.
///
/// These keep magic numbers for rendering, input and camera placement out of
/// the frame loop and event handlers.
// Device pixel ratio caps (narrow screens render at a lower ratio)
pub const DPR_MAX_DESKTOP: f64 = 2.0;
pub const DPR_MAX_MOBILE: f64 = 1.5;
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

// Pointer travel (CSS px) beyond which a press becomes an orbit drag
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 4.0;

// Initial camera
pub const CAMERA_START_EYE: [f32; 3] = [0.0, 5.0, 10.0];
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 2000.0;

// Lighting
pub const AMBIENT_INTENSITY: f32 = 0.6;
pub const KEY_LIGHT_POS: [f32; 3] = [10.0, 10.0, 5.0];
pub const KEY_LIGHT_INTENSITY: f32 = 1.0;
pub const FILL_LIGHT_POS: [f32; 3] = [-10.0, 10.0, -5.0];
pub const FILL_LIGHT_INTENSITY: f32 = 0.5;

// Opacity below which a click region is not drawn at all
pub const OVERLAY_MIN_VISIBLE_OPACITY: f32 = 0.001;

// Transparent canvas background (page styling shows through)
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 0.0];

// Frame delta clamp (seconds) so a backgrounded tab does not jump tweens
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
