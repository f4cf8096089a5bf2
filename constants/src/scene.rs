use bevy::color::Color;

/// Camera entry animation: pulls back from `CAMERA_START` to `CAMERA_REST`.
pub const CAMERA_START: [f32; 3] = [0.0, 1.0, 12.0];
pub const CAMERA_REST: [f32; 3] = [0.0, 0.0, 7.5];
pub const CAMERA_INTRO_DURATION: f32 = 2.5;
pub const CAMERA_FOV_DEGREES: f32 = 30.0;

/// Exponential smoothing rate (1/s) for pointer-reactive transforms.
pub const POINTER_DAMPING: f32 = 6.0;

/// Hero object sway and float.
pub const HERO_SWAY_SPEED: f32 = 0.3;
pub const HERO_SWAY_AMPLITUDE: f32 = 0.2;
pub const HERO_FLOAT_SPEED: f32 = 1.0;
pub const HERO_FLOAT_AMPLITUDE: f32 = 0.1;
pub const HERO_POINTER_YAW: f32 = 0.5;
pub const HERO_POINTER_PITCH: f32 = 0.2;
pub const HERO_BASE_YAW: f32 = -std::f32::consts::FRAC_PI_4;

/// Bean field scatter volume.
pub const BEAN_SPREAD_XY: f32 = 22.0;
pub const BEAN_SPREAD_Z: f32 = 8.0;
pub const BEAN_DEPTH_OFFSET: f32 = -2.0;
pub const BEAN_POINTER_PUSH: f32 = 0.5;

/// Sparkle drift volume.
pub const SPARKLE_SCALE: f32 = 5.0;
pub const SPARKLE_SPEED: f32 = 0.5;

/// Palette.
pub const LAVENDER: Color = Color::srgb(0.710, 0.627, 0.851);
pub const LAVENDER_DARK: Color = Color::srgb(0.431, 0.361, 0.561);
pub const HANDLE_BLACK: Color = Color::srgb(0.102, 0.102, 0.102);
pub const BEAN_BROWN: Color = Color::srgb(0.243, 0.153, 0.137);
pub const SPARKLE_TINT: Color = Color::srgb(0.847, 0.749, 0.847);
pub const KEY_LIGHT: Color = Color::WHITE;
pub const RIM_LIGHT: Color = Color::srgb(0.847, 0.749, 0.847);

/// Viewport width (px) under which the device counts as constrained.
pub const CONSTRAINED_WIDTH: f32 = 768.0;

/// Detail budget on full-capability devices.
pub mod full {
    pub const SEGMENTS: u32 = 8;
    pub const BEAN_RINGS: u32 = 8;
    pub const BEAN_LONGITUDES: u32 = 16;
    pub const BEAN_COUNT: usize = 35;
    pub const SPARKLE_COUNT: usize = 25;
    pub const SHADOWS: bool = true;
    pub const HERO_SCALE: f32 = 0.85;
    pub const HERO_OFFSET: [f32; 3] = [0.2, -0.2, 0.0];
}

/// Detail budget on constrained devices.
pub mod constrained {
    pub const SEGMENTS: u32 = 6;
    pub const BEAN_RINGS: u32 = 4;
    pub const BEAN_LONGITUDES: u32 = 8;
    pub const BEAN_COUNT: usize = 12;
    pub const SPARKLE_COUNT: usize = 8;
    pub const SHADOWS: bool = false;
    pub const HERO_SCALE: f32 = 0.65;
    pub const HERO_OFFSET: [f32; 3] = [0.0, 0.5, 0.0];
}
