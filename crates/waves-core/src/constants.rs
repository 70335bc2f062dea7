/// Tuning constants for the wave scene.
///
/// The audio mapping values are empirically tuned; they are kept verbatim so
/// the look of the piece does not drift.
// Uniform names shared by both wave layers
pub const U_TIME: &str = "u_time";
pub const U_RESOLUTION: &str = "u_resolution";
pub const U_MOUSE: &str = "u_mouse";
pub const U_POINTSIZE: &str = "u_pointsize";
pub const U_NOISE_FREQ_1: &str = "u_noise_freq_1";
pub const U_NOISE_FREQ_2: &str = "u_noise_freq_2";
pub const U_NOISE_AMP_1: &str = "u_noise_amp_1";
pub const U_NOISE_AMP_2: &str = "u_noise_amp_2";
pub const U_SPD_MODIFIER_1: &str = "u_spd_modifier_1";
pub const U_SPD_MODIFIER_2: &str = "u_spd_modifier_2";
pub const U_OFFSET_Y: &str = "u_offset_y";

// Audio analysis
pub const ANALYSER_FFT_SIZE: u32 = 128;
pub const AUDIO_BIN_COUNT: usize = 12;
pub const AUDIO_NORMALIZER: f32 = 1000.0;
pub const AUDIO_MIN_AMPLITUDE: f32 = 0.0;
pub const AUDIO_MAX_AMPLITUDE: f32 = 2.5;
pub const AUDIO_NOISE_FLOOR: f32 = 0.3;
pub const AUDIO_QUANTUM: f32 = 0.1; // one decimal place
pub const AUDIO_TWEEN_SEC: f32 = 1.0;
pub const AUDIO_TRACK_URL: &str = "/audio/short.m4a";

// Amplitude -> uniform mappings (target = amp * scale + offset)
pub const BACK_AMP_SCALE: f32 = 0.1;
pub const BACK_AMP_OFFSET: f32 = 0.4;
pub const FRONT_AMP_SCALE: f32 = 0.1;
pub const FRONT_AMP_OFFSET: f32 = 0.15;
pub const BACK_FREQ_SCALE: f32 = 0.4;
pub const BACK_FREQ_OFFSET: f32 = 0.3;
pub const FRONT_FREQ_SCALE: f32 = 0.02;
pub const FRONT_FREQ_OFFSET: f32 = 0.5;
pub const BACK_LIFT_SCALE: f32 = 0.115;
pub const BACK_LIFT_OFFSET: f32 = 0.31;
pub const FRONT_LIFT_SCALE: f32 = 0.01;
pub const FRONT_LIFT_OFFSET: f32 = 0.04;

// Speed buttons
pub const CONTROL_TWEEN_SEC: f32 = 3.0;
pub const SPEED_UP_SPD: f32 = 0.6;
pub const SPEED_UP_FREQ: f32 = 1.6;
pub const SPEED_DOWN_SPD_1: f32 = 0.15;
pub const SPEED_DOWN_SPD_2: f32 = 0.1;
pub const SPEED_DOWN_FREQ: f32 = 1.0;

// Camera
pub const CAMERA_FOV_DEG: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 10.0;
pub const CAMERA_EYE: [f32; 3] = [0.1, 0.1, 2.0];

// Orbit controls
pub const ORBIT_DAMPING_PER_SEC: f32 = 3.0;
pub const ORBIT_RAD_PER_PX: f32 = 0.005;
pub const ORBIT_PITCH_LIMIT: f32 = 1.5; // just short of straight up/down

// Layer placement
pub const LAYER_ROTATION_X: f32 = std::f32::consts::FRAC_PI_2;
pub const LAYER_ROTATION_Z: f32 = std::f32::consts::PI / 1.9;

// Scene background (#0d1214), also the fog color
pub const CLEAR_COLOR: [f32; 3] = [0.051, 0.071, 0.078];

// Linear distance fog, view-space units
pub const FOG_NEAR: f32 = 1.0;
pub const FOG_FAR: f32 = 4.0;

// Post-processing defaults
pub const BLOOM_STRENGTH: f32 = 0.9;
pub const BLOOM_THRESHOLD: f32 = 0.08;
pub const BLOOM_RADIUS: f32 = 0.1;

// Stats
pub const FPS_REPORT_INTERVAL_SEC: f64 = 1.0;
