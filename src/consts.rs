// Floating point comparisons, hit threshold and surface offsets
pub const EPSILON: f64 = 0.00001;

// Render defaults
pub const DEFAULT_CHUNK_SIZE: usize = 50;
pub const DEFAULT_CANVAS_WIDTH: usize = 384;
pub const DEFAULT_CANVAS_HEIGHT: usize = 216;
pub const DEFAULT_OUT_FILE: &str = "./out.ppm";

// PPM output
pub const PPM_MAX_COLOR: f64 = 255.0;
pub const PPM_LINE_WIDTH: usize = 70;
