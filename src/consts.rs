// Floating point comparisons, plane/cap tolerances and the default acne offset
pub const EPSILON: f64 = 0.0001;

// Maximum recursion depth for reflected and refracted rays
pub const DEFAULT_RECURSION_DEPTH: usize = 5;

// Default canvas parameters for the command line renderer
pub const DEFAULT_CANVAS_WIDTH: usize = 400;
pub const DEFAULT_CANVAS_HEIGHT: usize = 200;
pub const DEFAULT_OUT_FILE: &str = "./out.ppm";

// Common refraction indices
pub const VACUUM_RI: f64 = 1.0;
pub const AIR_RI: f64 = 1.00029;
pub const WATER_RI: f64 = 1.333;
pub const GLASS_RI: f64 = 1.5;
pub const DIAMOND_RI: f64 = 2.417;
