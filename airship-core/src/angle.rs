/// Degree/radian conversions
use std::f32::consts::PI;

pub fn deg_to_rad(deg: f32) -> f32 {
    PI * deg / 180.0
}

pub fn rad_to_deg(rad: f32) -> f32 {
    180.0 * (rad / PI)
}
