/// Airship Web - WASM frame driver for a browser-rendered airship
///
/// The page owns the WebGL scene and the `requestAnimationFrame` loop. Each
/// tick it calls [`WebAnimator::frame`] and writes the returned angle into
/// the airship object's `rotation.y` before rendering.
use wasm_bindgen::prelude::*;

use airship_core::{Direction, OscillationConfig, OscillationController, Sweep};

#[wasm_bindgen]
pub struct WebAnimator {
    controller: OscillationController,
    sweep: Sweep,
}

#[wasm_bindgen]
impl WebAnimator {
    /// Throws if the sweep configuration is invalid
    #[wasm_bindgen(constructor)]
    pub fn new(max_angle: f32, min_speed: f32, max_speed: f32) -> Result<WebAnimator, JsValue> {
        let config = OscillationConfig::new(max_angle, min_speed, max_speed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("sweep configured: {:?}", config);
        Ok(Self::with_config(config))
    }

    /// 20 degrees each way, 0.001 to 0.01 radians per frame
    pub fn default_config() -> WebAnimator {
        Self::with_config(OscillationConfig::default())
    }

    /// Advance one frame and return the new angle in radians
    pub fn frame(&mut self) -> f32 {
        self.sweep.advance(&self.controller)
    }

    pub fn angle(&self) -> f32 {
        self.sweep.angle
    }

    pub fn angle_degrees(&self) -> f32 {
        self.sweep.angle_degrees()
    }

    pub fn is_positive(&self) -> bool {
        self.sweep.direction == Direction::Positive
    }

    pub fn reset(&mut self) {
        self.sweep.reset();
    }
}

impl WebAnimator {
    fn with_config(config: OscillationConfig) -> Self {
        Self {
            controller: OscillationController::new(config),
            sweep: Sweep::new(),
        }
    }
}

#[wasm_bindgen]
pub fn deg_to_rad(deg: f32) -> f32 {
    airship_core::deg_to_rad(deg)
}

#[wasm_bindgen]
pub fn rad_to_deg(rad: f32) -> f32 {
    airship_core::rad_to_deg(rad)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier start
        return;
    }
    log::info!("airship animator loaded");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_animator_sweeps() {
        let mut animator = WebAnimator::default_config();
        assert!((animator.frame() - 0.01).abs() < 1e-7);
        assert!(animator.is_positive());

        for _ in 0..2_000 {
            animator.frame();
        }
        assert!(animator.angle_degrees().abs() < 21.0);

        animator.reset();
        assert_eq!(animator.angle(), 0.0);
        assert!(animator.is_positive());
    }

    #[test]
    fn test_custom_config() {
        let mut animator = WebAnimator::new(10.0, 0.002, 0.02).ok().unwrap();
        assert!((animator.frame() - 0.02).abs() < 1e-7);
    }
}
