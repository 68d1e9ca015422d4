//! Browser facade
//!
//! The JavaScript renderer owns the presentation loop and the three shaded
//! scenes. Each animation frame it calls `frame(time)` (or `update(dt)`), then
//! copies `mesh_transforms(mode)` onto its meshes.

use wasm_bindgen::prelude::*;

use crate::config::{ShadingMode, SimConfig};
use crate::consts::FRAME_DT;
use crate::sim::Simulation;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // A logger is already installed (hot reload); keep using it
        return;
    }
    log::info!("Chain reaction core loaded");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct ChainReaction {
    sim: Simulation,
    last_time: f64,
}

#[wasm_bindgen]
impl ChainReaction {
    /// Build from an optional JSON configuration (defaults otherwise)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ChainReaction, JsValue> {
        let config = match config_json {
            Some(json) => SimConfig::from_json(&json).map_err(to_js)?,
            None => SimConfig::default(),
        };
        Ok(Self {
            sim: Simulation::new(config).map_err(to_js)?,
            last_time: 0.0,
        })
    }

    /// Advance by an explicit step (seconds); returns the number of transitions
    pub fn update(&mut self, dt: f32) -> Result<u32, JsValue> {
        let report = self.sim.tick(dt).map_err(to_js)?;
        Ok(report.transitions.len() as u32)
    }

    /// Advance from a requestAnimationFrame timestamp (milliseconds)
    pub fn frame(&mut self, time_ms: f64) -> Result<u32, JsValue> {
        let dt = if self.last_time > 0.0 {
            ((time_ms - self.last_time) / 1000.0) as f32
        } else {
            FRAME_DT
        };
        self.last_time = time_ms;
        self.update(dt.max(0.0))
    }

    /// Current sequencer state name
    pub fn state(&self) -> String {
        format!("{:?}", self.sim.controller_state())
    }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.last_time = 0.0;
    }

    /// Full state as JSON for debugging overlays
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.sim.snapshot()).map_err(to_js)
    }

    /// Spotlight target as [x, y, z]
    pub fn focus(&self) -> js_sys::Float32Array {
        let p = self.sim.focus_point();
        js_sys::Float32Array::from(&[p.x, p.y, p.z][..])
    }

    /// Mesh labels for `mode`, in the order used by `mesh_transforms`
    pub fn mesh_labels(&self, mode: &str) -> Result<js_sys::Array, JsValue> {
        let mode = parse_mode(mode)?;
        Ok(self
            .sim
            .scene()
            .iter()
            .filter(|(_, m)| m.shading == mode)
            .map(|(_, m)| JsValue::from_str(&m.label))
            .collect())
    }

    /// Packed [x, y, z, rotation_z] per mesh of `mode` (parent-relative)
    pub fn mesh_transforms(&self, mode: &str) -> Result<js_sys::Float32Array, JsValue> {
        let mode = parse_mode(mode)?;
        let packed: Vec<f32> = self
            .sim
            .scene()
            .iter()
            .filter(|(_, m)| m.shading == mode)
            .flat_map(|(_, m)| {
                [
                    m.translation.x,
                    m.translation.y,
                    m.translation.z,
                    m.rotation_z,
                ]
            })
            .collect();
        Ok(js_sys::Float32Array::from(&packed[..]))
    }
}

fn parse_mode(name: &str) -> Result<ShadingMode, JsValue> {
    ShadingMode::from_name(name)
        .ok_or_else(|| JsValue::from_str(&format!("unknown shading mode: {name}")))
}
