//! apex-backdrop
//!
//! Decorative wgpu scenes and page effects for the Apex Auto landing page.
//! The crate runs in the browser (WebGL through wgpu) and natively for
//! development.
//!
//! High-level modules
//! - `camera`: camera, projection and their uniform
//! - `context`: GPU context of one surface; owns device, queue and pipelines
//! - `data_structures`: meshes, instances, textures and the scene graph
//! - `flow`: the per-surface scene trait and the event loop
//! - `geometry`: procedural gears, car, primitives and point clouds
//! - `page`: cursor, loader, navigation, reveal, counters, carousel, form
//! - `pipelines`: the mesh, line and point pipelines plus lighting
//! - `render`: render composition and pipeline batching
//! - `scenes`: the hero and stats scenes
//! - `scheduler`, `viewport`, `input`, `easing`, `colour`: small pure helpers
//!

pub mod camera;
pub mod colour;
pub mod context;
pub mod data_structures;
pub mod easing;
pub mod flow;
pub mod geometry;
pub mod input;
pub mod page;
pub mod pipelines;
pub mod render;
pub mod scenes;
pub mod scheduler;
pub mod viewport;

use flow::{Sizing, SurfaceSpec};
use scenes::{HeroConfig, HeroScene, StatsConfig, StatsScene};

pub const HERO_CANVAS: &str = "heroCanvas";
pub const STATS_CANVAS: &str = "statsCanvas";

/// The two surfaces of the landing page: the hero scene sized to the window
/// and the stats scene sized to its section.
pub fn landing_page(hero: HeroConfig) -> Vec<SurfaceSpec> {
    vec![
        SurfaceSpec {
            canvas_id: HERO_CANVAS,
            sizing: Sizing::Window,
            native_size: (1280, 720),
            constructors: vec![HeroScene::constructor(hero)],
        },
        SurfaceSpec {
            canvas_id: STATS_CANVAS,
            sizing: Sizing::Container,
            native_size: (960, 420),
            constructors: vec![StatsScene::constructor(StatsConfig::default())],
        },
    ]
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    flow::init_logging();
    let input = input::shared();
    page::dom::mount(input.clone())?;
    flow::run(landing_page(HeroConfig::default()), input)
        .map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{:#}", e)))
}
