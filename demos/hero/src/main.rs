//! Opens the landing page surfaces as native windows.
//!
//! `hero garage` shows the 3D car instead of the default showcase backdrop.

use apex_backdrop::scenes::HeroConfig;

fn main() -> anyhow::Result<()> {
    let hero = match std::env::args().nth(1).as_deref() {
        Some("garage") => HeroConfig::garage(),
        Some(other) => anyhow::bail!("unknown hero variant {other:?}, expected \"garage\""),
        None => HeroConfig::default(),
    };
    apex_backdrop::flow::run(apex_backdrop::landing_page(hero), apex_backdrop::input::shared())
}
