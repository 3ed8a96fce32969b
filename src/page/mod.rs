//! Page-level effects around the 3D scenes.
//!
//! Every effect is a small state machine advanced by a millisecond clock, see
//! [`timers`]. None of them touches the DOM; [`dom`] (web only) looks the
//! elements up, forwards browser events and writes the resulting classes,
//! styles and texts back. A missing element just leaves its effect unmounted.

pub mod contact;
pub mod counter;
pub mod cursor;
pub mod loader;
pub mod nav;
pub mod reveal;
pub mod showcase;
pub mod sparks;
pub mod timers;

#[cfg(target_arch = "wasm32")]
pub mod dom;
