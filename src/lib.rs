//! Deterministic simulation and rendering core of a side-scrolling shooter.
//!
//! * [`fix`]      – 24.8 fixed-point numbers, vectors, trig tables, RNG.
//! * [`renderer`] – 4-bit-per-channel colours, images and blitters,
//!   back/front frame composition.
//! * [`world`]    – scrolling layers and the stage that owns them.
//! * [`sim`]      – sprites, behaviours, collision and the game session.
//! * [`engine`]   – fixed-tick mode scheduler with fade transitions.
//!
//! Window, audio and asset decoding live behind the traits in [`assets`],
//! [`audio`] and the frontends under `src/bin`.

pub mod assets;
pub mod audio;
pub mod defs;
pub mod engine;
pub mod fix;
pub mod input;
pub mod renderer;
pub mod sim;
pub mod world;
