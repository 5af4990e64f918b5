//! Real-time presentation layer for a cycle-driven Arduboy-class emulation.
//!
//! This crate keeps simulated execution time locked to wall-clock time, models
//! the OLED persistence ("luma") trail, composites it into displayable frames
//! at a fixed cadence, and routes host input onto active-low interrupt lines.
//! The instruction-set core and the display command decoder are external
//! collaborators reached through the [`mcu`] and [`display`] trait seams.

/// Composition root and cooperative run loop.
pub mod board;

/// Wall-clock/simulated-time reconciliation and cycle/time conversions.
pub mod clock;

/// Software compositor for the persistence map.
pub mod compositor;

/// Tunable simulation parameters and configuration errors.
pub mod config;

/// Read-only display controller seam.
pub mod display;

/// Edge-triggered, debounced button-to-interrupt routing.
pub mod input;

/// Host key and pad bindings.
pub mod keymap;

/// Per-pixel persistence ("luma") model.
pub mod luma;

/// Collaborator contracts for the emulated core.
pub mod mcu;

/// Cycle-indexed periodic tick scheduling.
pub mod timer;
