//! DMA-driven PWM waveform playback for Pico 1 and 2.
//!
//! Streams a precomputed sample buffer into a PWM compare register through a
//! DMA channel. After [`playback::WavePlayer::start`], the waveform plays
//! forever with zero main-thread involvement: the PWM wrap event paces the
//! transfer, and the DMA completion interrupt re-arms the same buffer from
//! the start.
//!
//! # Glossary
//!
//! Resources used on the Pico 1 and Pico 2:
//!
//! - **DMA ([Direct Memory Access](https://en.wikipedia.org/wiki/Direct_memory_access)):** Pico 1 has 12 channels, Pico 2 has 16.
//! - **PWM ([Pulse Width Modulation](https://en.wikipedia.org/wiki/Pulse-width_modulation)) Slices:** Pico 1 has 8 slices, Pico 2 has 12. These "slices"
//!   are unrelated to Rust slices.
//! - **Wrap:** the counter value at which a PWM slice's period resets. Each
//!   wrap raises a DMA data request, so one sample moves per PWM period.
//! - **Compare register:** the live hardware field that sets the duty cycle
//!   of the output pin. It is the DMA transfer's destination.
#![cfg_attr(not(feature = "host"), no_std)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time checks: exactly one architecture must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "arm", feature = "riscv")), not(feature = "host")))]
compile_error!("Must enable exactly one architecture feature: 'arm' or 'riscv'");

#[cfg(all(feature = "arm", feature = "riscv"))]
compile_error!("Cannot enable both 'arm' and 'riscv' features simultaneously");

// Compile-time check: pico1 only supports ARM
#[cfg(all(feature = "pico1", feature = "riscv"))]
compile_error!("Pico 1 (RP2040) only supports ARM architecture, not RISC-V");

mod error;
pub mod playback;
pub mod status;
pub mod waveform;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
