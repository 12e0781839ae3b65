//! Crate-wide error and result types.

use derive_more::{Display, Error};

/// Errors surfaced by this crate.
///
/// The playback core itself has no recoverable-error paths: once a transfer
/// is armed it runs until power-down. Errors can only occur while binding
/// resources during construction.
#[derive(Debug, Display, Error)]
#[non_exhaustive]
pub enum Error {
    /// The process-wide playback slot is already bound to a DMA channel.
    ///
    /// The completion interrupt services exactly one channel, so only one
    /// autonomous playback can exist per program.
    #[display("waveform playback is already bound to DMA channel {_0}")]
    PlaybackInUse(#[error(not(source))] u8),
}

/// Result type alias for this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
