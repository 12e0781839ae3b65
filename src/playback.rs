//! Autonomous DMA-to-PWM playback.
//!
//! This module binds one DMA channel to one PWM slice's compare register and
//! streams a [`Waveform`](crate::waveform::Waveform) into it, paced by the
//! slice's period-wrap data request. When the channel has moved all `N`
//! samples it halts and raises a completion interrupt; the handler re-arms
//! the identical transfer from the buffer base, producing unbounded periodic
//! playback with no main-thread involvement after
//! [`WavePlayer::start`].
//!
//! A transfer's lifecycle is hardware-driven after the initial arm:
//!
//! ```text
//! ARMED --(wrap DREQ, N times)--> IN-FLIGHT --(Nth sample moved)--> COMPLETE
//!   ^                                                                  |
//!   +----------------(completion interrupt re-arms)-------------------+
//! ```
//!
//! [`TransferPhase`] is the pure model of this machine; the only
//! software-driven transition is the first entry into `ARMED`.
//!
//! # Example
//!
//! ```rust,ignore
//! use wave_kit::playback::{InterruptHandler, SliceTiming, WavePlayer};
//! use wave_kit::waveform::Waveform;
//!
//! embassy_rp::bind_interrupts!(struct Irqs {
//!     DMA_IRQ_1 => InterruptHandler;
//! });
//!
//! static FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);
//!
//! let p = embassy_rp::init(Default::default());
//! // GPIO 8 is PWM slice 4, channel A.
//! let mut player = WavePlayer::new(
//!     p.PIN_8,
//!     p.PWM_SLICE4,
//!     p.DMA_CH1,
//!     &FADE,
//!     SliceTiming::new(16, 0, u16::MAX),
//!     Irqs,
//! )?;
//! player.start();
//! // The fade now runs forever; the main thread is free.
//! ```

#[cfg(not(feature = "host"))]
mod player;

#[cfg(not(feature = "host"))]
pub use player::{
    InterruptHandler, PlaybackDmaChannel, PwmSliceIndex, SliceTiming, WavePlayer, WavePwmPin,
    restart_count,
};

/// Data-request index of PWM slice 0's wrap event.
///
/// Slice `n` raises data request `DREQ_PWM_WRAP0 + n`.
pub const DREQ_PWM_WRAP0: u8 = 24;

/// Highest PWM slice index on any supported board (Pico 2 has 12 slices).
const MAX_SLICE_INDEX: u8 = 11;

/// The hardware transfer a playback channel is programmed with.
///
/// Built once at configure time and never reprogrammed with different
/// values: the completion interrupt re-issues the same descriptor from the
/// buffer base, and the hardware reloads the element count from the value
/// written here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferDescriptor {
    read_addr: u32,
    write_addr: u32,
    element_count: u32,
    treq: u8,
}

impl TransferDescriptor {
    /// Describe a playback transfer: `element_count` halfwords from
    /// `read_addr` (auto-increment) into the fixed `write_addr`, one element
    /// per wrap of PWM slice `slice_index`.
    #[must_use]
    pub const fn new(read_addr: u32, write_addr: u32, element_count: u32, slice_index: u8) -> Self {
        assert!(element_count > 0, "a transfer moves at least one element");
        assert!(slice_index <= MAX_SLICE_INDEX, "no such PWM slice");
        Self {
            read_addr,
            write_addr,
            element_count,
            treq: DREQ_PWM_WRAP0 + slice_index,
        }
    }

    /// Source address: the sample buffer base.
    #[must_use]
    pub const fn read_addr(&self) -> u32 {
        self.read_addr
    }

    /// Destination address: the bound slice's compare register.
    #[must_use]
    pub const fn write_addr(&self) -> u32 {
        self.write_addr
    }

    /// Number of elements one transfer moves before halting.
    #[must_use]
    pub const fn element_count(&self) -> u32 {
        self.element_count
    }

    /// Data-request index pacing the transfer.
    #[must_use]
    pub const fn treq(&self) -> u8 {
        self.treq
    }
}

/// Lifecycle of one armed transfer.
///
/// Every transition except the initial arm is hardware-driven: each wrap
/// data request moves one element, the final element raises the completion
/// interrupt, and the handler's acknowledge re-enters `Armed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferPhase {
    /// Programmed and waiting for the first wrap data request.
    Armed,
    /// Elements are moving; `remaining` have not yet been transferred.
    InFlight {
        /// Elements left in the current pass.
        remaining: u32,
    },
    /// All elements moved; the completion interrupt is pending.
    Complete,
}

impl TransferPhase {
    /// One wrap data request: move one element of `descriptor`.
    ///
    /// A completed transfer consumes no further requests until re-armed.
    #[must_use]
    pub const fn on_trigger(self, descriptor: &TransferDescriptor) -> Self {
        match self {
            Self::Armed => {
                if descriptor.element_count() == 1 {
                    Self::Complete
                } else {
                    Self::InFlight {
                        remaining: descriptor.element_count() - 1,
                    }
                }
            }
            Self::InFlight { remaining: 1 } => Self::Complete,
            Self::InFlight { remaining } => Self::InFlight {
                remaining: remaining - 1,
            },
            Self::Complete => Self::Complete,
        }
    }

    /// The completion interrupt's response: acknowledge and re-arm.
    ///
    /// Returns the re-armed phase and the address the channel's read pointer
    /// is reset to. That address is always the buffer base, so every pass
    /// replays the full buffer from offset 0.
    #[must_use]
    pub const fn acknowledge(self, descriptor: &TransferDescriptor) -> (Self, u32) {
        assert!(
            matches!(self, Self::Complete),
            "only a completed transfer can be acknowledged"
        );
        (Self::Armed, descriptor.read_addr())
    }
}
