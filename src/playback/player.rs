//! Hardware binding for autonomous playback: PWM slice setup, DMA channel
//! programming, and the completion-interrupt re-arm.

use core::sync::atomic::{Ordering, compiler_fence};

use defmt::info;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::interrupt::typelevel::{Binding, DMA_IRQ_1, Handler, Interrupt};
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::pwm::{Config, Pwm};
use embassy_rp::{Peri, PeripheralType, peripherals};
use fixed::FixedU16;
use fixed::types::extra::U4;
use portable_atomic::{AtomicU8, AtomicU32};

use super::TransferDescriptor;
use crate::waveform::Waveform;
use crate::{Error, Result};

/// Marker for an unbound playback slot.
const NO_CHANNEL: u8 = u8::MAX;

// Re-arm state shared with the interrupt handler. Single-writer discipline:
// both values are stored before the completion interrupt is unmasked and
// only read afterwards. ACTIVE_CHANNEL doubles as the process-wide claim
// that keeps this a single-playback crate.
static ACTIVE_CHANNEL: AtomicU8 = AtomicU8::new(NO_CHANNEL);
static READ_BASE: AtomicU32 = AtomicU32::new(0);
static RESTART_COUNT: AtomicU32 = AtomicU32::new(0);

/// Number of completed playback passes since [`WavePlayer::new`].
///
/// Incremented by the completion interrupt each time it re-arms the
/// transfer. A cheap liveness probe for the main thread.
#[must_use]
pub fn restart_count() -> u32 {
    RESTART_COUNT.load(Ordering::Relaxed)
}

/// Numeric index of a PWM slice peripheral.
pub trait PwmSliceIndex: PeripheralType {
    /// Hardware slice number, as used for the compare register address and
    /// the wrap data-request index.
    const INDEX: u8;
}

macro_rules! pwm_slice_index {
    ($slice:ident, $index:expr) => {
        impl PwmSliceIndex for peripherals::$slice {
            const INDEX: u8 = $index;
        }
    };
}

pwm_slice_index!(PWM_SLICE0, 0);
pwm_slice_index!(PWM_SLICE1, 1);
pwm_slice_index!(PWM_SLICE2, 2);
pwm_slice_index!(PWM_SLICE3, 3);
pwm_slice_index!(PWM_SLICE4, 4);
pwm_slice_index!(PWM_SLICE5, 5);
pwm_slice_index!(PWM_SLICE6, 6);
pwm_slice_index!(PWM_SLICE7, 7);

#[cfg(feature = "pico2")]
pwm_slice_index!(PWM_SLICE8, 8);
#[cfg(feature = "pico2")]
pwm_slice_index!(PWM_SLICE9, 9);
#[cfg(feature = "pico2")]
pwm_slice_index!(PWM_SLICE10, 10);
#[cfg(feature = "pico2")]
pwm_slice_index!(PWM_SLICE11, 11);

/// A GPIO pin that can carry one PWM slice's output.
///
/// Implemented for every pin/slice pairing the hardware supports; the pin
/// determines whether the slice's A or B output (and compare field) is used.
pub trait WavePwmPin<S: PeripheralType>: PeripheralType {
    /// `true` for the slice's A output, `false` for B.
    const IS_CHANNEL_A: bool;

    /// Construct the PWM driver for this pin/slice pairing.
    fn new_pwm(slice: Peri<'static, S>, pin: Peri<'static, Self>, config: Config)
    -> Pwm<'static>;
}

macro_rules! wave_pin_map {
    ($pin:ident, $slice:ident, A) => {
        impl WavePwmPin<peripherals::$slice> for peripherals::$pin {
            const IS_CHANNEL_A: bool = true;
            fn new_pwm(
                slice: Peri<'static, peripherals::$slice>,
                pin: Peri<'static, Self>,
                config: Config,
            ) -> Pwm<'static> {
                Pwm::new_output_a(slice, pin, config)
            }
        }
    };
    ($pin:ident, $slice:ident, B) => {
        impl WavePwmPin<peripherals::$slice> for peripherals::$pin {
            const IS_CHANNEL_A: bool = false;
            fn new_pwm(
                slice: Peri<'static, peripherals::$slice>,
                pin: Peri<'static, Self>,
                config: Config,
            ) -> Pwm<'static> {
                Pwm::new_output_b(slice, pin, config)
            }
        }
    };
}

wave_pin_map!(PIN_0, PWM_SLICE0, A);
wave_pin_map!(PIN_1, PWM_SLICE0, B);
wave_pin_map!(PIN_2, PWM_SLICE1, A);
wave_pin_map!(PIN_3, PWM_SLICE1, B);
wave_pin_map!(PIN_4, PWM_SLICE2, A);
wave_pin_map!(PIN_5, PWM_SLICE2, B);
wave_pin_map!(PIN_6, PWM_SLICE3, A);
wave_pin_map!(PIN_7, PWM_SLICE3, B);
wave_pin_map!(PIN_8, PWM_SLICE4, A);
wave_pin_map!(PIN_9, PWM_SLICE4, B);
wave_pin_map!(PIN_10, PWM_SLICE5, A);
wave_pin_map!(PIN_11, PWM_SLICE5, B);
wave_pin_map!(PIN_12, PWM_SLICE6, A);
wave_pin_map!(PIN_13, PWM_SLICE6, B);
wave_pin_map!(PIN_14, PWM_SLICE7, A);
wave_pin_map!(PIN_15, PWM_SLICE7, B);
wave_pin_map!(PIN_16, PWM_SLICE0, A);
wave_pin_map!(PIN_17, PWM_SLICE0, B);
wave_pin_map!(PIN_18, PWM_SLICE1, A);
wave_pin_map!(PIN_19, PWM_SLICE1, B);
wave_pin_map!(PIN_20, PWM_SLICE2, A);
wave_pin_map!(PIN_21, PWM_SLICE2, B);
wave_pin_map!(PIN_22, PWM_SLICE3, A);
wave_pin_map!(PIN_23, PWM_SLICE3, B);
wave_pin_map!(PIN_24, PWM_SLICE4, A);
wave_pin_map!(PIN_25, PWM_SLICE4, B);
wave_pin_map!(PIN_26, PWM_SLICE5, A);
wave_pin_map!(PIN_27, PWM_SLICE5, B);
wave_pin_map!(PIN_28, PWM_SLICE6, A);
wave_pin_map!(PIN_29, PWM_SLICE6, B);

#[cfg(feature = "pico2")]
wave_pin_map!(PIN_30, PWM_SLICE7, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_31, PWM_SLICE7, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_32, PWM_SLICE8, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_33, PWM_SLICE8, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_34, PWM_SLICE9, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_35, PWM_SLICE9, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_36, PWM_SLICE10, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_37, PWM_SLICE10, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_38, PWM_SLICE11, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_39, PWM_SLICE11, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_40, PWM_SLICE8, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_41, PWM_SLICE8, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_42, PWM_SLICE9, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_43, PWM_SLICE9, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_44, PWM_SLICE10, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_45, PWM_SLICE10, B);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_46, PWM_SLICE11, A);
#[cfg(feature = "pico2")]
wave_pin_map!(PIN_47, PWM_SLICE11, B);

/// Numeric index of a DMA channel peripheral.
pub trait PlaybackDmaChannel: PeripheralType {
    /// Hardware channel number.
    const NUMBER: u8;
}

macro_rules! playback_dma_channel {
    ($channel:ident, $number:expr) => {
        impl PlaybackDmaChannel for peripherals::$channel {
            const NUMBER: u8 = $number;
        }
    };
}

playback_dma_channel!(DMA_CH0, 0);
playback_dma_channel!(DMA_CH1, 1);
playback_dma_channel!(DMA_CH2, 2);
playback_dma_channel!(DMA_CH3, 3);
playback_dma_channel!(DMA_CH4, 4);
playback_dma_channel!(DMA_CH5, 5);
playback_dma_channel!(DMA_CH6, 6);
playback_dma_channel!(DMA_CH7, 7);
playback_dma_channel!(DMA_CH8, 8);
playback_dma_channel!(DMA_CH9, 9);
playback_dma_channel!(DMA_CH10, 10);
playback_dma_channel!(DMA_CH11, 11);

#[cfg(feature = "pico2")]
playback_dma_channel!(DMA_CH12, 12);
#[cfg(feature = "pico2")]
playback_dma_channel!(DMA_CH13, 13);
#[cfg(feature = "pico2")]
playback_dma_channel!(DMA_CH14, 14);
#[cfg(feature = "pico2")]
playback_dma_channel!(DMA_CH15, 15);

/// Clock divider and wrap value for the playback slice.
///
/// Together these fix the output period: one PWM period is
/// `(top + 1) · divider / clk_sys` seconds, and one sample is consumed per
/// period.
#[derive(Clone, Copy, Debug)]
pub struct SliceTiming {
    divider: FixedU16<U4>,
    top: u16,
}

impl SliceTiming {
    /// Raw divider (integer and 4-bit fractional part) and wrap value.
    #[must_use]
    pub const fn new(div_int: u8, div_frac: u8, top: u16) -> Self {
        assert!(div_int >= 1, "integer divider must be at least 1");
        assert!(div_frac < 16, "fractional divider is 4 bits");
        Self {
            divider: FixedU16::from_bits(((div_int as u16) << 4) | div_frac as u16),
            top,
        }
    }

    /// Timing with one tick per microsecond and the given period.
    ///
    /// The divider is derived from the live system clock so that
    /// `top = period_us − 1` gives exactly `period_us` ticks per period.
    /// This is the natural timing for pulse-width waveforms such as servo
    /// sweeps.
    #[must_use]
    pub fn microsecond_ticks(period_us: u16) -> Self {
        assert!(period_us >= 2, "period must be at least 2 µs");
        let clk = u64::from(clk_sys_freq()); // Hz
        // divider = clk_sys / 1_000_000, with /16 fractional part
        let mut div_int = (clk / 1_000_000).clamp(1, 255) as u16;
        let remainder = clk.saturating_sub(u64::from(div_int) * 1_000_000);
        let mut div_frac = ((remainder * 16 + 500_000) / 1_000_000) as u16;
        if div_frac == 16 {
            div_frac = 0;
            div_int = (div_int + 1).min(255);
        }
        Self {
            divider: FixedU16::from_bits((div_int << 4) | div_frac),
            top: period_us - 1,
        }
    }

    /// The wrap value this timing configures.
    #[must_use]
    pub const fn top(&self) -> u16 {
        self.top
    }
}

/// Completion-interrupt handler for the playback DMA channel.
///
/// Bind it to `DMA_IRQ_1` in the application (IRQ 0 belongs to the HAL's own
/// async transfers):
///
/// ```rust,ignore
/// embassy_rp::bind_interrupts!(struct Irqs {
///     DMA_IRQ_1 => wave_kit::playback::InterruptHandler;
/// });
/// ```
///
/// On each completion it acknowledges exactly the bound channel's flag and
/// rewrites the channel's read-address trigger with the buffer base. The
/// hardware reloads the element count from the configured value, so every
/// pass replays all `N` samples from offset 0, and the re-armed channel
/// waits for the next wrap data request. The handler never allocates and
/// never blocks.
pub struct InterruptHandler {
    _private: (),
}

impl Handler<DMA_IRQ_1> for InterruptHandler {
    #[expect(unsafe_code, reason = "interrupt handlers are unsafe to define")]
    unsafe fn on_interrupt() {
        let channel = ACTIVE_CHANNEL.load(Ordering::Acquire);
        if channel == NO_CHANNEL {
            return;
        }
        let mask = 1u32 << channel;
        if !completion_pending(mask) {
            return;
        }
        // Ack only this channel's flag; other channels may share the line.
        acknowledge_completion(mask);
        pac::DMA
            .ch(channel as usize)
            .al3_read_addr_trig()
            .write_value(READ_BASE.load(Ordering::Acquire));
        RESTART_COUNT.fetch_add(1, Ordering::Relaxed);
    }
}

fn completion_pending(mask: u32) -> bool {
    #[cfg(feature = "pico1")]
    let pending = pac::DMA.ints1().read();
    #[cfg(feature = "pico2")]
    let pending = u32::from(pac::DMA.ints1().read().ints1());
    pending & mask != 0
}

fn acknowledge_completion(mask: u32) {
    // write-1-to-clear
    #[cfg(feature = "pico1")]
    pac::DMA.ints1().write_value(mask);
    #[cfg(feature = "pico2")]
    pac::DMA.ints1().write(|w| w.set_ints1(mask as u16));
}

fn enable_completion_irq(mask: u32) {
    #[cfg(feature = "pico1")]
    pac::DMA.inte1().modify(|w| *w |= mask);
    #[cfg(feature = "pico2")]
    pac::DMA.inte1().modify(|w| w.set_inte1(w.inte1() | mask as u16));
}

/// A DMA channel bound to one PWM slice's compare register, streaming a
/// [`Waveform`] forever.
///
/// See the [module documentation](mod@crate::playback) for the lifecycle and
/// a usage example. There is no stop or reconfigure operation: playback runs
/// until power-down, and dropping the player does not stop the hardware.
pub struct WavePlayer<const N: usize> {
    _pwm: Pwm<'static>,
    descriptor: TransferDescriptor,
    channel_number: u8,
    slice_index: u8,
    channel_a: bool,
    started: bool,
}

impl<const N: usize> WavePlayer<N> {
    /// Bind `dma` to `slice`'s compare register and configure (but do not
    /// start) the transfer of `buffer`.
    ///
    /// The slice starts running immediately with compare 0 (output low); no
    /// sample moves until [`start`](Self::start). The buffer must live in a
    /// `static`: the hardware reads it for the rest of the program.
    ///
    /// # Errors
    ///
    /// [`Error::PlaybackInUse`] if another player already holds the
    /// process-wide playback slot.
    pub fn new<P, S, C>(
        pin: Peri<'static, P>,
        slice: Peri<'static, S>,
        _dma: Peri<'static, C>,
        buffer: &'static Waveform<N>,
        timing: SliceTiming,
        _irqs: impl Binding<DMA_IRQ_1, InterruptHandler>,
    ) -> Result<Self>
    where
        P: WavePwmPin<S>,
        S: PwmSliceIndex,
        C: PlaybackDmaChannel,
    {
        let channel_number = C::NUMBER;
        ACTIVE_CHANNEL
            .compare_exchange(
                NO_CHANNEL,
                channel_number,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(Error::PlaybackInUse)?;

        // Publish the re-arm state before the completion line is unmasked.
        RESTART_COUNT.store(0, Ordering::Relaxed);
        READ_BASE.store(buffer.base_addr(), Ordering::Release);

        let mut config = Config::default();
        config.top = timing.top;
        config.divider = timing.divider;
        config.phase_correct = false; // edge-aligned: one wrap per top+1 ticks
        config.enable = true;
        let pwm = P::new_pwm(slice, pin, config);

        // Halfword writes to the compare register update both compare
        // fields (APB narrow writes replicate across the word); only the
        // bound pin's field drives an output.
        let write_addr = pac::PWM.ch(usize::from(S::INDEX)).cc().as_ptr() as u32;
        let descriptor =
            TransferDescriptor::new(buffer.base_addr(), write_addr, N as u32, S::INDEX);

        let regs = pac::DMA.ch(usize::from(channel_number));
        regs.read_addr().write_value(descriptor.read_addr());
        regs.write_addr().write_value(descriptor.write_addr());
        #[cfg(feature = "pico1")]
        regs.trans_count().write_value(descriptor.element_count());
        #[cfg(feature = "pico2")]
        regs.trans_count().write(|w| {
            w.set_mode(pac::dma::vals::TransCountMode::NORMAL);
            w.set_count(descriptor.element_count());
        });
        regs.ctrl_trig().write(|w| {
            w.set_treq_sel(TreqSel::from_bits(descriptor.treq()));
            w.set_data_size(DataSize::SIZE_HALFWORD);
            w.set_incr_read(true);
            w.set_incr_write(false);
            w.set_chain_to(channel_number);
            w.set_irq_quiet(false);
            w.set_en(false);
        });

        let mask = 1u32 << channel_number;
        acknowledge_completion(mask); // drop any stale flag before unmasking
        enable_completion_irq(mask);
        DMA_IRQ_1::unpend();
        #[expect(unsafe_code, reason = "NVIC enable to receive the completion interrupt")]
        unsafe {
            DMA_IRQ_1::enable();
        };

        info!(
            "wave player: slice={} dma={} samples={} top={}",
            S::INDEX,
            channel_number,
            N,
            timing.top
        );

        Ok(Self {
            _pwm: pwm,
            descriptor,
            channel_number,
            slice_index: S::INDEX,
            channel_a: P::IS_CHANNEL_A,
            started: false,
        })
    }

    /// Arm the channel. The first sample moves on the slice's next wrap data
    /// request, not immediately and not under software control.
    pub fn start(&mut self) {
        assert!(!self.started, "playback can only be started once");
        self.started = true;
        compiler_fence(Ordering::SeqCst);
        pac::DMA
            .ch(usize::from(self.channel_number))
            .ctrl_trig()
            .modify(|w| w.set_en(true));
        info!("playback armed on DMA channel {}", self.channel_number);
    }

    /// Live compare register, in ticks.
    ///
    /// A best-effort snapshot of what the hardware is outputting right now;
    /// the DMA engine may move the very next sample mid-read. This reads the
    /// register, not the sample buffer.
    #[must_use]
    pub fn compare_ticks(&self) -> u16 {
        let compare = pac::PWM.ch(usize::from(self.slice_index)).cc().read();
        if self.channel_a {
            compare.a()
        } else {
            compare.b()
        }
    }

    /// The transfer this player was configured with.
    #[must_use]
    pub const fn descriptor(&self) -> &TransferDescriptor {
        &self.descriptor
    }
}
