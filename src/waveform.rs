//! Sample-buffer synthesis for PWM waveform playback.
//!
//! A [`Waveform`] is an immutable, fixed-length sequence of compare-register
//! values, built once at startup by a `const fn` and then streamed to the
//! hardware forever by [`playback`](mod@crate::playback). Two shapes are
//! provided:
//!
//! - [`Waveform::quadratic_fade`]: a symmetric brightness ramp whose
//!   quadratic growth approximates perceptually-linear fading.
//! - [`Waveform::linear_sweep`]: a monotone pulse-width sweep between two
//!   physical bounds, e.g. a servo travelling from 0° to 180°.
//!
//! Because the builders are `const fn`s, buffers live in plain `static`s and
//! their preconditions fail at compile time:
//!
//! ```
//! use wave_kit::waveform::Waveform;
//!
//! static FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);
//! static SWEEP: Waveform<200> = Waveform::linear_sweep(1_000, 2_000, 20_000, 19_999);
//!
//! assert_eq!(FADE.samples()[0], 0);
//! assert_eq!(SWEEP.samples()[0], 1_000);
//! ```

use core::ops::Deref;

/// Convert a physical duration (µs) into PWM counter ticks, rounding to the
/// nearest tick.
///
/// With the slice configured so that `top + 1` ticks span `period_us`
/// microseconds, a pulse of `us` microseconds corresponds to
/// `round(us · top / period_us)` ticks. [`ticks_to_us`] is the inverse, and
/// the round trip is exact to within one tick.
#[must_use]
pub const fn us_to_ticks(us: u32, period_us: u32, top: u16) -> u16 {
    assert!(period_us > 0, "PWM period must be non-zero");
    div_round(us as u64 * top as u64, period_us as u64) as u16
}

/// Convert PWM counter ticks back into a physical duration (µs), rounding to
/// the nearest microsecond.
///
/// Inverse of [`us_to_ticks`] to within one tick.
#[must_use]
pub const fn ticks_to_us(ticks: u16, period_us: u32, top: u16) -> u32 {
    assert!(top > 0, "PWM wrap value must be non-zero");
    div_round(ticks as u64 * period_us as u64, top as u64) as u32
}

/// Round-to-nearest integer division (ties round up).
const fn div_round(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator / 2) / denominator
}

/// An immutable buffer of `N` compare-register samples.
///
/// Built once, never mutated, read repeatedly without bound by the DMA
/// engine. Derefs to `[u16; N]` for inspection.
///
/// See the [module documentation](mod@crate::waveform) for usage examples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Waveform<const N: usize>([u16; N]);

impl<const N: usize> Waveform<N> {
    /// Number of samples in this waveform.
    pub const LEN: usize = N;

    /// Build a symmetric quadratic fade: rising on the first half, mirrored
    /// on the second.
    ///
    /// For `i` in `[0, N/2)`, `sample[i] = i² · top / (N/2 − 1)²` and
    /// `sample[N − 1 − i] = sample[i]`. The peak equals `top`, so every
    /// sample fits the compare register by construction.
    ///
    /// `N` must be even and at least 2.
    #[must_use]
    pub const fn quadratic_fade(top: u16) -> Self {
        assert!(
            N >= 2 && N % 2 == 0,
            "quadratic fade needs an even sample count of at least 2"
        );
        let half = N / 2;
        let denominator = if half > 1 {
            ((half - 1) * (half - 1)) as u64
        } else {
            1
        };

        let mut samples = [0u16; N];
        let mut i = 0;
        while i < half {
            let value = ((i * i) as u64 * top as u64 / denominator) as u16;
            samples[i] = value;
            samples[N - 1 - i] = value;
            i += 1;
        }
        Self(samples)
    }

    /// Build a monotone pulse-width sweep from `min_us` to `max_us`
    /// microseconds, inclusive at both ends.
    ///
    /// For `i` in `[0, N)` the physical pulse width is interpolated as
    /// `min_us + i/(N−1) · (max_us − min_us)` and converted to ticks with the
    /// [`us_to_ticks`] rounding contract. The interpolation and the tick
    /// conversion are folded into one exact rational, so the endpoints match
    /// `us_to_ticks(min_us, ..)` and `us_to_ticks(max_us, ..)` exactly.
    ///
    /// `N` must be at least 2 (the interpolation divides by `N − 1`), and
    /// `max_us` must fit within the period so no sample can exceed `top`.
    #[must_use]
    pub const fn linear_sweep(min_us: u32, max_us: u32, period_us: u32, top: u16) -> Self {
        assert!(N >= 2, "linear sweep needs at least 2 samples");
        assert!(min_us <= max_us, "sweep bounds must be ordered");
        assert!(
            max_us <= period_us,
            "sweep maximum must fit within the PWM period"
        );

        let span = (max_us - min_us) as u64;
        let steps = (N - 1) as u64;
        let denominator = steps * period_us as u64;

        let mut samples = [0u16; N];
        let mut i = 0;
        while i < N {
            // physical value at step i, kept as the exact rational
            // (min_us · steps + i · span) / steps, then converted to ticks in
            // one round-to-nearest division
            let numerator = (min_us as u64 * steps + i as u64 * span) * top as u64;
            samples[i] = div_round(numerator, denominator) as u16;
            i += 1;
        }
        Self(samples)
    }

    /// The samples, in playback order.
    #[must_use]
    pub const fn samples(&self) -> &[u16; N] {
        &self.0
    }

    /// Base address of the sample storage, as seen by the DMA engine.
    #[cfg(not(feature = "host"))]
    #[must_use]
    pub(crate) fn base_addr(&'static self) -> u32 {
        self.0.as_ptr() as u32
    }
}

impl<const N: usize> Deref for Waveform<N> {
    type Target = [u16; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
