#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for waveform synthesis and unit conversion.

use wave_kit::waveform::{Waveform, ticks_to_us, us_to_ticks};

const SERVO_PERIOD_US: u32 = 20_000;
const SERVO_TOP: u16 = 19_999;
const PULSE_MIN_US: u32 = 1_000;
const PULSE_MAX_US: u32 = 2_000;

#[test]
fn fade_is_symmetric_about_the_midpoint() {
    const FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);
    for i in 0..128 {
        assert_eq!(FADE[i], FADE[255 - i], "mirror mismatch at {i}");
    }
}

#[test]
fn fade_is_non_decreasing_on_the_first_half() {
    const FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);
    for i in 1..128 {
        assert!(FADE[i] >= FADE[i - 1], "ramp dips at {i}");
    }
}

#[test]
fn fade_peak_fills_the_register() {
    const FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);
    assert_eq!(FADE[127], u16::MAX);
}

#[test]
fn fade_midpoint_neighbors_are_equal() {
    // The mirror point: sample[N/2] duplicates sample[N/2 - 1].
    const FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);
    assert_eq!(FADE[128], FADE[127]);
}

#[test]
fn fade_scales_to_smaller_wrap_values() {
    const FADE: Waveform<64> = Waveform::quadratic_fade(9_999);
    assert_eq!(FADE[0], 0);
    assert_eq!(FADE[31], 9_999);
    for i in 0..32 {
        assert_eq!(FADE[i], FADE[63 - i]);
    }
}

#[test]
fn sweep_endpoints_match_the_tick_conversion() {
    const SWEEP: Waveform<200> =
        Waveform::linear_sweep(PULSE_MIN_US, PULSE_MAX_US, SERVO_PERIOD_US, SERVO_TOP);
    let min_ticks = us_to_ticks(PULSE_MIN_US, SERVO_PERIOD_US, SERVO_TOP);
    let max_ticks = us_to_ticks(PULSE_MAX_US, SERVO_PERIOD_US, SERVO_TOP);
    assert!(SWEEP[0].abs_diff(min_ticks) <= 1);
    assert!(SWEEP[199].abs_diff(max_ticks) <= 1);
}

#[test]
fn sweep_is_monotone_non_decreasing() {
    const SWEEP: Waveform<200> =
        Waveform::linear_sweep(PULSE_MIN_US, PULSE_MAX_US, SERVO_PERIOD_US, SERVO_TOP);
    for i in 1..200 {
        assert!(SWEEP[i] >= SWEEP[i - 1], "sweep dips at {i}");
    }
}

#[test]
fn sweep_with_two_samples_hits_both_bounds() {
    const SWEEP: Waveform<2> =
        Waveform::linear_sweep(PULSE_MIN_US, PULSE_MAX_US, SERVO_PERIOD_US, SERVO_TOP);
    assert_eq!(
        SWEEP.samples(),
        &[
            us_to_ticks(PULSE_MIN_US, SERVO_PERIOD_US, SERVO_TOP),
            us_to_ticks(PULSE_MAX_US, SERVO_PERIOD_US, SERVO_TOP),
        ]
    );
}

#[test]
fn constant_sweep_holds_one_value() {
    const HOLD: Waveform<8> = Waveform::linear_sweep(1_500, 1_500, SERVO_PERIOD_US, SERVO_TOP);
    let expected = us_to_ticks(1_500, SERVO_PERIOD_US, SERVO_TOP);
    for &sample in HOLD.samples() {
        assert_eq!(sample, expected);
    }
}

#[test]
fn tick_round_trip_is_exact_within_one_tick() {
    for ticks in 0..=SERVO_TOP {
        let us = ticks_to_us(ticks, SERVO_PERIOD_US, SERVO_TOP);
        let back = us_to_ticks(us, SERVO_PERIOD_US, SERVO_TOP);
        assert!(
            back.abs_diff(ticks) <= 1,
            "round trip drifted: {ticks} -> {us} µs -> {back}"
        );
    }
}

#[test]
fn microsecond_conversions_match_known_values() {
    // With top 19_999 over a 20_000 µs period, one tick is within rounding
    // of one microsecond across the servo range.
    assert_eq!(us_to_ticks(1_000, SERVO_PERIOD_US, SERVO_TOP), 1_000);
    assert_eq!(us_to_ticks(1_500, SERVO_PERIOD_US, SERVO_TOP), 1_500);
    assert_eq!(us_to_ticks(2_000, SERVO_PERIOD_US, SERVO_TOP), 2_000);
    assert_eq!(ticks_to_us(1_500, SERVO_PERIOD_US, SERVO_TOP), 1_500);
}
