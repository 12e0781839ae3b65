#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for angle readback and status rendering.

use embedded_graphics::mock_display::MockDisplay;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use wave_kit::status::{AngleCalibration, GraphicsSink, TextSink, status_line};
use wave_kit::waveform::us_to_ticks;

const SERVO_PERIOD_US: u32 = 20_000;
const SERVO_TOP: u16 = 19_999;

fn servo_calibration() -> AngleCalibration {
    AngleCalibration::from_pulse_range(1_000, 2_000, SERVO_PERIOD_US, SERVO_TOP)
}

#[test]
fn angle_is_zero_at_the_minimum_tick() {
    let calibration = servo_calibration();
    let min_ticks = us_to_ticks(1_000, SERVO_PERIOD_US, SERVO_TOP);
    assert_eq!(calibration.degrees(min_ticks), 0);
}

#[test]
fn angle_is_180_at_the_maximum_tick() {
    let calibration = servo_calibration();
    let max_ticks = us_to_ticks(2_000, SERVO_PERIOD_US, SERVO_TOP);
    assert_eq!(calibration.degrees(max_ticks), 180);
}

#[test]
fn midpoint_pulse_reads_90_degrees() {
    let calibration = servo_calibration();
    let mid_ticks = us_to_ticks(1_500, SERVO_PERIOD_US, SERVO_TOP);
    assert_eq!(calibration.degrees(mid_ticks), 90);
}

#[test]
fn angle_is_non_decreasing_in_the_compare_value() {
    let calibration = servo_calibration();
    let mut previous = calibration.degrees(0);
    for ticks in 1..=SERVO_TOP {
        let degrees = calibration.degrees(ticks);
        assert!(degrees >= previous, "angle dips at {ticks}");
        previous = degrees;
    }
}

#[test]
fn out_of_range_readings_clamp_to_the_bounds() {
    let calibration = AngleCalibration::new(1_000, 2_000);
    assert_eq!(calibration.degrees(0), 0);
    assert_eq!(calibration.degrees(u16::MAX), 180);
}

#[test]
fn full_register_calibration_matches_a_duty_readout() {
    // The LED fade maps the whole compare range onto 0-180.
    let calibration = AngleCalibration::new(0, u16::MAX);
    assert_eq!(calibration.degrees(0), 0);
    assert_eq!(calibration.degrees(u16::MAX / 2), 90);
    assert_eq!(calibration.degrees(u16::MAX), 180);
}

#[test]
fn status_line_is_right_aligned_decimal() {
    assert_eq!(status_line(0).as_str(), "Angle:   0");
    assert_eq!(status_line(90).as_str(), "Angle:  90");
    assert_eq!(status_line(180).as_str(), "Angle: 180");
}

#[test]
fn graphics_sink_renders_a_frame() {
    let mut display = MockDisplay::<BinaryColor>::new();
    display.set_allow_overdraw(true);

    let mut sink = GraphicsSink::new(display);
    sink.clear();
    sink.draw_text(&status_line(90), 0, 10);
    sink.commit();

    // The cleared frame is all-off; the text must have lit something.
    let lit = (0..64)
        .flat_map(|x| (0..64).map(move |y| Point::new(x, y)))
        .filter(|&point| sink.target().get_pixel(point) == Some(BinaryColor::On))
        .count();
    assert!(lit > 0, "text drawing left the frame blank");
}
