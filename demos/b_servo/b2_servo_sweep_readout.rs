//! Servo sweep with a live angle readout.
//!
//! The hardware sweep from `b1_servo_sweep`, plus the main-thread status
//! loop: the live compare register is converted back to degrees with the
//! same calibration the waveform was built with and rendered every 100 ms.
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_time::Duration;
use wave_kit::{
    Result,
    playback::{InterruptHandler, SliceTiming, WavePlayer},
    status::{self, AngleCalibration, DefmtSink},
    waveform::Waveform,
};
use {defmt_rtt as _, panic_probe as _};

embassy_rp::bind_interrupts!(struct Irqs {
    DMA_IRQ_1 => InterruptHandler;
});

const PULSE_MIN_US: u32 = 1_000;
const PULSE_MAX_US: u32 = 2_000;
const SERVO_PERIOD_US: u32 = 20_000;
const SERVO_TOP: u16 = 19_999;

static SWEEP: Waveform<200> =
    Waveform::linear_sweep(PULSE_MIN_US, PULSE_MAX_US, SERVO_PERIOD_US, SERVO_TOP);

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let timing = SliceTiming::microsecond_ticks(20_000);
    let mut player = WavePlayer::new(p.PIN_11, p.PWM_SLICE5, p.DMA_CH1, &SWEEP, timing, Irqs)?;
    player.start();

    let calibration =
        AngleCalibration::from_pulse_range(PULSE_MIN_US, PULSE_MAX_US, SERVO_PERIOD_US, timing.top());
    let mut sink = DefmtSink::new();
    status::report_forever(
        &player,
        &mut sink,
        calibration,
        (24, 24),
        Duration::from_millis(100),
    )
    .await
}
