//! LED fade with a live brightness readout.
//!
//! Same hardware fade as `a1_led_fade`, plus the main-thread status loop:
//! every 100 ms the live compare register is read back, mapped onto 0–180,
//! and logged through a [`DefmtSink`]. Swap in your display's `TextSink`
//! implementation to render it on a screen.
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

static FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let mut player = WavePlayer::new(
        p.PIN_8,
        p.PWM_SLICE4,
        p.DMA_CH1,
        &FADE,
        SliceTiming::new(16, 0, u16::MAX),
        Irqs,
    )?;
    player.start();

    // Whole compare range reads as 0–180.
    let calibration = AngleCalibration::new(0, u16::MAX);
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
