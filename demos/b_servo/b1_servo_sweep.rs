//! Servo sweep driven entirely by hardware.
//!
//! A 200-sample linear pulse-width ramp from 1000 µs to 2000 µs plays into
//! the servo's PWM slice at one sample per 20 ms frame: a full 0°→180°
//! sweep every 4 s, forever. The main thread only logs the pass counter.
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_time::Timer;
use wave_kit::{
    Result,
    playback::{self, InterruptHandler, SliceTiming, WavePlayer},
    waveform::Waveform,
};
use {defmt::info, defmt_rtt as _, panic_probe as _};

embassy_rp::bind_interrupts!(struct Irqs {
    DMA_IRQ_1 => InterruptHandler;
});

const SERVO_PERIOD_US: u32 = 20_000; // 20 ms servo frame
const SERVO_TOP: u16 = 19_999; // 1 µs per tick

static SWEEP: Waveform<200> = Waveform::linear_sweep(1_000, 2_000, SERVO_PERIOD_US, SERVO_TOP);

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // GPIO 11 is PWM slice 5, channel B.
    let mut player = WavePlayer::new(
        p.PIN_11,
        p.PWM_SLICE5,
        p.DMA_CH1,
        &SWEEP,
        SliceTiming::microsecond_ticks(20_000),
        Irqs,
    )?;
    player.start();
    info!(
        "sweep running: {} samples per pass",
        player.descriptor().element_count()
    );

    // One full sweep takes 200 frames of 20 ms each.
    loop {
        Timer::after_secs(4).await;
        info!("sweep passes completed: {}", playback::restart_count());
    }
}
