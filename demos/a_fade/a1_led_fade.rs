//! Quadratic LED fade driven entirely by hardware.
//!
//! The DMA channel streams a 256-sample quadratic ramp into the PWM compare
//! register, one sample per PWM period. After `start()` the main thread is
//! idle forever; the completion interrupt replays the buffer.
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, future, panic};
use embassy_executor::Spawner;
use wave_kit::{
    Result,
    playback::{InterruptHandler, SliceTiming, WavePlayer},
    waveform::Waveform,
};
use {defmt::info, defmt_rtt as _, panic_probe as _};

embassy_rp::bind_interrupts!(struct Irqs {
    DMA_IRQ_1 => InterruptHandler;
});

// One sample per PWM period; the ramp rises for 128 periods and mirrors
// back down for the next 128.
static FADE: Waveform<256> = Waveform::quadratic_fade(u16::MAX);

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // GPIO 8 is PWM slice 4, channel A. Divider 16 with the full 16-bit wrap
    // gives a ~8 ms PWM period at 125 MHz, so the full fade takes ~2 s.
    let mut player = WavePlayer::new(
        p.PIN_8,
        p.PWM_SLICE4,
        p.DMA_CH1,
        &FADE,
        SliceTiming::new(16, 0, u16::MAX),
        Irqs,
    )?;
    player.start();
    info!("fade running; main thread is idle");

    future::pending().await
}
