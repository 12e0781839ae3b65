//! Main-thread status readout for a running playback.
//!
//! While the DMA engine streams samples, the main thread can poll the live
//! compare register, convert it back to a physical angle, and render a short
//! line through an external display. The display is consumed through the
//! [`TextSink`] trait (`clear` / `draw_text` / `commit`); this crate only
//! supplies the string and two fixed coordinates.
//!
//! The readout is a best-effort snapshot: no synchronization with the DMA or
//! interrupt side exists or is needed, because the compare register has a
//! single writer (the DMA hardware) and a single reader (this loop).
//!
//! ```
//! use wave_kit::status::AngleCalibration;
//!
//! // Servo sweep between 1000 µs and 2000 µs in a 20 ms frame.
//! let calibration = AngleCalibration::from_pulse_range(1_000, 2_000, 20_000, 19_999);
//! assert_eq!(calibration.degrees(1_500), 90);
//! ```

use core::convert::Infallible;
use core::fmt::Write as _;

use embedded_graphics::Drawable;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use embedded_graphics::text::Text;
use heapless::String;

use crate::waveform::us_to_ticks;

#[cfg(not(feature = "host"))]
use crate::playback::WavePlayer;
#[cfg(not(feature = "host"))]
use embassy_time::{Duration, Timer};

/// Capacity of one formatted status line.
pub const STATUS_LINE_CAPACITY: usize = 16;

/// Maps compare-register ticks to an angle in degrees.
///
/// `min_ticks` reads as 0° and `max_ticks` as 180°, with values outside the
/// range clamped. See the [module documentation](mod@crate::status) for an
/// example.
#[derive(Clone, Copy, Debug)]
pub struct AngleCalibration {
    min_ticks: u16,
    max_ticks: u16,
}

impl AngleCalibration {
    /// Calibrate directly in ticks.
    #[must_use]
    pub const fn new(min_ticks: u16, max_ticks: u16) -> Self {
        assert!(min_ticks < max_ticks, "calibration range must be non-empty");
        Self {
            min_ticks,
            max_ticks,
        }
    }

    /// Calibrate from a pulse-width range in microseconds, using the same
    /// tick conversion the sweep waveform is built with.
    #[must_use]
    pub const fn from_pulse_range(min_us: u32, max_us: u32, period_us: u32, top: u16) -> Self {
        Self::new(
            us_to_ticks(min_us, period_us, top),
            us_to_ticks(max_us, period_us, top),
        )
    }

    /// Angle for a compare value, rounded to the nearest degree.
    ///
    /// Non-decreasing in `ticks`; exactly 0 at `min_ticks` and 180 at
    /// `max_ticks`.
    #[must_use]
    pub const fn degrees(&self, ticks: u16) -> u16 {
        let clamped = if ticks < self.min_ticks {
            self.min_ticks
        } else if ticks > self.max_ticks {
            self.max_ticks
        } else {
            ticks
        };
        let span = (self.max_ticks - self.min_ticks) as u32;
        (((clamped - self.min_ticks) as u32 * 180 + span / 2) / span) as u16
    }
}

/// Format the status line shown on the display.
#[must_use]
pub fn status_line(degrees: u16) -> String<STATUS_LINE_CAPACITY> {
    let mut line = String::new();
    write!(line, "Angle: {degrees:3}").expect("status line fits its buffer");
    line
}

/// The external display, consumed as a plain text sink.
///
/// Implement this for your display driver; a full frame is `clear`, one or
/// more `draw_text` calls, then `commit` to push the frame to the hardware.
pub trait TextSink {
    /// Blank the frame.
    fn clear(&mut self);
    /// Place `text` at pixel coordinates `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32);
    /// Present the frame.
    fn commit(&mut self);
}

/// [`TextSink`] adapter for infallible `embedded-graphics` draw targets,
/// such as in-memory framebuffers.
///
/// `commit` is a no-op: framebuffer targets present on their own schedule.
/// Displays with an explicit flush should implement [`TextSink`] directly.
pub struct GraphicsSink<D> {
    target: D,
}

impl<D> GraphicsSink<D>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    /// Wrap a draw target.
    pub const fn new(target: D) -> Self {
        Self { target }
    }

    /// Access the wrapped target, e.g. to present it.
    pub const fn target(&self) -> &D {
        &self.target
    }
}

impl<D> TextSink for GraphicsSink<D>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    fn clear(&mut self) {
        self.target
            .clear(BinaryColor::Off)
            .expect("clearing an infallible target cannot fail");
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        Text::new(text, Point::new(x, y), style)
            .draw(&mut self.target)
            .expect("drawing into an infallible target cannot fail");
    }

    fn commit(&mut self) {}
}

/// [`TextSink`] that logs each committed frame over defmt.
///
/// The logging analogue of a real display; handy on boards with no screen
/// attached.
#[cfg(not(feature = "host"))]
#[derive(Default)]
pub struct DefmtSink {
    line: String<32>,
}

#[cfg(not(feature = "host"))]
impl DefmtSink {
    /// Create an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line: String::new(),
        }
    }
}

#[cfg(not(feature = "host"))]
impl TextSink for DefmtSink {
    fn clear(&mut self) {
        self.line.clear();
    }

    fn draw_text(&mut self, text: &str, _x: i32, _y: i32) {
        // coordinates are meaningless in a log; truncate on overflow
        let _ = self.line.push_str(text);
    }

    fn commit(&mut self) {
        defmt::info!("{=str}", self.line.as_str());
    }
}

/// Poll the live compare register forever and render it through `sink`.
///
/// Each iteration reads the register (not the sample buffer), converts it to
/// an angle, draws `Angle: NNN` at `position`, and sleeps for `interval`.
/// The loop never exits; run it as the tail of the main task.
#[cfg(not(feature = "host"))]
pub async fn report_forever<const N: usize>(
    player: &WavePlayer<N>,
    sink: &mut impl TextSink,
    calibration: AngleCalibration,
    position: (i32, i32),
    interval: Duration,
) -> ! {
    loop {
        let ticks = player.compare_ticks();
        let line = status_line(calibration.degrees(ticks));
        sink.clear();
        sink.draw_text(&line, position.0, position.1);
        sink.commit();
        Timer::after(interval).await;
    }
}
