//! Lissajous curve sampling and animation assembly.
//!
//! Each animation traces `x(t) = sin(t)`, `y(t) = sin(t * freq + phase)` with
//! a frequency ratio drawn once per animation and a phase that advances by
//! [`PHASE_STEP`] between frames.

use std::io::Write;

use rand::Rng;

use crate::encode::GifWriter;
use crate::error::LissajousError;
use crate::params::{AnimationConfig, KEY_FRAME_COUNT, KEY_FRAME_DELAY};
use crate::raster::Frame;

/// Phase advance between consecutive frames, in radians.
pub const PHASE_STEP: f64 = 0.1;

/// Exclusive upper bound of the random y-oscillator frequency ratio.
pub const MAX_FREQUENCY_RATIO: f64 = 3.0;

/// Facts about a generated animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSummary {
    /// Number of frames written.
    pub frames: u16,
    /// Canvas side in pixels.
    pub side: u16,
    /// Loop count stored in the container.
    pub loop_count: u16,
    /// Delay stored on every frame, in hundredths of a second.
    pub frame_delay: u16,
    /// Relative frequency of the y oscillator.
    pub frequency_ratio: f64,
}

/// Canvas side for `config`, checked against the GIF dimension limit.
///
/// # Errors
///
/// Returns [`LissajousError::CanvasTooLarge`] if the side exceeds `u16::MAX`.
pub fn canvas_side(config: &AnimationConfig) -> Result<u16, LissajousError> {
    let side = config.canvas_side();
    u16::try_from(side).map_err(|_| LissajousError::CanvasTooLarge { side })
}

/// Header fields of the GIF produced for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifBounds {
    /// Canvas side in pixels.
    pub side: u16,
    /// Number of frames, also used as the loop count.
    pub frame_count: u16,
    /// Per-frame delay in hundredths of a second.
    pub frame_delay: u16,
}

/// Check that `config` fits the GIF format's 16-bit fields.
///
/// # Errors
///
/// Returns [`LissajousError::CanvasTooLarge`] or
/// [`LissajousError::FieldTooLarge`] for the first field that does not fit.
pub fn gif_bounds(config: &AnimationConfig) -> Result<GifBounds, LissajousError> {
    Ok(GifBounds {
        side: canvas_side(config)?,
        frame_count: gif_field(KEY_FRAME_COUNT, config.frame_count)?,
        frame_delay: gif_field(KEY_FRAME_DELAY, config.frame_delay)?,
    })
}

fn gif_field(field: &'static str, value: u32) -> Result<u16, LissajousError> {
    u16::try_from(value).map_err(|_| LissajousError::FieldTooLarge { field, value })
}

/// Sample the curve for one frame, stepping `t` by the configured resolution
/// while `t < cycles * 2pi`.
pub fn curve_points(
    config: &AnimationConfig,
    freq: f64,
    phase: f64,
) -> impl Iterator<Item = (f64, f64)> {
    let step = config.resolution;
    let limit = config.cycles * std::f64::consts::TAU;
    std::iter::successors(Some(0.0_f64), move |t| Some(t + step))
        .take_while(move |t| *t < limit)
        .map(move |t| (t.sin(), (t * freq + phase).sin()))
}

/// Map a curve coordinate in `[-1, 1]` to a pixel index on a canvas of
/// half-extent `size`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_pixel(coord: f64, size: f64) -> i64 {
    (size + (coord * size + 0.5)) as i64
}

/// Rasterize one frame of the animation.
///
/// # Errors
///
/// Returns an error if the canvas is too large for a GIF.
pub fn render_frame(
    config: &AnimationConfig,
    freq: f64,
    phase: f64,
) -> Result<Frame, LissajousError> {
    let mut frame = Frame::new(canvas_side(config)?);
    for (x, y) in curve_points(config, freq, phase) {
        frame.plot(to_pixel(x, config.size), to_pixel(y, config.size));
    }
    Ok(frame)
}

/// Generate an animation into `sink` using a thread-local random source.
///
/// # Errors
///
/// Returns an error if the canvas is too large or the sink fails.
pub fn generate<W: Write>(
    config: &AnimationConfig,
    sink: W,
) -> Result<AnimationSummary, LissajousError> {
    generate_with_rng(config, &mut rand::thread_rng(), sink)
}

/// Generate an animation into `sink`, drawing the frequency ratio from `rng`.
///
/// Frames are encoded as soon as they are rendered. The loop count written
/// to the container equals the frame count.
///
/// # Errors
///
/// Returns an error if the canvas is too large or the sink fails.
pub fn generate_with_rng<R: Rng + ?Sized, W: Write>(
    config: &AnimationConfig,
    rng: &mut R,
    sink: W,
) -> Result<AnimationSummary, LissajousError> {
    let bounds = gif_bounds(config)?;
    let freq = rng.gen_range(0.0..MAX_FREQUENCY_RATIO);
    tracing::debug!(?config, side = bounds.side, freq, "generating animation");

    let mut writer =
        GifWriter::new(sink, bounds.side, bounds.frame_count, bounds.frame_delay)?;
    let mut phase = 0.0;
    for index in 0..bounds.frame_count {
        let frame = render_frame(config, freq, phase)?;
        tracing::trace!(index, phase, painted = frame.painted(), "frame rendered");
        writer.write_frame(&frame)?;
        phase += PHASE_STEP;
    }
    let frames = writer.frames_written();
    writer.finish()?;

    Ok(AnimationSummary {
        frames,
        side: bounds.side,
        loop_count: bounds.frame_count,
        frame_delay: bounds.frame_delay,
        frequency_ratio: freq,
    })
}
