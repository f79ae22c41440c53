//! Translation of raw string parameters into an animation configuration.

use std::collections::HashMap;

/// Query key for the number of x-oscillator revolutions.
pub const KEY_CYCLES: &str = "cycles";
/// Query key for the angular sampling step.
pub const KEY_RESOLUTION: &str = "res";
/// Query key for the canvas half-extent.
pub const KEY_SIZE: &str = "size";
/// Query key for the number of frames.
pub const KEY_FRAME_COUNT: &str = "nframes";
/// Query key for the inter-frame delay.
pub const KEY_FRAME_DELAY: &str = "delay";

const DEFAULT_CYCLES: f64 = 5.0;
const DEFAULT_RESOLUTION: f64 = 0.001;
const DEFAULT_SIZE: f64 = 100.0;
const DEFAULT_FRAME_COUNT: u32 = 64;
const DEFAULT_FRAME_DELAY: u32 = 8;

/// Fully resolved parameters for one animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Number of complete x-oscillator revolutions.
    pub cycles: f64,
    /// Angular step between curve samples.
    pub resolution: f64,
    /// Canvas half-extent; the image is `2 * size + 1` pixels square.
    pub size: f64,
    /// Number of animation frames.
    pub frame_count: u32,
    /// Delay between frames in hundredths of a second.
    pub frame_delay: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
            resolution: DEFAULT_RESOLUTION,
            size: DEFAULT_SIZE,
            frame_count: DEFAULT_FRAME_COUNT,
            frame_delay: DEFAULT_FRAME_DELAY,
        }
    }
}

impl AnimationConfig {
    /// Side length of the square canvas in pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn canvas_side(&self) -> u64 {
        (2.0 * self.size + 1.0) as u64
    }

    /// Number of curve samples taken for a single frame.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn samples_per_frame(&self) -> u64 {
        (self.cycles * std::f64::consts::TAU / self.resolution).ceil() as u64
    }
}

/// Collapse query pairs into a map, keeping the first value of a repeated key.
#[must_use]
pub fn first_values<I>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut params = HashMap::new();
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    params
}

/// Resolve raw parameters into a configuration.
///
/// Never fails: a key that is absent, unparsable, zero, or outside its
/// field's valid range resolves to the default for that field. An explicit
/// `0` is therefore indistinguishable from an absent key.
#[must_use]
pub fn resolve(params: &HashMap<String, String>) -> AnimationConfig {
    let defaults = AnimationConfig::default();
    AnimationConfig {
        cycles: positive_float_or(params, KEY_CYCLES, defaults.cycles),
        resolution: positive_float_or(params, KEY_RESOLUTION, defaults.resolution),
        size: positive_float_or(params, KEY_SIZE, defaults.size),
        frame_count: nonzero_int_or(params, KEY_FRAME_COUNT, defaults.frame_count),
        frame_delay: nonzero_int_or(params, KEY_FRAME_DELAY, defaults.frame_delay),
    }
}

fn positive_float_or(params: &HashMap<String, String>, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

fn nonzero_int_or(params: &HashMap<String, String>, key: &str, default: u32) -> u32 {
    params
        .get(key)
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|v| *v != 0)
        .unwrap_or(default)
}
