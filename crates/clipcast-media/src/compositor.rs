//! Filter-graph synthesis for transition compositing.
//!
//! Pure functions: given ordered segment durations and a transition style,
//! produce the encoder filter-graph expressions and the labels of the final
//! video/audio outputs. No I/O happens here.

use tracing::warn;

use clipcast_models::TransitionStyle;

use crate::error::{MediaError, MediaResult};

/// Default blend length between adjacent segments, in seconds.
pub const DEFAULT_TRANSITION_DURATION: f64 = 1.0;

/// A synthesized filter graph plus its final output labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionGraph {
    /// Ordered graph-filter expressions
    pub filters: Vec<String>,
    /// Label of the final video stream, e.g. `[v2]`
    pub video_out: String,
    /// Label of the final audio stream, e.g. `[a2]`
    pub audio_out: String,
}

impl TransitionGraph {
    /// The expressions joined into one `-filter_complex` argument.
    pub fn filter_complex(&self) -> String {
        self.filters.join(";")
    }
}

/// Build the transition filter graph for the given segment durations.
///
/// A single segment, or the `Cut` style, yields a plain N-way concat pair.
/// Otherwise the graph folds left to right: each step consumes the previous
/// output labels and the i-th input, cross-dissolving video with `xfade` and
/// cross-fading audio with `acrossfade`, offset by the accumulated playback
/// time minus the overlap already spent on transitions. Offsets are floored
/// at zero, tolerating segments shorter than the transition itself.
pub fn build_transition_graph(
    durations: &[f64],
    style: TransitionStyle,
    transition_duration: f64,
) -> MediaResult<TransitionGraph> {
    if durations.is_empty() {
        return Err(MediaError::NoDurations);
    }

    let effect = match style.effect() {
        Some(effect) if durations.len() > 1 => effect,
        _ => return Ok(concat_graph(durations.len())),
    };

    let mut filters = Vec::with_capacity(2 * (durations.len() - 1));
    let mut prev_video = "[0:v]".to_string();
    let mut prev_audio = "[0:a]".to_string();
    let mut offset = durations[0] - transition_duration;

    for (idx, duration) in durations.iter().enumerate().skip(1) {
        let out_video = format!("[v{idx}]");
        let out_audio = format!("[a{idx}]");

        if offset < 0.0 {
            warn!(
                offset,
                segment = idx,
                "transition offset clamped to zero; segment shorter than the transition"
            );
        }
        let safe_offset = offset.max(0.0);

        filters.push(format!(
            "{prev_video}[{idx}:v]xfade=transition={effect}:duration={transition_duration:.3}:offset={safe_offset:.3}{out_video}"
        ));
        filters.push(format!(
            "{prev_audio}[{idx}:a]acrossfade=d={transition_duration:.3}{out_audio}"
        ));

        prev_video = out_video;
        prev_audio = out_audio;
        offset += duration - transition_duration;
    }

    Ok(TransitionGraph {
        filters,
        video_out: prev_video,
        audio_out: prev_audio,
    })
}

/// Plain N-way concatenation: one video filter, one audio filter.
fn concat_graph(n: usize) -> TransitionGraph {
    let video_inputs: String = (0..n).map(|idx| format!("[{idx}:v]")).collect();
    let audio_inputs: String = (0..n).map(|idx| format!("[{idx}:a]")).collect();

    TransitionGraph {
        filters: vec![
            format!("{video_inputs}concat=n={n}:v=1:a=0[vout]"),
            format!("{audio_inputs}concat=n={n}:v=0:a=1[aout]"),
        ],
        video_out: "[vout]".to_string(),
        audio_out: "[aout]".to_string(),
    }
}
