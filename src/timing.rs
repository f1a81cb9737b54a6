/*!
 * Cue timing adjustment.
 *
 * Extends cues whose display duration is too short for a viewer to read,
 * borrowing time from neighboring cues and inter-cue gaps without ever
 * creating overlaps.
 */

use std::fmt;

use crate::subtitle_builder::SubtitleCue;

/// Cues shorter than this are considered unreadable and get extended
pub const MIN_DURATION_MS: f64 = 100.0;

/// A donor cue is never shrunk below this duration
pub const MIN_ENTRY_DURATION_MS: f64 = 100.0;

/// Minimum gap preserved between consecutive cues
pub const MIN_GAP_MS: f64 = 10.0;

/// Record of one timing modification, for the report printed after a run.
#[derive(Debug, Clone)]
pub struct Adjustment {
    /// Position of the adjusted cue (1-based)
    pub position: usize,
    /// Leading part of the cue text, for identification
    pub text_preview: String,
    /// Duration before adjustment, in milliseconds
    pub old_duration_ms: f64,
    /// Duration after adjustment, in milliseconds
    pub new_duration_ms: f64,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cue {} ('{}'): duration {}ms -> {}ms",
            self.position,
            self.text_preview,
            self.old_duration_ms as i64,
            self.new_duration_ms as i64
        )
    }
}

fn duration_ms(cue: &SubtitleCue) -> f64 {
    cue.duration_secs() * 1000.0
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(30).collect();
    if text.chars().count() > 30 {
        preview.push_str("...");
    }
    preview
}

/// Extend every cue shorter than [`MIN_DURATION_MS`].
///
/// The first cue extends its end into the following gap, the last cue shifts
/// its start backwards, and middle cues borrow half of the needed time from
/// the previous cue's tail and half from the following gap. Neighbors keep at
/// least [`MIN_ENTRY_DURATION_MS`] of their own duration and at least
/// [`MIN_GAP_MS`] of separation. Returns a report of every modification.
pub fn adjust_short_durations(cues: &mut [SubtitleCue]) -> Vec<Adjustment> {
    let mut adjustments = Vec::new();
    let len = cues.len();

    for idx in 0..len {
        let old_duration = duration_ms(&cues[idx]);
        if old_duration >= MIN_DURATION_MS {
            continue;
        }

        let needed_ms = MIN_DURATION_MS - old_duration;

        if idx == 0 {
            // First cue: extend the end into the following gap
            if len > 1 {
                let gap_ms = (cues[1].start - cues[0].end) * 1000.0;
                let extend_ms = needed_ms.min((gap_ms - MIN_GAP_MS).max(0.0));
                cues[0].end += extend_ms / 1000.0;
            } else {
                cues[0].end += needed_ms / 1000.0;
            }
        } else if idx == len - 1 {
            // Last cue: shift the start backwards into the preceding gap
            let gap_ms = (cues[idx].start - cues[idx - 1].end) * 1000.0;
            let shift_ms = needed_ms.min((gap_ms - MIN_GAP_MS).max(0.0));
            cues[idx].start -= shift_ms / 1000.0;
        } else {
            adjust_middle_cue(cues, idx, needed_ms);
        }

        adjustments.push(Adjustment {
            position: cues[idx].index.unwrap_or(idx + 1),
            text_preview: preview(&cues[idx].text),
            old_duration_ms: old_duration,
            new_duration_ms: duration_ms(&cues[idx]),
        });
    }

    adjustments
}

/// Borrow time for a middle cue: half from the previous cue's tail, half
/// from the gap to the next cue.
fn adjust_middle_cue(cues: &mut [SubtitleCue], idx: usize, needed_ms: f64) {
    let prev_duration_ms = duration_ms(&cues[idx - 1]);
    let prev_available_ms = (prev_duration_ms - MIN_ENTRY_DURATION_MS).max(0.0);
    let prev_borrow_ms = (needed_ms / 2.0).min(prev_available_ms);

    let gap_to_next_ms = (cues[idx + 1].start - cues[idx].end) * 1000.0;
    let next_available_ms = (gap_to_next_ms - MIN_GAP_MS).max(0.0);
    let extend_ms = (needed_ms / 2.0).min(next_available_ms);

    if prev_borrow_ms > 0.0 {
        cues[idx - 1].end -= prev_borrow_ms / 1000.0;
        cues[idx].start -= prev_borrow_ms / 1000.0;
    }

    if extend_ms > 0.0 {
        cues[idx].end += extend_ms / 1000.0;
    }
}
