use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::errors::SubtitleError;

// @module: Word-token chunking and SRT rendering

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Minimal increment added to a zero-length cue so renderers never see
/// start == end.
pub const ZERO_DURATION_NUDGE_SECS: f64 = 0.010;

/// Largest time representable in an SRT timestamp: 99:59:59,999
const MAX_TIMESTAMP_MS: u64 = 99 * 3_600_000 + 59 * 60_000 + 59 * 1_000 + 999;

/// One recognized word with its timing in the source audio.
///
/// The text carries whatever punctuation the transcription source attached to
/// the word; the chunker never re-punctuates or changes case.
#[derive(Debug, Clone, PartialEq)]
pub struct WordToken {
    // @field: Word text, punctuation included
    pub text: String,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,
}

impl WordToken {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        WordToken {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Deterministic policy for grouping word tokens into cues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkPolicy {
    /// Close the cue after a token ending in sentence-final punctuation
    Sentence,
    /// Close the cue after a fixed number of words
    Words {
        /// Words per cue, at least 1
        per_cue: usize,
    },
}

impl ChunkPolicy {
    /// Whether the cue should be closed after this token.
    fn is_boundary(&self, token_text: &str, words_in_cue: usize) -> bool {
        match self {
            ChunkPolicy::Sentence => ends_sentence(token_text),
            ChunkPolicy::Words { per_cue } => words_in_cue >= (*per_cue).max(1),
        }
    }
}

/// Check whether a token ends a sentence. Closing quotes and brackets after
/// the punctuation mark still count as a boundary.
fn ends_sentence(text: &str) -> bool {
    let trimmed = text
        .trim_end()
        .trim_end_matches(['"', '\'', ')', ']', '\u{201d}', '\u{2019}', '\u{00bb}']);
    trimmed.ends_with(['.', '!', '?', '\u{2026}'])
}

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    // @field: Sequence number, omitted from output when None
    pub index: Option<usize>,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Cue text
    pub text: String,
}

impl SubtitleCue {
    pub fn new(index: Option<usize>, start: f64, end: f64, text: String) -> Self {
        SubtitleCue {
            index,
            start,
            end,
            text,
        }
    }

    /// Cue duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Parse an SRT timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(SubtitleError::ParseError(format!(
                "Invalid timestamp format: {}",
                timestamp
            )));
        }

        let mut fields = [0u64; 4];
        for (i, part) in parts.iter().enumerate() {
            fields[i] = part.trim().parse().map_err(|_| {
                SubtitleError::ParseError(format!("Invalid timestamp component: {}", timestamp))
            })?;
        }
        let [hours, minutes, seconds, millis] = fields;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::ParseError(format!(
                "Invalid time components in timestamp: {}",
                timestamp
            )));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert a time in seconds to an SRT timestamp, rejecting times the
    /// format cannot carry.
    pub fn timestamp_from_secs(seconds: f64) -> Result<String, SubtitleError> {
        if !seconds.is_finite() {
            return Err(SubtitleError::TimeRange {
                seconds,
                reason: "not a finite number".to_string(),
            });
        }
        if seconds < 0.0 {
            return Err(SubtitleError::TimeRange {
                seconds,
                reason: "negative time".to_string(),
            });
        }

        let ms = (seconds * 1000.0).round() as u64;
        if ms > MAX_TIMESTAMP_MS {
            return Err(SubtitleError::TimeRange {
                seconds,
                reason: "exceeds the 99:59:59,999 format ceiling".to_string(),
            });
        }

        Ok(Self::format_timestamp(ms))
    }

    /// Render this cue as one SRT block: optional index line, time-range
    /// line, text, then a blank separator line.
    pub fn to_srt(&self) -> Result<String, SubtitleError> {
        use fmt::Write;

        let mut block = String::new();
        if let Some(index) = self.index {
            writeln!(block, "{}", index).expect("write to String cannot fail");
        }
        writeln!(
            block,
            "{} --> {}",
            Self::timestamp_from_secs(self.start)?,
            Self::timestamp_from_secs(self.end)?
        )
        .expect("write to String cannot fail");
        writeln!(block, "{}", self.text).expect("write to String cannot fail");
        block.push('\n');

        Ok(block)
    }
}

/// Group an ordered sequence of word tokens into subtitle cues.
///
/// Each cue spans from its first token's start to its last token's end, and
/// its text is the tokens' text joined with single spaces. Grouping is fully
/// deterministic for a given policy. An empty token sequence produces an
/// empty cue sequence.
///
/// Tokens with `end < start`, decreasing start times, or non-finite
/// timestamps indicate a broken upstream response and fail with
/// [`SubtitleError::MalformedToken`].
pub fn chunk(
    tokens: &[WordToken],
    policy: ChunkPolicy,
    include_index: bool,
) -> Result<Vec<SubtitleCue>, SubtitleError> {
    validate_tokens(tokens)?;

    let mut cues = Vec::new();
    let mut cue_text = String::new();
    let mut cue_start = 0.0_f64;
    let mut cue_end = 0.0_f64;
    let mut words_in_cue = 0usize;

    for token in tokens {
        if words_in_cue == 0 {
            cue_start = token.start;
        } else {
            cue_text.push(' ');
        }
        cue_text.push_str(&token.text);
        cue_end = token.end;
        words_in_cue += 1;

        if policy.is_boundary(&token.text, words_in_cue) {
            cues.push(SubtitleCue::new(
                None,
                cue_start,
                cue_end,
                std::mem::take(&mut cue_text),
            ));
            words_in_cue = 0;
        }
    }

    // Trailing tokens without a policy boundary still form a final cue
    if words_in_cue > 0 {
        cues.push(SubtitleCue::new(None, cue_start, cue_end, cue_text));
    }

    nudge_zero_length_cues(&mut cues);

    if include_index {
        for (i, cue) in cues.iter_mut().enumerate() {
            cue.index = Some(i + 1);
        }
    }

    Ok(cues)
}

/// Check the upstream timing contract for a token sequence.
fn validate_tokens(tokens: &[WordToken]) -> Result<(), SubtitleError> {
    let mut prev_start: Option<f64> = None;

    for (index, token) in tokens.iter().enumerate() {
        if !token.start.is_finite() || !token.end.is_finite() {
            return Err(SubtitleError::MalformedToken {
                index,
                text: token.text.clone(),
                reason: "non-finite timestamp".to_string(),
            });
        }
        if token.end < token.start {
            return Err(SubtitleError::MalformedToken {
                index,
                text: token.text.clone(),
                reason: format!("end time {} is before start time {}", token.end, token.start),
            });
        }
        if let Some(prev) = prev_start {
            if token.start < prev {
                return Err(SubtitleError::MalformedToken {
                    index,
                    text: token.text.clone(),
                    reason: format!(
                        "start time {} breaks non-decreasing order (previous was {})",
                        token.start, prev
                    ),
                });
            }
        }
        prev_start = Some(token.start);
    }

    Ok(())
}

/// Some subtitle renderers reject cues where start == end. Nudge the end of
/// such cues forward by a small fixed increment, clamped so the cue never
/// crosses into the next cue's time range. A successor starting at the same
/// instant is pushed past the nudged end, so the nudge cascades through runs
/// of coincident zero-length cues instead of creating overlaps.
fn nudge_zero_length_cues(cues: &mut [SubtitleCue]) {
    for i in 0..cues.len() {
        if cues[i].end > cues[i].start {
            continue;
        }

        let mut nudged_end = cues[i].start + ZERO_DURATION_NUDGE_SECS;
        if let Some(next) = cues.get(i + 1) {
            if next.start > cues[i].start {
                nudged_end = nudged_end.min(next.start);
            }
        }
        cues[i].end = nudged_end;

        if let Some(next) = cues.get_mut(i + 1) {
            if next.start < nudged_end {
                next.start = nudged_end;
                if next.end < next.start {
                    next.end = next.start;
                }
            }
        }
    }
}

/// Render a cue sequence as a complete SRT document.
///
/// Output is byte-deterministic for identical input.
pub fn render(cues: &[SubtitleCue]) -> Result<String, SubtitleError> {
    let mut output = String::new();
    for cue in cues {
        output.push_str(&cue.to_srt()?);
    }
    Ok(output)
}

/// Parse SRT format text into subtitle cues.
///
/// Both SRT variants are accepted: blocks with a leading sequence number and
/// blocks without one (the cue's `index` is `None` in that case). Cues with
/// an invalid time range are skipped with a warning; content yielding no cue
/// at all is an error.
pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleCue>, SubtitleError> {
    let mut cues = Vec::new();

    // State variables for parsing
    let mut current_index: Option<usize> = None;
    let mut current_times: Option<(u64, u64)> = None;
    let mut current_text = String::new();
    let mut line_count = 0;

    let mut finalize = |index: Option<usize>, times: (u64, u64), text: &str| {
        let (start_ms, end_ms) = times;
        if text.trim().is_empty() {
            warn!("Skipping cue with empty text");
            return;
        }
        if end_ms <= start_ms {
            warn!(
                "Skipping cue with invalid time range: {} --> {}",
                SubtitleCue::format_timestamp(start_ms),
                SubtitleCue::format_timestamp(end_ms)
            );
            return;
        }
        cues.push(SubtitleCue::new(
            index,
            start_ms as f64 / 1000.0,
            end_ms as f64 / 1000.0,
            text.trim().to_string(),
        ));
    };

    for line in content.lines() {
        line_count += 1;
        let trimmed = line.trim();

        // A blank line terminates the current block
        if trimmed.is_empty() {
            if let Some(times) = current_times {
                finalize(current_index, times, &current_text);
            }
            current_index = None;
            current_times = None;
            current_text.clear();
            continue;
        }

        // A bare number at the start of a block is the sequence line
        if current_times.is_none() && current_text.is_empty() && current_index.is_none() {
            if let Ok(num) = trimmed.parse::<usize>() {
                current_index = Some(num);
                continue;
            }
        }

        // The time-range line, with or without a preceding sequence line
        if current_times.is_none() {
            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                match (parse_timestamp_to_ms(&caps, 1), parse_timestamp_to_ms(&caps, 5)) {
                    (Some(start_ms), Some(end_ms)) => {
                        current_times = Some((start_ms, end_ms));
                        continue;
                    }
                    _ => {
                        warn!("Invalid timestamp at line {}: {}", line_count, trimmed);
                    }
                }
            }
        }

        if current_times.is_some() {
            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        } else {
            warn!(
                "Unexpected text at line {} before a timestamp line: {}",
                line_count, trimmed
            );
        }
    }

    // Final block without a trailing blank line
    if let Some(times) = current_times {
        finalize(current_index, times, &current_text);
    }

    if cues.is_empty() {
        return Err(SubtitleError::ParseError(
            "no valid subtitle cues were found in the content".to_string(),
        ));
    }

    // Sort by start time to ensure correct order
    cues.sort_by(|a, b| a.start.partial_cmp(&b.start).expect("parsed times are finite"));

    Ok(cues)
}

/// Pull one timestamp out of a regex capture, starting at the given group.
fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
    let hours: u64 = caps.get(start_idx)?.as_str().parse().ok()?;
    let minutes: u64 = caps.get(start_idx + 1)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(start_idx + 2)?.as_str().parse().ok()?;
    let millis: u64 = caps.get(start_idx + 3)?.as_str().parse().ok()?;

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    Some((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}
