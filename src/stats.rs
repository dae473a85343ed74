//! Usage-statistics aggregation over the clip corpus.
//!
//! For every distinct normalized keyword across all clips, computes the
//! number of clips, the number of distinct parent interviews, and the
//! total duration in seconds. A malformed timestamp contributes zero
//! duration but never aborts the scan.

use crate::error::{GlossaryError, Result};
use crate::types::{Clip, UsageStats};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Delimiter between the start and end offsets of a clip timestamp.
const RANGE_DELIMITER: char = '-';

struct Accumulator {
    clip_count: u32,
    interviews: HashSet<String>,
    seconds: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            clip_count: 0,
            interviews: HashSet::new(),
            seconds: 0.0,
        }
    }

    fn finalize(self) -> UsageStats {
        UsageStats {
            clip_count: self.clip_count,
            interview_count: self.interviews.len() as u32,
            total_length_seconds: self.seconds.round() as u64,
        }
    }
}

/// Scan the clip corpus and compute per-keyword usage statistics.
///
/// Keys are normalized keywords (lower-cased, trimmed). Repeat clips from
/// the same interview count once toward `interview_count`.
pub fn aggregate(clips: &[Clip]) -> HashMap<String, UsageStats> {
    let mut accumulators: HashMap<String, Accumulator> = HashMap::new();

    for clip in clips {
        let duration = clip_duration(clip);

        for keyword in clip.keywords.normalize() {
            let entry = accumulators.entry(keyword).or_insert_with(Accumulator::new);
            entry.clip_count += 1;
            entry.interviews.insert(clip.interview_id.clone());
            entry.seconds += duration;
        }
    }

    accumulators
        .into_iter()
        .map(|(keyword, acc)| (keyword, acc.finalize()))
        .collect()
}

/// Duration of one clip in seconds. Missing or malformed timestamps yield
/// zero without failing the caller.
fn clip_duration(clip: &Clip) -> f64 {
    let Some(raw) = clip.timestamp.as_deref() else {
        return 0.0;
    };

    match parse_range(raw) {
        Ok((start, end)) => (end - start).max(0.0),
        Err(err) => {
            debug!(interview = %clip.interview_id, %err, "skipping clip duration");
            0.0
        }
    }
}

/// Parse a `"start - end"` timestamp range into a pair of offsets in
/// seconds.
pub fn parse_range(raw: &str) -> Result<(f64, f64)> {
    let mut parts = raw.splitn(2, RANGE_DELIMITER);
    let start = parts.next().unwrap_or_default();
    let end = parts
        .next()
        .ok_or_else(|| GlossaryError::MalformedTimestamp(raw.to_string()))?;

    Ok((parse_offset(start)?, parse_offset(end)?))
}

/// Parse one time offset in `MM:SS` or `HH:MM:SS` form, tolerating a
/// trailing `.millis` suffix and enclosing brackets.
pub fn parse_offset(raw: &str) -> Result<f64> {
    let malformed = || GlossaryError::MalformedTimestamp(raw.to_string());

    let trimmed = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();

    let (base, fraction) = match trimmed.split_once('.') {
        Some((base, millis)) => {
            if millis.is_empty() || !millis.chars().all(|c| c.is_ascii_digit()) {
                return Err(malformed());
            }
            let fraction: f64 = format!("0.{millis}").parse().map_err(|_| malformed())?;
            (base, fraction)
        }
        None => (trimmed, 0.0),
    };

    let fields = base
        .split(':')
        .map(|field| field.trim().parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;

    let seconds = match fields[..] {
        [minutes, secs] => minutes * 60 + secs,
        [hours, minutes, secs] => hours * 3600 + minutes * 60 + secs,
        _ => return Err(malformed()),
    };

    Ok(seconds as f64 + fraction)
}
