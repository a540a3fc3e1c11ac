//! Batch decoding of frame shot lists
//!
//! Every entry is decoded on its own: a malformed string or an unsupported
//! entry is recorded as a [`ShotFailure`] and its siblings still decode. The
//! resulting [`ShotBatch`] keeps the original list positions so score strings
//! and reports stay aligned with the device's numbering.

use crate::codec::{self, DecodeMode, shot::POSITION_SCALE};
use crate::schema::{Frame, ShotAnnotations, ShotEntry};
use crate::{Result, SHOT_ENTRY_CONTEXT, Shot, ShotMarkerError};
use tracing::{trace, warn};

/// How a shot was stored in the session document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotSource {
    /// Transcoded packed record
    Encoded,
    /// Plain JSON object
    Object,
}

/// A successfully decoded shot and its annotations
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedShot {
    /// Position in the source list
    pub index: usize,
    pub shot: Shot,
    pub annotations: ShotAnnotations,
    pub source: ShotSource,
}

/// An entry that could not be decoded
#[derive(Debug)]
pub struct ShotFailure {
    /// Position in the source list
    pub index: usize,
    /// Truncated rendering of the offending entry
    pub entry: String,
    pub error: ShotMarkerError,
}

/// Outcome of decoding one shot list
#[derive(Debug, Default)]
pub struct ShotBatch {
    pub shots: Vec<DecodedShot>,
    pub failures: Vec<ShotFailure>,
}

impl ShotBatch {
    /// Number of entries that were attempted
    pub fn attempted(&self) -> usize {
        self.shots.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempted() == 0
    }
}

/// Decoded `shots` and `shots_invalid` of one frame
#[derive(Debug, Default)]
pub struct FrameShots {
    pub valid: ShotBatch,
    pub invalid: ShotBatch,
}

impl FrameShots {
    /// Failures across both lists
    pub fn failure_count(&self) -> usize {
        self.valid.failures.len() + self.invalid.failures.len()
    }
}

/// Decode a single entry.
pub fn decode_entry(index: usize, entry: &ShotEntry, mode: DecodeMode) -> Result<DecodedShot> {
    match entry {
        ShotEntry::Encoded(text) => {
            let shot = codec::decode_with(text, mode)?;
            Ok(DecodedShot {
                index,
                shot,
                annotations: ShotAnnotations::default(),
                source: ShotSource::Encoded,
            })
        }
        ShotEntry::Object(object) => Ok(DecodedShot {
            index,
            shot: object.fields.clone().into_shot_at(0),
            annotations: object.annotations.clone(),
            source: ShotSource::Object,
        }),
        ShotEntry::Other(_) => Err(ShotMarkerError::parse_error(
            SHOT_ENTRY_CONTEXT,
            format!("expected a string or object, found {}", entry.describe()),
        )),
    }
}

/// Decode a list of entries, skipping and recording the ones that fail.
pub fn decode_entries(entries: &[ShotEntry], mode: DecodeMode) -> ShotBatch {
    let mut batch = ShotBatch::default();

    for (index, entry) in entries.iter().enumerate() {
        match decode_entry(index, entry, mode) {
            Ok(decoded) => batch.shots.push(decoded),
            Err(error) => {
                warn!(index, entry = %entry.describe(), %error, "Skipping undecodable shot");
                batch.failures.push(ShotFailure { index, entry: entry.describe(), error });
            }
        }
    }

    trace!(decoded = batch.shots.len(), failed = batch.failures.len(), "Decoded shot list");
    batch
}

/// Decode both shot lists of a frame and attach its score string to valid shots.
///
/// Scores from `score_string` replace the annotations of encoded shots. Object
/// shots keep their own score and only take the score string's when they have none.
pub fn decode_frame(frame: &Frame, mode: DecodeMode) -> FrameShots {
    let mut valid = decode_entries(&frame.shots, mode);
    let invalid = decode_entries(&frame.shots_invalid, mode);

    if let Some(scores) = frame.scores() {
        for decoded in &mut valid.shots {
            let Some(entry) = scores.get(decoded.index) else {
                continue;
            };
            if decoded.source == ShotSource::Object && decoded.annotations.score.is_some() {
                continue;
            }
            decoded.annotations.display_text = Some(entry.display_text.clone());
            decoded.annotations.score = entry.score.clone();
        }
    }

    FrameShots { valid, invalid }
}

/// Re-encode and re-decode `shot`, returning whether its position survived
/// within one quantization unit.
pub fn verify_round_trip(shot: &Shot) -> Result<bool> {
    let decoded = codec::decode(&codec::encode(shot))?;
    let unit = 1.0 / POSITION_SCALE;
    Ok((decoded.x - shot.x).abs() <= unit && (decoded.y - shot.y).abs() <= unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_shot;
    use serde_json::json;

    fn entries(value: serde_json::Value) -> Vec<ShotEntry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_failure_does_not_poison_batch() {
        let good = codec::encode(&sample_shot(0));
        let list = entries(json!([good, "AAA", good, 17]));

        let batch = decode_entries(&list, DecodeMode::Strict);
        assert_eq!(batch.attempted(), 4);
        assert_eq!(batch.shots.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(batch.failures.iter().map(|f| f.index).collect::<Vec<_>>(), vec![1, 3]);
        assert!(batch.failures.iter().all(|f| f.error.is_record_level()));
    }

    #[test]
    fn test_unsupported_entry_is_parse_error() {
        let batch = decode_entries(&entries(json!([17])), DecodeMode::Strict);
        let ShotMarkerError::Parse { context, details } = &batch.failures[0].error else {
            panic!("Expected parse error");
        };
        assert_eq!(context, SHOT_ENTRY_CONTEXT);
        assert!(details.contains("17"));
    }

    #[test]
    fn test_truncated_record_is_reported() {
        let short = crate::codec::transcoder::encode(&[0u8; 10]);
        let batch = decode_entries(&entries(json!([short])), DecodeMode::Strict);
        assert!(matches!(
            batch.failures[0].error,
            ShotMarkerError::TruncatedRecord { expected: 32, actual: 10 }
        ));
    }

    #[test]
    fn test_object_entries_keep_annotations() {
        let list = entries(json!([{"ts": 5, "x": 1.5, "y": 2.5, "v": 800, "sighter": true, "score": "4"}]));
        let batch = decode_entries(&list, DecodeMode::Strict);
        let shot = &batch.shots[0];

        assert_eq!(shot.source, ShotSource::Object);
        assert_eq!(shot.shot.timestamp, 5);
        assert_eq!(shot.shot.x, 1.5);
        assert!(shot.annotations.sighter);
        assert_eq!(shot.annotations.score.as_deref(), Some("4"));
    }

    #[test]
    fn test_decode_frame_applies_scores_by_position() {
        let first = codec::encode(&sample_shot(0));
        let second = codec::encode(&sample_shot(1));
        let frame: Frame = serde_json::from_value(json!({
            "encoded": true,
            "shots": [first, "!!!!", second],
            "shots_invalid": [first],
            "score_string": "1:V,2:4,3:5"
        }))
        .unwrap();

        let shots = decode_frame(&frame, DecodeMode::Strict);
        assert_eq!(shots.valid.shots.len(), 2);
        assert_eq!(shots.invalid.shots.len(), 1);
        assert_eq!(shots.failure_count(), 1);

        let third = &shots.valid.shots[1];
        assert_eq!(third.index, 2);
        assert_eq!(third.annotations.display_text.as_deref(), Some("3"));
        assert_eq!(third.annotations.score.as_deref(), Some("5"));
        assert!(shots.invalid.shots[0].annotations.score.is_none());
    }

    #[test]
    fn test_object_score_wins_over_score_string() {
        let frame: Frame = serde_json::from_value(json!({
            "shots": [{"x": 0, "y": 0, "score": "X"}, {"x": 1, "y": 1}],
            "score_string": "1:V,2:4"
        }))
        .unwrap();

        let shots = decode_frame(&frame, DecodeMode::Strict);
        assert_eq!(shots.valid.shots[0].annotations.score.as_deref(), Some("X"));
        assert_eq!(shots.valid.shots[1].annotations.score.as_deref(), Some("4"));
    }

    #[test]
    fn test_lenient_mode_accepts_legacy_padding() {
        let mut text = codec::encode(&sample_shot(3));
        text.push('=');
        text.push_str("A=");
        let list = entries(json!([text]));

        assert_eq!(decode_entries(&list, DecodeMode::Strict).failures.len(), 1);
        assert_eq!(decode_entries(&list, DecodeMode::Lenient).shots.len(), 1);
    }

    #[test]
    fn test_verify_round_trip() {
        assert!(verify_round_trip(&sample_shot(7)).unwrap());

        let far = Shot { x: 1.0e12, ..sample_shot(0) };
        assert!(!verify_round_trip(&far).unwrap());
    }
}
