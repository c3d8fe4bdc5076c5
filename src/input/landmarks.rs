//! Hand Landmarks and Recognition Results
//!
//! Wire types for the recognizer contract plus the landmark aggregator that
//! reduces one hand to a single representative point.
//!
//! Results are indexed first by detected hand; only hand 0 is consulted.
//! Landmarks follow the 21-point hand topology:
//!
//! ```text
//!          8   12  16  20      fingertips
//!          |   |   |   |
//!      4   5---9---13--17      knuckles (5, 9, 13, 17)
//!       \   \  |   |  /
//!        1---------0           wrist (0)
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::input::coordinates::Point;
use crate::input::error::{InputError, Result};
use crate::input::gesture::GestureLabel;

/// Number of points in the hand topology
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Wrist and the four knuckle bases
pub const PALM_INDICES: [usize; 5] = [0, 5, 9, 13, 17];

/// One tracked point, normalized to [0, 1] per axis; `z` is ignored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0 = left edge of the camera image)
    pub x: f64,
    /// Vertical position (0 = top edge of the camera image)
    pub y: f64,
    /// Depth relative to the wrist
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    /// Create a landmark with zero depth
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// One ranked gesture classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureCategory {
    /// Label string as reported by the recognizer
    pub category_name: String,
    /// Confidence score
    #[serde(default)]
    pub score: f32,
}

/// Output of one recognition call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Landmarks per detected hand
    #[serde(default)]
    pub landmarks: Vec<Vec<Landmark>>,
    /// Gestures per detected hand, ranked by descending score
    #[serde(default)]
    pub gestures: Vec<Vec<GestureCategory>>,
}

impl RecognitionResult {
    /// Result with no hand in view
    pub fn empty() -> Self {
        Self::default()
    }

    /// Landmarks of the dominant (first) hand
    pub fn primary_hand(&self) -> Result<&[Landmark]> {
        match self.landmarks.first() {
            Some(hand) if !hand.is_empty() => Ok(hand),
            _ => Err(InputError::NoHand),
        }
    }

    /// Top-ranked gesture of the dominant hand
    pub fn top_gesture(&self) -> Result<GestureLabel> {
        self.gestures
            .first()
            .and_then(|ranked| ranked.first())
            .map(|category| GestureLabel::from(category.category_name.as_str()))
            .ok_or(InputError::NoGesture)
    }
}

/// Reduces a hand to the mean of a fixed subset of its landmarks
#[derive(Debug, Clone)]
pub struct LandmarkAggregator {
    indices: Vec<usize>,
}

impl LandmarkAggregator {
    /// Aggregator over an arbitrary index set
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self {
            indices: indices.into(),
        }
    }

    /// Aggregator over the palm base ([`PALM_INDICES`])
    pub fn palm() -> Self {
        Self::new(PALM_INDICES)
    }

    /// Average x and y of the selected landmarks
    ///
    /// Fails with a missing-data error if any index is absent; the caller is
    /// expected to skip the frame.
    pub fn aggregate(&self, hand: &[Landmark]) -> Result<Point> {
        if self.indices.is_empty() || hand.is_empty() {
            return Err(InputError::NoHand);
        }

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for &index in &self.indices {
            let landmark = hand.get(index).ok_or(InputError::MissingLandmark {
                index,
                available: hand.len(),
            })?;
            sum_x += landmark.x;
            sum_y += landmark.y;
        }

        let count = self.indices.len() as f64;
        let point = Point::new(sum_x / count, sum_y / count);
        trace!("Palm centre: ({:.4}, {:.4})", point.x, point.y);
        Ok(point)
    }

    /// Aggregate the dominant hand of a recognition result
    pub fn aggregate_result(&self, result: &RecognitionResult) -> Result<Point> {
        self.aggregate(result.primary_hand()?)
    }
}

impl Default for LandmarkAggregator {
    fn default() -> Self {
        Self::palm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_hand(x: f64, y: f64) -> Vec<Landmark> {
        vec![Landmark::new(x, y); HAND_LANDMARK_COUNT]
    }

    #[test]
    fn test_palm_average() {
        let mut hand = uniform_hand(0.0, 0.0);
        hand[0] = Landmark::new(0.1, 0.9);
        hand[5] = Landmark::new(0.2, 0.8);
        hand[9] = Landmark::new(0.3, 0.7);
        hand[13] = Landmark::new(0.4, 0.6);
        hand[17] = Landmark::new(0.5, 0.5);
        // Fingertips must not influence the result
        hand[8] = Landmark::new(1.0, 1.0);

        let point = LandmarkAggregator::palm().aggregate(&hand).unwrap();
        assert!((point.x - 0.3).abs() < 1e-9);
        assert!((point.y - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_missing_index() {
        let hand = uniform_hand(0.5, 0.5)[..10].to_vec();
        match LandmarkAggregator::palm().aggregate(&hand) {
            Err(InputError::MissingLandmark { index, available }) => {
                assert_eq!(index, 13);
                assert_eq!(available, 10);
            }
            other => panic!("Expected MissingLandmark, got {:?}", other),
        }
    }

    #[test]
    fn test_no_hand() {
        let result = RecognitionResult::empty();
        assert!(matches!(
            LandmarkAggregator::palm().aggregate_result(&result),
            Err(InputError::NoHand)
        ));

        let result = RecognitionResult {
            landmarks: vec![vec![]],
            gestures: vec![],
        };
        assert!(matches!(result.primary_hand(), Err(InputError::NoHand)));
    }

    #[test]
    fn test_top_gesture_uses_rank_zero() {
        let result = RecognitionResult {
            landmarks: vec![uniform_hand(0.5, 0.5)],
            gestures: vec![vec![
                GestureCategory {
                    category_name: "Closed_Fist".into(),
                    score: 0.9,
                },
                GestureCategory {
                    category_name: "ILoveYou".into(),
                    score: 0.1,
                },
            ]],
        };
        assert_eq!(result.top_gesture().unwrap(), GestureLabel::ClosedFist);
    }

    #[test]
    fn test_missing_gesture_arrays() {
        let mut result = RecognitionResult::empty();
        assert!(matches!(result.top_gesture(), Err(InputError::NoGesture)));

        result.gestures = vec![vec![]];
        assert!(matches!(result.top_gesture(), Err(InputError::NoGesture)));
    }

    #[test]
    fn test_deserialize_recognizer_shape() {
        let json = r#"{
            "landmarks": [[{"x": 0.5, "y": 0.25, "z": -0.01}]],
            "gestures": [[{"categoryName": "ILoveYou", "score": 0.77}]]
        }"#;
        let result: RecognitionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.landmarks[0][0], Landmark { x: 0.5, y: 0.25, z: -0.01 });
        assert_eq!(result.top_gesture().unwrap(), GestureLabel::ILoveYou);
    }
}
