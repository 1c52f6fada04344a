use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse polarity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Tag stored as a memory's emotional context.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionState {
    pub primary: Sentiment,
    pub intensity: f32,
}

/// Anything that can tag a message with an emotion. Keyword lists today,
/// a classifier model later.
pub trait EmotionClassifier: Send + Sync {
    fn detect(&self, text: &str) -> EmotionState;
}

const POSITIVE: &[&str] = &["thanks", "love", "great", "awesome", "happy"];
const NEGATIVE: &[&str] = &["angry", "hate", "bad", "upset", "sad"];

/// Substring keyword matcher. Negative words win over positive ones.
#[derive(Debug, Clone, Default)]
pub struct KeywordTagger;

impl EmotionClassifier for KeywordTagger {
    fn detect(&self, text: &str) -> EmotionState {
        let lowered = text.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

        if mentions(NEGATIVE) {
            EmotionState {
                primary: Sentiment::Negative,
                intensity: 0.8,
            }
        } else if mentions(POSITIVE) {
            EmotionState {
                primary: Sentiment::Positive,
                intensity: 0.7,
            }
        } else {
            EmotionState {
                primary: Sentiment::Neutral,
                intensity: 0.3,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_polarity() {
        let tagger = KeywordTagger;
        assert_eq!(tagger.detect("I feel SAD today").primary, Sentiment::Negative);
        assert_eq!(tagger.detect("Thanks, that was great").primary, Sentiment::Positive);
        assert_eq!(tagger.detect("The sky is blue").primary, Sentiment::Neutral);
    }

    #[test]
    fn negative_wins_over_positive() {
        let state = KeywordTagger.detect("I love it but I'm upset");
        assert_eq!(state.primary, Sentiment::Negative);
        assert_eq!(state.intensity, 0.8);
    }

    #[test]
    fn matches_inside_words() {
        // "badge" contains "bad".
        assert_eq!(KeywordTagger.detect("my badge").primary, Sentiment::Negative);
    }

    #[test]
    fn neutral_intensity() {
        let state = KeywordTagger.detect("");
        assert_eq!(state.primary, Sentiment::Neutral);
        assert_eq!(state.intensity, 0.3);
        assert_eq!(state.primary.to_string(), "neutral");
    }
}
