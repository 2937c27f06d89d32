use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment classes the bundled pipeline is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "Negative"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Positive => write!(f, "Positive"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            "positive" => Ok(Self::Positive),
            _ => anyhow::bail!(
                "Invalid sentiment: {}. Must be 'positive', 'negative' or 'neutral'",
                s
            ),
        }
    }
}

impl Sentiment {
    /// Map an app-store star rating (1-5) to a training label.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => Self::Negative,
            3 => Self::Neutral,
            _ => Self::Positive,
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Negative, Self::Neutral, Self::Positive]
    }
}
