//! Outage severity classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outage severity, least severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutageTier {
    Negligible,
    Minor,
    Major,
    Critical,
}

impl OutageTier {
    pub const ALL: [Self; 4] = [Self::Negligible, Self::Minor, Self::Major, Self::Critical];

    /// Whether an outage of this tier warrants external notification.
    #[must_use]
    pub fn warrants_notification(self) -> bool {
        self >= Self::Major
    }
}

impl fmt::Display for OutageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negligible => write!(f, "NEGLIGIBLE"),
            Self::Minor => write!(f, "MINOR"),
            Self::Major => write!(f, "MAJOR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_major_and_above_notify() {
        assert!(!OutageTier::Negligible.warrants_notification());
        assert!(!OutageTier::Minor.warrants_notification());
        assert!(OutageTier::Major.warrants_notification());
        assert!(OutageTier::Critical.warrants_notification());
    }
}
