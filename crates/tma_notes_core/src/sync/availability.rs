//! Backend availability state and transition detection.

use std::fmt::{Display, Formatter};

/// Result of the most recent remote attempt, as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    /// No remote attempt has completed yet.
    #[default]
    Unknown,
    Available,
    Unavailable,
}

impl Availability {
    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}

/// Connectivity change worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityTransition {
    WentOffline,
    CameBackOnline,
}

impl Display for AvailabilityTransition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WentOffline => write!(f, "went offline"),
            Self::CameBackOnline => write!(f, "came back online"),
        }
    }
}

/// Edge-triggered availability tracker.
///
/// `Unknown -> Available` is the normal first success and is not reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityTracker {
    current: Availability,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Availability {
        self.current
    }

    /// Records one remote outcome and returns the transition it caused.
    pub fn observe(&mut self, reachable: bool) -> Option<AvailabilityTransition> {
        let next = if reachable {
            Availability::Available
        } else {
            Availability::Unavailable
        };
        let previous = std::mem::replace(&mut self.current, next);
        match (previous, next) {
            (Availability::Unavailable, Availability::Available) => {
                Some(AvailabilityTransition::CameBackOnline)
            }
            (Availability::Unknown | Availability::Available, Availability::Unavailable) => {
                Some(AvailabilityTransition::WentOffline)
            }
            _ => None,
        }
    }
}
