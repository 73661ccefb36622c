//! User-facing outcome messages for sync operations.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    /// The change was kept on this device only.
    Advisory,
    /// The operation could not produce the expected data.
    Error,
}

/// Content of the single message slot exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMessage {
    SavedLocallyOnly,
    DeletedLocallyOnly,
    DeletedAllLocallyOnly,
    LoadFailed,
    MirrorWriteFailed,
}

impl SyncMessage {
    pub fn severity(self) -> MessageSeverity {
        match self {
            Self::SavedLocallyOnly | Self::DeletedLocallyOnly | Self::DeletedAllLocallyOnly => {
                MessageSeverity::Advisory
            }
            Self::LoadFailed | Self::MirrorWriteFailed => MessageSeverity::Error,
        }
    }
}

impl Display for SyncMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::SavedLocallyOnly => "Note saved locally only",
            Self::DeletedLocallyOnly => "Note deleted locally only",
            Self::DeletedAllLocallyOnly => "Notes deleted locally only",
            Self::LoadFailed => "Failed to load notes",
            Self::MirrorWriteFailed => "Failed to save notes on this device",
        };
        f.write_str(text)
    }
}
