//! Final group state of a session.

use lumiere_session::{Group, SessionId};
use serde::Serialize;

use crate::report::ReconstructionResult;

/// Where a session's group came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    #[display("explicit")]
    Explicit,
    #[display("reconstructed")]
    Reconstructed,
    #[display("unresolved")]
    Unresolved,
}

/// A session's group, keeping the three states apart.
///
/// Reports must never merge these: an explicit group, a reconstructed group
/// and an unresolved session are treated differently downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum GroupAssignment {
    /// The stored group label was valid; the engine was not run.
    Explicit { session_id: SessionId, group: Group },
    Reconstructed(ReconstructionResult),
    Unresolved(ReconstructionResult),
}

impl GroupAssignment {
    #[must_use]
    pub fn from_result(result: ReconstructionResult) -> Self {
        if result.is_resolved() {
            Self::Reconstructed(result)
        } else {
            Self::Unresolved(result)
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::Explicit { session_id, .. } => session_id,
            Self::Reconstructed(result) | Self::Unresolved(result) => result.session_id(),
        }
    }

    #[must_use]
    pub fn group(&self) -> Option<Group> {
        match self {
            Self::Explicit { group, .. } => Some(*group),
            Self::Reconstructed(result) | Self::Unresolved(result) => result.group(),
        }
    }

    #[must_use]
    pub fn source(&self) -> AssignmentSource {
        match self {
            Self::Explicit { .. } => AssignmentSource::Explicit,
            Self::Reconstructed(_) => AssignmentSource::Reconstructed,
            Self::Unresolved(_) => AssignmentSource::Unresolved,
        }
    }

    /// The engine's result, unless the group was explicit.
    #[must_use]
    pub fn result(&self) -> Option<&ReconstructionResult> {
        match self {
            Self::Explicit { .. } => None,
            Self::Reconstructed(result) | Self::Unresolved(result) => Some(result),
        }
    }
}
