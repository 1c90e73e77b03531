//! Condition to group lookup.

use lumiere_session::{ArPresence, Group, Variety};
use serde::Serialize;

use crate::arbiter::{AxisOutcome, UnresolvedReason};

/// Where the AR condition of a mapped group came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ArBasis {
    /// The AR axis resolved from a signal.
    #[display("observed")]
    Observed,
    /// No AR signal fired and AR was taken as absent.
    #[display("absent_default")]
    AbsentDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMapping {
    pub group: Group,
    pub variety: Variety,
    pub ar: ArPresence,
    pub ar_basis: ArBasis,
}

/// Maps resolved axes to a group.
///
/// | variety | ar | group |
/// |---|---|---|
/// | low | absent | 1 |
/// | low | present | 2 |
/// | high | absent | 3 |
/// | high | present | 4 |
///
/// Returns `None` when variety is unresolved. An AR axis with no evidence at
/// all is read as absent ([`ArBasis::AbsentDefault`]); an AR axis left
/// unresolved by conflicting signals is not, and also yields `None`.
#[must_use]
pub fn map_group(variety: &AxisOutcome, ar: &AxisOutcome) -> Option<GroupMapping> {
    let variety = variety.variety()?;
    let (ar, ar_basis) = match ar {
        AxisOutcome::Resolved { .. } => (ar.ar()?, ArBasis::Observed),
        AxisOutcome::Unresolved {
            reason: UnresolvedReason::NoEvidence,
        } => (ArPresence::Absent, ArBasis::AbsentDefault),
        AxisOutcome::Unresolved { .. } => return None,
    };
    Some(GroupMapping {
        group: Group::from_condition(variety, ar),
        variety,
        ar,
        ar_basis,
    })
}
