//! Experimental groups of the 2×2 study and the condition each one encodes.
//!
//! ```text
//!                AR absent   AR present
//! low variety    Group 1     Group 2
//! high variety   Group 3     Group 4
//! ```

use serde::{Deserialize, Serialize};

/// Product variety level shown to the participant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Variety {
    /// Only the shared products are listed in the gallery.
    #[display("low")]
    Low,
    /// Shared and exclusive products are listed in the gallery.
    #[display("high")]
    High,
}

/// Whether the augmented-reality viewer was available in the session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ArPresence {
    #[display("present")]
    Present,
    #[display("absent")]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GroupError {
    #[display("group {value} is outside the study range 1..=4")]
    OutOfRange { value: i64 },
    #[display("group value {raw} is not an integer")]
    NotAnInteger { raw: String },
}

/// One of the four experimental groups (1..=4).
///
/// Serializes as a bare integer, matching the `group` field of stored sessions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Group(u8);

impl Group {
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);
    pub const FOUR: Self = Self(4);

    pub const ALL: [Self; 4] = [Self::ONE, Self::TWO, Self::THREE, Self::FOUR];

    /// Maps a (variety, AR) condition to its group.
    #[must_use]
    pub const fn from_condition(variety: Variety, ar: ArPresence) -> Self {
        match (variety, ar) {
            (Variety::Low, ArPresence::Absent) => Self::ONE,
            (Variety::Low, ArPresence::Present) => Self::TWO,
            (Variety::High, ArPresence::Absent) => Self::THREE,
            (Variety::High, ArPresence::Present) => Self::FOUR,
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn variety(self) -> Variety {
        if self.0 <= 2 {
            Variety::Low
        } else {
            Variety::High
        }
    }

    #[must_use]
    pub const fn ar(self) -> ArPresence {
        if self.0 % 2 == 0 {
            ArPresence::Present
        } else {
            ArPresence::Absent
        }
    }

    /// Short label used in summaries, e.g. `"high variety / AR"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "low variety / no AR",
            2 => "low variety / AR",
            3 => "high variety / no AR",
            _ => "high variety / AR",
        }
    }

    /// Interprets a stored JSON `group` value.
    ///
    /// Integral floats (`4.0`) and numeric strings (`"2"`) are accepted, since
    /// older clients wrote the group in those forms.
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_json(value: &serde_json::Value) -> Result<Self, GroupError> {
        let not_an_integer = || GroupError::NotAnInteger {
            raw: value.to_string(),
        };
        let n = match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .ok_or_else(not_an_integer)?,
            serde_json::Value::String(s) => s.trim().parse().map_err(|_| not_an_integer())?,
            _ => return Err(not_an_integer()),
        };
        Self::try_from(n)
    }
}

impl TryFrom<i64> for Group {
    type Error = GroupError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(n @ 1..=4) => Ok(Self(n)),
            _ => Err(GroupError::OutOfRange { value }),
        }
    }
}

impl From<Group> for u8 {
    fn from(group: Group) -> Self {
        group.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_condition_roundtrip() {
        for group in Group::ALL {
            assert_eq!(Group::from_condition(group.variety(), group.ar()), group);
        }
    }

    #[test]
    fn test_condition_table() {
        assert_eq!(
            Group::from_condition(Variety::Low, ArPresence::Absent).get(),
            1
        );
        assert_eq!(
            Group::from_condition(Variety::Low, ArPresence::Present).get(),
            2
        );
        assert_eq!(
            Group::from_condition(Variety::High, ArPresence::Absent).get(),
            3
        );
        assert_eq!(
            Group::from_condition(Variety::High, ArPresence::Present).get(),
            4
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            Group::try_from(0),
            Err(GroupError::OutOfRange { value: 0 })
        );
        assert_eq!(
            Group::try_from(5),
            Err(GroupError::OutOfRange { value: 5 })
        );
        assert!(serde_json::from_value::<Group>(json!(7)).is_err());
        assert_eq!(serde_json::from_value::<Group>(json!(3)).unwrap(), Group::THREE);
    }

    #[test]
    fn test_from_json_forms() {
        assert_eq!(Group::from_json(&json!(2)), Ok(Group::TWO));
        assert_eq!(Group::from_json(&json!(4.0)), Ok(Group::FOUR));
        assert_eq!(Group::from_json(&json!("1")), Ok(Group::ONE));
        assert!(matches!(
            Group::from_json(&json!("two")),
            Err(GroupError::NotAnInteger { .. })
        ));
        assert!(matches!(
            Group::from_json(&json!(2.5)),
            Err(GroupError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_value(Group::FOUR).unwrap(), json!(4));
        assert_eq!(Group::THREE.to_string(), "3");
    }
}
