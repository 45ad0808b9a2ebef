use std::{fmt::Display, str::FromStr};

#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Copy,
    Hash,
    Default,
)]
pub struct DbId(u64);

impl From<u64> for DbId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for DbId {
    type Error = anyhow::Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value >= 0 {
            Ok(Self(value as u64))
        } else {
            anyhow::bail!("Negative values not supported as Id's. Value: {value}");
        }
    }
}

impl From<DbId> for u64 {
    fn from(value: DbId) -> Self {
        value.0
    }
}

impl Display for DbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DbId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// Returned by the backend on successful creation of a record
///
/// Only the identifier is used, the rest of the record is fetched again when
/// it is displayed
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Created {
    pub id: DbId,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, true)]
    #[case(7, true)]
    #[case(-1, false)]
    fn conversion_from_signed(#[case] value: i64, #[case] is_ok: bool) {
        let actual: anyhow::Result<DbId> = value.try_into();
        assert_eq!(actual.is_ok(), is_ok);
    }

    #[test]
    fn serializes_as_plain_number() {
        let actual = serde_json::to_string(&DbId::from(12)).unwrap();
        assert_eq!(actual, "12");
    }
}
