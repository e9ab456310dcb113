//! Entry identifiers.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::CoreError;

/// An entry identifier: an integer, or a tenths decimal such as `33.5`.
///
/// Decimal identifiers were introduced by hand to split collisions left over
/// from renumbering events. They are carried as historical fact, never
/// generated, so a fixed-point tenths representation is exact: equality,
/// ordering and hashing all behave, and the externally observable value
/// round-trips (`96` stays an integer, `33.5` stays `33.5`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId {
    tenths: i64,
}

impl EntryId {
    /// The one structurally invalid identifier: a placeholder row predating
    /// real numbering. Never appears in any published artifact.
    pub const RESERVED_INVALID: EntryId = EntryId::from_int(0);

    pub const fn from_int(n: i64) -> Self {
        Self { tenths: n * 10 }
    }

    /// `from_parts(33, 5)` is the identifier `33.5`.
    pub const fn from_parts(units: i64, tenth: u8) -> Self {
        assert!(tenth < 10);
        Self {
            tenths: units * 10 + tenth as i64,
        }
    }

    pub fn from_f64(value: f64) -> Result<Self, CoreError> {
        let scaled = value * 10.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 || !rounded.is_finite() {
            return Err(CoreError::IdPrecision(value));
        }
        Ok(Self {
            tenths: rounded as i64,
        })
    }

    pub fn is_whole(self) -> bool {
        self.tenths % 10 == 0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.tenths / 10)
        } else {
            write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
        }
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({self})")
    }
}

impl FromStr for EntryId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .parse()
            .map_err(|_| CoreError::IdParse(s.to_owned()))?;
        EntryId::from_f64(value).map_err(|_| CoreError::IdParse(s.to_owned()))
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.tenths / 10)
        } else {
            serializer.serialize_f64(self.tenths as f64 / 10.0)
        }
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = EntryId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or tenths-decimal entry id")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntryId, E> {
                Ok(EntryId::from_int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntryId, E> {
                i64::try_from(v)
                    .map(EntryId::from_int)
                    .map_err(|_| E::custom(format!("entry id {v} out of range")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<EntryId, E> {
                EntryId::from_f64(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_ids_stay_integers() {
        let id = EntryId::from_int(96);
        assert!(id.is_whole());
        assert_eq!(id.to_string(), "96");
        assert_eq!(serde_json::to_string(&id).unwrap(), "96");
    }

    #[test]
    fn decimal_ids_round_trip() {
        let id = EntryId::from_parts(33, 5);
        assert!(!id.is_whole());
        assert_eq!(id.to_string(), "33.5");
        assert_eq!(serde_json::to_string(&id).unwrap(), "33.5");
        let back: EntryId = serde_json::from_str("33.5").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn sub_identifiers_sort_between_their_neighbours() {
        let mut ids = vec![
            EntryId::from_int(34),
            EntryId::from_parts(33, 5),
            EntryId::from_int(33),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                EntryId::from_int(33),
                EntryId::from_parts(33, 5),
                EntryId::from_int(34),
            ]
        );
    }

    #[test]
    fn rejects_sub_tenth_precision() {
        assert!(EntryId::from_f64(33.55).is_err());
        assert!(EntryId::from_f64(33.5).is_ok());
    }

    #[test]
    fn parses_string_encoded_ids() {
        assert_eq!("96".parse::<EntryId>().unwrap(), EntryId::from_int(96));
        assert_eq!(
            "33.5".parse::<EntryId>().unwrap(),
            EntryId::from_parts(33, 5)
        );
        assert!("abc".parse::<EntryId>().is_err());
    }

    #[test]
    fn reserved_id_is_zero() {
        assert_eq!(EntryId::RESERVED_INVALID, EntryId::from_int(0));
    }
}
