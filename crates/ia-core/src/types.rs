//! Stat enums and their wire ordinals.
//!
//! The backend receives enums as the decimal text of an integer ordinal. The
//! ordinal of each variant is spelled out in an explicit table so that
//! reordering the declarations can never change what goes over the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The text did not name any variant of the enum.
    #[error("invalid {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// The wire ordinal has no matching variant.
    #[error("{kind} ordinal out of range: {ordinal}")]
    OrdinalOutOfRange { kind: &'static str, ordinal: u8 },
}

/// Generates the string and ordinal conversions shared by every wire enum.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $ordinal:literal => $text:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in ordinal order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Integer ordinal sent to the backend.
            #[must_use]
            pub const fn ordinal(self) -> u8 {
                match self {
                    $( Self::$variant => $ordinal, )+
                }
            }

            /// Looks up the variant for a wire ordinal.
            pub fn from_ordinal(ordinal: u8) -> Result<Self, ValidationError> {
                match ordinal {
                    $( $ordinal => Ok(Self::$variant), )+
                    _ => Err(ValidationError::OrdinalOutOfRange { kind: $kind, ordinal }),
                }
            }

            /// Ordinal formatted as the backend expects it.
            #[must_use]
            pub fn wire(self) -> String {
                self.ordinal().to_string()
            }

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text $(| $alias)* => Ok(Self::$variant), )+
                    _ => Err(ValidationError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Unit in which a stat value is expressed.
    Measurement, "measurement" {
        /// Counts occurrences (default).
        #[default]
        Count = 0 => "count",
        Second = 1 => "second" | "seconds",
        Feet = 2 => "feet",
        Meter = 3 => "meter" | "meters",
    }
}

wire_enum! {
    /// Aggregation hint for the backend.
    Formula, "formula" {
        #[default]
        Total = 0 => "total",
        Average = 1 => "average",
    }
}

wire_enum! {
    /// Kind of hand gesture.
    GestureKind, "gesture kind" {
        #[default]
        Tap = 0 => "tap",
        DoubleTap = 1 => "double_tap" | "double-tap",
        Hold = 2 => "hold",
    }
}

wire_enum! {
    /// Which backend operation a stat is submitted through.
    StatKind, "stat kind" {
        #[default]
        CustomStat = 0 => "custom_stat" | "custom",
        Gain = 1 => "gain",
        Loss = 2 => "loss",
        Keyword = 3 => "keyword",
        Gesture = 4 => "gesture",
        Gaze = 5 => "gaze",
    }
}

/// Tenant/application key handed to the backend once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a key, rejecting empty or whitespace-only values.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::Empty { field: "API key" });
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl FromStr for ApiKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_wire_table() {
        assert_eq!(Measurement::Count.wire(), "0");
        assert_eq!(Measurement::Second.wire(), "1");
        assert_eq!(Measurement::Feet.wire(), "2");
        assert_eq!(Measurement::Meter.wire(), "3");
        assert_eq!(Formula::Total.wire(), "0");
        assert_eq!(Formula::Average.wire(), "1");
        assert_eq!(GestureKind::Tap.wire(), "0");
        assert_eq!(GestureKind::DoubleTap.wire(), "1");
        assert_eq!(GestureKind::Hold.wire(), "2");
    }

    #[test]
    fn ordinals_are_dense_and_reversible() {
        for (index, kind) in StatKind::ALL.iter().enumerate() {
            let ordinal = u8::try_from(index).unwrap();
            assert_eq!(kind.ordinal(), ordinal);
            assert_eq!(StatKind::from_ordinal(ordinal), Ok(*kind));
        }
    }

    #[test]
    fn out_of_range_ordinal_errors() {
        let err = Formula::from_ordinal(2).unwrap_err();
        assert_eq!(err.to_string(), "formula ordinal out of range: 2");
    }

    #[test]
    fn defaults_are_count_total_tap() {
        assert_eq!(Measurement::default(), Measurement::Count);
        assert_eq!(Formula::default(), Formula::Total);
        assert_eq!(GestureKind::default(), GestureKind::Tap);
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("double-tap".parse::<GestureKind>(), Ok(GestureKind::DoubleTap));
        assert_eq!("double_tap".parse::<GestureKind>(), Ok(GestureKind::DoubleTap));
        assert_eq!("seconds".parse::<Measurement>(), Ok(Measurement::Second));

        let err = "median".parse::<Formula>().unwrap_err();
        assert_eq!(err.to_string(), "invalid formula: median");
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&GestureKind::DoubleTap).unwrap();
        assert_eq!(json, r#""double_tap""#);
    }

    #[test]
    fn api_key_rejects_blank_and_redacts_debug() {
        assert!(ApiKey::new("").is_err());
        assert!(ApiKey::new("   ").is_err());

        let key = ApiKey::new("secret-123").unwrap();
        assert_eq!(key.as_str(), "secret-123");
        assert_eq!(format!("{key:?}"), "ApiKey([REDACTED])");
    }
}
