//! Validated value types shared across the ZRC crates.
//!
//! Dutch registry identifiers (RSIN, BSN) carry an "elfproef" checksum; these wrappers
//! guarantee a value passed the check once constructed, so downstream code never re-validates.

/// Errors that can occur when creating validated value types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input text exceeds the maximum allowed length
    #[error("Text exceeds maximum length of {max} characters")]
    TooLong { max: usize },
    /// The input is not exactly nine digits
    #[error("Value must consist of exactly 9 digits")]
    InvalidLength,
    /// The nine digits fail the eleven-test
    #[error("Value fails the eleven-test")]
    InvalidChecksum,
}

/// A string type that guarantees non-empty content of bounded length.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` without a length bound.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a new `NonEmptyText` that may hold at most `max` characters.
    pub fn bounded(input: impl AsRef<str>, max: usize) -> Result<Self, TypeError> {
        let text = Self::new(input)?;
        if text.0.chars().count() > max {
            return Err(TypeError::TooLong { max });
        }
        Ok(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Runs the eleven-test shared by RSIN and BSN numbers.
///
/// Digits are weighted 9 down to 2, the final digit with -1; the sum must be divisible by 11.
fn eleven_test(input: &str) -> Result<(), TypeError> {
    if input.len() != 9 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypeError::InvalidLength);
    }

    let total: i32 = input
        .bytes()
        .map(|b| i32::from(b - b'0'))
        .enumerate()
        .map(|(i, digit)| if i == 8 { -digit } else { digit * (9 - i as i32) })
        .sum();

    if total % 11 == 0 {
        Ok(())
    } else {
        Err(TypeError::InvalidChecksum)
    }
}

macro_rules! eleven_test_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Parses and validates the nine-digit identifier.
            ///
            /// # Errors
            ///
            /// Returns [`TypeError::InvalidLength`] or [`TypeError::InvalidChecksum`].
            pub fn parse(input: &str) -> Result<Self, TypeError> {
                let trimmed = input.trim();
                eleven_test(trimmed)?;
                Ok(Self(trimmed.to_owned()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

eleven_test_type!(
    /// Rechtspersonen en Samenwerkingsverbanden Informatienummer, identifying an organisation.
    Rsin
);

eleven_test_type!(
    /// Burgerservicenummer, identifying a natural person.
    Bsn
);

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}
