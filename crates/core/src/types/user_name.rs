//! Customer user name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// The input string is empty.
    #[error("user name cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("user name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("user name cannot contain whitespace")]
    ContainsWhitespace,
}

/// A customer's login name.
///
/// The original casing is preserved for display, but identity is
/// case-insensitive: `"puterism"` and `"PuterisM"` name the same customer.
/// Use [`UserName::normalized`] or [`UserName::matches`] whenever comparing.
///
/// ## Constraints
///
/// - Length: 1-32 characters
/// - No whitespace anywhere
///
/// ## Examples
///
/// ```
/// use shopping_cart_core::UserName;
///
/// let name = UserName::parse("gwangyeol-iM").unwrap();
/// assert_eq!(name.as_str(), "gwangyeol-iM");
/// assert_eq!(name.normalized(), "gwangyeol-im");
/// assert!(name.matches("GWANGYEOL-IM"));
///
/// assert!(UserName::parse("").is_err());
/// assert!(UserName::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Maximum length of a user name, in characters.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `UserName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 32 characters,
    /// or contains whitespace.
    pub fn parse(s: &str) -> Result<Self, UserNameError> {
        if s.is_empty() {
            return Err(UserNameError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(UserNameError::ContainsWhitespace);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the user name as a string slice, in its original casing.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `UserName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the lowercase form used for uniqueness and lookups.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison against another name.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.normalized() == other.to_lowercase()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for UserName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for UserName {
    type Err = UserNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserName {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserName {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserName {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_names() {
        assert!(UserName::parse("puterism").is_ok());
        assert!(UserName::parse("gwangyeol-iM").is_ok());
        assert!(UserName::parse("기론").is_ok());
        assert!(UserName::parse(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(UserName::parse(""), Err(UserNameError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            UserName::parse(&"a".repeat(33)),
            Err(UserNameError::TooLong { max: 32 })
        ));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 32 Hangul syllables are 96 bytes but still a valid name
        assert!(UserName::parse(&"가".repeat(32)).is_ok());
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(
            UserName::parse("tiki taka"),
            Err(UserNameError::ContainsWhitespace)
        );
        assert_eq!(
            UserName::parse(" tiki"),
            Err(UserNameError::ContainsWhitespace)
        );
    }

    #[test]
    fn test_preserves_casing() {
        let name = UserName::parse("PuterisM").unwrap();
        assert_eq!(name.as_str(), "PuterisM");
        assert_eq!(name.to_string(), "PuterisM");
    }

    #[test]
    fn test_case_insensitive_matching() {
        let name = UserName::parse("gwangyeol-im").unwrap();
        assert!(name.matches("gwangyeol-iM"));
        assert!(name.matches("GWANGYEOL-IM"));
        assert!(!name.matches("gwangyeol"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let name = UserName::parse("tiki").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"tiki\"");
    }

    #[test]
    fn test_deserialize_validates() {
        let name: UserName = serde_json::from_str("\"tiki\"").unwrap();
        assert_eq!(name.as_str(), "tiki");

        assert!(serde_json::from_str::<UserName>("\"\"").is_err());
        assert!(serde_json::from_str::<UserName>("\"two words\"").is_err());
        assert!(serde_json::from_str::<UserName>(&format!("\"{}\"", "a".repeat(33))).is_err());
    }
}
