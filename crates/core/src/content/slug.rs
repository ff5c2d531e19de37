/// Blog post slug parsing.
///
/// A slug names the stored file (`{slug}.json` or `{slug}.md`), so it must
/// stay within a single path segment:
/// - ASCII letters, digits, `-` and `_`
/// - 1 to 128 characters
use std::fmt;

use serde::{Deserialize, Serialize};

use super::validate::ValidationError;

const MAX_SLUG_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse and validate a slug.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::MissingSlug);
        }
        if raw.len() > MAX_SLUG_LEN {
            return Err(ValidationError::SlugTooLong(raw.len()));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ValidationError::InvalidSlug {
                slug: raw.to_string(),
                bad,
            });
        }
        Ok(Self(raw.to_string()))
    }

    /// Recover the slug from a stored file name by stripping `.{extension}`.
    pub fn from_file_name(name: &str, extension: &str) -> Option<Self> {
        let stem = name.strip_suffix(extension)?.strip_suffix('.')?;
        Self::parse(stem).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
