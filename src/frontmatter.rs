//! YAML frontmatter extraction for markdown docs.

use chrono::NaiveDate;
use serde_yaml::Mapping;

/// Extracts the YAML frontmatter block from a markdown document.
///
/// Returns `None` when the document has no leading `---` fence, the
/// fence is unterminated, or the block is not a YAML mapping.
#[must_use]
pub fn parse(text: &str) -> Option<Mapping> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    let rest = rest.strip_prefix('\n')?;
    let end = rest.find("\n---")?;
    serde_yaml::from_str::<Mapping>(&rest[..end]).ok()
}

/// Returns the string value of a frontmatter field, if present and
/// non-empty.
#[must_use]
pub fn field<'a>(frontmatter: &'a Mapping, key: &str) -> Option<&'a str> {
    frontmatter.get(key).and_then(serde_yaml::Value::as_str).filter(|s| !s.trim().is_empty())
}

/// Parses a frontmatter date field (`YYYY-MM-DD`, with or without a
/// trailing time component).
#[must_use]
pub fn date_field(frontmatter: &Mapping, key: &str) -> Option<NaiveDate> {
    let raw = field(frontmatter, key)?;
    let date_part = raw.split(|c| c == 'T' || c == ' ').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
