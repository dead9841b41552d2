//! The closed set of line-prefix glyphs used to format recap answers.

use crate::error::{BlockerError, Result};

/// A divider glyph prefixed to every line of a recap answer.
///
/// The domain is closed: anything outside these three is rejected, never
/// silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divider {
    Bullet,
    Arrow,
    Dash,
}

/// All dividers, in the order they are offered interactively.
pub const ALL_DIVIDERS: [Divider; 3] = [Divider::Bullet, Divider::Arrow, Divider::Dash];

impl Divider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Divider::Bullet => "\u{2022}",
            Divider::Arrow => ">",
            Divider::Dash => "-",
        }
    }

    /// Parses a glyph into a divider, rejecting anything outside the set.
    pub fn parse(glyph: &str) -> Result<Divider> {
        ALL_DIVIDERS
            .into_iter()
            .find(|d| d.as_str() == glyph)
            .ok_or_else(|| BlockerError::InvalidDivider(glyph.to_string()))
    }

    /// Returns the divider a line already starts with, if any.
    pub fn detect(line: &str) -> Option<Divider> {
        ALL_DIVIDERS
            .into_iter()
            .find(|d| line.trim_start().starts_with(d.as_str()))
    }

    /// Strips a leading divider glyph (and one following space) from a line.
    /// Lines without a known divider come back unchanged.
    pub fn strip(line: &str) -> &str {
        let trimmed = line.trim_start();
        match Divider::detect(trimmed) {
            Some(divider) => trimmed[divider.as_str().len()..].trim_start(),
            None => trimmed,
        }
    }

    /// Prefixes a line with this divider, replacing any existing one.
    /// Never double-prefixes.
    pub fn apply(&self, line: &str) -> String {
        format!("{} {}", self.as_str(), Divider::strip(line))
    }
}

impl std::fmt::Display for Divider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_known_glyphs() {
        assert_eq!(Divider::parse("\u{2022}").unwrap(), Divider::Bullet);
        assert_eq!(Divider::parse(">").unwrap(), Divider::Arrow);
        assert_eq!(Divider::parse("-").unwrap(), Divider::Dash);
    }

    #[test]
    fn test_parse_rejects_unknown_glyph() {
        assert!(matches!(
            Divider::parse("*"),
            Err(BlockerError::InvalidDivider(_))
        ));
    }

    #[test]
    fn test_detect_finds_leading_divider() {
        assert_eq!(Divider::detect("- shipped the parser"), Some(Divider::Dash));
        assert_eq!(Divider::detect("> reviewed PRs"), Some(Divider::Arrow));
        assert_eq!(Divider::detect("no divider here"), None);
    }

    #[test]
    fn test_apply_replaces_existing_divider_without_doubling() {
        let bullet = Divider::Bullet;
        assert_eq!(bullet.apply("- fixed the build"), "\u{2022} fixed the build");
        assert_eq!(
            bullet.apply("\u{2022} fixed the build"),
            "\u{2022} fixed the build"
        );
    }

    #[test]
    fn test_apply_prefixes_bare_line() {
        assert_eq!(Divider::Dash.apply("wrote tests"), "- wrote tests");
    }
}
