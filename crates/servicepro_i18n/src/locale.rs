use std::fmt;

/// Normalize locale identifiers to a canonical-ish form for lookup.
///
/// - Trims whitespace.
/// - Converts `_` to `-` (some platforms report `en_US`).
/// - Lowercases; the site's locale set is keyed by lowercase ids.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-").to_ascii_lowercase()
}

/// The primary language subtag of a language tag.
///
/// Example:
/// - `ar-EG` -> `ar`
/// - `en_US` -> `en`
/// - `""` -> `""`
pub fn primary_subtag(tag: &str) -> String {
    normalize_locale(tag)
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Text and layout direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Value for the `dir` attribute and the body direction class.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported locale and its direction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale {
    pub id: String,
    pub direction: Direction,
}

impl Locale {
    pub fn new(id: &str, direction: Direction) -> Self {
        Self {
            id: normalize_locale(id),
            direction,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction.is_rtl()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_locale("  en_US "), "en-us");
        assert_eq!(normalize_locale("AR"), "ar");
    }

    #[test]
    fn primary_subtag_ignores_region() {
        assert_eq!(primary_subtag("ar-EG"), "ar");
        assert_eq!(primary_subtag("ar-SA"), "ar");
        assert_eq!(primary_subtag("fr_FR"), "fr");
        assert_eq!(primary_subtag("en"), "en");
        assert_eq!(primary_subtag(""), "");
    }

    #[test]
    fn direction_strings() {
        assert_eq!(Direction::Rtl.as_str(), "rtl");
        assert_eq!(Direction::Ltr.to_string(), "ltr");
        assert!(Locale::new("ar", Direction::Rtl).is_rtl());
    }
}
