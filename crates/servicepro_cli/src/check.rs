//! Dictionary coverage check against the base locale.

use std::fmt;
use std::fs;
use std::path::Path;

use servicepro_i18n::{Dictionary, I18nConfig};

/// Per-locale result of checking one dictionary file.
#[derive(Debug)]
pub enum LocaleStatus {
    /// Parsed; keys the base locale has but this one lacks, and the reverse
    Loaded {
        entries: usize,
        missing: Vec<String>,
        extra: Vec<String>,
    },
    /// Unreadable or malformed; the site would fall back to an empty dictionary
    Failed(String),
}

#[derive(Debug)]
pub struct CheckReport {
    pub base: String,
    pub locales: Vec<(String, LocaleStatus)>,
}

impl CheckReport {
    pub fn has_failures(&self) -> bool {
        self.locales
            .iter()
            .any(|(_, s)| matches!(s, LocaleStatus::Failed(_)))
    }

    pub fn has_gaps(&self) -> bool {
        self.locales.iter().any(|(_, s)| {
            matches!(s, LocaleStatus::Loaded { missing, .. } if !missing.is_empty())
        })
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (locale, status) in &self.locales {
            match status {
                LocaleStatus::Loaded {
                    entries,
                    missing,
                    extra,
                } => {
                    writeln!(f, "{locale}: {entries} entries")?;
                    for key in missing {
                        writeln!(f, "  missing (present in {}): {key}", self.base)?;
                    }
                    for key in extra {
                        writeln!(f, "  extra (absent from {}): {key}", self.base)?;
                    }
                }
                LocaleStatus::Failed(reason) => writeln!(f, "{locale}: FAILED: {reason}")?,
            }
        }
        Ok(())
    }
}

fn load(lang_dir: &Path, locale: &str) -> Result<Dictionary, String> {
    let path = lang_dir.join(format!("{locale}.json"));
    let src = fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    Dictionary::parse(&src).map_err(|e| format!("{}: {e}", path.display()))
}

/// Read every configured dictionary and compare its keys with the base locale's.
pub fn check_dictionaries(lang_dir: &Path, config: &I18nConfig) -> CheckReport {
    let config = config.normalized();
    let loaded: Vec<(String, Result<Dictionary, String>)> = config
        .locales
        .iter()
        .map(|l| (l.clone(), load(lang_dir, l)))
        .collect();

    let empty = Dictionary::new();
    let base = loaded
        .iter()
        .find(|(l, _)| *l == config.base)
        .and_then(|(_, r)| r.as_ref().ok())
        .unwrap_or(&empty);

    let locales = loaded
        .iter()
        .map(|(locale, result)| {
            let status = match result {
                Ok(dict) => LocaleStatus::Loaded {
                    entries: dict.len(),
                    missing: dict.missing_from(base),
                    extra: base.missing_from(dict),
                },
                Err(reason) => LocaleStatus::Failed(reason.clone()),
            };
            (locale.clone(), status)
        })
        .collect();

    CheckReport {
        base: config.base.clone(),
        locales,
    }
}
