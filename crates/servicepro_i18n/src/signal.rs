//! The ambient language signal (`navigator.language` on the web).

/// Reports the user's preferred language tag, e.g. `"ar-EG"`.
pub trait LanguageSignal {
    fn language(&self) -> Option<String>;
}

/// The operating system's locale.
#[cfg(feature = "system-locale")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLanguage;

#[cfg(feature = "system-locale")]
impl LanguageSignal for SystemLanguage {
    fn language(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// A fixed, explicitly supplied language tag (or none at all).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedLanguage(Option<String>);

impl FixedLanguage {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Some(tag.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl LanguageSignal for FixedLanguage {
    fn language(&self) -> Option<String> {
        self.0.clone()
    }
}
