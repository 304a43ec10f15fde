//! Diagnostic attributes attached to every posted entry.

use std::collections::BTreeMap;

use crate::types::Locale;

/// Attribute map as sent on the wire.
pub type Attributes = BTreeMap<String, String>;

/// Supplies best-effort platform attributes (OS, device, app, locale).
///
/// Implementations omit every key they cannot determine.
pub trait AttributesProvider: Send + Sync {
    fn default_attributes(&self, locale: &Locale) -> Attributes;
}

/// Provider that contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAttributes;

impl AttributesProvider for NoAttributes {
    fn default_attributes(&self, _locale: &Locale) -> Attributes {
        Attributes::new()
    }
}

/// Overlay `custom` on top of `defaults`. Caller values win on collision.
pub fn merge_attributes<I, K, V>(defaults: Attributes, custom: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut merged = defaults;
    for (key, value) in custom {
        merged.insert(key.into(), value.into());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_values_win() {
        let defaults = Attributes::from([("OS".to_string(), "iOS".to_string())]);
        let merged = merge_attributes(defaults, [("OS", "override"), ("Age", "23")]);
        assert_eq!(
            merged,
            Attributes::from([
                ("OS".to_string(), "override".to_string()),
                ("Age".to_string(), "23".to_string()),
            ])
        );
    }

    #[test]
    fn defaults_survive_without_custom() {
        let defaults = Attributes::from([("Language".to_string(), "sv".to_string())]);
        let merged = merge_attributes(defaults.clone(), Vec::<(String, String)>::new());
        assert_eq!(merged, defaults);
    }

    #[test]
    fn no_attributes_is_empty() {
        assert!(NoAttributes.default_attributes(&Locale::default()).is_empty());
    }
}
