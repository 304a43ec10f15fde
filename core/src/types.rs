//! Identity values passed into every operation.
//!
//! # Design
//! All of these are plain values. `User::client_id` is resolved by the host
//! (see the `qualtive` crate) before a `User` is built; the core never
//! generates or persists ids.

use std::fmt;

use serde::Serialize;

/// Which form on which tenant account: `(container_id, question_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Collection {
    pub container_id: String,
    pub question_id: String,
}

impl Collection {
    pub fn new(container_id: impl Into<String>, question_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            question_id: question_id.into(),
        }
    }
}

/// The person posting an entry. Serializes to the `user` wire object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable per installation.
    pub client_id: String,
    /// Host application defined user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            id: None,
            name: None,
            email: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A locale identifier such as `sv_SE` or `en`.
///
/// Accepts both `_` and `-` separators and ignores any `.charset` or
/// `@modifier` suffix (`sv_SE.UTF-8` becomes `sv_SE`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    identifier: String,
}

impl Locale {
    pub fn new(identifier: &str) -> Self {
        let identifier = identifier
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .replace('-', "_");
        Self { identifier }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Value for the `Accept-Language` header.
    pub fn accept_language(&self) -> String {
        self.identifier.replace('_', "-")
    }

    /// Lowercase language code, e.g. `sv`.
    pub fn language(&self) -> Option<&str> {
        self.identifier
            .split('_')
            .next()
            .filter(|code| !code.is_empty() && code.chars().all(|c| c.is_ascii_lowercase()))
    }

    /// Uppercase region code, e.g. `SE`.
    pub fn region(&self) -> Option<&str> {
        self.identifier
            .split('_')
            .skip(1)
            .find(|part| {
                (part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase()))
                    || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
            })
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::new("en_US")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_omits_absent_fields() {
        let json = serde_json::to_value(User::new("cid")).unwrap();
        assert_eq!(json, serde_json::json!({ "clientId": "cid" }));

        let json = serde_json::to_value(
            User::new("cid")
                .with_id("42")
                .with_name("Ada")
                .with_email("ada@example.com"),
        )
        .unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn locale_parts() {
        let locale = Locale::new("sv_SE.UTF-8");
        assert_eq!(locale.identifier(), "sv_SE");
        assert_eq!(locale.accept_language(), "sv-SE");
        assert_eq!(locale.language(), Some("sv"));
        assert_eq!(locale.region(), Some("SE"));
    }

    #[test]
    fn locale_with_script_and_dash() {
        let locale = Locale::new("zh-Hans-CN");
        assert_eq!(locale.accept_language(), "zh-Hans-CN");
        assert_eq!(locale.language(), Some("zh"));
        assert_eq!(locale.region(), Some("CN"));
    }

    #[test]
    fn locale_without_region() {
        let locale = Locale::new("en");
        assert_eq!(locale.language(), Some("en"));
        assert_eq!(locale.region(), None);
    }
}
