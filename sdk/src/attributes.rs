//! Platform attributes gathered from the running process.

use std::env::consts;

use qualtive_core::{Attributes, AttributesProvider, Locale};

use crate::config::AppInfo;

/// Reports OS, device, app and locale details. Unknown values are omitted.
#[derive(Debug, Clone, Default)]
pub struct SystemAttributes {
    app: AppInfo,
}

impl SystemAttributes {
    pub fn new(app: AppInfo) -> Self {
        Self { app }
    }
}

impl AttributesProvider for SystemAttributes {
    fn default_attributes(&self, locale: &Locale) -> Attributes {
        let mut attributes = Attributes::new();
        let mut insert = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                attributes.insert(key.to_string(), value);
            }
        };

        insert("Platform", platform(consts::OS).map(str::to_string));
        insert("OS", os_name(consts::OS).map(str::to_string));
        insert("OS Version", os_version());
        insert("Device Model", device_model());
        insert("Device Type", device_type(consts::OS).map(str::to_string));
        insert("App ID", self.app.identifier.clone());
        insert("App Version", self.app.version.clone());
        insert("App Build", self.app.build.clone());
        insert("Language", locale.language().map(str::to_string));
        insert("Region", locale.region().map(str::to_string));
        attributes
    }
}

/// Platform family; watchOS reports as iOS.
fn platform(os: &str) -> Option<&'static str> {
    match os {
        "ios" | "watchos" => Some("iOS"),
        "tvos" => Some("tvOS"),
        "macos" => Some("macOS"),
        "android" => Some("Android"),
        "linux" => Some("Linux"),
        "windows" => Some("Windows"),
        "freebsd" => Some("FreeBSD"),
        _ => None,
    }
}

fn os_name(os: &str) -> Option<&'static str> {
    match os {
        "watchos" => Some("watchOS"),
        other => platform(other),
    }
}

fn device_type(os: &str) -> Option<&'static str> {
    match os {
        "macos" | "linux" | "windows" | "freebsd" => Some("Computer"),
        "tvos" => Some("TV"),
        "watchos" => Some("Watch"),
        _ => None,
    }
}

#[cfg(target_os = "linux")]
fn os_version() -> Option<String> {
    read_trimmed("/proc/sys/kernel/osrelease")
}

#[cfg(not(target_os = "linux"))]
fn os_version() -> Option<String> {
    None
}

#[cfg(target_os = "linux")]
fn device_model() -> Option<String> {
    read_trimmed("/sys/devices/virtual/dmi/id/product_name")
}

#[cfg(not(target_os = "linux"))]
fn device_model() -> Option<String> {
    None
}

#[cfg(target_os = "linux")]
fn read_trimmed(path: &str) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|raw| raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_and_locale_attributes() {
        let provider = SystemAttributes::new(AppInfo::new("com.example").with_version("2.0"));
        let attributes = provider.default_attributes(&Locale::new("sv_SE"));
        assert_eq!(attributes["App ID"], "com.example");
        assert_eq!(attributes["App Version"], "2.0");
        assert!(!attributes.contains_key("App Build"));
        assert_eq!(attributes["Language"], "sv");
        assert_eq!(attributes["Region"], "SE");
    }

    #[test]
    fn language_without_region() {
        let attributes = SystemAttributes::default().default_attributes(&Locale::new("fi"));
        assert_eq!(attributes["Language"], "fi");
        assert!(!attributes.contains_key("Region"));
        assert!(!attributes.contains_key("App ID"));
    }

    #[test]
    fn platform_names() {
        assert_eq!(platform("watchos"), Some("iOS"));
        assert_eq!(os_name("watchos"), Some("watchOS"));
        assert_eq!(os_name("macos"), Some("macOS"));
        assert_eq!(platform("redox"), None);
        assert_eq!(device_type("linux"), Some("Computer"));
        assert_eq!(device_type("ios"), None);
    }

    #[test]
    fn no_empty_values() {
        let attributes = SystemAttributes::default().default_attributes(&Locale::default());
        assert!(attributes.values().all(|v| !v.is_empty()));
    }
}
