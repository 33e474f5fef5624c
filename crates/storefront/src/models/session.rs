//! Session-related types.
//!
//! Types stored in the session for authentication state and UI preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use toiletpro_core::{Email, UserId};

use super::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
}

impl CurrentUser {
    /// Uppercased first letter of the name, shown in the avatar bubble.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map_or_else(|| "U".to_string(), |c| c.to_uppercase().collect())
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Admin console login state. Present in the session only while logged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    /// Username the admin logged in with.
    pub username: String,
}

/// Error returned when a preference value is not one of the known options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preference value: {0}")]
pub struct UnknownPreference(pub String);

/// Base font size of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for FontSize {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(UnknownPreference(other.to_string())),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color theme of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Blue,
}

impl Theme {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Blue => "blue",
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "dark" => Ok(Self::Dark),
            "blue" => Ok(Self::Blue),
            other => Err(UnknownPreference(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub font_size: FontSize,
    pub theme: Theme,
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_size: FontSize::default(),
            theme: Theme::default(),
            language: "en".to_string(),
        }
    }
}

impl Preferences {
    /// CSS classes applied to `<body>`.
    #[must_use]
    pub fn body_class(&self) -> String {
        format!("theme-{} font-{}", self.theme, self.font_size)
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for display preferences.
    pub const PREFERENCES: &str = "preferences";

    /// Key for the admin console login.
    pub const ADMIN: &str = "admin";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_default_body_class() {
        let prefs = Preferences::default();
        assert_eq!(prefs.body_class(), "theme-default font-medium");
        assert_eq!(prefs.language, "en");
    }

    #[test]
    fn test_preference_parsing() {
        assert_eq!("large".parse::<FontSize>().unwrap(), FontSize::Large);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("huge".parse::<FontSize>().is_err());
        assert!("Dark".parse::<Theme>().is_err());
    }

    #[test]
    fn test_body_class_reflects_choices() {
        let prefs = Preferences {
            font_size: FontSize::Small,
            theme: Theme::Blue,
            ..Preferences::default()
        };
        assert_eq!(prefs.body_class(), "theme-blue font-small");
    }

    #[test]
    fn test_initial() {
        let mut user = CurrentUser {
            id: UserId::new(1),
            name: "sarah".to_string(),
            email: Email::parse("sarah@example.com").unwrap(),
        };
        assert_eq!(user.initial(), "S");

        user.name = String::new();
        assert_eq!(user.initial(), "U");
    }
}
