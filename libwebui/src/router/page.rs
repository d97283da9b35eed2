//! Closed page sets
//!
//! A WebUI surface has a fixed list of top-level destinations. The router is
//! generic over that list through the [`Page`] trait; [`PasswordManagerPage`]
//! is the set used by the password manager.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::WebUiError;

/// A member of a closed set of top-level destinations
pub trait Page: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Page used when the URL names nothing recognizable on first load
    const DEFAULT: Self;

    /// Every member of the set
    const ALL: &'static [Self];

    /// The path segment identifying this page, without slashes
    fn segment(self) -> &'static str;

    /// Match a path segment against the set
    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|page| page.segment() == segment)
    }

    /// Canonical absolute path of this page
    fn path(self) -> String {
        format!("/{}", self.segment())
    }
}

/// The different pages of the password manager that can be shown at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordManagerPage {
    Passwords,
    Checkup,
    Settings,
}

impl Page for PasswordManagerPage {
    const DEFAULT: Self = PasswordManagerPage::Passwords;

    const ALL: &'static [Self] = &[
        PasswordManagerPage::Passwords,
        PasswordManagerPage::Checkup,
        PasswordManagerPage::Settings,
    ];

    fn segment(self) -> &'static str {
        match self {
            PasswordManagerPage::Passwords => "passwords",
            PasswordManagerPage::Checkup => "checkup",
            PasswordManagerPage::Settings => "settings",
        }
    }
}

impl fmt::Display for PasswordManagerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for PasswordManagerPage {
    type Err = WebUiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_segment(s).ok_or_else(|| {
            WebUiError::InvalidInput(format!(
                "unknown page '{}'. Valid options: passwords, checkup, settings",
                s
            ))
        })
    }
}

/// Well-known query parameter keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlParam {
    /// Current term of the page's search box
    SearchTerm,
}

impl UrlParam {
    pub fn key(self) -> &'static str {
        match self {
            UrlParam::SearchTerm => "q",
        }
    }
}
