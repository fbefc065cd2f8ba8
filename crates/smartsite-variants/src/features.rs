//! Feature keys and per-variant feature toggles
//!
//! [`FeatureKey`] is the single list of flags that gets synchronised into a
//! tenant's flag table. [`SiteFeatures::get`] matches on it exhaustively, so
//! a new key cannot be added without deciding its value for every variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform capability gated per tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    /// Drag-and-drop website builder
    WebsiteBuilder,
    /// Free-form page creation
    PageCreator,
    /// Foundation pages setup flow
    FoundationSetup,
    /// Blog post generation
    BlogGenerator,
    /// Social/marketing content generation
    ContentGenerator,
    /// Content management
    Cms,
    /// Multi-user collaboration
    TeamCollaboration,
    /// Entrepreneur support resources
    EntrepreneurSupport,
}

impl FeatureKey {
    /// Every key, in the order they are written to storage
    pub const ALL: [FeatureKey; 8] = [
        Self::WebsiteBuilder,
        Self::PageCreator,
        Self::FoundationSetup,
        Self::BlogGenerator,
        Self::ContentGenerator,
        Self::Cms,
        Self::TeamCollaboration,
        Self::EntrepreneurSupport,
    ];

    /// Storage key
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WebsiteBuilder => "websiteBuilder",
            Self::PageCreator => "pageCreator",
            Self::FoundationSetup => "foundationSetup",
            Self::BlogGenerator => "blogGenerator",
            Self::ContentGenerator => "contentGenerator",
            Self::Cms => "cms",
            Self::TeamCollaboration => "teamCollaboration",
            Self::EntrepreneurSupport => "entrepreneurSupport",
        }
    }
}

impl FromStr for FeatureKey {
    type Err = UnknownFeatureKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownFeatureKey(s.to_string()))
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage key that is not a [`FeatureKey`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature key: {0}")]
pub struct UnknownFeatureKey(pub String);

/// Feature toggles of one site variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFeatures {
    /// [`FeatureKey::WebsiteBuilder`]
    pub website_builder: bool,
    /// [`FeatureKey::PageCreator`]
    pub page_creator: bool,
    /// [`FeatureKey::FoundationSetup`]
    pub foundation_setup: bool,
    /// [`FeatureKey::BlogGenerator`]
    pub blog_generator: bool,
    /// [`FeatureKey::ContentGenerator`]
    pub content_generator: bool,
    /// [`FeatureKey::Cms`]
    pub cms: bool,
    /// [`FeatureKey::TeamCollaboration`]
    pub team_collaboration: bool,
    /// [`FeatureKey::EntrepreneurSupport`]
    pub entrepreneur_support: bool,
}

impl SiteFeatures {
    /// Value of a single toggle
    pub const fn get(&self, key: FeatureKey) -> bool {
        match key {
            FeatureKey::WebsiteBuilder => self.website_builder,
            FeatureKey::PageCreator => self.page_creator,
            FeatureKey::FoundationSetup => self.foundation_setup,
            FeatureKey::BlogGenerator => self.blog_generator,
            FeatureKey::ContentGenerator => self.content_generator,
            FeatureKey::Cms => self.cms,
            FeatureKey::TeamCollaboration => self.team_collaboration,
            FeatureKey::EntrepreneurSupport => self.entrepreneur_support,
        }
    }

    /// `(key, enabled)` for every [`FeatureKey`]
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, bool)> + '_ {
        FeatureKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// Keys switched on
    pub fn enabled(&self) -> Vec<FeatureKey> {
        self.iter().filter(|(_, on)| *on).map(|(key, _)| key).collect()
    }
}
