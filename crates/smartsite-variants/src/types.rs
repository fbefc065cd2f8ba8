//! Variant dimensions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a tenant intends to use the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteUsageType {
    /// Page builder plus every content tool
    FullWebsite,
    /// Content tools without website building
    ToolsOnly,
}

impl WebsiteUsageType {
    /// All usage types, in catalog order
    pub const ALL: [WebsiteUsageType; 2] = [Self::FullWebsite, Self::ToolsOnly];

    /// Wire/storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullWebsite => "full_website",
            Self::ToolsOnly => "tools_only",
        }
    }
}

impl FromStr for WebsiteUsageType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_website" => Ok(Self::FullWebsite),
            "tools_only" => Ok(Self::ToolsOnly),
            other => Err(ParseTypeError::UsageType(other.to_string())),
        }
    }
}

impl fmt::Display for WebsiteUsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who operates the tenant's site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Owner of an established business
    BusinessOwner,
    /// Single-person business
    SoloEntrepreneur,
    /// Several collaborators sharing the back-office
    Team,
}

impl UserType {
    /// All user types, in catalog order
    pub const ALL: [UserType; 3] = [Self::BusinessOwner, Self::SoloEntrepreneur, Self::Team];

    /// Wire/storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BusinessOwner => "business_owner",
            Self::SoloEntrepreneur => "solo_entrepreneur",
            Self::Team => "team",
        }
    }
}

impl FromStr for UserType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business_owner" => Ok(Self::BusinessOwner),
            "solo_entrepreneur" => Ok(Self::SoloEntrepreneur),
            "team" => Ok(Self::Team),
            other => Err(ParseTypeError::UserType(other.to_string())),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown variant dimension value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTypeError {
    /// Not a known website usage type
    #[error("unknown website usage type: {0}")]
    UsageType(String),
    /// Not a known user type
    #[error("unknown user type: {0}")]
    UserType(String),
}
