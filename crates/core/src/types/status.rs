//! Enumerated values shared by the site, the dashboard and the database.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing one of the enumerations below from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// How a submitter prefers to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "contact_method", rename_all = "lowercase")
)]
pub enum ContactMethod {
    Email,
    Phone,
    WhatsApp,
}

impl ContactMethod {
    /// Every option, in the order the forms list them.
    pub const ALL: [Self; 3] = [Self::Email, Self::Phone, Self::WhatsApp];

    /// Label shown on forms and in exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::WhatsApp => "WhatsApp",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("contact method", s))
    }
}

/// Internship domain an applicant can choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "internship_domain", rename_all = "snake_case")
)]
pub enum InternshipDomain {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "App Development")]
    AppDevelopment,
    #[serde(rename = "Software Development")]
    SoftwareDevelopment,
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    #[serde(rename = "Digital Marketing & Graphic Design")]
    DigitalMarketingDesign,
    #[serde(rename = "Data Analysis")]
    DataAnalysis,
    #[serde(rename = "AI Engineer")]
    AiEngineer,
}

impl InternshipDomain {
    /// Every option, in the order the internship form lists them.
    pub const ALL: [Self; 7] = [
        Self::WebDevelopment,
        Self::AppDevelopment,
        Self::SoftwareDevelopment,
        Self::CloudComputing,
        Self::DigitalMarketingDesign,
        Self::DataAnalysis,
        Self::AiEngineer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebDevelopment => "Web Development",
            Self::AppDevelopment => "App Development",
            Self::SoftwareDevelopment => "Software Development",
            Self::CloudComputing => "Cloud Computing",
            Self::DigitalMarketingDesign => "Digital Marketing & Graphic Design",
            Self::DataAnalysis => "Data Analysis",
            Self::AiEngineer => "AI Engineer",
        }
    }
}

impl fmt::Display for InternshipDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InternshipDomain {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("internship domain", s))
    }
}

/// Role stored on an allow-list record.
///
/// Unknown identities are recorded as [`AdminRole::User`]; only an operator
/// promotes a record to [`AdminRole::Admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Recorded but not allowed to read submissions.
    #[default]
    User,
    /// Full access to the dashboard.
    Admin,
}

impl AdminRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseEnumError::new("admin role", s)),
        }
    }
}

/// The two child collections under a submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChildKind {
    #[default]
    Contact,
    Internship,
}

impl ChildKind {
    /// Collection name, also used as URL path segment and tab key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Internship => "internship",
        }
    }

    /// Value of the `Type` column in spreadsheet exports.
    #[must_use]
    pub const fn export_label(self) -> &'static str {
        match self {
            Self::Contact => "Contact Inquiry",
            Self::Internship => "Internship Application",
        }
    }
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChildKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact" => Ok(Self::Contact),
            "internship" => Ok(Self::Internship),
            _ => Err(ParseEnumError::new("collection", s)),
        }
    }
}
