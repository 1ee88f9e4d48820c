//! Request options for the read operations.

use serde::{Deserialize, Serialize};

/// Article categories with a dedicated snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ComputerScience,
    Business,
    Humanities,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ComputerScience => "computer-science",
            Self::Business => "business",
            Self::Humanities => "humanities",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "computer-science" => Ok(Self::ComputerScience),
            "business" => Ok(Self::Business),
            "humanities" => Ok(Self::Humanities),
            other => Err(format!(
                "unknown category `{other}` (expected computer-science, business or humanities)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearcherStatus {
    Active,
    Alumni,
    Inactive,
}

impl ResearcherStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Alumni => "alumni",
            Self::Inactive => "inactive",
        }
    }
}

impl std::str::FromStr for ResearcherStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "alumni" => Ok(Self::Alumni),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!(
                "unknown status `{other}` (expected active, alumni or inactive)"
            )),
        }
    }
}

/// Options for listing articles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub featured: bool,
    pub category: Option<Category>,
    pub limit: Option<usize>,
}

impl ArticleQuery {
    /// Effective limit. Zero means "no limit".
    pub fn limit(&self) -> Option<usize> {
        self.limit.filter(|&n| n > 0)
    }
}

/// Options for listing researchers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearcherQuery {
    pub status: Option<ResearcherStatus>,
    pub program: Option<String>,
    pub limit: Option<usize>,
}

impl ResearcherQuery {
    /// Effective program filter. An empty string means "any program".
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref().filter(|p| !p.is_empty())
    }

    /// Effective limit. Zero means "no limit".
    pub fn limit(&self) -> Option<usize> {
        self.limit.filter(|&n| n > 0)
    }
}
