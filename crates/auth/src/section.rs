//! Admin section catalog.
//!
//! Section ids are a closed set known at compile time. The catalog is a
//! fixed, ordered list: its order decides the default landing section and
//! the order sections are shown in.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Module, Permission};

/// One navigable area of the admin console.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    Overview,
    Jobs,
    Scholarships,
    Blog,
    Services,
    Applications,
    Messages,
    Users,
    Roles,
    Settings,
}

impl SectionId {
    pub const ALL: [SectionId; 10] = [
        SectionId::Overview,
        SectionId::Jobs,
        SectionId::Scholarships,
        SectionId::Blog,
        SectionId::Services,
        SectionId::Applications,
        SectionId::Messages,
        SectionId::Users,
        SectionId::Roles,
        SectionId::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Overview => "overview",
            SectionId::Jobs => "jobs",
            SectionId::Scholarships => "scholarships",
            SectionId::Blog => "blog",
            SectionId::Services => "services",
            SectionId::Applications => "applications",
            SectionId::Messages => "messages",
            SectionId::Users => "users",
            SectionId::Roles => "roles",
            SectionId::Settings => "settings",
        }
    }

    /// Human-readable navigation label.
    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Overview => "Overview",
            SectionId::Jobs => "Job Openings",
            SectionId::Scholarships => "Scholarships",
            SectionId::Blog => "Blog Posts",
            SectionId::Services => "Services",
            SectionId::Applications => "Applications",
            SectionId::Messages => "Contact Messages",
            SectionId::Users => "Users",
            SectionId::Roles => "Roles & Permissions",
            SectionId::Settings => "Settings",
        }
    }

    /// Icon key understood by the rendering layer.
    pub fn icon(&self) -> &'static str {
        match self {
            SectionId::Overview => "layout-dashboard",
            SectionId::Jobs => "briefcase",
            SectionId::Scholarships => "graduation-cap",
            SectionId::Blog => "newspaper",
            SectionId::Services => "layers",
            SectionId::Applications => "file-text",
            SectionId::Messages => "mail",
            SectionId::Users => "users",
            SectionId::Roles => "shield",
            SectionId::Settings => "settings",
        }
    }
}

impl core::fmt::Display for SectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for SectionId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownSection(s.to_string()))
    }
}

/// Display grouping for sections.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionCategory {
    Overview,
    Recruitment,
    Content,
    Engagement,
    Administration,
}

impl SectionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SectionCategory::Overview => "Overview",
            SectionCategory::Recruitment => "Recruitment",
            SectionCategory::Content => "Content",
            SectionCategory::Engagement => "Engagement",
            SectionCategory::Administration => "Administration",
        }
    }
}

/// Static catalog entry.
///
/// `required_permissions` and `required_modules` are each any-of sets; when
/// both are non-empty, both must be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub category: SectionCategory,
    #[serde(default)]
    pub required_permissions: Vec<Permission>,
    #[serde(default)]
    pub required_modules: Vec<Module>,
}

impl SectionDescriptor {
    /// An entry with no requirements (visible to everyone).
    pub fn open(id: SectionId, category: SectionCategory) -> Self {
        Self {
            id,
            category,
            required_permissions: Vec::new(),
            required_modules: Vec::new(),
        }
    }

    pub fn requiring_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.required_permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn requiring_modules<I, M>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Module>,
    {
        self.required_modules.extend(modules.into_iter().map(Into::into));
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.required_permissions.is_empty() && self.required_modules.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate section '{0}' in catalog")]
    DuplicateSection(SectionId),

    #[error("unknown section '{0}'")]
    UnknownSection(String),
}

/// Ordered, duplicate-free list of section descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    sections: Vec<SectionDescriptor>,
}

impl Catalog {
    pub fn new(sections: Vec<SectionDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id) {
                return Err(CatalogError::DuplicateSection(section.id));
            }
        }
        Ok(Self { sections })
    }

    /// The site's admin console catalog, in landing order.
    pub fn standard() -> Self {
        use SectionCategory::*;

        Self {
            sections: vec![
                SectionDescriptor::open(SectionId::Overview, Overview),
                SectionDescriptor::open(SectionId::Jobs, Recruitment)
                    .requiring_permissions(["jobs.view", "jobs.manage"])
                    .requiring_modules(["careers"]),
                SectionDescriptor::open(SectionId::Scholarships, Recruitment)
                    .requiring_permissions(["scholarships.view", "scholarships.manage"])
                    .requiring_modules(["scholarships"]),
                SectionDescriptor::open(SectionId::Blog, Content)
                    .requiring_permissions(["blog.view", "blog.manage"])
                    .requiring_modules(["blog"]),
                SectionDescriptor::open(SectionId::Services, Content)
                    .requiring_permissions(["services.view", "services.manage"]),
                SectionDescriptor::open(SectionId::Applications, Recruitment)
                    .requiring_permissions(["applications.view", "applications.review"])
                    .requiring_modules(["careers", "scholarships"]),
                SectionDescriptor::open(SectionId::Messages, Engagement)
                    .requiring_permissions(["messages.view"]),
                SectionDescriptor::open(SectionId::Users, Administration)
                    .requiring_permissions(["users.view", "users.manage"]),
                SectionDescriptor::open(SectionId::Roles, Administration)
                    .requiring_permissions(["roles.manage"]),
                SectionDescriptor::open(SectionId::Settings, Administration)
                    .requiring_permissions(["settings.edit"]),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionDescriptor> {
        self.sections.iter()
    }

    pub fn get(&self, id: SectionId) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Catalog position of `id`, used as the tie-break order.
    pub fn position(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_starts_with_unrestricted_overview() {
        let catalog = Catalog::standard();
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.id, SectionId::Overview);
        assert!(first.is_unrestricted());
        assert_eq!(catalog.len(), SectionId::ALL.len());
    }

    #[test]
    fn standard_catalog_is_duplicate_free() {
        let sections: Vec<_> = Catalog::standard().iter().cloned().collect();
        assert!(Catalog::new(sections).is_ok());
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let err = Catalog::new(vec![
            SectionDescriptor::open(SectionId::Jobs, SectionCategory::Recruitment),
            SectionDescriptor::open(SectionId::Jobs, SectionCategory::Content),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateSection(SectionId::Jobs));
    }

    #[test]
    fn section_ids_round_trip_through_strings() {
        for id in SectionId::ALL {
            assert_eq!(id.as_str().parse::<SectionId>().unwrap(), id);
            let json = serde_json::to_value(id).unwrap();
            assert_eq!(json, serde_json::Value::String(id.as_str().to_string()));
        }
        assert!(matches!(
            "dashboard".parse::<SectionId>(),
            Err(CatalogError::UnknownSection(_))
        ));
    }

    #[test]
    fn position_follows_catalog_order() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.position(SectionId::Overview), Some(0));
        assert!(catalog.position(SectionId::Jobs) < catalog.position(SectionId::Settings));
    }
}
