//! Permission-to-visibility resolution.
//!
//! - No IO
//! - No panics
//! - Output order is catalog order

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{Catalog, Module, Permission, SectionCategory, SectionDescriptor, SectionId, User};

/// Any-of predicate: an empty requirement set is always satisfied.
fn any_of<T: Ord>(required: &[T], held: &BTreeSet<T>) -> bool {
    required.is_empty() || required.iter().any(|r| held.contains(r))
}

/// Whether `user` may open `section`.
///
/// Permission and module requirements are independent any-of sets and both
/// must hold. Unknown requirement strings simply never match.
pub fn is_accessible(user: &User, section: &SectionDescriptor) -> bool {
    any_of(&section.required_permissions, &user.permissions)
        && any_of(&section.required_modules, &user.modules)
}

/// Ids of every catalog section `user` may open, in catalog order.
pub fn accessible_sections(user: &User, catalog: &Catalog) -> Vec<SectionId> {
    catalog
        .iter()
        .filter(|section| is_accessible(user, section))
        .map(|section| section.id)
        .collect()
}

/// Group `accessible` ids by category for navigation display.
///
/// Groups appear in the catalog order of their first member; ids inside a
/// group keep catalog order. Ids absent from the catalog are dropped.
pub fn group_by_category(
    catalog: &Catalog,
    accessible: &[SectionId],
) -> Vec<(SectionCategory, Vec<SectionId>)> {
    let mut groups: Vec<(SectionCategory, Vec<SectionId>)> = Vec::new();

    for section in catalog.iter().filter(|s| accessible.contains(&s.id)) {
        match groups.iter_mut().find(|(category, _)| *category == section.category) {
            Some((_, ids)) => ids.push(section.id),
            None => groups.push((section.category, vec![section.id])),
        }
    }

    groups
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Why a section is (or is not) visible to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub section: SectionId,
    pub granted: bool,
    pub reason: String,
    /// Requirement set left unsatisfied (empty when satisfied or unrestricted).
    pub missing_permissions: Vec<Permission>,
    pub missing_modules: Vec<Module>,
}

/// Explain the access decision for `section`.
///
/// Agrees with [`is_accessible`] on the `granted` flag.
pub fn explain_access(user: &User, section: &SectionDescriptor) -> AccessExplanation {
    let permissions_ok = any_of(&section.required_permissions, &user.permissions);
    let modules_ok = any_of(&section.required_modules, &user.modules);

    let missing_permissions = if permissions_ok {
        Vec::new()
    } else {
        section.required_permissions.clone()
    };
    let missing_modules = if modules_ok {
        Vec::new()
    } else {
        section.required_modules.clone()
    };

    let reason = match (permissions_ok, modules_ok) {
        _ if section.is_unrestricted() => "section has no requirements".to_string(),
        (true, true) => "user satisfies every requirement".to_string(),
        (false, true) => format!(
            "user holds none of the permissions {:?}",
            names(&missing_permissions)
        ),
        (true, false) => format!(
            "none of the modules {:?} is enabled for the user",
            names(&missing_modules)
        ),
        (false, false) => format!(
            "user holds none of the permissions {:?} and none of the modules {:?}",
            names(&missing_permissions),
            names(&missing_modules)
        ),
    };

    AccessExplanation {
        section: section.id,
        granted: permissions_ok && modules_ok,
        reason,
        missing_permissions,
        missing_modules,
    }
}

fn names<T: core::fmt::Display>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
