//! Process-wide category registry.
//!
//! The table is a `static` and never changes at runtime. Rules hold
//! `&'static Category` references into it rather than private copies.

use crate::ids;
use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

static CATEGORIES: [Category; 8] = [
    Category {
        id: ids::CATEGORY_EXAMPLES,
        name: "Examples",
        description: "Examples help consumers understand how API calls should look.",
    },
    Category {
        id: ids::CATEGORY_OPERATIONS,
        name: "Operations",
        description: "Operations are the core of the contract: paths, methods, parameters, and responses.",
    },
    Category {
        id: ids::CATEGORY_INFO,
        name: "Contract Information",
        description: "The info object carries the contact, license, and description of the API.",
    },
    Category {
        id: ids::CATEGORY_DESCRIPTIONS,
        name: "Descriptions",
        description: "Documentation quality of operations, parameters, and schemas.",
    },
    Category {
        id: ids::CATEGORY_SCHEMAS,
        name: "Schemas",
        description: "Schemas describe the shape of requests and responses.",
    },
    Category {
        id: ids::CATEGORY_SECURITY,
        name: "Security",
        description: "Security schemes and content that could expose consumers to risk.",
    },
    Category {
        id: ids::CATEGORY_TAGS,
        name: "Tags",
        description: "Tags group operations for navigation and documentation.",
    },
    Category {
        id: ids::CATEGORY_VALIDATION,
        name: "Validation",
        description: "Structural validity of the document against its specification.",
    },
];

/// Look up a category by id.
///
/// Returns `None` if the identifier is not registered.
pub fn lookup_category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Every registered category, in report order.
pub fn all_categories() -> &'static [Category] {
    &CATEGORIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_shared_reference() {
        let a = lookup_category(ids::CATEGORY_SCHEMAS).expect("schemas category");
        let b = lookup_category(ids::CATEGORY_SCHEMAS).expect("schemas category");
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.name, "Schemas");
    }

    #[test]
    fn unknown_category_is_none() {
        assert!(lookup_category("pizza").is_none());
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = all_categories().iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all_categories().len());
    }
}
