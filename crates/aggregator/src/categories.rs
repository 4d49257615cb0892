//! Category tree flattening for pickers and lists.
//!
//! Categories nest at most one level: a top-level category and its direct
//! children. [`flatten_categories`] turns the flat list the API returns into
//! display order, [`ensure_single_level`] rejects deeper trees.

use std::collections::{HashMap, HashSet};

use api_types::{CategoryType, category::Category};

use crate::AggregateError;

/// Marker prepended to the display name of child categories.
const CHILD_MARKER: &str = "↳ ";

/// A category in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatCategory {
    pub id: i64,
    pub display_name: String,
    pub category_type: CategoryType,
    /// `true` when listed under its parent.
    pub is_child: bool,
}

impl FlatCategory {
    fn top(category: &Category) -> Self {
        Self {
            id: category.id,
            display_name: category.name.clone(),
            category_type: category.category_type,
            is_child: false,
        }
    }

    fn child(category: &Category) -> Self {
        Self {
            id: category.id,
            display_name: format!("{CHILD_MARKER}{}", category.name),
            category_type: category.category_type,
            is_child: true,
        }
    }
}

/// Orders categories so that each top-level category is followed by its
/// children.
///
/// Top-level and child order follow the input. Records whose parent is not a
/// top-level category of `categories` are appended last, unmodified, each
/// exactly once.
pub fn flatten_categories(categories: &[Category]) -> Vec<FlatCategory> {
    let top_ids: HashSet<i64> = categories
        .iter()
        .filter(|c| c.is_top_level())
        .map(|c| c.id)
        .collect();

    let mut children: HashMap<i64, Vec<&Category>> = HashMap::new();
    let mut unmatched = Vec::new();
    for category in categories {
        match &category.parent {
            None => {}
            Some(parent) if top_ids.contains(&parent.id) => {
                children.entry(parent.id).or_default().push(category);
            }
            Some(_) => unmatched.push(category),
        }
    }

    let mut out = Vec::with_capacity(categories.len());
    for top in categories.iter().filter(|c| c.is_top_level()) {
        out.push(FlatCategory::top(top));
        // `remove` keeps a duplicated parent id from listing its children twice.
        if let Some(kids) = children.remove(&top.id) {
            out.extend(kids.into_iter().map(FlatCategory::child));
        }
    }
    out.extend(unmatched.into_iter().map(FlatCategory::top));
    out
}

/// Rejects categories whose parent is itself a child category.
///
/// Parents missing from `categories` are not an error here; those records
/// are listed as unmatched by [`flatten_categories`].
pub fn ensure_single_level(categories: &[Category]) -> Result<(), AggregateError> {
    let child_ids: HashSet<i64> = categories
        .iter()
        .filter(|c| !c.is_top_level())
        .map(|c| c.id)
        .collect();

    match categories.iter().find(|c| {
        c.parent
            .as_ref()
            .is_some_and(|parent| child_ids.contains(&parent.id))
    }) {
        Some(category) => Err(AggregateError::NestingTooDeep {
            id: category.id,
            name: category.name.clone(),
        }),
        None => Ok(()),
    }
}
