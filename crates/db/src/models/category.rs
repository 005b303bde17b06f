//! Category model and DTOs.

use pdm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub category_type: String,
    pub parent_id: Option<DbId>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A root category with its direct subcategories.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<Category>,
}

/// Group a flat category list into roots with nested children.
///
/// Roots keep the input order; children keep the input order within their
/// parent. Children whose parent is not in the list are dropped.
pub fn nest(categories: Vec<Category>) -> Vec<CategoryNode> {
    let (roots, children): (Vec<Category>, Vec<Category>) =
        categories.into_iter().partition(Category::is_root);

    let mut nodes: Vec<CategoryNode> = roots
        .into_iter()
        .map(|category| CategoryNode {
            category,
            subcategories: Vec::new(),
        })
        .collect();

    for child in children {
        if let Some(node) = nodes
            .iter_mut()
            .find(|n| Some(n.category.id) == child.parent_id)
        {
            node.subcategories.push(child);
        }
    }
    nodes
}

/// DTO for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub category_type: String,
    pub parent_id: Option<DbId>,
}

/// Result of a create: either a fresh row or the existing root it matched.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub category: Category,
    pub created: bool,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CategoryPosition {
    pub id: DbId,
    #[serde(alias = "newPosition", alias = "new_position")]
    pub position: i32,
}
