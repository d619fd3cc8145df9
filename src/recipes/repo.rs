use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub is_custom: bool,
}

/// An ingredient resolved to its catalog product. Ingredient rows whose
/// product was deleted from the catalog are excluded at the query level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: Uuid,
    pub product_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeWithIngredients {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<ProductRef>,
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    recipe_id: Uuid,
    product_id: Uuid,
    product_name: String,
}

const RECIPE_COLUMNS: &str = "id, name, description, instructions, is_custom";

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(recipe)
}

/// Two-step fetch: all recipes, then all resolvable ingredient links, joined
/// in memory. Recipes without ingredients still appear with an empty list.
pub async fn list_with_ingredients(db: &PgPool) -> anyhow::Result<Vec<RecipeWithIngredients>> {
    let recipes = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY name ASC"
    ))
    .fetch_all(db)
    .await?;

    let links = sqlx::query_as::<_, IngredientRow>(
        r#"
        SELECT i.recipe_id, i.product_id, p.name AS product_name
        FROM ingredients i
        JOIN products p ON p.id = i.product_id
        WHERE i.product_id IS NOT NULL
        "#,
    )
    .fetch_all(db)
    .await?;

    let mut by_recipe: HashMap<Uuid, Vec<ProductRef>> = HashMap::new();
    for link in links {
        by_recipe.entry(link.recipe_id).or_default().push(ProductRef {
            product_id: link.product_id,
            product_name: link.product_name,
        });
    }

    Ok(recipes
        .into_iter()
        .map(|recipe| {
            let ingredients = by_recipe.remove(&recipe.id).unwrap_or_default();
            RecipeWithIngredients { recipe, ingredients }
        })
        .collect())
}

pub async fn ingredients_for_recipe(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<ProductRef>> {
    let links = sqlx::query_as::<_, IngredientRow>(
        r#"
        SELECT i.recipe_id, i.product_id, p.name AS product_name
        FROM ingredients i
        JOIN products p ON p.id = i.product_id
        WHERE i.recipe_id = $1 AND i.product_id IS NOT NULL
        ORDER BY p.name ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await?;

    Ok(links
        .into_iter()
        .map(|l| ProductRef {
            product_id: l.product_id,
            product_name: l.product_name,
        })
        .collect())
}
