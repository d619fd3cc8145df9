//! Recipe recommendation engine: pure set-matching of recipe ingredients
//! against a fridge inventory, ranking by match percentage, pagination.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::recipes::repo::{ProductRef, Recipe, RecipeWithIngredients};

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub match_percentage: f64,
    pub matching_ingredients_count: usize,
    pub total_ingredients: usize,
    pub missing_ingredients: Vec<ProductRef>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationPage {
    pub total_recommendations: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Round half away from zero to two decimal places, so 200/3 becomes 66.67.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score every recipe against the inventory and rank the result.
///
/// A recipe with no resolvable ingredients scores 0% and an empty missing
/// list; it is never an error. Ranking is by match percentage descending
/// with recipe id ascending as the deterministic tiebreak.
pub fn recommend(
    recipes: Vec<RecipeWithIngredients>,
    inventory: &HashSet<Uuid>,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = recipes
        .into_iter()
        .map(|r| score_recipe(r, inventory))
        .collect();

    recommendations.sort_by(|a, b| {
        b.match_percentage
            .total_cmp(&a.match_percentage)
            .then_with(|| a.recipe.id.cmp(&b.recipe.id))
    });
    recommendations
}

fn score_recipe(recipe: RecipeWithIngredients, inventory: &HashSet<Uuid>) -> Recommendation {
    let RecipeWithIngredients { recipe, ingredients } = recipe;

    // One entry per product even if the source data carries duplicates.
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(ingredients.len());
    let mut matching = 0usize;
    let mut missing: Vec<ProductRef> = Vec::new();
    for ingredient in ingredients {
        if !seen.insert(ingredient.product_id) {
            continue;
        }
        if inventory.contains(&ingredient.product_id) {
            matching += 1;
        } else {
            missing.push(ingredient);
        }
    }
    missing.sort_by(|a, b| a.product_name.cmp(&b.product_name));

    let total = seen.len();
    let match_percentage = if total > 0 {
        round2(matching as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    Recommendation {
        recipe,
        match_percentage,
        matching_ingredients_count: matching,
        total_ingredients: total,
        missing_ingredients: missing,
    }
}

/// Parse a raw page parameter; anything that is not a positive integer
/// falls back to page 1 rather than erroring.
pub fn resolve_page(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

/// Slice the ranked list into a page. A page past the end clamps to the
/// last page instead of returning an empty result. `page_size` must be
/// validated to be >= 1 by the caller.
pub fn paginate(
    recommendations: Vec<Recommendation>,
    page: usize,
    page_size: usize,
) -> RecommendationPage {
    debug_assert!(page_size >= 1, "page_size must be validated by the caller");
    let total = recommendations.len();
    let total_pages = std::cmp::max(1, total.div_ceil(page_size));
    let page = page.clamp(1, total_pages);

    let recommendations: Vec<Recommendation> = recommendations
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    RecommendationPage {
        total_recommendations: total,
        page,
        page_size,
        total_pages,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> ProductRef {
        ProductRef {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
        }
    }

    fn recipe(name: &str, ingredients: Vec<ProductRef>) -> RecipeWithIngredients {
        RecipeWithIngredients {
            recipe: Recipe {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: "x".to_string(),
                instructions: "x".to_string(),
                is_custom: false,
            },
            ingredients,
        }
    }

    struct Kitchen {
        beef: ProductRef,
        carrot: ProductRef,
        onion: ProductRef,
        chicken: ProductRef,
        salt: ProductRef,
    }

    impl Kitchen {
        fn new() -> Self {
            Self {
                beef: product("beef"),
                carrot: product("carrot"),
                onion: product("onion"),
                chicken: product("chicken"),
                salt: product("salt"),
            }
        }

        /// Fridge has beef and carrot; three recipes with known overlaps.
        fn fixture(&self) -> (Vec<RecipeWithIngredients>, HashSet<Uuid>) {
            let recipes = vec![
                recipe(
                    "beef stew",
                    vec![self.beef.clone(), self.carrot.clone(), self.onion.clone()],
                ),
                recipe(
                    "chicken soup",
                    vec![self.chicken.clone(), self.carrot.clone(), self.salt.clone()],
                ),
                recipe("simple salad", vec![self.carrot.clone()]),
            ];
            let inventory = HashSet::from([self.beef.product_id, self.carrot.product_id]);
            (recipes, inventory)
        }
    }

    #[test]
    fn matches_are_scored_and_sorted_descending() {
        let kitchen = Kitchen::new();
        let (recipes, inventory) = kitchen.fixture();
        let recs = recommend(recipes, &inventory);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].recipe.name, "simple salad");
        assert_eq!(recs[0].match_percentage, 100.0);
        assert!(recs[0].missing_ingredients.is_empty());

        assert_eq!(recs[1].recipe.name, "beef stew");
        assert_eq!(recs[1].match_percentage, 66.67);
        assert_eq!(recs[1].matching_ingredients_count, 2);
        assert_eq!(recs[1].total_ingredients, 3);
        assert_eq!(recs[1].missing_ingredients, vec![kitchen.onion.clone()]);

        assert_eq!(recs[2].recipe.name, "chicken soup");
        assert_eq!(recs[2].match_percentage, 33.33);
        assert_eq!(
            recs[2].missing_ingredients,
            vec![kitchen.chicken.clone(), kitchen.salt.clone()]
        );
    }

    #[test]
    fn matching_plus_missing_equals_total() {
        let kitchen = Kitchen::new();
        let (recipes, inventory) = kitchen.fixture();
        for rec in recommend(recipes, &inventory) {
            assert_eq!(
                rec.matching_ingredients_count + rec.missing_ingredients.len(),
                rec.total_ingredients
            );
        }
    }

    #[test]
    fn recipe_without_ingredients_scores_zero() {
        let inventory = HashSet::from([Uuid::new_v4()]);
        let recs = recommend(vec![recipe("mystery dish", vec![])], &inventory);
        assert_eq!(recs[0].match_percentage, 0.0);
        assert_eq!(recs[0].total_ingredients, 0);
        assert!(recs[0].missing_ingredients.is_empty());
    }

    #[test]
    fn empty_inventory_marks_everything_missing() {
        let kitchen = Kitchen::new();
        let (recipes, _) = kitchen.fixture();
        let recs = recommend(recipes, &HashSet::new());
        for rec in &recs {
            assert_eq!(rec.matching_ingredients_count, 0);
            assert_eq!(rec.missing_ingredients.len(), rec.total_ingredients);
        }
    }

    #[test]
    fn ties_break_by_recipe_id_ascending() {
        let shared = product("rice");
        let mut recipes = vec![
            recipe("a", vec![shared.clone()]),
            recipe("b", vec![shared.clone()]),
        ];
        // Force a known id order regardless of Uuid::new_v4 luck.
        recipes.sort_by_key(|r| r.recipe.id);
        let expected: Vec<Uuid> = recipes.iter().map(|r| r.recipe.id).collect();

        let recs = recommend(recipes, &HashSet::from([shared.product_id]));
        let got: Vec<Uuid> = recs.iter().map(|r| r.recipe.id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn percentage_is_rounded_to_two_decimals() {
        assert_eq!(round2(200.0 / 3.0), 66.67);
        assert_eq!(round2(100.0 / 3.0), 33.33);
        assert_eq!(round2(100.0 / 7.0), 14.29);
    }

    #[test]
    fn resolve_page_defaults_bad_input_to_one() {
        assert_eq!(resolve_page(None), 1);
        assert_eq!(resolve_page(Some("2")), 2);
        assert_eq!(resolve_page(Some("abc")), 1);
        assert_eq!(resolve_page(Some("0")), 1);
        assert_eq!(resolve_page(Some("-3")), 1);
    }

    #[test]
    fn second_page_of_size_one_is_the_second_ranked_recipe() {
        let kitchen = Kitchen::new();
        let (recipes, inventory) = kitchen.fixture();
        let recs = recommend(recipes, &inventory);

        let page = paginate(recs, 2, 1);
        assert_eq!(page.total_recommendations, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.recommendations.len(), 1);
        assert_eq!(page.recommendations[0].recipe.name, "beef stew");
    }

    #[test]
    fn page_past_the_end_clamps_to_last_page() {
        let kitchen = Kitchen::new();
        let (recipes, inventory) = kitchen.fixture();
        let recs = recommend(recipes, &inventory);

        let page = paginate(recs, 99, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.recommendations.len(), 1);
        assert_eq!(page.recommendations[0].recipe.name, "chicken soup");
    }

    #[test]
    fn pages_partition_the_full_list() {
        let kitchen = Kitchen::new();
        let (recipes, inventory) = kitchen.fixture();
        let total = recommend(recipes, &inventory).len();

        let mut seen = 0;
        for p in 1..=2 {
            let (recipes, inventory) = kitchen.fixture();
            let page = paginate(recommend(recipes, &inventory), p, 2);
            seen += page.recommendations.len();
        }
        assert_eq!(seen, total);
    }

    #[test]
    fn empty_catalog_still_yields_one_page() {
        let page = paginate(Vec::new(), 1, 4);
        assert_eq!(page.total_recommendations, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.recommendations.is_empty());
    }
}
