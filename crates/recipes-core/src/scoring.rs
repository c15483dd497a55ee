//! Batch difficulty scoring
//!
//! Difficulty is relative to the batch being ingested: the raw complexity
//! of a recipe is the euclidean norm of its step and ingredient counts,
//! min-max normalized over the whole batch so the easiest recipe scores
//! exactly 0 and the hardest exactly 1. Normalization is why this runs
//! over a batch rather than per recipe.

use crate::model::RawRecipe;

/// Raw complexity of a single recipe
fn raw_complexity(recipe: &RawRecipe) -> f64 {
    let steps = recipe.steps.len() as f64;
    let ingredients = recipe.ingredients.len() as f64;
    (steps * steps + ingredients * ingredients).sqrt()
}

/// Compute normalized difficulty scores for a batch of raw recipes
///
/// Returns one score in `[0, 1]` per recipe, in input order. When every
/// recipe in the batch is equally complex (including single-recipe and
/// empty batches) all scores are 0.0; a uniform batch has no meaningful
/// ordering, and 0 keeps the result finite.
///
/// Deterministic for identical input order and content; no side effects.
pub fn difficulty_scores(recipes: &[RawRecipe]) -> Vec<f64> {
    let raw: Vec<f64> = recipes.iter().map(raw_complexity).collect();

    let lo = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if raw.is_empty() || hi == lo {
        return vec![0.0; raw.len()];
    }

    raw.iter().map(|&r| (r - lo) / (hi - lo)).collect()
}
