//! Data model for the recipe catalog
//!
//! Two recipe shapes exist: [`RawRecipe`] is the transient wire form
//! received from the remote source, [`StoredRecipe`] is the persisted,
//! derived form owned by the catalog store. Stored recipes are created
//! only during an overwrite and are never mutated in place.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Ingredient category tag as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngredientKind {
    Baking,
    Condiments,
    Dairy,
    Drinks,
    Meat,
    Misc,
    Produce,
}

/// A single recipe ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Name of the ingredient
    pub name: String,
    /// Quantity, free-form with unit (e.g. "2 tbsp")
    pub quantity: String,
    /// Category tag
    #[serde(rename = "type")]
    pub kind: IngredientKind,
}

/// A recipe as received from the remote source
///
/// `steps` and `timers` are parallel lists of the same length; they are
/// zipped into [`RecipeStep`]s at ingest time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecipe {
    /// Name of the recipe
    pub name: String,
    /// Ordered ingredients
    pub ingredients: Vec<Ingredient>,
    /// Ordered step descriptions
    pub steps: Vec<String>,
    /// Per-step timer minutes, parallel to `steps`
    pub timers: Vec<u32>,
    /// Cover image url
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Optional, original recipe url
    #[serde(rename = "originalURL", default)]
    pub original_url: Option<String>,
}

/// A single preparation step with its timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    /// Step description
    pub instruction: String,
    /// Timer for this step, in minutes
    pub timer_minutes: u32,
}

/// A recipe as persisted in the catalog store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecipe {
    /// Identifier assigned at ingest time, unique within the catalog
    pub id: String,
    /// Title of the recipe
    pub title: String,
    /// Cover image url
    pub image_url: String,
    /// Optional, original recipe url
    pub original_url: Option<String>,
    /// Ordered ingredients
    pub ingredients: Vec<Ingredient>,
    /// Ordered steps, each carrying its own timer
    pub steps: Vec<RecipeStep>,
    /// Normalized difficulty in `[0, 1]`, computed at ingest time
    pub difficulty_score: f64,
}

impl StoredRecipe {
    /// Total cooking duration in minutes (sum of step timers)
    pub fn total_minutes(&self) -> u32 {
        self.steps.iter().map(|s| s.timer_minutes).sum()
    }
}

/// Difficulty filter bucket over the normalized score
///
/// Buckets are half-open ranges: rookie `[0, 1/3)`, intermediate
/// `[1/3, 2/3)`, advanced `[2/3, 1]` (upper bound inclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBucket {
    Rookie,
    Intermediate,
    Advanced,
    /// Match every recipe regardless of score
    #[default]
    Any,
}

impl DifficultyBucket {
    /// Whether `score` falls in this bucket
    pub fn matches(self, score: f64) -> bool {
        let (min, max) = match self {
            Self::Rookie => (0.0, 1.0 / 3.0),
            Self::Intermediate => (1.0 / 3.0, 2.0 / 3.0),
            Self::Advanced => (2.0 / 3.0, f64::INFINITY),
            Self::Any => return true,
        };
        score >= min && score < max
    }
}

impl FromStr for DifficultyBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rookie" => Ok(Self::Rookie),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "any" => Ok(Self::Any),
            other => Err(Error::config(format!(
                "unknown difficulty '{}' (expected rookie, intermediate, advanced or any)",
                other
            ))),
        }
    }
}

/// Duration filter bucket over total minutes
///
/// Quick `[0, 10)`, medium `[10, 20)`, slow `[20, ∞)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    Quick,
    Medium,
    Slow,
    /// Match every recipe regardless of duration
    #[default]
    Any,
}

impl DurationBucket {
    /// Whether a total duration of `minutes` falls in this bucket
    pub fn matches(self, minutes: u32) -> bool {
        let (min, max) = match self {
            Self::Quick => (0, 10),
            Self::Medium => (10, 20),
            Self::Slow => (20, u32::MAX),
            Self::Any => return true,
        };
        minutes >= min && (minutes < max || max == u32::MAX)
    }
}

impl FromStr for DurationBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            "any" => Ok(Self::Any),
            other => Err(Error::config(format!(
                "unknown duration '{}' (expected quick, medium, slow or any)",
                other
            ))),
        }
    }
}

/// Filter for catalog queries: a logical AND of the three predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    /// Case-insensitive title prefix; empty matches all
    pub title_prefix: String,
    /// Difficulty bucket
    pub difficulty: DifficultyBucket,
    /// Duration bucket
    pub duration: DurationBucket,
}

impl FilterQuery {
    /// Whether `recipe` satisfies all three predicates
    pub fn matches(&self, recipe: &StoredRecipe) -> bool {
        let title_match = recipe
            .title
            .to_lowercase()
            .starts_with(&self.title_prefix.to_lowercase());
        title_match
            && self.difficulty.matches(recipe.difficulty_score)
            && self.duration.matches(recipe.total_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(title: &str, score: f64, timers: &[u32]) -> StoredRecipe {
        StoredRecipe {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            image_url: "https://example.com/cover.jpg".to_string(),
            original_url: None,
            ingredients: Vec::new(),
            steps: timers
                .iter()
                .map(|&t| RecipeStep {
                    instruction: "step".to_string(),
                    timer_minutes: t,
                })
                .collect(),
            difficulty_score: score,
        }
    }

    #[test]
    fn duration_bucket_boundaries_are_half_open() {
        // 10 minutes is excluded from quick, included in medium
        assert!(!DurationBucket::Quick.matches(10));
        assert!(DurationBucket::Medium.matches(10));
        // 20 minutes leaves medium for slow
        assert!(!DurationBucket::Medium.matches(20));
        assert!(DurationBucket::Slow.matches(20));
        assert!(DurationBucket::Quick.matches(9));
        assert!(DurationBucket::Slow.matches(10_000));
        assert!(DurationBucket::Any.matches(0));
    }

    #[test]
    fn difficulty_bucket_boundaries_are_half_open() {
        let third = 1.0 / 3.0;
        assert!(!DifficultyBucket::Rookie.matches(third));
        assert!(DifficultyBucket::Intermediate.matches(third));
        assert!(DifficultyBucket::Rookie.matches(0.0));
        assert!(!DifficultyBucket::Intermediate.matches(2.0 / 3.0));
        assert!(DifficultyBucket::Advanced.matches(2.0 / 3.0));
        // The hardest recipe in a batch scores exactly 1.0 and is advanced
        assert!(DifficultyBucket::Advanced.matches(1.0));
        assert!(DifficultyBucket::Any.matches(0.5));
    }

    #[test]
    fn title_prefix_is_case_insensitive() {
        let stew = recipe("Beef Stew", 0.5, &[15]);

        let mut filter = FilterQuery::default();
        filter.title_prefix = "beef".to_string();
        assert!(filter.matches(&stew));

        // Prefix, not substring
        filter.title_prefix = "stew".to_string();
        assert!(!filter.matches(&stew));

        // Empty prefix matches everything
        filter.title_prefix = String::new();
        assert!(filter.matches(&stew));
    }

    #[test]
    fn filter_is_a_logical_and() {
        let stew = recipe("Beef Stew", 0.5, &[5, 5]);

        let filter = FilterQuery {
            title_prefix: "beef".to_string(),
            difficulty: DifficultyBucket::Intermediate,
            duration: DurationBucket::Medium,
        };
        assert!(filter.matches(&stew));

        let wrong_difficulty = FilterQuery {
            difficulty: DifficultyBucket::Advanced,
            ..filter.clone()
        };
        assert!(!wrong_difficulty.matches(&stew));

        let wrong_duration = FilterQuery {
            duration: DurationBucket::Slow,
            ..filter
        };
        assert!(!wrong_duration.matches(&stew));
    }

    #[test]
    fn buckets_parse_from_strings() {
        assert_eq!(
            "Rookie".parse::<DifficultyBucket>().unwrap(),
            DifficultyBucket::Rookie
        );
        assert_eq!(
            "slow".parse::<DurationBucket>().unwrap(),
            DurationBucket::Slow
        );
        assert!("brutal".parse::<DifficultyBucket>().is_err());
    }

    #[test]
    fn raw_recipe_deserializes_from_wire_format() {
        let json = r#"{
            "name": "Pancakes",
            "ingredients": [
                {"name": "Flour", "quantity": "200g", "type": "Baking"}
            ],
            "steps": ["Mix", "Fry"],
            "timers": [0, 5],
            "imageURL": "https://example.com/pancakes.jpg"
        }"#;

        let raw: RawRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(raw.name, "Pancakes");
        assert_eq!(raw.ingredients[0].kind, IngredientKind::Baking);
        assert_eq!(raw.steps.len(), raw.timers.len());
        assert_eq!(raw.original_url, None);
    }
}
