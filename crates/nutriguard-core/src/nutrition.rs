//! Nutrition display helpers
//!
//! Presentation-facing views over data the product database already
//! computed. Nothing here scores food; the Nutri-Score letter is consumed
//! as opaque input.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Nutriments, Product};

/// Nutri-Score letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutritionGrade {
    A,
    B,
    C,
    D,
    E,
}

impl NutritionGrade {
    /// Parse a grade letter, case-insensitively. Anything else is unknown.
    pub fn parse(grade: &str) -> Option<Self> {
        match grade.trim().to_ascii_lowercase().as_str() {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            "d" => Some(Self::D),
            "e" => Some(Self::E),
            _ => None,
        }
    }

    /// Star rating shown next to the grade, 5 for `a` down to 1 for `e`
    pub fn stars(&self) -> u8 {
        match self {
            Self::A => 5,
            Self::B => 4,
            Self::C => 3,
            Self::D => 2,
            Self::E => 1,
        }
    }
}

impl fmt::Display for NutritionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        };
        f.write_str(letter)
    }
}

/// Star rating for an optional grade; unknown grades get a single star
pub fn nutrition_rating(grade: Option<NutritionGrade>) -> u8 {
    grade.map_or(1, |g| g.stars())
}

/// Fill fraction of the health bar for a 0-100 score. Non-finite scores
/// give an empty bar.
pub fn health_bar_fraction(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    (score / 100.0).clamp(0.0, 1.0)
}

impl Product {
    /// Parsed Nutri-Score grade, if the product has a known one
    pub fn grade(&self) -> Option<NutritionGrade> {
        self.nutrition_grades.as_deref().and_then(NutritionGrade::parse)
    }
}

/// The nutrition facts panel of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub energy_kcal: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub proteins: Option<f64>,
    pub salt: Option<f64>,
    pub sugars: Option<f64>,
}

impl NutritionFacts {
    /// Panel lines, skipping missing and zero values
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let rows = [
            ("Energy", self.energy_kcal, " kcal"),
            ("Fat", self.fat, "g"),
            ("Carbs", self.carbohydrates, "g"),
            ("Protein", self.proteins, "g"),
            ("Salt", self.salt, "g"),
            ("Sugar", self.sugars, "g"),
        ];

        rows.into_iter()
            .filter_map(|(label, value, unit)| {
                value
                    .filter(|v| *v != 0.0)
                    .map(|v| (label, format!("{}{}", v, unit)))
            })
            .collect()
    }

    /// Whether the panel has nothing to show
    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

impl From<&Nutriments> for NutritionFacts {
    fn from(n: &Nutriments) -> Self {
        Self {
            energy_kcal: n.get(Nutriments::ENERGY_KCAL_100G),
            fat: n.get(Nutriments::FAT_100G),
            carbohydrates: n.get(Nutriments::CARBOHYDRATES_100G),
            proteins: n.get(Nutriments::PROTEINS_100G),
            salt: n.get(Nutriments::SALT_100G),
            sugars: n.get(Nutriments::SUGARS_100G),
        }
    }
}
