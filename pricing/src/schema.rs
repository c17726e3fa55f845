//! The feature schema shared by training and serving.
//!
//! Every name used inside the pipeline is a serving key (`AgeGroup`, `Size`, ...).
//! Dataset headers are translated into these keys once, when the CSV is read.

/// The kind of preprocessing a feature goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

/// A single feature of a toy, with its canonical name and its dataset header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FeatureKind,
}

impl Feature {
    const fn numeric(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FeatureKind::Numeric,
        }
    }

    const fn categorical(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FeatureKind::Categorical,
        }
    }
}

/// The dataset column holding the value to predict.
pub const TARGET_COLUMN: &str = "Estimated Value (Frw)";

/// Numeric features, in the order their scaled columns appear.
pub const NUMERIC_FEATURES: [Feature; 2] = [
    Feature::numeric("Size", "Size (cm)"),
    Feature::numeric("Weight", "Weight (kg)"),
];

/// Categorical features, in the order their one-hot blocks appear.
pub const CATEGORICAL_FEATURES: [Feature; 5] = [
    Feature::categorical("Category", "Category"),
    Feature::categorical("Brand", "Brand"),
    Feature::categorical("AgeGroup", "Age Group"),
    Feature::categorical("Material", "Material"),
    Feature::categorical("Condition", "Condition"),
];

/// The keys a prediction request must carry, in the order they are reported when missing.
pub const REQUIRED_FEATURES: [&str; 7] = [
    "Category", "Brand", "AgeGroup", "Size", "Weight", "Material", "Condition",
];

/// Returns every feature in the schema, numeric ones first.
pub fn features() -> impl Iterator<Item = &'static Feature> {
    NUMERIC_FEATURES.iter().chain(CATEGORICAL_FEATURES.iter())
}

/// Looks up a feature by its canonical name.
pub fn feature(name: &str) -> Option<&'static Feature> {
    features().find(|f| f.name == name)
}
