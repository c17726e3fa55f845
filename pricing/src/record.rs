use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{PricingErr, Result},
    schema::REQUIRED_FEATURES,
};

/// A flat mapping of feature name to value describing a single toy.
///
/// Deserializes only from a JSON object, so arrays and scalars are rejected at the parsing stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: Map<String, Value>,
}

impl FeatureRecord {
    /// Returns an empty `FeatureRecord`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style variant of `insert`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Lists the required features absent from this record.
    ///
    /// # Returns
    /// The missing feature names, in the fixed required-feature order.
    pub fn missing_features(&self) -> Vec<&'static str> {
        REQUIRED_FEATURES
            .into_iter()
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Reads `feature` as a number.
    ///
    /// Numeric strings are accepted since form-based clients post every field as text.
    ///
    /// # Errors
    /// Returns `MissingFeature` if absent, `NotNumeric` if the value cannot be read as a finite number.
    pub fn numeric(&self, feature: &'static str) -> Result<f64> {
        let value = self
            .get(feature)
            .ok_or(PricingErr::MissingFeature { feature })?;

        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match number {
            Some(x) if x.is_finite() => Ok(x),
            _ => Err(PricingErr::NotNumeric {
                feature,
                value: value.to_string(),
            }),
        }
    }

    /// Reads `feature` as a category label.
    ///
    /// # Errors
    /// Returns `MissingFeature` if absent, `NotCategorical` if the value is neither a string nor a number.
    pub fn category(&self, feature: &'static str) -> Result<Cow<'_, str>> {
        match self.get(feature) {
            Some(Value::String(s)) => Ok(Cow::Borrowed(s)),
            Some(Value::Number(n)) => Ok(Cow::Owned(n.to_string())),
            Some(other) => Err(PricingErr::NotCategorical {
                feature,
                value: other.to_string(),
            }),
            None => Err(PricingErr::MissingFeature { feature }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_record() -> FeatureRecord {
        serde_json::from_value(json!({
            "Category": "Action Figure",
            "Brand": "Hasbro",
            "AgeGroup": "5+",
            "Size": 10,
            "Weight": 0.2,
            "Material": "Plastic",
            "Condition": "New"
        }))
        .unwrap()
    }

    #[test]
    fn complete_record_misses_nothing() {
        assert!(full_record().missing_features().is_empty());
    }

    #[test]
    fn missing_features_keep_required_order() {
        let record = FeatureRecord::new()
            .with("Weight", 1.0)
            .with("Category", "Doll")
            .with("Condition", "Used");

        assert_eq!(
            record.missing_features(),
            vec!["Brand", "AgeGroup", "Size", "Material"]
        );
    }

    #[test]
    fn numeric_accepts_numbers_and_numeric_strings() {
        let record = FeatureRecord::new().with("Size", 10).with("Weight", " 0.5 ");
        assert_eq!(record.numeric("Size").unwrap(), 10.0);
        assert_eq!(record.numeric("Weight").unwrap(), 0.5);
    }

    #[test]
    fn numeric_rejects_text_and_null() {
        let record = FeatureRecord::new()
            .with("Size", "big")
            .with("Weight", Value::Null);

        assert!(matches!(
            record.numeric("Size"),
            Err(PricingErr::NotNumeric { feature: "Size", .. })
        ));
        assert!(matches!(
            record.numeric("Weight"),
            Err(PricingErr::NotNumeric { feature: "Weight", .. })
        ));
        assert!(matches!(
            record.numeric("Brand"),
            Err(PricingErr::MissingFeature { feature: "Brand" })
        ));
    }

    #[test]
    fn category_reads_strings_and_numbers() {
        let record = FeatureRecord::new()
            .with("Brand", "Lego")
            .with("AgeGroup", 3)
            .with("Material", json!(["wood"]));

        assert_eq!(record.category("Brand").unwrap(), "Lego");
        assert_eq!(record.category("AgeGroup").unwrap(), "3");
        assert!(matches!(
            record.category("Material"),
            Err(PricingErr::NotCategorical { .. })
        ));
    }

    #[test]
    fn non_object_json_is_not_a_record() {
        assert!(serde_json::from_value::<FeatureRecord>(json!([1, 2, 3])).is_err());
        assert!(serde_json::from_value::<FeatureRecord>(json!("Category")).is_err());
    }
}
