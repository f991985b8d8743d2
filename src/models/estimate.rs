use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::line_items::{JsonColumn, LineItem, validate_amount, validate_line_items};
use crate::models::{Record, Table, patch};

/// Row of the `estimates` table.
///
/// `customer_id` is a soft reference; nothing here checks that the customer
/// exists. Line-item groups written by other clients in another shape are
/// kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Estimate {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub job_code: Option<String>,
    pub advisor: Option<String>,
    pub payment_type: Option<String>,
    pub deductible: Option<f64>,
    pub estimate_date: Option<Timestamp>,
    pub roof_kit: Option<JsonColumn<Vec<LineItem>>>,
    pub roof_membrane: Option<JsonColumn<Vec<LineItem>>>,
    pub floor_materials: Option<JsonColumn<Vec<LineItem>>>,
    pub roofing_screws: Option<JsonColumn<Vec<LineItem>>>,
    pub glue: Option<JsonColumn<Vec<LineItem>>>,
    pub additional_parts: Option<JsonColumn<Vec<LineItem>>>,
    pub repair_description: Option<String>,
    pub notes: Option<String>,
    pub hours: Option<f64>,
    pub labor_per_hour: Option<f64>,
    pub sublet: Option<JsonColumn<Vec<LineItem>>>,
    pub extras: Option<JsonColumn<Vec<LineItem>>>,
    pub labor: Option<JsonColumn<Vec<LineItem>>>,
    pub shop_supplies: Option<f64>,
    pub tax: Option<f64>,
}

impl Estimate {
    /// Every typed line-item group in column order, skipping empty and raw ones.
    pub fn line_item_groups(&self) -> impl Iterator<Item = (&'static str, &[LineItem])> {
        [
            ("roof_kit", &self.roof_kit),
            ("roof_membrane", &self.roof_membrane),
            ("floor_materials", &self.floor_materials),
            ("roofing_screws", &self.roofing_screws),
            ("glue", &self.glue),
            ("additional_parts", &self.additional_parts),
            ("sublet", &self.sublet),
            ("extras", &self.extras),
            ("labor", &self.labor),
        ]
        .into_iter()
        .filter_map(|(name, group)| {
            group
                .as_ref()
                .and_then(JsonColumn::typed)
                .map(|items| (name, items.as_slice()))
        })
    }

    /// Sum of all line items across all groups.
    pub fn line_items_total(&self) -> f64 {
        self.line_item_groups()
            .flat_map(|(_, items)| items.iter())
            .map(LineItem::total)
            .sum()
    }
}

/// Field set shared by insert and update payloads.
///
/// Every column is nullable: `None` leaves the key out of the request body,
/// `Some(None)` writes `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct EstimateFields {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    pub customer_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    pub job_code: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    pub advisor: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    pub payment_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub deductible: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    pub estimate_date: Option<Option<Timestamp>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub roof_kit: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub roof_membrane: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub floor_materials: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub roofing_screws: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub glue: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub additional_parts: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    pub repair_description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub hours: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub labor_per_hour: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub sublet: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub extras: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_line_items"))]
    pub labor: Option<Option<Vec<LineItem>>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub shop_supplies: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub tax: Option<Option<f64>>,
}

impl Record for Estimate {
    const TABLE: Table = Table::Estimates;
    type New = EstimateFields;
    type Changes = EstimateFields;

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_estimate_decodes_sparse_row() {
        let row: Estimate = serde_json::from_value(serde_json::json!({
            "id": 7,
            "customer_id": null,
            "estimate_date": "2024-05-01T10:00:00+00:00",
            "glue": [{"description": "adhesive", "quantity": 2, "unit_price": 18.5}]
        }))
        .unwrap();
        assert_eq!(row.id, 7);
        assert!(row.customer_id.is_none());
        assert!(row.estimate_date.is_some());
        assert_eq!(row.line_items_total(), 37.0);
    }

    #[test]
    fn test_fields_omit_unset_keys() {
        let fields = EstimateFields {
            advisor: Some(Some("Sam".into())),
            notes: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            serde_json::json!({"advisor": "Sam", "notes": null})
        );
    }

    #[test]
    fn test_fields_reject_malformed_line_items() {
        let fields = EstimateFields {
            labor: Some(Some(vec![LineItem::new("install", -1.0, 95.0)])),
            ..Default::default()
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn test_fields_reject_non_finite_amounts() {
        let fields = EstimateFields {
            tax: Some(Some(f64::NAN)),
            deductible: Some(Some(f64::INFINITY)),
            ..Default::default()
        };
        let errors = fields.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("tax"));
        assert!(errors.field_errors().contains_key("deductible"));
    }

    #[test]
    fn test_fields_reject_unknown_columns() {
        let err = serde_json::from_value::<EstimateFields>(serde_json::json!({"advisr": "Sam"}))
            .unwrap_err();
        assert!(err.to_string().contains("advisr"));

        let err = serde_json::from_value::<EstimateFields>(serde_json::json!({
            "glue": [{"description": "adhesive", "qty": 2}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("qty"));
    }

    #[test]
    fn test_row_with_foreign_line_item_shape_still_decodes() {
        let row: Estimate = serde_json::from_value(serde_json::json!({
            "id": 8,
            "roof_kit": {"legacy": true},
            "glue": [{"description": "adhesive", "quantity": 1, "unit_price": 10}]
        }))
        .unwrap();
        assert!(row.roof_kit.as_ref().is_some_and(JsonColumn::is_raw));
        assert_eq!(row.line_item_groups().count(), 1);
        assert_eq!(row.line_items_total(), 10.0);
        assert_eq!(
            serde_json::to_value(&row).unwrap()["roof_kit"],
            serde_json::json!({"legacy": true})
        );
    }
}
