//! Pre-configured job templates.
//!
//! Three tables share almost the same shape: the general
//! `pre_configured_jobs` table carries an extra `type` column and a labor
//! rate, the floor and roof tables do not.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::line_items::{
    JsonColumn, PartAmounts, parts_cost, validate_amount, validate_part_amounts,
};
use crate::models::{Record, Table, patch};

/// Cost of the parts at their listed prices; zero unless both columns hold
/// well-formed amounts.
fn priced_parts(
    parts: &Option<JsonColumn<PartAmounts>>,
    prices: &Option<JsonColumn<PartAmounts>>,
) -> f64 {
    match (
        parts.as_ref().and_then(JsonColumn::typed),
        prices.as_ref().and_then(JsonColumn::typed),
    ) {
        (Some(parts), Some(prices)) => parts_cost(parts, prices),
        _ => 0.0,
    }
}

/// Row of the `pre_configured_jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreConfiguredJob {
    pub id: i64,
    pub job_code: String,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub parts: Option<JsonColumn<PartAmounts>>,
    #[serde(default)]
    pub prices: Option<JsonColumn<PartAmounts>>,
    #[serde(default)]
    pub labor_hour_rates: Option<f64>,
    #[serde(default)]
    pub labor_hours: Option<f64>,
    #[serde(default)]
    pub sublet_costs: Option<f64>,
    #[serde(default)]
    pub shop_supplies: Option<f64>,
    #[serde(default)]
    pub taxes: Option<f64>,
    #[serde(default)]
    pub job_totals: Option<f64>,
}

impl PreConfiguredJob {
    /// Parts at their listed prices plus labor, sublet, supplies and taxes.
    pub fn computed_total(&self) -> f64 {
        let parts = priced_parts(&self.parts, &self.prices);
        let labor = self.labor_hours.unwrap_or(0.0) * self.labor_hour_rates.unwrap_or(0.0);
        parts
            + labor
            + self.sublet_costs.unwrap_or(0.0)
            + self.shop_supplies.unwrap_or(0.0)
            + self.taxes.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewPreConfiguredJob {
    #[validate(length(min = 1, message = "Job code is required"))]
    pub job_code: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Job type is required"))]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_part_amounts"))]
    pub parts: Option<PartAmounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_part_amounts"))]
    pub prices: Option<PartAmounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_amount"))]
    pub labor_hour_rates: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_amount"))]
    pub labor_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_amount"))]
    pub sublet_costs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_amount"))]
    pub shop_supplies: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_amount"))]
    pub taxes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_amount"))]
    pub job_totals: Option<f64>,
}

/// `Some(None)` clears a nullable column; `job_code` and `type` cannot be
/// cleared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct UpdatePreConfiguredJob {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    #[validate(length(min = 1, message = "Job code must not be empty"))]
    pub job_code: Option<String>,
    #[serde(
        rename = "type",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "patch::required"
    )]
    #[validate(length(min = 1, message = "Job type must not be empty"))]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_part_amounts"))]
    pub parts: Option<Option<PartAmounts>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_part_amounts"))]
    pub prices: Option<Option<PartAmounts>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub labor_hour_rates: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub labor_hours: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub sublet_costs: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub shop_supplies: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub taxes: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(custom(function = "validate_amount"))]
    pub job_totals: Option<Option<f64>>,
}

impl Record for PreConfiguredJob {
    const TABLE: Table = Table::PreConfiguredJobs;
    type New = NewPreConfiguredJob;
    type Changes = UpdatePreConfiguredJob;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Declares a floor/roof template table: row, insert and update types.
macro_rules! template_job {
    ($(#[$meta:meta])* $row:ident, $new:ident, $update:ident, $table:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $row {
            pub id: i64,
            pub job_code: String,
            #[serde(default)]
            pub parts: Option<JsonColumn<PartAmounts>>,
            #[serde(default)]
            pub prices: Option<JsonColumn<PartAmounts>>,
            #[serde(default)]
            pub labor_hours: Option<f64>,
            #[serde(default)]
            pub sublet_costs: Option<f64>,
            #[serde(default)]
            pub shop_supplies: Option<f64>,
            #[serde(default)]
            pub taxes: Option<f64>,
            #[serde(default)]
            pub job_totals: Option<f64>,
        }

        impl $row {
            /// Parts at their listed prices plus sublet, supplies and taxes.
            /// These tables carry no labor rate, so labor is not priced.
            pub fn computed_total(&self) -> f64 {
                let parts = priced_parts(&self.parts, &self.prices);
                parts
                    + self.sublet_costs.unwrap_or(0.0)
                    + self.shop_supplies.unwrap_or(0.0)
                    + self.taxes.unwrap_or(0.0)
            }
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
        #[serde(deny_unknown_fields)]
        pub struct $new {
            #[validate(length(min = 1, message = "Job code is required"))]
            pub job_code: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            #[validate(custom(function = "validate_part_amounts"))]
            pub parts: Option<PartAmounts>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            #[validate(custom(function = "validate_part_amounts"))]
            pub prices: Option<PartAmounts>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            #[validate(custom(function = "validate_amount"))]
            pub labor_hours: Option<f64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            #[validate(custom(function = "validate_amount"))]
            pub sublet_costs: Option<f64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            #[validate(custom(function = "validate_amount"))]
            pub shop_supplies: Option<f64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            #[validate(custom(function = "validate_amount"))]
            pub taxes: Option<f64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            #[validate(custom(function = "validate_amount"))]
            pub job_totals: Option<f64>,
        }

        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
        #[serde(default, deny_unknown_fields)]
        pub struct $update {
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
            #[validate(length(min = 1, message = "Job code must not be empty"))]
            pub job_code: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
            #[validate(custom(function = "validate_part_amounts"))]
            pub parts: Option<Option<PartAmounts>>,
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
            #[validate(custom(function = "validate_part_amounts"))]
            pub prices: Option<Option<PartAmounts>>,
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
            #[validate(custom(function = "validate_amount"))]
            pub labor_hours: Option<Option<f64>>,
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
            #[validate(custom(function = "validate_amount"))]
            pub sublet_costs: Option<Option<f64>>,
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
            #[validate(custom(function = "validate_amount"))]
            pub shop_supplies: Option<Option<f64>>,
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
            #[validate(custom(function = "validate_amount"))]
            pub taxes: Option<Option<f64>>,
            #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
            #[validate(custom(function = "validate_amount"))]
            pub job_totals: Option<Option<f64>>,
        }

        impl Record for $row {
            const TABLE: Table = $table;
            type New = $new;
            type Changes = $update;

            fn id(&self) -> i64 {
                self.id
            }
        }
    };
}

template_job!(
    /// Row of the `pre_configured_floor_jobs` table.
    PreConfiguredFloorJob,
    NewPreConfiguredFloorJob,
    UpdatePreConfiguredFloorJob,
    Table::PreConfiguredFloorJobs
);

template_job!(
    /// Row of the `pre_configured_roof_jobs` table.
    PreConfiguredRoofJob,
    NewPreConfiguredRoofJob,
    UpdatePreConfiguredRoofJob,
    Table::PreConfiguredRoofJobs
);
