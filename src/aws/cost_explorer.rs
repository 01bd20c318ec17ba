//! AWS Cost Explorer API (JSON 1.1 protocol)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign};

use super::client::Page;
use super::error::Result;
use super::transport::{Endpoint, Transport};

const TARGET_PREFIX: &str = "AWSInsightsIndexService";

/// Metric summed by the cost commands
pub const COST_METRIC: &str = "NetUnblendedCost";

/// Rule version accepted by CreateCostCategoryDefinition
pub const COST_CATEGORY_RULE_VERSION: &str = "CostCategoryExpression.v1";

fn endpoint() -> Endpoint {
    Endpoint::global("ce", "ce.us-east-1.amazonaws.com")
}

/// Time period for cost queries, dates as YYYY-MM-DD with an exclusive end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimePeriod {
    pub start: String,
    pub end: String,
}

/// Dimension filter, e.g. LINKED_ACCOUNT in [..]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionValues {
    pub key: String,
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub match_options: Vec<String>,
}

/// Filter expression. Only dimension matches are used by this tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Expression {
    pub dimensions: DimensionValues,
}

impl Expression {
    /// Match any of the given linked accounts.
    pub fn linked_accounts(account_ids: Vec<String>) -> Self {
        Self {
            dimensions: DimensionValues {
                key: "LINKED_ACCOUNT".to_string(),
                values: account_ids,
                match_options: Vec::new(),
            },
        }
    }
}

/// Cost and usage request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCostAndUsageRequest {
    pub time_period: TimePeriod,
    pub granularity: String,
    pub metrics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl GetCostAndUsageRequest {
    /// Monthly net unblended cost of a set of accounts.
    pub fn for_accounts(time_period: TimePeriod, account_ids: Vec<String>) -> Self {
        Self {
            time_period,
            granularity: "MONTHLY".to_string(),
            metrics: vec![COST_METRIC.to_string()],
            filter: Some(Expression::linked_accounts(account_ids)),
            next_page_token: None,
        }
    }
}

/// Cost and usage response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCostAndUsageResponse {
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
    pub next_page_token: Option<String>,
}

/// Results grouped by time period
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    pub time_period: TimePeriod,
    pub total: Option<HashMap<String, MetricValue>>,
    #[serde(default)]
    pub estimated: bool,
}

/// Metric value
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    pub amount: String,
    pub unit: Option<String>,
}

/// A summed cost in one currency
#[derive(Debug, Clone, PartialEq)]
pub struct Cost {
    pub amount: f64,
    pub unit: String,
}

impl Default for Cost {
    fn default() -> Self {
        Self {
            amount: 0.0,
            unit: "USD".to_string(),
        }
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(mut self, rhs: Cost) -> Cost {
        self += rhs;
        self
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        self.amount += rhs.amount;
        if rhs.amount != 0.0 {
            self.unit = rhs.unit;
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.unit)
    }
}

impl GetCostAndUsageResponse {
    /// Sum a metric across every returned time period.
    pub fn total(&self, metric: &str) -> Cost {
        let mut cost = Cost::default();
        for result in &self.results_by_time {
            if let Some(value) = result.total.as_ref().and_then(|t| t.get(metric)) {
                let amount: f64 = value.amount.parse().unwrap_or(0.0);
                cost.amount += amount;
                if let Some(unit) = &value.unit {
                    cost.unit = unit.clone();
                }
            }
        }
        cost
    }
}

/// A cost category rule mapping matching costs to `value`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostCategoryRule {
    pub value: String,
    pub rule: Expression,
}

/// Cost category definition as sent to CreateCostCategoryDefinition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostCategoryDefinition {
    pub name: String,
    pub rule_version: String,
    pub rules: Vec<CostCategoryRule>,
}

impl CostCategoryDefinition {
    /// A category named `name` that maps all `account_ids` to `name`.
    pub fn for_accounts(name: &str, account_ids: Vec<String>) -> Self {
        let mut rule = Expression::linked_accounts(account_ids);
        rule.dimensions.match_options = vec!["EQUALS".to_string()];

        Self {
            name: name.to_string(),
            rule_version: COST_CATEGORY_RULE_VERSION.to_string(),
            rules: vec![CostCategoryRule {
                value: name.to_string(),
                rule,
            }],
        }
    }
}

/// An existing cost category
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostCategoryReference {
    pub cost_category_arn: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ListCostCategoryDefinitionsRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListCostCategoryDefinitionsResponse {
    #[serde(default)]
    cost_category_references: Vec<CostCategoryReference>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateCostCategoryDefinitionResponse {
    cost_category_arn: String,
}

pub(crate) fn get_cost_and_usage(
    t: &Transport,
    request: &GetCostAndUsageRequest,
) -> Result<GetCostAndUsageResponse> {
    t.json(&endpoint(), TARGET_PREFIX, "GetCostAndUsage", request)
}

pub(crate) fn list_cost_category_definitions(
    t: &Transport,
    next_token: Option<&str>,
) -> Result<Page<CostCategoryReference>> {
    let response: ListCostCategoryDefinitionsResponse = t.json(
        &endpoint(),
        TARGET_PREFIX,
        "ListCostCategoryDefinitions",
        &ListCostCategoryDefinitionsRequest { next_token },
    )?;
    Ok(Page {
        items: response.cost_category_references,
        next_token: response.next_token,
    })
}

pub(crate) fn create_cost_category_definition(
    t: &Transport,
    definition: &CostCategoryDefinition,
) -> Result<String> {
    let response: CreateCostCategoryDefinitionResponse =
        t.json(&endpoint(), TARGET_PREFIX, "CreateCostCategoryDefinition", definition)?;
    Ok(response.cost_category_arn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> TimePeriod {
        TimePeriod {
            start: "2026-09-01".to_string(),
            end: "2026-10-01".to_string(),
        }
    }

    #[test]
    fn test_cost_request_filters_linked_accounts() {
        let request = GetCostAndUsageRequest::for_accounts(period(), vec!["111".to_string()]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["Granularity"], "MONTHLY");
        assert_eq!(body["Metrics"][0], "NetUnblendedCost");
        assert_eq!(body["Filter"]["Dimensions"]["Key"], "LINKED_ACCOUNT");
        assert_eq!(body["Filter"]["Dimensions"]["Values"][0], "111");
        assert!(body["Filter"]["Dimensions"].get("MatchOptions").is_none());
        assert!(body.get("NextPageToken").is_none());
    }

    #[test]
    fn test_total_sums_all_periods() {
        let response: GetCostAndUsageResponse = serde_json::from_str(
            r#"{"ResultsByTime":[
                {"TimePeriod":{"Start":"2026-07-01","End":"2026-08-01"},
                 "Total":{"NetUnblendedCost":{"Amount":"10.5","Unit":"USD"}},"Groups":[],"Estimated":false},
                {"TimePeriod":{"Start":"2026-08-01","End":"2026-09-01"},
                 "Total":{"NetUnblendedCost":{"Amount":"4.25","Unit":"USD"}},"Groups":[],"Estimated":true}
            ],"DimensionValueAttributes":[]}"#,
        )
        .unwrap();

        let cost = response.total(COST_METRIC);
        assert!((cost.amount - 14.75).abs() < f64::EPSILON);
        assert_eq!(cost.unit, "USD");
        assert_eq!(cost.to_string(), "14.75 USD");
    }

    #[test]
    fn test_cost_category_maps_accounts_to_ou_name() {
        let definition =
            CostCategoryDefinition::for_accounts("team-a", vec!["1".to_string(), "2".to_string()]);
        let body = serde_json::to_value(&definition).unwrap();

        assert_eq!(body["Name"], "team-a");
        assert_eq!(body["RuleVersion"], "CostCategoryExpression.v1");
        assert_eq!(body["Rules"][0]["Value"], "team-a");
        assert_eq!(body["Rules"][0]["Rule"]["Dimensions"]["MatchOptions"][0], "EQUALS");
        assert_eq!(body["Rules"][0]["Rule"]["Dimensions"]["Values"][1], "2");
    }

    #[test]
    fn test_cost_add_keeps_unit_of_nonzero_side() {
        let total = Cost::default()
            + Cost {
                amount: 2.0,
                unit: "EUR".to_string(),
            };
        assert_eq!(total.unit, "EUR");
        assert!((total.amount - 2.0).abs() < f64::EPSILON);
    }
}
