use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Contains,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Eq => "eq",
            Operator::Contains => "contains",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Eq => "=",
            Operator::Contains => "~",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gt" | ">" => Ok(Operator::Gt),
            "gte" | ">=" => Ok(Operator::Gte),
            "lt" | "<" => Ok(Operator::Lt),
            "lte" | "<=" => Ok(Operator::Lte),
            "eq" | "=" | "==" => Ok(Operator::Eq),
            "contains" | "~" => Ok(Operator::Contains),
            other => Err(FilterError::UnknownOperator(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Numeric,
    Categoric,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl FilterValue {
    /// Blank text and non-finite numbers carry no filter.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Number(value) => !value.is_finite(),
            FilterValue::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(value) => write!(f, "{value}"),
            FilterValue::Text(text) => f.write_str(text),
        }
    }
}

/// One screener condition: `operand operator value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriterion {
    pub operand: String,
    pub operator: Operator,
    pub filter_type: FilterType,
    #[serde(default)]
    pub value: Option<FilterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_high: Option<f64>,
}

impl FilterCriterion {
    pub fn numeric(operand: &str, operator: Operator, value: f64) -> Self {
        Self::with_value(
            operand,
            operator,
            FilterType::Numeric,
            Some(FilterValue::Number(value)),
        )
    }

    /// Checkbox-style filter matching a single category of `operand`.
    pub fn category(operand: &str, category: &str) -> Self {
        Self::with_value(
            operand,
            Operator::Eq,
            FilterType::Categoric,
            Some(FilterValue::Text(category.trim().to_string())),
        )
    }

    pub fn text(operand: &str, text: &str) -> Self {
        Self::with_value(
            operand,
            Operator::Contains,
            FilterType::String,
            Some(FilterValue::Text(text.trim().to_string())),
        )
    }

    pub fn with_value(
        operand: &str,
        operator: Operator,
        filter_type: FilterType,
        value: Option<FilterValue>,
    ) -> Self {
        Self {
            operand: operand.trim().to_string(),
            operator,
            filter_type,
            value,
            value_low: None,
            value_high: None,
        }
    }

    /// Parse `operand:operator:value`, e.g. `eps:gte:5` or `industry:contains:semi`.
    pub fn parse_expression(expression: &str) -> Result<Self, FilterError> {
        let mut parts = expression.splitn(3, ':');
        let (Some(operand), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(FilterError::InvalidExpression(expression.to_string()));
        };

        let operator: Operator = operator.parse()?;
        let criterion = match value.trim().parse::<f64>() {
            Ok(number) if operator != Operator::Contains => {
                FilterCriterion::numeric(operand, operator, number)
            }
            _ if operator == Operator::Eq => FilterCriterion::category(operand, value),
            _ => FilterCriterion::with_value(
                operand,
                operator,
                FilterType::String,
                Some(FilterValue::Text(value.trim().to_string())),
            ),
        };
        criterion.validate()?;
        Ok(criterion)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        let operand = self.operand.trim();
        if operand.is_empty() {
            return Err(FilterError::MissingOperand);
        }
        // Key separators; see `FilterKey`.
        if operand.contains('.') || operand.contains("__") {
            return Err(FilterError::InvalidOperand(operand.to_string()));
        }
        Ok(())
    }

    /// Whether the criterion constrains anything; empty criteria are never stored.
    pub fn has_effective_value(&self) -> bool {
        let has_value = self.value.as_ref().is_some_and(|value| !value.is_empty());
        let has_bound = [self.value_low, self.value_high]
            .into_iter()
            .flatten()
            .any(f64::is_finite);
        has_value || has_bound
    }

    /// Category text for categoric criteria.
    pub fn category_name(&self) -> Option<&str> {
        match (&self.filter_type, &self.value) {
            (FilterType::Categoric, Some(FilterValue::Text(category))) => Some(category.as_str()),
            _ => None,
        }
    }

    /// Short label for filter chips, e.g. `price >= 10`.
    pub fn describe(&self) -> String {
        match (&self.value, self.value_low, self.value_high) {
            (Some(value), _, _) => format!("{} {} {}", self.operand, self.operator.symbol(), value),
            (None, Some(low), Some(high)) => format!("{} in {low}..{high}", self.operand),
            (None, Some(low), None) => format!("{} >= {low}", self.operand),
            (None, None, Some(high)) => format!("{} <= {high}", self.operand),
            (None, None, None) => self.operand.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_canonical_schema() {
        let criterion = FilterCriterion::numeric("eps", Operator::Gte, 5.0);
        let json = serde_json::to_value(&criterion).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "operand": "eps",
                "operator": "gte",
                "filter_type": "numeric",
                "value": 5.0
            })
        );
    }

    #[test]
    fn deserializes_text_and_numbers() {
        let json = r#"{"operand":"sector","operator":"eq","filter_type":"categoric","value":"Energy"}"#;
        let criterion: FilterCriterion = serde_json::from_str(json).expect("criterion");
        assert_eq!(criterion.category_name(), Some("Energy"));

        let json = r#"{"operand":"price","operator":"lt","filter_type":"numeric","value":null,"value_high":20}"#;
        let criterion: FilterCriterion = serde_json::from_str(json).expect("criterion");
        assert!(criterion.has_effective_value());
        assert_eq!(criterion.describe(), "price <= 20");
    }

    #[test]
    fn empty_values_are_not_effective() {
        assert!(!FilterCriterion::text("industry", "   ").has_effective_value());
        assert!(!FilterCriterion::numeric("price", Operator::Gt, f64::NAN).has_effective_value());
        assert!(!FilterCriterion::with_value("eps", Operator::Gt, FilterType::Numeric, None)
            .has_effective_value());
        assert!(FilterCriterion::numeric("price", Operator::Gt, 0.0).has_effective_value());
    }

    #[test]
    fn parses_expressions() {
        let criterion = FilterCriterion::parse_expression("eps:gte:5").expect("numeric");
        assert_eq!(criterion, FilterCriterion::numeric("eps", Operator::Gte, 5.0));

        let criterion = FilterCriterion::parse_expression("industry:contains:Semi").expect("text");
        assert_eq!(criterion, FilterCriterion::text("industry", "Semi"));

        let criterion = FilterCriterion::parse_expression("exchange:eq:NMS").expect("category");
        assert_eq!(criterion.category_name(), Some("NMS"));

        assert_eq!(
            FilterCriterion::parse_expression("eps:between:1"),
            Err(FilterError::UnknownOperator("between".into()))
        );
        assert_eq!(
            FilterCriterion::parse_expression(":gt:1"),
            Err(FilterError::MissingOperand)
        );
        assert!(matches!(
            FilterCriterion::parse_expression("eps"),
            Err(FilterError::InvalidExpression(_))
        ));
    }
}
