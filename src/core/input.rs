use serde::Deserialize;

use super::types::AffordabilityInput;

pub const DEFAULT_GROSS_INCOME: f64 = 75_000.0;
pub const DEFAULT_MONTHLY_DEBTS: f64 = 500.0;
pub const DEFAULT_DOWN_PAYMENT_PERCENT: f64 = 20.0;
pub const DEFAULT_INTEREST_RATE: f64 = 7.5;
pub const DEFAULT_LOAN_TERM: f64 = 30.0;
pub const DEFAULT_PROPERTY_TAX_RATE: f64 = 1.2;
pub const DEFAULT_INSURANCE_ANNUAL: f64 = 1_200.0;

impl Default for AffordabilityInput {
    /// The starter profile shown before anyone edits the form.
    fn default() -> Self {
        Self {
            gross_income: DEFAULT_GROSS_INCOME,
            monthly_debts: DEFAULT_MONTHLY_DEBTS,
            down_payment_percent: DEFAULT_DOWN_PAYMENT_PERCENT,
            interest_rate: DEFAULT_INTEREST_RATE,
            loan_term: DEFAULT_LOAN_TERM,
            property_tax_rate: DEFAULT_PROPERTY_TAX_RATE,
            insurance_annual: DEFAULT_INSURANCE_ANNUAL,
        }
    }
}

/// A raw field value as a client sends it: either a number or text such as `"75,000"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn to_amount(&self) -> f64 {
        match self {
            FieldValue::Number(v) => *v,
            FieldValue::Text(s) => parse_amount(s),
        }
    }
}

/// Parses a locale-formatted amount, dropping `,` thousands separators.
///
/// Empty or unparseable text reads as zero. Negative values pass through so that
/// validation can reject them.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

/// The seven form fields as submitted. A missing field keeps its default.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormFields {
    pub gross_income: Option<FieldValue>,
    pub monthly_debts: Option<FieldValue>,
    pub down_payment_percent: Option<FieldValue>,
    pub interest_rate: Option<FieldValue>,
    pub loan_term: Option<FieldValue>,
    pub property_tax_rate: Option<FieldValue>,
    pub insurance_annual: Option<FieldValue>,
}

impl FormFields {
    pub fn collect(&self) -> AffordabilityInput {
        self.collect_onto(AffordabilityInput::default())
    }

    pub fn collect_onto(&self, base: AffordabilityInput) -> AffordabilityInput {
        let pick = |value: &Option<FieldValue>, fallback: f64| {
            value.as_ref().map_or(fallback, FieldValue::to_amount)
        };
        AffordabilityInput {
            gross_income: pick(&self.gross_income, base.gross_income),
            monthly_debts: pick(&self.monthly_debts, base.monthly_debts),
            down_payment_percent: pick(&self.down_payment_percent, base.down_payment_percent),
            interest_rate: pick(&self.interest_rate, base.interest_rate),
            loan_term: pick(&self.loan_term, base.loan_term),
            property_tax_rate: pick(&self.property_tax_rate, base.property_tax_rate),
            insurance_annual: pick(&self.insurance_annual, base.insurance_annual),
        }
    }
}
