use serde::Serialize;

use super::types::{AffordabilityResult, DTI_RATIO_LIMIT, HOUSING_RATIO_LIMIT};

const PASS_GLYPH: &str = "✓";
const FAIL_GLYPH: &str = "✗";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidelineStatus {
    pub housing_within: bool,
    pub dti_within: bool,
}

impl GuidelineStatus {
    pub fn for_result(result: &AffordabilityResult) -> Self {
        Self {
            housing_within: result.housing_ratio <= HOUSING_RATIO_LIMIT,
            dti_within: result.dti_ratio <= DTI_RATIO_LIMIT,
        }
    }
}

/// Display strings for a result, ready for a form or terminal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityReport {
    pub max_home_price: String,
    pub max_loan_amount: String,
    pub down_payment_amount: String,
    pub principal_interest: String,
    pub property_taxes: String,
    pub home_insurance: String,
    pub total_monthly_payment: String,
    pub dti_ratio: String,
    pub housing_ratio: String,
    pub housing_guideline: &'static str,
    pub dti_guideline: &'static str,
    pub guidelines: GuidelineStatus,
}

impl AffordabilityReport {
    pub fn from_result(result: &AffordabilityResult) -> Self {
        let guidelines = GuidelineStatus::for_result(result);
        Self {
            max_home_price: format_currency(result.max_home_price),
            max_loan_amount: format_currency(result.max_loan_amount),
            down_payment_amount: format_currency(result.down_payment_amount),
            principal_interest: format_currency(result.principal_interest),
            property_taxes: format_currency(result.property_taxes),
            home_insurance: format_currency(result.home_insurance),
            total_monthly_payment: format_currency(result.total_monthly_payment),
            dti_ratio: format_percentage(result.dti_ratio),
            housing_ratio: format_percentage(result.housing_ratio),
            housing_guideline: glyph(guidelines.housing_within),
            dti_guideline: glyph(guidelines.dti_within),
            guidelines,
        }
    }

    pub fn to_text(&self) -> String {
        let rows = [
            ("Maximum home price", self.max_home_price.as_str()),
            ("Loan amount", self.max_loan_amount.as_str()),
            ("Down payment", self.down_payment_amount.as_str()),
            ("Principal & interest", self.principal_interest.as_str()),
            ("Property taxes", self.property_taxes.as_str()),
            ("Home insurance", self.home_insurance.as_str()),
            ("Total monthly payment", self.total_monthly_payment.as_str()),
        ];
        let mut out = String::new();
        for (label, value) in rows {
            out.push_str(&format!("{label:<24}{value:>14}\n"));
        }
        out.push_str(&format!(
            "{:<24}{:>14} {} (<= {HOUSING_RATIO_LIMIT}%)\n",
            "Housing ratio", self.housing_ratio, self.housing_guideline
        ));
        out.push_str(&format!(
            "{:<24}{:>14} {} (<= {DTI_RATIO_LIMIT}%)\n",
            "Debt-to-income ratio", self.dti_ratio, self.dti_guideline
        ));
        out
    }
}

fn glyph(within: bool) -> &'static str {
    if within { PASS_GLYPH } else { FAIL_GLYPH }
}

/// Whole-dollar USD amount with thousands separators, e.g. `$297,629`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$—".to_string();
    }
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}
