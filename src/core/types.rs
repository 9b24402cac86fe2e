use std::fmt;

use serde::{Deserialize, Serialize};

/// Front-end guideline: housing costs as a share of gross monthly income.
pub const HOUSING_RATIO_LIMIT: f64 = 28.0;
/// Back-end guideline: all debt payments as a share of gross monthly income.
pub const DTI_RATIO_LIMIT: f64 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityInput {
    pub gross_income: f64,
    pub monthly_debts: f64,
    pub down_payment_percent: f64,
    pub interest_rate: f64,
    pub loan_term: f64,
    pub property_tax_rate: f64,
    pub insurance_annual: f64,
}

impl AffordabilityInput {
    /// Field names paired with their values, in form order.
    pub fn fields(&self) -> [(Field, f64); 7] {
        [
            (Field::GrossIncome, self.gross_income),
            (Field::MonthlyDebts, self.monthly_debts),
            (Field::DownPaymentPercent, self.down_payment_percent),
            (Field::InterestRate, self.interest_rate),
            (Field::LoanTerm, self.loan_term),
            (Field::PropertyTaxRate, self.property_tax_rate),
            (Field::InsuranceAnnual, self.insurance_annual),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityResult {
    pub max_home_price: f64,
    pub max_loan_amount: f64,
    pub down_payment_amount: f64,
    pub principal_interest: f64,
    pub property_taxes: f64,
    pub home_insurance: f64,
    pub total_monthly_payment: f64,
    pub dti_ratio: f64,
    pub housing_ratio: f64,
}

impl AffordabilityResult {
    pub fn is_finite(&self) -> bool {
        [
            self.max_home_price,
            self.max_loan_amount,
            self.down_payment_amount,
            self.principal_interest,
            self.property_taxes,
            self.home_insurance,
            self.total_monthly_payment,
            self.dti_ratio,
            self.housing_ratio,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    GrossIncome,
    MonthlyDebts,
    DownPaymentPercent,
    InterestRate,
    LoanTerm,
    PropertyTaxRate,
    InsuranceAnnual,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::GrossIncome => "grossIncome",
            Field::MonthlyDebts => "monthlyDebts",
            Field::DownPaymentPercent => "downPaymentPercent",
            Field::InterestRate => "interestRate",
            Field::LoanTerm => "loanTerm",
            Field::PropertyTaxRate => "propertyTaxRate",
            Field::InsuranceAnnual => "insuranceAnnual",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldProblem {
    NotFinite,
    Negative,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            FieldProblem::NotFinite => write!(f, "{} must be a finite number", self.field.as_str()),
            FieldProblem::Negative => write!(f, "{} must be >= 0", self.field.as_str()),
        }
    }
}

/// Reasons a calculation produces no result.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AffordabilityError {
    /// Gross income, interest rate or loan term is zero; there is nothing to report yet.
    DegenerateInput,
    /// Existing debts consume the whole debt-to-income budget.
    DebtTooHigh,
    /// A down payment of 100% or more leaves no loan to size the price from.
    InvalidDownPayment,
    /// Insurance alone consumes the allowable monthly payment.
    InsuranceExceedsBudget,
    /// Rate or term so extreme that the payment figures overflow `f64`.
    OutOfRange,
}

impl AffordabilityError {
    pub fn kind(self) -> &'static str {
        match self {
            AffordabilityError::DegenerateInput => "degenerate-input",
            AffordabilityError::DebtTooHigh => "debt-too-high",
            AffordabilityError::InvalidDownPayment => "invalid-down-payment",
            AffordabilityError::InsuranceExceedsBudget => "insurance-exceeds-budget",
            AffordabilityError::OutOfRange => "out-of-range",
        }
    }
}

impl fmt::Display for AffordabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffordabilityError::DegenerateInput => write!(
                f,
                "Gross income, interest rate and loan term are required to estimate affordability."
            ),
            AffordabilityError::DebtTooHigh => {
                write!(f, "Your monthly debt payments are too high for a mortgage.")
            }
            AffordabilityError::InvalidDownPayment => {
                write!(f, "Down payment must be less than 100% of the home price.")
            }
            AffordabilityError::InsuranceExceedsBudget => write!(
                f,
                "Home insurance alone exceeds the monthly payment you can afford."
            ),
            AffordabilityError::OutOfRange => write!(
                f,
                "Interest rate and loan term are outside the range this calculator can estimate."
            ),
        }
    }
}

impl std::error::Error for AffordabilityError {}
