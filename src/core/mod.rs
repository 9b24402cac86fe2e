mod engine;
mod input;
mod report;
mod types;

pub use engine::{calculate, max_loan_for_payment, monthly_payment, validate, validation_errors};
pub use input::{
    DEFAULT_DOWN_PAYMENT_PERCENT, DEFAULT_GROSS_INCOME, DEFAULT_INSURANCE_ANNUAL,
    DEFAULT_INTEREST_RATE, DEFAULT_LOAN_TERM, DEFAULT_MONTHLY_DEBTS, DEFAULT_PROPERTY_TAX_RATE,
    FieldValue, FormFields, parse_amount,
};
pub use report::{AffordabilityReport, GuidelineStatus, format_currency, format_percentage};
pub use types::{
    AffordabilityError, AffordabilityInput, AffordabilityResult, DTI_RATIO_LIMIT, Field,
    FieldError, FieldProblem, HOUSING_RATIO_LIMIT,
};
