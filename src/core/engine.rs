use super::types::{
    AffordabilityError, AffordabilityInput, AffordabilityResult, DTI_RATIO_LIMIT, FieldError,
    FieldProblem, HOUSING_RATIO_LIMIT,
};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy)]
struct PaymentBudget {
    monthly_income: f64,
    max_principal_interest: f64,
}

pub fn validate(input: &AffordabilityInput) -> bool {
    input
        .fields()
        .iter()
        .all(|&(_, value)| value.is_finite() && value >= 0.0)
}

/// Every field that fails the finite, non-negative check, in form order.
pub fn validation_errors(input: &AffordabilityInput) -> Vec<FieldError> {
    input
        .fields()
        .iter()
        .filter_map(|&(field, value)| {
            let problem = if !value.is_finite() {
                FieldProblem::NotFinite
            } else if value < 0.0 {
                FieldProblem::Negative
            } else {
                return None;
            };
            Some(FieldError { field, problem })
        })
        .collect()
}

/// Sizes the most expensive home the input can carry under the 28/36 guidelines.
///
/// Expects input that already passed [`validate`]. Property tax is left out of the
/// payment budget when sizing the loan, so the resulting housing ratio can sit above
/// the 28% guideline once tax on the chosen price is added back.
pub fn calculate(input: &AffordabilityInput) -> Result<AffordabilityResult, AffordabilityError> {
    if input.gross_income == 0.0 || input.interest_rate == 0.0 || input.loan_term == 0.0 {
        return Err(AffordabilityError::DegenerateInput);
    }

    let budget = payment_budget(input)?;

    if input.down_payment_percent >= 100.0 {
        return Err(AffordabilityError::InvalidDownPayment);
    }

    let max_loan_amount =
        max_loan_for_payment(budget.max_principal_interest, input.interest_rate, input.loan_term);

    let financed_share = 1.0 - input.down_payment_percent / 100.0;
    let max_home_price = max_loan_amount / financed_share;
    let actual_loan_amount = max_home_price * financed_share;

    let principal_interest =
        monthly_payment(actual_loan_amount, input.interest_rate, input.loan_term);
    let property_taxes = (max_home_price * input.property_tax_rate / 100.0) / MONTHS_PER_YEAR;
    let home_insurance = input.insurance_annual / MONTHS_PER_YEAR;
    let total_monthly_payment = principal_interest + property_taxes + home_insurance;

    let result = AffordabilityResult {
        max_home_price,
        max_loan_amount: actual_loan_amount,
        down_payment_amount: max_home_price * (input.down_payment_percent / 100.0),
        principal_interest,
        property_taxes,
        home_insurance,
        total_monthly_payment,
        dti_ratio: (input.monthly_debts + total_monthly_payment) / budget.monthly_income * 100.0,
        housing_ratio: total_monthly_payment / budget.monthly_income * 100.0,
    };
    if !result.is_finite() {
        return Err(AffordabilityError::OutOfRange);
    }
    Ok(result)
}

fn payment_budget(input: &AffordabilityInput) -> Result<PaymentBudget, AffordabilityError> {
    let monthly_income = input.gross_income / MONTHS_PER_YEAR;
    let max_housing_payment = monthly_income * (HOUSING_RATIO_LIMIT / 100.0);
    let max_total_debt_payment = monthly_income * (DTI_RATIO_LIMIT / 100.0);
    let max_mortgage_payment = max_total_debt_payment - input.monthly_debts;

    let max_monthly_payment = max_housing_payment.min(max_mortgage_payment);
    if max_monthly_payment <= 0.0 {
        return Err(AffordabilityError::DebtTooHigh);
    }

    let monthly_insurance = input.insurance_annual / MONTHS_PER_YEAR;
    let max_principal_interest = max_monthly_payment - monthly_insurance;
    if max_principal_interest <= 0.0 {
        return Err(AffordabilityError::InsuranceExceedsBudget);
    }

    Ok(PaymentBudget {
        monthly_income,
        max_principal_interest,
    })
}

/// Level monthly payment that fully amortizes `principal` over `years`.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, years: f64) -> f64 {
    let monthly_rate = annual_rate_percent / 100.0 / MONTHS_PER_YEAR;
    let num_payments = years * MONTHS_PER_YEAR;

    if monthly_rate == 0.0 {
        return principal / num_payments;
    }

    let growth = (1.0 + monthly_rate).powf(num_payments);
    if !growth.is_finite() {
        // Interest-only limit of a very long loan.
        return principal * monthly_rate;
    }
    let accrued = growth - 1.0;
    if accrued <= 0.0 {
        // Rate below one ulp of 1.0 compounds to nothing.
        return principal / num_payments;
    }
    principal * (monthly_rate * growth) / accrued
}

/// Largest principal a fixed monthly `payment` can fully amortize over `years`.
pub fn max_loan_for_payment(payment: f64, annual_rate_percent: f64, years: f64) -> f64 {
    let monthly_rate = annual_rate_percent / 100.0 / MONTHS_PER_YEAR;
    let num_payments = years * MONTHS_PER_YEAR;

    if monthly_rate <= 0.0 {
        return payment * num_payments;
    }

    let growth = (1.0 + monthly_rate).powf(num_payments);
    if !growth.is_finite() {
        return payment / monthly_rate;
    }
    let accrued = growth - 1.0;
    if accrued <= 0.0 {
        return payment * num_payments;
    }
    payment * (accrued / (monthly_rate * growth))
}
