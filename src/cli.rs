use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::api;
use crate::config::AppConfig;
use crate::core::{
    AffordabilityError, AffordabilityInput, AffordabilityReport, DEFAULT_DOWN_PAYMENT_PERCENT,
    DEFAULT_GROSS_INCOME, DEFAULT_INSURANCE_ANNUAL, DEFAULT_INTEREST_RATE, DEFAULT_LOAN_TERM,
    DEFAULT_MONTHLY_DEBTS, DEFAULT_PROPERTY_TAX_RATE, Field, FieldProblem, calculate,
    validation_errors,
};
use crate::error::AppError;
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "affordability",
    about = "Estimate the most expensive home a household can afford under the 28/36 guidelines",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate affordability for one household and print the breakdown
    Calculate(CalculateArgs),
    /// Serve the calculator as a JSON HTTP API
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct CalculateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Print the raw result and report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override AFFORDABILITY_HOST
    #[arg(long)]
    host: Option<String>,
    /// Override AFFORDABILITY_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(
        long,
        default_value_t = DEFAULT_GROSS_INCOME,
        help = "Annual gross household income"
    )]
    gross_income: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_MONTHLY_DEBTS,
        help = "Existing monthly debt payments (cards, cars, student loans)"
    )]
    monthly_debts: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_DOWN_PAYMENT_PERCENT,
        help = "Down payment in percent of the home price"
    )]
    down_payment_percent: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_INTEREST_RATE,
        help = "Annual interest rate in percent, e.g. 7.5"
    )]
    interest_rate: f64,
    #[arg(long, default_value_t = DEFAULT_LOAN_TERM, help = "Loan term in years")]
    loan_term: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_PROPERTY_TAX_RATE,
        help = "Annual property tax in percent of the home price"
    )]
    property_tax_rate: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_INSURANCE_ANNUAL,
        help = "Annual homeowners insurance"
    )]
    insurance_annual: f64,
}

impl Default for InputArgs {
    fn default() -> Self {
        let input = AffordabilityInput::default();
        Self {
            gross_income: input.gross_income,
            monthly_debts: input.monthly_debts,
            down_payment_percent: input.down_payment_percent,
            interest_rate: input.interest_rate,
            loan_term: input.loan_term,
            property_tax_rate: input.property_tax_rate,
            insurance_annual: input.insurance_annual,
        }
    }
}

fn flag_name(field: Field) -> &'static str {
    match field {
        Field::GrossIncome => "--gross-income",
        Field::MonthlyDebts => "--monthly-debts",
        Field::DownPaymentPercent => "--down-payment-percent",
        Field::InterestRate => "--interest-rate",
        Field::LoanTerm => "--loan-term",
        Field::PropertyTaxRate => "--property-tax-rate",
        Field::InsuranceAnnual => "--insurance-annual",
    }
}

fn build_inputs(args: &InputArgs) -> Result<AffordabilityInput, String> {
    let input = AffordabilityInput {
        gross_income: args.gross_income,
        monthly_debts: args.monthly_debts,
        down_payment_percent: args.down_payment_percent,
        interest_rate: args.interest_rate,
        loan_term: args.loan_term,
        property_tax_rate: args.property_tax_rate,
        insurance_annual: args.insurance_annual,
    };

    let errors = validation_errors(&input);
    if errors.is_empty() {
        return Ok(input);
    }

    let messages: Vec<String> = errors
        .iter()
        .map(|e| match e.problem {
            FieldProblem::NotFinite => format!("{} must be a finite number", flag_name(e.field)),
            FieldProblem::Negative => format!("{} must be >= 0", flag_name(e.field)),
        })
        .collect();
    Err(messages.join("; "))
}

pub async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Calculate(args) => run_calculate(args),
        Command::Serve(args) => run_serve(config, args).await,
    }
}

fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let input = build_inputs(&args.input).map_err(AppError::Input)?;
    info!(?input, "calculating affordability");

    let result = match calculate(&input) {
        Ok(result) => result,
        Err(AffordabilityError::DegenerateInput) => {
            println!("{}", AffordabilityError::DegenerateInput);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let report = AffordabilityReport::from_result(&result);

    if args.json {
        let body = serde_json::json!({
            "input": input,
            "result": result,
            "report": report,
        });
        println!("{body:#}");
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

async fn run_serve(mut config: AppConfig, args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let addr = config.server.socket_addr()?;
    api::run_http_server(addr).await?;
    Ok(())
}
