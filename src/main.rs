//! split-engine CLI
//!
//! Settle a group's shared expenses from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a group described in a JSON file
//! split-engine settle --input trip.json
//!
//! # Output as JSON, amounts in yen
//! split-engine settle --input trip.json --format json --currency JPY
//!
//! # Generate a random group for testing
//! split-engine generate --participants 8 --expenses 40
//! ```

use rust_decimal::Decimal;
use split_engine::config::SettlementConfig;
use split_engine::core::group::Group;
use split_engine::error::SettleError;
use split_engine::simulation::stress_test::{generate_random_group, GroupConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-engine — weighted shared-expense settlement

USAGE:
    split-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and transfers for a group
    generate    Generate a random group (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON group file
    --format <FORMAT>   Output format: text (default) or json
    --currency <CODE>   Currency for rounding and display (overrides both files)
    --config <FILE>     JSON settlement config (currency, epsilon); its
                        currency overrides the group file's

OPTIONS (generate):
    --participants <N>  Number of participants (default: 10)
    --expenses <N>      Number of expenses (default: 30)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=debug (default: warn)

EXAMPLES:
    split-engine settle --input trip.json
    split-engine settle --input trip.json --format json --currency JPY
    split-engine generate --participants 5 --expenses 20 --output test.json"#
    );
}

/// An amount or weight given either as a JSON string or a JSON number.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalInput {
    fn parse(&self, what: &str) -> Decimal {
        let raw = match self {
            DecimalInput::Text(s) => s.trim().to_string(),
            DecimalInput::Number(n) => n.to_string(),
        };
        raw.parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(&raw))
            .unwrap_or_else(|e| {
                eprintln!("Invalid {} '{}': {}", what, raw, e);
                process::exit(1);
            })
    }
}

/// JSON schema for an input participant.
#[derive(serde::Deserialize, serde::Serialize)]
struct ParticipantInput {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<DecimalInput>,
}

/// JSON schema for an input expense.
#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    payer: String,
    amount: DecimalInput,
    description: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct GroupFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    participants: Vec<ParticipantInput>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
}

/// JSON output schema for a settlement run.
#[derive(serde::Serialize)]
struct SettlementOutput {
    currency: String,
    total_amount: String,
    total_weight: String,
    settled: bool,
    shares: Vec<ShareOutput>,
    settlements: Vec<TransferOutput>,
}

#[derive(serde::Serialize)]
struct ShareOutput {
    name: String,
    weight: String,
    share_percent: f64,
    expected_share: String,
    paid: String,
    balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct TransferOutput {
    from: String,
    to: String,
    amount: String,
}

fn fail(err: SettleError) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}

/// Read a group file and replay it through the group store, so every entry
/// passes the same validation as interactive input.
fn load_group(path: &str) -> (Group, Option<String>) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: GroupFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "currency": "USD",
  "participants": [ {{ "name": "Alice", "weight": "1" }}, {{ "name": "Bob" }} ],
  "expenses": [ {{ "payer": "Alice", "amount": "120.50", "description": "Dinner" }} ]
}}"#
        );
        process::exit(1);
    });

    let mut group = Group::new();
    for p in &file.participants {
        let result = match &p.weight {
            Some(w) => group.add_participant_with_weight(&p.name, w.parse("weight")),
            None => group.add_participant(&p.name),
        };
        if let Err(e) = result {
            fail(e);
        }
    }
    for ex in &file.expenses {
        let amount = ex.amount.parse("amount");
        if let Err(e) = group.add_expense(&ex.payer, amount, &ex.description) {
            fail(e);
        }
    }
    (group, file.currency)
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut currency_code: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--currency" => {
                i += 1;
                currency_code = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--currency requires a currency code");
                    process::exit(1);
                }));
            }
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let (group, file_currency) = load_group(&path);

    let config_file = config_path
        .as_ref()
        .map(|p| SettlementConfig::from_file(p).unwrap_or_else(|e| fail(e)));
    let config = SettlementConfig::resolve(
        currency_code.as_deref(),
        config_file,
        file_currency.as_deref(),
    );

    let plan = group.settle(&config).unwrap_or_else(|e| fail(e));
    log::info!(
        "settled {} participants with {} transfers",
        group.participants().len(),
        plan.settlements().len()
    );

    if format == "json" {
        let currency = &config.currency;
        let shares = plan
            .share_breakdown()
            .into_iter()
            .map(|line| ShareOutput {
                status: if line.balance > config.epsilon {
                    "CREDITOR".to_string()
                } else if line.balance < -config.epsilon {
                    "DEBTOR".to_string()
                } else {
                    "SETTLED".to_string()
                },
                name: line.name.to_string(),
                weight: line.weight.normalize().to_string(),
                share_percent: line.share_percent,
                expected_share: currency.round(line.expected_share).to_string(),
                paid: currency.round(line.paid).to_string(),
                balance: currency.round(line.balance).to_string(),
            })
            .collect();

        let output = SettlementOutput {
            currency: currency.code().to_string(),
            total_amount: plan.total_amount().to_string(),
            total_weight: plan.total_weight().normalize().to_string(),
            settled: plan.is_settled(),
            shares,
            settlements: plan
                .settlements()
                .iter()
                .map(|s| TransferOutput {
                    from: s.from.to_string(),
                    to: s.to.to_string(),
                    amount: s.amount.to_string(),
                })
                .collect(),
        };

        println!("{}", to_json(&output));
    } else {
        println!("{}", plan);
    }
}

fn cmd_generate(args: &[String]) {
    let mut participants = 10usize;
    let mut expenses = 30usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                participants = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--participants requires a number");
                        process::exit(1);
                    });
            }
            "--expenses" => {
                i += 1;
                expenses = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = GroupConfig {
        participant_count: participants,
        expense_count: expenses,
        ..Default::default()
    };

    let group = generate_random_group(&config).unwrap_or_else(|e| fail(e));

    let output = GroupFile {
        currency: None,
        participants: group
            .participants()
            .iter()
            .map(|p| ParticipantInput {
                name: p.name().to_string(),
                weight: Some(DecimalInput::Text(p.weight().normalize().to_string())),
            })
            .collect(),
        expenses: group
            .expenses()
            .iter()
            .map(|ex| ExpenseInput {
                payer: ex.payer().to_string(),
                amount: DecimalInput::Text(ex.amount().to_string()),
                description: ex.description().to_string(),
            })
            .collect(),
    };

    let json = to_json(&output);

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            group.expenses().len(),
            group.participants().len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
