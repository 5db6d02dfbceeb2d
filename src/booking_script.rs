// Scripted booking scenarios driven through the demonstration client
//
// Script format, one step per line, each step naming the acting client:
//
//   <client> available <start> <end>
//   <client> quote <start> <end> <car_type> <region>
//   <client> confirm
//   <client> reservations [expected]
//   <client> count <car_type> [expected]
//
// Dates are YYYY-MM-DD. Blank lines and lines starting with '#' are skipped.

use crate::client::RentalClient;
use crate::company::BookingError;
use crate::rental::{CarType, Quote, Reservation};
use anyhow::Context;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    // Reservations confirmed on this line before the failure are kept at the company
    // and handed back in `confirmed`
    #[error("Line {line}: {source}")]
    Booking {
        line: usize,
        source: BookingError,
        confirmed: Vec<Reservation>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: expected {expected} {what}, got {actual}")]
    Mismatch {
        line: usize,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl ScriptError {
    // None for failures that happen before any line is read
    pub fn line(&self) -> Option<usize> {
        match self {
            ScriptError::Parse { line, .. }
            | ScriptError::Booking { line, .. }
            | ScriptError::Mismatch { line, .. } => Some(*line),
            ScriptError::Io(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingCommand {
    CheckAvailable {
        start: NaiveDate,
        end: NaiveDate,
    },
    Quote {
        start: NaiveDate,
        end: NaiveDate,
        car_type: String,
        region: String,
    },
    ConfirmPending,
    Reservations {
        expected: Option<usize>,
    },
    Count {
        car_type: String,
        expected: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingStep {
    pub line: usize,
    pub client: String,
    pub command: BookingCommand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    // Sorted by name so reports are stable
    Available {
        client: String,
        car_types: Vec<CarType>,
    },
    Quoted(Quote),
    Confirmed(Vec<Reservation>),
    Reservations {
        client: String,
        reservations: Vec<Reservation>,
    },
    Count {
        car_type: String,
        count: usize,
    },
}

#[derive(Debug, Default, Clone)]
pub struct ScriptReport {
    pub outcomes: Vec<StepOutcome>,
}

impl ScriptReport {
    pub fn reservations_made(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                StepOutcome::Confirmed(reservations) => reservations.len(),
                _ => 0,
            })
            .sum()
    }
}

fn parse_date(token: &str, line: usize) -> Result<NaiveDate, ScriptError> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d").map_err(|e| ScriptError::Parse {
        line,
        message: format!("invalid date '{}': {}", token, e),
    })
}

fn parse_count(token: Option<&str>, line: usize) -> Result<Option<usize>, ScriptError> {
    token
        .map(|t| {
            t.parse::<usize>().map_err(|_| ScriptError::Parse {
                line,
                message: format!("invalid expected count '{}'", t),
            })
        })
        .transpose()
}

fn parse_line(raw: &str, line: usize) -> Result<Option<BookingStep>, ScriptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let wrong_arity = |usage: &str| ScriptError::Parse {
        line,
        message: format!("usage: <client> {}", usage),
    };

    if tokens.len() < 2 {
        return Err(ScriptError::Parse {
            line,
            message: "expected a client name and a command".to_string(),
        });
    }

    let client = tokens[0].to_string();
    let args = &tokens[2..];
    let command = match tokens[1] {
        "available" => match args {
            [start, end] => BookingCommand::CheckAvailable {
                start: parse_date(start, line)?,
                end: parse_date(end, line)?,
            },
            _ => return Err(wrong_arity("available <start> <end>")),
        },
        "quote" => match args {
            [start, end, car_type, region] => BookingCommand::Quote {
                start: parse_date(start, line)?,
                end: parse_date(end, line)?,
                car_type: car_type.to_string(),
                region: region.to_string(),
            },
            _ => return Err(wrong_arity("quote <start> <end> <car_type> <region>")),
        },
        "confirm" => match args {
            [] => BookingCommand::ConfirmPending,
            _ => return Err(wrong_arity("confirm")),
        },
        "reservations" => match args {
            [] | [_] => BookingCommand::Reservations {
                expected: parse_count(args.first().copied(), line)?,
            },
            _ => return Err(wrong_arity("reservations [expected]")),
        },
        "count" => match args {
            [car_type] | [car_type, _] => BookingCommand::Count {
                car_type: car_type.to_string(),
                expected: parse_count(args.get(1).copied(), line)?,
            },
            _ => return Err(wrong_arity("count <car_type> [expected]")),
        },
        other => {
            return Err(ScriptError::Parse {
                line,
                message: format!("unknown command '{}'", other),
            });
        }
    };

    Ok(Some(BookingStep {
        line,
        client,
        command,
    }))
}

#[derive(Debug, Clone, Default)]
pub struct BookingScript {
    steps: Vec<BookingStep>,
}

impl BookingScript {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            if let Some(step) = parse_line(raw, index + 1)? {
                steps.push(step);
            }
        }
        Ok(Self { steps })
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(ScriptError::from)
            .with_context(|| format!("reading booking script {}", path.display()))?;
        let script = Self::parse(&source)
            .with_context(|| format!("parsing booking script {}", path.display()))?;
        Ok(script)
    }

    pub fn steps(&self) -> &[BookingStep] {
        &self.steps
    }

    // Run every step in order. The first failure ends the run and is returned with its line.
    pub async fn run(&self, client: &RentalClient) -> Result<ScriptReport, ScriptError> {
        let mut pending: HashMap<String, Vec<Quote>> = HashMap::new();
        let mut report = ScriptReport::default();

        info!(steps = self.steps.len(), "booking_script_started");

        for step in &self.steps {
            let line = step.line;
            let booking = |source: BookingError| ScriptError::Booking {
                line,
                source,
                confirmed: Vec::new(),
            };

            let outcome = match &step.command {
                BookingCommand::CheckAvailable { start, end } => {
                    let mut car_types: Vec<CarType> = client
                        .check_for_available_car_types(*start, *end)
                        .await
                        .map_err(|e| booking(e.into()))?
                        .into_iter()
                        .collect();
                    car_types.sort();
                    StepOutcome::Available {
                        client: step.client.clone(),
                        car_types,
                    }
                }
                BookingCommand::Quote {
                    start,
                    end,
                    car_type,
                    region,
                } => {
                    let quote = client
                        .create_quote(&step.client, *start, *end, car_type, region)
                        .await
                        .map_err(booking)?;
                    pending
                        .entry(step.client.clone())
                        .or_default()
                        .push(quote.clone());
                    StepOutcome::Quoted(quote)
                }
                BookingCommand::ConfirmPending => {
                    let quotes = pending.remove(&step.client).unwrap_or_default();
                    let mut reservations = Vec::with_capacity(quotes.len());
                    for quote in quotes {
                        match client.confirm_quote(quote).await {
                            Ok(reservation) => reservations.push(reservation),
                            Err(source) => {
                                return Err(ScriptError::Booking {
                                    line,
                                    source,
                                    confirmed: reservations,
                                });
                            }
                        }
                    }
                    StepOutcome::Confirmed(reservations)
                }
                BookingCommand::Reservations { expected } => {
                    let reservations = client
                        .reservations_by_renter(&step.client)
                        .await
                        .map_err(|e| booking(e.into()))?;
                    check_expected(line, "reservations", *expected, reservations.len())?;
                    StepOutcome::Reservations {
                        client: step.client.clone(),
                        reservations,
                    }
                }
                BookingCommand::Count { car_type, expected } => {
                    let count = client
                        .number_of_reservations_for_car_type(car_type)
                        .await
                        .map_err(|e| booking(e.into()))?;
                    check_expected(line, "reservations of this car type", *expected, count)?;
                    StepOutcome::Count {
                        car_type: car_type.clone(),
                        count,
                    }
                }
            };

            report.outcomes.push(outcome);
        }

        info!(
            steps = self.steps.len(),
            reservations = report.reservations_made(),
            "booking_script_finished"
        );
        Ok(report)
    }
}

fn check_expected(
    line: usize,
    what: &'static str,
    expected: Option<usize>,
    actual: usize,
) -> Result<(), ScriptError> {
    match expected {
        Some(expected) if expected != actual => Err(ScriptError::Mismatch {
            line,
            what,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}

// Load the script named in the client's configuration and run it
pub async fn run_configured_script(client: &RentalClient) -> anyhow::Result<ScriptReport> {
    let script = BookingScript::from_file(&client.config().script_file)?;
    let report = script.run(client).await?;
    Ok(report)
}

// Sample script stored in the samples directory
pub const SAMPLE_SCRIPT_PATH: &str = "samples/simpleTrips";
