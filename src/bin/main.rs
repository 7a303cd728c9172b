// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use point_wallet_rs::{PointHistoryTable, PointService, TransactionKind, UserId, UserPointTable};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Point Wallet - Process point operation CSV files
///
/// Reads charge/use operations from a CSV file and outputs final balances
/// to stdout.
#[derive(Parser, Debug)]
#[command(name = "point-wallet-rs")]
#[command(about = "A point wallet that processes charge/use operation CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: kind,user,amount
    /// Example: cargo run -- operations.csv > balances.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let balances = Arc::new(UserPointTable::new());
    let histories = Arc::new(PointHistoryTable::new());
    let service = PointService::with_stores(balances.clone(), histories);

    // Process operations from CSV
    if let Err(e) = process_operations(BufReader::new(file), &service) {
        eprintln!("Error processing operations: {}", e);
        process::exit(1);
    }

    // Write results to stdout
    if let Err(e) = write_balances(&balances, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `kind, user, amount`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    kind: String,
    user: i64,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<i64>,
}

impl CsvRecord {
    /// Converts CSV record to an operation.
    ///
    /// Returns `None` for unknown kinds or a missing amount field.
    fn into_operation(self) -> Option<(TransactionKind, UserId, i64)> {
        let user_id = UserId(self.user);
        let amount = self.amount?;

        match self.kind.to_lowercase().as_str() {
            "charge" => Some((TransactionKind::Charge, user_id, amount)),
            "use" => Some((TransactionKind::Use, user_id, amount)),
            _ => None,
        }
    }
}

/// Process point operations from a CSV reader.
///
/// Streaming parsing keeps memory flat for arbitrarily large files.
/// Malformed rows and rejected operations are silently skipped.
///
/// # CSV Format
///
/// Expected columns: `kind, user, amount`
/// - `kind`: Operation kind (charge, use)
/// - `user`: User ID (i64)
/// - `amount`: Point amount (i64)
///
/// # Example
///
/// ```csv
/// kind,user,amount
/// charge,1,1000
/// use,1,300
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
/// Individual operation rejections are logged in debug mode but don't stop
/// processing.
pub fn process_operations<R: Read>(reader: R, service: &PointService) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " charge "
        .flexible(true) // Allow missing amount field
        .has_headers(true) // Skip first row as header
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some((kind, user_id, amount)) = record.into_operation() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping invalid operation record");
                    continue;
                };

                let outcome = match kind {
                    TransactionKind::Charge => service.charge(user_id, amount),
                    TransactionKind::Use => service.use_points(user_id, amount),
                };

                // Rejected operations are skipped (silent failure)
                if let Err(e) = outcome {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping operation for user {}: {}", user_id, e);
                }
            }
            Err(e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", e);
                continue;
            }
        }
    }

    Ok(())
}

/// Write final balances to a CSV writer.
///
/// # CSV Format
///
/// Columns: `user_id, amount, updated_at`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_balances<W: Write>(table: &UserPointTable, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for balance in table.all() {
        wtr.serialize(balance)?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}
