// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger source adapter: loads plain-text ledger files into typed
//! postings and price entries. Per-entry problems are collected as
//! warnings alongside whatever parsed cleanly; only an unreadable
//! source is fatal.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Amount, Posting, PriceEntry};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cannot open ledger {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A recoverable per-entry parse problem.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Result of one load: everything that parsed, plus everything that didn't.
#[derive(Debug, Default)]
pub struct LedgerFile {
    pub postings: Vec<Posting>,
    pub prices: Vec<PriceEntry>,
    pub errors: Vec<ParseError>,
}

// 2024-01-05 * "Payee" "Narration" #tag1 #tag2
// 2024-01-05 ! "Narration"
static TXN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\d{4}-\d{2}-\d{2})\s+[*!]\s+"([^"]*)"(?:\s+"([^"]*)")?(.*)$"#)
        .expect("static regex")
});

//   Expenses:Food:Groceries  50.00 ARS
static POSTING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+([A-Za-z][A-Za-z0-9\-]*(?::[A-Za-z0-9\-]+)*)(?:\s+(-?[0-9][0-9,]*(?:\.[0-9]+)?)\s+([A-Za-z][A-Za-z0-9]*))?\s*$")
        .expect("static regex")
});

// 2024-01-02 price ARS 0.0012 USD
static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\s+price\s+([A-Za-z][A-Za-z0-9]*)\s+(-?[0-9][0-9,]*(?:\.[0-9]+)?)\s+([A-Za-z][A-Za-z0-9]*)\s*$")
        .expect("static regex")
});

/// Load and parse the ledger at `path`. Repeatable; never mutates the source.
pub fn load(path: &Path) -> Result<LedgerFile, LedgerError> {
    let text = std::fs::read_to_string(path).map_err(|source| LedgerError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text))
}

struct Header {
    date: NaiveDate,
    payee: Option<String>,
    narration: String,
    tags: Vec<String>,
}

pub fn parse(text: &str) -> LedgerFile {
    let mut out = LedgerFile::default();
    let mut header: Option<Header> = None;

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = strip_comment(raw);
        if line.trim().is_empty() {
            continue;
        }

        // Indented lines are postings under the current transaction.
        if line.starts_with(' ') || line.starts_with('\t') {
            let Some(hdr) = header.as_ref() else {
                out.errors.push(ParseError {
                    line: lineno,
                    message: "posting outside of a transaction".to_string(),
                });
                continue;
            };
            match POSTING_RE.captures(line) {
                Some(caps) => {
                    let account = caps[1].to_string();
                    // Amount-elided postings are legal ledger text; balancing
                    // them is a non-goal, so they are skipped.
                    let (Some(num), Some(ccy)) = (caps.get(2), caps.get(3)) else {
                        continue;
                    };
                    match parse_decimal(num.as_str()) {
                        Ok(number) => out.postings.push(Posting {
                            date: hdr.date,
                            account,
                            payee: hdr.payee.clone(),
                            narration: hdr.narration.clone(),
                            tags: hdr.tags.clone(),
                            amounts: vec![Amount {
                                number,
                                currency: ccy.as_str().to_uppercase(),
                            }],
                        }),
                        Err(msg) => out.errors.push(ParseError {
                            line: lineno,
                            message: msg,
                        }),
                    }
                }
                None => out.errors.push(ParseError {
                    line: lineno,
                    message: format!("unparseable posting: '{}'", line.trim()),
                }),
            }
            continue;
        }

        // Top-level line ends any open transaction.
        header = None;

        if let Some(caps) = PRICE_RE.captures(line) {
            match (parse_date(&caps[1]), parse_decimal(&caps[3])) {
                (Ok(date), Ok(rate)) => out.prices.push(PriceEntry {
                    date,
                    base: caps[2].to_uppercase(),
                    quote: caps[4].to_uppercase(),
                    rate,
                }),
                (Err(msg), _) | (_, Err(msg)) => out.errors.push(ParseError {
                    line: lineno,
                    message: msg,
                }),
            }
            continue;
        }

        if let Some(caps) = TXN_RE.captures(line) {
            match parse_date(&caps[1]) {
                Ok(date) => {
                    // With a single quoted string it is the narration;
                    // with two, the first is the payee.
                    let (payee, narration) = match caps.get(3) {
                        Some(n) => (Some(caps[2].to_string()), n.as_str().to_string()),
                        None => (None, caps[2].to_string()),
                    };
                    let tags = parse_tags(caps.get(4).map_or("", |m| m.as_str()));
                    header = Some(Header {
                        date,
                        payee,
                        narration,
                        tags,
                    });
                }
                Err(msg) => out.errors.push(ParseError {
                    line: lineno,
                    message: msg,
                }),
            }
            continue;
        }

        // Directives this store has no use for (open, close, option,
        // balance, ...) start with a date or a keyword; a line that looks
        // like a malformed transaction is worth surfacing, the rest are
        // silently ignored.
        if line.starts_with(|c: char| c.is_ascii_digit()) && line.contains('"') {
            out.errors.push(ParseError {
                line: lineno,
                message: format!("unparseable transaction header: '{}'", line.trim()),
            });
        }
    }

    out
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_tags(rest: &str) -> Vec<String> {
    rest.split_whitespace()
        .filter_map(|tok| tok.strip_prefix('#'))
        .map(|t| t.to_string())
        .collect()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("invalid date '{}'", s))
}

fn parse_decimal(s: &str) -> Result<Decimal, String> {
    s.replace(',', "")
        .parse::<Decimal>()
        .map_err(|_| format!("invalid amount '{}'", s))
}
