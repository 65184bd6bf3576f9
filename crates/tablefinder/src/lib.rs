//! `tablefinder` - Find your table at the party
//!
//! This library provides a small web page where guests type their name and
//! get their table number, fuzzy-matched against a published spreadsheet.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod finder;
pub mod logging;
pub mod matcher;
pub mod sheet;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use finder::{LookupOutcome, TableFinder};
pub use logging::init_logging;
pub use matcher::{Match, Matcher};
pub use sheet::{Dataset, GuestRecord, SheetCache, SheetSource, TableId};
