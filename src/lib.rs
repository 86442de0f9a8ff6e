#![warn(missing_docs)]
//! Библиотека для загрузки ежемесячных выписок по кредитной карте ICS,
//! разбора HTML-таблицы операций и экспорта в CSV и QIF.

mod error;
mod export;
mod parser;
mod period;
mod portal;
mod raw;
mod statement;
mod types;
mod utils;

pub use crate::error::StatementError;
pub use crate::export::{
    DEFAULT_ACCOUNT_NAME, ExportFormat, QifMemo, QifOptions, default_filename, with_extension,
};
pub use crate::parser::DomStatement;
pub use crate::period::{Period, PeriodRange};
pub use crate::portal::{
    DEFAULT_LOGIN_URL, DEFAULT_STATEMENT_URL, Portal, PortalConfig, StatementSource,
};
pub use crate::raw::{RawStatement, SavedPages};
pub use crate::statement::{ColumnMapping, StatementReader};
pub use crate::types::*;
pub use crate::utils::{extract_payee, fix_decimal_separator, is_debit, repair_amount};
