//! Экспорт накопленных операций в CSV и QIF.

use crate::error::StatementError;
use crate::period::Period;
use crate::statement::StatementReader;
use crate::types::Entry;
use csv::{QuoteStyle, WriterBuilder};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Имя счёта в преамбуле QIF по умолчанию.
pub const DEFAULT_ACCOUNT_NAME: &str = "ICS Creditcard";

/// Формат выходного файла.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Все столбцы таблицы и служебные поля.
    Csv,
    /// Quicken Interchange Format, тип счёта `CCard`.
    #[default]
    Qif,
}

impl ExportFormat {
    /// Расширение файла без точки.
    #[inline]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Qif => "qif",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "qif" => Ok(Self::Qif),
            other => Err(format!("unsupported format '{other}', expected csv or qif")),
        }
    }
}

/// Источник строки `M` (memo) в QIF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QifMemo {
    /// Столбец иностранной валюты, как в исторических выгрузках.
    #[default]
    Currency,
    /// Описание операции.
    Description,
}

/// Параметры записи QIF.
#[derive(Debug, Clone)]
pub struct QifOptions {
    /// Имя счёта в строке `N`.
    pub account_name: String,
    /// Источник memo.
    pub memo: QifMemo,
}

impl Default for QifOptions {
    fn default() -> Self {
        Self {
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
            memo: QifMemo::default(),
        }
    }
}

impl StatementReader {
    /// Пишет заголовки и все операции в CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), StatementError> {
        let mut csv = WriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .quote_style(QuoteStyle::Necessary)
            .flexible(true)
            .from_writer(writer);
        csv.write_record(self.headers())?;
        for entry in self.entries() {
            csv.write_record(entry.record())?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Пишет операции в QIF: преамбула счёта и по пять строк на операцию.
    pub fn write_qif<W: Write>(
        &self,
        mut writer: W,
        options: &QifOptions,
    ) -> Result<(), StatementError> {
        writeln!(writer, "!Account")?;
        writeln!(writer, "N{}", options.account_name)?;
        writeln!(writer, "^")?;
        writeln!(writer, "!Type:CCard")?;
        for entry in self.entries() {
            write_qif_entry(&mut writer, entry, options.memo)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Пишет операции в выбранном формате.
    pub fn export<W: Write>(
        &self,
        writer: W,
        format: ExportFormat,
        options: &QifOptions,
    ) -> Result<(), StatementError> {
        match format {
            ExportFormat::Csv => self.write_csv(writer),
            ExportFormat::Qif => self.write_qif(writer, options),
        }
    }
}

fn write_qif_entry<W: Write>(
    writer: &mut W,
    entry: &Entry,
    memo: QifMemo,
) -> Result<(), StatementError> {
    let memo = match memo {
        QifMemo::Currency => entry.currency(),
        QifMemo::Description => entry.description(),
    };
    writeln!(writer, "D{}", entry.date())?;
    writeln!(writer, "T{}", entry.amount())?;
    writeln!(writer, "M{memo}")?;
    writeln!(writer, "P{}", entry.payee)?;
    writeln!(writer, "^")?;
    Ok(())
}

/// Имя файла по умолчанию: `YYYY-MM.ext` или `YYYY-MM_to_YYYY-MM.ext`.
pub fn default_filename(start: Period, end: Period, format: ExportFormat) -> PathBuf {
    let stem = if start == end {
        start.label()
    } else {
        format!("{}_to_{}", start.label(), end.label())
    };
    PathBuf::from(format!("{stem}.{}", format.extension()))
}

/// Дописывает расширение формата к явно заданному имени файла,
/// если оно ещё не оканчивается на него.
pub fn with_extension(filename: &Path, format: ExportFormat) -> PathBuf {
    let has_extension = filename
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
    if has_extension {
        filename.to_path_buf()
    } else {
        let mut name = filename.as_os_str().to_os_string();
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("qif".parse::<ExportFormat>(), Ok(ExportFormat::Qif));
        assert!("ofx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::default(), ExportFormat::Qif);
    }

    #[test]
    fn filenames_follow_period_range() {
        let start = Period::new(2014, 1);
        assert_eq!(
            default_filename(start, start, ExportFormat::Qif),
            PathBuf::from("2014-01.qif")
        );
        assert_eq!(
            default_filename(start, Period::new(2014, 6), ExportFormat::Csv),
            PathBuf::from("2014-01_to_2014-06.csv")
        );
    }

    #[test]
    fn explicit_filename_gets_extension_once() {
        assert_eq!(
            with_extension(Path::new("out"), ExportFormat::Csv),
            PathBuf::from("out.csv")
        );
        assert_eq!(
            with_extension(Path::new("out.csv"), ExportFormat::Csv),
            PathBuf::from("out.csv")
        );
        assert_eq!(
            with_extension(Path::new("march.2014"), ExportFormat::Qif),
            PathBuf::from("march.2014.qif")
        );
    }
}
