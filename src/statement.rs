//! Накопитель операций из выписок за несколько периодов.

use crate::error::StatementError;
use crate::parser::DomStatement;
use crate::period::Period;
use crate::portal::StatementSource;
use crate::raw::RawStatement;
use crate::types::{ColumnLayout, Entry, SYNTHETIC_HEADERS, Totals};
use rust_decimal::Decimal;

/// Как сопоставлять столбцы таблицы с полями операции.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnMapping {
    /// По подписям заголовков первой разобранной таблицы.
    #[default]
    Headers,
    /// По фиксированным индексам [`ColumnLayout::POSITIONAL`].
    Positional,
}

/// Заголовки и операции, собранные за все загруженные периоды.
///
/// Заголовки берутся из первой разобранной таблицы и считаются
/// одинаковыми для всех последующих периодов.
#[derive(Debug, Clone, Default)]
pub struct StatementReader {
    mapping: ColumnMapping,
    layout: Option<ColumnLayout>,
    headers: Vec<String>,
    entries: Vec<Entry>,
}

impl StatementReader {
    /// Создаёт пустой накопитель.
    #[inline]
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            mapping,
            ..Self::default()
        }
    }

    /// Заголовки таблицы вместе со служебными `payee`, `out`, `in`.
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Все накопленные операции.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Разбирает одну страницу выписки и добавляет её операции.
    ///
    /// Возвращает число добавленных операций.
    pub fn ingest(&mut self, raw: &RawStatement) -> Result<usize, StatementError> {
        tracing::info!("parsing statement table");
        let dom = DomStatement::parse(raw);

        let layout = match self.layout {
            Some(layout) => layout,
            None => {
                let headers = dom.headers()?;
                tracing::debug!(?headers, "captured statement headers");
                let layout = match self.mapping {
                    ColumnMapping::Headers => ColumnLayout::from_headers(&headers)?,
                    ColumnMapping::Positional => ColumnLayout::POSITIONAL,
                };
                self.headers = headers;
                self.headers
                    .extend(SYNTHETIC_HEADERS.iter().map(ToString::to_string));
                self.layout = Some(layout);
                layout
            }
        };

        let entries = dom.entries(layout)?;
        let added = entries.len();
        self.entries.extend(entries);
        tracing::info!(added, total = self.entries.len(), "entries retrieved");
        Ok(added)
    }

    /// Загружает и разбирает выписку за один период.
    pub fn get_statement<S: StatementSource>(
        &mut self,
        source: &mut S,
        period: Period,
    ) -> Result<usize, StatementError> {
        let raw = source.fetch(period)?;
        self.ingest(&raw)
    }

    /// Загружает выписки с `start` по `end` включительно, по порядку.
    pub fn fetch_range<S: StatementSource>(
        &mut self,
        source: &mut S,
        start: Period,
        end: Period,
    ) -> Result<usize, StatementError> {
        if end < start {
            return Err(StatementError::InvalidRange { start, end });
        }
        let mut added = 0;
        for period in start.through(end) {
            added += self.get_statement(source, period)?;
        }
        Ok(added)
    }

    /// Суммы списаний и зачислений по всем операциям.
    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for entry in &self.entries {
            match entry.amount_value() {
                Some(value) if value < Decimal::ZERO => totals.out -= value,
                Some(value) if entry.is_debit() => totals.out += value,
                Some(value) => totals.inflow += value,
                None => totals.unparsed += 1,
            }
        }
        totals
    }
}
