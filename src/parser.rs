//! Поиск таблицы выписки в DOM и нормализация её строк.

use std::sync::LazyLock;

use crate::error::StatementError;
use crate::raw::RawStatement;
use crate::types::{ColumnLayout, Entry};
use crate::utils::{collect_text, extract_payee, fix_decimal_separator, is_debit, repair_amount};
use scraper::{ElementRef, Html, Selector};

static STATEMENT_TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.expander-table").expect("valid statement table selector")
});
static TR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
static TD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid td selector"));
static TH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("valid th selector"));

/// Разобранный DOM страницы выписки.
#[derive(Debug, Clone)]
pub struct DomStatement {
    doc: Html,
}

impl DomStatement {
    /// Парсит DOM из исходного HTML.
    #[inline]
    pub fn parse(raw: &RawStatement) -> Self {
        Self {
            doc: Html::parse_document(&raw.html),
        }
    }

    /// Возвращает единственную таблицу выписки.
    pub fn statement_table(&self) -> Result<ElementRef<'_>, StatementError> {
        let mut tables = self.doc.select(&STATEMENT_TABLE_SELECTOR);
        let table = tables.next().ok_or(StatementError::NoStatementTable)?;
        let extra = tables.count();
        if extra > 0 {
            return Err(StatementError::AmbiguousStatementTable { count: extra + 1 });
        }
        Ok(table)
    }

    /// Подписи заголовков таблицы выписки.
    pub fn headers(&self) -> Result<Vec<String>, StatementError> {
        let table = self.statement_table()?;
        Ok(table.select(&TH_SELECTOR).map(collect_text).collect())
    }

    /// Разбирает строки таблицы в операции.
    ///
    /// Строки без ячеек `td` (строка заголовков) пропускаются.
    pub fn entries(&self, layout: ColumnLayout) -> Result<Vec<Entry>, StatementError> {
        let table = self.statement_table()?;
        let required = layout.required_columns();

        let mut entries = Vec::new();
        for (idx, tr) in table.select(&TR_SELECTOR).enumerate() {
            let cells: Vec<String> = tr.select(&TD_SELECTOR).map(collect_text).collect();
            if cells.is_empty() {
                continue;
            }
            if cells.len() < required {
                return Err(StatementError::MalformedRow {
                    row: idx,
                    columns: cells.len(),
                    required,
                });
            }
            let entry = normalize_entry(cells, layout);
            tracing::debug!(
                date = entry.date(),
                card = entry.card(),
                payee = %entry.payee,
                amount = entry.amount(),
                "parsed entry"
            );
            entries.push(entry);
        }

        Ok(entries)
    }
}

/// Превращает ячейки строки в операцию: чинит суммы, выделяет получателя
/// и раскладывает сумму по столбцам списания и зачисления.
///
/// `cells` должна содержать не меньше `layout.required_columns()` элементов.
pub(crate) fn normalize_entry(mut cells: Vec<String>, layout: ColumnLayout) -> Entry {
    cells[layout.currency] = fix_decimal_separator(&cells[layout.currency]);

    match repair_amount(&cells[layout.amount]) {
        Some(amount) => cells[layout.amount] = amount,
        None => tracing::warn!(
            amount = %cells[layout.amount],
            "amount did not match the expected format, left unchanged"
        ),
    }

    let payee = extract_payee(&cells[layout.description]);

    let (out, inflow) = if is_debit(&cells[layout.indicator]) {
        let amount = cells[layout.amount].clone();
        cells[layout.amount] = format!("-{amount}");
        (amount, String::new())
    } else {
        (String::new(), cells[layout.amount].clone())
    };

    Entry {
        columns: cells,
        layout,
        payee,
        out,
        inflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(indicator: &str, amount: &str) -> Vec<String> {
        [
            "12-03-2014",
            "13-03-2014",
            "ALBERT HEIJN 1234 AMSTERDAM NLD Land: NLD",
            "1234",
            indicator,
            "",
            amount,
        ]
        .map(String::from)
        .to_vec()
    }

    fn dom(body: &str) -> DomStatement {
        DomStatement::parse(&RawStatement::from_html(&format!(
            "<html><body>{body}</body></html>"
        )))
    }

    #[test]
    fn debit_row_is_negated() {
        let entry = normalize_entry(row("Debet", "€ 25,10"), ColumnLayout::POSITIONAL);
        assert_eq!(entry.out, "25.10");
        assert_eq!(entry.inflow, "");
        assert_eq!(entry.amount(), "-25.10");
        assert_eq!(entry.payee, "ALBERT HEIJN 1234 AMSTERDAM");
        assert_eq!(entry.card(), "1234");
        assert!(entry.is_debit());
    }

    #[test]
    fn credit_row_keeps_sign() {
        let entry = normalize_entry(row("Credit", "€ 100,00"), ColumnLayout::POSITIONAL);
        assert_eq!(entry.out, "");
        assert_eq!(entry.inflow, "100.00");
        assert_eq!(entry.amount(), "100.00");
    }

    #[test]
    fn foreign_amount_uses_dot() {
        let mut cells = row("Debet", "€ 9,99");
        cells[5] = "12,50 USD".into();
        let entry = normalize_entry(cells, ColumnLayout::POSITIONAL);
        assert_eq!(entry.currency(), "12.50 USD");
    }

    #[test]
    fn unmatched_amount_is_left_alone() {
        let entry = normalize_entry(row("Credit", "n.v.t."), ColumnLayout::POSITIONAL);
        assert_eq!(entry.amount(), "n.v.t.");
        assert_eq!(entry.inflow, "n.v.t.");
    }

    #[test]
    fn no_table() {
        let err = dom("<table class=\"other\"></table>").statement_table().unwrap_err();
        assert!(matches!(err, StatementError::NoStatementTable));
    }

    #[test]
    fn two_tables() {
        let err = dom(
            "<table class=\"expander-table\"></table><table class=\"expander-table\"></table>",
        )
        .statement_table()
        .unwrap_err();
        assert!(matches!(
            err,
            StatementError::AmbiguousStatementTable { count: 2 }
        ));
    }

    #[test]
    fn short_row_is_rejected() {
        let doc = dom(
            "<table class=\"expander-table\"><tr><th>Datum</th></tr><tr><td>a</td><td>b</td></tr></table>",
        );
        let err = doc.entries(ColumnLayout::POSITIONAL).unwrap_err();
        assert!(matches!(
            err,
            StatementError::MalformedRow {
                row: 1,
                columns: 2,
                required: 7
            }
        ));
    }
}
