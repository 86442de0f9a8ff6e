//! Доменные типы: раскладка столбцов таблицы выписки и операции.

use crate::error::StatementError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Служебные заголовки, добавляемые к заголовкам таблицы.
pub const SYNTHETIC_HEADERS: [&str; 3] = ["payee", "out", "in"];

/// Индексы используемых столбцов таблицы выписки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Дата операции.
    pub date: usize,
    /// Описание операции.
    pub description: usize,
    /// Номер карты.
    pub card: usize,
    /// Признак «Debet»/«Credit».
    pub indicator: usize,
    /// Сумма в иностранной валюте.
    pub currency: usize,
    /// Сумма операции.
    pub amount: usize,
}

/// Ключевые слова заголовков для каждого столбца, в порядке разрешения.
const HEADER_KEYWORDS: [(&str, &[&str]); 6] = [
    ("date", &["datum", "date"]),
    ("description", &["omschrijving", "description"]),
    ("card", &["kaart", "card"]),
    ("indicator", &["debet", "debit", "credit"]),
    ("currency", &["valuta", "currency"]),
    ("amount", &["bedrag", "amount"]),
];

impl ColumnLayout {
    /// Фиксированные индексы исходной раскладки ICS.
    pub const POSITIONAL: Self = Self {
        date: 0,
        description: 2,
        card: 3,
        indicator: 4,
        currency: 5,
        amount: 6,
    };

    /// Сопоставляет столбцы по подписям заголовков.
    ///
    /// Столбцы разрешаются по очереди; уже занятый заголовок не может
    /// достаться следующему столбцу, поэтому «Bedrag in vreemde valuta»
    /// уходит в `currency`, а «Bedrag» в `amount`.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, StatementError> {
        let lowered: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref().to_lowercase())
            .collect();
        let mut claimed: Vec<usize> = Vec::with_capacity(HEADER_KEYWORDS.len());

        for (column, keywords) in HEADER_KEYWORDS {
            let index = lowered
                .iter()
                .enumerate()
                .filter(|(idx, _)| !claimed.contains(idx))
                .find(|(_, label)| keywords.iter().any(|k| label.contains(k)))
                .map(|(idx, _)| idx)
                .ok_or(StatementError::MissingColumn { column })?;
            claimed.push(index);
        }

        Ok(Self {
            date: claimed[0],
            description: claimed[1],
            card: claimed[2],
            indicator: claimed[3],
            currency: claimed[4],
            amount: claimed[5],
        })
    }

    /// Минимальное число ячеек в строке для этой раскладки.
    pub fn required_columns(&self) -> usize {
        [
            self.date,
            self.description,
            self.card,
            self.indicator,
            self.currency,
            self.amount,
        ]
        .into_iter()
        .max()
        .map_or(0, |max| max + 1)
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::POSITIONAL
    }
}

/// Одна операция выписки после нормализации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Ячейки строки таблицы после ремонта суммы и разделителей.
    pub columns: Vec<String>,
    /// Раскладка, по которой читаются именованные поля.
    pub layout: ColumnLayout,
    /// Получатель платежа.
    pub payee: String,
    /// Сумма списания, пустая для зачислений.
    pub out: String,
    /// Сумма зачисления, пустая для списаний.
    pub inflow: String,
}

impl Entry {
    /// Дата операции в исходном формате портала.
    #[inline]
    pub fn date(&self) -> &str {
        &self.columns[self.layout.date]
    }

    /// Описание операции.
    #[inline]
    pub fn description(&self) -> &str {
        &self.columns[self.layout.description]
    }

    /// Номер карты.
    #[inline]
    pub fn card(&self) -> &str {
        &self.columns[self.layout.card]
    }

    /// Столбец иностранной валюты.
    #[inline]
    pub fn currency(&self) -> &str {
        &self.columns[self.layout.currency]
    }

    /// Сумма со знаком: списания хранятся с минусом.
    #[inline]
    pub fn amount(&self) -> &str {
        &self.columns[self.layout.amount]
    }

    /// Истина, если операция является списанием.
    #[inline]
    pub fn is_debit(&self) -> bool {
        !self.out.is_empty()
    }

    /// Сумма со знаком как `Decimal`, если она разбирается.
    pub fn amount_value(&self) -> Option<Money> {
        Decimal::from_str(self.amount()).ok()
    }

    /// Запись для CSV: ячейки таблицы и три служебных поля.
    pub fn record(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain([self.payee.as_str(), self.out.as_str(), self.inflow.as_str()])
    }
}

/// Итоги по списаниям и зачислениям.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Сумма списаний (положительная).
    pub out: Money,
    /// Сумма зачислений.
    pub inflow: Money,
    /// Число операций, сумму которых не удалось разобрать.
    pub unparsed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICS_HEADERS: [&str; 7] = [
        "Datum transactie",
        "Datum verwerking",
        "Omschrijving",
        "Kaartnummer",
        "Debet/Credit",
        "Bedrag in vreemde valuta",
        "Bedrag",
    ];

    #[test]
    fn resolves_dutch_headers() {
        let layout = ColumnLayout::from_headers(&ICS_HEADERS).unwrap();
        assert_eq!(layout, ColumnLayout::POSITIONAL);
        assert_eq!(layout.required_columns(), 7);
    }

    #[test]
    fn resolves_reordered_english_headers() {
        let headers = ["Amount", "Description", "Date", "Card", "Debit/Credit", "Currency"];
        let layout = ColumnLayout::from_headers(&headers).unwrap();
        assert_eq!(layout.amount, 0);
        assert_eq!(layout.description, 1);
        assert_eq!(layout.date, 2);
        assert_eq!(layout.card, 3);
        assert_eq!(layout.indicator, 4);
        assert_eq!(layout.currency, 5);
    }

    #[test]
    fn missing_column_fails_fast() {
        let err = ColumnLayout::from_headers(&ICS_HEADERS[..6]).unwrap_err();
        assert!(matches!(err, StatementError::MissingColumn { column: "amount" }));
    }

    #[test]
    fn record_appends_synthetic_fields() {
        let entry = Entry {
            columns: ["01-02", "", "X", "1234", "Credit", "", "5.00"]
                .map(String::from)
                .to_vec(),
            layout: ColumnLayout::POSITIONAL,
            payee: "X".into(),
            out: String::new(),
            inflow: "5.00".into(),
        };
        let record: Vec<&str> = entry.record().collect();
        assert_eq!(record.len(), 10);
        assert_eq!(&record[7..], ["X", "", "5.00"]);
        assert_eq!(entry.amount_value(), Some(Decimal::new(500, 2)));
        assert!(!entry.is_debit());
    }
}
