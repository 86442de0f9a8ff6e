//! Ошибки авторизации, загрузки и разбора выписок.

use crate::period::Period;

/// Ошибка загрузки, разбора или экспорта выписки.
#[derive(thiserror::Error, Debug)]
pub enum StatementError {
    /// Ошибка ввода-вывода при чтении или записи файла.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Ошибка HTTP-транспорта.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Ошибка записи CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Портал не подтвердил вход.
    #[error("Login Failure")]
    LoginFailure {
        /// Текст ответа портала после очистки от разметки.
        response: String,
    },
    /// На странице нет таблицы выписки.
    #[error("No statement table found")]
    NoStatementTable,
    /// На странице больше одной таблицы выписки.
    #[error("Too many statement tables found ({count})")]
    AmbiguousStatementTable {
        /// Количество найденных таблиц.
        count: usize,
    },
    /// В заголовке таблицы нет обязательного столбца.
    #[error("Required column '{column}' missing from statement headers")]
    MissingColumn {
        /// Имя столбца.
        column: &'static str,
    },
    /// Строка таблицы содержит меньше ячеек, чем требует раскладка столбцов.
    #[error("Row {row} has {columns} columns, at least {required} required")]
    MalformedRow {
        /// Номер строки в таблице, начиная с нуля.
        row: usize,
        /// Фактическое количество ячеек.
        columns: usize,
        /// Минимально необходимое количество ячеек.
        required: usize,
    },
    /// Конец диапазона периодов раньше начала.
    #[error("End period {end} is before start period {start}")]
    InvalidRange {
        /// Начальный период.
        start: Period,
        /// Конечный период.
        end: Period,
    },
}
