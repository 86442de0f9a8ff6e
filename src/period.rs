//! Период выписки: пара (год, месяц).

use chrono::{Datelike, Local};
use std::fmt;

/// Календарный месяц, за который запрашивается выписка.
///
/// Месяц ожидается в диапазоне `1..=12`; проверку выполняет вызывающий код.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    /// Год.
    pub year: i32,
    /// Месяц, `1..=12`.
    pub month: u32,
}

impl Period {
    /// Создаёт период.
    #[inline]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Текущий месяц по локальным часам.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self::new(today.year(), today.month())
    }

    /// Переходит к следующему месяцу, после декабря увеличивая год.
    pub const fn increment(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    /// Ключ периода для URL выписки: `YYYYMM`.
    pub fn format(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    /// Человекочитаемая метка `YYYY-MM`, используется в логах и именах файлов.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Итератор от текущего периода до `end` включительно.
    ///
    /// Если `end` раньше начала, итератор выдаёт только начальный период.
    #[inline]
    pub const fn through(self, end: Self) -> PeriodRange {
        PeriodRange {
            next: Some(self),
            end,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Последовательность месяцев, построенная через [`Period::increment`].
#[derive(Debug, Clone)]
pub struct PeriodRange {
    next: Option<Period>,
    end: Period,
}

impl Iterator for PeriodRange {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        let current = self.next?;
        if current >= self.end {
            self.next = None;
        } else {
            let mut following = current;
            following.increment();
            self.next = Some(following);
        }
        Some(current)
    }
}
