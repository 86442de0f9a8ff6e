//! Исходные HTML-страницы выписок и каталог сохранённых страниц.

use crate::error::StatementError;
use crate::period::Period;
use crate::portal::StatementSource;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// HTML страницы выписки без разбора DOM.
#[derive(Debug, Clone)]
pub struct RawStatement {
    /// Полный HTML страницы.
    pub html: String,
}

impl RawStatement {
    /// Читает HTML из файла, ответа портала или любого другого `Read`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, StatementError> {
        let mut html = String::new();
        reader.read_to_string(&mut html)?;
        Ok(Self { html })
    }

    /// Создаёт выписку из готовой HTML-строки.
    #[inline]
    pub fn from_html(s: &str) -> Self {
        Self {
            html: s.to_string(),
        }
    }
}

/// Каталог ранее сохранённых страниц вида `<dir>/YYYYMM.html`.
///
/// Позволяет разбирать выписки без входа на портал.
#[derive(Debug, Clone)]
pub struct SavedPages {
    dir: PathBuf,
}

impl SavedPages {
    /// Источник страниц из каталога.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Путь к странице периода.
    pub fn page_path(&self, period: Period) -> PathBuf {
        self.dir.join(format!("{}.html", period.format()))
    }

    /// Каталог со страницами.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StatementSource for SavedPages {
    fn fetch(&mut self, period: Period) -> Result<RawStatement, StatementError> {
        let path = self.page_path(period);
        tracing::info!(period = %period.label(), path = %path.display(), "reading saved statement page");
        RawStatement::from_reader(File::open(path)?)
    }
}
