//! Вспомогательные функции: извлечение текста ячеек и ремонт полей выписки.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Последний фрагмент `<цифры>,<цифры>` в строке суммы.
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.*\D)?(\d+),(\d+).*$").expect("valid amount regex")
});

/// Всё до трёхбуквенного кода страны, за которым следует «Land:».
static PAYEE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)\s\w{3}\s+Land:").expect("valid payee regex"));

/// Текст ячейки: переводы строк заменяются пробелами, края обрезаются.
pub fn collect_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\n', " ")
        .trim()
        .to_string()
}

/// Меняет десятичную запятую на точку.
pub fn fix_decimal_separator(value: &str) -> String {
    value.replace(',', ".")
}

/// Оставляет от суммы только последний фрагмент `<цифры>,<цифры>` в виде
/// `<цифры>.<цифры>`, отбрасывая символ валюты и прочий текст.
///
/// Разделители тысяч теряются: `"€ 1.234,56"` превращается в `"234.56"`.
/// Если шаблон не совпал, возвращает `None`.
pub fn repair_amount(value: &str) -> Option<String> {
    AMOUNT_RE
        .captures(value)
        .map(|caps| format!("{}.{}", &caps[1], &caps[2]))
}

/// Извлекает получателя платежа из описания операции.
///
/// Если в описании нет метки страны, получателем считается всё описание.
pub fn extract_payee(description: &str) -> String {
    PAYEE_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| description.to_string(), |m| m.as_str().to_string())
}

/// Признак списания: значение начинается с «Debet».
#[inline]
pub fn is_debit(indicator: &str) -> bool {
    indicator.starts_with("Debet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn amount_drops_currency_symbol() {
        assert_eq!(repair_amount("€ 12,50").as_deref(), Some("12.50"));
        assert_eq!(repair_amount("EUR 7,05 ").as_deref(), Some("7.05"));
        assert_eq!(repair_amount("3,99").as_deref(), Some("3.99"));
    }

    #[test]
    fn amount_loses_thousands_group() {
        assert_eq!(repair_amount("€ 1.234,56").as_deref(), Some("234.56"));
    }

    #[test]
    fn amount_ignores_trailing_text() {
        assert_eq!(repair_amount("€ 12,50 (2)").as_deref(), Some("12.50"));
        assert_eq!(repair_amount("€ 1.234,56 3x").as_deref(), Some("234.56"));
        assert_eq!(repair_amount("€ 3,10 / 4,20 EUR").as_deref(), Some("4.20"));
    }

    #[test]
    fn amount_without_comma_is_not_repaired() {
        assert_eq!(repair_amount("€ 12.50"), None);
        assert_eq!(repair_amount(""), None);
    }

    #[test]
    fn decimal_separator() {
        assert_eq!(fix_decimal_separator("12,34 USD"), "12.34 USD");
        assert_eq!(fix_decimal_separator("EUR"), "EUR");
    }

    #[test]
    fn payee_before_country_label() {
        assert_eq!(
            extract_payee("ALBERT HEIJN 1234 AMSTERDAM NLD Land: NLD"),
            "ALBERT HEIJN 1234 AMSTERDAM"
        );
        // Трёхбуквенный токен перед «Land:» считается кодом страны.
        assert_eq!(extract_payee("ALBERT HEIJN 1234 AMS Land: NLD"), "ALBERT HEIJN 1234");
    }

    #[test]
    fn payee_falls_back_to_description() {
        assert_eq!(
            extract_payee("IDEAL BETALING, DANK U"),
            "IDEAL BETALING, DANK U"
        );
    }

    #[test]
    fn debit_indicator_is_prefix() {
        assert!(is_debit("Debet"));
        assert!(is_debit("Debet transactie"));
        assert!(!is_debit("Credit"));
        assert!(!is_debit(" Debet"));
    }

    #[test]
    fn cell_text_joins_lines() {
        let html = Html::parse_fragment("<table><tr><td>\n  NS GROEP\nUTRECHT  </td></tr></table>");
        let td = Selector::parse("td").unwrap();
        let cell = html.select(&td).next().unwrap();
        assert_eq!(collect_text(cell), "NS GROEP UTRECHT");
    }
}
