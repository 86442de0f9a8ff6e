//! Авторизация на портале ICS и загрузка страниц выписок.

use crate::error::StatementError;
use crate::period::Period;
use crate::raw::RawStatement;
use reqwest::blocking::Client;
use scraper::Html;

/// Адрес формы входа по умолчанию.
pub const DEFAULT_LOGIN_URL: &str = "https://www.icscards.nl/pkmslogin.form";
/// Адрес страницы выписки по умолчанию; к нему дописывается ключ периода.
pub const DEFAULT_STATEMENT_URL: &str =
    "https://www.icscards.nl/abnamro/mijn/accountstatements?period=";

/// Ответ портала при успешном входе.
const LOGIN_SUCCESS: &str = "login_success";

/// Источник HTML-страниц выписок по периодам.
pub trait StatementSource {
    /// Загружает страницу выписки за период.
    fn fetch(&mut self, period: Period) -> Result<RawStatement, StatementError>;
}

/// Неизменяемые параметры подключения к порталу.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Адрес формы входа.
    pub login_url: String,
    /// Базовый адрес страницы выписки.
    pub statement_url: String,
    /// Имя пользователя.
    pub username: String,
    /// Пароль.
    pub password: String,
    /// Принимать недействительные TLS-сертификаты. Только по явному запросу.
    pub accept_invalid_certs: bool,
}

impl PortalConfig {
    /// Параметры для стандартных адресов портала.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.to_string(),
            statement_url: DEFAULT_STATEMENT_URL.to_string(),
            username: username.into(),
            password: password.into(),
            accept_invalid_certs: false,
        }
    }

    /// Полный адрес выписки за период.
    pub fn statement_url_for(&self, period: Period) -> String {
        format!("{}{}", self.statement_url, period.format())
    }
}

/// Сессия портала. Вход выполняется один раз, при первой загрузке.
#[derive(Debug)]
pub struct Portal {
    config: PortalConfig,
    client: Option<Client>,
}

impl Portal {
    /// Создаёт сессию без входа.
    #[inline]
    pub const fn new(config: PortalConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Возвращает авторизованный клиент, выполняя вход при необходимости.
    fn client(&mut self) -> Result<&Client, StatementError> {
        let client = match self.client.take() {
            Some(client) => client,
            None => self.login()?,
        };
        Ok(self.client.insert(client))
    }

    fn login(&self) -> Result<Client, StatementError> {
        tracing::info!(username = %self.config.username, "logging into site");
        if self.config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .build()?;

        let body = client
            .post(&self.config.login_url)
            .form(&[
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
                ("login-form-type", "pwd"),
            ])
            .send()?
            .text()?;

        let response = login_response_text(&body);
        if response != LOGIN_SUCCESS {
            return Err(StatementError::LoginFailure { response });
        }
        tracing::info!("login succeeded");
        Ok(client)
    }
}

impl StatementSource for Portal {
    fn fetch(&mut self, period: Period) -> Result<RawStatement, StatementError> {
        let url = self.config.statement_url_for(period);
        let client = self.client()?;
        tracing::info!(period = %period.label(), "downloading statement page");
        let html = client.get(url).send()?.error_for_status()?.text()?;
        Ok(RawStatement { html })
    }
}

/// Текст ответа на вход без разметки и пробелов по краям.
fn login_response_text(body: &str) -> String {
    Html::parse_document(body)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_url_appends_period() {
        let config = PortalConfig::new("user", "secret");
        assert_eq!(
            config.statement_url_for(Period::new(2014, 2)),
            "https://www.icscards.nl/abnamro/mijn/accountstatements?period=201402"
        );
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn login_response_is_plain_text() {
        assert_eq!(login_response_text("  login_success\n"), "login_success");
        assert_eq!(
            login_response_text("<html><body><p>login_success</p></body></html>"),
            "login_success"
        );
        assert_ne!(
            login_response_text("<html><body>Inloggen mislukt</body></html>"),
            "login_success"
        );
    }
}
