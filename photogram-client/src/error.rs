use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `photogram-client`.
pub enum PhotogramClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Сервер отклонил учётные данные.
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found: {0}")]
    NotFound(String),

    /// Некорректный запрос или ошибка валидации на сервере.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Сервер ответил 5xx.
    #[error("server error: {0}")]
    Server(String),
}

/// Результат операций `photogram-client`.
pub type PhotogramClientResult<T> = Result<T, PhotogramClientError>;

impl PhotogramClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            status if status.is_server_error() => Self::Server(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
