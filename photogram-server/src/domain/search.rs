/// Нормализованный поисковый термин для списка публикаций.
///
/// Пустой или состоящий из пробелов ввод означает «без фильтра», поэтому
/// такой термин просто не создаётся.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchTerm(String);

impl SearchTerm {
    pub(crate) fn parse(raw: Option<&str>) -> Option<Self> {
        let term = raw?.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        Some(Self(term))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Совпадение по имени автора ИЛИ по подписи, без учёта регистра.
    /// Повторяет SQL-предикат `PostgresPostRepository::list_posts`.
    #[cfg(test)]
    pub(crate) fn matches(&self, author_name: &str, caption: Option<&str>) -> bool {
        author_name.to_lowercase().contains(&self.0)
            || caption.is_some_and(|caption| caption.to_lowercase().contains(&self.0))
    }
}
