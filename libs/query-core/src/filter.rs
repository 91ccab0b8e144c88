/// Case-insensitive substring constraint on a single text column.
///
/// Case folding is ASCII-only, the same folding SQLite's `LOWER()` applies
/// to the column side. Non-ASCII letters compare exactly. The needle is
/// stored folded. An empty needle is not a filter at all, so construction
/// returns `None` for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            needle: raw.to_ascii_lowercase(),
        })
    }

    /// Convenience for optional query-string parameters.
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::new)
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Reference semantics of the filter. A NULL column never matches,
    /// same as `NULL LIKE '%x%'` in SQL.
    pub fn matches(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| v.to_ascii_lowercase().contains(&self.needle))
    }

    /// `%needle%` with `%`, `_` and `escape` itself escaped, for use with
    /// `LIKE ... ESCAPE '<escape>'`.
    pub fn like_pattern(&self, escape: char) -> String {
        let mut out = String::with_capacity(self.needle.len() + 2);
        out.push('%');
        for ch in self.needle.chars() {
            if ch == '%' || ch == '_' || ch == escape {
                out.push(escape);
            }
            out.push(ch);
        }
        out.push('%');
        out
    }
}
