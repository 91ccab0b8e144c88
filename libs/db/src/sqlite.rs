//! SQLite DSN handling: PRAGMA parameters, file paths and in-memory pools.

use std::path::PathBuf;

use sqlx::SqlitePool;

use crate::{ConnectOpts, Result};

/// PRAGMA parameters accepted in the DSN query string. Anything else is left
/// for sqlx to interpret.
const PRAGMA_PARAMS: &[&str] = &["wal", "synchronous", "busy_timeout", "journal_mode"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JournalMode {
    Delete,
    Wal,
    Memory,
    Truncate,
    Persist,
    Off,
}

impl JournalMode {
    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DELETE" => Some(Self::Delete),
            "WAL" => Some(Self::Wal),
            "MEMORY" => Some(Self::Memory),
            "TRUNCATE" => Some(Self::Truncate),
            "PERSIST" => Some(Self::Persist),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Wal => "WAL",
            Self::Memory => "MEMORY",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Off => "OFF",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SyncMode {
    Off,
    Normal,
    Full,
    Extra,
}

impl SyncMode {
    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OFF" => Some(Self::Off),
            "NORMAL" => Some(Self::Normal),
            "FULL" => Some(Self::Full),
            "EXTRA" => Some(Self::Extra),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Normal => "NORMAL",
            Self::Full => "FULL",
            Self::Extra => "EXTRA",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pragmas {
    pub journal_mode: Option<JournalMode>,
    pub synchronous: Option<SyncMode>,
    pub busy_timeout_ms: Option<u64>,
}

impl Pragmas {
    /// Parse whitelisted PRAGMA values from the DSN. Invalid values are
    /// logged and ignored.
    pub(crate) fn from_dsn(dsn: &str) -> Self {
        let mut pragmas = Pragmas::default();
        let Ok(url) = url::Url::parse(dsn) else {
            return pragmas;
        };
        // `wal=true|false` is shorthand for journal_mode; an explicit
        // journal_mode wins.
        let mut wal = None;
        for (key, value) in url.query_pairs() {
            match key.to_lowercase().as_str() {
                "journal_mode" => match JournalMode::parse(&value) {
                    Some(mode) => pragmas.journal_mode = Some(mode),
                    None => tracing::warn!("Invalid 'journal_mode' PRAGMA value '{value}', ignoring"),
                },
                "wal" => match value.to_lowercase().as_str() {
                    "true" | "1" => wal = Some(JournalMode::Wal),
                    "false" | "0" => wal = Some(JournalMode::Delete),
                    _ => tracing::warn!("Invalid 'wal' PRAGMA value '{value}', ignoring"),
                },
                "synchronous" => match SyncMode::parse(&value) {
                    Some(mode) => pragmas.synchronous = Some(mode),
                    None => tracing::warn!("Invalid 'synchronous' PRAGMA value '{value}', ignoring"),
                },
                "busy_timeout" => match value.parse::<u64>() {
                    Ok(ms) => pragmas.busy_timeout_ms = Some(ms),
                    Err(_) => tracing::warn!("Invalid 'busy_timeout' PRAGMA value '{value}', ignoring"),
                },
                _ => {}
            }
        }
        pragmas.journal_mode = pragmas.journal_mode.or(wal);
        pragmas
    }
}

/// `sqlite::memory:` and `mode=memory` DSNs live inside a single connection.
pub(crate) fn is_memory(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Drop PRAGMA parameters sqlx does not understand, keep the rest.
pub(crate) fn strip_pragmas(dsn: &str) -> String {
    let Ok(mut url) = url::Url::parse(dsn) else {
        return dsn.to_string();
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !PRAGMA_PARAMS.contains(&k.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    if !kept.is_empty() {
        let query = kept
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
    }
    url.to_string()
}

/// File path behind a `sqlite:` DSN, if it names one.
pub(crate) fn file_path(dsn: &str) -> Option<PathBuf> {
    if is_memory(dsn) {
        return None;
    }
    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with("file:") {
        return None;
    }
    Some(PathBuf::from(path))
}

pub(crate) async fn connect_pool(dsn: &str, opts: &ConnectOpts) -> Result<(SqlitePool, String)> {
    if opts.create_sqlite_dirs {
        if let Some(parent) = file_path(dsn).as_deref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let pragmas = Pragmas::from_dsn(dsn);
    let clean_dsn = strip_pragmas(dsn);
    let memory = is_memory(&clean_dsn);

    let mut o = opts.pool_options::<sqlx::Sqlite>();
    if memory {
        // Every connection to `:memory:` opens a fresh database; pin the pool
        // to one long-lived connection so all callers see the same data.
        o = o
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let busy_timeout_ms = pragmas
        .busy_timeout_ms
        .unwrap_or(opts.busy_timeout.as_millis() as u64);
    o = o.after_connect(move |conn, _meta| {
        let pragmas = pragmas.clone();
        Box::pin(async move {
            let journal = match pragmas.journal_mode {
                Some(mode) => Some(mode),
                None if memory => None,
                None => Some(JournalMode::Wal),
            };
            if let Some(mode) = journal {
                let stmt = format!("PRAGMA journal_mode = {}", mode.as_sql());
                sqlx::query(&stmt).execute(&mut *conn).await?;
            }

            let sync = pragmas.synchronous.unwrap_or(SyncMode::Normal);
            let stmt = format!("PRAGMA synchronous = {}", sync.as_sql());
            sqlx::query(&stmt).execute(&mut *conn).await?;

            let stmt = format!("PRAGMA busy_timeout = {busy_timeout_ms}");
            sqlx::query(&stmt).execute(&mut *conn).await?;
            Ok(())
        })
    });

    let pool = o.connect(&clean_dsn).await?;
    Ok((pool, clean_dsn))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pragma_values_are_validated() {
        let p = Pragmas::from_dsn("sqlite://rent.db?journal_mode=wal&synchronous=full&busy_timeout=250");
        assert_eq!(p.journal_mode, Some(JournalMode::Wal));
        assert_eq!(p.synchronous, Some(SyncMode::Full));
        assert_eq!(p.busy_timeout_ms, Some(250));

        let p = Pragmas::from_dsn("sqlite://rent.db?journal_mode=bogus&synchronous=yes&busy_timeout=-1");
        assert_eq!(p, Pragmas::default());
    }

    #[test]
    fn wal_shorthand_and_explicit_journal_mode() {
        assert_eq!(
            Pragmas::from_dsn("sqlite://rent.db?wal=false").journal_mode,
            Some(JournalMode::Delete)
        );
        assert_eq!(
            Pragmas::from_dsn("sqlite://rent.db?WAL=1").journal_mode,
            Some(JournalMode::Wal)
        );
        assert_eq!(
            Pragmas::from_dsn("sqlite://rent.db?journal_mode=truncate&wal=true").journal_mode,
            Some(JournalMode::Truncate)
        );
    }

    #[test]
    fn pragmas_are_stripped_but_sqlx_params_kept() {
        let clean = strip_pragmas("sqlite://rent.db?wal=true&mode=rwc&Busy_Timeout=10");
        assert_eq!(clean, "sqlite://rent.db?mode=rwc");
        assert_eq!(strip_pragmas("sqlite://rent.db?wal=true"), "sqlite://rent.db");
        assert_eq!(strip_pragmas("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn file_path_extraction() {
        assert_eq!(
            file_path("sqlite:///var/lib/rentdesk/rent.db?mode=rwc"),
            Some(PathBuf::from("/var/lib/rentdesk/rent.db"))
        );
        assert_eq!(
            file_path("sqlite:data/rent.db"),
            Some(PathBuf::from("data/rent.db"))
        );
        assert_eq!(file_path("sqlite::memory:"), None);
        assert_eq!(file_path("sqlite:file:memdb?mode=memory&cache=shared"), None);
    }
}
