use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::grammar::{AnsiGrammar, Grammar, SqlServerGrammar, SqliteGrammar, SybaseGrammar};
use crate::processor::{
    DefaultProcessor, Processor, SqlServerProcessor, SqliteProcessor, SybaseProcessor,
};

/// Dialect family a driver identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    Sybase,
    SqlServer,
    Sqlite,
    /// Unrecognized identity; ANSI grammar, pass-through processor.
    Generic,
}

/// What a driver identity resolves to, decided once per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverProfile {
    pub kind: DriverKind,
    /// `true` when the driver's own transaction API can be trusted;
    /// otherwise transactions are delimited with `BEGIN/COMMIT/ROLLBACK TRAN`.
    pub native_transactions: bool,
}

impl DriverProfile {
    const fn new(kind: DriverKind, native_transactions: bool) -> Self {
        Self {
            kind,
            native_transactions,
        }
    }
}

static DRIVERS: LazyLock<HashMap<&'static str, DriverProfile>> = LazyLock::new(|| {
    use DriverKind::{Sqlite, SqlServer, Sybase};
    HashMap::from([
        ("pdo_bdlib", DriverProfile::new(Sybase, true)),
        ("bdlib", DriverProfile::new(Sybase, true)),
        ("dblib", DriverProfile::new(Sybase, false)),
        ("pdo_dblib", DriverProfile::new(Sybase, false)),
        ("sybase", DriverProfile::new(Sybase, false)),
        ("tds", DriverProfile::new(Sybase, false)),
        ("manual-only", DriverProfile::new(Sybase, false)),
        ("sqlsrv", DriverProfile::new(SqlServer, false)),
        ("mssql", DriverProfile::new(SqlServer, false)),
        ("sqlite", DriverProfile::new(Sqlite, true)),
    ])
});

/// Resolve a driver identity. Matching ignores case and surrounding
/// whitespace; unknown identities resolve to [`DriverKind::Generic`] with
/// manual transactions.
#[must_use]
pub fn resolve(identity: &str) -> DriverProfile {
    let key = identity.trim().to_ascii_lowercase();
    DRIVERS
        .get(key.as_str())
        .copied()
        .unwrap_or(DriverProfile::new(DriverKind::Generic, false))
}

/// Grammar for a dialect family with the table prefix attached.
#[must_use]
pub fn grammar_for(kind: DriverKind, table_prefix: &str) -> Arc<dyn Grammar> {
    fn with_prefix<G: Grammar + Default + 'static>(prefix: &str) -> Arc<dyn Grammar> {
        let mut grammar = G::default();
        grammar.set_table_prefix(prefix);
        Arc::new(grammar)
    }

    match kind {
        DriverKind::Sybase => with_prefix::<SybaseGrammar>(table_prefix),
        DriverKind::SqlServer => with_prefix::<SqlServerGrammar>(table_prefix),
        DriverKind::Sqlite => with_prefix::<SqliteGrammar>(table_prefix),
        DriverKind::Generic => with_prefix::<AnsiGrammar>(table_prefix),
    }
}

/// Processor for a dialect family. `trim_char_padding` only affects Sybase.
#[must_use]
pub fn processor_for(kind: DriverKind, trim_char_padding: bool) -> Arc<dyn Processor> {
    match kind {
        DriverKind::Sybase => Arc::new(SybaseProcessor::new(trim_char_padding)),
        DriverKind::SqlServer => Arc::new(SqlServerProcessor),
        DriverKind::Sqlite => Arc::new(SqliteProcessor),
        DriverKind::Generic => Arc::new(DefaultProcessor),
    }
}
