// statement.rs

use std::fmt;

use tokio_postgres::types::ToSql;

/// A bound statement argument
pub type Arg = Box<dyn ToSql + Sync + Send>;

/// How bind markers are written into statement text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `$1, $2, ...` (PostgreSQL wire protocol)
    Dollar,
    /// `?, ?, ...`
    Question,
}

impl Placeholder {
    fn marker(self, ordinal: usize) -> String {
        match self {
            Placeholder::Dollar => format!("${}", ordinal),
            Placeholder::Question => "?".to_string(),
        }
    }
}

/// Statement text plus its arguments, in bind order.
///
/// Values never appear in `sql`; they travel only in `args`.
pub struct Statement {
    pub sql: String,
    pub args: Vec<Arg>,
}

impl Statement {
    /// Arguments in the shape `tokio_postgres` expects
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args
            .iter()
            .map(|arg| arg.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("args", &self.args.len())
            .finish()
    }
}

/// Stateless statement factory. Table and column names are `'static` so
/// only identifiers written in source can reach the statement text.
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder {
    placeholder: Placeholder,
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self::new(Placeholder::Dollar)
    }
}

impl StatementBuilder {
    pub fn new(placeholder: Placeholder) -> Self {
        Self { placeholder }
    }

    /// `INSERT INTO <table> DEFAULT VALUES RETURNING <key>`
    pub fn insert_defaults(&self, table: &'static str, returning: &'static str) -> Statement {
        Statement {
            sql: format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning),
            args: Vec::new(),
        }
    }

    /// `SELECT * FROM <table>`, narrowed with [`Select::where_eq`]
    pub fn select_all(&self, table: &'static str) -> Select {
        Select {
            placeholder: self.placeholder,
            table,
            predicates: Vec::new(),
        }
    }
}

pub struct Select {
    placeholder: Placeholder,
    table: &'static str,
    predicates: Vec<(&'static str, Arg)>,
}

impl Select {
    /// Adds `<column> = <marker>`; predicates are joined with `AND`
    pub fn where_eq<T>(mut self, column: &'static str, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.predicates.push((column, Box::new(value)));
        self
    }

    pub fn build(self) -> Statement {
        let mut sql = format!("SELECT * FROM {}", self.table);
        let mut args = Vec::with_capacity(self.predicates.len());

        for (i, (column, value)) in self.predicates.into_iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(column);
            sql.push_str(" = ");
            sql.push_str(&self.placeholder.marker(i + 1));
            args.push(value);
        }

        Statement { sql, args }
    }
}
