use crate::columns::ColumnData;
use crate::condition::{ConditionBuilder, Predicate};
use crate::entity::Entity;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// MySQL-style `?` placeholders.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    /// The INSERT expression standing in for the identity column, whose
    /// value is always database-generated.
    fn identity_value(self, sequence: Option<&str>) -> String {
        match (self, sequence) {
            (Dialect::Postgres, Some(seq)) => format!("nextval('{seq}')"),
            (Dialect::Postgres, None) => "DEFAULT".to_string(),
            _ => "NULL".to_string(),
        }
    }

    /// Whether generated keys are read back through a `RETURNING` clause
    /// instead of the driver's last-insert-id.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Sniff the dialect from a connection URL scheme.
    pub fn for_url(url: &str) -> Dialect {
        let scheme = url.split(':').next().unwrap_or("");
        match scheme {
            "postgres" | "postgresql" => Dialect::Postgres,
            "mysql" | "mariadb" => Dialect::MySql,
            "sqlite" => Dialect::Sqlite,
            _ => Dialect::Generic,
        }
    }
}

/// SQL text plus its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Query {
    /// Number of placeholders in the SQL text. The builder maintains
    /// `placeholder_count() == args.len()` for every statement it renders.
    pub fn placeholder_count(&self) -> usize {
        let question_marks = self.sql.matches('?').count();
        let numbered = self
            .sql
            .char_indices()
            .filter(|&(i, c)| {
                c == '$'
                    && self.sql[i + 1..]
                        .chars()
                        .next()
                        .is_some_and(|n| n.is_ascii_digit())
            })
            .count();
        question_marks + numbered
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// No mapped fields; no statement can be built for the entity.
    EmptyColumns { table: String },
    DuplicateColumn { table: String, column: String },
    InvalidIdentifier { kind: &'static str, ident: String },
    /// A DELETE built from an empty condition would affect every row and is
    /// rejected outright.
    EmptyCondition { table: String },
}

impl std::fmt::Display for StatementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementError::EmptyColumns { table } => {
                write!(f, "cannot build a statement for {table}: no mapped fields")
            }
            StatementError::DuplicateColumn { table, column } => {
                write!(f, "duplicate column {column} mapped for {table}")
            }
            StatementError::InvalidIdentifier { kind, ident } => {
                write!(f, "invalid {kind} identifier: {ident}")
            }
            StatementError::EmptyCondition { table } => {
                write!(f, "refusing to delete from {table} without a condition")
            }
        }
    }
}

impl std::error::Error for StatementError {}

/// Statement renderer for one entity type: schema-qualified table, column
/// set and dialect are validated once, then INSERT/UPDATE/DELETE/SELECT text
/// is assembled purely from column data and conditions.
#[derive(Debug, Clone)]
pub struct Statements {
    table: String,
    id_column: &'static str,
    sequence: Option<&'static str>,
    dialect: Dialect,
}

impl Statements {
    /// Validate the entity's declared table, schema and columns and build a
    /// renderer. Fails on an empty or duplicated column set and on any
    /// identifier that does not look like plain SQL (the injection guard for
    /// everything that cannot be bound).
    pub fn for_entity<E: Entity>(dialect: Dialect) -> Result<Self, StatementError> {
        let columns: Vec<&'static str> = E::fields().iter().map(|f| f.column).collect();
        if columns.is_empty() {
            return Err(StatementError::EmptyColumns {
                table: E::table_name().to_string(),
            });
        }
        for (i, column) in columns.iter().enumerate() {
            check_identifier(column, "column")?;
            if columns[..i].contains(column) {
                return Err(StatementError::DuplicateColumn {
                    table: E::table_name().to_string(),
                    column: column.to_string(),
                });
            }
        }
        check_identifier(E::table_name(), "table")?;
        check_identifier(E::id_column(), "column")?;
        if let Some(schema) = E::schema() {
            check_identifier(schema, "schema")?;
        }

        let table = match E::schema() {
            Some(schema) => format!("{schema}.{}", E::table_name()),
            None => E::table_name().to_string(),
        };
        Ok(Self {
            table,
            id_column: E::id_column(),
            sequence: E::id_sequence(),
            dialect,
        })
    }

    /// The schema-qualified table this renderer targets.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// `INSERT INTO table(id, a, b) VALUES (<generated>, ?, ?)`.
    ///
    /// Columns render in mapper order. The identity column becomes the
    /// dialect's generated-value expression and is excluded from the bind
    /// list; on Postgres a `RETURNING <id>` clause is appended so the new
    /// key can be read back.
    pub fn insert(&self, data: &ColumnData) -> Result<Query, StatementError> {
        if data.is_empty() {
            return Err(StatementError::EmptyColumns {
                table: self.table.clone(),
            });
        }

        let mut names = Vec::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len());
        let mut args = Vec::new();
        let mut idx = 1usize;
        for (column, value) in data {
            names.push(*column);
            if *column == self.id_column {
                values.push(self.dialect.identity_value(self.sequence));
            } else {
                values.push(self.dialect.placeholder(idx));
                idx += 1;
                args.push(value.clone());
            }
        }

        let mut sql = format!(
            "INSERT INTO {}({}) VALUES ({})",
            self.table,
            names.join(", "),
            values.join(", ")
        );
        if self.dialect.supports_returning() {
            sql.push_str(&format!(" RETURNING {}", self.id_column));
        }
        Ok(Query { sql, args })
    }

    /// `UPDATE table SET a = ?, b = ? [WHERE ...]`.
    ///
    /// SET enumerates the non-identity columns in mapper order; the
    /// condition's arguments are appended after the SET values so positional
    /// binding lines up. An empty condition is permitted and updates every
    /// row; guarding against that is the caller's responsibility.
    pub fn update(
        &self,
        data: &ColumnData,
        condition: &ConditionBuilder,
    ) -> Result<Query, StatementError> {
        let mut assignments = Vec::new();
        let mut args = Vec::new();
        let mut idx = 1usize;
        for (column, value) in data {
            if *column == self.id_column {
                continue;
            }
            assignments.push(format!("{column} = {}", self.dialect.placeholder(idx)));
            idx += 1;
            args.push(value.clone());
        }
        if assignments.is_empty() {
            return Err(StatementError::EmptyColumns {
                table: self.table.clone(),
            });
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        self.append_where(&mut sql, &mut args, &mut idx, condition)?;
        Ok(Query { sql, args })
    }

    /// `DELETE FROM table WHERE ...`. An empty condition is rejected.
    pub fn delete(&self, condition: &ConditionBuilder) -> Result<Query, StatementError> {
        if condition.is_empty() {
            return Err(StatementError::EmptyCondition {
                table: self.table.clone(),
            });
        }
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut args = Vec::new();
        let mut idx = 1usize;
        self.append_where(&mut sql, &mut args, &mut idx, condition)?;
        Ok(Query { sql, args })
    }

    /// `SELECT * FROM table [WHERE ...] [ORDER BY ...] [LIMIT n]`.
    ///
    /// An empty condition omits the WHERE clause entirely; an absent limit
    /// omits the LIMIT clause.
    pub fn select(&self, condition: &ConditionBuilder) -> Result<Query, StatementError> {
        let mut sql = format!("SELECT * FROM {}", self.table);
        let mut args = Vec::new();
        let mut idx = 1usize;
        self.append_where(&mut sql, &mut args, &mut idx, condition)?;
        self.append_order(&mut sql, condition)?;
        if let Some(limit) = condition.row_limit() {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        Ok(Query { sql, args })
    }

    fn append_where(
        &self,
        sql: &mut String,
        args: &mut Vec<Value>,
        idx: &mut usize,
        condition: &ConditionBuilder,
    ) -> Result<(), StatementError> {
        if condition.is_empty() {
            return Ok(());
        }
        sql.push_str(" WHERE ");
        let mut first = true;
        for predicate in condition.predicates() {
            if !first {
                sql.push_str(" AND ");
            }
            first = false;
            match predicate {
                Predicate::Eq(col, val) => {
                    self.binary(sql, args, idx, col, "=", val)?;
                }
                Predicate::NotEq(col, val) => {
                    self.binary(sql, args, idx, col, "!=", val)?;
                }
                Predicate::Gt(col, val) => {
                    self.binary(sql, args, idx, col, ">", val)?;
                }
                Predicate::Lt(col, val) => {
                    self.binary(sql, args, idx, col, "<", val)?;
                }
                Predicate::Like(col, pat) => {
                    self.binary(sql, args, idx, col, "LIKE", pat)?;
                }
                Predicate::In(col, vals) => {
                    check_identifier(col, "column")?;
                    let placeholders: Vec<_> = vals
                        .iter()
                        .map(|_| {
                            let placeholder = self.dialect.placeholder(*idx);
                            *idx += 1;
                            placeholder
                        })
                        .collect();
                    sql.push_str(&format!("{col} IN ({})", placeholders.join(", ")));
                    args.extend(vals.iter().cloned());
                }
                Predicate::IsNull(col) => {
                    check_identifier(col, "column")?;
                    sql.push_str(&format!("{col} IS NULL"));
                }
                Predicate::IsNotNull(col) => {
                    check_identifier(col, "column")?;
                    sql.push_str(&format!("{col} IS NOT NULL"));
                }
            }
        }
        Ok(())
    }

    fn binary(
        &self,
        sql: &mut String,
        args: &mut Vec<Value>,
        idx: &mut usize,
        col: &str,
        op: &str,
        val: &Value,
    ) -> Result<(), StatementError> {
        check_identifier(col, "column")?;
        let placeholder = self.dialect.placeholder(*idx);
        *idx += 1;
        sql.push_str(&format!("{col} {op} {placeholder}"));
        args.push(val.clone());
        Ok(())
    }

    fn append_order(
        &self,
        sql: &mut String,
        condition: &ConditionBuilder,
    ) -> Result<(), StatementError> {
        if condition.order().is_empty() {
            return Ok(());
        }
        sql.push_str(" ORDER BY ");
        let mut clauses = Vec::with_capacity(condition.order().len());
        for (col, asc) in condition.order() {
            check_identifier(col, "column")?;
            if *asc {
                clauses.push(format!("{col} ASC"));
            } else {
                clauses.push(format!("{col} DESC"));
            }
        }
        sql.push_str(&clauses.join(", "));
        Ok(())
    }
}

fn check_identifier(ident: &str, kind: &'static str) -> Result<(), StatementError> {
    if is_valid_identifier(ident) {
        Ok(())
    } else {
        Err(StatementError::InvalidIdentifier {
            kind,
            ident: ident.to_string(),
        })
    }
}

fn is_valid_identifier(ident: &str) -> bool {
    if ident.is_empty() {
        return false;
    }
    ident.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
