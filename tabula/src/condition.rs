use crate::entity::ID_COLUMN;
use crate::value::Value;

/// A fluent accumulator of WHERE-clause predicates, an optional ordering and
/// an optional row limit.
///
/// Predicates compose with `AND` in call order; each contributes exactly as
/// many bind arguments as placeholders, so argument order always matches
/// placeholder order. A builder with zero predicates means "match all rows".
///
/// Builders are plain values: the manager clones one before forcing a limit
/// on it, so a caller's instance is never mutated behind its back.
///
/// # Example
///
/// ```ignore
/// let cond = ConditionBuilder::new()
///     .where_gt("balance", 100i64)
///     .order_by("id", true)
///     .limit(10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConditionBuilder {
    predicates: Vec<Predicate>,
    order: Vec<(String, bool)>,
    limit_val: Option<u64>,
}

#[derive(Debug, Clone)]
pub(crate) enum Predicate {
    Eq(String, Value),
    NotEq(String, Value),
    Gt(String, Value),
    Lt(String, Value),
    Like(String, Value),
    In(String, Vec<Value>),
    IsNull(String),
    IsNotNull(String),
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality on the conventional identity column.
    pub fn with_id(self, id: i64) -> Self {
        self.where_eq(ID_COLUMN, id)
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Eq(column.to_string(), value.into()));
        self
    }

    pub fn where_not_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::NotEq(column.to_string(), value.into()));
        self
    }

    pub fn where_gt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Gt(column.to_string(), value.into()));
        self
    }

    pub fn where_lt(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Lt(column.to_string(), value.into()));
        self
    }

    pub fn where_like(mut self, column: &str, pattern: &str) -> Self {
        self.predicates
            .push(Predicate::Like(column.to_string(), Value::from(pattern)));
        self
    }

    pub fn where_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.predicates.push(Predicate::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.predicates.push(Predicate::IsNull(column.to_string()));
        self
    }

    pub fn where_not_null(mut self, column: &str) -> Self {
        self.predicates
            .push(Predicate::IsNotNull(column.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    /// Cap the number of result rows. Rendered as a literal `LIMIT n`, not a
    /// bind argument.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    /// True when no predicates have been added. Statement builders render no
    /// WHERE clause at all for an empty condition.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit_val
    }

    /// The bind arguments in placeholder order. Idempotent.
    pub fn args(&self) -> Vec<Value> {
        let mut args = Vec::new();
        for p in &self.predicates {
            match p {
                Predicate::Eq(_, v)
                | Predicate::NotEq(_, v)
                | Predicate::Gt(_, v)
                | Predicate::Lt(_, v)
                | Predicate::Like(_, v) => args.push(v.clone()),
                Predicate::In(_, vs) => args.extend(vs.iter().cloned()),
                Predicate::IsNull(_) | Predicate::IsNotNull(_) => {}
            }
        }
        args
    }

    pub(crate) fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub(crate) fn order(&self) -> &[(String, bool)] {
        &self.order
    }
}
