use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

use crate::database::models::Periodo;

/// A single typed column value headed for an INSERT or UPDATE
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Date(NaiveDate),
    Key(i64),
    Periodo(Periodo),
}

impl Field {
    fn push_bind(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Field::Text(v) => qb.push_bind(v.clone()),
            Field::Date(v) => qb.push_bind(*v),
            Field::Key(v) => qb.push_bind(*v),
            Field::Periodo(v) => qb.push_bind(*v),
        };
    }
}

/// Validated column writes, in payload order. Column names come from
/// model definitions, never from request input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    fields: Vec<(&'static str, Field)>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: Field) {
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Field> {
        self.fields.iter().find(|(c, _)| *c == column).map(|(_, f)| f)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Appends `(col, ...) VALUES ($1, ...)`
    pub fn push_insert(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" (");
        for (i, (column, _)) in self.fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(*column);
        }
        qb.push(") VALUES (");
        for (i, (_, field)) in self.fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            field.push_bind(qb);
        }
        qb.push(")");
    }

    /// Appends `col = $1, ...`
    pub fn push_assignments(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, (column, field)) in self.fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(*column).push(" = ");
            field.push_bind(qb);
        }
    }
}
