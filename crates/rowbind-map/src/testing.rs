//! Shared fixtures for the crate's unit tests: mock cursors/commands and a
//! small customer/order domain.

use asupersync::{Cx, Outcome};
use rowbind_core::cursor::{AsyncCommand, AsyncCursor, Command, Cursor, ParamSet};
use rowbind_core::error::Result;
use rowbind_core::field::FieldDefinition;
use rowbind_core::model::{Model, ModelDefinition, ReferenceDefinition};
use rowbind_core::types::SqlType;
use rowbind_core::value::Value;
use std::sync::OnceLock;

// ==================== Mock cursor / command ====================

#[derive(Debug, Clone)]
pub struct MockCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    at: Option<usize>,
}

impl MockCursor {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
            at: None,
        }
    }
}

impl Cursor for MockCursor {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> &str {
        &self.columns[index]
    }

    fn value(&self, index: usize) -> Value {
        self.at
            .and_then(|row| self.rows.get(row))
            .and_then(|row| row.get(index))
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn advance(&mut self) -> Result<bool> {
        let next = self.at.map_or(0, |at| at + 1);
        self.at = Some(next);
        Ok(next < self.rows.len())
    }
}

/// Async wrapper over [`MockCursor`]; rows resolve immediately.
#[derive(Debug, Clone)]
pub struct MockAsyncCursor(pub MockCursor);

impl AsyncCursor for MockAsyncCursor {
    fn column_count(&self) -> usize {
        self.0.column_count()
    }

    fn column_name(&self, index: usize) -> &str {
        self.0.column_name(index)
    }

    fn value(&self, index: usize) -> Value {
        self.0.value(index)
    }

    async fn advance(&mut self, cx: &Cx) -> Outcome<bool, rowbind_core::Error> {
        if let Some(reason) = cx.cancel_reason() {
            return Outcome::Cancelled(reason);
        }
        match self.0.advance() {
            Ok(more) => Outcome::Ok(more),
            Err(err) => Outcome::Err(err),
        }
    }
}

#[derive(Debug, Default)]
pub struct MockCommand {
    pub text: String,
    pub params: ParamSet,
    pub rows_affected: u64,
}

impl Command for MockCommand {
    type Cursor<'a>
        = MockCursor
    where
        Self: 'a;

    fn set_text(&mut self, sql: &str) {
        self.text = sql.to_string();
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn execute(&mut self) -> Result<u64> {
        Ok(self.rows_affected)
    }

    fn query_scalar(&mut self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn query(&mut self) -> Result<Self::Cursor<'_>> {
        Ok(MockCursor::new(&[], Vec::new()))
    }
}

#[derive(Debug, Default)]
pub struct MockAsyncCommand {
    pub text: String,
    pub params: ParamSet,
    pub rows_affected: u64,
}

impl AsyncCommand for MockAsyncCommand {
    type Cursor<'a>
        = MockAsyncCursor
    where
        Self: 'a;

    fn set_text(&mut self, sql: &str) {
        self.text = sql.to_string();
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    async fn execute(&mut self, cx: &Cx) -> Outcome<u64, rowbind_core::Error> {
        if let Some(reason) = cx.cancel_reason() {
            return Outcome::Cancelled(reason);
        }
        Outcome::Ok(self.rows_affected)
    }

    async fn query_scalar(&mut self, cx: &Cx) -> Outcome<Value, rowbind_core::Error> {
        if let Some(reason) = cx.cancel_reason() {
            return Outcome::Cancelled(reason);
        }
        Outcome::Ok(Value::Null)
    }

    async fn query(&mut self, cx: &Cx) -> Outcome<Self::Cursor<'_>, rowbind_core::Error> {
        if let Some(reason) = cx.cancel_reason() {
            return Outcome::Cancelled(reason);
        }
        Outcome::Ok(MockAsyncCursor(MockCursor::new(&[], Vec::new())))
    }
}

// ==================== Fixture models ====================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub email: Option<String>,
    pub version: i64,
    pub orders: Vec<Order>,
}

impl Model for Customer {
    fn definition() -> &'static ModelDefinition<Self> {
        static DEF: OnceLock<ModelDefinition<Customer>> = OnceLock::new();
        DEF.get_or_init(|| {
            ModelDefinition::new("Customer", "customers")
                .field(
                    FieldDefinition::new(
                        "id",
                        SqlType::BigInt,
                        |c: &Customer| Value::BigInt(c.id),
                        |c, v| {
                            c.id = v.try_into()?;
                            Ok(())
                        },
                    )
                    .primary_key(true),
                )
                .field(FieldDefinition::new(
                    "name",
                    SqlType::Text,
                    |c: &Customer| Value::Text(c.name.clone()),
                    |c, v| {
                        c.name = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(FieldDefinition::new(
                    "active",
                    SqlType::Boolean,
                    |c: &Customer| Value::Bool(c.active),
                    |c, v| {
                        c.active = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(
                    FieldDefinition::new(
                        "email",
                        SqlType::Text,
                        |c: &Customer| c.email.clone().into(),
                        |c, v| {
                            c.email = v.try_into()?;
                            Ok(())
                        },
                    )
                    .nullable(true),
                )
                .field(
                    FieldDefinition::new(
                        "version",
                        SqlType::BigInt,
                        |c: &Customer| Value::BigInt(c.version),
                        |c, v| {
                            c.version = v.try_into()?;
                            Ok(())
                        },
                    )
                    .row_version(true),
                )
                .reference(ReferenceDefinition::list::<Order>("orders", |c, orders| {
                    c.orders = orders;
                }))
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub total: f64,
    pub note: Option<String>,
}

impl Model for Order {
    fn definition() -> &'static ModelDefinition<Self> {
        static DEF: OnceLock<ModelDefinition<Order>> = OnceLock::new();
        DEF.get_or_init(|| {
            ModelDefinition::new("Order", "orders")
                .field(
                    FieldDefinition::new(
                        "id",
                        SqlType::BigInt,
                        |o: &Order| Value::BigInt(o.id),
                        |o, v| {
                            o.id = v.try_into()?;
                            Ok(())
                        },
                    )
                    .primary_key(true)
                    .auto_increment(true),
                )
                .field(
                    FieldDefinition::new(
                        "customer_id",
                        SqlType::BigInt,
                        |o: &Order| Value::BigInt(o.customer_id),
                        |o, v| {
                            o.customer_id = v.try_into()?;
                            Ok(())
                        },
                    )
                    .references::<Customer>(),
                )
                .field(FieldDefinition::new(
                    "total",
                    SqlType::Double,
                    |o: &Order| Value::Double(o.total),
                    |o, v| {
                        o.total = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(
                    FieldDefinition::new(
                        "note",
                        SqlType::Text,
                        |o: &Order| o.note.clone().into(),
                        |o, v| {
                            o.note = v.try_into()?;
                            Ok(())
                        },
                    )
                    .nullable(true),
                )
        })
    }
}

/// Model whose primary key is a client-generated identifier.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AuditEvent {
    pub id: [u8; 16],
    pub action: String,
}

impl Model for AuditEvent {
    fn definition() -> &'static ModelDefinition<Self> {
        static DEF: OnceLock<ModelDefinition<AuditEvent>> = OnceLock::new();
        DEF.get_or_init(|| {
            ModelDefinition::new("AuditEvent", "audit_events")
                .field(
                    FieldDefinition::new(
                        "id",
                        SqlType::Uuid,
                        |e: &AuditEvent| Value::Uuid(e.id),
                        |e, v| {
                            e.id = v.try_into()?;
                            Ok(())
                        },
                    )
                    .primary_key(true)
                    .auto_id(true),
                )
                .field(FieldDefinition::new(
                    "action",
                    SqlType::Text,
                    |e: &AuditEvent| Value::Text(e.action.clone()),
                    |e, v| {
                        e.action = v.try_into()?;
                        Ok(())
                    },
                ))
        })
    }
}

/// Fixture for the fuzzy column-matching contract: PascalCase field names
/// against messy column spellings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StockMove {
    pub customer: i64,
    pub quantity: f64,
}

impl Model for StockMove {
    fn definition() -> &'static ModelDefinition<Self> {
        static DEF: OnceLock<ModelDefinition<StockMove>> = OnceLock::new();
        DEF.get_or_init(|| {
            ModelDefinition::new("StockMove", "stock_moves")
                .field(FieldDefinition::new(
                    "CustomerId",
                    SqlType::BigInt,
                    |s: &StockMove| Value::BigInt(s.customer),
                    |s, v| {
                        s.customer = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(FieldDefinition::new(
                    "Quantity",
                    SqlType::Double,
                    |s: &StockMove| Value::Double(s.quantity),
                    |s, v| {
                        s.quantity = v.try_into()?;
                        Ok(())
                    },
                ))
        })
    }
}
