//! Shared support for the end-to-end mapping tests: an in-memory cursor and
//! a small commerce domain exercising enums, UUIDs, JSON and row versions.

// Each integration-test binary compiles its own copy of this module and
// uses a different subset of it.
#![allow(dead_code)]

use rowbind::{
    AsyncCursor, Cursor, Cx, FieldDefinition, Model, ModelDefinition, Outcome,
    ReferenceDefinition, SqlType, Value,
};
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    at: Option<usize>,
}

impl MemoryCursor {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
            at: None,
        }
    }
}

impl Cursor for MemoryCursor {
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

    fn advance(&mut self) -> rowbind::Result<bool> {
        let next = self.at.map_or(0, |at| at + 1);
        self.at = Some(next);
        Ok(next < self.rows.len())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryAsyncCursor(pub MemoryCursor);

impl AsyncCursor for MemoryAsyncCursor {
    fn column_count(&self) -> usize {
        self.0.column_count()
    }

    fn column_name(&self, index: usize) -> &str {
        self.0.column_name(index)
    }

    fn value(&self, index: usize) -> Value {
        self.0.value(index)
    }

    async fn advance(&mut self, cx: &Cx) -> Outcome<bool, rowbind::Error> {
        if let Some(reason) = cx.cancel_reason() {
            return Outcome::Cancelled(reason);
        }
        match self.0.advance() {
            Ok(more) => Outcome::Ok(more),
            Err(err) => Outcome::Err(err),
        }
    }
}

// ==================== Domain ====================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    pub id: [u8; 16],
    pub sku: String,
    pub status: String,
    pub in_stock: bool,
    pub attributes: Option<serde_json::Value>,
    pub version: i64,
    pub reviews: Vec<Review>,
}

impl Model for Product {
    fn definition() -> &'static ModelDefinition<Self> {
        static DEF: OnceLock<ModelDefinition<Product>> = OnceLock::new();
        DEF.get_or_init(|| {
            ModelDefinition::new("Product", "products")
                .field(
                    FieldDefinition::new(
                        "id",
                        SqlType::Uuid,
                        |p: &Product| Value::Uuid(p.id),
                        |p, v| {
                            p.id = v.try_into()?;
                            Ok(())
                        },
                    )
                    .primary_key(true)
                    .auto_id(true),
                )
                .field(FieldDefinition::new(
                    "sku",
                    SqlType::VarChar(64),
                    |p: &Product| p.sku.clone().into(),
                    |p, v| {
                        p.sku = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(FieldDefinition::new(
                    "status",
                    SqlType::Enum("product_status"),
                    |p: &Product| p.status.clone().into(),
                    |p, v| {
                        p.status = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(FieldDefinition::new(
                    "in_stock",
                    SqlType::Boolean,
                    |p: &Product| p.in_stock.into(),
                    |p, v| {
                        p.in_stock = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(
                    FieldDefinition::new(
                        "attributes",
                        SqlType::Json,
                        |p: &Product| p.attributes.clone().into(),
                        |p, v| {
                            p.attributes = v.try_into()?;
                            Ok(())
                        },
                    )
                    .nullable(true),
                )
                .field(
                    FieldDefinition::new(
                        "version",
                        SqlType::BigInt,
                        |p: &Product| p.version.into(),
                        |p, v| {
                            p.version = v.try_into()?;
                            Ok(())
                        },
                    )
                    .row_version(true),
                )
                .reference(ReferenceDefinition::list::<Review>("reviews", |p, r| {
                    p.reviews = r;
                }))
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Review {
    pub id: i64,
    pub product_id: [u8; 16],
    pub rating: i32,
    pub body: String,
}

impl Model for Review {
    fn definition() -> &'static ModelDefinition<Self> {
        static DEF: OnceLock<ModelDefinition<Review>> = OnceLock::new();
        DEF.get_or_init(|| {
            ModelDefinition::new("Review", "reviews")
                .field(
                    FieldDefinition::new(
                        "id",
                        SqlType::BigInt,
                        |r: &Review| r.id.into(),
                        |r, v| {
                            r.id = v.try_into()?;
                            Ok(())
                        },
                    )
                    .primary_key(true)
                    .auto_increment(true),
                )
                .field(
                    FieldDefinition::new(
                        "product_id",
                        SqlType::Uuid,
                        |r: &Review| Value::Uuid(r.product_id),
                        |r, v| {
                            r.product_id = v.try_into()?;
                            Ok(())
                        },
                    )
                    .references::<Product>(),
                )
                .field(FieldDefinition::new(
                    "rating",
                    SqlType::Integer,
                    |r: &Review| r.rating.into(),
                    |r, v| {
                        r.rating = v.try_into()?;
                        Ok(())
                    },
                ))
                .field(FieldDefinition::new(
                    "body",
                    SqlType::Text,
                    |r: &Review| r.body.clone().into(),
                    |r, v| {
                        r.body = v.try_into()?;
                        Ok(())
                    },
                ))
        })
    }
}

pub fn sample_product() -> Product {
    Product {
        id: *uuid::Uuid::new_v4().as_bytes(),
        sku: "SKU-001".to_string(),
        status: "Active".to_string(),
        in_stock: true,
        attributes: Some(serde_json::json!({"color": "red"})),
        version: 5,
        reviews: Vec::new(),
    }
}
