//! End-to-end write-path and graph-merge behavior: optimistic concurrency
//! accounting across dialects and list-reference stitching on UUID keys.

mod support;

use rowbind::{Dialect, Error, Value, build_delete, build_insert, build_update, merge};
use support::{Product, Review, sample_product};

#[test]
fn whole_object_update_is_optimistic_for_versioned_models() {
    let dialect = Dialect::postgres();
    let product = sample_product();
    let stmt = build_update(&dialect, &product).unwrap();

    assert!(stmt.optimistic);
    assert!(stmt.sql.starts_with("UPDATE \"products\" SET"));
    assert!(stmt.sql.contains("WHERE \"id\"="));
    assert!(stmt.sql.contains("AND \"version\"="));

    // A stale version matching zero rows is a conflict...
    assert!(matches!(
        stmt.check_rows(0),
        Err(Error::OptimisticLock(_))
    ));
    // ...while a successful write passes the count through.
    assert_eq!(stmt.check_rows(1).unwrap(), 1);
}

#[test]
fn unversioned_zero_row_update_is_silent() {
    let dialect = Dialect::postgres();
    let review = Review::default();
    let stmt = build_update(&dialect, &review).unwrap();
    assert!(!stmt.optimistic);
    assert_eq!(stmt.check_rows(0).unwrap(), 0);
}

#[test]
fn delete_with_version_criterion_is_optimistic() {
    let dialect = Dialect::mysql();
    let stmt = build_delete::<Product>(
        &dialect,
        &[
            ("sku", Value::Text("SKU-001".to_string())),
            ("version", Value::BigInt(5)),
        ],
    )
    .unwrap();

    assert_eq!(
        stmt.sql,
        "DELETE FROM `products` WHERE `sku`=? AND `version`=?"
    );
    assert!(stmt.optimistic);
    assert!(matches!(
        stmt.check_rows(0),
        Err(Error::OptimisticLock(_))
    ));
}

#[test]
fn insert_statement_shapes_per_dialect() {
    let product = sample_product();

    let stmt = build_insert(&Dialect::postgres(), &product, None).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO \"products\" (\"id\",\"sku\",\"status\",\"in_stock\",\"attributes\") \
         VALUES ($1,$2,$3,$4,$5)"
    );

    let stmt = build_insert(&Dialect::sqlite(), &product, None).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO \"products\" (\"id\",\"sku\",\"status\",\"in_stock\",\"attributes\") \
         VALUES (:id,:sku,:status,:in_stock,:attributes)"
    );
}

#[test]
fn merge_assigns_reviews_by_uuid_key() {
    let mut first = sample_product();
    let mut second = sample_product();
    second.sku = "SKU-002".to_string();
    let orphaned = sample_product();

    let reviews = vec![
        Review {
            id: 1,
            product_id: first.id,
            rating: 5,
            body: "great".to_string(),
        },
        Review {
            id: 2,
            product_id: first.id,
            rating: 4,
            body: "good".to_string(),
        },
        Review {
            id: 3,
            product_id: second.id,
            rating: 2,
            body: "meh".to_string(),
        },
    ];

    let mut products = vec![first, second, orphaned];
    merge(&mut products, &reviews).unwrap();

    let bodies: Vec<_> = products[0].reviews.iter().map(|r| r.body.as_str()).collect();
    assert_eq!(bodies, vec!["great", "good"]);
    assert_eq!(products[1].reviews.len(), 1);
    assert!(products[2].reviews.is_empty());
}

#[test]
fn merge_without_matching_reference_field_fails() {
    // Review declares no reference fields, so merging products into it
    // cannot resolve.
    let mut reviews = vec![Review::default()];
    let products = vec![Product::default()];
    let err = merge(&mut reviews, &products).unwrap_err();
    assert!(matches!(err, Error::UnresolvedReference(_)));
}
