use std::{collections::HashSet, sync::Arc};

use tupledb::{
    config::StoreConfig,
    storage::{
        schema::{TableName, TableSchemaBuilder},
        table_store::TableStore,
        tuple_list::ListKind,
    },
    types::{
        TupleId,
        error::DatabaseError,
        value::{DataType, Value},
    },
    utils::mock::{populated_store, user_row, users_schema},
};

fn values_of(store: &TableStore) -> Result<Vec<Vec<Value>>, DatabaseError> {
    store
        .rows()
        .map(|row| row.map(|row| row.values))
        .collect()
}

/// Every allocated slot is in exactly one of the two lists and the counts add up.
fn assert_lists_partition(store: &TableStore) {
    let mut data = 0;
    let mut free = 0;
    for index in 0..store.capacity() {
        match store.list_of(TupleId::new(store.store_id(), index)) {
            Some(ListKind::Data) => data += 1,
            Some(ListKind::Free) => free += 1,
            None => panic!("slot {} is in no list", index),
        }
    }
    assert_eq!(data, store.len());
    assert_eq!(free, store.free_count());
    assert_eq!(data + free, store.capacity());
}

#[test]
fn test_insert_update_delete_lifecycle() -> Result<(), DatabaseError> {
    let schema = TableSchemaBuilder::new(TableName::unqualified("people"))
        .add_column("id", DataType::Int)
        .add_column("name", DataType::Varchar(8))
        .build()?;
    let mut store = TableStore::new(Arc::new(schema), &StoreConfig::default())?;

    let tuple = store.insert(&user_row(1, "ann"), None)?;
    assert_eq!(values_of(&store)?, vec![user_row(1, "ann")]);

    store.update(tuple, &[1], &[Value::Text("bob".to_string())], None)?;
    assert_eq!(values_of(&store)?, vec![user_row(1, "bob")]);

    store.delete(tuple, None)?;
    assert!(values_of(&store)?.is_empty());

    store.insert(&[Value::Integer(2), Value::Null], None)?;
    assert_eq!(
        values_of(&store)?,
        vec![vec![Value::Integer(2), Value::Null]]
    );
    assert_lists_partition(&store);
    Ok(())
}

#[test]
fn test_first_insert_allocates_one_group() -> Result<(), DatabaseError> {
    let mut store = TableStore::new(Arc::new(users_schema()), &StoreConfig::default())?;
    assert_eq!(store.group_count(), 0);
    assert!(store.is_empty());

    let tuple = store.insert(&user_row(1, "a"), None)?;
    assert_eq!(store.group_count(), 1);
    assert_eq!(store.capacity(), 100);
    assert_eq!(store.free_count(), 99);
    assert_eq!(tuple.index, 0);
    assert!(store.contains(tuple));
    assert_lists_partition(&store);
    Ok(())
}

#[test]
fn test_capacity_grows_one_group_per_exhaustion() -> Result<(), DatabaseError> {
    let config = StoreConfig::default().with_group_size(4);
    let (mut store, tuples) = populated_store(4, &config)?;
    assert_eq!(store.group_count(), 1);
    assert_eq!(store.free_count(), 0);

    let fifth = store.insert(&user_row(5, "user5"), None)?;
    assert_eq!(store.group_count(), 2);
    assert_eq!(store.free_count(), 3);
    assert_eq!(fifth.index, 4);

    // Handles from the first group still decode to their rows
    for (i, tuple) in tuples.iter().enumerate() {
        let row = store.decode(*tuple)?;
        assert_eq!(row.values, user_row(i as i64 + 1, &format!("user{}", i + 1)));
    }
    assert_lists_partition(&store);
    Ok(())
}

#[test]
fn test_scan_is_newest_first() -> Result<(), DatabaseError> {
    let (store, tuples) = populated_store(5, &StoreConfig::default())?;
    let scanned: Vec<TupleId> = store.scan().collect();
    let expected: Vec<TupleId> = tuples.into_iter().rev().collect();
    assert_eq!(scanned, expected);

    // Cursor form walks the same order
    let mut cursor = None;
    let mut walked = Vec::new();
    while let Some(tuple) = store.sequential_scan(cursor)? {
        walked.push(tuple);
        cursor = Some(tuple);
    }
    assert_eq!(walked, scanned);
    Ok(())
}

#[test]
fn test_deleted_rows_never_appear_in_scan() -> Result<(), DatabaseError> {
    let (mut store, tuples) = populated_store(10, &StoreConfig::default())?;
    for tuple in tuples.iter().step_by(2) {
        store.delete(*tuple, None)?;
    }

    let scanned: HashSet<TupleId> = store.scan().collect();
    assert_eq!(scanned.len(), 5);
    for (i, tuple) in tuples.iter().enumerate() {
        assert_eq!(scanned.contains(tuple), i % 2 == 1);
        assert_eq!(store.contains(*tuple), i % 2 == 1);
    }
    assert_lists_partition(&store);
    Ok(())
}

#[test]
fn test_deleted_slot_is_reused_first() -> Result<(), DatabaseError> {
    let (mut store, tuples) = populated_store(3, &StoreConfig::default())?;
    store.delete(tuples[1], None)?;

    let reused = store.insert(&user_row(9, "nine"), None)?;
    assert_eq!(reused, tuples[1]);
    assert_eq!(store.decode(reused)?.values, user_row(9, "nine"));
    Ok(())
}

#[test]
fn test_stale_handle_is_rejected() -> Result<(), DatabaseError> {
    let (mut store, tuples) = populated_store(2, &StoreConfig::default())?;
    store.delete(tuples[0], None)?;

    assert!(matches!(
        store.delete(tuples[0], None),
        Err(DatabaseError::InvalidTuple { .. })
    ));
    assert!(matches!(
        store.update(tuples[0], &[0], &[Value::Integer(1)], None),
        Err(DatabaseError::InvalidTuple { .. })
    ));
    assert!(matches!(
        store.decode(tuples[0]),
        Err(DatabaseError::InvalidTuple { .. })
    ));
    assert!(matches!(
        store.sequential_scan(Some(tuples[0])),
        Err(DatabaseError::InvalidTuple { .. })
    ));
    assert_eq!(store.len(), 1);
    Ok(())
}

#[test]
fn test_handle_from_other_store_is_rejected() -> Result<(), DatabaseError> {
    let (store_a, tuples_a) = populated_store(1, &StoreConfig::default())?;
    let (mut store_b, _) = populated_store(1, &StoreConfig::default())?;
    assert_ne!(store_a.store_id(), store_b.store_id());

    assert!(!store_b.contains(tuples_a[0]));
    assert_eq!(store_b.list_of(tuples_a[0]), None);
    assert!(matches!(
        store_b.delete(tuples_a[0], None),
        Err(DatabaseError::InvalidTuple { .. })
    ));
    assert_eq!(store_b.len(), 1);
    Ok(())
}

#[test]
fn test_failed_insert_leaves_store_unchanged() -> Result<(), DatabaseError> {
    let (mut store, _) = populated_store(2, &StoreConfig::default())?;
    let before = values_of(&store)?;
    let free_before = store.free_count();

    let bad_rows = vec![
        vec![Value::Null, Value::Text("x".to_string())],
        vec![Value::Integer(1), Value::Text("way too long".to_string())],
        vec![Value::Text("1".to_string()), Value::Null],
        vec![Value::Integer(1)],
        vec![Value::Integer(i64::MAX), Value::Null],
    ];
    for row in bad_rows {
        assert!(store.insert(&row, None).is_err());
    }

    assert_eq!(values_of(&store)?, before);
    assert_eq!(store.free_count(), free_before);
    assert_lists_partition(&store);
    Ok(())
}

#[test]
fn test_group_limit_surfaces_on_insert() -> Result<(), DatabaseError> {
    let config = StoreConfig::default().with_group_size(2).with_max_groups(1);
    let (mut store, _) = populated_store(2, &config)?;

    match store.insert(&user_row(3, "c"), None) {
        Err(DatabaseError::GroupLimitReached { limit }) => assert_eq!(limit, 1),
        other => panic!("Expected GroupLimitReached, got {:?}", other),
    }
    assert_eq!(store.len(), 2);
    assert_eq!(store.group_count(), 1);
    assert_lists_partition(&store);
    Ok(())
}

#[test]
fn test_update_is_all_or_nothing() -> Result<(), DatabaseError> {
    let (mut store, tuples) = populated_store(1, &StoreConfig::default())?;
    let tuple = tuples[0];

    // Second value is too long, so the first must not be written either
    let result = store.update(
        tuple,
        &[0, 1],
        &[Value::Integer(99), Value::Text("much too long".to_string())],
        None,
    );
    assert!(matches!(result, Err(DatabaseError::ValueTooLong { .. })));
    assert_eq!(store.decode(tuple)?.values, user_row(1, "user1"));

    assert!(matches!(
        store.update(tuple, &[0, 1], &[Value::Integer(2)], None),
        Err(DatabaseError::ColumnCountMismatch { .. })
    ));
    assert!(matches!(
        store.update(tuple, &[5], &[Value::Integer(2)], None),
        Err(DatabaseError::ColumnIndexOutOfBounds { index: 5 })
    ));

    store.update(
        tuple,
        &[1, 0],
        &[Value::Text("zed".to_string()), Value::Integer(42)],
        None,
    )?;
    assert_eq!(store.decode(tuple)?.values, user_row(42, "zed"));
    Ok(())
}

#[test]
fn test_update_to_null_and_back() -> Result<(), DatabaseError> {
    let (mut store, tuples) = populated_store(1, &StoreConfig::default())?;
    let tuple = tuples[0];

    store.update(tuple, &[1], &[Value::Null], None)?;
    assert_eq!(store.decode(tuple)?.values[1], Value::Null);

    store.update(tuple, &[1], &[Value::Text("back".to_string())], None)?;
    assert_eq!(store.decode(tuple)?.values[1], Value::Text("back".to_string()));

    assert!(matches!(
        store.update(tuple, &[0], &[Value::Null], None),
        Err(DatabaseError::NullViolation { .. })
    ));
    Ok(())
}

#[test]
fn test_many_rows_across_groups() -> Result<(), DatabaseError> {
    let config = StoreConfig::default().with_group_size(7);
    let (mut store, tuples) = populated_store(50, &config)?;
    assert_eq!(store.group_count(), 8);

    for tuple in &tuples[10..40] {
        store.delete(*tuple, None)?;
    }
    for i in 0..30 {
        store.insert(&user_row(100 + i, "again"), None)?;
    }

    // Freed slots were reused, no new group needed
    assert_eq!(store.group_count(), 8);
    assert_eq!(store.len(), 50);
    assert_lists_partition(&store);
    Ok(())
}
