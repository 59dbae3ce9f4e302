use tupledb::{
    config::StoreConfig,
    executor::insert::{Inserter, TableInserter},
    storage::schema::TableName,
    transaction::Transaction,
    types::{error::DatabaseError, row::Row, value::Value},
    utils::mock::{user_row, users_catalog},
};

fn users() -> TableName {
    TableName::unqualified("users")
}

#[test]
fn test_table_inserter_table_name() -> Result<(), DatabaseError> {
    let mut catalog = users_catalog(StoreConfig::default())?;
    let mut transaction = Transaction::new();
    let inserter = TableInserter::new(catalog.table_mut(&users())?, &mut transaction);
    assert_eq!(inserter.table_name(), "main.users");
    Ok(())
}

#[test]
fn test_single_row_insertion() -> Result<(), DatabaseError> {
    let mut catalog = users_catalog(StoreConfig::default())?;
    let mut transaction = Transaction::new();

    let tuple = TableInserter::new(catalog.table_mut(&users())?, &mut transaction)
        .insert(Row::new(user_row(1, "alice")))?;

    let store = catalog.table(&users())?;
    assert_eq!(store.len(), 1);
    assert_eq!(store.decode(tuple)?.values, user_row(1, "alice"));
    Ok(())
}

#[test]
fn test_batch_insertion() -> Result<(), DatabaseError> {
    let mut catalog = users_catalog(StoreConfig::default().with_group_size(8))?;
    let mut transaction = Transaction::new();

    let rows: Vec<Row> = (1..=20)
        .map(|i| Row::new(user_row(i, &format!("user{}", i))))
        .collect();
    let tuples =
        TableInserter::new(catalog.table_mut(&users())?, &mut transaction).insert_batch(rows)?;

    assert_eq!(tuples.len(), 20);
    let store = catalog.table(&users())?;
    assert_eq!(store.len(), 20);
    assert_eq!(store.group_count(), 3);
    assert_eq!(store.decode(tuples[19])?.values, user_row(20, "user20"));
    Ok(())
}

#[test]
fn test_empty_batch() -> Result<(), DatabaseError> {
    let mut catalog = users_catalog(StoreConfig::default())?;
    let mut transaction = Transaction::new();
    let tuples = TableInserter::new(catalog.table_mut(&users())?, &mut transaction)
        .insert_batch(Vec::new())?;
    assert!(tuples.is_empty());
    assert_eq!(catalog.table(&users())?.group_count(), 0);
    Ok(())
}

#[test]
fn test_batch_with_bad_row_inserts_nothing() -> Result<(), DatabaseError> {
    let mut catalog = users_catalog(StoreConfig::default())?;
    let mut transaction = Transaction::new();

    let rows = vec![
        Row::new(user_row(1, "ok")),
        Row::new(user_row(2, "ok")),
        Row::new(vec![Value::Null, Value::Text("bad".to_string())]),
    ];
    match TableInserter::new(catalog.table_mut(&users())?, &mut transaction).insert_batch(rows) {
        Err(DatabaseError::NullViolation { column }) => assert_eq!(column, "id"),
        other => panic!("Expected NullViolation, got {:?}", other),
    }
    assert!(catalog.table(&users())?.is_empty());
    Ok(())
}

#[test]
fn test_insert_inside_transaction_records_undo() -> Result<(), DatabaseError> {
    let mut catalog = users_catalog(StoreConfig::default())?;
    let mut transaction = Transaction::new();
    transaction.begin()?;

    TableInserter::new(catalog.table_mut(&users())?, &mut transaction).insert_batch(vec![
        Row::new(user_row(1, "a")),
        Row::new(user_row(2, "b")),
    ])?;
    assert_eq!(transaction.undo_len(), 2);

    transaction.rollback(&mut catalog)?;
    assert!(catalog.table(&users())?.is_empty());
    Ok(())
}

#[test]
fn test_batch_hitting_group_limit_inserts_nothing() -> Result<(), DatabaseError> {
    let mut catalog = users_catalog(StoreConfig::default().with_group_size(2).with_max_groups(1))?;
    let mut transaction = Transaction::new();
    transaction.begin()?;

    let rows: Vec<Row> = (1..=3).map(|i| Row::new(user_row(i, "x"))).collect();
    match TableInserter::new(catalog.table_mut(&users())?, &mut transaction).insert_batch(rows) {
        Err(DatabaseError::GroupLimitReached { limit }) => assert_eq!(limit, 1),
        other => panic!("Expected GroupLimitReached, got {:?}", other),
    }

    let store = catalog.table(&users())?;
    assert!(store.is_empty());
    assert_eq!(store.free_count(), 2);
    assert_eq!(transaction.undo_len(), 0);

    // The freed slots are usable again
    let tuples = TableInserter::new(catalog.table_mut(&users())?, &mut transaction)
        .insert_batch(vec![Row::new(user_row(7, "a")), Row::new(user_row(8, "b"))])?;
    assert_eq!(tuples.len(), 2);
    assert_eq!(transaction.undo_len(), 2);
    assert_eq!(catalog.table(&users())?.len(), 2);
    Ok(())
}
