use tupledb::types::{
    StoreId, TupleId,
    error::DatabaseError,
    row::Row,
    value::Value,
};

#[test]
fn test_new_row_creation() {
    let values = vec![Value::Integer(1), Value::Text("test".to_string())];
    let row = Row::new(values.clone());

    assert_eq!(row.values, values);
    assert_eq!(row.tuple_id, None);
    assert_eq!(row.len(), 2);
    assert!(!row.is_empty());
}

#[test]
fn test_row_with_tuple_id_creation() {
    let tuple = TupleId::new(StoreId(3), 17);
    let row = Row::with_tuple_id(tuple, vec![Value::Integer(42)]);

    assert_eq!(row.tuple_id, Some(tuple));
    assert_eq!(tuple.to_string(), "3:17");
}

#[test]
fn test_empty_row() {
    let row = Row::new(vec![]);
    assert!(row.is_empty());
    assert_eq!(row.get_value(0), None);
}

#[test]
fn test_get_and_set_value() -> Result<(), DatabaseError> {
    let mut row = Row::new(vec![Value::Integer(1), Value::Null]);

    assert_eq!(row.get_value(0), Some(&Value::Integer(1)));
    assert_eq!(row.get_value(1), Some(&Value::Null));

    row.set_value(1, Value::Text("filled".to_string()))?;
    assert_eq!(row.get_value(1), Some(&Value::Text("filled".to_string())));
    Ok(())
}

#[test]
fn test_set_value_invalid_index() {
    let mut row = Row::new(vec![Value::Integer(1)]);

    match row.set_value(1, Value::Integer(2)) {
        Err(DatabaseError::ColumnIndexOutOfBounds { index }) => assert_eq!(index, 1),
        other => panic!("Expected ColumnIndexOutOfBounds, got {:?}", other),
    }
    assert_eq!(row.values, vec![Value::Integer(1)]);
}

#[test]
fn test_project_reorders_and_keeps_tuple_id() -> Result<(), DatabaseError> {
    let tuple = TupleId::new(StoreId(1), 0);
    let row = Row::with_tuple_id(
        tuple,
        vec![
            Value::Integer(1),
            Value::Text("a".to_string()),
            Value::Real(0.5),
        ],
    );

    let projected = row.project(&[2, 0])?;
    assert_eq!(projected.values, vec![Value::Real(0.5), Value::Integer(1)]);
    assert_eq!(projected.tuple_id, Some(tuple));
    Ok(())
}

#[test]
fn test_project_out_of_bounds() {
    let row = Row::new(vec![Value::Integer(1)]);
    assert!(matches!(
        row.project(&[0, 3]),
        Err(DatabaseError::ColumnIndexOutOfBounds { index: 3 })
    ));
}

#[test]
fn test_row_serde_round_trip() {
    let row = Row::with_tuple_id(
        TupleId::new(StoreId(9), 4),
        vec![Value::Null, Value::Integer(-5), Value::Text("x".to_string())],
    );
    let json = serde_json::to_string(&row).unwrap();
    let decoded: Row = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, row);
}
