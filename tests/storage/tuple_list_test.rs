use tupledb::{
    storage::tuple_list::{Link, ListKind, TupleList},
    types::error::DatabaseError,
};

fn links(count: usize) -> Vec<Link> {
    vec![Link::default(); count]
}

#[test]
fn test_empty_list() {
    let table = links(4);
    let list = TupleList::new(ListKind::Data);

    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(list.first(), None);
    assert_eq!(list.last(), None);
    assert_eq!(list.iter(&table).count(), 0);
}

#[test]
fn test_add_head_orders_newest_first() -> Result<(), DatabaseError> {
    let mut table = links(4);
    let mut list = TupleList::new(ListKind::Data);

    list.add_head(&mut table, 0)?;
    list.add_head(&mut table, 2)?;
    list.add_head(&mut table, 1)?;

    assert_eq!(list.len(), 3);
    assert_eq!(list.iter(&table).collect::<Vec<_>>(), vec![1, 2, 0]);
    assert_eq!(list.first(), Some(1));
    assert_eq!(list.last(), Some(0));
    assert_eq!(list.next_of(&table, 1)?, Some(2));
    assert_eq!(list.next_of(&table, 0)?, None);
    assert!(list.contains(&table, 2));
    assert!(!list.contains(&table, 3));
    Ok(())
}

#[test]
fn test_delete_from_middle_and_ends() -> Result<(), DatabaseError> {
    let mut table = links(5);
    let mut list = TupleList::new(ListKind::Free);
    for slot in 0..5 {
        list.add_head(&mut table, slot)?;
    }

    list.delete(&mut table, 2)?;
    assert_eq!(list.iter(&table).collect::<Vec<_>>(), vec![4, 3, 1, 0]);

    list.delete(&mut table, 4)?;
    list.delete(&mut table, 0)?;
    assert_eq!(list.iter(&table).collect::<Vec<_>>(), vec![3, 1]);
    assert_eq!(list.first(), Some(3));
    assert_eq!(list.last(), Some(1));
    assert_eq!(list.len(), 2);

    // Removed slots carry no links
    assert_eq!(table[2], Link::default());
    Ok(())
}

#[test]
fn test_pop_head() -> Result<(), DatabaseError> {
    let mut table = links(3);
    let mut list = TupleList::new(ListKind::Free);
    list.add_head(&mut table, 2)?;
    list.add_head(&mut table, 1)?;

    assert_eq!(list.pop_head(&mut table)?, Some(1));
    assert_eq!(list.pop_head(&mut table)?, Some(2));
    assert_eq!(list.pop_head(&mut table)?, None);
    assert!(list.is_empty());
    Ok(())
}

#[test]
fn test_slot_cannot_join_two_lists() -> Result<(), DatabaseError> {
    let mut table = links(2);
    let mut free = TupleList::new(ListKind::Free);
    let mut data = TupleList::new(ListKind::Data);

    free.add_head(&mut table, 0)?;
    assert!(matches!(
        data.add_head(&mut table, 0),
        Err(DatabaseError::ListCorrupted { .. })
    ));
    assert!(matches!(
        free.add_head(&mut table, 0),
        Err(DatabaseError::ListCorrupted { .. })
    ));

    // Moving between lists goes through delete
    free.delete(&mut table, 0)?;
    data.add_head(&mut table, 0)?;
    assert_eq!(table[0].owner, Some(ListKind::Data));
    assert!(free.is_empty());
    assert_eq!(data.len(), 1);
    Ok(())
}

#[test]
fn test_delete_requires_membership() -> Result<(), DatabaseError> {
    let mut table = links(2);
    let mut free = TupleList::new(ListKind::Free);
    let mut data = TupleList::new(ListKind::Data);
    free.add_head(&mut table, 1)?;

    assert!(matches!(
        data.delete(&mut table, 1),
        Err(DatabaseError::ListCorrupted { .. })
    ));
    assert!(matches!(
        data.delete(&mut table, 0),
        Err(DatabaseError::ListCorrupted { .. })
    ));
    assert!(matches!(
        data.next_of(&table, 1),
        Err(DatabaseError::ListCorrupted { .. })
    ));
    assert_eq!(free.len(), 1);
    Ok(())
}

#[test]
fn test_missing_slot_is_reported() {
    let mut table = links(1);
    let mut list = TupleList::new(ListKind::Data);
    assert!(matches!(
        list.add_head(&mut table, 5),
        Err(DatabaseError::ListCorrupted { .. })
    ));
    assert!(list.is_empty());
}
