use tupledb::{
    config::StoreConfig,
    storage::{
        tuple_group::TupleGroups,
        tuple_list::{LinkTable, ListKind, TupleList},
    },
    types::error::DatabaseError,
};

#[test]
fn test_new_allocator_is_empty() -> Result<(), DatabaseError> {
    let groups = TupleGroups::new(16, &StoreConfig::default())?;
    assert_eq!(groups.group_count(), 0);
    assert_eq!(groups.capacity(), 0);
    assert_eq!(groups.group_size(), 100);
    assert_eq!(groups.tuple_size(), 16);
    assert!(groups.tuple(0).is_none());
    Ok(())
}

#[test]
fn test_zero_group_size_is_rejected() {
    let config = StoreConfig::default().with_group_size(0);
    assert!(matches!(
        TupleGroups::new(8, &config),
        Err(DatabaseError::InvalidData { .. })
    ));
}

#[test]
fn test_allocate_group_fills_free_list() -> Result<(), DatabaseError> {
    let mut groups = TupleGroups::new(16, &StoreConfig::default().with_group_size(4))?;
    let mut free = TupleList::new(ListKind::Free);

    assert_eq!(groups.allocate_group(&mut free)?, 0);
    assert_eq!(groups.capacity(), 4);
    assert_eq!(free.len(), 4);
    // Lowest slot first
    assert_eq!(free.iter(&groups).collect::<Vec<_>>(), vec![0, 1, 2, 3]);

    assert_eq!(groups.allocate_group(&mut free)?, 1);
    assert_eq!(free.len(), 8);
    assert_eq!(free.first(), Some(4));
    assert_eq!(free.last(), Some(3));
    Ok(())
}

#[test]
fn test_group_memory_is_zeroed_and_sized() -> Result<(), DatabaseError> {
    let mut groups = TupleGroups::new(10, &StoreConfig::default().with_group_size(3))?;
    let mut free = TupleList::new(ListKind::Free);
    groups.allocate_group(&mut free)?;

    for slot in 0..3 {
        let tuple = groups.tuple(slot).unwrap();
        assert_eq!(tuple.len(), 10);
        assert!(tuple.iter().all(|&b| b == 0));
        assert_eq!(groups.link(slot).unwrap().owner, Some(ListKind::Free));
    }
    assert!(groups.tuple(3).is_none());
    assert!(!groups.contains(3));
    Ok(())
}

#[test]
fn test_slots_do_not_overlap() -> Result<(), DatabaseError> {
    let mut groups = TupleGroups::new(8, &StoreConfig::default().with_group_size(2))?;
    let mut free = TupleList::new(ListKind::Free);
    groups.allocate_group(&mut free)?;
    groups.allocate_group(&mut free)?;

    for slot in 0..4 {
        groups.tuple_mut(slot).unwrap().fill(slot as u8 + 1);
    }
    for slot in 0..4 {
        assert!(groups.tuple(slot).unwrap().iter().all(|&b| b == slot as u8 + 1));
    }
    Ok(())
}

#[test]
fn test_group_limit_leaves_state_unchanged() -> Result<(), DatabaseError> {
    let config = StoreConfig::default().with_group_size(2).with_max_groups(1);
    let mut groups = TupleGroups::new(8, &config)?;
    let mut free = TupleList::new(ListKind::Free);

    groups.allocate_group(&mut free)?;
    match groups.allocate_group(&mut free) {
        Err(DatabaseError::GroupLimitReached { limit }) => assert_eq!(limit, 1),
        other => panic!("Expected GroupLimitReached, got {:?}", other),
    }
    assert_eq!(groups.group_count(), 1);
    assert_eq!(free.len(), 2);
    Ok(())
}

#[test]
fn test_earlier_slots_survive_growth() -> Result<(), DatabaseError> {
    let mut groups = TupleGroups::new(4, &StoreConfig::default().with_group_size(1))?;
    let mut free = TupleList::new(ListKind::Free);
    groups.allocate_group(&mut free)?;
    groups.tuple_mut(0).unwrap().copy_from_slice(&[1, 2, 3, 4]);

    for _ in 0..10 {
        groups.allocate_group(&mut free)?;
    }
    assert_eq!(groups.tuple(0).unwrap(), &[1, 2, 3, 4]);
    assert_eq!(groups.capacity(), 11);
    Ok(())
}
