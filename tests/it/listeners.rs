//! Event delivery to registered listeners.

use basefee_pool::{
    test_utils::{MockHeadSupplier, MockTransaction},
    Pool, PoolConfig, PoolTransaction, TransactionEvent, TransactionOrigin,
};

fn pool_with_capacity(max_pending_transactions: usize) -> Pool<MockTransaction> {
    Pool::new(
        PoolConfig { max_pending_transactions, ..Default::default() },
        &MockHeadSupplier::with_base_fee(100),
    )
}

#[test]
fn added_event_carries_the_transaction() {
    let pool = pool_with_capacity(16);
    let mut events = pool.add_listener();

    let tx = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
    pool.add_transaction(TransactionOrigin::External, tx.clone()).unwrap();

    match events.try_next().unwrap().unwrap() {
        TransactionEvent::Added(added) => assert_eq!(added.hash(), tx.hash()),
        other => panic!("expected added event, got {other:?}"),
    }
    assert!(events.try_next().is_err());
}

#[test]
fn eviction_emits_added_then_dropped() {
    let pool = pool_with_capacity(1);
    let mut events = pool.add_listener();

    let a = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
    pool.add_transaction(TransactionOrigin::External, a).unwrap();
    assert!(matches!(events.try_next().unwrap().unwrap(), TransactionEvent::Added(_)));

    // worse than the incumbent: admitted, then immediately evicted
    let d = MockTransaction::eip1559().with_max_fee(102).with_priority_fee(1);
    pool.add_transaction(TransactionOrigin::External, d.clone()).unwrap();

    match events.try_next().unwrap().unwrap() {
        TransactionEvent::Added(added) => assert_eq!(added.hash(), d.hash()),
        other => panic!("expected added event, got {other:?}"),
    }
    match events.try_next().unwrap().unwrap() {
        TransactionEvent::Dropped(dropped) => assert_eq!(dropped.hash(), d.hash()),
        other => panic!("expected dropped event, got {other:?}"),
    }
}

#[test]
fn replacement_emits_replaced_with_successor_hash() {
    let pool = pool_with_capacity(16);
    let sender = alloy_primitives::Address::with_last_byte(5);
    let incumbent = MockTransaction::legacy().with_sender(sender).with_gas_price(100);
    pool.add_transaction(TransactionOrigin::External, incumbent.clone()).unwrap();

    let mut events = pool.add_listener();
    let replacement = MockTransaction::legacy().with_sender(sender).with_gas_price(200);
    pool.add_transaction(TransactionOrigin::External, replacement.clone()).unwrap();

    let mut saw_added = false;
    let mut saw_replaced = false;
    while let Ok(Some(event)) = events.try_next() {
        match event {
            TransactionEvent::Added(added) => {
                assert_eq!(added.hash(), replacement.hash());
                saw_added = true;
            }
            TransactionEvent::Replaced { transaction, replaced_by } => {
                assert_eq!(transaction.hash(), incumbent.hash());
                assert_eq!(&replaced_by, replacement.hash());
                saw_replaced = true;
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert!(saw_added && saw_replaced);
}

#[test]
fn block_inclusion_and_invalidation_are_distinguished() {
    let pool = pool_with_capacity(16);
    let mined = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
    let invalid = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(5);
    pool.add_transaction(TransactionOrigin::External, mined.clone()).unwrap();
    pool.add_transaction(TransactionOrigin::External, invalid.clone()).unwrap();

    let mut events = pool.add_listener();
    pool.remove_transaction(mined.hash(), true).unwrap();
    pool.remove_transaction(invalid.hash(), false).unwrap();

    match events.try_next().unwrap().unwrap() {
        TransactionEvent::IncludedInBlock(tx) => assert_eq!(tx.hash(), mined.hash()),
        other => panic!("expected included event, got {other:?}"),
    }
    match events.try_next().unwrap().unwrap() {
        TransactionEvent::Dropped(tx) => assert_eq!(tx.hash(), invalid.hash()),
        other => panic!("expected dropped event, got {other:?}"),
    }
    assert_eq!(pool.size(), 0);
}

#[test]
fn dead_listeners_are_pruned() {
    let pool = pool_with_capacity(16);
    let events = pool.add_listener();
    drop(events);

    // must not fail to deliver to remaining listeners
    let mut live = pool.add_listener();
    let tx = MockTransaction::eip1559();
    pool.add_transaction(TransactionOrigin::External, tx).unwrap();
    assert!(matches!(live.try_next().unwrap().unwrap(), TransactionEvent::Added(_)));
}
