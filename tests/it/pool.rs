//! Pool ordering, migration and eviction exercised through the public API.

use basefee_pool::{
    test_utils::{MockHeadSupplier, MockTransaction},
    Pool, PoolConfig, PoolErrorKind, PoolTransaction, TransactionOrigin,
};
use rand::seq::SliceRandom;

fn pool_at(base_fee: u64) -> Pool<MockTransaction> {
    Pool::new(PoolConfig::default(), &MockHeadSupplier::with_base_fee(base_fee))
}

fn add(pool: &Pool<MockTransaction>, tx: &MockTransaction) {
    pool.add_transaction(TransactionOrigin::External, tx.clone()).unwrap();
}

fn pending_hashes(pool: &Pool<MockTransaction>) -> Vec<alloy_primitives::TxHash> {
    pool.pending_transactions().iter().map(|tx| *tx.hash()).collect()
}

#[test]
fn static_range_orders_by_tip() {
    let pool = pool_at(100);
    // effective = min(10, 200 - 100) = 10, static
    let a = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
    // effective = min(5, 50) = 5, static
    let b = MockTransaction::eip1559().with_max_fee(150).with_priority_fee(5);
    add(&pool, &b);
    add(&pool, &a);

    assert_eq!(pending_hashes(&pool), vec![*a.hash(), *b.hash()]);
    pool.pool_data().assert_invariants();
}

#[test]
fn dynamic_head_can_outrank_static_head() {
    let pool = pool_at(100);
    // effective = min(50, 20) = 20, dynamic
    let c = MockTransaction::eip1559().with_max_fee(120).with_priority_fee(50);
    // effective = 10, static
    let a = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
    add(&pool, &c);
    add(&pool, &a);

    assert_eq!(pending_hashes(&pool), vec![*c.hash(), *a.hash()]);
}

#[test]
fn base_fee_decrease_keeps_ranking_until_promotion() {
    let pool = pool_at(100);
    let c = MockTransaction::eip1559().with_max_fee(120).with_priority_fee(50);
    let a = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
    add(&pool, &c);
    add(&pool, &a);

    // at 80 the cap still binds for C: effective = min(50, 40) = 40
    pool.update_base_fee(80);
    assert_eq!(pool.base_fee(), Some(80));
    {
        let data = pool.pool_data();
        assert_eq!(data.static_range_hashes(), vec![*a.hash()]);
        assert_eq!(data.dynamic_range_hashes(), vec![*c.hash()]);
        data.assert_invariants();
    }
    assert_eq!(pending_hashes(&pool), vec![*c.hash(), *a.hash()]);

    // at 60 the cap no longer binds: effective = min(50, 60) = 50, promoted
    pool.update_base_fee(60);
    {
        let data = pool.pool_data();
        assert_eq!(data.static_range_hashes(), vec![*c.hash(), *a.hash()]);
        assert!(data.dynamic_range_hashes().is_empty());
        data.assert_invariants();
    }
    assert_eq!(pending_hashes(&pool), vec![*c.hash(), *a.hash()]);
}

#[test]
fn overflow_evicts_lowest_effective_fee() {
    let pool = Pool::new(
        PoolConfig { max_pending_transactions: 2, ..Default::default() },
        &MockHeadSupplier::with_base_fee(100),
    );
    // static, effective 10
    let a = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
    // dynamic, effective 20
    let c = MockTransaction::eip1559().with_max_fee(120).with_priority_fee(50);
    add(&pool, &a);
    add(&pool, &c);

    // effective min(1, 2) = 1, the smallest of the three: evicted immediately
    let d = MockTransaction::eip1559().with_max_fee(102).with_priority_fee(1);
    let outcome = pool.add_transaction(TransactionOrigin::External, d.clone()).unwrap();
    assert_eq!(outcome.discarded.unwrap().hash(), d.hash());

    assert_eq!(pool.size(), 2);
    assert!(pool.contains(a.hash()));
    assert!(pool.contains(c.hash()));
    assert!(!pool.contains(d.hash()));
    pool.pool_data().assert_invariants();
}

#[test]
fn replacement_requires_bump_and_keeps_size() {
    let pool = pool_at(100);
    let sender = alloy_primitives::Address::with_last_byte(42);
    let incumbent = MockTransaction::legacy().with_sender(sender).with_gas_price(100);
    add(&pool, &incumbent);

    // 105 < 110, rejected
    let low = MockTransaction::legacy().with_sender(sender).with_gas_price(105);
    let err = pool.add_transaction(TransactionOrigin::External, low).unwrap_err();
    assert_eq!(err.kind, PoolErrorKind::ReplacementUnderpriced);
    assert!(pool.contains(incumbent.hash()));

    // 115 >= 110, replaces
    let high = MockTransaction::legacy().with_sender(sender).with_gas_price(115);
    let outcome = pool.add_transaction(TransactionOrigin::External, high.clone()).unwrap();
    assert_eq!(outcome.replaced.unwrap().hash(), incumbent.hash());

    assert_eq!(pool.size(), 1);
    assert!(pool.contains(high.hash()));
    assert!(!pool.contains(incumbent.hash()));
    pool.pool_data().assert_invariants();
}

#[test]
fn new_block_applies_header_base_fee() {
    let pool = pool_at(60);
    let c = MockTransaction::eip1559().with_max_fee(110).with_priority_fee(50);
    add(&pool, &c);
    assert_eq!(pool.pool_data().static_range_hashes(), vec![*c.hash()]);

    pool.on_new_block(&basefee_pool::HeadHeader { number: 1, base_fee_per_gas: Some(100) });
    assert_eq!(pool.base_fee(), Some(100));
    assert_eq!(pool.pool_data().dynamic_range_hashes(), vec![*c.hash()]);

    // pre-fee-market headers leave the base fee untouched
    pool.on_new_block(&basefee_pool::HeadHeader { number: 2, base_fee_per_gas: None });
    assert_eq!(pool.base_fee(), Some(100));
}

#[test]
fn local_transactions_outrank_and_are_listed() {
    let pool = pool_at(100);
    let remote = MockTransaction::eip1559().with_max_fee(300).with_priority_fee(30);
    let local = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(5);
    add(&pool, &remote);
    pool.add_transaction(TransactionOrigin::Local, local.clone()).unwrap();

    let locals = pool.local_transactions();
    assert_eq!(locals.len(), 1);
    assert_eq!(locals[0].hash(), local.hash());

    // both are static; the local one leads regardless of its lower tip
    assert_eq!(pending_hashes(&pool), vec![*local.hash(), *remote.hash()]);
}

#[test]
fn announced_hashes_are_consumed_on_add() {
    let pool = pool_at(100);
    let tx = MockTransaction::eip1559();
    pool.mark_announced(*tx.hash());
    assert!(pool.is_announced(tx.hash()));

    add(&pool, &tx);
    assert!(!pool.is_announced(tx.hash()));
}

#[test]
fn ordering_is_insertion_order_independent() {
    // distinct fees so the ranking has a single valid order
    let txs: Vec<MockTransaction> = (0..20)
        .map(|i| {
            MockTransaction::eip1559()
                .with_max_fee(200 + i as u128)
                .with_priority_fee(10 + i as u128)
        })
        .collect();

    let reference = pool_at(100);
    for tx in &txs {
        add(&reference, tx);
    }
    let expected = pending_hashes(&reference);

    let mut shuffled = txs;
    shuffled.shuffle(&mut rand::thread_rng());
    let pool = pool_at(100);
    for tx in &shuffled {
        add(&pool, tx);
    }
    assert_eq!(pending_hashes(&pool), expected);
}
