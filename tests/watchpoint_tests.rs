// Watchpoint pool behaviour through the public API

use sdb::expr::EvalError;
use sdb::machine::Machine;
use sdb::watchpoint::{WatchpointError, WatchpointPool, DEFAULT_WATCHPOINTS, WP_EXPR_MAX};

#[test]
fn test_create_list_delete() {
    let mut machine = Machine::default();
    machine.registers.set_by_name("a0", 3);
    let mut pool = WatchpointPool::new(DEFAULT_WATCHPOINTS);

    let a = pool.create("$a0", &machine).unwrap();
    let b = pool.create("$a0 * 2", &machine).unwrap();
    let c = pool.create("*0x80000000", &machine).unwrap();
    assert_eq!((a, b, c), (0, 1, 2));

    let listed: Vec<_> = pool
        .list()
        .iter()
        .map(|wp| (wp.id(), wp.expression().to_string(), wp.old_value()))
        .collect();
    assert_eq!(
        listed,
        vec![
            (0, "$a0".to_string(), 3),
            (1, "$a0 * 2".to_string(), 6),
            (2, "*0x80000000".to_string(), 0),
        ]
    );

    pool.release(b).unwrap();
    let ids: Vec<_> = pool.list().iter().map(|wp| wp.id()).collect();
    assert_eq!(ids, vec![0, 2]);
    assert!(pool.is_partitioned());
}

#[test]
fn test_fill_and_refill() {
    let machine = Machine::default();
    let mut pool = WatchpointPool::new(DEFAULT_WATCHPOINTS);

    for i in 0..DEFAULT_WATCHPOINTS {
        assert_eq!(pool.create("1", &machine), Ok(i));
    }
    assert_eq!(
        pool.create("1", &machine),
        Err(WatchpointError::PoolExhausted {
            capacity: DEFAULT_WATCHPOINTS
        })
    );

    pool.release(5).unwrap();
    pool.release(17).unwrap();
    // freed slots come back in release order
    assert_eq!(pool.create("2", &machine), Ok(5));
    assert_eq!(pool.create("3", &machine), Ok(17));
    assert_eq!(pool.free_len(), 0);
    assert!(pool.is_partitioned());
}

#[test]
fn test_bad_expression_is_rejected() {
    let machine = Machine::default();
    let mut pool = WatchpointPool::new(2);

    assert_eq!(
        pool.create("$nope", &machine),
        Err(WatchpointError::Eval(EvalError::UnresolvedRegister(
            "nope".to_string()
        )))
    );
    assert_eq!(
        pool.create("*0", &machine),
        Err(WatchpointError::Eval(EvalError::AddressOutOfRange(0)))
    );
    assert_eq!(pool.active_len(), 0);
    assert_eq!(pool.create("0", &machine), Ok(0));
}

#[test]
fn test_long_expression_is_rejected() {
    let machine = Machine::default();
    let mut pool = WatchpointPool::new(1);
    let text = format!("{}0", "1 + ".repeat(60));

    assert_eq!(
        pool.create(&text, &machine),
        Err(WatchpointError::ExpressionTooLong {
            len: text.len(),
            max: WP_EXPR_MAX
        })
    );
    assert_eq!(pool.active_len(), 0);
    assert_eq!(pool.free_len(), 1);
}

#[test]
fn test_delete_twice() {
    let machine = Machine::default();
    let mut pool = WatchpointPool::new(4);
    let id = pool.create("1", &machine).unwrap();

    pool.release(id).unwrap();
    assert_eq!(pool.release(id), Err(WatchpointError::NotFound { id }));
    assert!(pool.get(id).is_none());
}
