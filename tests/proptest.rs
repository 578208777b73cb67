//! Property-based tests using proptest.
//!
//! Random arithmetic expressions are rendered to text with the fewest
//! parentheses that keep their shape, evaluated, and compared with a direct
//! evaluation of the generated tree. The watchpoint pool is driven with
//! random create / delete sequences and checked against a simple model.

use std::collections::BTreeSet;

use proptest::prelude::*;
use sdb::expr::{evaluate_expression, EvalError};
use sdb::machine::Machine;
use sdb::watchpoint::{WatchpointError, WatchpointPool};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
        }
    }

    fn tier(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
        }
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Num(u32),
    Neg(u32),
    Hex(u32),
    Bin(Op, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Tree value with 32-bit wrapping; `None` on division by zero
    fn value(&self) -> Option<i32> {
        match self {
            Expr::Num(n) => Some(*n as i32),
            Expr::Neg(n) => Some((*n as i32).wrapping_neg()),
            Expr::Hex(n) => Some(*n as i32),
            Expr::Bin(op, lhs, rhs) => {
                let l = lhs.value()?;
                let r = rhs.value()?;
                match op {
                    Op::Add => Some(l.wrapping_add(r)),
                    Op::Sub => Some(l.wrapping_sub(r)),
                    Op::Mul => Some(l.wrapping_mul(r)),
                    Op::Div => (r != 0).then(|| l.wrapping_div(r)),
                }
            }
        }
    }

    /// Binding tier of the outermost operator; atoms bind tightest
    fn tier(&self) -> u8 {
        match self {
            Expr::Bin(op, _, _) => op.tier(),
            _ => u8::MAX,
        }
    }

    fn render(&self) -> String {
        match self {
            Expr::Num(n) => n.to_string(),
            Expr::Neg(n) => format!("-{}", n),
            Expr::Hex(n) => format!("0x{:x}", n),
            Expr::Bin(op, lhs, rhs) => {
                let l = if lhs.tier() < op.tier() {
                    format!("({})", lhs.render())
                } else {
                    lhs.render()
                };
                let r = if rhs.tier() > op.tier() {
                    rhs.render()
                } else {
                    format!("({})", rhs.render())
                };
                format!("{} {} {}", l, op.symbol(), r)
            }
        }
    }
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop::sample::select(vec![Op::Add, Op::Sub, Op::Mul, Op::Div])
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        4 => (0u32..1000).prop_map(Expr::Num),
        2 => (0u32..=i32::MAX as u32).prop_map(Expr::Neg),
        1 => any::<u32>().prop_map(Expr::Hex),
        1 => Just(Expr::Num(0)),
    ];
    leaf.prop_recursive(6, 48, 2, |inner| {
        (arb_op(), inner.clone(), inner)
            .prop_map(|(op, l, r)| Expr::Bin(op, Box::new(l), Box::new(r)))
    })
}

/// Arbitrary printable ASCII, including characters the lexer rejects
fn arb_input() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range(' ', '~'), 0..96)
        .prop_map(|v| v.into_iter().collect())
}

#[derive(Debug, Clone)]
enum PoolOp {
    Create,
    Delete(usize),
}

fn arb_pool_ops() -> impl Strategy<Value = Vec<PoolOp>> {
    prop::collection::vec(
        prop_oneof![
            Just(PoolOp::Create),
            (0usize..10).prop_map(PoolOp::Delete),
        ],
        0..64,
    )
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn evaluation_matches_tree(expr in arb_expr()) {
        let machine = Machine::default();
        let text = expr.render();
        let result = evaluate_expression(&text, &machine);

        match expr.value() {
            Some(value) => {
                prop_assert_eq!(result, Ok(value), "{}", text);
            }
            None => {
                prop_assert_eq!(result, Err(EvalError::DivisionByZero), "{}", text);
            }
        }
    }

    #[test]
    fn parenthesizing_changes_nothing(expr in arb_expr()) {
        let machine = Machine::default();
        let text = expr.render();
        prop_assert_eq!(
            evaluate_expression(&text, &machine),
            evaluate_expression(&format!("(({}))", text), &machine)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn arbitrary_input_never_panics(input in arb_input()) {
        let machine = Machine::default();
        let first = evaluate_expression(&input, &machine);
        let second = evaluate_expression(&input, &machine);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn pool_stays_partitioned(ops in arb_pool_ops()) {
        const CAPACITY: usize = 8;
        let machine = Machine::default();
        let mut pool = WatchpointPool::new(CAPACITY);
        let mut model: BTreeSet<usize> = BTreeSet::new();

        for op in ops {
            match op {
                PoolOp::Create => match pool.create("1 + 1", &machine) {
                    Ok(id) => {
                        prop_assert!(model.insert(id), "id {} handed out twice", id);
                    }
                    Err(e) => {
                        prop_assert_eq!(e, WatchpointError::PoolExhausted { capacity: CAPACITY });
                        prop_assert_eq!(model.len(), CAPACITY);
                    }
                },
                PoolOp::Delete(id) => {
                    let expected = model.remove(&id);
                    prop_assert_eq!(pool.release(id).is_ok(), expected);
                }
            }

            prop_assert!(pool.is_partitioned());
            prop_assert_eq!(pool.active_len(), model.len());
            prop_assert_eq!(pool.free_len(), CAPACITY - model.len());

            let listed: Vec<usize> = pool.list().iter().map(|wp| wp.id()).collect();
            let expected: Vec<usize> = model.iter().copied().collect();
            prop_assert_eq!(listed, expected);
        }
    }
}
