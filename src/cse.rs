use crate::{
    expression::{assemble, Expr, ExprKind, Name, Slot, Step},
    hasher::{KeyStrategy, MethodStrategy},
    map::ChainedMap,
};
use std::mem;
use tracing::trace;

/// Counters from one elimination run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eliminated {
    /// Distinct subtrees numbered, i.e. the last slot handed out.
    pub slots_assigned: usize,
    /// Repeated subtrees replaced by a slot reference.
    pub references_emitted: usize,
}

// Memo table of seen subtrees, valid for a single tree.
struct SlotTable<K> {
    slots: ChainedMap<K, Slot>,
    next_slot: Slot,
    stats: Eliminated,
}

impl<K> SlotTable<K>
where
    MethodStrategy: KeyStrategy<K>,
{
    fn new() -> Self {
        Self {
            slots: ChainedMap::new(),
            next_slot: 1,
            stats: Eliminated::default(),
        }
    }

    fn lookup(&mut self, key: &K) -> Option<Slot> {
        let slot = self.slots.get(key).copied();
        if slot.is_some() {
            self.stats.references_emitted += 1;
        }
        slot
    }

    fn assign(&mut self, key: K) {
        let slot = self.next_slot;
        self.slots.insert(key, slot);
        self.next_slot += 1;
        self.stats.slots_assigned += 1;
        trace!(slot, "assigned slot");
    }
}

/// Returns a copy of `expr` where every repeated subtree is replaced by the
/// slot of its first pre-order occurrence. `expr` is left untouched.
///
/// ```
/// use cse_rust::{eliminate, Parser};
/// let e = Parser::parse("g(h(a,b),h(a,b))").unwrap();
/// assert_eq!(eliminate(&e).to_string(), "g(h(a,b),2)");
/// ```
pub fn eliminate(expr: &Expr) -> Expr {
    eliminate_with_stats(expr).0
}

pub fn eliminate_with_stats(expr: &Expr) -> (Expr, Eliminated) {
    let mut table = SlotTable::new();
    let mut decisions = number(expr, &mut table).into_iter();
    let result = expr.rebuild_with(|_| match decisions.next().flatten() {
        Some(slot) => Step::Leaf(Expr::reference(slot)),
        None => Step::Descend,
    });
    (result, table.stats)
}

// Pre-order walk over the borrowed tree. Yields one entry per visited node:
// the slot it repeats, or `None` for a first occurrence. Children of a
// repeated node are not visited and get no entry.
fn number<'a>(expr: &'a Expr, table: &mut SlotTable<&'a Expr>) -> Vec<Option<Slot>> {
    let mut decisions = Vec::new();
    let mut pending = vec![expr];
    while let Some(expr) = pending.pop() {
        let slot = table.lookup(&expr);
        decisions.push(slot);
        if slot.is_some() {
            continue;
        }
        table.assign(expr);
        if let ExprKind::Application { left, right, .. } = expr.kind() {
            pending.push(right);
            pending.push(left);
        }
    }
    decisions
}

/// Same rewrite as [`eliminate`], applied to `expr` in place.
///
/// Surviving nodes are moved into the result rather than copied, and
/// repeated subtrees are dropped.
///
/// ```
/// use cse_rust::{eliminate_in_place, Parser};
/// let mut e = Parser::parse("f(x,f(x,y))").unwrap();
/// eliminate_in_place(&mut e);
/// assert_eq!(e.to_string(), "f(x,f(2,y))");
/// ```
pub fn eliminate_in_place(expr: &mut Expr) {
    eliminate_in_place_with_stats(expr);
}

pub fn eliminate_in_place_with_stats(expr: &mut Expr) -> Eliminated {
    // Keys borrow the tree, so numbering finishes before anything moves.
    let (decisions, stats) = {
        let mut table = SlotTable::new();
        let decisions = number(expr, &mut table);
        (decisions, table.stats)
    };
    let root = mem::replace(expr, Expr::reference(0));
    *expr = replace_repeats(root, decisions);
    stats
}

fn replace_repeats(root: Expr, decisions: Vec<Option<Slot>>) -> Expr {
    enum Task {
        Visit(Expr),
        Build(Name),
    }
    let mut decisions = decisions.into_iter();
    let mut tasks = vec![Task::Visit(root)];
    let mut built = Vec::new();
    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(expr) => {
                if let Some(slot) = decisions.next().flatten() {
                    built.push(Expr::reference(slot));
                    continue;
                }
                match expr.into_application() {
                    Ok((operator, left, right)) => {
                        tasks.push(Task::Build(operator));
                        tasks.push(Task::Visit(right));
                        tasks.push(Task::Visit(left));
                    }
                    Err(leaf) => built.push(leaf),
                }
            }
            Task::Build(operator) => assemble(operator, &mut built),
        }
    }
    built.pop().unwrap_or_else(|| Expr::reference(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::Parser, printer::render};

    fn both_modes(input: &str) -> (String, String) {
        let original = Parser::parse(input).unwrap();
        let copied = eliminate(&original);
        assert_eq!(render(&original), input, "input must stay untouched");
        let mut in_place = original;
        eliminate_in_place(&mut in_place);
        (render(&copied), render(&in_place))
    }

    fn check(input: &str, expected: &str) {
        let (copied, in_place) = both_modes(input);
        assert_eq!(copied, expected);
        assert_eq!(in_place, expected);
    }

    #[test]
    fn lone_variable_unchanged() {
        check("x", "x");
    }

    #[test]
    fn repeated_leaf() {
        check("f(x,x)", "f(x,2)");
        check("f(a,a)", "f(a,2)");
    }

    #[test]
    fn first_occurrence_numbering() {
        check("f(x,f(x,y))", "f(x,f(2,y))");
    }

    #[test]
    fn repeated_subtree_replaced_wholesale() {
        check("g(h(a,b),h(a,b))", "g(h(a,b),2)");
    }

    #[test]
    fn no_repeats() {
        check("f(a,g(b,c))", "f(a,g(b,c))");
    }

    #[test]
    fn name_shared_by_variable_and_operator() {
        // `f` the leaf and `f(..)` the application are different subtrees.
        check("f(f,f(f,f))", "f(f,f(2,2))");
    }

    #[test]
    fn repeat_across_levels() {
        check(
            "a(b(c(x,y),d),b(c(x,y),d))",
            "a(b(c(x,y),d),2)",
        );
        check("a(c(x,y),b(c(x,y),x))", "a(c(x,y),b(2,3))");
    }

    #[test]
    fn stats() {
        let e = Parser::parse("g(h(a,b),h(a,b))").unwrap();
        let (_, stats) = eliminate_with_stats(&e);
        assert_eq!(
            stats,
            Eliminated {
                slots_assigned: 4,
                references_emitted: 1
            }
        );
        let mut e = e;
        assert_eq!(eliminate_in_place_with_stats(&mut e), stats);
    }

    #[test]
    fn in_place_result_hash_is_fresh() {
        let mut e = Parser::parse("g(h(a,b),h(a,b))").unwrap();
        eliminate_in_place(&mut e);
        let expected =
            Expr::application("g", Parser::parse("h(a,b)").unwrap(), Expr::reference(2)).unwrap();
        assert_eq!(e.structural_hash(), expected.structural_hash());
        assert_eq!(e, expected);
    }

    // f(f(...f(a,b)...,b),b): every `b` after the innermost one repeats.
    fn left_chain(depth: usize) -> Expr {
        let mut e = Parser::parse("a").unwrap();
        for _ in 0..depth {
            e = Expr::application("f", e, Expr::variable("b").unwrap()).unwrap();
        }
        e
    }

    fn left_chain_eliminated(depth: usize) -> String {
        format!(
            "{}a,b){}",
            "f(".repeat(depth),
            format!(",{})", depth + 2).repeat(depth - 1)
        )
    }

    #[test]
    fn deep_chain_small() {
        assert_eq!(render(&eliminate(&left_chain(2))), "f(f(a,b),4)");
        assert_eq!(left_chain_eliminated(2), "f(f(a,b),4)");
    }

    #[test]
    fn deep_chain_both_modes() {
        let depth = 100_000;
        let expected = left_chain_eliminated(depth);
        let stats = Eliminated {
            slots_assigned: depth + 2,
            references_emitted: depth - 1,
        };

        let original = left_chain(depth);
        let (copied, copied_stats) = eliminate_with_stats(&original);
        assert_eq!(render(&copied), expected);
        assert_eq!(copied_stats, stats);
        assert_eq!(original.node_count(), 2 * depth + 1);

        let mut in_place = original;
        assert_eq!(eliminate_in_place_with_stats(&mut in_place), stats);
        assert_eq!(render(&in_place), expected);
        assert_eq!(in_place, copied);
        assert_eq!(in_place.structural_hash(), copied.structural_hash());
    }

    #[test]
    fn deep_repeated_subtree_collapses() {
        let depth = 50_000;
        let shared = left_chain(depth);
        let mut e = Expr::application("g", shared.clone(), shared).unwrap();
        let stats = eliminate_in_place_with_stats(&mut e);
        assert_eq!(stats.references_emitted, depth);
        match e.kind() {
            ExprKind::Application { right, .. } => assert_eq!(**right, Expr::reference(2)),
            other => panic!("unexpected root {:?}", other),
        }
        assert_eq!(e.node_count(), 2 * depth + 3);
    }

    #[test]
    fn table_is_not_shared_between_runs() {
        let e = Parser::parse("f(a,a)").unwrap();
        assert_eq!(render(&eliminate(&e)), "f(a,2)");
        assert_eq!(render(&eliminate(&e)), "f(a,2)");
    }
}
