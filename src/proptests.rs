//! Property-based tests for the structural model and the eliminator.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{
        eliminate, eliminate_in_place, eliminate_with_stats, render, ChainedSet, Expr, ExprKind,
        Parser,
    };

    // Small alphabets so that generated trees share subtrees often.
    fn expr() -> impl Strategy<Value = Expr> {
        let leaf = prop::sample::select(vec!["a", "b", "c"])
            .prop_map(|name| Expr::variable(name).unwrap());
        leaf.prop_recursive(6, 64, 2, |inner| {
            (prop::sample::select(vec!["f", "g"]), inner.clone(), inner)
                .prop_map(|(op, left, right)| Expr::application(op, left, right).unwrap())
        })
    }

    fn subtrees(expr: &Expr) -> Vec<&Expr> {
        let mut result = Vec::new();
        let mut pending = vec![expr];
        while let Some(e) = pending.pop() {
            result.push(e);
            if let ExprKind::Application { left, right, .. } = e.kind() {
                pending.push(right);
                pending.push(left);
            }
        }
        result
    }

    // Quadratic reference count of distinct subtrees.
    fn distinct_subtrees(expr: &Expr) -> usize {
        let mut seen: Vec<&Expr> = Vec::new();
        for e in subtrees(expr) {
            if !seen.iter().any(|s| s.structural_eq(e)) {
                seen.push(e);
            }
        }
        seen.len()
    }

    proptest! {
        #[test]
        fn equality_reflexive(a in expr()) {
            prop_assert!(a.structural_eq(&a));
            prop_assert!(a.structural_eq(&a.clone()));
        }

        #[test]
        fn equality_symmetric(a in expr(), b in expr()) {
            prop_assert_eq!(a.structural_eq(&b), b.structural_eq(&a));
        }

        #[test]
        fn equality_transitive(a in expr(), b in expr(), c in expr()) {
            if a.structural_eq(&b) && b.structural_eq(&c) {
                prop_assert!(a.structural_eq(&c));
            }
        }

        #[test]
        fn equal_implies_same_hash(a in expr(), b in expr()) {
            if a.structural_eq(&b) {
                prop_assert_eq!(a.structural_hash(), b.structural_hash());
            }
            let reparsed = Parser::parse(&render(&a)).unwrap();
            prop_assert!(reparsed.structural_eq(&a));
            prop_assert_eq!(reparsed.structural_hash(), a.structural_hash());
        }

        #[test]
        fn render_parse_round_trip(a in expr()) {
            let text = render(&a);
            prop_assert_eq!(render(&Parser::parse(&text).unwrap()), text);
        }

        #[test]
        fn set_holds_no_duplicates(a in expr()) {
            let mut set = ChainedSet::new();
            for e in subtrees(&a) {
                set.insert(e.clone());
            }
            prop_assert_eq!(set.len(), distinct_subtrees(&a));

            // Same answer when every key collides.
            let mut colliding = ChainedSet::with_funcs(|_: &Expr| 0, |x: &Expr, y: &Expr| x.structural_eq(y));
            for e in subtrees(&a) {
                colliding.insert(e.clone());
            }
            prop_assert_eq!(colliding.len(), set.len());
        }

        #[test]
        fn modes_agree(a in expr()) {
            let copied = eliminate(&a);
            let mut in_place = a.clone();
            eliminate_in_place(&mut in_place);
            prop_assert_eq!(render(&copied), render(&in_place));
            prop_assert_eq!(copied.structural_hash(), in_place.structural_hash());
        }

        #[test]
        fn one_slot_per_distinct_subtree(a in expr()) {
            let (once, stats) = eliminate_with_stats(&a);
            prop_assert_eq!(stats.slots_assigned, distinct_subtrees(&a));

            // References in the output are opaque atoms on a second pass.
            let (_, again) = eliminate_with_stats(&once);
            prop_assert_eq!(again.slots_assigned, distinct_subtrees(&once));
        }

        #[test]
        fn output_never_grows(a in expr()) {
            prop_assert!(eliminate(&a).node_count() <= a.node_count());
        }

        #[test]
        fn lone_variable_unchanged(name in "[A-Za-z]{1,8}") {
            let v = Expr::variable(&name).unwrap();
            prop_assert_eq!(render(&eliminate(&v)), name.clone());
            let mut w = v.clone();
            eliminate_in_place(&mut w);
            prop_assert_eq!(render(&w), name);
        }
    }
}
