//! Random edit sequences keep the graph structurally valid.

use halfedge_topo::io::flat;
use halfedge_topo::prelude::*;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Create,
    SelfLoop,
    Twist(usize, usize),
    Split(usize),
    Heal(usize),
    Join(usize, usize),
    Drop(usize),
    Yank(usize),
    Excise(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        1 => Just(Op::SelfLoop),
        4 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Twist(a, b)),
        2 => any::<usize>().prop_map(Op::Split),
        2 => any::<usize>().prop_map(Op::Heal),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Join(a, b)),
        1 => any::<usize>().prop_map(Op::Drop),
        1 => any::<usize>().prop_map(Op::Yank),
        1 => any::<usize>().prop_map(Op::Excise),
    ]
}

fn pick(ids: &[HalfEdgeId], k: usize) -> Option<HalfEdgeId> {
    (!ids.is_empty()).then(|| ids[k % ids.len()])
}

/// Apply `op`; errors are allowed but must leave the graph untouched.
fn apply(g: &mut HalfEdgeGraph, op: &Op) {
    let ids: Vec<_> = g.active_ids().collect();
    let before = flat::store(g);
    let result = match *op {
        Op::Create => g.create_edge().map(drop),
        Op::SelfLoop => g.create_self_loop().map(drop),
        Op::Twist(a, b) => match (pick(&ids, a), pick(&ids, b)) {
            (Some(a), Some(b)) => g.vertex_twist(a, b),
            _ => Ok(()),
        },
        Op::Split(a) => match pick(&ids, a) {
            Some(a) => g.split_edge(a).map(drop),
            None => Ok(()),
        },
        Op::Heal(a) => match pick(&ids, a) {
            Some(a) => g.heal_edge(a),
            None => Ok(()),
        },
        Op::Join(a, b) => match (pick(&ids, a), pick(&ids, b)) {
            (Some(a), Some(b)) => g.join(a, b, Mask::NONE, Mask::NONE).map(drop),
            _ => Ok(()),
        },
        Op::Drop(a) => match pick(&ids, a) {
            Some(a) => g.drop_edge(a),
            None => Ok(()),
        },
        Op::Yank(a) => match pick(&ids, a) {
            Some(a) => g.yank_edge_from_vertex(a).map(drop),
            None => Ok(()),
        },
        Op::Excise(a) => match pick(&ids, a) {
            Some(a) => g.excise_sliver_face(a),
            None => Ok(()),
        },
    };
    if result.is_err() {
        assert_eq!(flat::store(g), before, "failed {op:?} changed the graph");
    }
}

proptest! {
    #[test]
    fn edits_preserve_structure(ops in prop::collection::vec(op(), 1..60)) {
        let mut g = HalfEdgeGraph::new();
        let tag = g.define_label(1, PropertyClass::EDGE, 5).unwrap();
        for op in &ops {
            apply(&mut g, op);
            prop_assert!(validate_graph(&g, ValidationOptions::default()).is_ok());
        }

        prop_assert_eq!(g.active_count() % 2, 0);
        prop_assert_eq!(g.active_count() + g.free_count(), g.slot_count());
        for id in g.active_ids() {
            let m = g.edge_mate(id).unwrap();
            prop_assert_ne!(m, id);
            prop_assert_eq!(g.edge_mate(m).unwrap(), id);
            prop_assert_eq!(g.try_get_label(id, tag).unwrap(), 5);
        }

        let faces = collect_loops(&mut g, LoopKind::Face).unwrap();
        let covered: usize = faces.iter().map(|&s| g.count_around_face(s).unwrap()).sum();
        prop_assert_eq!(covered, g.active_count());
        prop_assert_eq!(g.free_mask_count(), 16);

        let back = flat::load(&flat::store(&g)).unwrap();
        prop_assert_eq!(back.active_count(), g.active_count());
    }

    #[test]
    fn components_partition_the_half_edges(ops in prop::collection::vec(op(), 1..40)) {
        let mut g = HalfEdgeGraph::new();
        for op in &ops {
            apply(&mut g, op);
        }
        let comps = connected_components(&mut g, ComponentScope::Node).unwrap();
        let mut all: Vec<_> = comps.into_iter().flatten().collect();
        all.sort_unstable();
        let mut want: Vec<_> = g.active_ids().collect();
        want.sort_unstable();
        prop_assert_eq!(all, want);
        prop_assert_eq!(g.free_mask_count(), 16);
    }
}
