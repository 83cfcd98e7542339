//! Per-half-edge integer labels.
//!
//! A label is declared once with a tag, a default value, and a
//! [`PropertyClass`] saying where its value is meant to be constant: around
//! vertices, along edges, around faces, or only at a single corner. Each
//! declared label owns a dense `i32` array parallel to the node arena; slots
//! are reset to the default whenever they are allocated or released.
//!
//! The property class drives copying during edits: `split_edge` copies
//! edge- and face-class labels onto the inserted half-edges, `join` copies
//! vertex- and sector-class labels. The corners at the vertex `split_edge`
//! inserts are new, so their sector-class labels start at the default.

use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{HalfEdgeGraph, LoopStep};
use crate::topology::mask::{Mask, PropertyClass};
use crate::topology::node::HalfEdgeId;

/// Handle of a declared label.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct LabelIndex(u32);

impl LabelIndex {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declaration of one label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LabelDef {
    pub tag: i32,
    pub default: i32,
    pub property: PropertyClass,
}

/// Coarsest constancy observed for a label's stored values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LabelClassification {
    /// Constant around every face, every vertex, and along every edge.
    FaceConstant,
    /// Constant around every vertex.
    VertexConstant,
    /// Equal on both halves of every edge.
    EdgeConstant,
    Varies,
}

/// The three individual constancy checks behind [`LabelClassification`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelConstancy {
    pub face: bool,
    pub vertex: bool,
    pub edge: bool,
}

impl LabelConstancy {
    pub fn classification(self) -> LabelClassification {
        if self.face && self.vertex && self.edge {
            LabelClassification::FaceConstant
        } else if self.vertex {
            LabelClassification::VertexConstant
        } else if self.edge {
            LabelClassification::EdgeConstant
        } else {
            LabelClassification::Varies
        }
    }
}

/// Label declarations plus their value arrays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LabelTable {
    defs: Vec<LabelDef>,
    values: Vec<Vec<i32>>,
    max_labels: usize,
}

impl LabelTable {
    pub(crate) fn new(max_labels: usize) -> Self {
        Self {
            defs: Vec::new(),
            values: Vec::new(),
            max_labels,
        }
    }

    /// Rebuild from decoded parts; every value array must already match the
    /// slot count.
    pub(crate) fn from_parts(
        defs: Vec<LabelDef>,
        values: Vec<Vec<i32>>,
        max_labels: usize,
    ) -> Self {
        let max_labels = max_labels.max(defs.len());
        Self {
            defs,
            values,
            max_labels,
        }
    }

    pub(crate) fn define(
        &mut self,
        def: LabelDef,
        slots: usize,
    ) -> Result<LabelIndex, MeshGraphError> {
        if self.defs.len() >= self.max_labels {
            return Err(MeshGraphError::LabelCapacityExceeded {
                max: self.max_labels,
            });
        }
        let index = LabelIndex(self.defs.len() as u32);
        self.defs.push(def);
        self.values.push(vec![def.default; slots]);
        Ok(index)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.defs.len()
    }

    pub(crate) fn defs(&self) -> &[LabelDef] {
        &self.defs
    }

    pub(crate) fn values(&self, label: LabelIndex) -> &[i32] {
        &self.values[label.index()]
    }

    pub(crate) fn check(&self, label: LabelIndex) -> Result<&LabelDef, MeshGraphError> {
        self.defs
            .get(label.index())
            .ok_or(MeshGraphError::InvalidLabelIndex(label.index()))
    }

    pub(crate) fn find_by_tag(&self, tag: i32) -> Option<LabelIndex> {
        self.defs
            .iter()
            .position(|d| d.tag == tag)
            .map(|i| LabelIndex(i as u32))
    }

    /// Extend every value array to `slots` entries.
    pub(crate) fn grow(&mut self, slots: usize) {
        for (def, vals) in self.defs.iter().zip(self.values.iter_mut()) {
            vals.resize(slots, def.default);
        }
    }

    pub(crate) fn reset_slot(&mut self, i: u32) {
        for (def, vals) in self.defs.iter().zip(self.values.iter_mut()) {
            vals[i as usize] = def.default;
        }
    }

    #[inline]
    pub(crate) fn get(&self, i: u32, label: LabelIndex) -> i32 {
        self.values[label.index()][i as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, i: u32, label: LabelIndex, value: i32) {
        self.values[label.index()][i as usize] = value;
    }

    /// Copy every label whose class intersects `property` from slot `from`
    /// to slot `to`.
    pub(crate) fn copy_where(&mut self, from: u32, to: u32, property: PropertyClass) {
        for (def, vals) in self.defs.iter().zip(self.values.iter_mut()) {
            if def.property.intersects(property) {
                vals[to as usize] = vals[from as usize];
            }
        }
    }
}

impl HalfEdgeGraph {
    /// Declare a label. Every existing slot starts at `default`.
    pub fn define_label(
        &mut self,
        tag: i32,
        property: PropertyClass,
        default: i32,
    ) -> Result<LabelIndex, MeshGraphError> {
        let slots = self.store.len();
        self.labels.define(
            LabelDef {
                tag,
                default,
                property,
            },
            slots,
        )
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn label_def(&self, label: LabelIndex) -> Option<&LabelDef> {
        self.labels.check(label).ok()
    }

    /// First label declared with `tag`.
    pub fn find_label(&self, tag: i32) -> Option<LabelIndex> {
        self.labels.find_by_tag(tag)
    }

    pub fn try_get_label(&self, id: HalfEdgeId, label: LabelIndex) -> Result<i32, MeshGraphError> {
        let i = self.resolve(id)?;
        self.labels.check(label)?;
        Ok(self.labels.get(i, label))
    }

    pub fn try_set_label(
        &mut self,
        id: HalfEdgeId,
        label: LabelIndex,
        value: i32,
    ) -> Result<(), MeshGraphError> {
        let i = self.resolve(id)?;
        self.labels.check(label)?;
        self.labels.set(i, label, value);
        Ok(())
    }

    pub fn set_label_around_face(
        &mut self,
        seed: HalfEdgeId,
        label: LabelIndex,
        value: i32,
    ) -> Result<(), MeshGraphError> {
        self.set_label_around(seed, LoopStep::Face, label, value)
    }

    pub fn set_label_around_vertex(
        &mut self,
        seed: HalfEdgeId,
        label: LabelIndex,
        value: i32,
    ) -> Result<(), MeshGraphError> {
        self.set_label_around(seed, LoopStep::Vertex, label, value)
    }

    fn set_label_around(
        &mut self,
        seed: HalfEdgeId,
        step: LoopStep,
        label: LabelIndex,
        value: i32,
    ) -> Result<(), MeshGraphError> {
        let start = self.resolve(seed)?;
        self.labels.check(label)?;
        let ring: Vec<u32> = self.raw_loop(start, step).collect();
        for i in ring {
            self.labels.set(i, label, value);
        }
        Ok(())
    }

    /// Classify the stored values of `label` over the half-edges reachable
    /// from `seeds`, skipping half-edges carrying `exterior`.
    ///
    /// `FaceConstant` requires the face, vertex and edge checks to hold
    /// together. A label that is constant around each face but differs
    /// between adjacent faces therefore comes back `Varies`; call
    /// [`label_constancy`](Self::label_constancy) to read the face check on
    /// its own.
    pub fn classify_label(
        &mut self,
        label: LabelIndex,
        seeds: &[HalfEdgeId],
        exterior: Mask,
    ) -> Result<LabelClassification, MeshGraphError> {
        Ok(self.label_constancy(label, seeds, exterior)?.classification())
    }

    /// Run the face, vertex and edge constancy checks individually.
    ///
    /// Each interior half-edge `i` is compared with `f_succ(i)`, `v_succ(i)`
    /// and `edge_mate(i)` whenever the neighbour is interior too.
    pub fn label_constancy(
        &mut self,
        label: LabelIndex,
        seeds: &[HalfEdgeId],
        exterior: Mask,
    ) -> Result<LabelConstancy, MeshGraphError> {
        self.labels.check(label)?;
        let starts = seeds
            .iter()
            .map(|&s| self.resolve(s))
            .collect::<Result<Vec<_>, _>>()?;

        let mut visit = self.scoped_mask()?;
        let seen = visit.mask();
        let mut stack = Vec::new();
        for s in starts {
            if !visit.has_mask_at(s, seen) {
                visit.set_mask_at(s, seen);
                stack.push(s);
            }
        }

        let mut out = LabelConstancy {
            face: true,
            vertex: true,
            edge: true,
        };
        while let Some(i) = stack.pop() {
            let g: &HalfEdgeGraph = &visit;
            let (f, v, m) = (g.fs(i), g.vs(i), g.mate(i));
            if !g.has_mask_at(i, exterior) {
                let value = g.labels.get(i, label);
                let differs =
                    |j: u32| !g.has_mask_at(j, exterior) && g.labels.get(j, label) != value;
                out.face &= !differs(f);
                out.vertex &= !differs(v);
                out.edge &= !differs(m);
            }
            for next in [f, v] {
                if !visit.has_mask_at(next, seen) {
                    visit.set_mask_at(next, seen);
                    stack.push(next);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_define_grow_reset() {
        let mut t = LabelTable::new(2);
        let a = t
            .define(
                LabelDef {
                    tag: 10,
                    default: -1,
                    property: PropertyClass::FACE,
                },
                2,
            )
            .unwrap();
        t.grow(4);
        assert_eq!(t.values(a), &[-1, -1, -1, -1]);
        t.set(3, a, 7);
        t.reset_slot(3);
        assert_eq!(t.get(3, a), -1);
        assert_eq!(t.find_by_tag(10), Some(a));
        assert_eq!(t.find_by_tag(11), None);
    }

    #[test]
    fn table_respects_capacity() {
        let mut t = LabelTable::new(1);
        let def = LabelDef {
            tag: 0,
            default: 0,
            property: PropertyClass::NONE,
        };
        t.define(def, 0).unwrap();
        assert_eq!(
            t.define(def, 0),
            Err(MeshGraphError::LabelCapacityExceeded { max: 1 })
        );
    }

    #[test]
    fn copy_where_filters_by_class() {
        let mut t = LabelTable::new(4);
        let v = t
            .define(
                LabelDef {
                    tag: 1,
                    default: 0,
                    property: PropertyClass::VERTEX,
                },
                2,
            )
            .unwrap();
        let e = t
            .define(
                LabelDef {
                    tag: 2,
                    default: 0,
                    property: PropertyClass::EDGE,
                },
                2,
            )
            .unwrap();
        t.set(0, v, 5);
        t.set(0, e, 6);
        t.copy_where(0, 1, PropertyClass::EDGE | PropertyClass::FACE);
        assert_eq!(t.get(1, v), 0);
        assert_eq!(t.get(1, e), 6);
    }

    #[test]
    fn constancy_ordering() {
        let all = LabelConstancy {
            face: true,
            vertex: true,
            edge: true,
        };
        assert_eq!(all.classification(), LabelClassification::FaceConstant);
        let face_only = LabelConstancy {
            face: true,
            vertex: false,
            edge: false,
        };
        assert_eq!(face_only.classification(), LabelClassification::Varies);
        let vertex_edge = LabelConstancy {
            face: false,
            vertex: true,
            edge: true,
        };
        assert_eq!(
            vertex_edge.classification(),
            LabelClassification::VertexConstant
        );
        let edge_only = LabelConstancy {
            face: false,
            vertex: false,
            edge: true,
        };
        assert_eq!(edge_only.classification(), LabelClassification::EdgeConstant);
    }

    #[test]
    fn def_serde_roundtrip() {
        let def = LabelDef {
            tag: 3,
            default: -7,
            property: PropertyClass::EDGE | PropertyClass::FACE,
        };
        let s = serde_json::to_string(&def).unwrap();
        let back: LabelDef = serde_json::from_str(&s).unwrap();
        assert_eq!(back, def);
    }

    /// Inner face `a0 a1 a2`, outer face `b0 b2 b1`, vertices `{a0 b2}`,
    /// `{b0 a1}`, `{b1 a2}`.
    fn triangle(g: &mut HalfEdgeGraph) -> [HalfEdgeId; 6] {
        let (a0, b0) = g.create_edge().unwrap();
        let (a1, b1) = g.create_edge().unwrap();
        let (a2, b2) = g.create_edge().unwrap();
        g.vertex_twist(b0, a1).unwrap();
        g.vertex_twist(b1, a2).unwrap();
        g.vertex_twist(b2, a0).unwrap();
        [a0, b0, a1, b1, a2, b2]
    }

    #[test]
    fn set_label_around_vertex_touches_one_vertex() {
        let mut g = HalfEdgeGraph::new();
        let [a0, b0, a1, b1, a2, b2] = triangle(&mut g);
        let l = g.define_label(1, PropertyClass::VERTEX, 0).unwrap();
        g.set_label_around_vertex(a1, l, 9).unwrap();
        assert_eq!(g.try_get_label(a1, l).unwrap(), 9);
        assert_eq!(g.try_get_label(b0, l).unwrap(), 9);
        for id in [a0, b1, a2, b2] {
            assert_eq!(g.try_get_label(id, l).unwrap(), 0);
        }
        assert_eq!(
            g.set_label_around_vertex(a1, LabelIndex::new(5), 1),
            Err(MeshGraphError::InvalidLabelIndex(5))
        );
    }

    #[test]
    fn face_label_needs_exterior_to_be_face_constant() {
        let mut g = HalfEdgeGraph::new();
        let [a0, b0, ..] = triangle(&mut g);
        let l = g.define_label(1, PropertyClass::FACE, 0).unwrap();
        g.set_label_around_face(a0, l, 7).unwrap();
        g.set_label_around_face(b0, l, 99).unwrap();

        g.set_mask_around_face(b0, Mask::EXTERIOR).unwrap();
        assert_eq!(
            g.classify_label(l, &[a0], Mask::EXTERIOR).unwrap(),
            LabelClassification::FaceConstant
        );

        // Two faces with different values: only the face check holds.
        let c = g.label_constancy(l, &[a0], Mask::NONE).unwrap();
        assert_eq!(
            c,
            LabelConstancy {
                face: true,
                vertex: false,
                edge: false,
            }
        );
        assert_eq!(
            g.classify_label(l, &[a0], Mask::NONE).unwrap(),
            LabelClassification::Varies
        );
        assert_eq!(g.free_mask_count(), 16);
    }

    #[test]
    fn per_vertex_values_are_vertex_constant() {
        let mut g = HalfEdgeGraph::new();
        let [a0, _, a1, _, a2, _] = triangle(&mut g);
        let l = g.define_label(1, PropertyClass::VERTEX, 0).unwrap();
        g.set_label_around_vertex(a1, l, 1).unwrap();
        g.set_label_around_vertex(a2, l, 2).unwrap();
        g.set_label_around_vertex(a0, l, 3).unwrap();

        let c = g.label_constancy(l, &[a0], Mask::NONE).unwrap();
        assert!(c.vertex && !c.face && !c.edge);
        assert_eq!(
            g.classify_label(l, &[a2], Mask::NONE).unwrap(),
            LabelClassification::VertexConstant
        );
    }

    #[test]
    fn per_edge_values_are_edge_constant() {
        let mut g = HalfEdgeGraph::new();
        let ids = triangle(&mut g);
        let l = g.define_label(1, PropertyClass::EDGE, 0).unwrap();
        for (k, pair) in ids.chunks(2).enumerate() {
            g.try_set_label(pair[0], l, k as i32).unwrap();
            g.try_set_label(pair[1], l, k as i32).unwrap();
        }

        let c = g.label_constancy(l, &[ids[1]], Mask::NONE).unwrap();
        assert!(c.edge && !c.face && !c.vertex);
        assert_eq!(
            g.classify_label(l, &[ids[0]], Mask::NONE).unwrap(),
            LabelClassification::EdgeConstant
        );
    }

    #[test]
    fn exterior_neighbour_is_not_compared() {
        let mut g = HalfEdgeGraph::new();
        let [a0, b0, a1, _, a2, _] = triangle(&mut g);
        let l = g.define_label(1, PropertyClass::VERTEX, 0).unwrap();
        g.set_label_around_vertex(a1, l, 1).unwrap();
        g.set_label_around_vertex(a2, l, 2).unwrap();
        g.set_label_around_vertex(a0, l, 3).unwrap();
        g.try_set_label(b0, l, 50).unwrap();

        assert_eq!(
            g.classify_label(l, &[a0], Mask::NONE).unwrap(),
            LabelClassification::Varies
        );

        g.set_mask(b0, Mask::BOUNDARY).unwrap();
        assert_eq!(
            g.classify_label(l, &[a0], Mask::BOUNDARY).unwrap(),
            LabelClassification::VertexConstant
        );
        assert!(g.has_mask(b0, Mask::BOUNDARY));
        assert_eq!(g.free_mask_count(), 16);
    }
}
