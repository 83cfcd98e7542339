//! Strongly connected components over direction-masked arcs.
//!
//! Tarjan's low-link search, run on an explicit frame stack. Each frame
//! holds one vertex loop and a cursor into it; popping a frame is the point
//! where a recursive search would return, and that is where the tree arc
//! into the vertex is classified and the parent's low-link is updated.
//!
//! Every masked half-edge ends up carrying exactly one of the two output
//! masks:
//! - `component` when its tail and head lie in the same strong component,
//! - `bridge` when it leads from one strong component into another.

use crate::algs::loops::{LoopKind, number_loops_raw};
use crate::mesh_error::MeshGraphError;
use crate::topology::graph::{HalfEdgeGraph, LoopStep};
use crate::topology::mask::Mask;

const UNSEEN: u32 = u32::MAX;

struct Frame {
    vertex: usize,
    ring: Vec<u32>,
    pos: usize,
    /// Tree arc this vertex was reached through.
    entry: Option<u32>,
}

/// Mark arcs as within-component or bridge and return the number of strong
/// components (vertices with no masked arcs count as singletons).
pub fn mark_strong_components(
    graph: &mut HalfEdgeGraph,
    direction: Mask,
    component: Mask,
    bridge: Mask,
) -> Result<usize, MeshGraphError> {
    let vertices = number_loops_raw(graph, LoopKind::Vertex, true)?;
    let n = vertices.seeds.len();
    let vertex_of = |i: u32| vertices.loop_of[i as usize] as usize;

    let mut num = vec![UNSEEN; n];
    let mut low = vec![UNSEEN; n];
    let mut on_stack = vec![false; n];
    let mut scc_stack: Vec<usize> = Vec::new();
    let mut counter = 0u32;
    let mut components = 0usize;
    let mut frames: Vec<Frame> = Vec::new();

    for root in 0..n {
        if num[root] != UNSEEN {
            continue;
        }
        enter(
            graph,
            root,
            vertices.seeds[root],
            None,
            &mut counter,
            &mut num,
            &mut low,
            &mut on_stack,
            &mut scc_stack,
            &mut frames,
        );

        while let Some(top) = frames.last_mut() {
            if top.pos < top.ring.len() {
                let j = top.ring[top.pos];
                top.pos += 1;
                if !graph.has_mask_at(j, direction) {
                    continue;
                }
                let v = top.vertex;
                let head = graph.fs(j);
                let w = vertex_of(head);
                if num[w] == UNSEEN {
                    enter(
                        graph,
                        w,
                        head,
                        Some(j),
                        &mut counter,
                        &mut num,
                        &mut low,
                        &mut on_stack,
                        &mut scc_stack,
                        &mut frames,
                    );
                } else if on_stack[w] {
                    graph.set_mask_at(j, component);
                    low[v] = low[v].min(num[w]);
                } else {
                    graph.set_mask_at(j, bridge);
                }
                continue;
            }

            // Simulated return from `top.vertex`.
            let Some(done) = frames.pop() else { break };
            let w = done.vertex;
            if low[w] == num[w] {
                while let Some(x) = scc_stack.pop() {
                    on_stack[x] = false;
                    if x == w {
                        break;
                    }
                }
                components += 1;
                if let Some(j) = done.entry {
                    graph.set_mask_at(j, bridge);
                }
            } else {
                if let Some(j) = done.entry {
                    graph.set_mask_at(j, component);
                }
                if let Some(parent) = frames.last() {
                    let p = parent.vertex;
                    low[p] = low[p].min(low[w]);
                }
            }
        }
    }
    Ok(components)
}

#[allow(clippy::too_many_arguments)]
fn enter(
    graph: &HalfEdgeGraph,
    vertex: usize,
    seed: u32,
    entry: Option<u32>,
    counter: &mut u32,
    num: &mut [u32],
    low: &mut [u32],
    on_stack: &mut [bool],
    scc_stack: &mut Vec<usize>,
    frames: &mut Vec<Frame>,
) {
    num[vertex] = *counter;
    low[vertex] = *counter;
    *counter += 1;
    on_stack[vertex] = true;
    scc_stack.push(vertex);
    frames.push(Frame {
        vertex,
        ring: graph.raw_loop(seed, LoopStep::Vertex).collect(),
        pos: 0,
        entry,
    });
}
