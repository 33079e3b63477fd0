#![forbid(unsafe_code)]

//! Force-directed placement: repulsion, center attraction, damping.

use quilt_core::geometry::{CellRect, CellSize};
use quilt_core::widget::WidgetId;

use super::{Placement, PlacementSet, PlacementSpec};

/// Simulation length. Positions settle well before this for typical widget
/// counts; the count is fixed so output depends on nothing but the input.
const ITERATIONS: usize = 100;

/// Pairwise repulsion strength.
const REPULSION: f32 = 60.0;

/// Pull toward the container center per unit of distance.
const ATTRACTION: f32 = 0.015;

/// Velocity retained per iteration.
const DAMPING: f32 = 0.9;

/// Distances clamp to this before the inverse-square, keeping coincident
/// widgets from producing unbounded forces.
const MIN_DISTANCE: f32 = 1.0;

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x100000001b3;

/// Relax widgets with a fixed-length force simulation.
///
/// Widgets with a seed position start there; the rest are scattered by a
/// hash of their id, so "random" starts stay reproducible and identical
/// inputs still give identical outputs. Each iteration applies pairwise
/// inverse-square repulsion between widget centers, a linear attraction
/// toward the container center, and damping. Final positions round to
/// whole cells and clamp each widget's full extent inside the container.
#[must_use]
pub fn force_directed(specs: &[PlacementSpec], container: CellSize) -> PlacementSet {
    let cw = f32::from(container.w.max(1));
    let ch = f32::from(container.h.max(1));
    let center = (cw / 2.0, ch / 2.0);

    // Simulation state: widget centers and velocities.
    let mut pos: Vec<(f32, f32)> = specs
        .iter()
        .map(|spec| match spec.seed {
            Some(seed) => (
                f32::from(seed.x) + f32::from(spec.size.w) / 2.0,
                f32::from(seed.y) + f32::from(spec.size.h) / 2.0,
            ),
            None => scatter(&spec.widget, cw, ch),
        })
        .collect();
    let mut vel: Vec<(f32, f32)> = vec![(0.0, 0.0); specs.len()];

    for _ in 0..ITERATIONS {
        let mut force: Vec<(f32, f32)> = vec![(0.0, 0.0); specs.len()];

        for i in 0..specs.len() {
            for j in (i + 1)..specs.len() {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let push = REPULSION / (dist * dist);
                let (ux, uy) = (dx / dist, dy / dist);
                force[i].0 += ux * push;
                force[i].1 += uy * push;
                force[j].0 -= ux * push;
                force[j].1 -= uy * push;
            }

            force[i].0 += (center.0 - pos[i].0) * ATTRACTION;
            force[i].1 += (center.1 - pos[i].1) * ATTRACTION;
        }

        for i in 0..specs.len() {
            vel[i].0 = (vel[i].0 + force[i].0) * DAMPING;
            vel[i].1 = (vel[i].1 + force[i].1) * DAMPING;
            pos[i].0 += vel[i].0;
            pos[i].1 += vel[i].1;
        }
    }

    let placements = specs
        .iter()
        .zip(&pos)
        .map(|(spec, &(cx, cy))| {
            let w = spec.size.w.clamp(1, container.w.max(1));
            let h = spec.size.h.max(1).min(container.h.max(1));
            let max_x = container.w.saturating_sub(w);
            let max_y = container.h.saturating_sub(h);
            let x = (cx - f32::from(w) / 2.0).round().max(0.0) as u16;
            let y = (cy - f32::from(h) / 2.0).round().max(0.0) as u16;
            Placement {
                widget: spec.widget.clone(),
                rect: CellRect::new(x.min(max_x), y.min(max_y), w, h),
            }
        })
        .collect();

    PlacementSet {
        placements,
        overflowed: Vec::new(),
    }
}

/// Deterministic scatter for widgets without a prior position.
fn scatter(id: &WidgetId, cw: f32, ch: f32) -> (f32, f32) {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in id.as_str().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    let fx = ((hash >> 8) & 0xffff) as f32 / f32::from(u16::MAX);
    let fy = ((hash >> 24) & 0xffff) as f32 / f32::from(u16::MAX);
    (fx * cw, fy * ch)
}
