pub(crate) mod compact;
pub(crate) mod free_rects;

use rayon::prelude::*;

use self::compact::{compact, Piece};
use self::free_rects::PackingState;
use crate::error::{Axis, LayoutError, Result};
use crate::layout::element::Element;
use crate::layout::rect::LayoutRect;
use crate::layout::Layout;

/// What one optimize() call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackStats {
    /// Final bounding width
    pub width: f64,
    /// Final bounding height
    pub height: f64,
    /// Bounding size after greedy placement, before compaction
    pub initial_width: f64,
    pub initial_height: f64,
    /// Compaction sweeps run (0 for an empty layout)
    pub sweeps: usize,
    /// Accepted compaction slides
    pub slides: usize,
    /// Largest size the free-rectangle list reached
    pub free_rects_peak: usize,
}

impl PackStats {
    fn empty() -> Self {
        PackStats {
            width: 0.0,
            height: 0.0,
            initial_width: 0.0,
            initial_height: 0.0,
            sweeps: 0,
            slides: 0,
            free_rects_peak: 0,
        }
    }
}

/// Repack `layout` and return its bounding `(width, height)`.
pub fn optimize<E: Element + ?Sized>(layout: &mut Layout<E>) -> Result<(f64, f64)> {
    optimize_with_stats(layout).map(|stats| (stats.width, stats.height))
}

/// Repack `layout`: greedy best-short-side-fit placement in insertion order,
/// then compaction sweeps toward the origin.
///
/// Sizes are validated before anything is written, so on error every child
/// keeps the box it had before the call.
pub fn optimize_with_stats<E: Element + ?Sized>(layout: &mut Layout<E>) -> Result<PackStats> {
    let sizes = measure(layout)?;
    if sizes.is_empty() {
        tracing::debug!("Optimize called on an empty layout");
        layout.size = (0.0, 0.0);
        return Ok(PackStats::empty());
    }

    let config = &layout.config;
    let (gap_x, gap_y) = (config.spacing_horizontal(), config.spacing_vertical());

    // Phase 1: greedy placement
    let mut state = PackingState::new(config.target_ratio());
    let mut pieces: Vec<Piece> = sizes
        .iter()
        .map(|&(width, height)| {
            let (fw, fh) = (width + gap_x, height + gap_y);
            let (x, y) = state.place(fw, fh);
            Piece {
                footprint: LayoutRect::new(x, y, fw, fh),
                width,
                height,
            }
        })
        .collect();
    let (initial_width, initial_height) = bounds(&pieces);

    tracing::debug!(
        "Placed {} children in {:.1}x{:.1} (region {:.1}x{:.1}, {} free rects at peak)",
        pieces.len(),
        initial_width,
        initial_height,
        state.region().0,
        state.region().1,
        state.peak_free()
    );

    // Phase 2: compaction
    let cap = config.sweep_cap(pieces.len());
    let compact_stats = compact(&mut pieces, cap);
    let (width, height) = bounds(&pieces);

    layout.size = (width, height);
    for (child, piece) in layout.children.iter_mut().zip(&pieces) {
        child.rect = Some(LayoutRect::new(
            piece.footprint.x,
            piece.footprint.y,
            piece.width,
            piece.height,
        ));
    }

    tracing::debug!(
        "Compacted to {:.1}x{:.1} after {} sweeps ({} slides)",
        width,
        height,
        compact_stats.sweeps,
        compact_stats.slides
    );

    Ok(PackStats {
        width,
        height,
        initial_width,
        initial_height,
        sweeps: compact_stats.sweeps,
        slides: compact_stats.slides,
        free_rects_peak: state.peak_free(),
    })
}

/// Optimize independent layouts in parallel, one result per layout in order.
pub fn optimize_all<E>(layouts: &mut [Layout<E>]) -> Vec<Result<(f64, f64)>>
where
    E: Element + Send + Sync + ?Sized,
{
    layouts.par_iter_mut().map(optimize::<E>).collect()
}

/// Read every child's size, rejecting anything that isn't a positive finite number.
fn measure<E: Element + ?Sized>(layout: &Layout<E>) -> Result<Vec<(f64, f64)>> {
    layout
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let element = child.element();
            let width = checked(index, Axis::Width, element.width())?;
            let height = checked(index, Axis::Height, element.height())?;
            Ok((width, height))
        })
        .collect()
}

fn checked(index: usize, axis: Axis, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::NonPositiveDimension { index, axis, value })
    }
}

/// Max right and bottom edge over the element boxes.
fn bounds(pieces: &[Piece]) -> (f64, f64) {
    pieces.iter().fold((0.0_f64, 0.0_f64), |(w, h), piece| {
        (
            w.max(piece.footprint.x + piece.width),
            h.max(piece.footprint.y + piece.height),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::config::LayoutConfig;
    use crate::layout::element::Block;

    fn layout_of(sizes: &[(f64, f64)]) -> (Layout<Block>, Vec<Arc<Block>>) {
        let blocks: Vec<Arc<Block>> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| Arc::new(Block::new(&format!("b{i}"), w, h)))
            .collect();
        let mut layout = Layout::new();
        layout.add_children(blocks.iter().cloned()).unwrap();
        (layout, blocks)
    }

    #[test]
    fn three_block_scenario_packs_tightly() {
        let (mut layout, _) = layout_of(&[(10.0, 10.0), (10.0, 10.0), (20.0, 5.0)]);
        let (w, h) = optimize(&mut layout).unwrap();
        assert_eq!((w, h), (20.0, 15.0));

        let rects: Vec<LayoutRect> = layout.children().iter().filter_map(|c| c.rect()).collect();
        assert_eq!(
            rects,
            vec![
                LayoutRect::new(0.0, 0.0, 10.0, 10.0),
                LayoutRect::new(10.0, 0.0, 10.0, 10.0),
                LayoutRect::new(0.0, 10.0, 20.0, 5.0),
            ]
        );
    }

    #[test]
    fn empty_layout_is_zero() {
        let mut layout: Layout<Block> = Layout::new();
        let stats = optimize_with_stats(&mut layout).unwrap();
        assert_eq!((stats.width, stats.height), (0.0, 0.0));
        assert_eq!(stats.sweeps, 0);
    }

    #[test]
    fn invalid_size_reports_first_offender() {
        let (mut layout, _) = layout_of(&[(5.0, 5.0), (3.0, -1.0), (0.0, 2.0)]);
        let err = optimize(&mut layout).unwrap_err();
        assert_eq!(
            err,
            LayoutError::NonPositiveDimension {
                index: 1,
                axis: Axis::Height,
                value: -1.0
            }
        );
        assert!(layout.children().iter().all(|c| c.rect().is_none()));
    }

    #[test]
    fn nan_is_rejected() {
        let (mut layout, _) = layout_of(&[(f64::NAN, 5.0)]);
        assert!(matches!(
            optimize(&mut layout),
            Err(LayoutError::NonPositiveDimension {
                index: 0,
                axis: Axis::Width,
                ..
            })
        ));
    }

    #[test]
    fn spacing_separates_neighbours() {
        let (mut layout, _) = layout_of(&[(10.0, 10.0), (10.0, 10.0)]);
        layout.set_config(LayoutConfig::default().with_spacing(4.0, 4.0));
        let (w, h) = optimize(&mut layout).unwrap();

        let rects: Vec<LayoutRect> = layout.children().iter().filter_map(|c| c.rect()).collect();
        assert_eq!(rects[0], LayoutRect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rects[1], LayoutRect::new(14.0, 0.0, 10.0, 10.0));
        // no trailing gap on the outer edge
        assert_eq!((w, h), (24.0, 10.0));
    }

    #[test]
    fn compaction_never_grows_the_bounding_box() {
        let sizes: Vec<(f64, f64)> = (1..=12)
            .map(|i| (f64::from(i * 7 % 11 + 1), f64::from(i * 5 % 9 + 1)))
            .collect();
        let (mut layout, _) = layout_of(&sizes);
        let stats = optimize_with_stats(&mut layout).unwrap();
        assert!(stats.width * stats.height <= stats.initial_width * stats.initial_height);
        assert!(stats.sweeps >= 1);
        assert!(stats.free_rects_peak >= 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let sizes = [(3.0, 8.0), (6.0, 2.0), (4.0, 4.0), (9.0, 1.0)];
        let mut layouts: Vec<Layout<Block>> = (0..4).map(|_| layout_of(&sizes).0).collect();
        let results = optimize_all(&mut layouts);

        let (mut reference, _) = layout_of(&sizes);
        let expected = optimize(&mut reference).unwrap();
        for (result, layout) in results.into_iter().zip(&layouts) {
            assert_eq!(result.unwrap(), expected);
            let got: Vec<_> = layout.children().iter().map(|c| c.rect()).collect();
            let want: Vec<_> = reference.children().iter().map(|c| c.rect()).collect();
            assert_eq!(got, want);
        }
    }
}
