//! Phase 2: slide children toward the origin until nothing moves.

use crate::layout::rect::LayoutRect;

/// A placed child during compaction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Piece {
    /// Footprint (element size plus spacing) used for collision checks
    pub footprint: LayoutRect,
    /// Element size, used for the bounding box
    pub width: f64,
    pub height: f64,
}

impl Piece {
    fn right(&self) -> f64 {
        self.footprint.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.footprint.y + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CompactStats {
    pub sweeps: usize,
    pub slides: usize,
}

/// Bounding extent of a candidate arrangement; compares by area, then perimeter.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    w: f64,
    h: f64,
}

impl Extent {
    fn area(&self) -> f64 {
        self.w * self.h
    }

    fn perimeter(&self) -> f64 {
        2.0 * (self.w + self.h)
    }
}

/// Run sweeps until one accepts no slide or `max_sweeps` is reached.
pub(crate) fn compact(pieces: &mut [Piece], max_sweeps: usize) -> CompactStats {
    let mut stats = CompactStats::default();

    while stats.sweeps < max_sweeps {
        stats.sweeps += 1;
        let mut moved = false;
        for idx in 0..pieces.len() {
            if slide_toward_origin(pieces, idx) {
                stats.slides += 1;
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }

    stats
}

/// Try both slide orders for one piece and apply the better one, if any.
///
/// x-then-y is the default; y-then-x only wins with a strictly smaller area,
/// or the same area and a strictly smaller perimeter.
fn slide_toward_origin(pieces: &mut [Piece], idx: usize) -> bool {
    let start = pieces[idx].footprint;
    let others = extent_without(pieces, idx);
    let current = extent_with(others, &pieces[idx]);

    let x_first = {
        let x = slide_x(pieces, idx, start.x, start.y);
        let y = slide_y(pieces, idx, x, start.y);
        (x, y)
    };
    let y_first = {
        let y = slide_y(pieces, idx, start.x, start.y);
        let x = slide_x(pieces, idx, start.x, y);
        (x, y)
    };

    let piece = pieces[idx];
    let extent_at = |(x, y): (f64, f64)| {
        let mut moved = piece;
        moved.footprint.x = x;
        moved.footprint.y = y;
        extent_with(others, &moved)
    };
    let extent_x_first = extent_at(x_first);
    let extent_y_first = extent_at(y_first);

    let y_first_better = extent_y_first.area() < extent_x_first.area()
        || (extent_y_first.area() == extent_x_first.area()
            && extent_y_first.perimeter() < extent_x_first.perimeter());
    let ((x, y), extent) = if y_first_better {
        (y_first, extent_y_first)
    } else {
        (x_first, extent_x_first)
    };

    if (x, y) == (start.x, start.y) || extent.area() > current.area() {
        return false;
    }

    tracing::trace!(
        "Slid child {} from ({:.1}, {:.1}) to ({:.1}, {:.1})",
        idx,
        start.x,
        start.y,
        x,
        y
    );
    pieces[idx].footprint.x = x;
    pieces[idx].footprint.y = y;
    true
}

/// Leftmost x reachable by sliding piece `idx`, placed at `(x, y)`, to the left.
fn slide_x(pieces: &[Piece], idx: usize, x: f64, y: f64) -> f64 {
    let me = LayoutRect { x, y, ..pieces[idx].footprint };
    let mut stop = 0.0_f64;
    for (j, other) in pieces.iter().enumerate() {
        let other = other.footprint;
        if j == idx || !(other.y < me.bottom() && me.y < other.bottom()) {
            continue;
        }
        if other.right() <= me.x {
            stop = stop.max(other.right());
        }
    }
    stop
}

/// Topmost y reachable by sliding piece `idx`, placed at `(x, y)`, upward.
fn slide_y(pieces: &[Piece], idx: usize, x: f64, y: f64) -> f64 {
    let me = LayoutRect { x, y, ..pieces[idx].footprint };
    let mut stop = 0.0_f64;
    for (j, other) in pieces.iter().enumerate() {
        let other = other.footprint;
        if j == idx || !(other.x < me.right() && me.x < other.right()) {
            continue;
        }
        if other.bottom() <= me.y {
            stop = stop.max(other.bottom());
        }
    }
    stop
}

fn extent_without(pieces: &[Piece], idx: usize) -> Extent {
    pieces
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != idx)
        .fold(Extent { w: 0.0, h: 0.0 }, |acc, (_, piece)| extent_with(acc, piece))
}

fn extent_with(acc: Extent, piece: &Piece) -> Extent {
    Extent {
        w: acc.w.max(piece.right()),
        h: acc.h.max(piece.bottom()),
    }
}
