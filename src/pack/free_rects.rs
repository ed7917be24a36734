//! Phase 1 packing state: a guillotine free-rectangle list inside a region
//! that grows on demand.
//!
//! Free rectangles are stored by their edges rather than origin + size so
//! that a child's right/bottom edge and the free strip next to it are the
//! exact same float. That keeps placement overlap-free without epsilons.

use std::cmp::Ordering;

/// An unoccupied axis-aligned region, `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FreeRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl FreeRect {
    fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        FreeRect { x0, y0, x1, y1 }
    }

    fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    fn fits(&self, w: f64, h: f64) -> bool {
        self.x0 + w <= self.x1 && self.y0 + h <= self.y1
    }

    fn contains(&self, other: &FreeRect) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    /// Union of two rects sharing a full edge, if they do.
    fn merge(&self, other: &FreeRect) -> Option<FreeRect> {
        let same_rows = self.y0 == other.y0 && self.y1 == other.y1;
        let same_cols = self.x0 == other.x0 && self.x1 == other.x1;
        if same_rows && (self.x1 == other.x0 || other.x1 == self.x0) {
            Some(FreeRect::new(self.x0.min(other.x0), self.y0, self.x1.max(other.x1), self.y1))
        } else if same_cols && (self.y1 == other.y0 || other.y1 == self.y0) {
            Some(FreeRect::new(self.x0, self.y0.min(other.y0), self.x1, self.y1.max(other.y1)))
        } else {
            None
        }
    }
}

/// Best-short-side-fit score; smaller is better. The final `(y, x)` keys
/// make the order total because free rects never share an origin.
#[derive(Debug, Clone, Copy)]
struct FitScore {
    short: f64,
    long: f64,
    y: f64,
    x: f64,
}

impl FitScore {
    fn compare(&self, other: &FitScore) -> Ordering {
        self.short
            .total_cmp(&other.short)
            .then(self.long.total_cmp(&other.long))
            .then(self.y.total_cmp(&other.y))
            .then(self.x.total_cmp(&other.x))
    }
}

/// Ephemeral placement state for one optimize() call.
#[derive(Debug)]
pub(crate) struct PackingState {
    free: Vec<FreeRect>,
    /// Current packing region, anchored at the origin
    region_w: f64,
    region_h: f64,
    target_ratio: f64,
    /// Largest the free list ever got
    peak_free: usize,
}

impl PackingState {
    pub fn new(target_ratio: f64) -> Self {
        PackingState {
            free: Vec::new(),
            region_w: 0.0,
            region_h: 0.0,
            target_ratio,
            peak_free: 0,
        }
    }

    pub fn region(&self) -> (f64, f64) {
        (self.region_w, self.region_h)
    }

    pub fn peak_free(&self) -> usize {
        self.peak_free
    }

    #[cfg(test)]
    fn free_rects(&self) -> &[FreeRect] {
        &self.free
    }

    /// Place a `w × h` footprint and return its top-left corner.
    pub fn place(&mut self, w: f64, h: f64) -> (f64, f64) {
        // the strip added by grow() always fits the footprint exactly
        let idx = match self.best_fit(w, h) {
            Some(idx) => idx,
            None => self.grow(w, h),
        };
        let corner = self.consume(idx, w, h);
        self.peak_free = self.peak_free.max(self.free.len());
        corner
    }

    fn best_fit(&self, w: f64, h: f64) -> Option<usize> {
        let mut best: Option<(usize, FitScore)> = None;
        for (idx, rect) in self.free.iter().enumerate() {
            if !rect.fits(w, h) {
                continue;
            }
            let leftover_w = rect.width() - w;
            let leftover_h = rect.height() - h;
            let score = FitScore {
                short: leftover_w.min(leftover_h),
                long: leftover_w.max(leftover_h),
                y: rect.y0,
                x: rect.x0,
            };
            let better = match &best {
                None => true,
                Some((_, current)) => score.compare(current) == Ordering::Less,
            };
            if better {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Extend the region right or down, whichever gives the smaller area,
    /// and return the index of the new strip that fits `w × h`.
    fn grow(&mut self, w: f64, h: f64) -> usize {
        let (rw, rh) = (self.region_w, self.region_h);

        let right = (rw + w, rh.max(h));
        let down = (rw.max(w), rh + h);
        let grow_right = self.prefer_first(right, down);

        let (strip, extra) = if grow_right {
            self.region_w = right.0;
            self.region_h = right.1;
            (
                FreeRect::new(rw, 0.0, right.0, right.1),
                FreeRect::new(0.0, rh, rw, right.1),
            )
        } else {
            self.region_w = down.0;
            self.region_h = down.1;
            (
                FreeRect::new(0.0, rh, down.0, down.1),
                FreeRect::new(rw, 0.0, down.0, rh),
            )
        };

        tracing::trace!(
            "Region grown {} to {:.1}x{:.1} for {:.1}x{:.1}",
            if grow_right { "right" } else { "down" },
            self.region_w,
            self.region_h,
            w,
            h
        );

        self.free.push(strip);
        let strip_idx = self.free.len() - 1;
        if !extra.is_empty() {
            self.free.push(extra);
        }
        strip_idx
    }

    /// Smaller area wins; equal areas go to the ratio closer to the target,
    /// then to the first candidate.
    fn prefer_first(&self, first: (f64, f64), second: (f64, f64)) -> bool {
        let area_a = first.0 * first.1;
        let area_b = second.0 * second.1;
        match area_a.total_cmp(&area_b) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => {
                let off_a = (first.0 / first.1 - self.target_ratio).abs();
                let off_b = (second.0 / second.1 - self.target_ratio).abs();
                off_a <= off_b
            }
        }
    }

    /// Put the footprint at the top-left of free rect `idx` and split the rest.
    fn consume(&mut self, idx: usize, w: f64, h: f64) -> (f64, f64) {
        let rect = self.free.remove(idx);
        let right_edge = rect.x0 + w;
        let bottom_edge = rect.y0 + h;

        // Cut along the shorter leftover axis so the larger remainder stays whole.
        let leftover_w = rect.x1 - right_edge;
        let leftover_h = rect.y1 - bottom_edge;
        let (right, below) = if leftover_w <= leftover_h {
            (
                FreeRect::new(right_edge, rect.y0, rect.x1, bottom_edge),
                FreeRect::new(rect.x0, bottom_edge, rect.x1, rect.y1),
            )
        } else {
            (
                FreeRect::new(right_edge, rect.y0, rect.x1, rect.y1),
                FreeRect::new(rect.x0, bottom_edge, right_edge, rect.y1),
            )
        };

        for piece in [right, below] {
            if !piece.is_empty() {
                self.free.push(piece);
            }
        }
        self.prune();

        (rect.x0, rect.y0)
    }

    /// Drop empty and contained rects, then merge neighbours sharing a full edge.
    fn prune(&mut self) {
        self.free.retain(|rect| !rect.is_empty());

        let mut i = 0;
        while i < self.free.len() {
            // identical duplicates: keep the earliest
            let contained = (0..self.free.len()).any(|j| {
                j != i
                    && self.free[j].contains(&self.free[i])
                    && (j < i || self.free[j] != self.free[i])
            });
            if contained {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }

        'merging: loop {
            for i in 0..self.free.len() {
                for j in (i + 1)..self.free.len() {
                    if let Some(merged) = self.free[i].merge(&self.free[j]) {
                        self.free[i] = merged;
                        self.free.remove(j);
                        continue 'merging;
                    }
                }
            }
            break;
        }
    }
}
