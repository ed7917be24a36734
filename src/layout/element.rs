use std::sync::Arc;

use compact_str::CompactString;

/// Anything the layout pass can position: it only needs a fixed size.
///
/// Sizes are read at `optimize()` time, so an element may report different
/// dimensions between calls (e.g. after the host re-measures content).
pub trait Element {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
}

impl<T: Element + ?Sized> Element for Box<T> {
    fn width(&self) -> f64 {
        (**self).width()
    }

    fn height(&self) -> f64 {
        (**self).height()
    }
}

/// A plain fixed-size element with a label, for hosts that don't need their
/// own element type (and for the debug tooling).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub label: CompactString,
    pub width: f64,
    pub height: f64,
}

impl Block {
    pub fn new(label: &str, width: f64, height: f64) -> Self {
        Block {
            label: CompactString::new(label),
            width,
            height,
        }
    }
}

impl Element for Block {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

/// Identity of a registered element: the address of its `Arc` allocation.
/// Stable for as long as the layout holds the `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ElementKey(usize);

impl ElementKey {
    pub(crate) fn of<E: ?Sized>(element: &Arc<E>) -> Self {
        ElementKey(Arc::as_ptr(element).cast::<()>() as usize)
    }
}
