pub mod config;
pub mod element;
pub mod rect;

use std::collections::HashSet;
use std::sync::Arc;

use self::config::LayoutConfig;
use self::element::{Element, ElementKey};
use self::rect::LayoutRect;
use crate::error::{LayoutError, Result};
use crate::pack::{self, PackStats};

/// One registered element plus the box the optimizer wrote for it.
pub struct LayoutChild<E: ?Sized> {
    element: Arc<E>,
    /// `None` until the first successful optimize()
    pub(crate) rect: Option<LayoutRect>,
}

impl<E: ?Sized> LayoutChild<E> {
    pub fn element(&self) -> &Arc<E> {
        &self.element
    }

    pub fn rect(&self) -> Option<LayoutRect> {
        self.rect
    }
}

/// An optimizable set of children, kept in insertion order.
///
/// Insertion order is the Phase 1 placement order and the tie-break key for
/// otherwise equal placements. The container holds no packing state between
/// calls; every `optimize()` repacks from scratch.
pub struct Layout<E: ?Sized> {
    pub(crate) children: Vec<LayoutChild<E>>,
    /// Identity set mirroring `children`
    keys: HashSet<ElementKey>,
    pub(crate) config: LayoutConfig,
    /// Bounding size from the last successful optimize()
    pub(crate) size: (f64, f64),
}

impl<E: ?Sized> Default for Layout<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> Layout<E> {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Layout {
            children: Vec::new(),
            keys: HashSet::new(),
            config,
            size: (0.0, 0.0),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration. Existing boxes stay until the next optimize().
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Register an element. Fails if this exact `Arc` is already present.
    pub fn add_child(&mut self, element: Arc<E>) -> Result<()> {
        if !self.keys.insert(ElementKey::of(&element)) {
            return Err(LayoutError::DuplicateElement);
        }
        self.children.push(LayoutChild {
            element,
            rect: None,
        });
        Ok(())
    }

    /// Register a batch of elements, all or nothing.
    ///
    /// Fails with `DuplicateElement` if any element is already registered or
    /// appears more than once in the batch; the layout is unchanged then.
    pub fn add_children<I>(&mut self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<E>>,
    {
        let elements: Vec<Arc<E>> = elements.into_iter().collect();
        let mut batch = HashSet::with_capacity(elements.len());
        for element in &elements {
            let key = ElementKey::of(element);
            if self.keys.contains(&key) || !batch.insert(key) {
                return Err(LayoutError::DuplicateElement);
            }
        }

        self.keys.extend(batch);
        self.children
            .extend(elements.into_iter().map(|element| LayoutChild {
                element,
                rect: None,
            }));
        Ok(())
    }

    /// Unregister an element. Does not repack; call `optimize()` again.
    pub fn remove_child(&mut self, element: &Arc<E>) -> Result<()> {
        let key = ElementKey::of(element);
        if !self.keys.remove(&key) {
            return Err(LayoutError::NotFound);
        }
        // keys and children are kept in sync, so the position exists
        if let Some(pos) = self
            .children
            .iter()
            .position(|child| ElementKey::of(&child.element) == key)
        {
            self.children.remove(pos);
        }
        Ok(())
    }

    pub fn contains(&self, element: &Arc<E>) -> bool {
        self.keys.contains(&ElementKey::of(element))
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[LayoutChild<E>] {
        &self.children
    }

    /// The box last written for `element`, if it is registered and packed.
    pub fn rect_of(&self, element: &Arc<E>) -> Option<LayoutRect> {
        let key = ElementKey::of(element);
        if !self.keys.contains(&key) {
            return None;
        }
        self.children
            .iter()
            .find(|child| ElementKey::of(&child.element) == key)
            .and_then(LayoutChild::rect)
    }

    /// `(width, height)` returned by the last successful optimize(), `(0, 0)` before.
    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<E: Element + ?Sized> Layout<E> {
    /// Repack every child and return the bounding `(width, height)`.
    pub fn optimize(&mut self) -> Result<(f64, f64)> {
        pack::optimize(self)
    }

    /// Like [`Layout::optimize`], also reporting what the optimizer did.
    pub fn optimize_with_stats(&mut self) -> Result<PackStats> {
        pack::optimize_with_stats(self)
    }
}

/// A packed layout can be a child of another layout; it reports the size of
/// its last optimize(), and its children's boxes stay relative to its origin.
impl<E: ?Sized> Element for Layout<E> {
    fn width(&self) -> f64 {
        self.size.0
    }

    fn height(&self) -> f64 {
        self.size.1
    }
}
