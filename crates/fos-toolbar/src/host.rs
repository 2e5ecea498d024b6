//! Host Page
//!
//! What the toolbar needs from the embedding page beyond the document
//! tree: viewport metrics, zoom capability, body scrolling and reloads.

use std::cell::Cell;
use std::rc::Rc;

/// Embedding page services
pub trait HostPage {
    /// Viewport width in CSS pixels
    fn viewport_width(&self) -> f64;
    
    /// Whether the root element honours the `zoom` style property
    fn supports_zoom(&self) -> bool {
        true
    }
    
    /// `(scrollWidth, clientWidth)` of the body
    fn body_scroll_extent(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
    
    fn set_body_scroll_left(&mut self, _left: f64) {}
    
    /// Reload the page
    fn reload(&mut self);
}

/// Host without a real page behind it. Clones share counters.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    pub width: f64,
    pub zoom: bool,
    pub scroll_extent: (f64, f64),
    scroll_left: Rc<Cell<f64>>,
    reloads: Rc<Cell<usize>>,
}

impl HeadlessHost {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            zoom: true,
            scroll_extent: (0.0, 0.0),
            scroll_left: Rc::new(Cell::new(0.0)),
            reloads: Rc::new(Cell::new(0)),
        }
    }
    
    /// Number of reloads requested so far
    pub fn reloads(&self) -> usize {
        self.reloads.get()
    }
    
    pub fn scroll_left(&self) -> f64 {
        self.scroll_left.get()
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(1280.0)
    }
}

impl HostPage for HeadlessHost {
    fn viewport_width(&self) -> f64 {
        self.width
    }
    
    fn supports_zoom(&self) -> bool {
        self.zoom
    }
    
    fn body_scroll_extent(&self) -> (f64, f64) {
        self.scroll_extent
    }
    
    fn set_body_scroll_left(&mut self, left: f64) {
        self.scroll_left.set(left);
    }
    
    fn reload(&mut self) {
        tracing::info!("Page reload requested");
        self.reloads.set(self.reloads.get() + 1);
    }
}
