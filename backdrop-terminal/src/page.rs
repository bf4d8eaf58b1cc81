/// A simulated scrolling page for the terminal preview
///
/// Stands in for the DOM: it knows where the skills section and the
/// reveal-marked blocks sit in page coordinates and reports their bounding
/// boxes relative to the current scroll offset.
use backdrop_core::{Rect, Viewport};

/// Vertical layout in viewport heights
const PAGE_HEIGHT: f32 = 4.0;
const SKILLS_SECTION: (f32, f32) = (2.0, 2.8);
const REVEAL_BLOCKS: [(f32, f32); 5] = [(0.6, 0.9), (1.2, 1.5), (1.7, 2.0), (2.9, 3.2), (3.5, 3.8)];

pub struct VirtualPage {
    viewport: Viewport,
    scroll: f32,
}

impl VirtualPage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll: 0.0,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        // Keep the same relative position on the page
        let fraction = self.scroll_fraction();
        self.viewport = viewport;
        self.scroll = fraction * self.max_scroll();
    }

    /// Scroll by a multiple of the viewport height
    pub fn scroll_by(&mut self, viewports: f32) {
        self.scroll = (self.scroll + viewports * self.viewport.height).clamp(0.0, self.max_scroll());
    }

    pub fn scroll_fraction(&self) -> f32 {
        let max = self.max_scroll();
        if max > 0.0 {
            self.scroll / max
        } else {
            0.0
        }
    }

    fn max_scroll(&self) -> f32 {
        ((PAGE_HEIGHT - 1.0) * self.viewport.height).max(0.0)
    }

    fn band(&self, (top, bottom): (f32, f32)) -> Rect {
        let h = self.viewport.height;
        Rect::band(top * h - self.scroll, bottom * h - self.scroll, self.viewport)
    }

    /// Current bounding box of the skills section
    pub fn skills_section(&self) -> Rect {
        self.band(SKILLS_SECTION)
    }

    /// `(block index, visible ratio)` for every reveal block
    pub fn reveal_ratios(&self) -> Vec<(usize, f32)> {
        REVEAL_BLOCKS
            .iter()
            .enumerate()
            .map(|(i, &block)| (i, self.band(block).visible_ratio(self.viewport)))
            .collect()
    }

    pub fn reveal_block_count(&self) -> usize {
        REVEAL_BLOCKS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_section_starts_below_fold() {
        let viewport = Viewport::new(80.0, 48.0);
        let mut page = VirtualPage::new(viewport);
        assert!(!page.skills_section().intersects_vertically(viewport.height));

        page.scroll_by(1.5);
        assert!(page.skills_section().intersects_vertically(viewport.height));

        page.scroll_by(100.0);
        assert!((page.scroll_fraction() - 1.0).abs() < 1e-6);
        assert!(!page.skills_section().intersects_vertically(viewport.height));
    }

    #[test]
    fn test_first_block_visible_at_top() {
        let page = VirtualPage::new(Viewport::new(80.0, 48.0));
        let ratios = page.reveal_ratios();
        assert_eq!(ratios.len(), page.reveal_block_count());
        assert_eq!(ratios[0].1, 1.0);
        assert_eq!(ratios[1].1, 0.0);
    }
}
