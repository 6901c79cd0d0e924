//! Page layout calculations for grid pages
//!
//! All geometry handed to the PDF writer is in points, with the origin at the
//! bottom-left corner of the page.

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Create a length from points (1/72 inch)
    pub fn from_pt(pt: f64) -> Self {
        Length(pt * 25.4 / 72.0)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_mm(215.9),
            height: Length::from_mm(279.4),
        }
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }
}

/// Axis-aligned rectangle in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Whether `other` lies entirely inside this rectangle (with a small tolerance)
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.x + other.width <= self.x + self.width + EPS
            && other.y + other.height <= self.y + self.height + EPS
    }
}

/// Number of image slots on a grid page
pub const CELLS_PER_PAGE: usize = 4;

/// Default outer margin of a grid page, in points
pub const DEFAULT_MARGIN_PT: f64 = 40.0;

/// Default gap between grid cells, in points
pub const DEFAULT_GAP_PT: f64 = 20.0;

/// Geometry of a 2×2 image grid page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub page: PageDimensions,
    pub margin: Length,
    pub gap: Length,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            page: PageDimensions::a4(),
            margin: Length::from_pt(DEFAULT_MARGIN_PT),
            gap: Length::from_pt(DEFAULT_GAP_PT),
        }
    }
}

impl GridLayout {
    /// Grid layout on the given page size with the default margin and gap
    pub fn with_page(page: PageDimensions) -> Self {
        Self { page, ..Default::default() }
    }

    /// Page width and height in points
    pub fn page_size_pt(&self) -> (f64, f64) {
        (self.page.width.pt(), self.page.height.pt())
    }

    /// Width and height of a single cell in points
    pub fn cell_size(&self) -> (f64, f64) {
        let (page_w, page_h) = self.page_size_pt();
        let margin = self.margin.pt();
        let gap = self.gap.pt();
        let width = (page_w - 2.0 * margin - gap) / 2.0;
        let height = (page_h - 2.0 * margin - gap) / 2.0;
        (width.max(0.0), height.max(0.0))
    }

    /// The four cells in placement order: top-left, top-right, bottom-left, bottom-right
    pub fn cells(&self) -> [Rect; CELLS_PER_PAGE] {
        let (width, height) = self.cell_size();
        let margin = self.margin.pt();
        let gap = self.gap.pt();

        let left = margin;
        let right = margin + width + gap;
        let bottom = margin;
        let top = margin + height + gap;

        [
            Rect { x: left, y: top, width, height },
            Rect { x: right, y: top, width, height },
            Rect { x: left, y: bottom, width, height },
            Rect { x: right, y: bottom, width, height },
        ]
    }
}

/// Scale an image of `width` × `height` to fit `cell` and center it
///
/// The scale factor is the same on both axes and is chosen so the image fills
/// the cell along its tighter dimension. Degenerate images collapse to the
/// cell center.
pub fn fit_in_cell(cell: &Rect, width: f64, height: f64) -> Rect {
    if width <= 0.0 || height <= 0.0 {
        return Rect {
            x: cell.x + cell.width / 2.0,
            y: cell.y + cell.height / 2.0,
            width: 0.0,
            height: 0.0,
        };
    }

    let scale = (cell.width / width).min(cell.height / height);
    let scaled_w = width * scale;
    let scaled_h = height * scale;

    Rect {
        x: cell.x + (cell.width - scaled_w) / 2.0,
        y: cell.y + (cell.height - scaled_h) / 2.0,
        width: scaled_w,
        height: scaled_h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let len = Length::from_inches(1.0);
        assert!((len.mm() - 25.4).abs() < 0.01);
        assert!((len.pt() - 72.0).abs() < 0.01);
        assert!((Length::from_pt(40.0).pt() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_sizes() {
        let letter = PageDimensions::letter();
        assert!((letter.width.pt() - 612.0).abs() < 0.01);
        assert!((letter.height.pt() - 792.0).abs() < 0.01);

        let a4 = PageDimensions::a4();
        assert!((a4.width.pt() - 595.28).abs() < 0.01);
        assert!((a4.height.pt() - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_letter_cells() {
        let layout = GridLayout::with_page(PageDimensions::letter());
        let (w, h) = layout.cell_size();
        // (612 - 80 - 20) / 2 and (792 - 80 - 20) / 2
        assert!((w - 256.0).abs() < 0.01);
        assert!((h - 346.0).abs() < 0.01);

        let [tl, tr, bl, br] = layout.cells();
        assert!((tl.x - 40.0).abs() < 0.01);
        assert!((tl.y - 406.0).abs() < 0.01);
        assert!((tr.x - 316.0).abs() < 0.01);
        assert_eq!(tl.y, tr.y);
        assert!((bl.y - 40.0).abs() < 0.01);
        assert_eq!(bl.x, tl.x);
        assert_eq!(br.x, tr.x);
        assert_eq!(br.y, bl.y);
    }

    #[test]
    fn test_cells_stay_inside_margins() {
        let layout = GridLayout::default();
        let (page_w, page_h) = layout.page_size_pt();
        let printable = Rect {
            x: DEFAULT_MARGIN_PT,
            y: DEFAULT_MARGIN_PT,
            width: page_w - 2.0 * DEFAULT_MARGIN_PT,
            height: page_h - 2.0 * DEFAULT_MARGIN_PT,
        };
        for cell in layout.cells() {
            assert!(printable.contains(&cell));
        }
    }

    #[test]
    fn test_fit_wide_image() {
        let cell = Rect { x: 10.0, y: 20.0, width: 200.0, height: 100.0 };
        let placed = fit_in_cell(&cell, 400.0, 100.0);

        assert!((placed.width - 200.0).abs() < 1e-9);
        assert!((placed.height - 50.0).abs() < 1e-9);
        assert!((placed.x - 10.0).abs() < 1e-9);
        // 25pt of slack above and below
        assert!((placed.y - 45.0).abs() < 1e-9);
        assert!(cell.contains(&placed));
    }

    #[test]
    fn test_fit_tall_image_is_centered() {
        let cell = Rect { x: 0.0, y: 0.0, width: 300.0, height: 300.0 };
        let placed = fit_in_cell(&cell, 50.0, 150.0);

        assert!((placed.height - 300.0).abs() < 1e-9);
        assert!((placed.width - 100.0).abs() < 1e-9);
        let left_slack = placed.x - cell.x;
        let right_slack = cell.x + cell.width - (placed.x + placed.width);
        assert!((left_slack - right_slack).abs() < 1e-9);
        assert!((placed.width / placed.height - 50.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_image_scales_up_to_cell() {
        let cell = Rect { x: 0.0, y: 0.0, width: 200.0, height: 200.0 };
        let placed = fit_in_cell(&cell, 10.0, 20.0);
        assert!((placed.height - 200.0).abs() < 1e-9);
        assert!((placed.width - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_image() {
        let cell = Rect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 };
        let placed = fit_in_cell(&cell, 0.0, 10.0);
        assert_eq!(placed.width, 0.0);
        assert_eq!(placed.x, 50.0);
    }
}
