use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_node_width: f64,
    pub min_node_height: f64,
    pub cell_size: f64,
    pub cell_gap: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            padding_x: 10.0,
            padding_y: 6.0,
            min_node_width: 56.0,
            min_node_height: 28.0,
            cell_size: 28.0,
            cell_gap: 4.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Size of a labelled node, optionally with a second caption line.
    pub fn node_size(&self, label: &str, caption: Option<&str>) -> (f64, f64) {
        let text_w = self
            .text_width(label)
            .max(caption.map(|c| self.text_width(c)).unwrap_or(0.0));
        let width = (text_w + self.padding_x * 2.0).max(self.min_node_width);

        let lines = if caption.is_some() { 2.0 } else { 1.0 };
        let height = (lines * self.line_height + self.padding_y * 2.0).max(self.min_node_height);

        (width, height)
    }

    /// Width of a row of `cells` syllable cells.
    pub fn row_width(&self, cells: usize) -> f64 {
        if cells == 0 {
            return 0.0;
        }
        cells as f64 * self.cell_size + (cells - 1) as f64 * self.cell_gap
    }
}
