use crate::accent::Accent;
use crate::layout::{Layout, LayoutNode};
use crate::measure::TextMetrics;
use crate::metre::{Chandas, Pada, Syllable};
use std::collections::HashMap;
use std::fmt::Write;

/// Label and fill colour for a wheel node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub label: String,
    pub caption: Option<String>,
    pub color: String,
}

pub struct SvgRenderer {
    metrics: TextMetrics,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
        }
    }
}

const LABEL_WIDTH: f64 = 64.0;
const MARGIN: f64 = 16.0;

impl SvgRenderer {
    /// Syllable grid: one row per pāda, one cell per syllable.
    pub fn render_metre(&self, padas: &[Pada]) -> String {
        let m = &self.metrics;
        let widest = padas.iter().map(Pada::len).max().unwrap_or(0);
        let row_h = m.cell_size + m.cell_gap;
        let header_h = m.line_height + m.cell_gap;
        let width = MARGIN * 2.0 + LABEL_WIDTH + m.row_width(widest);
        let height = MARGIN * 2.0 + header_h + padas.len() as f64 * row_h;

        let mut svg = String::new();
        open_svg(&mut svg, width, height);
        writeln!(
            &mut svg,
            r#"<style>
  .laghu {{ fill: #a8dadc; stroke: #457b9d; }}
  .guru {{ fill: #e63946; stroke: #9d0208; }}
  .syllable {{ font-family: monospace; font-size: 12px; text-anchor: middle; }}
  .pada-label {{ font-family: monospace; font-size: 12px; fill: #333; }}
  .metre-name {{ font-family: serif; font-size: 14px; font-weight: bold; }}
</style>"#
        )
        .unwrap();

        let title = match Chandas::identify(padas) {
            Some(c) => format!("{} ({} syllables)", c.info().name, c.info().syllables()),
            None => format!("{} pādas", padas.len()),
        };
        writeln!(
            &mut svg,
            r#"<text class="metre-name" x="{}" y="{}">{}</text>"#,
            MARGIN,
            MARGIN + m.line_height * 0.7,
            escape_xml(&title)
        )
        .unwrap();

        for (row, pada) in padas.iter().enumerate() {
            let y = MARGIN + header_h + row as f64 * row_h;
            writeln!(
                &mut svg,
                r#"<text class="pada-label" x="{}" y="{}">pāda {}</text>"#,
                MARGIN,
                y + m.cell_size * 0.65,
                row + 1
            )
            .unwrap();

            for (col, syllable) in pada.syllables.iter().enumerate() {
                let x = MARGIN + LABEL_WIDTH + col as f64 * (m.cell_size + m.cell_gap);
                let class = match syllable {
                    Syllable::Laghu => "laghu",
                    Syllable::Guru => "guru",
                };
                writeln!(
                    &mut svg,
                    r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" rx="3" />"#,
                    class, x, y, m.cell_size, m.cell_size
                )
                .unwrap();
                writeln!(
                    &mut svg,
                    r#"<text class="syllable" x="{}" y="{}">{}</text>"#,
                    x + m.cell_size / 2.0,
                    y + m.cell_size * 0.65,
                    syllable.symbol()
                )
                .unwrap();
            }
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    /// Nodes on their circle or spiral, with spokes to the centre.
    pub fn render_wheel(&self, layout: &Layout, styles: &HashMap<String, NodeStyle>) -> String {
        let mut svg = String::new();
        open_svg(&mut svg, layout.width, layout.height);
        writeln!(
            &mut svg,
            r#"<style>
  .spoke {{ stroke: #bbb; stroke-width: 1; }}
  .node-border {{ stroke: #333; stroke-width: 1.2; }}
  .node-label {{ font-family: serif; font-size: 14px; text-anchor: middle; }}
  .node-caption {{ font-family: serif; font-size: 11px; fill: #444; text-anchor: middle; }}
</style>"#
        )
        .unwrap();

        let (cx, cy) = layout.center;
        // Spokes first so nodes cover them
        for node in &layout.nodes {
            writeln!(
                &mut svg,
                r#"<line class="spoke" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
                cx, cy, node.x, node.y
            )
            .unwrap();
        }

        for node in &layout.nodes {
            self.render_node(&mut svg, node, styles.get(&node.id));
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    fn render_node(&self, svg: &mut String, node: &LayoutNode, style: Option<&NodeStyle>) {
        let m = &self.metrics;
        let x = node.x - node.width / 2.0;
        let y = node.y - node.height / 2.0;
        let color = style.map(|s| s.color.as_str()).unwrap_or("#eee");
        let label = style.map(|s| s.label.as_str()).unwrap_or(&node.id);

        writeln!(
            svg,
            r#"<rect class="node-border" x="{}" y="{}" width="{}" height="{}" rx="6" fill="{}" />"#,
            x,
            y,
            node.width,
            node.height,
            escape_xml(color)
        )
        .unwrap();

        let caption = style.and_then(|s| s.caption.as_deref());
        let label_y = match caption {
            Some(_) => y + m.padding_y + m.line_height * 0.75,
            None => node.y + 5.0,
        };
        writeln!(
            svg,
            r#"<text class="node-label" x="{}" y="{}">{}</text>"#,
            node.x,
            label_y,
            escape_xml(label)
        )
        .unwrap();

        if let Some(caption) = caption {
            writeln!(
                svg,
                r#"<text class="node-caption" x="{}" y="{}">{}</text>"#,
                node.x,
                label_y + m.line_height,
                escape_xml(caption)
            )
            .unwrap();
        }
    }

    /// Bar strip of accent classes, taller bars for higher pitch.
    pub fn render_accents(&self, accents: &[Accent]) -> String {
        let m = &self.metrics;
        let bar_w = m.cell_size / 2.0;
        let max_h = m.cell_size * 2.0;
        let width = MARGIN * 2.0 + accents.len() as f64 * (bar_w + m.cell_gap);
        let height = MARGIN * 2.0 + max_h;

        let mut svg = String::new();
        open_svg(&mut svg, width, height);
        for (i, accent) in accents.iter().enumerate() {
            let h = max_h * (0.25 + 0.75 * accent.pitch());
            let x = MARGIN + i as f64 * (bar_w + m.cell_gap);
            let y = MARGIN + max_h - h;
            writeln!(
                &mut svg,
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}" fill="{}"><title>{}</title></rect>"#,
                accent_class(*accent),
                x,
                y,
                bar_w,
                h,
                accent.color(),
                accent.name()
            )
            .unwrap();
        }
        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }
}

fn open_svg(svg: &mut String, width: f64, height: f64) {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, height, width, height
    )
    .unwrap();
}

fn accent_class(a: Accent) -> &'static str {
    match a {
        Accent::Udatta => "udatta",
        Accent::Anudatta => "anudatta",
        Accent::Svarita => "svarita",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accent::accent_pattern;
    use crate::layout::{Item, LayoutEngine};
    use crate::metre::parse_metrical_data;
    use crate::verse::VerseRef;

    #[test]
    fn test_render_metre_grid() {
        let padas = parse_metrical_data("LGGLGLGL<br />GLGLGLGL<br />GLGLLGLG").unwrap();
        let svg = SvgRenderer::default().render_metre(&padas);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Gāyatrī (24 syllables)"));
        assert_eq!(svg.matches(r#"<rect class="guru""#).count(), 12);
        assert_eq!(svg.matches(r#"<rect class="laghu""#).count(), 12);
        assert!(svg.contains("pāda 3"));
    }

    #[test]
    fn test_render_empty_metre() {
        let svg = SvgRenderer::default().render_metre(&[]);
        assert!(svg.contains("0 pādas"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_render_wheel() {
        let items = vec![
            Item::new("agni", "Agni"),
            Item::new("indra", "Indra").with_caption("Vṛtrahan"),
            Item::new("soma", "Soma"),
        ];
        let layout = LayoutEngine::default().layout(&items);
        let mut styles = HashMap::new();
        styles.insert(
            "indra".to_string(),
            NodeStyle {
                label: "Indra".into(),
                caption: Some("Vṛtrahan".into()),
                color: "#3a86ff".into(),
            },
        );
        let svg = SvgRenderer::default().render_wheel(&layout, &styles);

        assert_eq!(svg.matches(r#"class="spoke""#).count(), 3);
        assert!(svg.contains("Vṛtrahan"));
        assert!(svg.contains("#3a86ff"));
        // Unstyled nodes fall back to their id
        assert!(svg.contains(">agni<"));
    }

    #[test]
    fn test_render_accents() {
        let accents = accent_pattern(VerseRef::new(1, 1, 1).unwrap(), 8);
        let svg = SvgRenderer::default().render_accents(&accents);
        assert_eq!(svg.matches("<rect").count(), 8);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
