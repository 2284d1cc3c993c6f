use crate::measure::TextMetrics;
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Something to place: a deity, a knowledge-graph node, a galaxy star.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub label: String,
    pub caption: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle {
        radius: f64,
        /// Angle of the first item; `-π/2` puts it at the top.
        start_angle: f64,
    },
    Spiral {
        inner: f64,
        outer: f64,
        turns: f64,
        arms: usize,
        logarithmic: bool,
    },
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Self::Circle {
            radius,
            start_angle: -FRAC_PI_2,
        }
    }

    /// Three-armed logarithmic spiral used for the galaxy view.
    pub fn galaxy() -> Self {
        Self::Spiral {
            inner: 40.0,
            outer: 320.0,
            turns: 1.5,
            arms: 3,
            logarithmic: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    /// Centre of the node, relative to the canvas origin.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub width: f64,
    pub height: f64,
    pub center: (f64, f64),
    index: HashMap<String, usize>,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.node(id).map(|n| (n.x, n.y))
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }
}

pub struct LayoutEngine {
    metrics: TextMetrics,
    shape: Shape,
    margin: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            shape: Shape::circle(220.0),
            margin: 24.0,
        }
    }
}

impl LayoutEngine {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// Polar coordinates `(angle, radius)` of index `i` out of `n`.
    pub fn polar(&self, i: usize, n: usize) -> (f64, f64) {
        let t = if n == 0 { 0.0 } else { i as f64 / n as f64 };
        match self.shape {
            Shape::Circle {
                radius,
                start_angle,
            } => (start_angle + t * TAU, radius),
            Shape::Spiral {
                inner,
                outer,
                turns,
                arms,
                logarithmic,
            } => {
                let arms = arms.max(1);
                let arm_offset = (i % arms) as f64 * TAU / arms as f64;
                let angle = t * turns * TAU + arm_offset;
                let radius = if logarithmic && inner > 0.0 {
                    inner * (outer / inner).powf(t)
                } else {
                    inner + (outer - inner) * t
                };
                (angle, radius)
            }
        }
    }

    pub fn layout(&self, items: &[Item]) -> Layout {
        let n = items.len();
        let mut nodes = Vec::with_capacity(n);

        for (i, item) in items.iter().enumerate() {
            let (angle, radius) = self.polar(i, n);
            let (width, height) = self
                .metrics
                .node_size(&item.label, item.caption.as_deref());
            nodes.push(LayoutNode {
                id: item.id.clone(),
                x: radius * angle.cos(),
                y: radius * angle.sin(),
                width,
                height,
                angle,
                radius,
            });
        }

        // Shift so every node box sits inside the canvas
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for node in &nodes {
            min_x = min_x.min(node.x - node.width / 2.0);
            max_x = max_x.max(node.x + node.width / 2.0);
            min_y = min_y.min(node.y - node.height / 2.0);
            max_y = max_y.max(node.y + node.height / 2.0);
        }
        let dx = self.margin - min_x;
        let dy = self.margin - min_y;
        for node in &mut nodes {
            node.x += dx;
            node.y += dy;
        }

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        tracing::debug!(items = n, "laid out nodes");

        Layout {
            nodes,
            width: max_x - min_x + self.margin * 2.0,
            height: max_y - min_y + self.margin * 2.0,
            center: (dx, dy),
            index,
        }
    }
}
