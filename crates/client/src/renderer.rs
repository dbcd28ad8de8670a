#![forbid(unsafe_code)]

use sseq_core::{ChartError, PageQuery, SpectralSequenceChart};

/// Drawing surface the dispatcher keeps in step with the chart.
pub trait Renderer {
    /// Called whenever a new chart replaces the previous one.
    fn set_sseq(&mut self, chart: &SpectralSequenceChart);

    /// Redraw from the current chart state.
    fn update(&mut self, chart: &SpectralSequenceChart) -> Result<(), ChartError>;

    fn set_background_color(&mut self, color: &str);

    /// Vertical clipping margin applied to the draw viewport.
    fn y_clip_offset(&self) -> f64 {
        0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

/// Class and edge counts from the most recent redraw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawCounts {
    pub classes: usize,
    pub forced: usize,
    pub edges: usize,
}

/// Renderer without a display: runs the draw query and logs what would be drawn.
#[derive(Clone, Debug)]
pub struct HeadlessRenderer {
    page: PageQuery,
    viewport: Option<Viewport>,
    y_clip_offset: f64,
    background_color: Option<String>,
    last: Option<DrawCounts>,
    updates: usize,
}

impl HeadlessRenderer {
    pub fn new(page: PageQuery, viewport: Option<Viewport>) -> Self {
        Self {
            page,
            viewport,
            y_clip_offset: 0.0,
            background_color: None,
            last: None,
            updates: 0,
        }
    }

    pub fn with_y_clip_offset(mut self, offset: f64) -> Self {
        self.y_clip_offset = offset;
        self
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn last_counts(&self) -> Option<DrawCounts> {
        self.last
    }

    pub fn updates(&self) -> usize {
        self.updates
    }

    fn viewport_for(&self, chart: &SpectralSequenceChart) -> Viewport {
        if let Some(viewport) = self.viewport {
            return viewport;
        }
        let (xmin, xmax) = chart.x_range();
        let (ymin, ymax) = chart.y_range();
        Viewport {
            xmin,
            xmax,
            ymin: ymin - self.y_clip_offset,
            ymax,
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn set_sseq(&mut self, chart: &SpectralSequenceChart) {
        self.last = None;
        tracing::debug!(
            classes = chart.classes().len(),
            edges = chart.edges().len(),
            "renderer attached to chart"
        );
    }

    fn update(&mut self, chart: &SpectralSequenceChart) -> Result<(), ChartError> {
        self.updates += 1;
        let v = self.viewport_for(chart);
        let list = chart.elements_to_draw(self.page, v.xmin, v.xmax, v.ymin, v.ymax)?;
        let counts = DrawCounts {
            classes: list.classes.len(),
            forced: list.classes.iter().filter(|c| !c.in_range).count(),
            edges: list.edges.len(),
        };
        tracing::info!(
            page = self.page.page(),
            classes = counts.classes,
            forced = counts.forced,
            edges = counts.edges,
            "redraw"
        );
        self.last = Some(counts);
        Ok(())
    }

    fn set_background_color(&mut self, color: &str) {
        tracing::debug!(color, "background color");
        self.background_color = Some(color.to_string());
    }

    fn y_clip_offset(&self) -> f64 {
        self.y_clip_offset
    }
}
