//! Chart adapter: turns generic tabular rows plus a key configuration into a
//! bar, line or pie rendering, and maps interactions back to the source row.
//!
//! Interaction events carry the row index (and series index for bars)
//! directly. Resolution is a bounds-checked lookup, so rows that share a
//! category value stay distinguishable.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};

use crate::fmt::compact_number;
use crate::tui::FOOTER_STYLE;

/// Fallback colours, cycled by series or slice position.
pub const PALETTE: [Color; 8] = [
    Color::Rgb(233, 110, 80),  // chart-1
    Color::Rgb(42, 157, 144),  // chart-2
    Color::Rgb(39, 71, 84),    // chart-3
    Color::Rgb(232, 196, 104), // chart-4
    Color::Rgb(244, 164, 98),  // chart-5
    Color::Rgb(240, 154, 133), // chart-1 / 0.7
    Color::Rgb(106, 186, 177), // chart-2 / 0.7
    Color::Rgb(104, 126, 135), // chart-3 / 0.7
];

/// Slices at or below this share of the total get no percentage label.
const PIE_LABEL_MIN_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Unsupported(String),
}

impl ChartKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => ChartKind::Bar,
            "line" => ChartKind::Line,
            "pie" => ChartKind::Pie,
            _ => ChartKind::Unsupported(s.to_string()),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => f.write_str("bar"),
            ChartKind::Line => f.write_str("line"),
            ChartKind::Pie => f.write_str("pie"),
            ChartKind::Unsupported(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarOrientation {
    /// Categories along the x axis.
    #[default]
    Vertical,
    /// Categories along the y axis.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Number(f64),
}

/// One row of chart input. Keys are whatever the caller names in
/// `category_key` / `data_keys`; nothing else is enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartRow {
    fields: BTreeMap<String, Field>,
    pub fill: Option<Color>,
}

impl ChartRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), Field::Text(value.into()));
        self
    }

    pub fn number(mut self, key: &str, value: f64) -> Self {
        self.fields.insert(key.to_string(), Field::Number(value));
        self
    }

    pub fn fill(mut self, color: Option<Color>) -> Self {
        self.fill = color;
        self
    }

    /// Display value of a field; numbers are rendered compactly, missing is empty.
    pub fn label(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Field::Text(s)) => s.clone(),
            Some(Field::Number(n)) => compact_number(*n),
            None => String::new(),
        }
    }

    /// Numeric value of a field; text and missing fields read as zero.
    pub fn value(&self, key: &str) -> f64 {
        match self.fields.get(key) {
            Some(Field::Number(n)) => *n,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesConfig {
    pub label: Option<String>,
    pub color: Option<Color>,
}

/// Per-key labels and colours. Keys are data keys for bar/line series and
/// category values for pie slices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartConfig {
    entries: HashMap<String, SeriesConfig>,
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, key: &str, label: &str, color: Option<Color>) -> Self {
        self.entries.insert(
            key.to_string(),
            SeriesConfig {
                label: Some(label.to_string()),
                color,
            },
        );
        self
    }

    pub fn get(&self, key: &str) -> Option<&SeriesConfig> {
        self.entries.get(key)
    }

    fn color(&self, key: &str) -> Option<Color> {
        self.entries.get(key).and_then(|e| e.color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub rows: Vec<ChartRow>,
    pub config: ChartConfig,
    pub category_key: String,
    /// Value series. Pie charts use only the first.
    pub data_keys: Vec<String>,
    pub orientation: BarOrientation,
    /// Value labels on bars, percentage labels on pie slices.
    pub show_labels: bool,
    pub show_legend: bool,
}

/// A user interaction with one data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartEvent {
    Bar { index: usize, series: usize },
    Slice { index: usize },
    /// Line points must carry an index to resolve.
    Point { series: usize, index: Option<usize> },
}

/// The row an event landed on.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSelection<'a> {
    pub row: &'a ChartRow,
    pub index: usize,
    /// Data key under the cursor for bar and line charts.
    pub series: Option<&'a str>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, category_key: &str, data_keys: &[&str]) -> Self {
        Self {
            kind,
            title: None,
            rows: Vec::new(),
            config: ChartConfig::default(),
            category_key: category_key.to_string(),
            data_keys: data_keys.iter().map(|k| k.to_string()).collect(),
            orientation: BarOrientation::default(),
            show_labels: false,
            show_legend: true,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn rows(mut self, rows: Vec<ChartRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    pub fn orientation(mut self, orientation: BarOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn show_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    pub fn show_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    /// Colour for a bar/line series: configured colour, else palette by position.
    pub fn series_color(&self, series: usize) -> Color {
        self.data_keys
            .get(series)
            .and_then(|key| self.config.color(key))
            .unwrap_or(PALETTE[series % PALETTE.len()])
    }

    pub fn series_label(&self, series: usize) -> String {
        let Some(key) = self.data_keys.get(series) else {
            return String::new();
        };
        self.config
            .get(key)
            .and_then(|e| e.label.clone())
            .unwrap_or_else(|| key.clone())
    }

    /// Colour for a pie slice: the row's own fill, else config keyed by the
    /// row's category value, else palette by slice position.
    pub fn slice_color(&self, index: usize) -> Color {
        let fallback = PALETTE[index % PALETTE.len()];
        let Some(row) = self.rows.get(index) else {
            return fallback;
        };
        row.fill
            .or_else(|| self.config.color(&row.label(&self.category_key)))
            .unwrap_or(fallback)
    }

    fn pie_key(&self) -> Option<&str> {
        self.data_keys.first().map(String::as_str)
    }

    pub fn pie_total(&self) -> f64 {
        let Some(key) = self.pie_key() else {
            return 0.0;
        };
        self.rows.iter().map(|r| r.value(key).max(0.0)).sum()
    }

    /// Share of the pie total for one slice, in percent.
    pub fn slice_percent(&self, index: usize) -> f64 {
        let total = self.pie_total();
        match (self.pie_key(), self.rows.get(index)) {
            (Some(key), Some(row)) if total > 0.0 => row.value(key).max(0.0) * 100.0 / total,
            _ => 0.0,
        }
    }

    /// Percentage label, suppressed for slices of 5% or less.
    pub fn pie_label(&self, index: usize) -> Option<String> {
        let pct = self.slice_percent(index);
        (pct > PIE_LABEL_MIN_PERCENT).then(|| format!("{pct:.0}%"))
    }

    /// Value label for a bar, suppressed for exactly zero.
    pub fn bar_label(value: f64) -> Option<String> {
        (value != 0.0).then(|| compact_number(value))
    }

    /// Bars grow from a zero baseline only, so a negative value is drawn by
    /// magnitude and its label keeps the sign.
    pub fn bar_height(value: f64) -> u64 {
        value.abs().round() as u64
    }

    /// Map an interaction back to its source row. Events that don't match the
    /// chart kind, point outside the rows, or (for lines) lack an index
    /// resolve to nothing.
    pub fn resolve(&self, event: ChartEvent) -> Option<ChartSelection<'_>> {
        match (&self.kind, event) {
            (ChartKind::Bar, ChartEvent::Bar { index, series }) => {
                let key = self.data_keys.get(series)?;
                Some(ChartSelection {
                    row: self.rows.get(index)?,
                    index,
                    series: Some(key.as_str()),
                })
            }
            (ChartKind::Pie, ChartEvent::Slice { index }) => Some(ChartSelection {
                row: self.rows.get(index)?,
                index,
                series: None,
            }),
            (ChartKind::Line, ChartEvent::Point { series, index }) => {
                let index = index?;
                let key = self.data_keys.get(series)?;
                Some(ChartSelection {
                    row: self.rows.get(index)?,
                    index,
                    series: Some(key.as_str()),
                })
            }
            _ => None,
        }
    }
}

/// Keyboard focus within a chart: which row and which series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartCursor {
    pub index: usize,
    pub series: usize,
}

impl ChartCursor {
    pub fn next_row(&mut self, spec: &ChartSpec) {
        if !spec.rows.is_empty() {
            self.index = (self.index + 1) % spec.rows.len();
        }
    }

    pub fn prev_row(&mut self, spec: &ChartSpec) {
        if !spec.rows.is_empty() {
            self.index = (self.index + spec.rows.len() - 1) % spec.rows.len();
        }
    }

    /// The event a key press on the focused point would emit.
    pub fn event(&self, spec: &ChartSpec) -> Option<ChartEvent> {
        if spec.rows.is_empty() {
            return None;
        }
        match spec.kind {
            ChartKind::Bar => Some(ChartEvent::Bar {
                index: self.index,
                series: self.series,
            }),
            ChartKind::Pie => Some(ChartEvent::Slice { index: self.index }),
            ChartKind::Line => Some(ChartEvent::Point {
                series: self.series,
                index: Some(self.index),
            }),
            ChartKind::Unsupported(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw a chart into `area`. `cursor` highlights the focused point.
pub fn render(frame: &mut Frame, area: Rect, spec: &ChartSpec, cursor: Option<&ChartCursor>) {
    let block = Block::default()
        .title(spec.title.clone().unwrap_or_default())
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .borders(Borders::NONE);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let ChartKind::Unsupported(name) = &spec.kind {
        frame.render_widget(
            Paragraph::new(format!("Unsupported chart type: {name}"))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    if spec.rows.is_empty() || spec.data_keys.is_empty() {
        frame.render_widget(
            Paragraph::new("No data to display.")
                .style(FOOTER_STYLE)
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let legend_height = u16::from(spec.show_legend && spec.kind != ChartKind::Pie);
    let [plot_area, legend_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(legend_height)]).areas(inner);

    match spec.kind {
        ChartKind::Bar => render_bar(frame, plot_area, spec, cursor),
        ChartKind::Line => render_line(frame, plot_area, spec, cursor),
        ChartKind::Pie => render_pie(frame, inner, spec, cursor),
        ChartKind::Unsupported(_) => {}
    }

    if legend_height > 0 {
        frame.render_widget(Paragraph::new(series_legend(spec)), legend_area);
    }
}

fn series_legend(spec: &ChartSpec) -> Line<'static> {
    let mut spans = Vec::new();
    for i in 0..spec.data_keys.len() {
        spans.push(Span::styled(
            " \u{25a0} ",
            Style::default().fg(spec.series_color(i)),
        ));
        spans.push(Span::raw(spec.series_label(i)));
    }
    Line::from(spans)
}

fn render_bar(frame: &mut Frame, area: Rect, spec: &ChartSpec, cursor: Option<&ChartCursor>) {
    let groups: Vec<BarGroup> = spec
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let bars: Vec<Bar> = spec
                .data_keys
                .iter()
                .enumerate()
                .map(|(s, key)| {
                    let value = row.value(key);
                    let mut style = Style::default().fg(spec.series_color(s));
                    if cursor.is_some_and(|c| c.index == i && c.series == s) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let text = if spec.show_labels {
                        ChartSpec::bar_label(value).unwrap_or_default()
                    } else {
                        String::new()
                    };
                    Bar::default()
                        .value(ChartSpec::bar_height(value))
                        .text_value(text)
                        .style(style)
                })
                .collect();
            BarGroup::default()
                .label(Line::from(row.label(&spec.category_key)))
                .bars(&bars)
        })
        .collect();

    let direction = match spec.orientation {
        BarOrientation::Vertical => Direction::Vertical,
        BarOrientation::Horizontal => Direction::Horizontal,
    };
    let bar_width = match spec.orientation {
        BarOrientation::Vertical => 3,
        BarOrientation::Horizontal => 1,
    };

    let mut chart = BarChart::default()
        .direction(direction)
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(1);
    for group in groups {
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}

fn render_line(frame: &mut Frame, area: Rect, spec: &ChartSpec, cursor: Option<&ChartCursor>) {
    let series: Vec<Vec<(f64, f64)>> = spec
        .data_keys
        .iter()
        .map(|key| {
            spec.rows
                .iter()
                .enumerate()
                .map(|(i, row)| (i as f64, row.value(key)))
                .collect()
        })
        .collect();

    let focused: Vec<(f64, f64)> = cursor
        .and_then(|c| series.get(c.series).and_then(|points| points.get(c.index)))
        .copied()
        .into_iter()
        .collect();

    let (mut y_min, mut y_max) = series
        .iter()
        .flatten()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    y_min = y_min.min(0.0);

    let mut datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(s, points)| {
            Dataset::default()
                .name(spec.series_label(s))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(spec.series_color(s)))
                .data(points)
        })
        .collect();
    if !focused.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
                .data(&focused),
        );
    }

    let last = spec.rows.len().saturating_sub(1);
    let x_labels: Vec<String> = vec![
        spec.rows
            .first()
            .map(|r| r.label(&spec.category_key))
            .unwrap_or_default(),
        spec.rows
            .last()
            .map(|r| r.label(&spec.category_key))
            .unwrap_or_default(),
    ];
    let y_labels: Vec<String> = vec![compact_number(y_min.round()), compact_number(y_max.round())];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(FOOTER_STYLE)
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(FOOTER_STYLE)
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

/// Which slice a point of the unit circle falls into, measured clockwise
/// from twelve o'clock.
fn slice_at(angle_fraction: f64, cumulative: &[f64]) -> usize {
    cumulative
        .iter()
        .position(|&end| angle_fraction < end)
        .unwrap_or(cumulative.len().saturating_sub(1))
}

fn render_pie(frame: &mut Frame, area: Rect, spec: &ChartSpec, cursor: Option<&ChartCursor>) {
    let legend_width = if spec.show_legend { 34 } else { 0 };
    let [pie_area, legend_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(legend_width)]).areas(area);

    let total = spec.pie_total();
    let mut running = 0.0;
    let cumulative: Vec<f64> = (0..spec.rows.len())
        .map(|i| {
            running += spec.slice_percent(i) / 100.0;
            running
        })
        .collect();

    // Braille gives 2x4 dots per cell.
    let cols = (pie_area.width as usize * 2).max(1);
    let rows = (pie_area.height as usize * 4).max(1);
    let mut slices: Vec<Vec<(f64, f64)>> = vec![Vec::new(); spec.rows.len()];
    if total > 0.0 {
        for r in 0..rows {
            for c in 0..cols {
                let x = (c as f64 + 0.5) / cols as f64 * 2.0 - 1.0;
                let y = 1.0 - (r as f64 + 0.5) / rows as f64 * 2.0;
                if x * x + y * y > 1.0 {
                    continue;
                }
                let angle = x.atan2(y).rem_euclid(std::f64::consts::TAU);
                let idx = slice_at(angle / std::f64::consts::TAU, &cumulative);
                slices[idx].push((x, y));
            }
        }
    }

    let colored: Vec<(Vec<(f64, f64)>, Color)> = slices
        .into_iter()
        .enumerate()
        .map(|(i, pts)| (pts, spec.slice_color(i)))
        .collect();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (coords, color) in &colored {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }
        });
    frame.render_widget(canvas, pie_area);

    if spec.show_legend {
        let key = spec.pie_key().unwrap_or_default();
        let lines: Vec<Line> = spec
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let focused = cursor.is_some_and(|c| c.index == i);
                let name_style = if focused {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default()
                };
                let pct = if spec.show_labels {
                    spec.pie_label(i).unwrap_or_default()
                } else {
                    String::new()
                };
                Line::from(vec![
                    Span::styled(" \u{25a0} ", Style::default().fg(spec.slice_color(i))),
                    Span::styled(format!("{:<16}", row.label(&spec.category_key)), name_style),
                    Span::raw(format!("{:>9} ", compact_number(row.value(key)))),
                    Span::styled(format!("{pct:>4}"), FOOTER_STYLE),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), legend_area);
    }
}
