use crate::config::{IconSet, PlotFlowGeometry, title_case};
use crate::renderer::{Anchor, ElementSpec, Layer, Renderer, Shape, Transition, bind, fmt_num};

use super::state::{FOCUS_STROKE, NO_APPEARANCE_STROKE, PlotFlow, UNFOCUSED_STROKE};
use super::types::{Edge, LayoutMode, Redraw};

const TITLE_FONT: f64 = 10.0;
const SELECTOR_RADIUS: f64 = 20.0;
const SELECTOR_CAPTION: &str =
	"Click a character (or group of characters) to highlight only their films!";
const FADE_OUT: Transition = Transition {
	delay_ms: 0,
	duration_ms: 200,
};
const AXIS_FADE: Transition = Transition {
	delay_ms: 0,
	duration_ms: 1000,
};

/// Layers the diagram draws into, back to front.
pub const LAYERS: [Layer; 7] = [
	Layer::Axis,
	Layer::Arrows,
	Layer::Films,
	Layer::Titles,
	Layer::InfoBubbles,
	Layer::Selector,
	Layer::Legend,
];

/// Pushes every layer of the diagram to the renderer.
pub fn render(
	flow: &PlotFlow,
	geometry: &PlotFlowGeometry,
	icons: &IconSet,
	reason: Redraw,
	renderer: &mut impl Renderer,
) {
	renderer.reconcile(Layer::Films, films(flow, geometry, reason));
	renderer.reconcile(Layer::Titles, titles(flow, geometry, reason));
	renderer.reconcile(Layer::InfoBubbles, info_bubbles(flow, geometry, icons, reason));
	renderer.reconcile(Layer::Arrows, arrows(flow, geometry, reason));
	renderer.reconcile(Layer::Axis, axis(flow));
	renderer.reconcile(Layer::Selector, selector(flow, icons));
	renderer.reconcile(Layer::Legend, legend(flow, geometry));
}

fn movie_timing(flow: &PlotFlow, reason: Redraw, i: usize) -> Option<Transition> {
	let i = i as u32;
	match reason {
		Redraw::Enter => Some(Transition::new(i * 200, 300)),
		Redraw::Relayout => {
			let delay = match flow.mode() {
				LayoutMode::Branching => i * 50,
				LayoutMode::Timeline => 200 + i * 50,
			};
			Some(Transition::new(delay, 200))
		}
		Redraw::Restyle | Redraw::Resize => None,
	}
}

fn with_timing(spec: ElementSpec, timing: Option<Transition>) -> ElementSpec {
	match timing {
		Some(t) => spec.transition(t),
		None => spec,
	}
}

fn films(flow: &PlotFlow, g: &PlotFlowGeometry, reason: Redraw) -> Vec<ElementSpec> {
	bind(
		flow.movies(),
		|m| m.title.clone(),
		|m, i| {
			let style = flow.movie_style(m);
			let spec = ElementSpec::new(Shape::Rect)
				.size(g.rect_width, g.rect_height)
				.fill(style.fill)
				.stroke(style.stroke, style.stroke_width)
				.class("rect-film")
				.fade_in();
			let spec = match flow.position(m) {
				Some((x, y)) => spec.at(x - g.rect_width / 2.0, y - g.rect_height / 2.0),
				None => spec.opacity(0.0),
			};
			with_timing(spec, movie_timing(flow, reason, i))
		},
	)
}

fn titles(flow: &PlotFlow, g: &PlotFlowGeometry, reason: Redraw) -> Vec<ElementSpec> {
	bind(
		flow.movies(),
		|m| m.title.clone(),
		|m, i| {
			let spec = ElementSpec::new(Shape::Text)
				.text(wrap_words(&m.title, g.rect_width - 4.0, TITLE_FONT))
				.font(TITLE_FONT, Anchor::Middle)
				.class("film-title")
				.fade_in();
			let spec = match flow.position(m) {
				Some((x, y)) => spec.at(x, y),
				None => spec.opacity(0.0),
			};
			with_timing(spec, movie_timing(flow, reason, i))
		},
	)
}

fn info_bubbles(
	flow: &PlotFlow,
	g: &PlotFlowGeometry,
	icons: &IconSet,
	reason: Redraw,
) -> Vec<ElementSpec> {
	flow.tooltip_rules()
		.map(|(rule, movie)| {
			let visible = flow.selection() == Some(rule.tag.as_str());
			let spec = ElementSpec::new(Shape::Image)
				.keyed(format!("info:{}:{}", rule.tag, rule.movie))
				.size(10.0, 10.0)
				.href(icons.info.clone())
				.class("info-bubble");
			let spec = match flow.position(movie) {
				Some((x, y)) => spec
					.at(x + g.rect_width / 2.0 - 12.0, y - g.rect_height / 2.0 + 2.0)
					.opacity(if visible { 1.0 } else { 0.0 }),
				None => spec.opacity(0.0),
			};
			with_timing(spec, movie_timing(flow, reason, 2))
		})
		.collect()
}

/// `d3.linkHorizontal` between two points.
pub fn link_horizontal(source: (f64, f64), target: (f64, f64)) -> String {
	let mid = (source.0 + target.0) / 2.0;
	format!(
		"M{},{}C{},{},{},{},{},{}",
		fmt_num(source.0),
		fmt_num(source.1),
		fmt_num(mid),
		fmt_num(source.1),
		fmt_num(mid),
		fmt_num(target.1),
		fmt_num(target.0),
		fmt_num(target.1)
	)
}

/// Entrance delay for an edge; early flows in the story draw first.
fn edge_delay(flow: &PlotFlow, edge: &Edge) -> u32 {
	if flow.toggled_before() {
		return 1000;
	}
	let source = &flow.movies()[edge.source];
	let (x, y) = (source.x.unwrap_or(0.0), source.y.unwrap_or(0.0));
	(200.0 + x * 400.0 + y * 100.0).max(0.0) as u32
}

pub fn edge_key(flow: &PlotFlow, edge: &Edge) -> String {
	let movies = flow.movies();
	format!("{}->{}", movies[edge.source].title, movies[edge.target].title)
}

fn arrows(flow: &PlotFlow, g: &PlotFlowGeometry, reason: Redraw) -> Vec<ElementSpec> {
	if flow.mode() != LayoutMode::Branching {
		return Vec::new();
	}
	let movies = flow.movies();
	flow.edges()
		.iter()
		.filter_map(|edge| {
			let (sx, sy) = flow.position(&movies[edge.source])?;
			let (tx, ty) = flow.position(&movies[edge.target])?;
			let style = flow.edge_style(edge);
			let spec = ElementSpec::new(Shape::Path)
				.keyed(edge_key(flow, edge))
				.path(link_horizontal(
					(sx + g.rect_width / 2.0, sy),
					(tx - g.rect_width / 2.0 - 5.0, ty),
				))
				.fill("none")
				.stroke(style.stroke, style.stroke_width)
				.marker_end(style.marker.url())
				.class("arrow")
				.fade_in()
				.fade_out(FADE_OUT);
			let timing = match reason {
				Redraw::Restyle | Redraw::Resize => None,
				Redraw::Enter | Redraw::Relayout => {
					Some(Transition::new(edge_delay(flow, edge), 1000))
				}
			};
			Some(with_timing(spec, timing))
		})
		.collect()
}

fn axis(flow: &PlotFlow) -> Vec<ElementSpec> {
	if flow.mode() != LayoutMode::Timeline {
		return Vec::new();
	}
	let (width, height) = flow.size();
	let scale = flow.x_scale();
	let domain_line = ElementSpec::new(Shape::Path)
		.keyed("domain")
		.path(format!("M0,{}H{}", fmt_num(height), fmt_num(width)))
		.fill("none")
		.stroke("black", 1.0);
	let ticks = scale.domain().iter().filter_map(|&year| {
		let x = scale.apply(year)?;
		Some(
			ElementSpec::new(Shape::Text)
				.keyed(format!("tick:{year}"))
				.at(x, height + 18.0)
				.text(vec![format!("{}", year as i64)])
				.font(11.0, Anchor::Middle)
				.class("tick"),
		)
	});
	std::iter::once(domain_line)
		.chain(ticks)
		.map(|spec| spec.fade_in().transition(AXIS_FADE).fade_out(AXIS_FADE))
		.collect()
}

/// Tag behind a selector element key such as `circle:hulk`.
pub fn selector_tag(key: &str) -> Option<&str> {
	let (kind, tag) = key.split_once(':')?;
	matches!(kind, "circle" | "icon" | "label").then_some(tag)
}

fn selector(flow: &PlotFlow, icons: &IconSet) -> Vec<ElementSpec> {
	let (_, height) = flow.size();
	let top = height + 50.0;
	let r = SELECTOR_RADIUS;
	let mut specs = vec![
		ElementSpec::new(Shape::Text)
			.keyed("caption")
			.at(0.0, top - 10.0)
			.text(vec![SELECTOR_CAPTION.into()])
			.font(12.0, Anchor::Start),
	];
	for (i, tag) in flow.selector_tags().iter().enumerate() {
		let left = i as f64 * 3.0 * r;
		let focused = flow.selector_focused(tag);
		let (fill, stroke) = if focused {
			(flow.palette().color(tag), FOCUS_STROKE)
		} else {
			("none", UNFOCUSED_STROKE)
		};
		specs.push(
			ElementSpec::new(Shape::Circle)
				.keyed(format!("circle:{tag}"))
				.at(left + r, top + r)
				.radius(r)
				.fill(fill)
				.stroke(stroke, 1.0)
				.class("node"),
		);
		specs.push(
			ElementSpec::new(Shape::Image)
				.keyed(format!("icon:{tag}"))
				.at(left, top + 4.0)
				.size(2.0 * r, 2.0 * r)
				.href(icons.character(tag)),
		);
		specs.push(
			ElementSpec::new(Shape::Text)
				.keyed(format!("label:{tag}"))
				.at(left + r, top + 2.0 * r + 10.0)
				.text(wrap_words(&title_case(tag), 2.0 * r, TITLE_FONT))
				.font(TITLE_FONT, Anchor::Middle)
				.class("film-title"),
		);
	}
	specs
}

struct LegendEntry {
	colored: bool,
	filled: bool,
	text: &'static str,
}

const LEGEND: [LegendEntry; 3] = [
	LegendEntry {
		colored: true,
		filled: true,
		text: "Full appearance",
	},
	LegendEntry {
		colored: true,
		filled: false,
		text: "Post-credits appearance",
	},
	LegendEntry {
		colored: false,
		filled: false,
		text: "No appearance",
	},
];

fn legend(flow: &PlotFlow, g: &PlotFlowGeometry) -> Vec<ElementSpec> {
	let (width, height) = flow.size();
	let (left, top) = (width - 3.0 * (g.rect_width + 10.0), height + 75.0);
	let mut specs = vec![
		ElementSpec::new(Shape::Text)
			.keyed("title")
			.at(left, top - 10.0)
			.text(vec!["How to read this".into()])
			.font(15.0, Anchor::Start),
	];
	for (i, entry) in LEGEND.iter().enumerate() {
		let x = left + i as f64 * (g.rect_width + 10.0) - 5.0;
		let stroke_width = if entry.filled {
			0.0
		} else if entry.colored {
			4.0
		} else {
			1.0
		};
		specs.push(
			ElementSpec::new(Shape::Rect)
				.keyed(format!("swatch:{i}"))
				.at(x, top)
				.size(g.rect_width, g.rect_height)
				.fill(if entry.filled { FOCUS_STROKE } else { "none" })
				.stroke(
					if entry.colored {
						FOCUS_STROKE
					} else {
						NO_APPEARANCE_STROKE
					},
					stroke_width,
				)
				.class("rect-film"),
		);
		let text_y = if entry.colored && !entry.filled {
			g.rect_height / 2.0 - 3.0
		} else {
			g.rect_height / 2.0
		};
		specs.push(
			ElementSpec::new(Shape::Text)
				.keyed(format!("legend:{i}"))
				.at(x + g.rect_width / 2.0, top + text_y)
				.text(wrap_words(entry.text, g.rect_width - 3.0, TITLE_FONT))
				.font(TITLE_FONT, Anchor::Middle)
				.class("film-title"),
		);
	}
	specs
}

/// Greedy word wrap using an average glyph width of 0.6em.
pub fn wrap_words(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
	let max_chars = ((max_width / (font_size * 0.6)).floor() as usize).max(1);
	let mut lines: Vec<String> = Vec::new();
	let mut line = String::new();
	for word in text.split_whitespace() {
		if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
			lines.push(std::mem::take(&mut line));
		}
		if !line.is_empty() {
			line.push(' ');
		}
		line.push_str(word);
	}
	if !line.is_empty() {
		lines.push(line);
	}
	lines
}
