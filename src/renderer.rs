//! Declarative scene description shared by both visualizations.
//!
//! Visualization state never touches the DOM. It produces [`ElementSpec`]
//! lists, one per [`Layer`], and hands them to a [`Renderer`]. A renderer
//! keeps a [`Scene`] per layer and reconciles each new list against it by key:
//! unseen keys enter, known keys update in place (and animate), keys that
//! disappeared exit.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

/// Named z-ordered groups of elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
	MatrixPortraits,
	MatrixCells,
	MatrixLabels,
	Axis,
	Arrows,
	Films,
	Titles,
	InfoBubbles,
	Selector,
	Legend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
	Rect,
	Circle,
	Image,
	Text,
	Path,
}

/// Animation timing for moving an element to new attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Transition {
	pub delay_ms: u32,
	pub duration_ms: u32,
}

impl Transition {
	pub fn new(delay_ms: u32, duration_ms: u32) -> Self {
		Self {
			delay_ms,
			duration_ms,
		}
	}

	pub fn end_ms(&self) -> u32 {
		self.delay_ms + self.duration_ms
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
	Start,
	Middle,
}

impl Anchor {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Start => "start",
			Self::Middle => "middle",
		}
	}
}

/// Target visual attributes. Position is applied as a translation so that it
/// animates with CSS.
#[derive(Clone, Debug, PartialEq)]
pub struct Attrs {
	pub x: f64,
	pub y: f64,
	pub width: Option<f64>,
	pub height: Option<f64>,
	pub radius: Option<f64>,
	pub fill: Option<String>,
	pub stroke: Option<String>,
	pub stroke_width: Option<f64>,
	pub opacity: f64,
	pub href: Option<String>,
	pub lines: Vec<String>,
	pub font_size: Option<f64>,
	pub anchor: Option<Anchor>,
	pub path: Option<String>,
	pub marker_end: Option<String>,
	pub class: Option<&'static str>,
}

impl Default for Attrs {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			width: None,
			height: None,
			radius: None,
			fill: None,
			stroke: None,
			stroke_width: None,
			opacity: 1.0,
			href: None,
			lines: Vec::new(),
			font_size: None,
			anchor: None,
			path: None,
			marker_end: None,
			class: None,
		}
	}
}

impl Attrs {
	/// Inline CSS for these attributes, with transition timing when given.
	pub fn css(&self, transition: Option<Transition>) -> String {
		let mut css = String::new();
		let _ = write!(
			css,
			"transform: translate({}px, {}px); opacity: {};",
			fmt_num(self.x),
			fmt_num(self.y),
			fmt_num(self.opacity)
		);
		if let Some(fill) = &self.fill {
			let _ = write!(css, " fill: {fill};");
		}
		if let Some(stroke) = &self.stroke {
			let _ = write!(css, " stroke: {stroke};");
		}
		if let Some(width) = self.stroke_width {
			let _ = write!(css, " stroke-width: {};", fmt_num(width));
		}
		if let Some(size) = self.font_size {
			let _ = write!(css, " font-size: {}px;", fmt_num(size));
		}
		if let Some(t) = transition {
			let _ = write!(
				css,
				" transition: transform {d}ms ease {w}ms, opacity {d}ms ease {w}ms, fill {d}ms ease {w}ms, stroke {d}ms ease {w}ms;",
				d = t.duration_ms,
				w = t.delay_ms
			);
		}
		css
	}
}

/// Compact number formatting for attribute strings.
pub fn fmt_num(v: f64) -> String {
	if !v.is_finite() {
		return "0".into();
	}
	let rounded = (v * 100.0).round() / 100.0;
	if rounded == rounded.trunc() {
		format!("{}", rounded as i64)
	} else {
		format!("{rounded}")
	}
}

/// One element as the visualization wants it drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec {
	pub key: String,
	pub shape: Shape,
	pub attrs: Attrs,
	/// Timing for moving from the previous attributes to these.
	pub transition: Option<Transition>,
	/// Opacity the element starts from when it first enters.
	pub enter_opacity: Option<f64>,
	/// Fade-out applied before the element is removed.
	pub exit: Option<Transition>,
}

impl ElementSpec {
	pub fn new(shape: Shape) -> Self {
		Self {
			key: String::new(),
			shape,
			attrs: Attrs::default(),
			transition: None,
			enter_opacity: None,
			exit: None,
		}
	}

	pub fn keyed(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();
		self
	}

	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.attrs.x = x;
		self.attrs.y = y;
		self
	}

	pub fn size(mut self, width: f64, height: f64) -> Self {
		self.attrs.width = Some(width);
		self.attrs.height = Some(height);
		self
	}

	pub fn radius(mut self, r: f64) -> Self {
		self.attrs.radius = Some(r);
		self
	}

	pub fn fill(mut self, color: impl Into<String>) -> Self {
		self.attrs.fill = Some(color.into());
		self
	}

	pub fn stroke(mut self, color: impl Into<String>, width: f64) -> Self {
		self.attrs.stroke = Some(color.into());
		self.attrs.stroke_width = Some(width);
		self
	}

	pub fn opacity(mut self, opacity: f64) -> Self {
		self.attrs.opacity = opacity;
		self
	}

	pub fn href(mut self, href: impl Into<String>) -> Self {
		self.attrs.href = Some(href.into());
		self
	}

	pub fn text(mut self, lines: Vec<String>) -> Self {
		self.attrs.lines = lines;
		self
	}

	pub fn font(mut self, size: f64, anchor: Anchor) -> Self {
		self.attrs.font_size = Some(size);
		self.attrs.anchor = Some(anchor);
		self
	}

	pub fn path(mut self, d: impl Into<String>) -> Self {
		self.attrs.path = Some(d.into());
		self
	}

	pub fn marker_end(mut self, marker: impl Into<String>) -> Self {
		self.attrs.marker_end = Some(marker.into());
		self
	}

	pub fn class(mut self, class: &'static str) -> Self {
		self.attrs.class = Some(class);
		self
	}

	pub fn transition(mut self, t: Transition) -> Self {
		self.transition = Some(t);
		self
	}

	/// Enter from transparent with the element's own transition.
	pub fn fade_in(mut self) -> Self {
		self.enter_opacity = Some(0.0);
		self
	}

	pub fn fade_out(mut self, t: Transition) -> Self {
		self.exit = Some(t);
		self
	}
}

/// Data join: one spec per datum, keyed by `key`.
pub fn bind<T>(
	data: &[T],
	key: impl Fn(&T) -> String,
	spec: impl Fn(&T, usize) -> ElementSpec,
) -> Vec<ElementSpec> {
	data.iter()
		.enumerate()
		.map(|(i, d)| spec(d, i).keyed(key(d)))
		.collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Drawn with its entrance attributes, not yet settled.
	Entering,
	Live,
	/// Fading out, removed on the next sweep.
	Exiting,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	pub spec: ElementSpec,
	pub phase: Phase,
}

impl SceneNode {
	/// Attributes to paint right now.
	pub fn shown(&self) -> Attrs {
		match (self.phase, self.spec.enter_opacity) {
			(Phase::Entering, Some(opacity)) => Attrs {
				opacity,
				..self.spec.attrs.clone()
			},
			(Phase::Exiting, _) => Attrs {
				opacity: 0.0,
				..self.spec.attrs.clone()
			},
			_ => self.spec.attrs.clone(),
		}
	}

	/// Timing to paint [`Self::shown`] with.
	pub fn timing(&self) -> Option<Transition> {
		match self.phase {
			Phase::Entering => None,
			Phase::Live => self.spec.transition,
			Phase::Exiting => self.spec.exit,
		}
	}
}

/// What a reconcile pass did, by key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
	pub entered: Vec<String>,
	pub updated: Vec<String>,
	pub exited: Vec<String>,
}

/// Retained elements of one layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	nodes: Vec<SceneNode>,
}

impl Scene {
	#[cfg(test)]
	pub fn nodes(&self) -> &[SceneNode] {
		&self.nodes
	}

	pub fn get(&self, key: &str) -> Option<&SceneNode> {
		self.nodes.iter().find(|n| n.spec.key == key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.nodes.iter().map(|n| n.spec.key.as_str())
	}

	pub fn reconcile(&mut self, specs: Vec<ElementSpec>) -> Reconciliation {
		let mut report = Reconciliation::default();
		let mut old: BTreeMap<String, SceneNode> = std::mem::take(&mut self.nodes)
			.into_iter()
			.map(|n| (n.spec.key.clone(), n))
			.collect();
		let mut seen = HashSet::new();

		for spec in specs {
			if !seen.insert(spec.key.clone()) {
				log::debug!("Duplicate scene key {:?} ignored", spec.key);
				continue;
			}
			let phase = match old.remove(&spec.key) {
				Some(prev) if prev.phase != Phase::Exiting => {
					report.updated.push(spec.key.clone());
					Phase::Live
				}
				_ => {
					report.entered.push(spec.key.clone());
					Phase::Entering
				}
			};
			self.nodes.push(SceneNode { spec, phase });
		}

		for (key, mut node) in old {
			if node.phase == Phase::Exiting {
				self.nodes.push(node);
				continue;
			}
			report.exited.push(key);
			if node.spec.exit.is_some() {
				node.phase = Phase::Exiting;
				self.nodes.push(node);
			}
		}
		report
	}

	/// Entering nodes become live and start their transition.
	pub fn settle(&mut self) {
		for node in &mut self.nodes {
			if node.phase == Phase::Entering {
				node.phase = Phase::Live;
			}
		}
	}

	/// Drops exited nodes, returning how many.
	pub fn sweep(&mut self) -> usize {
		let before = self.nodes.len();
		self.nodes.retain(|n| n.phase != Phase::Exiting);
		before - self.nodes.len()
	}

	/// Longest pending exit animation, if any node is exiting.
	pub fn exit_ms(&self) -> Option<u32> {
		self.nodes
			.iter()
			.filter(|n| n.phase == Phase::Exiting)
			.map(|n| n.spec.exit.map(|t| t.end_ms()).unwrap_or(0))
			.max()
	}
}

/// Receives element lists and keeps them on screen.
pub trait Renderer {
	fn reconcile(&mut self, layer: Layer, elements: Vec<ElementSpec>) -> Reconciliation;
}

/// Headless renderer: keeps scenes in memory.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct SceneSet {
	layers: BTreeMap<Layer, Scene>,
}

#[cfg(test)]
impl SceneSet {
	pub fn layer(&self, layer: Layer) -> Option<&Scene> {
		self.layers.get(&layer)
	}

	pub fn settle(&mut self) {
		self.layers.values_mut().for_each(Scene::settle);
	}

	pub fn sweep(&mut self) -> usize {
		self.layers.values_mut().map(Scene::sweep).sum()
	}
}

#[cfg(test)]
impl Renderer for SceneSet {
	fn reconcile(&mut self, layer: Layer, elements: Vec<ElementSpec>) -> Reconciliation {
		self.layers.entry(layer).or_default().reconcile(elements)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rects(keys: &[&str]) -> Vec<ElementSpec> {
		bind(keys, |k| k.to_string(), |_, i| {
			ElementSpec::new(Shape::Rect)
				.at(i as f64 * 10.0, 0.0)
				.fade_in()
				.fade_out(Transition::new(0, 200))
		})
	}

	#[test]
	fn enter_update_exit_by_key() {
		let mut scene = Scene::default();
		let first = scene.reconcile(rects(&["a", "b"]));
		assert_eq!(first.entered, vec!["a", "b"]);
		assert!(first.updated.is_empty());

		let second = scene.reconcile(rects(&["b", "c"]));
		assert_eq!(second.entered, vec!["c"]);
		assert_eq!(second.updated, vec!["b"]);
		assert_eq!(second.exited, vec!["a"]);

		assert_eq!(scene.get("b").map(|n| n.spec.attrs.x), Some(0.0));
		assert_eq!(scene.get("a").map(|n| n.phase), Some(Phase::Exiting));
		assert_eq!(scene.exit_ms(), Some(200));
		assert_eq!(scene.sweep(), 1);
		assert_eq!(scene.keys().collect::<Vec<_>>(), vec!["b", "c"]);
	}

	#[test]
	fn entering_nodes_start_transparent() {
		let mut scene = Scene::default();
		scene.reconcile(rects(&["a"]));
		let node = scene.get("a").unwrap();
		assert_eq!(node.shown().opacity, 0.0);
		assert_eq!(node.timing(), None);
		scene.settle();
		assert_eq!(scene.get("a").unwrap().shown().opacity, 1.0);
	}

	#[test]
	fn exiting_node_can_reenter() {
		let mut scene = Scene::default();
		scene.reconcile(rects(&["a"]));
		scene.reconcile(Vec::new());
		let report = scene.reconcile(rects(&["a"]));
		assert_eq!(report.entered, vec!["a"]);
		assert_eq!(scene.nodes().len(), 1);
	}

	#[test]
	fn nodes_without_exit_are_dropped_immediately() {
		let mut scene = Scene::default();
		scene.reconcile(vec![ElementSpec::new(Shape::Text).keyed("t")]);
		let report = scene.reconcile(Vec::new());
		assert_eq!(report.exited, vec!["t"]);
		assert!(scene.nodes().is_empty());
		assert_eq!(scene.exit_ms(), None);
	}

	#[test]
	fn duplicate_keys_keep_first() {
		let mut scene = Scene::default();
		scene.reconcile(vec![
			ElementSpec::new(Shape::Rect).keyed("a").at(1.0, 0.0),
			ElementSpec::new(Shape::Rect).keyed("a").at(2.0, 0.0),
		]);
		assert_eq!(scene.nodes().len(), 1);
		assert_eq!(scene.get("a").unwrap().spec.attrs.x, 1.0);
	}

	#[test]
	fn css_carries_position_and_timing() {
		let attrs = ElementSpec::new(Shape::Rect)
			.at(12.5, 3.0)
			.fill("red")
			.stroke("none", 1.0)
			.attrs;
		let css = attrs.css(Some(Transition::new(50, 200)));
		assert!(css.starts_with("transform: translate(12.5px, 3px); opacity: 1;"));
		assert!(css.contains("fill: red;"));
		assert!(css.contains("transform 200ms ease 50ms"));
	}

	#[test]
	fn scene_set_keeps_layers_apart() {
		let mut set = SceneSet::default();
		set.reconcile(Layer::Films, rects(&["a"]));
		set.reconcile(Layer::Titles, rects(&["a", "b"]));
		assert_eq!(set.layer(Layer::Films).unwrap().nodes().len(), 1);
		assert_eq!(set.layer(Layer::Titles).unwrap().nodes().len(), 2);
		assert!(set.layer(Layer::Arrows).is_none());
	}
}
