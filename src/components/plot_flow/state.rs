use std::collections::HashMap;

use super::scale::{BandScale, PointScale};
use super::types::{
	Edge, EdgeStyle, Field, LayoutMode, Marker, Movie, MovieRecord, NodeStyle,
};
use crate::config::{Palette, TooltipRule, VisConfig};

/// Selector entry that clears the selection.
pub const RESET: &str = "reset";
/// Group pinned to the front of the character selector.
const LEAD_GROUP: &str = "avengers";

pub const NO_APPEARANCE_STROKE: &str = "#aeaeae";
pub const FOCUS_STROKE: &str = "#f78f3f";
pub const EDGE_COLOR: &str = "black";
pub const EDGE_DIM_COLOR: &str = "darkgray";
pub const UNFOCUSED_STROKE: &str = "darkgray";
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;
pub const EMPHASIZED_STROKE_WIDTH: f64 = 4.0;

/// Parses and orders movies, then resolves `flows_into` titles to edges.
///
/// Targets that name no movie are dropped.
pub fn wrangle(records: Vec<MovieRecord>) -> (Vec<Movie>, Vec<Edge>) {
	let mut movies: Vec<Movie> = records.into_iter().map(Movie::from).collect();
	assign_year_index(&mut movies);

	let links: Vec<(String, String)> = movies
		.iter()
		.flat_map(|m| m.flows_into.iter().map(move |t| (m.title.clone(), t.clone())))
		.collect();

	movies.sort_by(|a, b| a.order_key().total_cmp(&b.order_key()));

	let mut index = HashMap::new();
	for (i, movie) in movies.iter().enumerate() {
		index.entry(movie.title.as_str()).or_insert(i);
	}
	let edges = links
		.iter()
		.filter_map(|(source, target)| {
			let edge = index.get(source.as_str()).zip(index.get(target.as_str()));
			if edge.is_none() {
				log::warn!("Dropping flow {source:?} -> {target:?}: no such movie");
			}
			edge.map(|(&source, &target)| Edge { source, target })
		})
		.collect();
	(movies, edges)
}

/// Two passes: per-year ordinal in input order, then totals and fractions.
fn assign_year_index(movies: &mut [Movie]) {
	let mut counts: HashMap<u64, usize> = HashMap::new();
	for movie in movies.iter_mut() {
		let count = counts.entry(movie.year.to_bits()).or_insert(0);
		movie.year_count = *count;
		*count += 1;
	}
	let max_total = counts.values().copied().max().unwrap_or(1);
	if max_total >= 100 {
		log::warn!("{max_total} movies share a year; canonical ordering assumes fewer than 100");
	}
	for movie in movies.iter_mut() {
		movie.year_total = counts[&movie.year.to_bits()];
		movie.all_frac = (movie.year_count + 1) as f64 / max_total as f64;
	}
}

/// Layout, selection and highlight state of the plot-flow diagram.
#[derive(Clone, Debug)]
pub struct PlotFlow {
	movies: Vec<Movie>,
	edges: Vec<Edge>,
	mode: LayoutMode,
	toggles: u32,
	selection: Option<String>,
	hovered_selector: Option<String>,
	palette: Palette,
	tooltip_rules: Vec<TooltipRule>,
	width: f64,
	height: f64,
	x: PointScale,
	y: BandScale,
}

impl PlotFlow {
	pub fn new(records: Vec<MovieRecord>, config: &VisConfig, width: f64, height: f64) -> Self {
		let (movies, edges) = wrangle(records);
		log::info!("Plot flow with {} movies and {} flows", movies.len(), edges.len());
		let mut flow = Self {
			movies,
			edges,
			mode: LayoutMode::Timeline,
			toggles: 0,
			selection: None,
			hovered_selector: None,
			palette: config.palette.clone(),
			tooltip_rules: config.tooltip_rules.clone(),
			width,
			height,
			x: PointScale::new((0.0, width)),
			y: BandScale::new((height, 0.0)).padding(10.0, 10.0),
		};
		flow.update_scales();
		flow
	}

	/// Movies in canonical order.
	pub fn movies(&self) -> &[Movie] {
		&self.movies
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn mode(&self) -> LayoutMode {
		self.mode
	}

	pub fn active_fields(&self) -> (Field, Field) {
		self.mode.active_fields()
	}

	/// True once branching has been shown before.
	pub fn toggled_before(&self) -> bool {
		self.toggles > 1
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	pub fn x_scale(&self) -> &PointScale {
		&self.x
	}

	pub fn toggle_branching(&mut self) {
		self.mode = self.mode.toggled();
		self.toggles += 1;
		log::info!("Plot flow layout: {:?}", self.mode);
		self.update_scales();
	}

	/// New plot area; domains are kept, ranges follow the size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.x.set_range((0.0, width));
		self.y.set_range((height, 0.0));
	}

	/// Recomputes both domains from the active fields.
	pub fn update_scales(&mut self) {
		let (fx, fy) = self.active_fields();
		self.x.set_domain(self.movies.iter().filter_map(|m| m.field(fx)));
		self.y.set_domain(self.movies.iter().filter_map(|m| m.field(fy)));
	}

	/// Screen center of a movie box, `None` if a field is missing.
	pub fn position(&self, movie: &Movie) -> Option<(f64, f64)> {
		let (fx, fy) = self.active_fields();
		let x = self.x.apply(movie.field(fx)?)?;
		let y = self.y.apply(movie.field(fy)?)?;
		Some((x, y))
	}

	pub fn selection(&self) -> Option<&str> {
		self.selection.as_deref()
	}

	/// Selects a character tag; [`RESET`] clears the selection.
	pub fn select(&mut self, tag: &str) {
		if tag == RESET {
			self.selection = None;
			self.hovered_selector = None;
		} else {
			self.selection = Some(tag.to_string());
		}
		log::debug!("Plot flow selection: {:?}", self.selection);
	}

	pub fn hover_selector(&mut self, tag: Option<&str>) {
		self.hovered_selector = tag.map(String::from);
	}

	pub fn movie_style(&self, movie: &Movie) -> NodeStyle {
		let Some(tag) = self.selection() else {
			return NodeStyle {
				fill: self.palette.color(&movie.group).to_string(),
				stroke: "none".into(),
				stroke_width: DEFAULT_STROKE_WIDTH,
			};
		};
		let color = self.palette.color(tag);
		let features = movie.features(tag);
		let post_credits = movie.has_post_credits(tag);
		NodeStyle {
			fill: if features { color.into() } else { "none".into() },
			stroke: if features {
				"none".into()
			} else if post_credits {
				color.into()
			} else {
				NO_APPEARANCE_STROKE.into()
			},
			stroke_width: if post_credits {
				EMPHASIZED_STROKE_WIDTH
			} else {
				DEFAULT_STROKE_WIDTH
			},
		}
	}

	/// Both endpoints feature `tag`.
	pub fn edge_matches(&self, edge: &Edge, tag: &str) -> bool {
		self.movies[edge.source].features(tag) && self.movies[edge.target].features(tag)
	}

	pub fn edge_style(&self, edge: &Edge) -> EdgeStyle {
		match self.selection() {
			None => EdgeStyle {
				stroke: EDGE_COLOR.into(),
				stroke_width: DEFAULT_STROKE_WIDTH,
				marker: Marker::Arrowhead,
			},
			Some(tag) if self.edge_matches(edge, tag) => EdgeStyle {
				stroke: self.palette.color(tag).into(),
				stroke_width: EMPHASIZED_STROKE_WIDTH,
				marker: Marker::Selected,
			},
			Some(_) => EdgeStyle {
				stroke: EDGE_DIM_COLOR.into(),
				stroke_width: DEFAULT_STROKE_WIDTH,
				marker: Marker::Arrowhead,
			},
		}
	}

	/// Color of the "selected" arrowhead marker.
	pub fn selected_marker_color(&self) -> Option<&str> {
		self.selection().map(|tag| self.palette.color(tag))
	}

	/// Rules whose movie exists, for drawing info bubbles.
	pub fn tooltip_rules(&self) -> impl Iterator<Item = (&TooltipRule, &Movie)> {
		self.tooltip_rules
			.iter()
			.filter_map(|rule| self.find_movie(&rule.movie).map(|m| (rule, m)))
	}

	/// Explanation for hovering `movie` under the current selection.
	pub fn tooltip_for(&self, movie: &str) -> Option<&str> {
		let tag = self.selection()?;
		self.tooltip_rules
			.iter()
			.find(|r| r.tag == tag && r.movie == movie)
			.map(|r| r.text.as_str())
	}

	pub fn find_movie(&self, title: &str) -> Option<&Movie> {
		self.movies.iter().find(|m| m.title == title)
	}

	/// Distinct groups in canonical order, lead group first, then [`RESET`].
	pub fn selector_tags(&self) -> Vec<String> {
		let mut tags: Vec<String> = Vec::new();
		for movie in &self.movies {
			if !tags.contains(&movie.group) {
				tags.push(movie.group.clone());
			}
		}
		tags.sort_by_key(|t| t != LEAD_GROUP);
		tags.push(RESET.into());
		tags
	}

	pub fn selector_focused(&self, tag: &str) -> bool {
		tag != RESET
			&& (self.selection() == Some(tag) || self.hovered_selector.as_deref() == Some(tag))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(title: &str, group: &str, year: f64, flows: &str, characters: &str) -> MovieRecord {
		MovieRecord {
			movie: title.into(),
			group: group.into(),
			year,
			flows_into: crate::data::split_list(flows),
			characters: crate::data::split_list(characters),
			post_creds: Vec::new(),
			x: None,
			y: None,
		}
	}

	fn sample() -> Vec<MovieRecord> {
		let mut hulk = record("The Incredible Hulk", "hulk", 2008.0, "The Avengers", "");
		hulk.post_creds = vec!["iron_man".into()];
		hulk.x = Some(0.0);
		hulk.y = Some(0.0);
		let mut avengers = record(
			"The Avengers",
			"avengers",
			2012.0,
			"Iron Man 3, Howard the Duck",
			"iron_man, hulk, thor",
		);
		avengers.x = Some(1.0);
		avengers.y = Some(1.0);
		let mut im1 = record("Iron Man", "iron_man", 2008.0, "Iron Man 2", "");
		im1.x = Some(0.0);
		im1.y = Some(1.0);
		let mut im2 = record("Iron Man 2", "iron_man", 2010.0, "The Avengers", "nick_fury");
		im2.post_creds = vec!["thor".into()];
		im2.x = Some(0.5);
		im2.y = Some(1.0);
		let mut thor = record("Thor", "thor", 2011.0, "The Avengers", "hulk");
		thor.x = Some(0.5);
		thor.y = Some(2.0);
		let mut im3 = record("Iron Man 3", "iron_man", 2013.0, "", "");
		im3.x = Some(2.0);
		im3.y = Some(1.0);
		let third_2008 = record("Short Film", "nick_fury", 2008.0, "", "");
		vec![hulk, avengers, im1, im2, thor, im3, third_2008]
	}

	fn flow() -> PlotFlow {
		PlotFlow::new(sample(), &VisConfig::default(), 600.0, 160.0)
	}

	#[test]
	fn year_index_is_contiguous_in_input_order() {
		let (movies, _) = wrangle(sample());
		let get = |t: &str| movies.iter().find(|m| m.title == t).unwrap();
		assert_eq!(get("The Incredible Hulk").year_count, 0);
		assert_eq!(get("Iron Man").year_count, 1);
		assert_eq!(get("Short Film").year_count, 2);
		assert_eq!(get("Iron Man").year_total, 3);
		assert_eq!(get("Thor").year_total, 1);
		assert_eq!(get("Thor").all_frac, 1.0 / 3.0);
		assert_eq!(get("Short Film").all_frac, 1.0);
		for m in &movies {
			assert_eq!(m.all_frac, (m.year_count + 1) as f64 / 3.0);
		}
	}

	#[test]
	fn canonical_order_is_year_then_rank() {
		let (movies, _) = wrangle(sample());
		for pair in movies.windows(2) {
			assert!(pair[0].order_key() <= pair[1].order_key());
		}
		let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
		assert_eq!(
			titles,
			vec![
				"The Incredible Hulk",
				"Iron Man",
				"Short Film",
				"Iron Man 2",
				"Thor",
				"The Avengers",
				"Iron Man 3"
			]
		);
	}

	#[test]
	fn group_joins_its_character_list() {
		let (movies, _) = wrangle(sample());
		let thor = movies.iter().find(|m| m.title == "Thor").unwrap();
		assert_eq!(thor.characters, vec!["hulk", "thor"]);
		let avengers = movies.iter().find(|m| m.title == "The Avengers").unwrap();
		assert_eq!(avengers.characters, vec!["iron_man", "hulk", "thor", "avengers"]);
	}

	#[test]
	fn unresolved_flows_are_dropped() {
		let (movies, edges) = wrangle(sample());
		let references: usize = movies.iter().map(|m| m.flows_into.len()).sum();
		assert_eq!(references, 6);
		assert_eq!(edges.len(), 5);
		assert!(edges.iter().all(|e| e.target < movies.len()));
		assert!(
			!edges
				.iter()
				.any(|e| movies[e.target].title == "Howard the Duck")
		);
		let im1 = edges
			.iter()
			.find(|e| movies[e.source].title == "Iron Man")
			.unwrap();
		assert_eq!(movies[im1.target].title, "Iron Man 2");
	}

	#[test]
	fn empty_dataset_wrangles() {
		let (movies, edges) = wrangle(Vec::new());
		assert!(movies.is_empty());
		assert!(edges.is_empty());
	}

	#[test]
	fn toggling_twice_restores_timeline_fields() {
		let mut flow = flow();
		assert_eq!(flow.active_fields(), (Field::Year, Field::AllFrac));
		flow.toggle_branching();
		assert_eq!(flow.mode(), LayoutMode::Branching);
		assert_eq!(flow.active_fields(), (Field::X, Field::Y));
		assert!(!flow.toggled_before());
		flow.toggle_branching();
		assert_eq!(flow.active_fields(), (Field::Year, Field::AllFrac));
		assert!(flow.toggled_before());
	}

	#[test]
	fn scales_follow_the_active_fields() {
		let mut flow = flow();
		assert_eq!(
			flow.x_scale().domain(),
			&[2008.0, 2010.0, 2011.0, 2012.0, 2013.0]
		);
		let im = flow.find_movie("Iron Man").unwrap().clone();
		let (x, _) = flow.position(&im).unwrap();
		assert_eq!(x, 0.0);

		flow.toggle_branching();
		assert_eq!(flow.x_scale().domain(), &[0.0, 0.5, 1.0, 2.0]);
		let im3 = flow.find_movie("Iron Man 3").unwrap().clone();
		assert_eq!(flow.position(&im3).map(|p| p.0), Some(600.0));
		let short = flow.find_movie("Short Film").unwrap().clone();
		assert_eq!(flow.position(&short), None);
	}

	#[test]
	fn selection_styles_movies() {
		let mut flow = flow();
		flow.select("hulk");
		let hulk_color = flow.palette().color("hulk").to_string();

		for movie in flow.movies() {
			let style = flow.movie_style(movie);
			if movie.features("hulk") {
				assert_eq!(style.fill, hulk_color);
				assert_eq!(style.stroke, "none");
			} else {
				assert_eq!(style.fill, "none");
				assert_eq!(style.stroke, NO_APPEARANCE_STROKE);
				assert_eq!(style.stroke_width, DEFAULT_STROKE_WIDTH);
			}
		}

		flow.select("thor");
		let im2 = flow.find_movie("Iron Man 2").unwrap();
		let style = flow.movie_style(im2);
		assert_eq!(style.fill, "none");
		assert_eq!(style.stroke, flow.palette().color("thor"));
		assert_eq!(style.stroke_width, EMPHASIZED_STROKE_WIDTH);
	}

	#[test]
	fn selection_styles_edges() {
		let mut flow = flow();
		flow.select("hulk");
		let mut matched = 0;
		for edge in flow.edges() {
			let style = flow.edge_style(edge);
			if flow.edge_matches(edge, "hulk") {
				matched += 1;
				assert_eq!(style.stroke, flow.palette().color("hulk"));
				assert_eq!(style.stroke_width, EMPHASIZED_STROKE_WIDTH);
				assert_eq!(style.marker, Marker::Selected);
			} else {
				assert_eq!(style.stroke, EDGE_DIM_COLOR);
				assert_eq!(style.marker, Marker::Arrowhead);
			}
		}
		// Hulk -> Avengers and Thor -> Avengers.
		assert_eq!(matched, 2);
		assert_eq!(flow.selected_marker_color(), Some(flow.palette().color("hulk")));
	}

	#[test]
	fn reset_restores_group_colors() {
		let mut flow = flow();
		flow.select("hulk");
		flow.hover_selector(Some("thor"));
		flow.select(RESET);
		assert_eq!(flow.selection(), None);
		for movie in flow.movies() {
			let style = flow.movie_style(movie);
			assert_eq!(style.fill, flow.palette().color(&movie.group));
			assert_eq!(style.stroke, "none");
			assert_eq!(style.stroke_width, DEFAULT_STROKE_WIDTH);
		}
		for edge in flow.edges() {
			let style = flow.edge_style(edge);
			assert_eq!(style.stroke, EDGE_COLOR);
			assert_eq!(style.stroke_width, DEFAULT_STROKE_WIDTH);
			assert_eq!(style.marker, Marker::Arrowhead);
		}
		assert!(flow.selector_tags().iter().all(|t| !flow.selector_focused(t)));
	}

	#[test]
	fn tooltip_rules_apply_only_to_their_pair() {
		let mut flow = flow();
		assert_eq!(flow.tooltip_for("Iron Man 2"), None);
		flow.select("spider_man");
		assert!(flow.tooltip_for("Iron Man 2").unwrap().starts_with("Spiderman"));
		assert_eq!(flow.tooltip_for("Iron Man"), None);
		flow.select("hulk");
		assert_eq!(flow.tooltip_for("Iron Man 2"), None);
		assert_eq!(flow.tooltip_rules().count(), 1);
	}

	#[test]
	fn selector_puts_lead_group_first_and_reset_last() {
		let mut flow = flow();
		assert_eq!(
			flow.selector_tags(),
			vec!["avengers", "hulk", "iron_man", "nick_fury", "thor", "reset"]
		);
		flow.hover_selector(Some("thor"));
		assert!(flow.selector_focused("thor"));
		flow.select("hulk");
		assert!(flow.selector_focused("hulk"));
		assert!(!flow.selector_focused(RESET));
	}

	#[test]
	fn bundled_movies_link_up() {
		let (movies, edges) = wrangle(crate::data::bundled_movies().unwrap());
		assert_eq!(movies.len(), 23);
		// Far From Home flows into a film outside the dataset.
		assert_eq!(edges.len(), 36);
		assert!(movies.iter().all(|m| m.year_total <= 3));
		assert_eq!(movies.last().map(|m| m.title.as_str()), Some("Spider-Man: Far From Home"));
	}

	#[test]
	fn resize_stretches_positions_and_keeps_domains() {
		let mut flow = flow();
		let im3 = flow.find_movie("Iron Man 3").unwrap().clone();
		assert_eq!(flow.position(&im3).map(|p| p.0), Some(600.0));
		let domain = flow.x_scale().domain().to_vec();

		flow.resize(1200.0, 320.0);
		assert_eq!(flow.size(), (1200.0, 320.0));
		assert_eq!(flow.x_scale().domain(), domain.as_slice());
		let (x, y) = flow.position(&im3).unwrap();
		assert_eq!(x, 1200.0);
		assert!((0.0..=320.0).contains(&y));
	}
}
