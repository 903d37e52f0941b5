//! Ordinal point and band scales over numeric domains.

/// Evenly spaced positions for `n` bands across `range`, d3 style.
///
/// Returns `(positions, step, bandwidth)`. `padding_inner` is clamped to 1.
fn band_positions(
	n: usize,
	range: (f64, f64),
	padding_inner: f64,
	padding_outer: f64,
	align: f64,
) -> (Vec<f64>, f64, f64) {
	let padding_inner = padding_inner.min(1.0);
	let reverse = range.1 < range.0;
	let (mut start, stop) = if reverse {
		(range.1, range.0)
	} else {
		(range.0, range.1)
	};
	let n_f = n as f64;
	let step = (stop - start) / (n_f - padding_inner + padding_outer * 2.0).max(1.0);
	start += (stop - start - step * (n_f - padding_inner)) * align;
	let bandwidth = step * (1.0 - padding_inner);
	let mut positions: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
	if reverse {
		positions.reverse();
	}
	(positions, step, bandwidth)
}

/// Sorted distinct values, `NaN` dropped.
fn sorted_domain(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
	let mut domain: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
	domain.sort_by(f64::total_cmp);
	domain.dedup();
	domain
}

#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
	domain: Vec<f64>,
	range: (f64, f64),
	padding_inner: f64,
	padding_outer: f64,
	align: f64,
	positions: Vec<f64>,
}

impl BandScale {
	pub fn new(range: (f64, f64)) -> Self {
		Self {
			domain: Vec::new(),
			range,
			padding_inner: 0.0,
			padding_outer: 0.0,
			align: 0.5,
			positions: Vec::new(),
		}
	}

	pub fn padding(mut self, inner: f64, outer: f64) -> Self {
		self.padding_inner = inner;
		self.padding_outer = outer;
		self.rescale();
		self
	}

	pub fn set_domain(&mut self, values: impl IntoIterator<Item = f64>) {
		self.domain = sorted_domain(values);
		self.rescale();
	}

	pub fn set_range(&mut self, range: (f64, f64)) {
		self.range = range;
		self.rescale();
	}

	fn layout(&self) -> (Vec<f64>, f64, f64) {
		band_positions(
			self.domain.len(),
			self.range,
			self.padding_inner,
			self.padding_outer,
			self.align,
		)
	}

	fn rescale(&mut self) {
		self.positions = self.layout().0;
	}

	pub fn domain(&self) -> &[f64] {
		&self.domain
	}

	#[cfg(test)]
	pub fn step(&self) -> f64 {
		self.layout().1
	}

	#[cfg(test)]
	pub fn bandwidth(&self) -> f64 {
		self.layout().2
	}

	/// Start of the band for `value`, `None` outside the domain.
	pub fn apply(&self, value: f64) -> Option<f64> {
		let i = self.domain.iter().position(|d| *d == value)?;
		self.positions.get(i).copied()
	}
}

/// A band scale with zero bandwidth: domain values become points.
#[derive(Clone, Debug, PartialEq)]
pub struct PointScale(BandScale);

impl PointScale {
	pub fn new(range: (f64, f64)) -> Self {
		Self(BandScale::new(range).padding(1.0, 0.0))
	}

	pub fn set_domain(&mut self, values: impl IntoIterator<Item = f64>) {
		self.0.set_domain(values);
	}

	pub fn set_range(&mut self, range: (f64, f64)) {
		self.0.set_range(range);
	}

	pub fn domain(&self) -> &[f64] {
		self.0.domain()
	}

	#[cfg(test)]
	pub fn step(&self) -> f64 {
		self.0.step()
	}

	pub fn apply(&self, value: f64) -> Option<f64> {
		self.0.apply(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn point_scale_spans_full_range() {
		let mut x = PointScale::new((0.0, 300.0));
		x.set_domain([2012.0, 2008.0, 2010.0, 2008.0]);
		assert_eq!(x.domain(), &[2008.0, 2010.0, 2012.0]);
		assert_eq!(x.apply(2008.0), Some(0.0));
		assert_eq!(x.apply(2010.0), Some(150.0));
		assert_eq!(x.apply(2012.0), Some(300.0));
		assert_eq!(x.apply(2009.0), None);
		assert_eq!(x.step(), 150.0);
	}

	#[test]
	fn single_point_sits_in_the_middle() {
		let mut x = PointScale::new((0.0, 300.0));
		x.set_domain([1.0]);
		assert_eq!(x.apply(1.0), Some(150.0));
	}

	#[test]
	fn empty_domain_maps_nothing() {
		let x = PointScale::new((0.0, 300.0));
		assert_eq!(x.apply(0.0), None);
	}

	#[test]
	fn band_scale_clamps_inner_padding_and_reverses() {
		let mut y = BandScale::new((230.0, 0.0)).padding(10.0, 10.0);
		y.set_domain([0.5, 1.0]);
		let step = 230.0 / 21.0;
		assert!(close(y.step(), step));
		assert_eq!(y.bandwidth(), 0.0);
		let low = y.apply(0.5).unwrap();
		let high = y.apply(1.0).unwrap();
		assert!(low > high, "larger values sit higher on screen");
		assert!(close(low + high, 230.0));
		assert!(close(low - high, step));
	}

	#[test]
	fn nan_is_left_out_of_the_domain() {
		let mut y = BandScale::new((100.0, 0.0));
		y.set_domain([f64::NAN, 2.0]);
		assert_eq!(y.domain(), &[2.0]);
		assert_eq!(y.apply(f64::NAN), None);
	}

	#[test]
	fn range_changes_reposition() {
		let mut x = PointScale::new((0.0, 100.0));
		x.set_domain([1.0, 2.0]);
		x.set_range((0.0, 400.0));
		assert_eq!(x.apply(2.0), Some(400.0));
	}
}
