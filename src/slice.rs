use ndarray::Array2;
use std::cmp::Ordering;

/// Ordering key of a slice.
///
/// Slices without the ordering attribute are kept as [`OrderKey::Absent`]
/// and sort after every present key, however large.
#[derive(Clone, Copy, Debug)]
pub enum OrderKey {
    Present(f64),
    Absent,
}

impl OrderKey {
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(OrderKey::Absent, OrderKey::Present)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            OrderKey::Present(v) => Some(*v),
            OrderKey::Absent => None,
        }
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderKey::Present(a), OrderKey::Present(b)) => a.total_cmp(b),
            (OrderKey::Present(_), OrderKey::Absent) => Ordering::Less,
            (OrderKey::Absent, OrderKey::Present(_)) => Ordering::Greater,
            (OrderKey::Absent, OrderKey::Absent) => Ordering::Equal,
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

/// One decoded 2D image with its ordering and spacing metadata.
#[derive(Clone, Debug)]
pub struct Slice {
    pub pixels: Array2<u16>,
    pub order: OrderKey,
    /// (row, column) spacing in mm
    pub pixel_spacing: Option<(f32, f32)>,
    pub thickness: Option<f32>,
}

impl Slice {
    pub fn new(pixels: Array2<u16>, order: OrderKey) -> Self {
        Self {
            pixels,
            order,
            pixel_spacing: None,
            thickness: None,
        }
    }

    pub fn with_spacing(mut self, pixel_spacing: (f32, f32), thickness: f32) -> Self {
        self.pixel_spacing = Some(pixel_spacing);
        self.thickness = Some(thickness);
        self
    }

    /// In-plane shape (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.pixels.dim()
    }
}

/// Stable ascending sort by ordering key, absent keys last.
pub fn sort_slices(slices: &mut [Slice]) {
    slices.sort_by(|a, b| a.order.cmp(&b.order));
}
