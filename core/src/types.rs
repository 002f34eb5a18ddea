/// Column or row position on a minefield; also used for its width and height.
pub type Coord = u8;

/// Number of cells, wide enough for the area of the largest field.
pub type CellCount = u16;

/// Cell position as `(x, y)`, with `(0, 0)` in the top left corner.
pub type Coord2 = (Coord, Coord);

/// Conversion of a cell position into an index of the `ndarray` grids backing fields and sessions.
pub trait GridIndex {
    fn grid_index(self) -> [usize; 2];
}

impl GridIndex for Coord2 {
    fn grid_index(self) -> [usize; 2] {
        let (x, y) = self;
        [usize::from(x), usize::from(y)]
    }
}

/// Number of cells on a `width` by `height` field.
pub const fn area(width: Coord, height: Coord) -> CellCount {
    // u8 * u8 always fits in u16
    (width as CellCount) * (height as CellCount)
}

// x-major so that flood-fill order is reproducible in tests
const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterator over the in-bounds cells surrounding `center`, at most 8 of them.
///
/// Edges and corners are clamped, there is no wraparound.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(DISPLACEMENTS.len() - usize::from(self.index)))
    }
}
