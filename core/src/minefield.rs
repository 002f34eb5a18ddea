use core::fmt;
use core::ops::Index;

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of cells with mines planted on it.
///
/// Every non-mine cell always holds the number of mines around it: planting a mine updates the neighbors right away,
/// so the counts never have to be recomputed.
///
/// Deserialized fields are rebuilt from their mines and rejected unless they match what planting would produce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMinefield")]
pub struct Minefield {
    grid: Array2<Cell>,
    mine_count: CellCount,
}

/// Unchecked shape of a serialized [`Minefield`].
#[derive(Deserialize)]
struct RawMinefield {
    grid: Array2<Cell>,
    mine_count: CellCount,
}

impl TryFrom<RawMinefield> for Minefield {
    type Error = GameError;

    fn try_from(raw: RawMinefield) -> Result<Self> {
        let (width, height) = raw.grid.dim();
        let size = (
            Coord::try_from(width).map_err(|_| GameError::InconsistentGrid)?,
            Coord::try_from(height).map_err(|_| GameError::InconsistentGrid)?,
        );

        let mut field = Self::new(size)?;
        for ((x, y), cell) in raw.grid.indexed_iter() {
            if cell.is_mine() {
                field.plant_mine((x as Coord, y as Coord))?;
            }
        }

        if field.grid != raw.grid || field.mine_count != raw.mine_count {
            return Err(GameError::InconsistentGrid);
        }
        Ok(field)
    }
}

impl Minefield {
    /// Creates a field of the given `(width, height)` without any mines.
    pub fn new(size: Coord2) -> Result<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize(size));
        }
        if area(width, height) == 1 {
            return Err(GameError::SingleCell);
        }

        Ok(Self {
            grid: Array2::default(size.grid_index()),
            mine_count: 0,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut field = Self::new(size)?;
        for &coords in mine_coords {
            field.plant_mine(coords)?;
        }
        Ok(field)
    }

    /// Plants a mine at `coords` and bumps the count of every surrounding non-mine cell.
    pub fn plant_mine(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        if self[coords].is_mine() {
            return Err(GameError::AlreadyMined(coords));
        }

        self.grid[coords.grid_index()] = Cell::Mine;
        self.mine_count += 1;
        for pos in self.iter_neighbors(coords) {
            if let Cell::Count(count) = &mut self.grid[pos.grid_index()] {
                *count += 1;
            }
        }
        log::debug!("Planted mine at {:?}, mine count: {}", coords, self.mine_count);

        Ok(())
    }

    /// Plants `count` additional mines, each on a uniformly chosen cell that has no mine yet.
    ///
    /// At least one cell must remain free of mines afterwards.
    pub fn plant_mines_randomly<R: Rng>(
        &mut self,
        count: CellCount,
        rng: &mut R,
    ) -> Result<()> {
        let total_cells = self.total_cells();
        if u32::from(count) + u32::from(self.mine_count) >= u32::from(total_cells) {
            return Err(GameError::TooManyMines {
                requested: count,
                capacity: total_cells.saturating_sub(self.mine_count).saturating_sub(1),
            });
        }

        let mut free_cells = total_cells - self.mine_count;
        for _ in 0..count {
            let place = rng.random_range(0..free_cells);
            let coords = self.nth_free_cell(place);
            self.plant_mine(coords)?;
            free_cells -= 1;
        }
        log::debug!(
            "Planted {} mines randomly, mine count: {}",
            count,
            self.mine_count
        );

        Ok(())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (width, height) = self.size();
        if coords.0 < width && coords.1 < height {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords(coords))
        }
    }

    pub fn cell_value(&self, coords: Coord2) -> Result<Cell> {
        self.validate_coords(coords).map(|coords| self[coords])
    }

    pub fn is_mine_cell(&self, coords: Coord2) -> Result<bool> {
        self.cell_value(coords).map(Cell::is_mine)
    }

    pub fn is_empty_cell(&self, coords: Coord2) -> Result<bool> {
        self.cell_value(coords).map(Cell::is_empty)
    }

    pub fn size(&self) -> Coord2 {
        // every constructor takes the size as Coord2
        let (width, height) = self.grid.dim();
        (
            width.try_into().expect("width should fit in Coord"),
            height.try_into().expect("height should fit in Coord"),
        )
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        area(width, height)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Coordinates of the `place`-th cell without a mine, in x-major order.
    fn nth_free_cell(&self, place: CellCount) -> Coord2 {
        self.grid
            .indexed_iter()
            .filter(|(_, cell)| !cell.is_mine())
            .nth(usize::from(place))
            // grid indices are below the Coord2 size
            .map(|((x, y), _)| (x as Coord, y as Coord))
            .expect("place should be below the free cell count")
    }
}

impl Index<Coord2> for Minefield {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.grid[coords.grid_index()]
    }
}

impl fmt::Display for Minefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.size();
        for y in 0..height {
            if y > 0 {
                f.write_str("\n")?;
            }
            for x in 0..width {
                write!(f, "{}", self[(x, y)])?;
            }
        }
        Ok(())
    }
}
