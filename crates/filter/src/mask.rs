//! Active-variable selection: threshold mask to dense index map.

use crate::error::FilterError;

/// Shape of a 1-D or 2-D variable grid (`ysize == 1` for 1-D).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    xsize: usize,
    ysize: usize,
}

impl GridShape {
    /// Creates a grid shape.
    pub fn new(xsize: usize, ysize: usize) -> Self {
        Self { xsize, ysize }
    }

    /// Returns the x dimension.
    pub fn xsize(&self) -> usize {
        self.xsize
    }

    /// Returns the y dimension.
    pub fn ysize(&self) -> usize {
        self.ysize
    }

    /// Returns the total cell count.
    pub fn ncells(&self) -> usize {
        self.xsize * self.ysize
    }
}

/// Ordered map from dense computation indices to grid positions.
///
/// Built once by a row-major scan of the selection mask; a cell is active
/// iff its mask value exceeds 0.5. Input and output variable sets each get
/// their own, independently computed map. The order is stable, so the same
/// map packs and unpacks vectors consistently for the run's lifetime.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Flat row-major grid position of each active variable.
    positions: Vec<usize>,
    /// `(x, y)` grid coordinates of each active variable.
    coords: Vec<(usize, usize)>,
    shape: GridShape,
}

impl IndexMap {
    /// Selects active variables from an optional threshold mask.
    ///
    /// With no mask, every cell is active and the map is the full row-major
    /// enumeration. With a mask, two passes run over the grid: one to count
    /// actives so the allocation is exact, one to record positions.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MaskLengthMismatch`] if the mask does not
    /// cover the grid, and [`FilterError::NoActiveCells`] if nothing is
    /// selected.
    pub fn select(shape: GridShape, mask: Option<&[f32]>) -> Result<Self, FilterError> {
        let ncells = shape.ncells();

        let mask = match mask {
            None => {
                let positions: Vec<usize> = (0..ncells).collect();
                let coords = positions
                    .iter()
                    .map(|&p| (p % shape.xsize, p / shape.xsize))
                    .collect();
                return Ok(Self {
                    positions,
                    coords,
                    shape,
                });
            }
            Some(m) => m,
        };

        if mask.len() != ncells {
            return Err(FilterError::MaskLengthMismatch {
                expected: ncells,
                actual: mask.len(),
            });
        }

        let n_active = mask.iter().filter(|&&v| v > 0.5).count();
        if n_active == 0 {
            return Err(FilterError::NoActiveCells);
        }

        let mut positions = Vec::with_capacity(n_active);
        let mut coords = Vec::with_capacity(n_active);
        for jj in 0..shape.ysize {
            for ii in 0..shape.xsize {
                let p = jj * shape.xsize + ii;
                if mask[p] > 0.5 {
                    positions.push(p);
                    coords.push((ii, jj));
                }
            }
        }

        Ok(Self {
            positions,
            coords,
            shape,
        })
    }

    /// Returns the active-variable count.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no variables are active (never after `select`).
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the flat row-major grid positions, in scan order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Returns the `(x, y)` grid coordinates, in scan order.
    pub fn coords(&self) -> &[(usize, usize)] {
        &self.coords
    }

    /// Returns the grid shape this map was built from.
    pub fn grid_shape(&self) -> GridShape {
        self.shape
    }
}
