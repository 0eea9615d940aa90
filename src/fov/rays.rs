//! Per-column ray buffer.
//!
//! Rays are stored in adjacent `(top, bottom)` pairs, each pair bounding one
//! frustum. The buffer keeps 64 rays inline and spills to the heap past that,
//! unless a hard cap is configured, in which case an overflowing push fails
//! instead of dropping rays.

use smallvec::SmallVec;

use crate::error::FovError;
use crate::grid::Point;

const INLINE_RAYS: usize = 64;

/// Smallest cap that still fits the seed frustum.
pub const MIN_RAY_CAPACITY: usize = 2;

#[derive(Debug, Clone)]
pub struct RayList {
    rays: SmallVec<[Point; INLINE_RAYS]>,
    capacity: Option<usize>,
}

impl RayList {
    /// Empty list, unbounded when `capacity` is `None`.
    pub fn new(capacity: Option<usize>) -> Self {
        RayList {
            rays: SmallVec::new(),
            capacity: capacity.map(|c| c.max(MIN_RAY_CAPACITY)),
        }
    }

    /// List holding the column-0 frustum spanning the whole octant
    /// (from the column axis to the diagonal).
    pub fn seeded(capacity: Option<usize>) -> Self {
        let mut list = Self::new(capacity);
        list.rays.push(Point::new(1, 0));
        list.rays.push(Point::new(1, 1));
        list
    }

    pub fn push(&mut self, ray: Point) -> Result<(), FovError> {
        if let Some(capacity) = self.capacity {
            if self.rays.len() >= capacity {
                return Err(FovError::RayCapacityExceeded { capacity });
            }
        }
        self.rays.push(ray);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.rays.clear();
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// `(top, bottom)` ray pairs in order.
    pub fn frustums(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.rays.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}
