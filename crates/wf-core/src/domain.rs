//! Gridded-domain descriptors.

use crate::{Real, WfError, WfResult};

/// Number of grid points along each axis of a gridded domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridResolution {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridResolution {
    pub fn new(nx: usize, ny: usize, nz: usize) -> WfResult<Self> {
        let res = Self { nx, ny, nz };
        res.validate()?;
        Ok(res)
    }

    pub fn validate(&self) -> WfResult<()> {
        if self.nx < 2 || self.ny < 2 || self.nz < 2 {
            return Err(WfError::InvalidArg {
                what: "grid resolution needs at least 2 points per axis",
            });
        }
        Ok(())
    }

    pub fn point_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }
}

/// Axis-aligned extent of the flow domain.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainBounds {
    pub xmin: Real,
    pub xmax: Real,
    pub ymin: Real,
    pub ymax: Real,
    pub zmin: Real,
    pub zmax: Real,
}

impl DomainBounds {
    pub fn new(xmin: Real, xmax: Real, ymin: Real, ymax: Real, zmin: Real, zmax: Real) -> WfResult<Self> {
        let b = Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
        };
        b.validate()?;
        Ok(b)
    }

    /// Build from `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn from_array(v: [Real; 6]) -> WfResult<Self> {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    pub fn to_array(&self) -> [Real; 6] {
        [self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax]
    }

    pub fn validate(&self) -> WfResult<()> {
        for v in self.to_array() {
            crate::ensure_finite(v, "domain bound")?;
        }
        if self.xmin >= self.xmax || self.ymin >= self.ymax || self.zmin >= self.zmax {
            return Err(WfError::InvalidArg {
                what: "domain bounds must satisfy min < max on every axis",
            });
        }
        if self.zmin <= 0.0 {
            return Err(WfError::InvalidArg {
                what: "domain must lie above the ground (zmin > 0)",
            });
        }
        Ok(())
    }
}
