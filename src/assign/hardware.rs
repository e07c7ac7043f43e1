// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The focal-plane hardware model: where each fiber sits relative to a tile
//! centre, and how far it can reach.

use std::{collections::HashSet, path::Path};

use log::debug;
use marlu::RADec;
use serde::{Deserialize, Serialize};

use super::{AssignError, LocationId};

/// A fiber positioner. `xi_deg` and `eta_deg` are its offsets from the tile
/// centre on the tangent plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiberLocation {
    pub location: LocationId,
    pub xi_deg: f64,
    pub eta_deg: f64,
}

impl FiberLocation {
    /// The sky position this fiber sits at when the focal plane is pointed at
    /// `centre`.
    pub fn sky_position(&self, centre: RADec) -> RADec {
        deproject(centre, self.xi_deg.to_radians(), self.eta_deg.to_radians())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    /// How far from its sky position a fiber can be moved \[degrees\].
    pub patrol_radius_deg: f64,
    pub locations: Vec<FiberLocation>,
}

impl Hardware {
    /// Read a hardware description from a toml or json file.
    pub fn read(file: &Path) -> Result<Hardware, AssignError> {
        debug!("Reading hardware description from {}", file.display());
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        let contents = std::fs::read_to_string(file)?;
        let parse_err = |error: String| AssignError::HardwareParse {
            file: file.display().to_string(),
            error,
        };
        let hardware: Hardware = match ext.as_deref() {
            Some("toml") => toml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
            Some("json") => {
                serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))?
            }
            _ => {
                return Err(AssignError::HardwareFileType {
                    file: file.display().to_string(),
                })
            }
        };
        hardware.validate()?;
        Ok(hardware)
    }

    /// Check that there are locations, their IDs are unique and the patrol
    /// radius is sensible.
    pub fn validate(&self) -> Result<(), AssignError> {
        if !self.patrol_radius_deg.is_finite() || self.patrol_radius_deg <= 0.0 {
            return Err(AssignError::BadPatrolRadius {
                radius: self.patrol_radius_deg,
            });
        }
        if self.locations.is_empty() {
            return Err(AssignError::NoLocations);
        }
        let mut seen = HashSet::with_capacity(self.locations.len());
        for loc in &self.locations {
            if !seen.insert(loc.location) {
                return Err(AssignError::DuplicateLocationId { id: loc.location });
            }
        }
        Ok(())
    }

    /// \[radians\]
    pub fn patrol_radius(&self) -> f64 {
        self.patrol_radius_deg.to_radians()
    }
}

/// Inverse gnomonic projection: turn tangent-plane offsets (radians) about
/// `centre` into a sky position.
pub(crate) fn deproject(centre: RADec, xi: f64, eta: f64) -> RADec {
    let rho = xi.hypot(eta);
    if rho == 0.0 {
        return centre;
    }
    let c = rho.atan();
    let (sin_c, cos_c) = c.sin_cos();
    let (sin_dec0, cos_dec0) = centre.dec.sin_cos();

    let dec = (cos_c * sin_dec0 + eta * sin_c * cos_dec0 / rho).asin();
    let ra = centre.ra + (xi * sin_c).atan2(rho * cos_dec0 * cos_c - eta * sin_dec0 * sin_c);
    RADec::from_radians(ra.rem_euclid(std::f64::consts::TAU), dec)
}
