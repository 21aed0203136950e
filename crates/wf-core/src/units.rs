//! SI quantities at the API boundary: rotor geometry, air density and power.

use uom::si::f64::{Length as UomLength, MassDensity as UomMassDensity, Power as UomPower};

pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type Power = UomPower;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

pub mod constants {
    /// Sea-level air density (kg/m³) assumed when a turbine names none.
    pub const AIR_DENSITY_KGPM3: f64 = 1.225;
}
