//! Unit conversions between sensor-side and wire-side conventions.
//! Temperatures travel on the bus as absolute Kelvin, battery capacity as
//! coulombs; sensors speak Celsius and amp-hours.
use crate::infra::codec::{is_available, DOUBLE_NA};

/// Celsius to Kelvin, preserving the not-available sentinel.
#[inline]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    if is_available(celsius) {
        celsius + 273.15
    } else {
        DOUBLE_NA
    }
}

/// Amp-hours to coulombs (1 Ah = 3600 C).
#[inline]
pub fn ah_to_coulomb(amp_hours: f64) -> f64 {
    amp_hours * 3600.0
}
