//! Hand-written encoders for the messages this gateway transmits. Field
//! order, resolutions, and not-available encodings follow the published
//! NMEA 2000 layouts so third-party bus listeners decode them unchanged.
//!
//! | PGN    | Content                    | Frame type  |
//! |--------|----------------------------|-------------|
//! | 127488 | Engine parameters, rapid   | single      |
//! | 127489 | Engine parameters, dynamic | Fast Packet |
//! | 130312 | Temperature                | single      |
//! | 127508 | Battery status             | single      |
//! | 127513 | Battery configuration      | single      |
//! | 130311 | Environmental parameters   | single      |
use crate::error::EncodeError;
use crate::infra::codec::{is_available, PayloadWriter, ToPayload, UINT8_NA, UINT8_OUT_OF_RANGE};

//==================================================================================LOOKUPS

/// Temperature source tags carried by PGNs 130311/130312.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TemperatureSource {
    SeaWater = 0,
    OutsideAir = 1,
    InsideAir = 2,
    EngineRoom = 3,
    MainCabin = 4,
    LiveWell = 5,
    BaitWell = 6,
    Refrigeration = 7,
    HeatingSystem = 8,
    DewPoint = 9,
    ApparentWindChill = 10,
    TheoreticalWindChill = 11,
    HeatIndex = 12,
    Freezer = 13,
    ExhaustGas = 14,
}

/// Humidity source tag carried by PGN 130311 (2-bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HumiditySource {
    InsideAir = 0,
    OutsideAir = 1,
    Undefined = 3,
}

/// Battery construction type (PGN 127513).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BatteryType {
    Flooded = 0,
    Gel = 1,
    Agm = 2,
}

/// Battery chemistry (PGN 127513).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BatteryChemistry {
    LeadAcid = 0,
    LithiumIon = 1,
    NickelCadmium = 2,
    NickelMetalHydride = 3,
}

/// Nominal battery voltage (PGN 127513).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BatteryNominalVoltage {
    V6 = 0,
    V12 = 1,
    V24 = 2,
    V32 = 3,
    V36 = 4,
    V42 = 5,
    V48 = 6,
}

/// Whether the battery supports equalization (PGN 127513, 2-bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EqualizationSupport {
    No = 0,
    Yes = 1,
    Error = 2,
    Unavailable = 3,
}

//==================================================================================PGN_127488
/// Engine Parameters, Rapid Update.
#[derive(Debug, Clone)]
pub struct Pgn127488 {
    pub engine_instance: u8,
    /// Engine speed in rpm.
    pub engine_speed_rpm: f64,
    /// Turbocharger boost pressure in pascals.
    pub boost_pressure_pa: f64,
    /// Tilt/trim in percent; raw signed byte, `INT8_NA` when unread.
    pub tilt_trim_percent: i8,
}

impl Pgn127488 {
    pub const PGN: u32 = 127488;
    pub const PRIORITY: u8 = 3;
}

impl ToPayload for Pgn127488 {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let mut writer = PayloadWriter::new(buffer);
        writer.u8(self.engine_instance)?;
        writer.u16_udouble(self.engine_speed_rpm, 0.25)?;
        writer.u16_udouble(self.boost_pressure_pa, 100.0)?;
        writer.i8(self.tilt_trim_percent)?;
        writer.reserved(2)?;
        Ok(writer.len())
    }
}

//==================================================================================PGN_127489
/// Engine Parameters, Dynamic. Temperatures are expected in Kelvin; the
/// caller converts before encoding.
#[derive(Debug, Clone)]
pub struct Pgn127489 {
    pub engine_instance: u8,
    pub oil_pressure_pa: f64,
    pub oil_temperature_k: f64,
    pub coolant_temperature_k: f64,
    pub alternator_voltage_v: f64,
    /// Fuel consumption in liters per hour.
    pub fuel_rate_lph: f64,
    /// Total engine running time in seconds.
    pub engine_hours_s: f64,
    pub coolant_pressure_pa: f64,
    pub fuel_pressure_pa: f64,
    /// Discrete status bitfield 1 (check engine, over temperature, ...).
    pub discrete_status1: u16,
    /// Discrete status bitfield 2 (warning level, maintenance needed, ...).
    pub discrete_status2: u16,
    pub load_percent: i8,
    pub torque_percent: i8,
}

impl Pgn127489 {
    pub const PGN: u32 = 127489;
    pub const PRIORITY: u8 = 6;
}

impl ToPayload for Pgn127489 {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let mut writer = PayloadWriter::new(buffer);
        writer.u8(self.engine_instance)?;
        writer.u16_udouble(self.oil_pressure_pa, 100.0)?;
        writer.u16_udouble(self.oil_temperature_k, 0.1)?;
        writer.u16_udouble(self.coolant_temperature_k, 0.01)?;
        writer.i16_double(self.alternator_voltage_v, 0.01)?;
        writer.i16_double(self.fuel_rate_lph, 0.1)?;
        writer.u32_udouble(self.engine_hours_s, 1.0)?;
        writer.u16_udouble(self.coolant_pressure_pa, 100.0)?;
        writer.u16_udouble(self.fuel_pressure_pa, 1000.0)?;
        writer.reserved(1)?;
        writer.u16(self.discrete_status1)?;
        writer.u16(self.discrete_status2)?;
        writer.i8(self.load_percent)?;
        writer.i8(self.torque_percent)?;
        Ok(writer.len())
    }
}

//==================================================================================PGN_130312
/// Temperature, single reading with source/instance tags.
#[derive(Debug, Clone)]
pub struct Pgn130312 {
    pub sid: u8,
    pub instance: u8,
    pub source: TemperatureSource,
    pub actual_temperature_k: f64,
    /// Setpoint; not applicable for plain monitoring, pass `DOUBLE_NA`.
    pub set_temperature_k: f64,
}

impl Pgn130312 {
    pub const PGN: u32 = 130312;
    pub const PRIORITY: u8 = 5;
}

impl ToPayload for Pgn130312 {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let mut writer = PayloadWriter::new(buffer);
        writer.u8(self.sid)?;
        writer.u8(self.instance)?;
        writer.u8(self.source as u8)?;
        writer.u16_udouble(self.actual_temperature_k, 0.01)?;
        writer.u16_udouble(self.set_temperature_k, 0.01)?;
        writer.reserved(1)?;
        Ok(writer.len())
    }
}

//==================================================================================PGN_127508
/// Battery Status.
#[derive(Debug, Clone)]
pub struct Pgn127508 {
    pub battery_instance: u8,
    pub voltage_v: f64,
    pub current_a: f64,
    pub temperature_k: f64,
    pub sid: u8,
}

impl Pgn127508 {
    pub const PGN: u32 = 127508;
    pub const PRIORITY: u8 = 6;
}

impl ToPayload for Pgn127508 {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let mut writer = PayloadWriter::new(buffer);
        writer.u8(self.battery_instance)?;
        writer.i16_double(self.voltage_v, 0.01)?;
        writer.i16_double(self.current_a, 0.1)?;
        writer.u16_udouble(self.temperature_k, 0.01)?;
        writer.u8(self.sid)?;
        Ok(writer.len())
    }
}

//==================================================================================PGN_127513
/// Battery Configuration Status.
#[derive(Debug, Clone)]
pub struct Pgn127513 {
    pub battery_instance: u8,
    pub battery_type: BatteryType,
    pub equalization: EqualizationSupport,
    pub nominal_voltage: BatteryNominalVoltage,
    pub chemistry: BatteryChemistry,
    /// Capacity in coulombs (see [`crate::infra::units::ah_to_coulomb`]).
    pub capacity_coulomb: f64,
    pub temperature_coefficient_percent: i8,
    /// Peukert exponent, valid range 1.0 to 1.5.
    pub peukert_exponent: f64,
    pub charge_efficiency_percent: i8,
}

impl Pgn127513 {
    pub const PGN: u32 = 127513;
    pub const PRIORITY: u8 = 6;
}

impl ToPayload for Pgn127513 {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let mut writer = PayloadWriter::new(buffer);
        writer.u8(self.battery_instance)?;
        // Type in the low nibble, equalization support in bits 4-5, top
        // two reserved bits set.
        writer.u8(0xC0 | ((self.equalization as u8 & 0x03) << 4) | (self.battery_type as u8 & 0x0F))?;
        writer.u8(((self.chemistry as u8 & 0x0F) << 4) | (self.nominal_voltage as u8 & 0x0F))?;
        writer.u16_udouble(self.capacity_coulomb, 3600.0)?;
        writer.i8(self.temperature_coefficient_percent)?;
        // Peukert exponent: 0.002 steps anchored at 1.0 (raw offset 500).
        let peukert_raw = if is_available(self.peukert_exponent) {
            let scaled = self.peukert_exponent / 0.002 - 500.0 + 0.5;
            if (0.0..=253.0).contains(&scaled) {
                scaled as u8
            } else {
                UINT8_OUT_OF_RANGE
            }
        } else {
            UINT8_NA
        };
        writer.u8(peukert_raw)?;
        writer.i8(self.charge_efficiency_percent)?;
        Ok(writer.len())
    }
}

//==================================================================================PGN_130311
/// Environmental Parameters: one temperature, one humidity, one pressure.
#[derive(Debug, Clone)]
pub struct Pgn130311 {
    pub sid: u8,
    pub temperature_source: TemperatureSource,
    pub humidity_source: HumiditySource,
    pub temperature_k: f64,
    pub humidity_percent: f64,
    pub pressure_pa: f64,
}

impl Pgn130311 {
    pub const PGN: u32 = 130311;
    pub const PRIORITY: u8 = 5;
}

impl ToPayload for Pgn130311 {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let mut writer = PayloadWriter::new(buffer);
        writer.u8(self.sid)?;
        // Temperature source in bits 0-5, humidity source in bits 6-7.
        writer.u8(((self.humidity_source as u8 & 0x03) << 6) | (self.temperature_source as u8 & 0x3F))?;
        writer.u16_udouble(self.temperature_k, 0.01)?;
        writer.i16_double(self.humidity_percent, 0.004)?;
        writer.u16_udouble(self.pressure_pa, 100.0)?;
        Ok(writer.len())
    }
}
