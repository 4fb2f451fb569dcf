//! Mapping tables between logical quantities and the wire messages that
//! carry them.
//!
//! NMEA 2000 has no dedicated message for alternator temperature or
//! alternator voltage, so this gateway rides them on repurposed slots: a
//! third temperature channel tagged as live-well, and a third "battery"
//! on PGN 127508. Keeping the mapping in one table makes the workaround
//! visible and easy to retire if the protocol grows proper message types.
use crate::protocol::messages::{
    BatteryChemistry, BatteryNominalVoltage, BatteryType, EqualizationSupport, TemperatureSource,
};

/// Engine instance reported in every engine message.
pub const ENGINE_INSTANCE: u8 = 1;

/// Sequence identifier used by the environment message.
pub const ENVIRONMENT_SID: u8 = 4;

/// Battery instance repurposed to carry live alternator voltage and
/// temperature.
pub const ALTERNATOR_BATTERY_INSTANCE: u8 = 3;

//==================================================================================TEMPERATURE
/// Logical temperature quantities measured on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureQuantity {
    EngineRoom,
    ExhaustGas,
    Alternator,
}

/// One PGN 130312 channel: which quantity it carries and how it is tagged
/// on the wire.
#[derive(Debug, Clone, Copy)]
pub struct TemperatureSlot {
    pub quantity: TemperatureQuantity,
    pub sid: u8,
    pub instance: u8,
    pub source: TemperatureSource,
}

/// The three temperature channels published every temperature cycle. The
/// alternator reading is tagged live-well for lack of a proper source code.
pub const TEMPERATURE_SLOTS: [TemperatureSlot; 3] = [
    TemperatureSlot {
        quantity: TemperatureQuantity::EngineRoom,
        sid: 1,
        instance: 1,
        source: TemperatureSource::EngineRoom,
    },
    TemperatureSlot {
        quantity: TemperatureQuantity::ExhaustGas,
        sid: 2,
        instance: 2,
        source: TemperatureSource::ExhaustGas,
    },
    TemperatureSlot {
        quantity: TemperatureQuantity::Alternator,
        sid: 3,
        instance: 3,
        source: TemperatureSource::LiveWell,
    },
];

//==================================================================================BATTERIES
/// Static description of one physical battery bank.
///
/// The banks have no voltage senders wired in yet, so `nominal_voltage_v`
/// is a placeholder constant published in place of a live reading.
#[derive(Debug, Clone, Copy)]
pub struct BatteryBank {
    pub instance: u8,
    /// Placeholder published on PGN 127508 until a real sender is wired.
    pub nominal_voltage_v: f64,
    pub battery_type: BatteryType,
    pub equalization: EqualizationSupport,
    pub nominal_voltage: BatteryNominalVoltage,
    pub chemistry: BatteryChemistry,
    pub capacity_ah: f64,
    pub temperature_coefficient_percent: i8,
    pub peukert_exponent: f64,
    pub charge_efficiency_percent: i8,
}

/// Installed banks: engine start battery and house bank.
pub const BATTERY_BANKS: [BatteryBank; 2] = [
    BatteryBank {
        instance: 1,
        nominal_voltage_v: 12.6,
        battery_type: BatteryType::Flooded,
        equalization: EqualizationSupport::Unavailable,
        nominal_voltage: BatteryNominalVoltage::V12,
        chemistry: BatteryChemistry::LeadAcid,
        capacity_ah: 55.0,
        temperature_coefficient_percent: 53,
        peukert_exponent: 1.251,
        charge_efficiency_percent: 75,
    },
    BatteryBank {
        instance: 2,
        nominal_voltage_v: 12.6,
        battery_type: BatteryType::Agm,
        equalization: EqualizationSupport::Unavailable,
        nominal_voltage: BatteryNominalVoltage::V12,
        chemistry: BatteryChemistry::LeadAcid,
        capacity_ah: 330.0,
        temperature_coefficient_percent: 53,
        peukert_exponent: 1.251,
        charge_efficiency_percent: 75,
    },
];
