//! Abstraction over the physical measurement sources feeding the gateway.
//!
//! Every analog accessor returns an `f64` using [`DOUBLE_NA`] as the
//! "no reading" sentinel, so a missing sensor degrades into not-available
//! fields on the bus instead of an error path. Temperatures are reported in
//! degrees Celsius and converted to Kelvin at encoding time.
//!
//! [`DOUBLE_NA`]: crate::infra::codec::DOUBLE_NA

/// Measurement sources attached to the engine: flywheel pickup, analog
/// senders, thermocouples, and the alternator sense line.
pub trait EngineSensors {
    /// Crankshaft speed in rpm from the flywheel pickup. `0.0` when stopped.
    fn flywheel_rpm(&mut self) -> f64;

    /// Coolant temperature in degrees Celsius.
    fn coolant_temperature(&mut self) -> f64;

    /// Alternator output voltage in volts.
    fn alternator_voltage(&mut self) -> f64;

    /// Engine oil pressure in pascals.
    fn oil_pressure(&mut self) -> f64;

    /// Engine oil temperature in degrees Celsius.
    fn oil_temperature(&mut self) -> f64;

    /// Fuel consumption in liters per hour.
    fn fuel_rate(&mut self) -> f64;

    /// Accumulated running time in seconds.
    fn engine_hours(&mut self) -> f64;

    /// Coolant pressure in pascals.
    fn coolant_pressure(&mut self) -> f64;

    /// Fuel supply pressure in pascals.
    fn fuel_pressure(&mut self) -> f64;

    /// Engine load in percent of rated output.
    fn load(&mut self) -> i8;

    /// Engine torque in percent of rated torque.
    fn torque(&mut self) -> i8;

    /// Discrete status bitfield 1 (check engine, over temperature, ...).
    fn status1(&mut self) -> u16;

    /// Discrete status bitfield 2 (warning level, maintenance needed, ...).
    fn status2(&mut self) -> u16;

    /// Engine room ambient temperature in degrees Celsius.
    fn engine_room_temperature(&mut self) -> f64;

    /// Exhaust gas temperature in degrees Celsius.
    fn exhaust_temperature(&mut self) -> f64;

    /// Alternator case temperature in degrees Celsius.
    fn alternator_temperature(&mut self) -> f64;
}

/// Optional cabin atmosphere sensor (temperature and barometric pressure).
pub trait AtmosphereSensor {
    /// Air temperature in degrees Celsius.
    fn temperature_celsius(&mut self) -> f64;

    /// Barometric pressure in pascals.
    fn pressure_pa(&mut self) -> f64;
}

/// Local operator console: a serial port, a shell, a log sink. Receives
/// diagnostic dumps and, when verbose, a trace of every publication.
pub trait OperatorPort {
    /// Whether per-publication traces should be emitted.
    fn verbose(&self) -> bool;

    /// Write one formatted line to the console.
    fn line(&mut self, args: core::fmt::Arguments<'_>);
}

/// One coherent reading of every dynamic engine quantity, captured in a
/// single pass so a message never mixes values from two sampling instants.
#[derive(Debug, Clone)]
pub struct DynamicSnapshot {
    pub oil_pressure_pa: f64,
    pub oil_temperature_c: f64,
    pub coolant_temperature_c: f64,
    pub alternator_voltage_v: f64,
    pub fuel_rate_lph: f64,
    pub engine_hours_s: f64,
    pub coolant_pressure_pa: f64,
    pub fuel_pressure_pa: f64,
    pub status1: u16,
    pub status2: u16,
    pub load_percent: i8,
    pub torque_percent: i8,
}

impl DynamicSnapshot {
    /// Read every dynamic quantity once from the sensor bank.
    pub fn capture<S: EngineSensors>(sensors: &mut S) -> Self {
        Self {
            oil_pressure_pa: sensors.oil_pressure(),
            oil_temperature_c: sensors.oil_temperature(),
            coolant_temperature_c: sensors.coolant_temperature(),
            alternator_voltage_v: sensors.alternator_voltage(),
            fuel_rate_lph: sensors.fuel_rate(),
            engine_hours_s: sensors.engine_hours(),
            coolant_pressure_pa: sensors.coolant_pressure(),
            fuel_pressure_pa: sensors.fuel_pressure(),
            status1: sensors.status1(),
            status2: sensors.status2(),
            load_percent: sensors.load(),
            torque_percent: sensors.torque(),
        }
    }
}
