//! Multi-rate telemetry publication scheduler.
//!
//! Five message categories tick on independent fixed-period timers: rapid
//! engine (1 s), dynamic engine (3 s), temperatures (30 s), batteries (5 s),
//! and cabin environment (60 s). Each category pulls its measurements,
//! optionally traces them on the operator port, encodes, and transmits.
//! The loop is cooperative and never exits: a transmit failure leaves that
//! category's timer unadvanced so the attempt repeats at the next
//! due-check, and never disturbs the other categories.
use core::fmt::Debug;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use futures_util::{future::select, future::Either, pin_mut};

use crate::error::SendMessageError;
use crate::infra::codec::{DOUBLE_NA, INT8_NA};
use crate::infra::units::{ah_to_coulomb, celsius_to_kelvin};
use crate::protocol::messages::{
    HumiditySource, Pgn127488, Pgn127489, Pgn127508, Pgn127513, Pgn130311, Pgn130312,
    TemperatureSource,
};
use crate::protocol::transport::traits::clock::MonotonicClock;
use crate::protocol::transport::traits::{can_bus::CanBus, message_sender::MessageSender};
use crate::sensors::{AtmosphereSensor, DynamicSnapshot, EngineSensors, OperatorPort};

pub mod channel_map;
pub mod hysteresis;
pub mod rate_timer;

use channel_map::{
    TemperatureQuantity, ALTERNATOR_BATTERY_INSTANCE, BATTERY_BANKS, ENGINE_INSTANCE,
    ENVIRONMENT_SID, TEMPERATURE_SLOTS,
};
use hysteresis::EngineRunning;
use rate_timer::RateTimer;

//==================================================================================PERIODS
pub const RAPID_PERIOD_MS: u64 = 1_000;
pub const DYNAMIC_PERIOD_MS: u64 = 3_000;
pub const TEMPERATURE_PERIOD_MS: u64 = 30_000;
pub const VOLTAGE_PERIOD_MS: u64 = 5_000;
pub const ENVIRONMENT_PERIOD_MS: u64 = 60_000;

/// Idle delay between two scheduler iterations.
pub const SCHEDULER_TICK_MS: u32 = 10;

//==================================================================================COMMANDS
/// Commands accepted by the running publisher from other tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCommand {
    /// Render every measured quantity on the operator port.
    DumpStatus,
}

//==================================================================================PUBLISHER
/// Scheduler context: bus, clock, measurement sources, operator port, and
/// all per-category state.
pub struct TelemetryPublisher<C, K, S, A, O>
where
    C: CanBus,
    C::Error: Debug,
    K: MonotonicClock,
    S: EngineSensors,
    A: AtmosphereSensor,
    O: OperatorPort,
{
    bus: C,
    clock: K,
    sensors: S,
    /// `None` when the sensor was not detected at startup; the environment
    /// category then stays silent for the whole session.
    atmosphere: Option<A>,
    operator: O,
    source_address: u8,
    engine_running: EngineRunning,
    /// Next channel to send when a temperature cycle was interrupted by a
    /// transmit failure; 0 when the previous cycle completed.
    temperature_progress: usize,
    /// Same, for the five-message battery cycle.
    voltage_progress: usize,
    rapid_timer: RateTimer,
    dynamic_timer: RateTimer,
    temperature_timer: RateTimer,
    voltage_timer: RateTimer,
    environment_timer: RateTimer,
}

impl<C, K, S, A, O> TelemetryPublisher<C, K, S, A, O>
where
    C: CanBus,
    C::Error: Debug,
    K: MonotonicClock,
    S: EngineSensors,
    A: AtmosphereSensor,
    O: OperatorPort,
{
    /// Build a publisher with every category timer phased at the current
    /// instant, so the first publications happen one full period after
    /// startup.
    pub fn new(
        bus: C,
        clock: K,
        sensors: S,
        atmosphere: Option<A>,
        operator: O,
        source_address: u8,
    ) -> Self {
        #[cfg(feature = "defmt")]
        if atmosphere.is_none() {
            defmt::warn!("atmosphere sensor absent, environment category disabled");
        }

        let now = clock.now_ms();
        Self {
            bus,
            clock,
            sensors,
            atmosphere,
            operator,
            source_address,
            engine_running: EngineRunning::new(),
            temperature_progress: 0,
            voltage_progress: 0,
            rapid_timer: RateTimer::new(now, RAPID_PERIOD_MS),
            dynamic_timer: RateTimer::new(now, DYNAMIC_PERIOD_MS),
            temperature_timer: RateTimer::new(now, TEMPERATURE_PERIOD_MS),
            voltage_timer: RateTimer::new(now, VOLTAGE_PERIOD_MS),
            environment_timer: RateTimer::new(now, ENVIRONMENT_PERIOD_MS),
        }
    }

    /// One scheduler iteration: check every category in fixed order and
    /// publish the due ones.
    ///
    /// A failing category keeps its timer unadvanced (the attempt repeats
    /// at the next due-check) and does not prevent the remaining
    /// categories from publishing. The first error of the iteration is
    /// returned for logging.
    pub async fn poll(&mut self) -> Result<(), SendMessageError<C::Error>> {
        let now = self.clock.now_ms();
        let mut first_error = None;

        if self.rapid_timer.is_due(now) {
            match self.publish_rapid().await {
                Ok(()) => self.rapid_timer.mark(now),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if self.dynamic_timer.is_due(now) {
            match self.publish_dynamic().await {
                Ok(()) => self.dynamic_timer.mark(now),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if self.temperature_timer.is_due(now) {
            match self.publish_temperatures().await {
                Ok(()) => self.temperature_timer.mark(now),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if self.voltage_timer.is_due(now) {
            match self.publish_voltages().await {
                Ok(()) => self.voltage_timer.mark(now),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if self.atmosphere.is_some() && self.environment_timer.is_due(now) {
            match self.publish_environment().await {
                Ok(()) => self.environment_timer.mark(now),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Process one external command.
    pub fn handle_command(&mut self, command: GatewayCommand) {
        match command {
            GatewayCommand::DumpStatus => self.dump_status(),
        }
    }

    /// Cooperative loop: wait for either an external command or the next
    /// scheduler tick, then run one iteration. Publish errors are logged
    /// and never terminate the loop.
    pub async fn run<const CMD_CAP: usize>(
        mut self,
        commands: Option<&Channel<CriticalSectionRawMutex, GatewayCommand, CMD_CAP>>,
    ) {
        loop {
            match commands {
                Some(channel) => {
                    let mut command_to_process = None;

                    {
                        let command_future = channel.receive();
                        let tick_future = self.clock.delay_ms(SCHEDULER_TICK_MS);
                        pin_mut!(command_future);
                        pin_mut!(tick_future);

                        match select(command_future, tick_future).await {
                            Either::Left((command, pending_tick)) => {
                                command_to_process = Some(command);
                                drop(pending_tick);
                            }
                            Either::Right(((), pending_command)) => {
                                drop(pending_command);
                            }
                        }
                    }

                    if let Some(command) = command_to_process {
                        self.handle_command(command);
                    }
                }
                None => self.clock.delay_ms(SCHEDULER_TICK_MS).await,
            }

            if let Err(_err) = self.poll().await {
                #[cfg(feature = "defmt")]
                defmt::warn!("publish failed: {}", defmt::Debug2Format(&_err));
            }
        }
    }

    //==============================================================================CATEGORIES
    async fn publish_rapid(&mut self) -> Result<(), SendMessageError<C::Error>> {
        let rpm = self.sensors.flywheel_rpm();

        if self.operator.verbose() {
            self.operator.line(format_args!("RPM {}", rpm));
        }

        // Stopped engine: let the coast-down window close, then go quiet
        // until the flywheel turns again. The grace counter moves only
        // when the cycle completes, so a failed transmit retried on the
        // next scheduler tick does not shorten the window.
        if !self.engine_running.should_publish(rpm) {
            self.engine_running.commit(rpm);
            return Ok(());
        }

        let message = Pgn127488 {
            engine_instance: ENGINE_INSTANCE,
            engine_speed_rpm: rpm,
            boost_pressure_pa: DOUBLE_NA,
            tilt_trim_percent: INT8_NA,
        };
        self.transmit(&message, Pgn127488::PGN, Pgn127488::PRIORITY)
            .await?;
        self.engine_running.commit(rpm);
        Ok(())
    }

    async fn publish_dynamic(&mut self) -> Result<(), SendMessageError<C::Error>> {
        let snapshot = DynamicSnapshot::capture(&mut self.sensors);

        if self.operator.verbose() {
            self.operator.line(format_args!(
                "Engine Params1 t={}, av={}, op={}, ot={}, fr={}, eh={}, cp={}, fp={}",
                snapshot.coolant_temperature_c,
                snapshot.alternator_voltage_v,
                snapshot.oil_pressure_pa,
                snapshot.oil_temperature_c,
                snapshot.fuel_rate_lph,
                snapshot.engine_hours_s,
                snapshot.coolant_pressure_pa,
                snapshot.fuel_pressure_pa,
            ));
            self.operator.line(format_args!(
                "Engine Params2 l={}, t={}, s1={}, s2={}",
                snapshot.load_percent,
                snapshot.torque_percent,
                snapshot.status1,
                snapshot.status2,
            ));
        }

        let message = Pgn127489 {
            engine_instance: ENGINE_INSTANCE,
            oil_pressure_pa: snapshot.oil_pressure_pa,
            oil_temperature_k: celsius_to_kelvin(snapshot.oil_temperature_c),
            coolant_temperature_k: celsius_to_kelvin(snapshot.coolant_temperature_c),
            alternator_voltage_v: snapshot.alternator_voltage_v,
            fuel_rate_lph: snapshot.fuel_rate_lph,
            engine_hours_s: snapshot.engine_hours_s,
            coolant_pressure_pa: snapshot.coolant_pressure_pa,
            fuel_pressure_pa: snapshot.fuel_pressure_pa,
            discrete_status1: snapshot.status1,
            discrete_status2: snapshot.status2,
            load_percent: snapshot.load_percent,
            torque_percent: snapshot.torque_percent,
        };
        self.transmit(&message, Pgn127489::PGN, Pgn127489::PRIORITY)
            .await
    }

    async fn publish_temperatures(&mut self) -> Result<(), SendMessageError<C::Error>> {
        let engine_room_c = self.sensors.engine_room_temperature();
        let exhaust_c = self.sensors.exhaust_temperature();
        let alternator_c = self.sensors.alternator_temperature();

        // No trace again when resuming an interrupted cycle.
        if self.temperature_progress == 0 && self.operator.verbose() {
            self.operator.line(format_args!(
                "Temperature er={}, eg={}, at={}",
                engine_room_c, exhaust_c, alternator_c
            ));
        }

        for index in self.temperature_progress..TEMPERATURE_SLOTS.len() {
            let slot = TEMPERATURE_SLOTS[index];
            let celsius = match slot.quantity {
                TemperatureQuantity::EngineRoom => engine_room_c,
                TemperatureQuantity::ExhaustGas => exhaust_c,
                TemperatureQuantity::Alternator => alternator_c,
            };
            let message = Pgn130312 {
                sid: slot.sid,
                instance: slot.instance,
                source: slot.source,
                actual_temperature_k: celsius_to_kelvin(celsius),
                set_temperature_k: DOUBLE_NA,
            };
            if let Err(err) = self
                .transmit(&message, Pgn130312::PGN, Pgn130312::PRIORITY)
                .await
            {
                // Resume here on the retry instead of re-sending the
                // channels already on the bus.
                self.temperature_progress = index;
                return Err(err);
            }
        }
        self.temperature_progress = 0;
        Ok(())
    }

    async fn publish_voltages(&mut self) -> Result<(), SendMessageError<C::Error>> {
        let alternator_voltage = self.sensors.alternator_voltage();
        let alternator_temperature_c = self.sensors.alternator_temperature();

        if self.voltage_progress == 0 && self.operator.verbose() {
            self.operator.line(format_args!(
                "Voltages eb={}, sb={}, av={}",
                BATTERY_BANKS[0].nominal_voltage_v,
                BATTERY_BANKS[1].nominal_voltage_v,
                alternator_voltage,
            ));
        }

        // Steps 0-1: bank statuses (placeholder voltages until real
        // senders are wired in); step 2: live alternator readings riding
        // on a third battery instance; steps 3-4: static configuration
        // for the two real banks only. An interrupted cycle resumes at
        // the failed step instead of re-sending the earlier messages.
        for step in self.voltage_progress..5 {
            let result = match step {
                0 | 1 => {
                    let bank = BATTERY_BANKS[step];
                    let message = Pgn127508 {
                        battery_instance: bank.instance,
                        voltage_v: bank.nominal_voltage_v,
                        current_a: DOUBLE_NA,
                        temperature_k: DOUBLE_NA,
                        sid: bank.instance,
                    };
                    self.transmit(&message, Pgn127508::PGN, Pgn127508::PRIORITY)
                        .await
                }
                2 => {
                    let alternator = Pgn127508 {
                        battery_instance: ALTERNATOR_BATTERY_INSTANCE,
                        voltage_v: alternator_voltage,
                        current_a: DOUBLE_NA,
                        temperature_k: celsius_to_kelvin(alternator_temperature_c),
                        sid: ALTERNATOR_BATTERY_INSTANCE,
                    };
                    self.transmit(&alternator, Pgn127508::PGN, Pgn127508::PRIORITY)
                        .await
                }
                _ => {
                    let bank = BATTERY_BANKS[step - 3];
                    let message = Pgn127513 {
                        battery_instance: bank.instance,
                        battery_type: bank.battery_type,
                        equalization: bank.equalization,
                        nominal_voltage: bank.nominal_voltage,
                        chemistry: bank.chemistry,
                        capacity_coulomb: ah_to_coulomb(bank.capacity_ah),
                        temperature_coefficient_percent: bank.temperature_coefficient_percent,
                        peukert_exponent: bank.peukert_exponent,
                        charge_efficiency_percent: bank.charge_efficiency_percent,
                    };
                    self.transmit(&message, Pgn127513::PGN, Pgn127513::PRIORITY)
                        .await
                }
            };
            if let Err(err) = result {
                self.voltage_progress = step;
                return Err(err);
            }
        }
        self.voltage_progress = 0;
        Ok(())
    }

    async fn publish_environment(&mut self) -> Result<(), SendMessageError<C::Error>> {
        let Some(atmosphere) = self.atmosphere.as_mut() else {
            return Ok(());
        };
        let temperature_c = atmosphere.temperature_celsius();
        let pressure_pa = atmosphere.pressure_pa();

        if self.operator.verbose() {
            self.operator.line(format_args!(
                "Environment t={}, p={}",
                temperature_c, pressure_pa
            ));
        }

        let message = Pgn130311 {
            sid: ENVIRONMENT_SID,
            temperature_source: TemperatureSource::InsideAir,
            humidity_source: HumiditySource::Undefined,
            temperature_k: celsius_to_kelvin(temperature_c),
            humidity_percent: DOUBLE_NA,
            pressure_pa,
        };
        self.transmit(&message, Pgn130311::PGN, Pgn130311::PRIORITY)
            .await
    }

    //==============================================================================DIAGNOSTIC
    /// Render every measured quantity on the operator port, one line per
    /// quantity, reading each sensor exactly once. No bus traffic.
    fn dump_status(&mut self) {
        self.operator.line(format_args!(
            "RPM                     = {}",
            self.sensors.flywheel_rpm()
        ));
        self.operator.line(format_args!(
            "Coolant Temperature     = {}",
            self.sensors.coolant_temperature()
        ));
        self.operator.line(format_args!(
            "Alternator Voltage      = {}",
            self.sensors.alternator_voltage()
        ));
        self.operator.line(format_args!(
            "Oil Pressure            = {}",
            self.sensors.oil_pressure()
        ));
        self.operator.line(format_args!(
            "Oil Temperature         = {}",
            self.sensors.oil_temperature()
        ));
        self.operator.line(format_args!(
            "Fuel Rate               = {}",
            self.sensors.fuel_rate()
        ));
        self.operator.line(format_args!(
            "Engine Hours            = {}",
            self.sensors.engine_hours()
        ));
        self.operator.line(format_args!(
            "Coolant Pressure        = {}",
            self.sensors.coolant_pressure()
        ));
        self.operator.line(format_args!(
            "Fuel Pressure           = {}",
            self.sensors.fuel_pressure()
        ));
        self.operator
            .line(format_args!("Load                    = {}", self.sensors.load()));
        self.operator
            .line(format_args!("Torque                  = {}", self.sensors.torque()));
        self.operator
            .line(format_args!("Status1                 = {}", self.sensors.status1()));
        self.operator
            .line(format_args!("Status2                 = {}", self.sensors.status2()));
        self.operator.line(format_args!(
            "Engine Room Temperature = {}",
            self.sensors.engine_room_temperature()
        ));
        self.operator.line(format_args!(
            "Exhaust Temperature     = {}",
            self.sensors.exhaust_temperature()
        ));
        self.operator.line(format_args!(
            "Alternator Temperature  = {}",
            self.sensors.alternator_temperature()
        ));
        if let Some(atmosphere) = self.atmosphere.as_mut() {
            self.operator.line(format_args!(
                "Inside Temperature      = {}",
                atmosphere.temperature_celsius()
            ));
            self.operator.line(format_args!(
                "Inside Pressure         = {}",
                atmosphere.pressure_pa()
            ));
        }
    }

    //==============================================================================TRANSMIT
    async fn transmit<M: crate::infra::codec::ToPayload>(
        &mut self,
        message: &M,
        pgn: u32,
        priority: u8,
    ) -> Result<(), SendMessageError<C::Error>> {
        self.bus
            .send_message(message, pgn, priority, self.source_address, &mut self.clock)
            .await
    }
}
