/// Test doubles to simulate the CAN bus, clock, sensors, and operator
/// console during integration tests.
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use engine_gateway_n2k::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, clock::MonotonicClock},
};
use engine_gateway_n2k::sensors::{AtmosphereSensor, EngineSensors, OperatorPort};

//==================================================================================BUS
#[derive(Clone, Default)]
#[allow(dead_code)]
/// CAN bus recording every transmitted frame for later inspection.
pub struct RecordingCanBus {
    pub sent: Arc<Mutex<Vec<CanFrame>>>,
}

#[allow(dead_code)]
impl RecordingCanBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_frames(&self) -> Vec<CanFrame> {
        self.sent.lock().unwrap().clone()
    }

    /// PGNs of the sent frames, in transmission order.
    pub fn sent_pgns(&self) -> Vec<u32> {
        self.sent_frames().iter().map(|f| f.id.pgn()).collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl CanBus for RecordingCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.sent.lock().unwrap().push(frame.clone());
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        // The publisher never receives; park forever.
        std::future::pending().await
    }
}

#[derive(Clone)]
#[allow(dead_code)]
/// Bus failing the first `failures` send attempts, then recording.
pub struct FlakyCanBus {
    pub inner: RecordingCanBus,
    failures_left: Arc<AtomicUsize>,
    fail_countdown: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FlakyCanBus {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: RecordingCanBus::new(),
            failures_left: Arc::new(AtomicUsize::new(failures)),
            fail_countdown: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Arm a one-shot failure on the nth send from now (1 = next send);
    /// the sends before and after it succeed.
    pub fn fail_nth_from_now(&self, n: usize) {
        self.fail_countdown.store(n, Ordering::SeqCst);
    }
}

impl CanBus for FlakyCanBus {
    type Error = &'static str;

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err("tx buffer full");
        }
        if self.fail_countdown.load(Ordering::SeqCst) > 0
            && self.fail_countdown.fetch_sub(1, Ordering::SeqCst) == 1
        {
            return Err("tx buffer full");
        }
        self.inner.sent.lock().unwrap().push(frame.clone());
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        std::future::pending().await
    }
}

//==================================================================================CLOCK
#[derive(Clone, Default)]
#[allow(dead_code)]
/// Manually driven clock; `delay_ms` advances virtual time immediately so
/// scheduler loops progress without real waiting.
pub struct SimClock {
    now_ms: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, millis: u64) {
        self.now_ms.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, millis: u64) {
        self.now_ms.store(millis, Ordering::SeqCst);
    }
}

impl MonotonicClock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    async fn delay_ms(&mut self, millis: u32) {
        self.now_ms.fetch_add(millis as u64, Ordering::SeqCst);
        // Let concurrent test tasks make progress.
        tokio::task::yield_now().await;
    }
}

//==================================================================================SENSORS
#[derive(Clone)]
#[allow(dead_code)]
/// Engine sensor bank returning fixed plausible readings; only the rpm is
/// adjustable from the test body.
pub struct FixedEngineSensors {
    pub rpm: Arc<Mutex<f64>>,
}

#[allow(dead_code)]
impl FixedEngineSensors {
    pub fn new(rpm: f64) -> Self {
        Self {
            rpm: Arc::new(Mutex::new(rpm)),
        }
    }

    pub fn set_rpm(&self, rpm: f64) {
        *self.rpm.lock().unwrap() = rpm;
    }
}

impl EngineSensors for FixedEngineSensors {
    fn flywheel_rpm(&mut self) -> f64 {
        *self.rpm.lock().unwrap()
    }
    fn coolant_temperature(&mut self) -> f64 {
        80.0
    }
    fn alternator_voltage(&mut self) -> f64 {
        14.2
    }
    fn oil_pressure(&mut self) -> f64 {
        200_000.0
    }
    fn oil_temperature(&mut self) -> f64 {
        85.0
    }
    fn fuel_rate(&mut self) -> f64 {
        5.5
    }
    fn engine_hours(&mut self) -> f64 {
        3_600.0
    }
    fn coolant_pressure(&mut self) -> f64 {
        150_000.0
    }
    fn fuel_pressure(&mut self) -> f64 {
        30_000.0
    }
    fn load(&mut self) -> i8 {
        25
    }
    fn torque(&mut self) -> i8 {
        20
    }
    fn status1(&mut self) -> u16 {
        0
    }
    fn status2(&mut self) -> u16 {
        0
    }
    fn engine_room_temperature(&mut self) -> f64 {
        35.0
    }
    fn exhaust_temperature(&mut self) -> f64 {
        120.0
    }
    fn alternator_temperature(&mut self) -> f64 {
        60.0
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Sensor bank recording the name of every accessor call, in order.
pub struct CountingSensors {
    pub reads: Arc<Mutex<Vec<&'static str>>>,
}

#[allow(dead_code)]
impl CountingSensors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_log(&self) -> Vec<&'static str> {
        self.reads.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.reads.lock().unwrap().push(name);
    }
}

impl EngineSensors for CountingSensors {
    fn flywheel_rpm(&mut self) -> f64 {
        self.record("flywheel_rpm");
        0.0
    }
    fn coolant_temperature(&mut self) -> f64 {
        self.record("coolant_temperature");
        0.0
    }
    fn alternator_voltage(&mut self) -> f64 {
        self.record("alternator_voltage");
        0.0
    }
    fn oil_pressure(&mut self) -> f64 {
        self.record("oil_pressure");
        0.0
    }
    fn oil_temperature(&mut self) -> f64 {
        self.record("oil_temperature");
        0.0
    }
    fn fuel_rate(&mut self) -> f64 {
        self.record("fuel_rate");
        0.0
    }
    fn engine_hours(&mut self) -> f64 {
        self.record("engine_hours");
        0.0
    }
    fn coolant_pressure(&mut self) -> f64 {
        self.record("coolant_pressure");
        0.0
    }
    fn fuel_pressure(&mut self) -> f64 {
        self.record("fuel_pressure");
        0.0
    }
    fn load(&mut self) -> i8 {
        self.record("load");
        0
    }
    fn torque(&mut self) -> i8 {
        self.record("torque");
        0
    }
    fn status1(&mut self) -> u16 {
        self.record("status1");
        0
    }
    fn status2(&mut self) -> u16 {
        self.record("status2");
        0
    }
    fn engine_room_temperature(&mut self) -> f64 {
        self.record("engine_room_temperature");
        0.0
    }
    fn exhaust_temperature(&mut self) -> f64 {
        self.record("exhaust_temperature");
        0.0
    }
    fn alternator_temperature(&mut self) -> f64 {
        self.record("alternator_temperature");
        0.0
    }
}

#[derive(Clone, Copy)]
#[allow(dead_code)]
/// Cabin atmosphere sensor with fixed readings.
pub struct FixedAtmosphere {
    pub temperature_c: f64,
    pub pressure_pa: f64,
}

impl AtmosphereSensor for FixedAtmosphere {
    fn temperature_celsius(&mut self) -> f64 {
        self.temperature_c
    }

    fn pressure_pa(&mut self) -> f64 {
        self.pressure_pa
    }
}

//==================================================================================OPERATOR
#[derive(Clone)]
#[allow(dead_code)]
/// Operator console capturing every emitted line.
pub struct RecordingOperator {
    pub verbose: bool,
    pub lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingOperator {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn captured_lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl OperatorPort for RecordingOperator {
    fn verbose(&self) -> bool {
        self.verbose
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push(format!("{args}"));
    }
}
