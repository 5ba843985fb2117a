//! High-level ADS1220 device driver implementation.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;

use crate::commands::{decode_data, decode_register, encode_data_read, encode_read, encode_write, Command};
use crate::config::{Config, VerifyPolicy};
use crate::conversion::calibrated_voltage;
use crate::drdy::{self, DrdyProgress, WaitError};
use crate::error::{Error, Result};
use crate::interface::spi::SpiInterface;
use crate::interface::Ads1220Interface;
use crate::log::{debug, info, trace, warning};
use crate::record::{Clock, Reading, SampleRecord};
use crate::registers::{
    Conf0, Register, RegisterProfile, CONFIG_REGISTERS, REGISTER_COUNT, UNRESPONSIVE_PATTERN,
};
use crate::verify::{first_mismatch, RegisterMismatch};

/// Lifecycle of the driver with respect to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// No verified register profile is in place.
    Uninitialized,
    /// Registers verified; ready to start a conversion.
    Configured,
    /// `START` issued, waiting for DRDY.
    ConversionPending,
    /// Result available and being read.
    SampleReady,
    /// A timeout or bus error occurred; re-initialization is required.
    Faulted,
}

/// Outcome of a successful [`Ads1220::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitReport {
    /// `CONF0` as read right after reset.
    pub probe: u8,
    /// Registers read back after programming.
    pub readback: RegisterProfile,
    /// First mismatch tolerated under [`VerifyPolicy::WarnOnly`].
    pub mismatch: Option<RegisterMismatch>,
}

/// High-level synchronous driver for the ADS1220 ADC.
pub struct Ads1220<IFACE, DRDY> {
    interface: IFACE,
    drdy: DRDY,
    config: Config,
    profile: Option<RegisterProfile>,
    state: DeviceState,
}

impl<IFACE, DRDY> Ads1220<IFACE, DRDY> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the bus interface and DRDY line.
    pub fn new(interface: IFACE, drdy: DRDY, config: Config) -> Self {
        Self {
            interface,
            drdy,
            config,
            profile: None,
            state: DeviceState::Uninitialized,
        }
    }

    /// Consumes the driver and returns the owned interface and line.
    pub fn release(self) -> (IFACE, DRDY, Config) {
        (self.interface, self.drdy, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the current device state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the last profile that passed readback verification.
    pub fn profile(&self) -> Option<&RegisterProfile> {
        self.profile.as_ref()
    }
}

impl<SPI, DRDY> Ads1220<SpiInterface<SPI>, DRDY>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, drdy: DRDY, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), drdy, config)
    }

    /// Releases the driver, returning the SPI device, DRDY line and configuration.
    pub fn release_spi(self) -> (SPI, DRDY, Config) {
        let (iface, drdy, config) = self.release();
        (iface.release(), drdy, config)
    }
}

impl<IFACE, DRDY, CommE, PinE> Ads1220<IFACE, DRDY>
where
    IFACE: Ads1220Interface<Error = CommE>,
    DRDY: InputPin<Error = PinE>,
{
    // ==================================================================
    // == Initialization & Register Access ==============================
    // ==================================================================
    /// Resets the device, programs `profile` and verifies it by readback.
    ///
    /// Fails with [`Error::DeviceUnresponsive`] before writing anything when
    /// `CONF0` reads `0xFF` after reset. A readback mismatch fails with
    /// [`Error::ConfigurationMismatch`] unless the configuration opts into
    /// [`VerifyPolicy::WarnOnly`]. After any failure the full sequence has to
    /// be run again.
    pub fn initialize(
        &mut self,
        profile: RegisterProfile,
        delay: &mut impl DelayNs,
    ) -> Result<InitReport, CommE, PinE> {
        self.config.validate().map_err(Error::InvalidConfig)?;

        self.state = DeviceState::Uninitialized;

        debug!("ads1220: sending reset");
        self.reset(delay)?;

        let probe = self.read_register(Conf0::ADDRESS)?;
        debug!("ads1220: CONF0 before configuration: {=u8:#x} (expected 0x00)", probe);
        if probe == UNRESPONSIVE_PATTERN {
            warning!("ads1220: all bits read as 1, check SPI wiring, chip select and power");
            return Err(Error::DeviceUnresponsive {
                register: Conf0::ADDRESS,
                value: probe,
            });
        }

        for (register, value) in profile.iter() {
            debug!("ads1220: writing CONF{=u8} = {=u8:#x}", register, value);
            self.write_register(register, value, delay)?;
        }

        let readback = self.read_profile()?;
        for ((register, expected), (_, actual)) in profile.iter().zip(readback.iter()) {
            debug!(
                "ads1220: CONF{=u8} readback {=u8:#x} (expected {=u8:#x})",
                register,
                actual,
                expected
            );
        }

        let mismatch = first_mismatch(&profile, &readback);
        if let Some(mismatch) = mismatch {
            warning!(
                "ads1220: CONF{=u8} read back {=u8:#x}, wrote {=u8:#x}",
                mismatch.register,
                mismatch.actual,
                mismatch.expected
            );
            if self.config.verify == VerifyPolicy::Strict {
                return Err(Error::ConfigurationMismatch(mismatch));
            }
        }

        self.profile = Some(profile);
        self.state = DeviceState::Configured;
        info!("ads1220: configured, gain {}", profile.gain().factor());

        Ok(InitReport {
            probe,
            readback,
            mismatch,
        })
    }

    /// Runs [`Ads1220::initialize`] again with the last accepted profile.
    ///
    /// This is the recovery path out of [`DeviceState::Faulted`].
    pub fn reinitialize(&mut self, delay: &mut impl DelayNs) -> Result<InitReport, CommE, PinE> {
        match self.profile {
            Some(profile) => self.initialize(profile, delay),
            None => Err(Error::NotConfigured { state: self.state }),
        }
    }

    /// Issues `RESET` and waits for the device to settle.
    ///
    /// Register contents return to their power-on defaults, so the driver
    /// drops back to [`DeviceState::Uninitialized`].
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE, PinE> {
        self.command(Command::Reset)?;
        self.state = DeviceState::Uninitialized;
        delay.delay_ms(self.config.reset_settle_ms);
        Ok(())
    }

    /// Issues `POWERDOWN`. Registers are retained and the next `START` wakes the device.
    pub fn power_down(&mut self) -> Result<(), CommE, PinE> {
        self.command(Command::PowerDown)
    }

    /// Reads a single configuration register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE, PinE> {
        let mut frame = encode_read(register);
        self.transfer(&mut frame)?;
        Ok(decode_register(&frame))
    }

    /// Writes a single configuration register and waits the write settle time.
    pub fn write_register(
        &mut self,
        register: u8,
        value: u8,
        delay: &mut impl DelayNs,
    ) -> Result<(), CommE, PinE> {
        let mut frame = encode_write(register, value);
        self.transfer(&mut frame)?;
        delay.delay_ms(self.config.write_settle_ms);
        Ok(())
    }

    /// Reads all four configuration registers.
    pub fn read_profile(&mut self) -> Result<RegisterProfile, CommE, PinE> {
        let mut values = [0u8; REGISTER_COUNT];
        for (slot, register) in values.iter_mut().zip(CONFIG_REGISTERS) {
            *slot = self.read_register(register)?;
        }
        Ok(RegisterProfile::from(values))
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Runs one trigger, wait, read and convert cycle.
    ///
    /// DRDY progress is reported through the crate logger.
    pub fn acquire(&mut self, delay: &mut impl DelayNs) -> Result<Reading, CommE, PinE> {
        self.acquire_with_progress(delay, |progress| {
            debug!(
                "ads1220: still waiting for DRDY ({=u32} polls, {=u64} us)",
                progress.polls,
                progress.elapsed_us
            );
        })
    }

    /// Same as [`Ads1220::acquire`] with a caller-supplied progress callback.
    pub fn acquire_with_progress<F>(
        &mut self,
        delay: &mut impl DelayNs,
        on_progress: F,
    ) -> Result<Reading, CommE, PinE>
    where
        F: FnMut(DrdyProgress),
    {
        self.trigger()?;
        self.synchronize(delay, on_progress)?;
        let raw = self.read_conversion()?;
        let reading = self.convert(raw);
        self.state = DeviceState::Configured;
        Ok(reading)
    }

    /// Acquires one reading and stamps it with `clock`.
    pub fn acquire_record<C>(
        &mut self,
        delay: &mut impl DelayNs,
        clock: &mut C,
    ) -> Result<SampleRecord, CommE, PinE>
    where
        C: Clock,
    {
        let reading = self.acquire(delay)?;
        Ok(SampleRecord {
            timestamp: clock.now(),
            reading,
        })
    }

    /// Same as [`Ads1220::acquire_record`] with a caller-supplied progress callback.
    pub fn acquire_record_with_progress<C, F>(
        &mut self,
        delay: &mut impl DelayNs,
        clock: &mut C,
        on_progress: F,
    ) -> Result<SampleRecord, CommE, PinE>
    where
        C: Clock,
        F: FnMut(DrdyProgress),
    {
        let reading = self.acquire_with_progress(delay, on_progress)?;
        Ok(SampleRecord {
            timestamp: clock.now(),
            reading,
        })
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================

    fn trigger(&mut self) -> Result<(), CommE, PinE> {
        if self.state != DeviceState::Configured {
            return Err(Error::NotConfigured { state: self.state });
        }

        self.command(Command::Start)?;
        self.state = DeviceState::ConversionPending;
        Ok(())
    }

    fn synchronize<F>(&mut self, delay: &mut impl DelayNs, on_progress: F) -> Result<u32, CommE, PinE>
    where
        F: FnMut(DrdyProgress),
    {
        match drdy::wait_ready(&mut self.drdy, delay, self.config.drdy, on_progress) {
            Ok(polls) => {
                trace!("ads1220: DRDY after {=u32} polls", polls);
                Ok(polls)
            }
            Err(WaitError::Timeout { polls, elapsed_us }) => {
                self.state = DeviceState::Faulted;
                warning!("ads1220: DRDY timeout after {=u64} us", elapsed_us);
                Err(Error::DrdyTimeout { polls, elapsed_us })
            }
            Err(WaitError::Pin(err)) => {
                self.state = DeviceState::Faulted;
                Err(Error::Pin(err))
            }
        }
    }

    fn read_conversion(&mut self) -> Result<i32, CommE, PinE> {
        let mut frame = encode_data_read();
        self.transfer(&mut frame)?;
        self.state = DeviceState::SampleReady;
        Ok(decode_data(&frame))
    }

    fn convert(&self, raw: i32) -> Reading {
        let gain = self.profile.unwrap_or_default().gain();
        Reading {
            raw,
            voltage: calibrated_voltage(
                raw,
                self.config.reference_voltage,
                self.config.calibration_offset,
            ),
            gain,
        }
    }

    fn command(&mut self, command: Command) -> Result<(), CommE, PinE> {
        let mut frame = command.frame();
        self.transfer(frame.as_mut_slice())
    }

    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), CommE, PinE> {
        self.interface.transfer(buf).map_err(|err| {
            self.state = DeviceState::Faulted;
            Error::Interface(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CMD_POWERDOWN, CMD_RDATA, CMD_RESET, CMD_RREG, CMD_START, CMD_WREG};
    use crate::params::Gain;
    use crate::record::Timestamp;
    use crate::registers::REG_CONF0;
    use embedded_hal::digital::ErrorType;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct BusFault;

    /// Register-level model of the converter sitting behind the bus.
    #[derive(Default)]
    struct SimulatedAdc {
        registers: [u8; REGISTER_COUNT],
        /// Value returned by the first register read after reset.
        probe: Option<u8>,
        /// Register that always reads back the given value.
        stuck: Option<(u8, u8)>,
        sample: [u8; 3],
        /// Command byte that makes the transfer fail.
        fail_on: Option<u8>,
        commands: Vec<u8>,
        writes: usize,
        reads_since_reset: usize,
    }

    impl Ads1220Interface for SimulatedAdc {
        type Error = BusFault;

        fn transfer(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
            let command = buf[0];
            self.commands.push(command);
            if self.fail_on == Some(command) {
                return Err(BusFault);
            }

            let register = (command >> 2) & 0x03;
            match command {
                CMD_RESET => {
                    self.registers = [0; REGISTER_COUNT];
                    self.reads_since_reset = 0;
                }
                CMD_START | CMD_POWERDOWN => {}
                CMD_RDATA => buf[1..4].copy_from_slice(&self.sample),
                c if c & 0xF0 == CMD_WREG => {
                    assert_eq!(buf.len(), 2);
                    self.registers[register as usize] = buf[1];
                    self.writes += 1;
                }
                c if c & 0xF0 == CMD_RREG => {
                    assert_eq!(buf.len(), 2);
                    let value = match (self.probe, self.stuck) {
                        (Some(probe), _) if self.reads_since_reset == 0 => probe,
                        (_, Some((stuck, value))) if stuck == register => value,
                        _ => self.registers[register as usize],
                    };
                    self.reads_since_reset += 1;
                    buf[1] = value;
                }
                other => panic!("unexpected command byte {other:#04x}"),
            }

            Ok(())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PinFault;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    /// DRDY line that asserts after a number of high reads, or never.
    struct DrdyLine {
        busy_reads: Option<u32>,
        broken: bool,
    }

    impl DrdyLine {
        fn ready() -> Self {
            Self {
                busy_reads: Some(0),
                broken: false,
            }
        }

        fn stuck_high() -> Self {
            Self {
                busy_reads: None,
                broken: false,
            }
        }

        fn after(busy_reads: u32) -> Self {
            Self {
                busy_reads: Some(busy_reads),
                broken: false,
            }
        }
    }

    impl ErrorType for DrdyLine {
        type Error = PinFault;
    }

    impl InputPin for DrdyLine {
        fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
            if self.broken {
                return Err(PinFault);
            }
            match self.busy_reads.as_mut() {
                Some(0) => Ok(true),
                Some(remaining) => {
                    *remaining -= 1;
                    Ok(false)
                }
                None => Ok(false),
            }
        }
    }

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&mut self) -> Timestamp {
            self.0
        }
    }

    const STARTUP_SEQUENCE: [u8; 10] = [
        0x06, // RESET
        0x20, // RREG CONF0 probe
        0x40, 0x44, 0x48, 0x4C, // WREG CONF0..CONF3
        0x20, 0x24, 0x28, 0x2C, // RREG CONF0..CONF3
    ];

    fn configured(adc: &mut SimulatedAdc) -> Ads1220<&mut SimulatedAdc, DrdyLine> {
        let mut driver = Ads1220::new(adc, DrdyLine::ready(), Config::default());
        driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap();
        driver
    }

    #[test]
    fn initialize_with_echoing_device_reaches_configured() {
        let mut adc = SimulatedAdc::default();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());

        let report = driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap();

        assert_eq!(report.probe, 0x00);
        assert_eq!(report.readback, RegisterProfile::REFERENCE);
        assert_eq!(report.mismatch, None);
        assert_eq!(driver.state(), DeviceState::Configured);
        assert_eq!(driver.profile(), Some(&RegisterProfile::REFERENCE));

        assert_eq!(adc.commands, STARTUP_SEQUENCE);
        assert_eq!(adc.registers, [0x00, 0x0C, 0x10, 0x00]);
        assert_eq!(adc.writes, 4);
    }

    #[test]
    fn readback_mismatch_fails_initialization() {
        let mut adc = SimulatedAdc {
            stuck: Some((0x02, 0x00)),
            ..Default::default()
        };
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());

        let err = driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap_err();

        assert_eq!(
            err,
            Error::ConfigurationMismatch(RegisterMismatch {
                register: 0x02,
                expected: 0x10,
                actual: 0x00,
            })
        );
        assert_ne!(driver.state(), DeviceState::Configured);
        assert!(matches!(
            driver.acquire(&mut NoopDelay::new()),
            Err(Error::NotConfigured { .. })
        ));
    }

    #[test]
    fn rejected_profile_is_not_kept() {
        let mut adc = SimulatedAdc {
            stuck: Some((0x02, 0x00)),
            ..Default::default()
        };
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());
        let mut delay = NoopDelay::new();

        assert!(driver
            .initialize(RegisterProfile::REFERENCE, &mut delay)
            .is_err());
        assert_eq!(driver.state(), DeviceState::Uninitialized);
        assert_eq!(driver.profile(), None);
        assert!(matches!(
            driver.reinitialize(&mut delay),
            Err(Error::NotConfigured { .. })
        ));
    }

    #[test]
    fn failed_reconfiguration_keeps_last_accepted_profile() {
        let mut adc = SimulatedAdc::default();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());
        let mut delay = NoopDelay::new();
        driver
            .initialize(RegisterProfile::REFERENCE, &mut delay)
            .unwrap();

        driver.interface_mut().probe = Some(0xFF);
        let other = RegisterProfile::new(0x08, 0x0C, 0x10, 0x00);
        assert!(matches!(
            driver.initialize(other, &mut delay),
            Err(Error::DeviceUnresponsive { .. })
        ));
        assert_eq!(driver.profile(), Some(&RegisterProfile::REFERENCE));
    }

    #[test]
    fn warn_only_policy_reports_mismatch_and_configures() {
        let mut adc = SimulatedAdc {
            stuck: Some((0x01, 0x08)),
            ..Default::default()
        };
        let config = Config::new().verify(VerifyPolicy::WarnOnly).build();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), config);

        let report = driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap();

        assert_eq!(
            report.mismatch,
            Some(RegisterMismatch {
                register: 0x01,
                expected: 0x0C,
                actual: 0x08,
            })
        );
        assert_eq!(driver.state(), DeviceState::Configured);
    }

    #[test]
    fn all_ones_probe_aborts_before_any_write() {
        let mut adc = SimulatedAdc {
            probe: Some(0xFF),
            ..Default::default()
        };
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());

        let err = driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap_err();

        assert_eq!(
            err,
            Error::DeviceUnresponsive {
                register: REG_CONF0,
                value: 0xFF,
            }
        );
        assert_eq!(driver.state(), DeviceState::Uninitialized);
        assert_eq!(adc.writes, 0);
        assert_eq!(adc.commands, [CMD_RESET, CMD_RREG]);
    }

    #[test]
    fn odd_probe_value_is_only_diagnostic() {
        let mut adc = SimulatedAdc {
            probe: Some(0x3C),
            ..Default::default()
        };
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());

        let report = driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap();
        assert_eq!(report.probe, 0x3C);
        assert_eq!(driver.state(), DeviceState::Configured);
    }

    #[test]
    fn invalid_config_is_rejected_before_bus_traffic() {
        let mut adc = SimulatedAdc::default();
        let config = Config::new().reference_voltage(-1.0).build();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), config);

        let err = driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(adc.commands.is_empty());
    }

    #[test]
    fn acquire_requires_configuration() {
        let mut adc = SimulatedAdc::default();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());

        let err = driver.acquire(&mut NoopDelay::new()).unwrap_err();
        assert_eq!(
            err,
            Error::NotConfigured {
                state: DeviceState::Uninitialized
            }
        );
        assert!(adc.commands.is_empty());
    }

    #[test]
    fn acquire_converts_and_returns_to_configured() {
        let mut adc = SimulatedAdc {
            sample: [0x40, 0x00, 0x00],
            ..Default::default()
        };
        let mut driver = configured(&mut adc);

        let reading = driver.acquire(&mut NoopDelay::new()).unwrap();

        assert_eq!(reading.raw, 1 << 22);
        assert!((reading.voltage - (1.024 + 0.002_24)).abs() < 1e-12);
        assert_eq!(reading.gain, Gain::X1);
        assert_eq!(driver.state(), DeviceState::Configured);
        assert_eq!(adc.commands[STARTUP_SEQUENCE.len()..], [CMD_START, CMD_RDATA]);
    }

    #[test]
    fn negative_codes_convert_to_negative_volts() {
        let mut adc = SimulatedAdc {
            sample: [0xFF, 0xFF, 0xFF],
            ..Default::default()
        };
        let config = Config::new().calibration_offset(0.0).build();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), config);
        driver
            .initialize(RegisterProfile::REFERENCE, &mut NoopDelay::new())
            .unwrap();

        let reading = driver.acquire(&mut NoopDelay::new()).unwrap();
        assert_eq!(reading.raw, -1);
        assert_eq!(reading.voltage, -2.048 / 8_388_608.0);
    }

    #[test]
    fn drdy_timeout_faults_until_reinitialized() {
        let mut adc = SimulatedAdc::default();
        let config = Config::new().drdy_timeout_ms(5).build();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::stuck_high(), config);
        let mut delay = NoopDelay::new();
        driver
            .initialize(RegisterProfile::REFERENCE, &mut delay)
            .unwrap();

        let err = driver.acquire(&mut delay).unwrap_err();
        assert_eq!(
            err,
            Error::DrdyTimeout {
                polls: 5,
                elapsed_us: 5_000
            }
        );
        assert_eq!(driver.state(), DeviceState::Faulted);

        let err = driver.acquire(&mut delay).unwrap_err();
        assert_eq!(
            err,
            Error::NotConfigured {
                state: DeviceState::Faulted
            }
        );

        driver.reinitialize(&mut delay).unwrap();
        assert_eq!(driver.state(), DeviceState::Configured);
    }

    #[test]
    fn reinitialize_without_profile_is_a_sequencing_error() {
        let mut adc = SimulatedAdc::default();
        let mut driver = Ads1220::new(&mut adc, DrdyLine::ready(), Config::default());

        let err = driver.reinitialize(&mut NoopDelay::new()).unwrap_err();
        assert!(matches!(err, Error::NotConfigured { .. }));
    }

    #[test]
    fn drdy_pin_error_faults_the_device() {
        let mut adc = SimulatedAdc::default();
        let mut driver = configured(&mut adc);
        driver.drdy.broken = true;

        let err = driver.acquire(&mut NoopDelay::new()).unwrap_err();
        assert_eq!(err, Error::Pin(PinFault));
        assert_eq!(driver.state(), DeviceState::Faulted);
        assert!(matches!(
            driver.acquire(&mut NoopDelay::new()),
            Err(Error::NotConfigured {
                state: DeviceState::Faulted
            })
        ));
    }

    #[test]
    fn bus_error_faults_the_device() {
        let mut adc = SimulatedAdc {
            fail_on: Some(CMD_START),
            ..Default::default()
        };
        let mut driver = configured(&mut adc);

        let err = driver.acquire(&mut NoopDelay::new()).unwrap_err();
        assert_eq!(err, Error::Interface(BusFault));
        assert_eq!(driver.state(), DeviceState::Faulted);
    }

    #[test]
    fn progress_callback_sees_long_waits() {
        let mut adc = SimulatedAdc::default();
        let mut driver = Ads1220::new(
            &mut adc,
            DrdyLine::after(1_500),
            Config::default(),
        );
        let mut delay = NoopDelay::new();
        driver
            .initialize(RegisterProfile::REFERENCE, &mut delay)
            .unwrap();

        let mut events = 0;
        driver
            .acquire_with_progress(&mut delay, |progress| {
                assert_eq!(progress.polls, 1_000);
                events += 1;
            })
            .unwrap();
        assert_eq!(events, 1);
    }

    #[test]
    fn acquire_record_stamps_reading() {
        let mut adc = SimulatedAdc {
            sample: [0x00, 0x00, 0x05],
            ..Default::default()
        };
        let mut driver = configured(&mut adc);
        let mut clock = FixedClock(Timestamp::new(2025, 1, 31, 23, 59, 58));

        let record = driver
            .acquire_record(&mut NoopDelay::new(), &mut clock)
            .unwrap();

        assert_eq!(record.timestamp, Timestamp::new(2025, 1, 31, 23, 59, 58));
        assert_eq!(record.reading.raw, 5);
        assert!(record.to_string().starts_with("31/01/25 - 23:59:58 ; 101 ; 0.002241 ; 1"));
    }

    #[test]
    fn record_with_progress_reports_long_waits() {
        let mut adc = SimulatedAdc {
            sample: [0x00, 0x00, 0x05],
            ..Default::default()
        };
        let mut driver = Ads1220::new(&mut adc, DrdyLine::after(1_900), Config::default());
        let mut delay = NoopDelay::new();
        driver
            .initialize(RegisterProfile::REFERENCE, &mut delay)
            .unwrap();
        let mut clock = FixedClock(Timestamp::new(2025, 6, 1, 8, 0, 0));

        let mut waited_ms = Vec::new();
        let record = driver
            .acquire_record_with_progress(&mut delay, &mut clock, |progress| {
                waited_ms.push(progress.elapsed_us / 1_000)
            })
            .unwrap();

        assert_eq!(waited_ms, [1_000]);
        assert_eq!(record.reading.raw, 5);
        assert_eq!(record.timestamp, Timestamp::new(2025, 6, 1, 8, 0, 0));
    }

    #[test]
    fn power_down_keeps_configuration() {
        let mut adc = SimulatedAdc::default();
        let mut driver = configured(&mut adc);

        driver.power_down().unwrap();
        assert_eq!(driver.state(), DeviceState::Configured);
        assert_eq!(adc.commands.last(), Some(&CMD_POWERDOWN));
    }

    #[test]
    fn reset_drops_back_to_uninitialized() {
        let mut adc = SimulatedAdc::default();
        let mut driver = configured(&mut adc);

        driver.reset(&mut NoopDelay::new()).unwrap();
        assert_eq!(driver.state(), DeviceState::Uninitialized);
    }

    fn exchange(out: &[u8], response: &[u8]) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(out.to_vec(), response.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    /// Full startup and one sample at the SPI wire level.
    #[test]
    fn spi_wire_sequence_for_one_sample() {
        let frames: [(&[u8], &[u8]); 12] = [
            (&[0x06], &[0x00]),
            (&[0x20, 0x00], &[0x00, 0x00]),
            (&[0x40, 0x00], &[0x00, 0x00]),
            (&[0x44, 0x0C], &[0x00, 0x00]),
            (&[0x48, 0x10], &[0x00, 0x00]),
            (&[0x4C, 0x00], &[0x00, 0x00]),
            (&[0x20, 0x00], &[0x00, 0x00]),
            (&[0x24, 0x00], &[0x00, 0x0C]),
            (&[0x28, 0x00], &[0x00, 0x10]),
            (&[0x2C, 0x00], &[0x00, 0x00]),
            (&[0x08], &[0x00]),
            (&[0x10, 0x00, 0x00, 0x00], &[0x00, 0x80, 0x00, 0x00]),
        ];
        let expectations: Vec<SpiTransaction<u8>> = frames
            .iter()
            .flat_map(|(out, response)| exchange(out, response))
            .collect();
        let spi = SpiMock::new(&expectations);

        let pin_expectations = [
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ];
        let pin = PinMock::new(&pin_expectations);

        let config = Config::new().calibration_offset(0.0).build();
        let mut driver = Ads1220::new_spi(spi, pin, config);
        let mut delay = NoopDelay::new();

        driver
            .initialize(RegisterProfile::REFERENCE, &mut delay)
            .unwrap();
        let reading = driver.acquire(&mut delay).unwrap();
        assert_eq!(reading.raw, -8_388_608);
        assert_eq!(reading.voltage, -2.048);

        let (mut spi, mut pin, _) = driver.release_spi();
        spi.done();
        pin.done();
    }
}
