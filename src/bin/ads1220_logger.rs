//! Streams calibrated ADS1220 readings from a Raspberry Pi.
//!
//! Wiring: SPI0 with CE0 as chip select, DRDY on BCM GPIO 22. One record per
//! second is printed to stdout; diagnostics go to stderr.

use std::thread;
use std::time::Duration;

use ads1220::{
    Ads1220, Clock, Config, DeviceState, DrdyProgress, InitReport, RegisterProfile, Timestamp,
};
use anyhow::Context;
use chrono::{Datelike, Local, Timelike};
use rppal::gpio::Gpio;
use rppal::hal::Delay;
use rppal::spi::{Bus, Mode, SimpleHalSpiDevice, SlaveSelect, Spi};

const DRDY_PIN: u8 = 22;
const SPI_CLOCK_HZ: u32 = 1_000_000;
const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

struct LocalClock;

impl Clock for LocalClock {
    fn now(&mut self) -> Timestamp {
        let now = Local::now();
        Timestamp::new(
            u16::try_from(now.year()).unwrap_or_default(),
            now.month() as u8,
            now.day() as u8,
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
        )
    }
}

fn print_report(profile: &RegisterProfile, report: &InitReport) {
    eprintln!("[DEBUG] CONF0 before configuration: 0x{:02X} (expected 0x00)", report.probe);
    for ((register, expected), (_, actual)) in profile.iter().zip(report.readback.iter()) {
        eprintln!("[DEBUG] CONF{register}: wrote 0x{expected:02X}, read back 0x{actual:02X}");
    }
    if let Some(mismatch) = report.mismatch {
        eprintln!(
            "[WARN] CONF{} read back 0x{:02X} instead of 0x{:02X}",
            mismatch.register, mismatch.actual, mismatch.expected
        );
    }
}

fn print_progress(progress: DrdyProgress) {
    eprintln!("[DEBUG] still waiting for DRDY ({} ms)", progress.elapsed_us / 1_000);
}

fn main() -> Result<(), anyhow::Error> {
    eprintln!("[DEBUG] GPIO initialization (DRDY on GPIO {DRDY_PIN})");
    let drdy = Gpio::new()
        .context("failed to open GPIO")?
        .get(DRDY_PIN)
        .with_context(|| format!("failed to claim GPIO {DRDY_PIN}"))?
        .into_input();

    eprintln!("[DEBUG] SPI initialization (bus=0, device=0, speed={SPI_CLOCK_HZ} Hz)");
    // The ADS1220 samples on the falling SCLK edge: mode 1.
    let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode1)
        .context("failed to open SPI")?;

    // Bus and GPIO handles are owned by the driver and released when it drops,
    // including on every early return below.
    let mut adc = Ads1220::new_spi(SimpleHalSpiDevice::new(spi), drdy, Config::default());
    let mut delay = Delay::new();
    let mut clock = LocalClock;

    let profile = RegisterProfile::REFERENCE;
    let report = adc
        .initialize(profile, &mut delay)
        .context("ADS1220 initialization failed")?;
    print_report(&profile, &report);

    loop {
        match adc.acquire_record_with_progress(&mut delay, &mut clock, print_progress) {
            Ok(record) => println!("{record}"),
            Err(err) => {
                eprintln!("[ERROR] sample abandoned: {err}");
                if adc.state() == DeviceState::Faulted {
                    eprintln!("[DEBUG] re-initializing after fault");
                    let report = adc
                        .reinitialize(&mut delay)
                        .context("ADS1220 re-initialization failed")?;
                    print_report(&profile, &report);
                }
            }
        }

        thread::sleep(SAMPLE_PERIOD);
    }
}
