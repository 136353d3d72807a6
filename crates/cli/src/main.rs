//! hidpp-receiver CLI: resolve the device paired to a Logitech wireless receiver.

use std::ffi::CString;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hidpp_receiver_core::comm::ErrorClass;
use hidpp_receiver_core::config::ProbeConfig;
use hidpp_receiver_core::device::{self, DeviceRecord};
use hidpp_receiver_core::error::{Error, IoOp};
use hidpp_receiver_core::hidpp::{ReportType, FRAME_SIZE};
use hidpp_receiver_core::transport::HidTransport;

struct CliHidTransport {
    device: hidapi::HidDevice,
    read_timeout_ms: i32,
}

impl CliHidTransport {
    /// Open `path`, or the HID++ interface of the first discovered receiver.
    fn open(config: &ProbeConfig) -> Result<(Self, DeviceRecord)> {
        let api = hidapi::HidApi::new().map_err(|e| Error::Hid(format!("hidapi init: {e}")))?;

        let path = match &config.path {
            Some(path) => path.clone(),
            None => {
                let receivers = device::discover_receivers()?;
                let first = with_hint(device::first_receiver(&receivers))?;
                first.path.clone()
            }
        };

        let c_path = CString::new(path.as_str())?;
        let hid_device = api
            .open_path(&c_path)
            .map_err(|e| device::open_error(&path, &e.to_string()))
            .map_err(|e| hint(&e))?;

        let info = hid_device
            .get_device_info()
            .map_err(|e| Error::Hid(format!("device info {path}: {e}")))?;
        let record = DeviceRecord::from_usb(
            info.vendor_id(),
            info.product_id(),
            &path,
            info.product_string(),
        );

        tracing::debug!(
            path = %record.path,
            pid = format_args!("0x{:04X}", record.product_id),
            "Opened receiver"
        );
        Ok((
            Self {
                device: hid_device,
                read_timeout_ms: config.read_timeout_ms,
            },
            record,
        ))
    }
}

fn hid_io_error(op: IoOp, err: hidapi::HidError) -> Error {
    match err {
        hidapi::HidError::IoError { error } => Error::io(op, error),
        other => Error::io(op, std::io::Error::other(other.to_string())),
    }
}

impl HidTransport for CliHidTransport {
    fn write_report(&self, data: &[u8]) -> hidpp_receiver_core::error::Result<()> {
        self.device
            .write(data)
            .map_err(|e| hid_io_error(IoOp::Write, e))?;
        Ok(())
    }

    fn read_report(&self, expected: ReportType) -> hidpp_receiver_core::error::Result<Vec<u8>> {
        let mut response = [0u8; FRAME_SIZE];
        let n = self
            .device
            .read_timeout(&mut response, self.read_timeout_ms)
            .map_err(|e| hid_io_error(IoOp::Read, e))?;

        if n == 0 {
            return Err(Error::Timeout(format!(
                "hid_read timed out after {}ms",
                self.read_timeout_ms
            )));
        }

        tracing::trace!(expected = ?expected, len = n, "hid_read");
        Ok(response[..n].to_vec())
    }
}

#[derive(Parser)]
#[command(
    name = "hidpp-receiver",
    version,
    about = "Resolve the real identity of a device behind a Logitech receiver"
)]
struct Cli {
    /// hidraw device path to open instead of the first discovered receiver.
    #[arg(long, global = true)]
    path: Option<String>,
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected Logitech receivers.
    ListReceivers,
    /// Print the wireless product ID of the first paired device.
    RealId,
    /// Print the name of the first paired device.
    RealName,
    /// Resolve and print the paired device's identity.
    Probe {
        /// Print the device record as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn load_config(cli: &Cli) -> Result<ProbeConfig> {
    let mut config = match &cli.config {
        Some(path) => ProbeConfig::load(path)?,
        None => ProbeConfig::default(),
    };
    if cli.path.is_some() {
        config.path = cli.path.clone();
    }
    Ok(config)
}

fn hint(err: &Error) -> anyhow::Error {
    anyhow::anyhow!("{err} ({})", ErrorClass::classify(err).hint())
}

fn with_hint<T>(result: hidpp_receiver_core::error::Result<T>) -> Result<T> {
    result.map_err(|e| hint(&e))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::ListReceivers => {
            let receivers = device::discover_receivers()?;
            if receivers.is_empty() {
                println!("No Logitech receivers found.");
                println!("Ensure the receiver is plugged in and hidraw access is set up.");
            } else {
                for r in &receivers {
                    println!(
                        "{} (VID: 0x{:04X}, PID: 0x{:04X}, interface: {}, HID++: {}, path: {})",
                        r.model.name(),
                        r.vid,
                        r.pid,
                        r.interface_number,
                        if r.is_hidpp_interface() { "yes" } else { "no" },
                        r.path
                    );
                }
            }
        }
        Commands::RealId => {
            let (transport, _) = CliHidTransport::open(&config)?;
            let id = with_hint(hidpp_receiver_core::identity::read_real_id(&transport))?;
            println!("Real device ID: 0x{id:04X}");
        }
        Commands::RealName => {
            let (transport, _) = CliHidTransport::open(&config)?;
            let name = with_hint(hidpp_receiver_core::identity::read_real_name(&transport))?;
            println!("Real device name: {name}");
        }
        Commands::Probe { json } => {
            let (transport, mut record) = CliHidTransport::open(&config)?;
            with_hint(hidpp_receiver_core::probe::extended_probe(
                &transport,
                &mut record,
            ))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!(
                    "{} (VID: 0x{:04X}, PID: 0x{:04X}, path: {})",
                    record.name, record.vid, record.product_id, record.path
                );
            }
        }
    }

    Ok(())
}
