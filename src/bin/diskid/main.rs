#![cfg_attr(feature = "cargo-clippy", allow(print_with_newline))]

extern crate diskid;

use diskid::Device;
use diskid::ata;
use diskid::ata::data::id;

#[macro_use]
extern crate clap;
use clap::{App, Arg};

#[macro_use]
extern crate log;
extern crate env_logger;
use log::LevelFilter;
use env_logger::Builder as LogBuilder;

use std::path::Path;
use std::process::exit;

fn basename(device: &str) -> String {
	Path::new(device)
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| device.to_string())
}

// /dev/sda → "SDA_", used to keep variables apart when several devices are requested
fn var_name_prefix(device: &str) -> String {
	let mut prefix = basename(device).to_uppercase();
	prefix.push('_');
	prefix
}

fn acquire(dev: &Device) -> Result<ata::Identify, ata::Error> {
	let mut identify = match ata::identify(dev) {
		Ok(identify) => identify,
		Err(err) => {
			// last resort: some devices answer the legacy whole-struct ioctl
			// while rejecting SG_IO; that buffer comes back pre-swapped
			info!("pass-through identify failed ({}), trying HDIO_GET_IDENTITY", err);
			return ata::linux::hdio_get_identity(dev)
				// the pass-through error is the interesting one to report
				.map_err(|_| err);
		},
	};
	identify.fixup();
	Ok(identify)
}

fn handle_device(device: &str, export: bool, mdev: bool, multi: bool) -> Result<(), ()> {
	let dev = match Device::open(device) {
		Ok(dev) => dev,
		Err(err) => {
			eprint!("failed to open device '{}': {}\n", device, err);
			return Err(());
		},
	};

	let identify = match acquire(&dev) {
		Ok(identify) => identify,
		Err(err) => {
			eprint!("failed to detect disk type for device '{}': {}\n", device, err);
			return Err(());
		},
	};

	let id = id::parse_id(&identify);

	if export || mdev {
		let prefix = if multi { var_name_prefix(device) } else { String::new() };
		if mdev {
			print!("{}", id::format_export_mdev(&id, &prefix));
		} else {
			print!("{}", id::format_export(&id, &prefix));
		}
	} else if multi {
		print!("{}:{}\n", basename(device), id.disk_id());
	} else {
		print!("{}\n", id.disk_id());
	}

	Ok(())
}

fn main() {
	let args = App::new("diskid")
		.about("reads product/serial number and identity variables from ATA drives")
		.version(crate_version!())
		.arg(Arg::with_name("export")
			.short("x")
			.long("export")
			.help("print environment variables")
		)
		.arg(Arg::with_name("mdev")
			.short("m")
			.long("mdev")
			.help("print the reduced set of environment variables for mdev")
		)
		.arg(Arg::with_name("debug")
			.short("d")
			.multiple(true)
			.help("Verbose output: set once to log actions, twice to also show decisions\ncan also be set through env_logger's RUST_LOG env")
		)
		.arg(Arg::with_name("device")
			.help("Device node(s) to query")
			.required(true)
			.multiple(true)
			.index(1)
		)
		.get_matches();

	let mut log = LogBuilder::new();
	if let Ok(var) = std::env::var("RUST_LOG") {
		log.parse(&var);
	}
	// -d takes precedence over RUST_LOG which some might export globally
	log.filter(Some("diskid"), match args.occurrences_of("debug") {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		_ => LevelFilter::Debug,
	});
	log.init();

	let devices: Vec<&str> = args.values_of("device").unwrap().collect();
	let multi = devices.len() > 1;
	let export = args.is_present("export");
	let mdev = args.is_present("mdev");

	// one broken device must not silence the others
	let mut failed = false;
	for device in &devices {
		if handle_device(device, export, mdev, multi).is_err() {
			failed = true;
		}
	}

	if failed {
		exit(1);
	}
}
