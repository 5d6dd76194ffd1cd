use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use libc;

/// See [parent module docs](../index.html)
#[derive(Debug)]
pub struct Device {
	pub file: File,
}

impl Device {
	/// Opens a device node read-only.
	///
	/// `O_NONBLOCK` keeps the open from hanging on removable drives with no
	/// medium inserted; none of the commands this crate issues transfer user
	/// data, so blocking I/O semantics are never needed.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
		Ok(Device {
			file: OpenOptions::new()
				.read(true)
				.custom_flags(libc::O_NONBLOCK)
				.open(path)?,
		})
	}
}
