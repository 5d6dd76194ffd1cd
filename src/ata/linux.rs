use std::os::unix::io::AsRawFd;

use libc::ioctl;
#[cfg(not(any(target_env = "musl")))]
use libc::c_ulong;
#[cfg(any(target_env = "musl"))]
use libc::c_int;

use std::io::Error;

use ata::Identify;
use device::Device;

#[cfg(not(any(target_env = "musl")))]
const HDIO_GET_IDENTITY: c_ulong = 0x030d; // linux/hdreg.h

#[cfg(any(target_env = "musl"))]
const HDIO_GET_IDENTITY: c_int = 0x030d;

/**
Pulls the cached identity struct through the legacy HDIO interface.

This is strictly a last resort for callers whose pass-through acquisition
failed completely: the old IDE layer and some odd drivers answer this ioctl
while rejecting SG_IO. The engine itself never falls back here. The kernel
hands the string fields back already byte-swapped, hence `pre_swapped` — do
not `fixup()` the result.
*/
pub fn hdio_get_identity(dev: &Device) -> Result<Identify, Error> {
	let mut data = [0u8; 512];

	unsafe {
		if ioctl(dev.file.as_raw_fd(), HDIO_GET_IDENTITY, data.as_mut_ptr()) == -1 {
			return Err(Error::last_os_error());
		}
	}

	Ok(Identify::pre_swapped(data, false))
}
