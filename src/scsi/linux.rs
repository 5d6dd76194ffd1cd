use libc::{c_int, c_uchar, c_uint, c_ushort, c_void};

use libc::ioctl;
use libc::EINVAL;
use std::ptr;

#[cfg(not(any(target_env = "musl")))]
use libc::c_ulong;

use std::os::unix::io::AsRawFd;

use device::Device;
use super::{Completion, Error, Task, SENSE_LEN};

// see scsi/sg.h

#[cfg(not(any(target_env = "musl")))]
const SG_IO: c_ulong = 0x2285;

#[cfg(any(target_env = "musl"))]
const SG_IO: c_int = 0x2285;

const SG_DXFER_FROM_DEV: c_int = -3;

// see linux/bsg.h
const BSG_PROTOCOL_SCSI: u32 = 0;
const BSG_SUB_PROTOCOL_SCSI_CMD: u32 = 0;

/// sg v4 envelope (linux/bsg.h). Pointers travel as u64 regardless of the
/// platform word size, which is why this can derive Default while
/// [`sg_io_hdr`](struct.sg_io_hdr.html) cannot.
#[repr(C)]
#[derive(Debug, Default)]
#[allow(non_camel_case_types)]
struct sg_io_v4 {
	guard:	i32,	// [i] 'Q' to differentiate from v3
	protocol:	u32,	// [i] 0 -> SCSI
	subprotocol:	u32,	// [i] 0 -> SCSI command

	request_len:	u32,	// [i] cdb length
	request:	u64,	// [i] cdb pointer
	request_tag:	u64,
	request_attr:	u32,
	request_priority:	u32,
	request_extra:	u32,
	max_response_len:	u32,	// [i] sense buffer length
	response:	u64,	// [i] sense buffer pointer

	dout_iovec_count:	u32,
	dout_xfer_len:	u32,
	din_iovec_count:	u32,
	din_xfer_len:	u32,	// [i] bytes to be transferred from device
	dout_xferp:	u64,
	din_xferp:	u64,	// [i] data buffer pointer

	timeout:	u32,	// [i] milliseconds
	flags:	u32,
	usr_ptr:	u64,
	spare_in:	u32,

	driver_status:	u32,	// [o] 0 -> ok
	transport_status:	u32,	// [o] 0 -> ok
	device_status:	u32,	// [o] SCSI command completion status
	retry_delay:	u32,
	info:	u32,
	duration:	u32,
	response_len:	u32,	// [o] sense bytes actually written
	din_resid:	i32,
	dout_resid:	i32,
	generated_tag:	u64,
	spare_out:	u32,

	padding:	u32,
}

/// sg v3 envelope (scsi/sg.h), the one every kernel understands.
#[repr(C)]
#[derive(Debug)]
#[allow(non_camel_case_types)]
struct sg_io_hdr {
	interface_id:	c_int,	// [i] 'S' for SCSI generic (required)
	dxfer_direction:	c_int,	// [i] data transfer direction
	cmd_len:	c_uchar,	// [i] SCSI command length ( <= 16 bytes)
	mx_sb_len:	c_uchar,	// [i] max length to write to sbp
	iovec_count:	c_ushort,	// [i] 0 implies no scatter gather
	dxfer_len:	c_uint,	// [i] byte count of data transfer
	dxferp:	*mut c_void,	// [i], [*io] points to data transfer memory
	cmdp:	*const c_uchar,	// [i], [*i] points to command to perform
	sbp:	*mut c_uchar,	// [i], [*o] points to sense_buffer memory
	timeout:	c_uint,	// [i] MAX_UINT->no timeout (unit: millisec)
	flags:	c_uint,	// [i] 0 -> default
	pack_id:	c_int,	// [i->o] unused internally (normally)
	usr_ptr:	*mut c_void,	// [i->o] unused internally
	status:	c_uchar,	// [o] scsi status
	masked_status:	c_uchar,	// [o] shifted, masked scsi status
	msg_status:	c_uchar,	// [o] messaging level data (optional)
	sb_len_wr:	c_uchar,	// [o] byte count actually written to sbp
	host_status:	c_ushort,	// [o] errors from host adapter
	driver_status:	c_ushort,	// [o] errors from software driver
	resid:	c_int,	// [o] dxfer_len - actual_transferred
	duration:	c_uint,	// [o] time taken by cmd (unit: millisec)
	info:	c_uint,	// [o] auxiliary information
}

/// Two-arm outcome of an sg v4 attempt. `Unsupported` is the one and only
/// signal that triggers the v3 fallback; it never reaches the caller.
#[derive(Debug)]
enum V4Outcome {
	Supported(sg_io_v4),
	Unsupported,
}

/**
Executes `task` against `dev`, reading the response into `data`.

The command goes out through the sg v4 (bsg) transport first; if the driver
rejects the v4 ABI outright, the identical CDB is reissued once through the
older v3 transport. Any other failure, from either transport, is propagated
without retry.

Completion is validated per [`Task::completion`](struct.Task.html): a zero
return from the ioctl alone proves nothing.
*/
pub fn execute(dev: &Device, task: &Task, data: &mut [u8]) -> Result<(), Error> {
	let fd = dev.file.as_raw_fd();
	let mut sense = [0u8; SENSE_LEN];

	match execute_v4(fd, task, data, &mut sense)? {
		V4Outcome::Supported(io_v4) => match task.completion {
			Completion::AtaSense => check_ata_sense(&sense),
			Completion::ZeroStatus => check_statuses(
				io_v4.device_status,
				io_v4.transport_status,
				io_v4.driver_status,
			),
		},
		V4Outcome::Unsupported => {
			debug!("driver does not speak sg v4, falling back to v3");
			let hdr = execute_v3(fd, task, data, &mut sense)?;
			match task.completion {
				Completion::AtaSense => check_ata_sense(&sense),
				Completion::ZeroStatus => check_statuses(
					hdr.status as u32,
					hdr.host_status as u32,
					hdr.driver_status as u32,
				),
			}
		},
	}
}

fn execute_v4(fd: c_int, task: &Task, data: &mut [u8], sense: &mut [u8]) -> Result<V4Outcome, Error> {
	let mut io_v4 = sg_io_v4 {
		guard: 'Q' as i32,
		protocol: BSG_PROTOCOL_SCSI,
		subprotocol: BSG_SUB_PROTOCOL_SCSI_CMD,

		request_len: task.cdb.len() as u32,
		request: task.cdb.as_ptr() as usize as u64,

		max_response_len: sense.len() as u32,
		response: sense.as_mut_ptr() as usize as u64,

		din_xfer_len: data.len() as u32,
		din_xferp: data.as_mut_ptr() as usize as u64,

		timeout: task.timeout_ms,

		..Default::default()
	};

	unsafe {
		if ioctl(fd, SG_IO, &mut io_v4) == -1 {
			let err = ::std::io::Error::last_os_error();
			// EINVAL here means the driver does not do version 4 at all
			if err.raw_os_error() == Some(EINVAL) {
				return Ok(V4Outcome::Unsupported);
			}
			return Err(err.into());
		}
	}

	Ok(V4Outcome::Supported(io_v4))
}

fn execute_v3(fd: c_int, task: &Task, data: &mut [u8], sense: &mut [u8]) -> Result<sg_io_hdr, Error> {
	let mut hdr = sg_io_hdr {
		interface_id: 'S' as c_int,

		dxfer_direction: SG_DXFER_FROM_DEV,
		dxferp: data.as_mut_ptr() as *mut c_void,
		dxfer_len: data.len() as c_uint,
		resid: 0,

		sbp: sense.as_mut_ptr(),
		mx_sb_len: sense.len() as c_uchar,
		sb_len_wr: 0,

		cmdp: task.cdb.as_ptr(),
		cmd_len: task.cdb.len() as c_uchar,

		status: 0,
		host_status: 0,
		driver_status: 0,

		timeout: task.timeout_ms,
		duration: 0,

		iovec_count: 0,
		flags: 0,
		pack_id: 0,
		usr_ptr: ptr::null_mut(),
		masked_status: 0,
		msg_status: 0,
		info: 0,
	};

	unsafe {
		if ioctl(fd, SG_IO, &mut hdr) == -1 {
			return Err(::std::io::Error::last_os_error().into());
		}
	}

	Ok(hdr)
}

fn check_statuses(device: u32, transport: u32, driver: u32) -> Result<(), Error> {
	if device == 0 && transport == 0 && driver == 0 {
		Ok(())
	} else {
		Err(Error::DeviceStatus(device, transport, driver))
	}
}

/// Per T10/04-262r8, a pass-through command that actually completed hands back
/// descriptor-format sense (response code 0x72) carrying the ATA status return
/// descriptor: type 0x09, length 0x0c, at offset 8. Anything else means the
/// embedded ATA command went nowhere, no matter what the ioctl returned.
fn check_ata_sense(sense: &[u8]) -> Result<(), Error> {
	if sense[0] == 0x72 && sense[8] == 0x09 && sense[9] == 0x0c {
		Ok(())
	} else {
		Err(Error::AtaSense)
	}
}
