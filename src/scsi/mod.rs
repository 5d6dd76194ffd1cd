/*!
All things SCSI: command descriptor blocks and the `SG_IO` transport that
carries them.

CDB constructors here are pure and perform no I/O; pair one with a
[`Task`](struct.Task.html) and feed it to [`execute`](fn.execute.html) to
actually talk to a device.
*/

mod linux;
pub use self::linux::execute;

use std::io;

/// Sense buffer size for every command this crate issues.
pub const SENSE_LEN: usize = 32;

/// Fixed per-command timeout, in milliseconds. If the device blows through it,
/// the transport reports an ordinary I/O failure; there is no cancellation.
pub const COMMAND_TIMEOUT_MS: u32 = 30 * 1000;

quick_error! {
	#[derive(Debug)]
	pub enum Error {
		/// The transport ioctl itself failed (and not with the v4-unsupported signal).
		Io(err: io::Error) {
			from()
			display("transport error: {}", err)
			cause(err)
		}
		/// The transport call returned success, but one of the status fields did not read zero.
		DeviceStatus(device: u32, transport: u32, driver: u32) {
			display("command failed: device status {:#x}, transport status {:#x}, driver status {:#x}", device, transport, driver)
		}
		/// Pass-through completed without the ATA status return descriptor in the sense data.
		AtaSense {
			display("no ATA status return descriptor in sense data")
		}
	}
}

/// How to tell a completed command from a failed one.
///
/// Pass-through commands signal ATA-level failure *through* the sense data, not
/// through the transport return code; plain SCSI commands are the other way
/// around. Getting this wrong turns quiet command failures into garbage data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
	/// Sense data must carry the fixed ATA status return descriptor
	/// (descriptor-format sense 0x72, descriptor type 0x09, length 0x0c).
	AtaSense,
	/// Device, transport and driver status must all read zero.
	ZeroStatus,
}

/// One ready-to-issue command: an immutable CDB plus what the transport needs
/// to know about it. Built per call, discarded after use.
#[derive(Debug, Clone, Copy)]
pub struct Task<'a> {
	pub cdb: &'a [u8],
	pub completion: Completion,
	pub timeout_ms: u32,
}

impl<'a> Task<'a> {
	pub fn new(cdb: &'a [u8], completion: Completion) -> Self {
		Task {
			cdb,
			completion,
			timeout_ms: COMMAND_TIMEOUT_MS,
		}
	}
}

/// INQUIRY (SPC-4, section 6.4); `alloc` is the allocation length, i.e. the
/// size of the response buffer.
pub fn inquiry(alloc: u16) -> [u8; 6] {
	[
		0x12, // opcode: INQUIRY
		0, // EVPD off: standard inquiry data
		0, // page code
		(alloc >> 8) as u8,
		(alloc & 0xff) as u8,
		0, // control
	]
}

/// ATA PASS-THROUGH (12) carrying IDENTIFY DEVICE, per T10/04-262r8.
///
/// Never issue this blindly: the opcode doubles as MMC's BLANK, see
/// [`ata::classify`](../ata/fn.classify.html).
pub fn identify_device() -> [u8; 12] {
	[
		0xa1, // opcode: 12 byte pass through
		4 << 1, // protocol: PIO data-in
		0x2e, // OFF_LINE=0, CK_COND=1, T_DIR=1, BYT_BLOK=1, T_LENGTH=2
		0, // features
		1, // sectors
		0, // lba low
		0, // lba mid
		0, // lba high
		0, // select
		0xec, // command: ATA IDENTIFY DEVICE
		0, // reserved
		0, // control
	]
}

/// ATA PASS-THROUGH (16) carrying IDENTIFY PACKET DEVICE, per T10/04-262r8.
pub fn identify_packet_device() -> [u8; 16] {
	[
		0x85, // opcode: 16 byte pass through
		4 << 1, // protocol: PIO data-in
		0x2e, // OFF_LINE=0, CK_COND=1, T_DIR=1, BYT_BLOK=1, T_LENGTH=2
		0, 0, // features
		0, 1, // sectors
		0, 0, // lba low
		0, 0, // lba mid
		0, 0, // lba high
		0, // device
		0xa1, // command: ATA IDENTIFY PACKET DEVICE
		0, // control
	]
}
