/*!
ATA identity acquisition: classify the device with INQUIRY, pull the 512-byte
IDENTIFY (PACKET) DEVICE buffer through SCSI pass-through, and normalize it for
the [decoder](data/id/index.html).

The strictly-ordered sequence per device is: INQUIRY, then exactly one
pass-through IDENTIFY. Everything is local to the call; identifying several
devices from independent threads is fine as long as each holds its own handle.
*/

pub mod data;
pub mod linux;

use byteorder::{ByteOrder, LittleEndian};

use device::Device;
use scsi::{self, Completion, Task};

quick_error! {
	#[derive(Debug)]
	pub enum Error {
		Scsi(err: scsi::Error) {
			from()
			display("{}", err)
			cause(err)
		}
		/// Transport reported success but the device handed back 512 NUL bytes.
		EmptyIdentity {
			display("device returned no IDENTIFY data")
		}
		/// INQUIRY revealed a peripheral device type we refuse to probe.
		UnsupportedClass(class: u8) {
			display("unsupported peripheral device type {:#04x}", class)
		}
	}
}

/// Peripheral device types we are willing to send an ATA pass-through to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
	/// Direct-access block device (SCSI type 0x00): gets IDENTIFY DEVICE.
	Direct,
	/// CD/DVD-class device (SCSI type 0x05): gets IDENTIFY PACKET DEVICE.
	Packet,
}

fn class_of(peripheral_device_type: u8) -> Result<Class, Error> {
	match peripheral_device_type {
		0x00 => Ok(Class::Direct),
		0x05 => Ok(Class::Packet),
		ty => Err(Error::UnsupportedClass(ty)),
	}
}

/**
Issues INQUIRY and picks the identify path from the peripheral device type.

Why bother, instead of firing IDENTIFY straight away? ATA PASS-THROUGH (12)
shares its opcode (0xa1) with MMC's BLANK: sent to an ATAPI burner that is not
hiding behind libata's SCSI emulation, "identify" could start erasing media.
Only the two verified classes are ever probed; everything else is rejected
here, before any pass-through goes out. The INQUIRY also proves the device
speaks SCSI at all.
*/
pub fn classify(dev: &Device) -> Result<Class, Error> {
	let mut resp = [0u8; 36];
	let cdb = scsi::inquiry(resp.len() as u16);
	scsi::execute(dev, &Task::new(&cdb, Completion::ZeroStatus), &mut resp)?;

	// SPC-4, section 6.4.2: standard INQUIRY data
	class_of(resp[0] & 0x1f)
}

/**
Runs the full acquisition sequence and returns the raw identify buffer.

Call [`fixup()`](struct.Identify.html#method.fixup) on the result before
decoding it.
*/
pub fn identify(dev: &Device) -> Result<Identify, Error> {
	let class = classify(dev)?;
	debug!("classified as {:?}", class);

	let mut data = [0u8; 512];
	match class {
		Class::Direct => {
			let cdb = scsi::identify_device();
			scsi::execute(dev, &Task::new(&cdb, Completion::AtaSense), &mut data)?;
		},
		Class::Packet => {
			let cdb = scsi::identify_packet_device();
			scsi::execute(dev, &Task::new(&cdb, Completion::AtaSense), &mut data)?;
		},
	}

	// a transport that "succeeds" without filling the buffer identified nothing,
	// and an all-zero buffer would decode into a plausible-looking blank identity
	if all_nul(&data) {
		return Err(Error::EmptyIdentity);
	}

	Ok(Identify::new(data, class == Class::Packet))
}

fn all_nul(data: &[u8]) -> bool {
	data.iter().all(|&b| b == 0)
}

/**
Raw IDENTIFY (PACKET) DEVICE response: 512 bytes, or 256 little-endian words.

ATA orders the bytes of its string fields high-before-low within each word;
[`fixup()`](#method.fixup) swaps them into readable order, in place, exactly
once. Numeric words are read through [`word()`](#method.word), which decodes
the little-endian wire order on any host and needs no fixup at all.
*/
#[derive(Debug, Clone)]
pub struct Identify {
	data: [u8; 512],
	is_packet_device: bool,
	fixed_up: bool,
}

impl Identify {
	/// Wraps a buffer fresh off the wire, string fields still in ATA byte order.
	pub fn new(data: [u8; 512], is_packet_device: bool) -> Self {
		Identify {
			data,
			is_packet_device,
			fixed_up: false,
		}
	}

	/// Wraps a buffer whose string fields are already readable, e.g. one the
	/// kernel swapped for us on the HDIO_GET_IDENTITY path.
	pub fn pre_swapped(data: [u8; 512], is_packet_device: bool) -> Self {
		Identify {
			data,
			is_packet_device,
			fixed_up: true,
		}
	}

	/// Which pass-through path produced this buffer.
	pub fn is_packet_device(&self) -> bool {
		self.is_packet_device
	}

	pub fn is_fixed_up(&self) -> bool {
		self.fixed_up
	}

	/// Word `n` (0..256) of the response, in host order.
	pub fn word(&self, n: usize) -> u16 {
		LittleEndian::read_u16(&self.data[2 * n..])
	}

	/// Raw bytes of a fixed-width field: `len` bytes starting at word `offset_words`.
	pub fn field(&self, offset_words: usize, len: usize) -> &[u8] {
		&self.data[2 * offset_words..2 * offset_words + len]
	}

	/// Swaps the serial (words 10-19), firmware revision (23-26) and model
	/// (27-46) fields into readable byte order, in place.
	///
	/// Must run exactly once per buffer: a second swap would corrupt the fields
	/// again, so calling this twice is a bug in the caller, not a recoverable
	/// condition.
	pub fn fixup(&mut self) {
		assert!(!self.fixed_up, "IDENTIFY string fields swapped twice");

		for &(offset, len) in &[(10, 20), (23, 8), (27, 40)] {
			let swapped = data::id::read_string(&self.data, offset, len);
			self.data[2 * offset..2 * offset + len].copy_from_slice(&swapped);
		}

		self.fixed_up = true;
	}
}
