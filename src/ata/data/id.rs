/*!
Decoder for the 512-byte IDENTIFY (PACKET) DEVICE buffer.

[`parse_id`](fn.parse_id.html) turns a fixed-up [`Identify`](../../struct.Identify.html)
into an [`Id`](struct.Id.html) in a single pass; [`format_export`](fn.format_export.html)
and [`format_export_mdev`](fn.format_export_mdev.html) render it as udev-style
`KEY=VALUE` lines. Bit positions and key names follow ATA8-ACS and the udev
ata_id output format; consumers match on them literally, so none of this is
free to drift.
*/

use ata::Identify;
use utils;

/// Reads a string field out of a raw identify buffer: ATA stores the *high*
/// byte of each word first. Pure function of the input bytes.
///
/// `len` is in bytes and must be even.
pub fn read_string(identify: &[u8], offset_words: usize, len: usize) -> Vec<u8> {
	assert!(len % 2 == 0, "string fields span whole words");

	let mut out = Vec::with_capacity(len);
	for w in 0..len / 2 {
		out.push(identify[(offset_words + w) * 2 + 1]);
		out.push(identify[(offset_words + w) * 2]);
	}
	out
}

/// Everything we decode out of an identify buffer. Pure data; lives only as
/// long as one identification attempt needs it.
#[derive(Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize))]
pub struct Id {
	/// Whether the buffer came from IDENTIFY PACKET DEVICE.
	pub is_packet_device: bool,

	/// Words 27-46, whitespace-normalized.
	pub model: String,
	/// The raw model field, devnode-escaped; trailing padding survives as `\x20`.
	pub model_enc: String,
	/// Words 10-19, whitespace-normalized.
	pub serial: String,
	/// Words 23-26, whitespace-normalized.
	pub revision: String,

	/// Word 0, general configuration.
	pub config: u16,
	/// Word 82, command sets supported.
	pub command_set_1: u16,
	/// Word 83, command sets supported.
	pub command_set_2: u16,
	/// Word 85, command sets enabled.
	pub cfs_enable_1: u16,
	/// Word 86, command sets enabled.
	pub cfs_enable_2: u16,
	/// Word 128, security status (the "device lock function").
	pub dlf: u16,
	/// Word 94, automatic acoustic management: vendor-recommended value in the
	/// high byte, current value in the low byte.
	pub acoustic: u16,
	/// Word 91, current advanced power management level.
	pub cur_apm: u16,
	/// Word 89, SECURITY ERASE UNIT completion time, two-minute units.
	pub erase_time: u16,
	/// Word 90, enhanced SECURITY ERASE UNIT completion time, two-minute units.
	pub enhanced_erase_time: u16,
	/// Word 75, queue depth.
	pub queue_depth: u16,
	/// Word 76, SATA capabilities; PATA devices report 0x0000 or 0xffff here.
	pub sata_caps: u16,
	/// Word 217, nominal media rotation rate.
	pub rotation_rate: u16,
	/// Words 108-111, present iff the naming authority nibble reads IEEE (5h).
	pub wwn: Option<u64>,
	/// CompactFlash Attachment, from the device signature or the CFA bit.
	pub cfa: bool,
}

impl Id {
	/// The composed identity: `model_serial`, or just the model for devices
	/// that report no serial number.
	pub fn disk_id(&self) -> String {
		if self.serial.is_empty() {
			self.model.clone()
		} else {
			format!("{}_{}", self.model, self.serial)
		}
	}
}

/// Decodes a fixed-up identify buffer. Single pass, no I/O.
pub fn parse_id(identify: &Identify) -> Id {
	assert!(identify.is_fixed_up(), "parse_id() wants string fields in readable order");

	let word0 = identify.word(0);

	let wwn = if identify.word(108) & 0xf000 == 0x5000 {
		/*
		Words 108-111 contain a mandatory World Wide Name in the NAA IEEE
		Registered identifier format; word 108 bits 15:12 must read 5h (IEEE as
		the naming authority). All other values are reserved, and garbage words
		here are common enough on old drives that the gate is load-bearing.
		*/
		let mut wwn = 0u64;
		for w in 108..112 {
			wwn = wwn << 16 | identify.word(w) as u64;
		}
		Some(wwn)
	} else {
		None
	};

	Id {
		is_packet_device: identify.is_packet_device(),

		model: utils::transfer_id_data(identify.field(27, 40)),
		model_enc: utils::encode_devnode_name(identify.field(27, 40)),
		serial: utils::transfer_id_data(identify.field(10, 20)),
		revision: utils::transfer_id_data(identify.field(23, 8)),

		config: word0,
		command_set_1: identify.word(82),
		command_set_2: identify.word(83),
		cfs_enable_1: identify.word(85),
		cfs_enable_2: identify.word(86),
		dlf: identify.word(128),
		acoustic: identify.word(94),
		cur_apm: identify.word(91),
		erase_time: identify.word(89),
		enhanced_erase_time: identify.word(90),
		queue_depth: identify.word(75),
		sata_caps: identify.word(76),
		rotation_rate: identify.word(217),
		wwn,

		// device signatures from linux/ata.h, or the CFA bit in word 83
		cfa: word0 == 0x848a || word0 == 0x844a
			|| (identify.word(83) & 0xc004) == 0x4004,
	}
}

fn line(out: &mut String, prefix: &str, key: &str, value: &str) {
	out.push_str(prefix);
	out.push_str(key);
	out.push('=');
	out.push_str(value);
	out.push('\n');
}

#[derive(Debug, Clone, Copy)]
enum Reg {
	/// command_set_1 paired with cfs_enable_1 (words 82/85)
	Cs1,
	/// command_set_2 paired with cfs_enable_2 (words 83/86)
	Cs2,
}

/// One feature set: a supported bit, the keys it emits, and an optional
/// emitter for the sets that carry extra values (security, AAM, APM).
struct Feature {
	reg: Reg,
	bit: u16,
	flag: &'static str,
	enabled: Option<&'static str>,
	extra: Option<fn(&Id, &str, &mut String)>,
}

static FEATURES: [Feature; 9] = [
	Feature { reg: Reg::Cs1, bit: 5, flag: "ID_ATA_WRITE_CACHE", enabled: Some("ID_ATA_WRITE_CACHE_ENABLED"), extra: None },
	Feature { reg: Reg::Cs1, bit: 10, flag: "ID_ATA_FEATURE_SET_HPA", enabled: Some("ID_ATA_FEATURE_SET_HPA_ENABLED"), extra: None },
	Feature { reg: Reg::Cs1, bit: 3, flag: "ID_ATA_FEATURE_SET_PM", enabled: Some("ID_ATA_FEATURE_SET_PM_ENABLED"), extra: None },
	Feature { reg: Reg::Cs1, bit: 1, flag: "ID_ATA_FEATURE_SET_SECURITY", enabled: Some("ID_ATA_FEATURE_SET_SECURITY_ENABLED"), extra: Some(security_extras) },
	Feature { reg: Reg::Cs1, bit: 0, flag: "ID_ATA_FEATURE_SET_SMART", enabled: Some("ID_ATA_FEATURE_SET_SMART_ENABLED"), extra: None },
	Feature { reg: Reg::Cs2, bit: 9, flag: "ID_ATA_FEATURE_SET_AAM", enabled: Some("ID_ATA_FEATURE_SET_AAM_ENABLED"), extra: Some(aam_extras) },
	Feature { reg: Reg::Cs2, bit: 5, flag: "ID_ATA_FEATURE_SET_PUIS", enabled: Some("ID_ATA_FEATURE_SET_PUIS_ENABLED"), extra: None },
	Feature { reg: Reg::Cs2, bit: 3, flag: "ID_ATA_FEATURE_SET_APM", enabled: Some("ID_ATA_FEATURE_SET_APM_ENABLED"), extra: Some(apm_extras) },
	// download microcode has no 'enabled' mirror bit
	Feature { reg: Reg::Cs2, bit: 0, flag: "ID_ATA_DOWNLOAD_MICROCODE", enabled: None, extra: None },
];

fn security_extras(id: &Id, prefix: &str, out: &mut String) {
	line(out, prefix, "ID_ATA_FEATURE_SET_SECURITY_ERASE_UNIT_MIN", &(id.erase_time as u32 * 2).to_string());

	if id.cfs_enable_1 & (1 << 1) != 0 {
		// dlf bit 8: master password capability (0 = high, 1 = maximum)
		if id.dlf & (1 << 8) != 0 {
			line(out, prefix, "ID_ATA_FEATURE_SET_SECURITY_LEVEL", "maximum");
		} else {
			line(out, prefix, "ID_ATA_FEATURE_SET_SECURITY_LEVEL", "high");
		}
	}

	if id.dlf & (1 << 5) != 0 {
		line(out, prefix, "ID_ATA_FEATURE_SET_SECURITY_ENHANCED_ERASE_UNIT_MIN", &(id.enhanced_erase_time as u32 * 2).to_string());
	}
	if id.dlf & (1 << 4) != 0 {
		line(out, prefix, "ID_ATA_FEATURE_SET_SECURITY_EXPIRE", "1");
	}
	if id.dlf & (1 << 3) != 0 {
		line(out, prefix, "ID_ATA_FEATURE_SET_SECURITY_FROZEN", "1");
	}
	if id.dlf & (1 << 2) != 0 {
		line(out, prefix, "ID_ATA_FEATURE_SET_SECURITY_LOCKED", "1");
	}
}

fn aam_extras(id: &Id, prefix: &str, out: &mut String) {
	line(out, prefix, "ID_ATA_FEATURE_SET_AAM_VENDOR_RECOMMENDED_VALUE", &(id.acoustic >> 8).to_string());
	line(out, prefix, "ID_ATA_FEATURE_SET_AAM_CURRENT_VALUE", &(id.acoustic & 0xff).to_string());
}

fn apm_extras(id: &Id, prefix: &str, out: &mut String) {
	if id.cfs_enable_2 & (1 << 3) != 0 {
		line(out, prefix, "ID_ATA_FEATURE_SET_APM_CURRENT_VALUE", &(id.cur_apm & 0xff).to_string());
	}
}

/**
Renders the full `--export` key set, one `PREFIX<KEY>=<VALUE>` line each.

Key names, values and ordering reproduce the udev ata_id output; keys for
absent features are omitted entirely rather than emitted as `0`.
*/
pub fn format_export(id: &Id, prefix: &str) -> String {
	let mut out = String::new();

	// the device speaks the ATA protocol at all
	line(&mut out, prefix, "ID_ATA", "1");

	if id.config & (1 << 15) != 0 {
		// ATAPI: bits 8-12 of the config word carry the device type
		line(&mut out, prefix, "ID_TYPE", match (id.config >> 8) & 0x1f {
			0 | 5 => "cd",
			1 => "tape",
			7 => "optical",
			_ => "generic",
		});
	} else {
		line(&mut out, prefix, "ID_TYPE", "disk");
	}

	line(&mut out, prefix, "ID_BUS", "ata");
	line(&mut out, prefix, "ID_MODEL", &id.model);
	line(&mut out, prefix, "ID_MODEL_ENC", &id.model_enc);
	line(&mut out, prefix, "ID_REVISION", &id.revision);
	line(&mut out, prefix, "ID_SERIAL", &id.disk_id());
	if !id.serial.is_empty() {
		line(&mut out, prefix, "ID_SERIAL_SHORT", &id.serial);
	}

	for f in FEATURES.iter() {
		let (supported, enabled) = match f.reg {
			Reg::Cs1 => (id.command_set_1, id.cfs_enable_1),
			Reg::Cs2 => (id.command_set_2, id.cfs_enable_2),
		};
		if supported & (1 << f.bit) == 0 {
			continue;
		}

		line(&mut out, prefix, f.flag, "1");
		if let Some(key) = f.enabled {
			line(&mut out, prefix, key, if enabled & (1 << f.bit) != 0 { "1" } else { "0" });
		}
		if let Some(extra) = f.extra {
			extra(id, prefix, &mut out);
		}
	}

	/*
	A PATA device sets word 76 to 0x0000 or 0xffff; either value means the
	device claims no Serial ATA compliance and words 76-79 shall be ignored.
	Bit 2: Gen2 signaling rate, 3.0 Gb/s; bit 1: Gen1, 1.5 Gb/s (SATA 2.6).
	*/
	if id.sata_caps != 0x0000 && id.sata_caps != 0xffff {
		line(&mut out, prefix, "ID_ATA_SATA", "1");
		if id.sata_caps & (1 << 2) != 0 {
			line(&mut out, prefix, "ID_ATA_SATA_SIGNAL_RATE_GEN2", "1");
		}
		if id.sata_caps & (1 << 1) != 0 {
			line(&mut out, prefix, "ID_ATA_SATA_SIGNAL_RATE_GEN1", "1");
		}
	}

	// word 217: nominal media rotation rate; 1 means non-rotating (SSD &c),
	// 0x0401-0xfffe is a literal RPM figure, the rest is reserved and omitted
	match id.rotation_rate {
		0x0001 => line(&mut out, prefix, "ID_ATA_ROTATION_RATE_RPM", "0"),
		rpm @ 0x0401...0xfffe => line(&mut out, prefix, "ID_ATA_ROTATION_RATE_RPM", &rpm.to_string()),
		_ => (),
	}

	if let Some(wwn) = id.wwn {
		line(&mut out, prefix, "ID_WWN", &format!("{:#x}", wwn));
		// ATA devices have no vendor extension, so both keys carry the same value
		line(&mut out, prefix, "ID_WWN_WITH_EXTENSION", &format!("{:#x}", wwn));
	}

	if id.cfa {
		line(&mut out, prefix, "ID_ATA_CFA", "1");
	}

	out
}

/// Renders the reduced key set for constrained (mdev-style) consumers:
/// `ID_BUS`, the composed `ID_SERIAL`, and the WWN when the device has one.
pub fn format_export_mdev(id: &Id, prefix: &str) -> String {
	let mut out = String::new();

	line(&mut out, prefix, "ID_BUS", "ata");
	line(&mut out, prefix, "ID_SERIAL", &id.disk_id());

	if let Some(wwn) = id.wwn {
		// ATA devices have no vendor extension
		line(&mut out, prefix, "ID_WWN_WITH_EXTENSION", &format!("{:#x}", wwn));
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use ata::Identify;

	fn put_word(data: &mut [u8; 512], n: usize, word: u16) {
		data[2 * n] = word as u8;
		data[2 * n + 1] = (word >> 8) as u8;
	}

	// stores a string field the way a device would: high byte of each word first
	fn put_string(data: &mut [u8; 512], offset_words: usize, s: &[u8]) {
		assert!(s.len() % 2 == 0);
		for (w, pair) in s.chunks(2).enumerate() {
			data[(offset_words + w) * 2] = pair[1];
			data[(offset_words + w) * 2 + 1] = pair[0];
		}
	}

	fn identify_with(words: &[(usize, u16)]) -> Identify {
		let mut data = [0u8; 512];
		put_string(&mut data, 27, b"DISKID TEST DRIVE "); // model
		put_string(&mut data, 10, b"S3RIAL"); // serial
		put_string(&mut data, 23, b"1.0 "); // firmware revision
		for &(n, word) in words {
			put_word(&mut data, n, word);
		}
		let mut identify = Identify::new(data, false);
		identify.fixup();
		identify
	}

	#[test]
	fn read_string_is_pure() {
		let mut data = [0u8; 512];
		put_string(&mut data, 27, b"MODELX");
		let a = read_string(&data, 27, 6);
		let b = read_string(&data, 27, 6);
		assert_eq!(a, b"MODELX".to_vec());
		assert_eq!(a, b);
	}

	#[test]
	fn strings_are_extracted_and_normalized() {
		let id = parse_id(&identify_with(&[]));
		assert_eq!(id.model, "DISKID_TEST_DRIVE");
		assert_eq!(id.serial, "S3RIAL");
		assert_eq!(id.revision, "1.0");
		// the encoded model keeps the raw field, space padding included
		assert_eq!(id.model_enc, "DISKID\\x20TEST\\x20DRIVE\\x20");
	}

	#[test]
	fn serial_composition_splits_back() {
		let id = parse_id(&identify_with(&[]));
		assert_eq!(id.disk_id(), "DISKID_TEST_DRIVE_S3RIAL");

		// with a '_'-free model, splitting at the first '_' recovers both fields
		let mut data = [0u8; 512];
		put_string(&mut data, 27, b"MODELX");
		put_string(&mut data, 10, b"SN0123");
		let mut identify = Identify::new(data, false);
		identify.fixup();
		let id = parse_id(&identify);

		let composed = id.disk_id();
		let mut parts = composed.splitn(2, '_');
		assert_eq!(parts.next(), Some("MODELX"));
		assert_eq!(parts.next(), Some("SN0123"));
	}

	#[test]
	fn missing_serial_leaves_model_alone() {
		let mut data = [0u8; 512];
		put_string(&mut data, 27, b"MODELX");
		let mut identify = Identify::new(data, false);
		identify.fixup();
		let id = parse_id(&identify);

		assert_eq!(id.disk_id(), "MODELX");

		let out = format_export(&id, "");
		assert!(out.contains("ID_SERIAL=MODELX\n"));
		assert!(!out.contains("ID_SERIAL_SHORT"));
	}

	#[test]
	fn device_type_from_config_word() {
		let out = format_export(&parse_id(&identify_with(&[])), "");
		assert!(out.contains("ID_ATA=1\n"));
		assert!(out.contains("ID_TYPE=disk\n"));
		assert!(out.contains("ID_BUS=ata\n"));

		// ATAPI bit set, type 5: CD/DVD
		let out = format_export(&parse_id(&identify_with(&[(0, 0x8500)])), "");
		assert!(out.contains("ID_TYPE=cd\n"));

		let out = format_export(&parse_id(&identify_with(&[(0, 0x8100)])), "");
		assert!(out.contains("ID_TYPE=tape\n"));

		let out = format_export(&parse_id(&identify_with(&[(0, 0x8700)])), "");
		assert!(out.contains("ID_TYPE=optical\n"));

		let out = format_export(&parse_id(&identify_with(&[(0, 0x8300)])), "");
		assert!(out.contains("ID_TYPE=generic\n"));
	}

	#[test]
	fn feature_pairs() {
		// write cache supported but disabled
		let out = format_export(&parse_id(&identify_with(&[(82, 1 << 5)])), "");
		assert!(out.contains("ID_ATA_WRITE_CACHE=1\n"));
		assert!(out.contains("ID_ATA_WRITE_CACHE_ENABLED=0\n"));

		// supported and enabled
		let out = format_export(&parse_id(&identify_with(&[(82, 1 << 5), (85, 1 << 5)])), "");
		assert!(out.contains("ID_ATA_WRITE_CACHE_ENABLED=1\n"));

		// not supported: no lines at all
		let out = format_export(&parse_id(&identify_with(&[])), "");
		assert!(!out.contains("ID_ATA_WRITE_CACHE"));

		// download microcode has no ENABLED counterpart
		let out = format_export(&parse_id(&identify_with(&[(83, 1 << 0)])), "");
		assert!(out.contains("ID_ATA_DOWNLOAD_MICROCODE=1\n"));
		assert!(!out.contains("ID_ATA_DOWNLOAD_MICROCODE_ENABLED"));
	}

	#[test]
	fn security_block() {
		let out = format_export(&parse_id(&identify_with(&[
			(82, 1 << 1),
			(85, 1 << 1),
			(89, 30),
			(90, 15),
			(128, (1 << 8) | (1 << 5) | (1 << 3)),
		])), "");
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY=1\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY_ENABLED=1\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY_ERASE_UNIT_MIN=60\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY_LEVEL=maximum\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY_ENHANCED_ERASE_UNIT_MIN=30\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY_FROZEN=1\n"));
		assert!(!out.contains("ID_ATA_FEATURE_SET_SECURITY_LOCKED"));
		assert!(!out.contains("ID_ATA_FEATURE_SET_SECURITY_EXPIRE"));

		// security supported but disabled: erase time still reported, level is not
		let out = format_export(&parse_id(&identify_with(&[(82, 1 << 1), (89, 30)])), "");
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY_ENABLED=0\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_SECURITY_ERASE_UNIT_MIN=60\n"));
		assert!(!out.contains("ID_ATA_FEATURE_SET_SECURITY_LEVEL"));
	}

	#[test]
	fn aam_and_apm_values() {
		let out = format_export(&parse_id(&identify_with(&[
			(83, (1 << 9) | (1 << 3)),
			(86, (1 << 9) | (1 << 3)),
			(94, 0xfe80),
			(91, 0x00c0),
		])), "");
		assert!(out.contains("ID_ATA_FEATURE_SET_AAM=1\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_AAM_VENDOR_RECOMMENDED_VALUE=254\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_AAM_CURRENT_VALUE=128\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_APM_CURRENT_VALUE=192\n"));

		// APM supported but not enabled: no current value
		let out = format_export(&parse_id(&identify_with(&[(83, 1 << 3), (91, 0x00c0)])), "");
		assert!(out.contains("ID_ATA_FEATURE_SET_APM=1\n"));
		assert!(out.contains("ID_ATA_FEATURE_SET_APM_ENABLED=0\n"));
		assert!(!out.contains("ID_ATA_FEATURE_SET_APM_CURRENT_VALUE"));
	}

	#[test]
	fn sata_flags_gated_on_word_76() {
		for &dead in &[0x0000u16, 0xffff] {
			let out = format_export(&parse_id(&identify_with(&[(76, dead)])), "");
			assert!(!out.contains("ID_ATA_SATA"));
		}

		let out = format_export(&parse_id(&identify_with(&[(76, 1 << 1)])), "");
		assert!(out.contains("ID_ATA_SATA=1\n"));
		assert!(out.contains("ID_ATA_SATA_SIGNAL_RATE_GEN1=1\n"));
		assert!(!out.contains("ID_ATA_SATA_SIGNAL_RATE_GEN2"));

		let out = format_export(&parse_id(&identify_with(&[(76, (1 << 2) | (1 << 1))])), "");
		assert!(out.contains("ID_ATA_SATA_SIGNAL_RATE_GEN2=1\n"));
		assert!(out.contains("ID_ATA_SATA_SIGNAL_RATE_GEN1=1\n"));
	}

	#[test]
	fn rotation_rate() {
		let out = format_export(&parse_id(&identify_with(&[(217, 0x0001)])), "");
		assert!(out.contains("ID_ATA_ROTATION_RATE_RPM=0\n"));

		let out = format_export(&parse_id(&identify_with(&[(217, 0x1388)])), "");
		assert!(out.contains("ID_ATA_ROTATION_RATE_RPM=5000\n"));

		for &reserved in &[0x0000u16, 0xffff, 0x0002, 0x0400] {
			let out = format_export(&parse_id(&identify_with(&[(217, reserved)])), "");
			assert!(!out.contains("ID_ATA_ROTATION_RATE_RPM"));
		}
	}

	#[test]
	fn wwn_requires_ieee_naa() {
		let id = parse_id(&identify_with(&[
			(108, 0x5000),
			(109, 0x1111),
			(110, 0x2222),
			(111, 0x3333),
		]));
		assert_eq!(id.wwn, Some(0x5000_1111_2222_3333));

		let out = format_export(&id, "");
		assert!(out.contains("ID_WWN=0x5000111122223333\n"));
		assert!(out.contains("ID_WWN_WITH_EXTENSION=0x5000111122223333\n"));

		// wrong naming authority: no WWN lines at all
		let id = parse_id(&identify_with(&[(108, 0x1000), (109, 0x1111)]));
		assert_eq!(id.wwn, None);
		let out = format_export(&id, "");
		assert!(!out.contains("ID_WWN"));
	}

	#[test]
	fn cfa_detection() {
		assert!(parse_id(&identify_with(&[(0, 0x848a)])).cfa);
		assert!(parse_id(&identify_with(&[(0, 0x844a)])).cfa);
		assert!(parse_id(&identify_with(&[(83, 0x4004)])).cfa);
		// bit 14 must be set and bit 15 clear for word 83 to count
		assert!(!parse_id(&identify_with(&[(83, 0xc004)])).cfa);
		assert!(!parse_id(&identify_with(&[])).cfa);

		let out = format_export(&parse_id(&identify_with(&[(0, 0x848a)])), "");
		assert!(out.contains("ID_ATA_CFA=1\n"));
	}

	#[test]
	fn mdev_export_is_a_strict_subset() {
		let id = parse_id(&identify_with(&[
			(82, 1 << 5),
			(108, 0x5000),
			(109, 0x1111),
			(110, 0x2222),
			(111, 0x3333),
		]));
		let out = format_export_mdev(&id, "");
		assert_eq!(out, "ID_BUS=ata\n\
			ID_SERIAL=DISKID_TEST_DRIVE_S3RIAL\n\
			ID_WWN_WITH_EXTENSION=0x5000111122223333\n");
	}

	#[test]
	fn prefix_lands_on_every_line() {
		let id = parse_id(&identify_with(&[(82, 1 << 5)]));
		for out in &[format_export(&id, "SDA_"), format_export_mdev(&id, "SDA_")] {
			for l in out.lines() {
				assert!(l.starts_with("SDA_"), "unprefixed line: {}", l);
			}
		}
	}
}
