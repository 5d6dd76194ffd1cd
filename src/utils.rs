/*!
String normalization for identity fields, udev-flavoured: identity strings are
consumed as parts of environment variable values, device node names and symlink
targets, so they get scrubbed down to a safe character set while valid UTF-8 is
left intact.

All of this operates on byte slices: identify fields are fixed-width, padded,
and occasionally contain garbage that never was text in the first place.
*/

/// Punctuation that passes through unescaped, besides plain alphanumerics.
const WHITELIST: &'static [u8] = b"#+-.:=@_";

fn is_space(c: u8) -> bool {
	// ASCII isspace(): space, \t \n \v \f \r
	c == b' ' || (c >= 0x09 && c <= 0x0d)
}

fn whitelisted(c: u8, white: Option<&[u8]>) -> bool {
	(c >= b'0' && c <= b'9')
		|| (c >= b'A' && c <= b'Z')
		|| (c >= b'a' && c <= b'z')
		|| WHITELIST.contains(&c)
		|| white.map_or(false, |w| w.contains(&c))
}

fn unicode_valid(ch: u32) -> bool {
	if ch >= 0x11_0000 {
		return false; // end of unicode space
	}
	if ch & 0xffff_f800 == 0xd800 {
		return false; // reserved for UTF-16 surrogates
	}
	if ch >= 0xfdd0 && ch <= 0xfdef {
		return false; // reserved
	}
	if ch & 0xfffe == 0xfffe {
		return false; // byte order mark
	}
	true
}

// count of bytes the lead byte announces
fn utf8_expected_len(c: u8) -> usize {
	if c < 0x80 { 1 }
	else if c & 0xe0 == 0xc0 { 2 }
	else if c & 0xf0 == 0xe0 { 3 }
	else if c & 0xf8 == 0xf0 { 4 }
	else if c & 0xfc == 0xf8 { 5 }
	else if c & 0xfe == 0xfc { 6 }
	else { 0 }
}

// count of bytes needed to encode the codepoint
fn utf8_encoded_len(unichar: u32) -> usize {
	if unichar < 0x80 { 1 }
	else if unichar < 0x800 { 2 }
	else if unichar < 0x1_0000 { 3 }
	else if unichar < 0x20_0000 { 4 }
	else if unichar < 0x400_0000 { 5 }
	else { 6 }
}

/// Length of the single valid encoded sequence at the start of `s`, or `None`
/// if it is malformed, overlong, or encodes an invalid codepoint.
pub fn utf8_valid_sequence_len(s: &[u8]) -> Option<usize> {
	if s.is_empty() {
		return None;
	}

	let len = utf8_expected_len(s[0]);
	if len == 0 || len > s.len() {
		return None;
	}
	if len == 1 {
		return Some(1); // plain ascii
	}

	let mut unichar = (s[0] & (0x7f >> len)) as u32;
	for i in 1..len {
		if s[i] & 0xc0 != 0x80 {
			return None;
		}
		unichar = unichar << 6 | (s[i] & 0x3f) as u32;
	}

	// reject overlong encodings and invalid codepoints
	if utf8_encoded_len(unichar) != len {
		return None;
	}
	if !unicode_valid(unichar) {
		return None;
	}

	Some(len)
}

/**
Trims surrounding whitespace and collapses every interior run of whitespace
into a single `_`.

Fields are fixed-width, so the first NUL byte (if any) terminates the input.
Idempotent: the output contains no whitespace to collapse.
*/
pub fn replace_whitespace(s: &[u8]) -> Vec<u8> {
	let len = s.iter().position(|&c| c == 0).unwrap_or(s.len());
	let s = &s[..len];

	let mut end = s.len();
	while end > 0 && is_space(s[end - 1]) {
		end -= 1;
	}
	let mut i = 0;
	while i < end && is_space(s[i]) {
		i += 1;
	}

	let mut out = Vec::with_capacity(end - i);
	while i < end {
		if is_space(s[i]) {
			while is_space(s[i]) {
				i += 1;
			}
			out.push(b'_');
		}
		out.push(s[i]);
		i += 1;
	}
	out
}

/**
Replaces everything outside the whitelist with `_`, preserving order and
length in characters. Three things survive untouched: whitelisted ascii,
`\x`-escapes already present in the input, and valid multi-byte UTF-8
sequences (which are never shrunk or split).

`white` extends the whitelist; if it contains a space, whitespace degrades to
a plain space instead of `_`.
*/
pub fn replace_chars(s: &[u8], white: Option<&[u8]>) -> Vec<u8> {
	let mut out = Vec::with_capacity(s.len());
	let mut i = 0;

	while i < s.len() {
		if whitelisted(s[i], white) {
			out.push(s[i]);
			i += 1;
			continue;
		}

		// accept hex encoding
		if s[i] == b'\\' && i + 1 < s.len() && s[i + 1] == b'x' {
			out.push(b'\\');
			out.push(b'x');
			i += 2;
			continue;
		}

		// accept valid utf8
		if let Some(len) = utf8_valid_sequence_len(&s[i..]) {
			if len > 1 {
				out.extend_from_slice(&s[i..i + len]);
				i += len;
				continue;
			}
		}

		// if space is allowed, whitespace becomes an ordinary space
		if is_space(s[i]) && white.map_or(false, |w| w.contains(&b' ')) {
			out.push(b' ');
			i += 1;
			continue;
		}

		out.push(b'_');
		i += 1;
	}

	out
}

/// The standard identity-field cleanup: whitespace normalization followed by
/// character replacement.
pub fn transfer_id_data(raw: &[u8]) -> String {
	let cleaned = replace_chars(&replace_whitespace(raw), None);
	String::from_utf8_lossy(&cleaned).into_owned()
}

/**
Escapes a name for use in a device node path: whitelisted characters and valid
UTF-8 sequences pass through, everything else (backslash included) becomes a
4-character `\xHH` escape. Never mutates its input; the first NUL terminates
it.
*/
pub fn encode_devnode_name(s: &[u8]) -> String {
	let len = s.iter().position(|&c| c == 0).unwrap_or(s.len());
	let s = &s[..len];

	let mut out = Vec::with_capacity(s.len());
	let mut i = 0;

	while i < s.len() {
		match utf8_valid_sequence_len(&s[i..]) {
			Some(seqlen) if seqlen > 1 => {
				out.extend_from_slice(&s[i..i + seqlen]);
				i += seqlen;
			},
			_ => {
				if s[i] == b'\\' || !whitelisted(s[i], None) {
					out.extend_from_slice(format!("\\x{:02x}", s[i]).as_bytes());
				} else {
					out.push(s[i]);
				}
				i += 1;
			},
		}
	}

	String::from_utf8_lossy(&out).into_owned()
}
