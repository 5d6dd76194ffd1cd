/*!
This crate figures out whether a block device behind a generic SCSI pass-through
interface is actually an ATA device, pulls its IDENTIFY (PACKET) DEVICE data, and
decodes that into model, serial, feature flags, rotation rate, WWN and friends.

## Example

```no_run
use diskid::Device;
use diskid::ata;
use diskid::ata::data::id;

let dev = Device::open("/dev/sda").unwrap();
let mut identify = ata::identify(&dev).unwrap();
identify.fixup();
let id = id::parse_id(&identify);
print!("{}", id::format_export(&id, ""));
```

For more, dive into documentation for the module you're interested in.
*/

#![warn(missing_debug_implementations)]

#[cfg(feature = "serializable")]
#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate log;
extern crate byteorder;
extern crate libc;

pub mod device;
pub use device::*;

pub mod scsi;
pub mod ata;

pub mod utils;
