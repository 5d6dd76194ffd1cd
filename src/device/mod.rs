/*!
Thin wrapper for the device handle.

Open a device node with `Device::open(&path)`, then hand the result to
[`ata::identify`](../ata/fn.identify.html) or to the lower-level
[`scsi`](../scsi/index.html) plumbing. The underlying descriptor is closed when
the `Device` goes out of scope, on every exit path.
*/

pub mod linux;
pub use self::linux::*;
