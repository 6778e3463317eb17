//! Global Configuration Constants
//!
//! Packet constants, S2K limits and CLI defaults used throughout the
//! application. Values that appear on the wire follow RFC 4880 and must not
//! change without breaking interoperability with other OpenPGP tools.

/// File extension appended to encrypted files.
pub const FILE_EXTENSION: &str = ".gpg";

// === S2K Parameters ===

/// Salt length for salted and iterated S2K specifiers.
pub const S2K_SALT_LEN: usize = 8;

/// Smallest iteration count the EXPBIAS encoding can express (encoded byte 0).
pub const S2K_COUNT_MIN: u32 = 1024;

/// Largest iteration count the EXPBIAS encoding can express (encoded byte 255).
pub const S2K_COUNT_MAX: u32 = 65_011_712;

/// Default iteration count used when encrypting.
pub const DEFAULT_S2K_COUNT: u32 = 65_536;

// === Packet Constants ===

/// Version of the Symmetric-Key Encrypted Session Key packet.
pub const SYMKEY_PACKET_VERSION: u8 = 0x04;

/// Version of the Symmetrically Encrypted Integrity Protected Data packet.
pub const SEIP_PACKET_VERSION: u8 = 0x01;

/// Literal data format octet for binary content.
pub const LITERAL_FORMAT_BINARY: u8 = b'b';

/// Maximum filename length storable in a Literal Data packet (one length octet).
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Size of the SHA-1 modification detection code.
pub const MDC_LEN: usize = 20;

/// Number of bytes repeated after the random prefix for the quick check.
pub const QUICK_CHECK_LEN: usize = 2;

// === User Interface ===

/// Minimum passphrase length accepted by the interactive prompt.
pub const PASSPHRASE_MIN_LENGTH: usize = 1;
