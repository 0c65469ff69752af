pub mod macho;

use byteorder::{ByteOrder, ReadBytesExt, BE, LE};
use goblin::mach::fat::FAT_MAGIC;
use goblin::mach::header::MH_MAGIC_64;
use std::io;

pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns a short human-readable name, e.g. "Mach-O 64".
    fn format_name(&self) -> &'static str;

    /// Number of load commands that follow the header.
    fn command_count(&self) -> u32;
}

/// Byte order of a header, decided by which way round its magic matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn read_u32<R: io::Read>(self, r: &mut R) -> io::Result<u32> {
        match self {
            Endian::Little => r.read_u32::<LE>(),
            Endian::Big => r.read_u32::<BE>(),
        }
    }

    pub fn read_u64<R: io::Read>(self, r: &mut R) -> io::Result<u64> {
        match self {
            Endian::Little => r.read_u64::<LE>(),
            Endian::Big => r.read_u64::<BE>(),
        }
    }
}

/// The four leading magics this crate understands.
///
/// `MH_MAGIC_64` and `FAT_MAGIC` are each accepted in both byte orders; the
/// swapped spellings are what goblin calls `MH_CIGAM_64` and `FAT_CIGAM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// Single-architecture 64-bit header.
    Thin64(Endian),
    /// Multi-architecture table of slices.
    Fat(Endian),
}

impl Magic {
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Magic> {
        let le = LE::read_u32(&bytes);
        let be = BE::read_u32(&bytes);
        match (le, be) {
            (MH_MAGIC_64, _) => Some(Magic::Thin64(Endian::Little)),
            (_, MH_MAGIC_64) => Some(Magic::Thin64(Endian::Big)),
            (FAT_MAGIC, _) => Some(Magic::Fat(Endian::Little)),
            (_, FAT_MAGIC) => Some(Magic::Fat(Endian::Big)),
            _ => None,
        }
    }

    pub fn from_reader<R: io::Read>(r: &mut R) -> io::Result<Option<Magic>> {
        let mut bytes = [0u8; 4];
        r.read_exact(&mut bytes)?;
        Ok(Magic::from_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_in_both_byte_orders() {
        assert_eq!(
            Magic::from_bytes([0xcf, 0xfa, 0xed, 0xfe]),
            Some(Magic::Thin64(Endian::Little))
        );
        assert_eq!(
            Magic::from_bytes([0xfe, 0xed, 0xfa, 0xcf]),
            Some(Magic::Thin64(Endian::Big))
        );
        assert_eq!(
            Magic::from_bytes([0xca, 0xfe, 0xba, 0xbe]),
            Some(Magic::Fat(Endian::Big))
        );
        assert_eq!(
            Magic::from_bytes([0xbe, 0xba, 0xfe, 0xca]),
            Some(Magic::Fat(Endian::Little))
        );
    }

    #[test]
    fn other_magics_are_rejected() {
        // ELF, 32-bit Mach-O and a shebang
        assert_eq!(Magic::from_bytes(*b"\x7fELF"), None);
        assert_eq!(Magic::from_bytes([0xce, 0xfa, 0xed, 0xfe]), None);
        assert_eq!(Magic::from_bytes(*b"#!/b"), None);
    }

    #[test]
    fn short_magic_is_an_error() {
        let mut cur = io::Cursor::new(vec![0xcf, 0xfa]);
        assert!(Magic::from_reader(&mut cur).is_err());
    }
}
