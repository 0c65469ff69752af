//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use byteorder::{WriteBytesExt, BE, LE};
use goblin::mach::fat::FAT_MAGIC;
use goblin::mach::header::MH_MAGIC_64;
use goblin::mach::load_command::LC_SEGMENT_64;
use std::fs;
use std::path::Path;

/// A little-endian thin 64-bit image with one `__TEXT` segment holding the
/// named sections.
pub fn thin_macho(sections: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    let cmdsize = 72 + 80 * sections.len() as u32;
    for v in [MH_MAGIC_64, 0x0100_000c, 0, 2, 1, cmdsize, 0, 0] {
        out.write_u32::<LE>(v).unwrap();
    }

    out.write_u32::<LE>(LC_SEGMENT_64).unwrap();
    out.write_u32::<LE>(cmdsize).unwrap();
    out.extend_from_slice(&name16("__TEXT"));
    out.extend_from_slice(&[0u8; 32]);
    for v in [5, 5, sections.len() as u32, 0] {
        out.write_u32::<LE>(v).unwrap();
    }
    for name in sections {
        out.extend_from_slice(&name16(name));
        out.extend_from_slice(&name16("__TEXT"));
        out.extend_from_slice(&[0u8; 48]);
    }
    out
}

/// Big-endian fat wrapper with a single slice at `offset`.
pub fn fat_macho(slice: &[u8], offset: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<BE>(FAT_MAGIC).unwrap();
    out.write_u32::<BE>(1).unwrap();
    for v in [0x0100_000c, 0, offset, slice.len() as u32, 14] {
        out.write_u32::<BE>(v).unwrap();
    }
    out.resize(offset as usize, 0);
    out.extend_from_slice(slice);
    out
}

fn name16(name: &str) -> [u8; 16] {
    let mut raw = [0u8; 16];
    raw[..name.len()].copy_from_slice(name.as_bytes());
    raw
}

/// Writes `body` to `dir/name` with mode 0755.
pub fn write_executable(dir: &Path, name: &str, body: &[u8]) {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
