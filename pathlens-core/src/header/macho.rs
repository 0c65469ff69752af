use crate::header::{Endian, Header};
use std::io;

/// Size of `mach_header_64`; load commands start immediately after it.
pub const SIZEOF_HEADER_64: u64 = 32;
/// Size of `fat_header`; the first `fat_arch` starts immediately after it.
pub const SIZEOF_FAT_HEADER: u64 = 8;
/// Size of `segment_command_64`; its sections start immediately after it.
pub const SIZEOF_SEGMENT_COMMAND_64: u64 = 72;
/// Size of one `section_64` record.
pub const SIZEOF_SECTION_64: u64 = 80;

/// The 64-bit Mach-O header (`mach_header_64`).
///
/// Reference: `<mach-o/loader.h>`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MachHeader64 {
    /// `MH_MAGIC_64`, in the byte order of the rest of the header.
    pub magic: u32,

    /// CPU specifier, e.g. `CPU_TYPE_ARM64`.
    pub cputype: u32,

    pub cpusubtype: u32,

    /// Kind of file: `MH_EXECUTE`, `MH_DYLIB`, ...
    pub filetype: u32,

    /// Number of load commands following the header.
    pub ncmds: u32,

    /// Total size in bytes of all load commands.
    pub sizeofcmds: u32,

    pub flags: u32,

    pub reserved: u32,
}

impl MachHeader64 {
    pub fn from_reader<R: io::Read>(cur: &mut R, endian: Endian) -> anyhow::Result<MachHeader64> {
        Ok(MachHeader64 {
            magic: endian.read_u32(cur)?,
            cputype: endian.read_u32(cur)?,
            cpusubtype: endian.read_u32(cur)?,
            filetype: endian.read_u32(cur)?,
            ncmds: endian.read_u32(cur)?,
            sizeofcmds: endian.read_u32(cur)?,
            flags: endian.read_u32(cur)?,
            reserved: endian.read_u32(cur)?,
        })
    }
}

impl Header for MachHeader64 {
    fn format_name(&self) -> &'static str {
        "Mach-O 64"
    }

    fn command_count(&self) -> u32 {
        self.ncmds
    }
}

/// The multi-architecture header (`fat_header`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FatHeader {
    pub magic: u32,

    /// Number of `fat_arch` records that follow.
    pub nfat_arch: u32,
}

impl FatHeader {
    pub fn from_reader<R: io::Read>(cur: &mut R, endian: Endian) -> anyhow::Result<FatHeader> {
        Ok(FatHeader {
            magic: endian.read_u32(cur)?,
            nfat_arch: endian.read_u32(cur)?,
        })
    }
}

/// One slice descriptor in a fat binary (`fat_arch`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FatArch {
    pub cputype: u32,

    pub cpusubtype: u32,

    /// File offset of the slice's own Mach-O header.
    pub offset: u32,

    pub size: u32,

    /// Alignment as a power of two.
    pub align: u32,
}

impl FatArch {
    pub fn from_reader<R: io::Read>(cur: &mut R, endian: Endian) -> anyhow::Result<FatArch> {
        Ok(FatArch {
            cputype: endian.read_u32(cur)?,
            cpusubtype: endian.read_u32(cur)?,
            offset: endian.read_u32(cur)?,
            size: endian.read_u32(cur)?,
            align: endian.read_u32(cur)?,
        })
    }
}

/// The `(cmd, cmdsize)` prefix shared by every load command.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LoadCommand {
    pub cmd: u32,

    /// Size of the whole command including this prefix.
    pub cmdsize: u32,
}

impl LoadCommand {
    pub fn from_reader<R: io::Read>(cur: &mut R, endian: Endian) -> anyhow::Result<LoadCommand> {
        Ok(LoadCommand {
            cmd: endian.read_u32(cur)?,
            cmdsize: endian.read_u32(cur)?,
        })
    }
}

/// `segment_command_64`, the `LC_SEGMENT_64` load command.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SegmentCommand64 {
    pub cmd: u32,
    pub cmdsize: u32,
    pub segname: [u8; 16],
    pub vmaddr: u64,
    pub vmsize: u64,
    pub fileoff: u64,
    pub filesize: u64,
    pub maxprot: u32,
    pub initprot: u32,

    /// Number of `section_64` records directly after this command.
    pub nsects: u32,

    pub flags: u32,
}

impl SegmentCommand64 {
    pub fn from_reader<R: io::Read>(
        cur: &mut R,
        endian: Endian,
    ) -> anyhow::Result<SegmentCommand64> {
        let cmd = endian.read_u32(cur)?;
        let cmdsize = endian.read_u32(cur)?;
        let mut segname = [0u8; 16];
        cur.read_exact(&mut segname)?;

        Ok(SegmentCommand64 {
            cmd,
            cmdsize,
            segname,
            vmaddr: endian.read_u64(cur)?,
            vmsize: endian.read_u64(cur)?,
            fileoff: endian.read_u64(cur)?,
            filesize: endian.read_u64(cur)?,
            maxprot: endian.read_u32(cur)?,
            initprot: endian.read_u32(cur)?,
            nsects: endian.read_u32(cur)?,
            flags: endian.read_u32(cur)?,
        })
    }
}

/// `section_64`. Only the names matter here but the whole record is read so
/// a truncated record counts as a short read.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Section64 {
    /// Nul-padded section name, e.g. `__swift5_proto`.
    pub sectname: [u8; 16],

    /// Nul-padded name of the owning segment, e.g. `__TEXT`.
    pub segname: [u8; 16],

    pub addr: u64,
    pub size: u64,
    pub offset: u32,
    pub align: u32,
    pub reloff: u32,
    pub nreloc: u32,
    pub flags: u32,
    pub reserved1: u32,
    pub reserved2: u32,
    pub reserved3: u32,
}

impl Section64 {
    pub fn from_reader<R: io::Read>(cur: &mut R, endian: Endian) -> anyhow::Result<Section64> {
        let mut sectname = [0u8; 16];
        cur.read_exact(&mut sectname)?;
        let mut segname = [0u8; 16];
        cur.read_exact(&mut segname)?;

        Ok(Section64 {
            sectname,
            segname,
            addr: endian.read_u64(cur)?,
            size: endian.read_u64(cur)?,
            offset: endian.read_u32(cur)?,
            align: endian.read_u32(cur)?,
            reloff: endian.read_u32(cur)?,
            nreloc: endian.read_u32(cur)?,
            flags: endian.read_u32(cur)?,
            reserved1: endian.read_u32(cur)?,
            reserved2: endian.read_u32(cur)?,
            reserved3: endian.read_u32(cur)?,
        })
    }

    pub fn name(&self) -> String {
        fixed_name(&self.sectname)
    }
}

/// Decodes a fixed-width, nul-padded name field.
pub fn fixed_name(raw: &[u8; 16]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
