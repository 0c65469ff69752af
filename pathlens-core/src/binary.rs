use crate::header::macho::{
    FatArch, FatHeader, LoadCommand, MachHeader64, Section64, SegmentCommand64,
    SIZEOF_FAT_HEADER, SIZEOF_HEADER_64, SIZEOF_SECTION_64, SIZEOF_SEGMENT_COMMAND_64,
};
use crate::header::{Endian, Header, Magic};
use crate::{BinaryLanguage, SectionNames};
use anyhow::{bail, Result};
use goblin::mach::load_command::LC_SEGMENT_64;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// The first architecture slice of a Mach-O file, walked far enough to
/// collect its section names.
///
/// Fat binaries are deliberately reduced to their first slice: no attempt is
/// made to pick the slice matching the host. Callers wanting per-architecture
/// results need a new entry point; this one will keep its first-slice meaning.
#[derive(Debug)]
pub struct MachBinary {
    pub path: PathBuf,
    /// File offset of the inspected slice; zero for thin files.
    pub slice_offset: u64,
    pub header: Box<dyn Header>,
    pub sections: SectionNames,
}

impl MachBinary {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(&path)?;
        let mut bin = Self::from_reader(&mut file)?;
        bin.path = path.as_ref().to_path_buf();
        Ok(bin)
    }

    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let slice_offset = match Magic::from_reader(reader)? {
            Some(Magic::Thin64(_)) => 0,
            Some(Magic::Fat(endian)) => {
                reader.seek(SeekFrom::Start(0))?;
                let fat = FatHeader::from_reader(reader, endian)?;
                if fat.nfat_arch == 0 {
                    bail!("fat header lists no architectures");
                }
                reader.seek(SeekFrom::Start(SIZEOF_FAT_HEADER))?;
                let first = FatArch::from_reader(reader, endian)?;
                log::trace!(
                    "fat binary with {} slices; inspecting cputype {:#x} at {:#x}",
                    fat.nfat_arch,
                    first.cputype,
                    first.offset
                );
                u64::from(first.offset)
            }
            None => bail!("not a Mach-O file"),
        };

        let (header, sections) = read_thin(reader, slice_offset)?;
        Ok(Self {
            path: PathBuf::new(),
            slice_offset,
            header: Box::new(header),
            sections,
        })
    }

    pub fn language(&self) -> Option<BinaryLanguage> {
        self.sections.language()
    }
}

/// Parses the single-architecture header at `offset` and collects section
/// names from every `LC_SEGMENT_64` command.
///
/// A short read before the load commands is an error. A short read while
/// walking them ends the walk and keeps what was collected so far.
pub fn read_thin<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
) -> Result<(MachHeader64, SectionNames)> {
    reader.seek(SeekFrom::Start(offset))?;
    let endian = match Magic::from_reader(reader)? {
        Some(Magic::Thin64(endian)) => endian,
        _ => bail!("no 64-bit Mach-O header at {offset:#x}"),
    };
    reader.seek(SeekFrom::Start(offset))?;
    let header = MachHeader64::from_reader(reader, endian)?;

    let mut sections = SectionNames {
        names: BTreeSet::new(),
        complete: true,
    };
    let mut cursor = offset + SIZEOF_HEADER_64;
    for i in 0..header.command_count() {
        match read_command(reader, endian, cursor, &mut sections.names) {
            Ok(cmdsize) => cursor = cursor.saturating_add(cmdsize),
            Err(e) => {
                log::trace!(
                    "{} load command {i}/{} at {cursor:#x}: {e}",
                    header.format_name(),
                    header.ncmds
                );
                sections.complete = false;
                break;
            }
        }
    }

    Ok((header, sections))
}

/// Reads one load command at `at`, collecting section names if it is a
/// 64-bit segment. Returns the command's declared size, which the caller
/// advances by as is; `ncmds` bounds the walk even when it is zero.
fn read_command<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    at: u64,
    names: &mut BTreeSet<String>,
) -> Result<u64> {
    reader.seek(SeekFrom::Start(at))?;
    let lc = LoadCommand::from_reader(reader, endian)?;

    if lc.cmd == LC_SEGMENT_64 {
        reader.seek(SeekFrom::Start(at))?;
        let segment = SegmentCommand64::from_reader(reader, endian)?;
        let first = at + SIZEOF_SEGMENT_COMMAND_64;
        for i in 0..u64::from(segment.nsects) {
            reader.seek(SeekFrom::Start(first + i * SIZEOF_SECTION_64))?;
            let section = Section64::from_reader(reader, endian)?;
            names.insert(section.name());
        }
    }

    Ok(u64::from(lc.cmdsize))
}

/// Language of the first architecture slice of the Mach-O file at `path`.
///
/// Returns `None` for anything that is not a readable 64-bit Mach-O image,
/// including truncated files. Never fails.
pub fn detect_language<P: AsRef<Path>>(path: P) -> Option<BinaryLanguage> {
    match MachBinary::open(&path) {
        Ok(bin) => {
            log::trace!(
                "{}: {} slice at {:#x}, {} sections (complete: {})",
                bin.path.display(),
                bin.header.format_name(),
                bin.slice_offset,
                bin.sections.names.len(),
                bin.sections.complete
            );
            bin.language()
        }
        Err(e) => {
            log::trace!("{}: no Mach-O language: {e}", path.as_ref().display());
            None
        }
    }
}

/// Same as [`detect_language`] for an already opened reader.
pub fn detect_first_slice_language<R: Read + Seek>(reader: &mut R) -> Option<BinaryLanguage> {
    MachBinary::from_reader(reader)
        .ok()
        .and_then(|bin| bin.language())
}

/// True if the first four bytes of `path` are one of the recognized thin or
/// fat magics, whether or not the rest of the header parses.
pub fn is_macho_magic<P: AsRef<Path>>(path: P) -> bool {
    let mut bytes = [0u8; 4];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut bytes))
        .map(|_| Magic::from_bytes(bytes).is_some())
        .unwrap_or(false)
}
