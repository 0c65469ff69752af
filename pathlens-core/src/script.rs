use crate::ScriptLanguage;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How much of a file is examined for a `#!` line.
pub const SHEBANG_WINDOW: u64 = 256;

/// Interpreter markers in match order. `bash` and `zsh` must be tried before
/// the plain shell fallback.
pub const INTERPRETER_MARKERS: &[(&[&str], ScriptLanguage)] = &[
    (&["python"], ScriptLanguage::Python),
    (&["bash"], ScriptLanguage::Bash),
    (&["zsh"], ScriptLanguage::Zsh),
    (&["ruby"], ScriptLanguage::Ruby),
    (&["node"], ScriptLanguage::Node),
    (&["perl"], ScriptLanguage::Perl),
    (&["/sh", "env sh"], ScriptLanguage::Shell),
];

/// Maps an interpreter line to a language by substring. `None` means the
/// interpreter is not one we know, not that the file isn't a script.
pub fn detect_script_language(first_line: &str) -> Option<ScriptLanguage> {
    INTERPRETER_MARKERS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| first_line.contains(n)))
        .map(|(_, lang)| *lang)
}

/// The whole read window as text.
///
/// A multibyte character cut in half at the end of the window is dropped
/// rather than treated as invalid; any other bad byte yields `None`.
pub fn decode_window(bytes: &[u8]) -> Option<&str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&bytes[..e.valid_up_to()]).ok(),
        Err(_) => None,
    }
}

/// First line of the decoded window. Bad bytes anywhere in the window
/// count, not only those on the first line.
pub fn first_line(bytes: &[u8]) -> Option<&str> {
    decode_window(bytes)?.split('\n').next()
}

/// Reads the start of `path` and, if it opens with `#!`, returns the
/// interpreter language (possibly unknown).
///
/// Outer `None`: not a script, or unreadable. Inner `None`: a script whose
/// interpreter is not recognized.
pub fn detect_script<P: AsRef<Path>>(path: P) -> Option<Option<ScriptLanguage>> {
    let path = path.as_ref();
    let mut buf = Vec::with_capacity(SHEBANG_WINDOW as usize);
    if let Err(e) = File::open(path).and_then(|f| f.take(SHEBANG_WINDOW).read_to_end(&mut buf)) {
        log::trace!("{}: unreadable for shebang check: {e}", path.display());
        return None;
    }

    let line = first_line(&buf)?;
    if !line.starts_with("#!") {
        return None;
    }
    Some(detect_script_language(line))
}
