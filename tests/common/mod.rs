//! Shared between integration tests.  Not every test uses every item.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const SIMPLE_PROGRAM: &str = "; Simple test program
DAMAGE OPPONENT 3
END";

pub const COMPLEX_PROGRAM: &str = "; Complex test program with control flow
DRAW 1
WHEN ON_ATTACK
    IF GT IMM 5 STAT_OF OPPONENT ATTACK
        DAMAGE OPPONENT 2
    ELSE
        HEAL SELF 1
    ENDIF
ENDWHEN
WHEN ON_ENTER
    BUFF_STAT SELF ATTACK 1
ENDWHEN
END";

/// [`COMPLEX_PROGRAM`] the way the formatter writes it.
pub const COMPLEX_PROGRAM_CANONICAL: &[&str] = &[
    "DRAW 1",
    "WHEN ON_ATTACK",
    "    IF GT IMM 5 STAT_OF OPPONENT ATTACK",
    "        DAMAGE OPPONENT 2",
    "    ELSE",
    "        HEAL SELF 1",
    "    ENDIF",
    "ENDWHEN",
    "WHEN ON_ENTER",
    "    BUFF_STAT SELF ATTACK 1",
    "ENDWHEN",
    "END",
];

/// A file inside a temp directory, which is deleted on drop.
///
/// The file need not exist yet; e.g. use [`TestFile::new_temp`] for an output file argument.
pub struct TestFile {
    descr: String,
    _tempdir: tempfile::TempDir,
    filepath: PathBuf,
}

impl TestFile {
    pub fn new_temp(filename: &str) -> Self {
        let descr = filename.to_string();
        let tempdir = tempfile::tempdir().unwrap_or_else(|e| panic!("while making tempdir for {}: {}", descr, e));
        let filepath = tempdir.path().join(filename);
        TestFile { descr, _tempdir: tempdir, filepath }
    }

    pub fn from_content(filename: &str, bytes: impl AsRef<[u8]>) -> Self {
        let out = TestFile::new_temp(filename);
        std::fs::write(out.as_path(), bytes)
            .unwrap_or_else(|e| panic!("while writing to {}: {}", filename, e));
        out
    }

    pub fn as_path(&self) -> &Path { &self.filepath }

    pub fn read(&self) -> Vec<u8> {
        std::fs::read(&self.filepath)
            .unwrap_or_else(|e| panic!("while reading bytes from {}: {}", self.descr, e))
    }

    pub fn read_to_string(&self) -> String {
        std::fs::read_to_string(&self.filepath)
            .unwrap_or_else(|e| panic!("while reading text from {}: {}", self.descr, e))
    }
}
