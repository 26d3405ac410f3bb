//! Layout of a spreadsheet that was unpacked next to its source file.
//!
//! For `reports/book.xlsx` the extracted parts are expected in
//! `reports/book_xml/`, holding `sharedStrings.xml` and one `sheet<N>.xml`
//! per worksheet.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the shared strings part inside the XML folder.
pub const SHARED_STRINGS_FILE: &str = "sharedStrings.xml";

/// Suffix appended to the source file stem to name the XML folder.
pub const XML_DIR_SUFFIX: &str = "_xml";

/// File name of the worksheet part with the given 1-based index.
pub fn sheet_file_name(sheet_index: u32) -> String {
    format!("sheet{}.xml", sheet_index)
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// Once UTF-16 bytes are decoded into a `String` the declaration no longer
/// matches the actual encoding, and quick-xml would trust the declaration.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes as UTF-8 or BOM-marked UTF-16 (LE/BE).
///
/// Returns a human-readable message when the bytes are not valid text in
/// any of the supported encodings.
pub fn decode_xml_bytes(bytes: &[u8]) -> std::result::Result<String, String> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return String::from_utf8(rest.to_vec()).map_err(|e| e.to_string());
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    String::from_utf8(bytes.to_vec()).map_err(|e| format!("invalid UTF-8 content: {}", e))
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> std::result::Result<String, String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| format!("invalid UTF-16 content: {}", e))
}

/// The extracted XML folder belonging to a source spreadsheet.
#[derive(Debug, Clone)]
pub struct ExtractedPackage {
    source: PathBuf,
    xml_dir: PathBuf,
}

impl ExtractedPackage {
    /// Derive the `<stem>_xml` folder path for a source spreadsheet.
    ///
    /// ```
    /// use std::path::Path;
    /// use xmlsheet::ExtractedPackage;
    ///
    /// let dir = ExtractedPackage::xml_dir_for("reports/book.xlsx");
    /// assert_eq!(dir, Path::new("reports/book_xml"));
    /// ```
    pub fn xml_dir_for(source: impl AsRef<Path>) -> PathBuf {
        let source = source.as_ref();
        let mut name = source
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(OsString::new);
        name.push(XML_DIR_SUFFIX);

        match source.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Locate the XML folder for `source`, checking that both exist.
    pub fn locate(source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        if !source.exists() {
            return Err(Error::FileNotFound(source.to_path_buf()));
        }

        let xml_dir = Self::xml_dir_for(source);
        if !xml_dir.is_dir() {
            return Err(Error::XmlFolderNotFound(xml_dir));
        }

        log::debug!("using XML folder {}", xml_dir.display());

        Ok(Self {
            source: source.to_path_buf(),
            xml_dir,
        })
    }

    /// Path of the source spreadsheet.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Path of the extracted XML folder.
    pub fn xml_dir(&self) -> &Path {
        &self.xml_dir
    }

    /// Path of `sharedStrings.xml`.
    pub fn shared_strings_path(&self) -> PathBuf {
        self.xml_dir.join(SHARED_STRINGS_FILE)
    }

    /// Path of `sheet<N>.xml`.
    pub fn sheet_path(&self, sheet_index: u32) -> PathBuf {
        self.xml_dir.join(sheet_file_name(sheet_index))
    }

    /// Read and decode `sharedStrings.xml`.
    pub fn read_shared_strings(&self) -> Result<String> {
        let path = self.shared_strings_path();
        if !path.is_file() {
            return Err(Error::SharedStringsNotFound(path));
        }

        let bytes = fs::read(&path)?;
        decode_xml_bytes(&bytes).map_err(Error::SharedStringsParse)
    }

    /// Read and decode `sheet<N>.xml`.
    pub fn read_sheet(&self, sheet_index: u32) -> Result<String> {
        let path = self.sheet_path(sheet_index);
        if !path.is_file() {
            log::warn!(
                "sheet{}.xml is missing; available sheets: {:?}",
                sheet_index,
                self.sheet_indices()
            );
            return Err(Error::SheetNotFound { sheet_index, path });
        }

        let bytes = fs::read(&path)?;
        decode_xml_bytes(&bytes).map_err(|message| Error::SheetParse {
            sheet_index,
            message,
        })
    }

    /// Sheet indices present in the XML folder, ascending.
    pub fn sheet_indices(&self) -> Vec<u32> {
        let Ok(entries) = fs::read_dir(&self.xml_dir) else {
            return Vec::new();
        };

        let mut indices: Vec<u32> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                name.strip_prefix("sheet")?
                    .strip_suffix(".xml")?
                    .parse()
                    .ok()
            })
            .collect();
        indices.sort_unstable();
        indices
    }
}
