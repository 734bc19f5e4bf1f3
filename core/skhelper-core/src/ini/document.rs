//! Lossless INI document model.
//!
//! Comments, blank lines, key order and untouched entries round-trip byte for
//! byte; only entries written through [`IniDocument::set`] are re-rendered.
//! Section and key names compare case-sensitively. The file's text encoding
//! (UTF-8, UTF-8 with BOM, UTF-16LE with BOM) and line ending are detected on
//! load and reused on save.

use fs_err as fs;
use std::fmt;
use std::io;
use std::path::Path;

use crate::error::{HelperError, Result};
use crate::storage::atomic_write;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
}

impl TextEncoding {
    fn decode(bytes: &[u8]) -> io::Result<(Self, String)> {
        if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
            let text = String::from_utf8(rest.to_vec())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            return Ok((TextEncoding::Utf8Bom, text));
        }

        if let Some(rest) = bytes.strip_prefix(UTF16LE_BOM) {
            if rest.len() % 2 != 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "odd byte count in UTF-16 text",
                ));
            }
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            let text = String::from_utf16(&units)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            return Ok((TextEncoding::Utf16Le, text));
        }

        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok((TextEncoding::Utf8, text))
    }

    fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut bytes = UTF8_BOM.to_vec();
                bytes.extend_from_slice(text.as_bytes());
                bytes
            }
            TextEncoding::Utf16Le => {
                let mut bytes = UTF16LE_BOM.to_vec();
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                bytes
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    /// Comment, blank or unparseable line, kept verbatim.
    Verbatim(String),
    Entry {
        key: String,
        value: String,
        /// Source text; `None` once the value has been replaced.
        raw: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Section {
    name: String,
    header: Option<String>,
    lines: Vec<Line>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: None,
            lines: Vec::new(),
        }
    }

    fn entry_index(&self, key: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| matches!(line, Line::Entry { key: k, .. } if k == key))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IniDocument {
    /// Lines before the first section header.
    preamble: Vec<Line>,
    sections: Vec<Section>,
    encoding: TextEncoding,
    crlf: bool,
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let mut doc = IniDocument {
            crlf: text.contains("\r\n"),
            ..Default::default()
        };
        let mut current: Option<usize> = None;

        for raw in text.lines() {
            let trimmed = raw.trim();

            if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
                let name = trimmed[1..trimmed.len() - 1].trim();
                // Repeated headers continue the earlier section.
                current = Some(match doc.section_index(name) {
                    Some(index) => index,
                    None => {
                        let mut section = Section::new(name);
                        section.header = Some(raw.to_string());
                        doc.sections.push(section);
                        doc.sections.len() - 1
                    }
                });
                continue;
            }

            let line = match trimmed.split_once('=') {
                Some((key, value))
                    if !trimmed.starts_with(';')
                        && !trimmed.starts_with('#')
                        && !key.trim().is_empty() =>
                {
                    Line::Entry {
                        key: key.trim().to_string(),
                        value: value.trim().to_string(),
                        raw: Some(raw.to_string()),
                    }
                }
                _ => Line::Verbatim(raw.to_string()),
            };

            match current {
                Some(index) => doc.sections[index].lines.push(line),
                None => doc.preamble.push(line),
            }
        }

        doc
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HelperError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)
            .map_err(|e| HelperError::io(format!("reading {}", path.display()), e))?;
        let (encoding, text) = TextEncoding::decode(&bytes)
            .map_err(|e| HelperError::io(format!("decoding {}", path.display()), e))?;

        let mut doc = Self::parse(&text);
        doc.encoding = encoding;
        Ok(doc)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write(path, &self.encoding.encode(&self.to_string()))
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let section = &self.sections[self.section_index(section)?];
        match &section.lines[section.entry_index(key)?] {
            Line::Entry { value, .. } => Some(value.as_str()),
            Line::Verbatim(_) => None,
        }
    }

    /// Sets a value, creating the section and key when absent. New keys go
    /// after the last entry of the section so trailing comments stay last.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let index = match self.section_index(section) {
            Some(index) => index,
            None => {
                if let Some(last) = self.sections.last_mut() {
                    if !matches!(last.lines.last(), Some(Line::Verbatim(l)) if l.trim().is_empty())
                    {
                        last.lines.push(Line::Verbatim(String::new()));
                    }
                }
                self.sections.push(Section::new(section));
                self.sections.len() - 1
            }
        };

        let section = &mut self.sections[index];
        let entry = Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: None,
        };

        match section.entry_index(key) {
            Some(pos) => section.lines[pos] = entry,
            None => {
                let insert_at = section
                    .lines
                    .iter()
                    .rposition(|line| matches!(line, Line::Entry { .. }))
                    .map_or(0, |pos| pos + 1);
                section.lines.insert(insert_at, entry);
            }
        }
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, line: &Line, newline: &str) -> fmt::Result {
    match line {
        Line::Verbatim(text) => write!(f, "{}{}", text, newline),
        Line::Entry { raw: Some(raw), .. } => write!(f, "{}{}", raw, newline),
        Line::Entry {
            key,
            value,
            raw: None,
        } => write!(f, "{}={}{}", key, value, newline),
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let newline = if self.crlf { "\r\n" } else { "\n" };

        for line in &self.preamble {
            write_line(f, line, newline)?;
        }
        for section in &self.sections {
            match &section.header {
                Some(header) => write!(f, "{}{}", header, newline)?,
                None => write!(f, "[{}]{}", section.name, newline)?,
            }
            for line in &section.lines {
                write_line(f, line, newline)?;
            }
        }
        Ok(())
    }
}
