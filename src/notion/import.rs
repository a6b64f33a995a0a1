//! Notion export conversion
//!
//! Walks a Notion export (ZIP archive or extracted folder) and writes the
//! vault counterpart of every entry.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;
use zip::ZipArchive;

use super::hash::{board_output_path, strip_hash_from_path};
use super::links::rewrite_markdown;
use super::table::{strip_bom, Table};
use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::obsidian::{Board, Vault};

/// What an export entry turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Markdown page, links rewritten
    Page,
    /// Database CSV, rewritten as a Kanban board
    Database,
    /// Anything else (images, attachments), copied as is
    Asset,
}

impl EntryKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().map(|e| e.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            Some("md") => Self::Page,
            Some("csv") => Self::Database,
            _ => Self::Asset,
        }
    }
}

/// Result of converting a single entry, not yet written
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    /// Cleaned path relative to the vault root
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub kind: EntryKind,
    pub links_rewritten: usize,
    pub cards: usize,
}

/// One written (or, in a dry run, planned) vault file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedEntry {
    /// Path inside the export
    pub source: String,
    pub output: PathBuf,
    pub kind: EntryKind,
    pub links_rewritten: usize,
    pub cards: usize,
}

/// Summary of a whole conversion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub entries: Vec<ConvertedEntry>,
    /// Entries ignored by prefix or because their path is unsafe
    pub skipped: Vec<String>,
    /// Databases with a header but no rows; nothing is written for them
    pub empty_databases: Vec<String>,
}

impl ConversionReport {
    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn links_rewritten(&self) -> usize {
        self.entries.iter().map(|e| e.links_rewritten).sum()
    }
}

/// Convert one export entry.
///
/// Pure: the path is only used to pick the conversion and compute the
/// output path. Returns `None` when nothing should be written, i.e. for a
/// database without rows or for assets when asset copying is off.
pub fn convert_entry(
    logical_path: &Path,
    content: &[u8],
    options: &ConvertOptions,
) -> Result<Option<ConvertedFile>> {
    let kind = EntryKind::from_path(logical_path);

    match kind {
        EntryKind::Page => {
            let text = String::from_utf8_lossy(content);
            let (markdown, links_rewritten) = rewrite_markdown(strip_bom(&text));

            Ok(Some(ConvertedFile {
                path: strip_hash_from_path(logical_path),
                content: markdown.into_bytes(),
                kind,
                links_rewritten,
                cards: 0,
            }))
        }
        EntryKind::Database => {
            let text = String::from_utf8_lossy(content);
            let table = Table::parse(&text)?;

            Ok(Board::from_rows(&table.rows, &options.board).map(|board| ConvertedFile {
                path: board_output_path(logical_path),
                content: board.to_markdown().into_bytes(),
                kind,
                links_rewritten: 0,
                cards: board.card_count(),
            }))
        }
        EntryKind::Asset if options.copy_assets => Ok(Some(ConvertedFile {
            path: strip_hash_from_path(logical_path),
            content: content.to_vec(),
            kind,
            links_rewritten: 0,
            cards: 0,
        })),
        EntryKind::Asset => Ok(None),
    }
}

/// Feeds entries through [`convert_entry`] into a vault, one at a time
struct Converter<'a> {
    options: &'a ConvertOptions,
    vault: &'a Vault,
    report: ConversionReport,
}

impl<'a> Converter<'a> {
    fn new(options: &'a ConvertOptions, vault: &'a Vault) -> Self {
        let report = ConversionReport {
            output_dir: vault.root().to_path_buf(),
            dry_run: vault.is_dry_run(),
            ..ConversionReport::default()
        };

        Self { options, vault, report }
    }

    fn skip(&mut self, source: &str) {
        log::debug!("Skipping {}", source);
        self.report.skipped.push(source.to_string());
    }

    fn process(&mut self, source: &str, relative: &Path, content: &[u8]) -> Result<()> {
        match convert_entry(relative, content, self.options)? {
            Some(file) => {
                let output = self.vault.write(&file.path, &file.content)?;
                self.report.entries.push(ConvertedEntry {
                    source: source.to_string(),
                    output,
                    kind: file.kind,
                    links_rewritten: file.links_rewritten,
                    cards: file.cards,
                });
            }
            None if EntryKind::from_path(relative) == EntryKind::Database => {
                log::info!("Database {} has no rows, no board written", source);
                self.report.empty_databases.push(source.to_string());
            }
            None => {}
        }

        Ok(())
    }

    fn finish(self) -> ConversionReport {
        self.report
    }
}

/// Convert a Notion export ZIP into `vault`
pub fn convert_export_zip(
    zip_path: &Path,
    vault: &Vault,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut converter = Converter::new(options, vault);

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        if options.is_skipped(&name) {
            converter.skip(&name);
            continue;
        }

        let relative = match file.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                log::warn!("Skipping archive entry outside the export: {}", name);
                converter.skip(&name);
                continue;
            }
        };

        if EntryKind::from_path(&relative) == EntryKind::Asset && !options.copy_assets {
            continue;
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        drop(file); // Release borrow

        converter.process(&name, &relative, &bytes)?;
    }

    Ok(converter.finish())
}

/// Convert an extracted Notion export folder into `vault`.
///
/// The vault root may be the export folder itself: cleaned files are then
/// written next to the originals.
pub fn convert_export_folder(
    root: &Path,
    vault: &Vault,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    // Collect first, the vault may live inside the tree being walked
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    let mut converter = Converter::new(options, vault);

    for path in files {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let source = relative.to_string_lossy().to_string();

        if options.is_skipped(&source) {
            converter.skip(&source);
            continue;
        }

        if EntryKind::from_path(relative) == EntryKind::Asset {
            if !options.copy_assets {
                continue;
            }
            // Converting in place: an asset without an id is already where it belongs
            if vault.target_path(&strip_hash_from_path(relative)) == path {
                continue;
            }
        }

        let bytes = fs::read(&path)?;
        converter.process(&source, relative, &bytes)?;
    }

    Ok(converter.finish())
}

/// Convert a `.zip` export or an export folder.
///
/// Without an explicit output folder a ZIP is converted next to the archive
/// and a folder is converted in place.
pub fn convert_export(
    input: &Path,
    output_dir: Option<&Path>,
    options: &ConvertOptions,
    dry_run: bool,
) -> Result<ConversionReport> {
    let is_zip = input.is_file()
        && input
            .extension()
            .map(|e| e.eq_ignore_ascii_case("zip"))
            .unwrap_or(false);

    let default_root = if is_zip {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    } else if input.is_dir() {
        input
    } else {
        return Err(ConvertError::UnsupportedInput(input.to_path_buf()));
    };

    let root = output_dir.unwrap_or(default_root).to_path_buf();
    let vault = if dry_run { Vault::dry_run(root) } else { Vault::new(root) };

    if is_zip {
        log::info!("Converting Notion export archive {:?} into {:?}", input, vault.root());
        convert_export_zip(input, &vault, options)
    } else {
        log::info!("Converting Notion export folder {:?} into {:?}", input, vault.root());
        convert_export_folder(input, &vault, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "aabbccddeeff00112233445566778899";

    #[test]
    fn test_entry_kind() {
        assert_eq!(EntryKind::from_path(Path::new("a/Page.md")), EntryKind::Page);
        assert_eq!(EntryKind::from_path(Path::new("a/Tasks.CSV")), EntryKind::Database);
        assert_eq!(EntryKind::from_path(Path::new("a/image.png")), EntryKind::Asset);
        assert_eq!(EntryKind::from_path(Path::new("README")), EntryKind::Asset);
    }

    #[test]
    fn test_convert_page() {
        let path = PathBuf::from(format!("Export {HASH}/Page {HASH}.md"));
        let content = format!("\u{feff}# Page\n[Other](Other%20{HASH}.md)\n");

        let file = convert_entry(&path, content.as_bytes(), &ConvertOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(file.path, Path::new("Export").join("Page.md"));
        assert_eq!(String::from_utf8(file.content).unwrap(), "# Page\n[Other](Other.md)\n");
        assert_eq!(file.kind, EntryKind::Page);
        assert_eq!(file.links_rewritten, 1);
    }

    #[test]
    fn test_convert_database() {
        let path = PathBuf::from(format!("Tasks {HASH}.csv"));
        let content = "\u{feff}Name,Status,Tags\nWork,Doing,notion\nShip,Done,\n";

        let file = convert_entry(&path, content.as_bytes(), &ConvertOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(file.path, Path::new("Tasks.md"));
        assert_eq!(file.cards, 2);
        let board = String::from_utf8(file.content).unwrap();
        assert!(board.contains("## Doing\n\n- [ ] Work #notion\n"));
        assert!(board.contains("## Done\n\n- [x] Ship\n"));
    }

    #[test]
    fn test_convert_empty_database() {
        let result = convert_entry(
            Path::new("Tasks.csv"),
            b"Name,Status,Tags\n",
            &ConvertOptions::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_convert_asset() {
        let path = PathBuf::from(format!("Page {HASH}/image.png"));
        let options = ConvertOptions::default();

        let file = convert_entry(&path, &[0x89, 0x50], &options).unwrap().unwrap();
        assert_eq!(file.path, Path::new("Page").join("image.png"));
        assert_eq!(file.content, vec![0x89, 0x50]);

        let options = ConvertOptions {
            copy_assets: false,
            ..ConvertOptions::default()
        };
        assert!(convert_entry(&path, &[0x89, 0x50], &options).unwrap().is_none());
    }
}
