//! Asset library listing.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use animhub_core::config::AppConfig;
use animhub_core::error::AppError;
use animhub_storage::{AssetKind, AssetLibrary, LibraryEntry, StorageLayout};

use crate::output::{self, OutputFormat};

/// Which part of the library to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LibrarySection {
    /// Item sprites
    Items,
    /// Block textures
    Blocks,
    /// Both
    #[default]
    All,
}

/// Arguments for the library command
#[derive(Debug, Args)]
pub struct LibraryArgs {
    /// Section to list
    #[arg(value_enum, default_value = "all")]
    pub section: LibrarySection,
}

#[derive(Debug, Serialize, Tabled)]
struct LibraryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    kind: String,
}

impl From<LibraryEntry> for LibraryRow {
    fn from(entry: LibraryEntry) -> Self {
        Self {
            name: entry.name,
            filename: entry.filename,
            kind: entry.kind.to_string(),
        }
    }
}

/// Execute the library command
pub async fn execute(
    args: &LibraryArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let layout = StorageLayout::from_config(&config.storage)?;
    let library = AssetLibrary::new(layout.items, layout.blocks);

    let entries = match args.section {
        LibrarySection::Items => library.list(AssetKind::Item).await?,
        LibrarySection::Blocks => library.list(AssetKind::Block).await?,
        LibrarySection::All => library.list_all().await?,
    };

    let rows: Vec<LibraryRow> = entries.into_iter().map(LibraryRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
