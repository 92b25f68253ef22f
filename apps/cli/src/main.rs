use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use stagehand_core::{create_backup, paths, promote, ProjectDocument, PromotionConfig};
use stagehand_settings::{Preferences, PreferencesStore};

#[derive(Parser)]
#[command(
    name = "stagehand",
    about = "Backup and edit-to-production promotion for project files",
    author,
    version
)]
struct Cli {
    /// 指定偏好設定檔路徑；預設為使用者設定目錄。 / Preferences file path (defaults to the user config directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 在同一資料夾建立遞增版本的備份。 / Create a backup with an incremented version in the same folder.
    Backup(FileArg),
    /// 將檔案晉升到 production 資料夾並改寫連結的函式庫。 / Promote a file to the production folder, rewriting its linked libraries.
    Promote(FileArg),
    /// 列出文件連結的函式庫與其解析狀態。 / List the document's linked libraries and whether each resolves.
    Links(FileArg),
    /// 檢視或調整偏好設定。 / Inspect or adjust stored preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
}

#[derive(Args)]
struct FileArg {
    /// 要處理的專案檔案。 / Project file to operate on.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 顯示目前生效的偏好設定。 / Print the effective preferences.
    Show,
    /// 顯示偏好設定檔的路徑。 / Print the preferences file location.
    Path,
    /// 更新並儲存偏好設定。 / Update and persist preference values.
    Set(PreferencesSetArgs),
}

#[derive(Args)]
struct PreferencesSetArgs {
    /// production 資料夾名稱。 / Production folder name.
    #[arg(long, value_name = "NAME")]
    production_folder: Option<String>,

    /// 編輯資料夾名稱。 / Edit folder name.
    #[arg(long, value_name = "NAME")]
    edit_folder: Option<String>,

    /// 往上搜尋資料夾的層數上限。 / Maximum ancestor hops for folder searches.
    #[arg(long, value_name = "DEPTH")]
    search_depth: Option<u32>,

    /// 備份檔名的版本後綴。 / Suffix inserted before the backup version number.
    #[arg(long, value_name = "SUFFIX")]
    backup_suffix: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let preferences_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_preferences_path()?,
    };

    match cli.command {
        Commands::Backup(args) => run_backup(&args.file, &preferences_path),
        Commands::Promote(args) => run_promote(&args.file, &preferences_path),
        Commands::Links(args) => run_links(&args.file),
        Commands::Preferences(command) => run_preferences(command, &preferences_path),
    }
}

fn default_preferences_path() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("STAGEHAND_CONFIG_DIR") {
        return Ok(PathBuf::from(dir).join("preferences.json"));
    }
    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .ok_or_else(|| anyhow!("cannot determine the home directory; pass --config"))?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("stagehand")
        .join("preferences.json"))
}

fn load_preferences(path: &Path) -> Result<PreferencesStore> {
    PreferencesStore::load(path)
        .with_context(|| format!("failed to load preferences from {}", path.display()))
}

fn load_document(path: &Path) -> Result<ProjectDocument> {
    ProjectDocument::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn run_backup(file: &Path, preferences_path: &Path) -> Result<()> {
    let store = load_preferences(preferences_path)?;
    let doc = load_document(file)?;
    let outcome = create_backup(&doc, &store.preferences().backup.suffix)?;
    println!("Backup saved: {}", outcome.file_name);
    Ok(())
}

fn run_promote(file: &Path, preferences_path: &Path) -> Result<()> {
    let store = load_preferences(preferences_path)?;
    let promotion = &store.preferences().promotion;
    let config = PromotionConfig {
        production_folder_name: promotion.production_folder_name.clone(),
        edit_folder_name: promotion.edit_folder_name.clone(),
        search_depth: promotion.search_depth as i32,
    };

    let mut doc = load_document(file)?;
    let outcome = promote(&mut doc, &config)?;
    println!("File promoted to: {}", outcome.promoted_path.display());
    Ok(())
}

fn run_links(file: &Path) -> Result<()> {
    let doc = load_document(file)?;
    let dir = doc
        .dir()
        .ok_or_else(|| anyhow!("document has no containing directory"))?;

    if doc.libraries().is_empty() {
        println!("No linked libraries.");
        return Ok(());
    }
    for library in doc.libraries() {
        let resolved = paths::resolve(dir, &library.filepath);
        let status = if resolved.is_file() { "ok" } else { "missing" };
        println!("{}\t{}\t{}", library.name, library.filepath, status);
    }
    Ok(())
}

fn run_preferences(command: PreferencesCommand, preferences_path: &Path) -> Result<()> {
    match command {
        PreferencesCommand::Show => {
            let store = load_preferences(preferences_path)?;
            println!("{}", render_preferences(store.preferences())?);
        }
        PreferencesCommand::Path => {
            println!("{}", preferences_path.display());
        }
        PreferencesCommand::Set(args) => {
            let mut store = load_preferences(preferences_path)?;
            store.update(|prefs| {
                if let Some(name) = &args.production_folder {
                    prefs.promotion.production_folder_name = name.clone();
                }
                if let Some(name) = &args.edit_folder {
                    prefs.promotion.edit_folder_name = name.clone();
                }
                if let Some(depth) = args.search_depth {
                    prefs.promotion.search_depth = depth;
                }
                if let Some(suffix) = &args.backup_suffix {
                    prefs.backup.suffix = suffix.clone();
                }
            })?;
            println!("Preferences saved: {}", preferences_path.display());
        }
    }
    Ok(())
}

fn render_preferences(preferences: &Preferences) -> Result<String> {
    serde_json::to_string_pretty(preferences).context("failed to render preferences")
}
