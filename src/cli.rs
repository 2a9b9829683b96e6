use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "wiki-scrape",
    version,
    about = "Scrape wiki data tables into record files, images and string resources"
)]
pub struct ScrapeArgs {
    /// Settings file (toml/json/yaml); defaults to ./wiki_scrape.* when present
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Resource list, overriding `resources_path` from the settings
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub resources: Option<PathBuf>,

    /// Only scrape this game
    #[arg(long, value_name = "GAME")]
    pub only: Option<String>,

    /// Ignore string files from earlier runs instead of extending them
    #[arg(long)]
    pub fresh: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "translate",
    version,
    about = "Translate extracted string resources into per-locale values directories"
)]
pub struct TranslateArgs {
    /// Settings file (toml/json/yaml); defaults to ./wiki_scrape.* when present
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory holding the extracted `*_strings.xml` files
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub values_dir: Option<PathBuf>,

    /// Where the `values-<iso>-r<ISO>` directories are written
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,
}
