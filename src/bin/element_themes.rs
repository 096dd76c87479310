//! Command-line front end: inspect the catalog and preview themes from a
//! local directory of stylesheets.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

use element_themes::document::{DirFetcher, MemoryDocument};
use element_themes::preview::SwatchGrid;
use element_themes::{
    available_themes, property_name, theme_imports, ColorLevel, ColorTable, FileStore,
    ThemeConfig, ThemeEvents, ThemeLoader,
};

const DEFAULT_STATE_FILE: &str = ".element-theme.json";

#[derive(Parser)]
#[command(name = "element-themes", version, about = "Element CSS theme catalog and previewer")]
struct Cli {
    /// Configuration file (.json, .yaml or .yml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog themes
    List,
    /// Print @import lines for every theme
    Imports,
    /// Print the color variable table
    Colors {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Activate a theme from a local stylesheet directory and preview it
    Show {
        /// Theme to activate; defaults to the persisted or configured theme
        theme: Option<String>,

        /// Directory containing <theme>.theme.css files
        #[arg(long, value_name = "DIR")]
        dir: PathBuf,

        /// File holding the persisted theme choice
        #[arg(long, value_name = "FILE", default_value = DEFAULT_STATE_FILE)]
        state: PathBuf,

        /// Levels to preview (repeatable); all levels when omitted
        #[arg(long = "level", value_name = "LEVEL")]
        levels: Vec<ColorLevel>,

        /// Print raw values instead of colored swatches
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
    Css,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ThemeConfig::from_path(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => ThemeConfig::default(),
    };

    match cli.command {
        Command::List => {
            for theme in available_themes() {
                println!("{}", theme);
            }
        }
        Command::Imports => println!("{}", theme_imports(&config)),
        Command::Colors { format } => print_colors(format)?,
        Command::Show {
            theme,
            dir,
            state,
            levels,
            no_color,
        } => show(config, theme, dir, state, &levels, no_color)?,
    }
    Ok(())
}

fn print_colors(format: Format) -> Result<()> {
    let table = ColorTable::new();
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(&table)?),
        Format::Css => {
            for (ramp, level, reference) in table.iter() {
                let name = property_name(ramp, level);
                println!("{}: {};", name.trim_start_matches("--"), reference);
            }
        }
    }
    Ok(())
}

fn show(
    config: ThemeConfig,
    theme: Option<String>,
    dir: PathBuf,
    state: PathBuf,
    levels: &[ColorLevel],
    no_color: bool,
) -> Result<()> {
    if !dir.is_dir() {
        bail!("stylesheet directory not found: {}", dir.display());
    }

    let loader = ThemeLoader::new(
        config,
        MemoryDocument::new(DirFetcher::new(dir)),
        FileStore::new(state),
        ThemeEvents::new(),
    );

    let active = block_on(async {
        match theme.as_deref() {
            Some(name) => loader.switch_theme(name).await.map(|_| loader.current_theme()),
            None => loader.initialize_default().await.map(Some),
        }
    })?;

    if let Some(active) = active {
        println!("theme: {}", active);
    }
    let colored = !no_color && console::colors_enabled();
    let grid = SwatchGrid::capture(loader.document(), levels);
    print!("{}", grid.render(colored));
    Ok(())
}
