//! servicepro: tooling for the ServicePro marketing site
//!
//! Scaffolds a site, checks its dictionaries, previews pages in either
//! language the way the page scripts would render them, manages the saved
//! language preference, and emits the offline precache manifest.

mod check;
mod config;
mod manifest;
mod project;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use servicepro_dom::{Document, PageOutline};
use servicepro_i18n::{
    DirSource, FileStore, FixedLanguage, LanguageSignal, Page, PreferenceStore, SystemLanguage,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::SiteConfig;
use crate::manifest::OfflineManifest;

#[derive(Parser)]
#[command(name = "servicepro")]
#[command(version)]
#[command(about = "ServicePro site tooling: localization preview, dictionary checks, offline manifest")]
struct Cli {
    /// Site root (directory containing servicepro.toml)
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Language tag to use instead of the system locale (e.g. ar-EG)
    #[arg(long, global = true, value_name = "TAG")]
    browser_lang: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create servicepro.toml and starter dictionaries
    Init {
        /// Site name
        #[arg(long, default_value = "ServicePro")]
        name: String,
    },

    /// Compare every dictionary's keys with the base locale
    Check {
        /// Fail when a locale is missing keys, not only when a file is broken
        #[arg(long)]
        strict: bool,
    },

    /// Translate a key in the active (or given) locale
    Translate {
        key: String,

        /// Locale to translate into
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Show, list, or save the language preference
    Lang {
        #[command(subcommand)]
        action: LangAction,
    },

    /// Render a page outline (JSON) and print the localized markup
    Preview {
        /// Page outline file
        #[arg(value_name = "PAGE")]
        page: PathBuf,

        /// Switch to this locale after initialization (not saved)
        #[arg(short, long)]
        lang: Option<String>,

        /// Click the element with this `id` attribute (repeatable, saves the choice)
        #[arg(long, value_name = "ID")]
        click: Vec<String>,
    },

    /// Print the offline precache manifest as JSON
    Manifest,
}

#[derive(Subcommand)]
enum LangAction {
    /// Show the locale a fresh page session would start in
    Show,
    /// List supported locales and their directions
    List,
    /// Save a locale as the preferred language
    Set { locale: String },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { ref name } => cmd_init(&cli.dir, name),
        Commands::Check { strict } => cmd_check(&cli.dir, strict),
        Commands::Translate { ref key, ref lang } => {
            let session = Session::new(&cli)?;
            session.run(|page| {
                if let Some(lang) = lang {
                    page.i18n.set_locale(&mut page.document, lang, false);
                }
                println!("{}", page.translate(key));
                Ok(())
            })
        }
        Commands::Lang { ref action } => cmd_lang(&cli, action),
        Commands::Preview {
            ref page,
            ref lang,
            ref click,
        } => cmd_preview(&cli, page, lang.as_deref(), click),
        Commands::Manifest => {
            let config = SiteConfig::load_from_dir(&cli.dir)?;
            let manifest = OfflineManifest::from_config(&config.offline)?;
            println!("{}", manifest.to_json()?);
            Ok(())
        }
    }
}

fn cmd_init(dir: &Path, name: &str) -> Result<()> {
    let created = project::init_site(dir, name)?;
    if created.is_empty() {
        info!("Nothing to do: {} is already set up", dir.display());
    }
    for file in created {
        info!("Created {}", file);
    }
    Ok(())
}

fn cmd_check(dir: &Path, strict: bool) -> Result<()> {
    let config = SiteConfig::load_from_dir(dir)?;
    let report = check::check_dictionaries(&config.lang_dir(dir), &config.i18n);
    print!("{report}");

    if report.has_failures() {
        anyhow::bail!("one or more dictionaries failed to load");
    }
    if strict && report.has_gaps() {
        anyhow::bail!("one or more dictionaries are missing keys");
    }
    Ok(())
}

fn cmd_lang(cli: &Cli, action: &LangAction) -> Result<()> {
    let config = SiteConfig::load_from_dir(&cli.dir)?;
    match action {
        LangAction::List => {
            let i18n = config.i18n.normalized();
            for locale in i18n.supported() {
                let marker = if locale.id == i18n.base { " (base)" } else { "" };
                println!("{locale}{marker}");
            }
            Ok(())
        }
        LangAction::Show => {
            let store = FileStore::open(config.storage_path(&cli.dir));
            let saved = store.get(&config.i18n.storage_key);
            Session::with_config(cli, config)?.run(|page| {
                println!(
                    "{} ({})",
                    page.i18n.active_locale(),
                    page.i18n.direction()
                );
                if let Some(saved) = saved {
                    println!("saved preference: {saved}");
                }
                Ok(())
            })
        }
        LangAction::Set { locale } => {
            let i18n = config.i18n.normalized();
            let id = servicepro_i18n::normalize_locale(locale);
            if !i18n.is_supported(&id) {
                anyhow::bail!(
                    "unsupported locale `{}` (supported: {})",
                    locale,
                    i18n.locales.join(", ")
                );
            }
            let mut store = FileStore::open(config.storage_path(&cli.dir));
            store
                .set(&i18n.storage_key, &id)
                .context("Failed to save language preference")?;
            info!("Saved {} to {}", id, store.path().display());
            Ok(())
        }
    }
}

fn cmd_preview(cli: &Cli, page_path: &Path, lang: Option<&str>, clicks: &[String]) -> Result<()> {
    let src = fs::read_to_string(page_path)
        .with_context(|| format!("Failed to read {}", page_path.display()))?;
    let document = PageOutline::from_json(&src)
        .and_then(|outline| outline.build())
        .with_context(|| format!("Failed to load page outline {}", page_path.display()))?;

    let mut session = Session::new(cli)?;
    session.document = document;
    session.run_with_events(|page, events| {
        if let Some(lang) = lang {
            page.i18n.set_locale(&mut page.document, lang, false);
        }
        for id in clicks {
            let target = page
                .document
                .element_by_id(id)
                .with_context(|| format!("No element with id `{id}` in the page"))?;
            debug!("clicking #{}", id);
            page.click(events, target);
        }
        print!("{}", page.document.to_markup());
        Ok(())
    })
}

/// Everything needed to open one page session from the site on disk.
struct Session {
    root: PathBuf,
    config: SiteConfig,
    signal: Box<dyn LanguageSignal>,
    document: Document,
}

impl Session {
    fn new(cli: &Cli) -> Result<Self> {
        let config = SiteConfig::load_from_dir(&cli.dir)?;
        Self::with_config(cli, config)
    }

    fn with_config(cli: &Cli, config: SiteConfig) -> Result<Self> {
        let signal: Box<dyn LanguageSignal> = match &cli.browser_lang {
            Some(tag) => Box::new(FixedLanguage::new(tag.clone())),
            None => Box::new(SystemLanguage),
        };
        Ok(Self {
            root: cli.dir.clone(),
            config,
            signal,
            document: Document::new(),
        })
    }

    fn run<F>(self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Page) -> Result<()>,
    {
        self.run_with_events(|page, _| f(page))
    }

    fn run_with_events<F>(self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Page, &servicepro_i18n::PageEvents) -> Result<()>,
    {
        let Session {
            root,
            config,
            signal,
            document,
        } = self;
        let source = Arc::new(DirSource::new(config.lang_dir(&root)));
        let store = Box::new(FileStore::open(config.storage_path(&root)));

        let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
        let (mut page, events) = runtime.block_on(Page::open(
            config.i18n,
            source,
            store,
            signal.as_ref(),
            document,
        ));
        f(&mut page, &events)
    }
}
