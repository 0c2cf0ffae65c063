use crate::{
    cli::{OutputFormat, SourceArgs},
    config::AppConfig,
    error::{CliError, Result},
    output::{OutputManager, write_output},
    sink::ConsoleSink,
};
use indicatif::{ProgressBar, ProgressStyle};
use iptv_engine::{
    Aggregator, Browser, FetcherConfig, HttpFetcher, JsonFileStore, LoadOutcome, PlaybackController,
    PlaybackState, SourceSpec, SourceStore, create_client,
    player::ManifestProbeFactory,
    presets::{find_pack, find_preset},
};
use std::{path::PathBuf, time::Duration};
use tokio::time::timeout;
use tracing::{debug, info, warn};

type CliBrowser = Browser<HttpFetcher, ManifestProbeFactory, ConsoleSink>;

/// A resolved source selection.
struct Selection {
    spec: SourceSpec,
    initial_query: String,
    label: String,
}

pub struct CommandExecutor {
    config: AppConfig,
    fetcher_config: FetcherConfig,
    saved_path: PathBuf,
    output: OutputManager,
    show_progress: bool,
}

impl CommandExecutor {
    pub fn new(
        config: AppConfig,
        fetcher_config: FetcherConfig,
        saved_path: PathBuf,
        show_progress: bool,
    ) -> Self {
        let output = OutputManager::new(config.colored_output);
        Self {
            config,
            fetcher_config,
            saved_path,
            output,
            show_progress,
        }
    }

    pub async fn browse(
        &self,
        source: &SourceArgs,
        search: Option<&str>,
        group: &str,
        page: usize,
        format: OutputFormat,
    ) -> Result<()> {
        let mut browser = self.build_browser()?;
        self.load(&mut browser, source).await?;

        if let Some(text) = search {
            browser.set_query(text, group);
        } else {
            let text = browser.state().query.text.clone();
            browser.set_query(text, group);
        }
        browser.set_page(page);

        let content = self
            .output
            .format_page(&browser.view(), &browser.state().query, format)?;
        write_output(&content)
    }

    pub async fn groups(&self, source: &SourceArgs, format: OutputFormat) -> Result<()> {
        let mut browser = self.build_browser()?;
        self.load(&mut browser, source).await?;
        let catalog = browser.catalog();
        write_output(&self.output.format_groups(catalog.groups(), format)?)
    }

    pub fn presets(&self, format: OutputFormat) -> Result<()> {
        write_output(&self.output.format_presets(format)?)
    }

    pub fn saved_list(&self, format: OutputFormat) -> Result<()> {
        let store = JsonFileStore::open(&self.saved_path)?;
        write_output(&self.output.format_saved(store.list(), format)?)
    }

    pub async fn saved_add(&self, url: &str, name: Option<&str>) -> Result<()> {
        let mut browser = self.build_browser()?;
        let pb = self.create_progress_bar(&format!("Loading {url}..."));
        let outcome = browser.submit_custom_source(url, name).await?;
        pb.finish_and_clear();

        let Some(outcome) = outcome else {
            return Err(CliError::invalid_input("Playlist URL is empty"));
        };
        let saved = browser
            .saved_sources()
            .last()
            .ok_or_else(|| CliError::not_found("saved source"))?;
        let channels = outcome.catalog().map_or(0, |c| c.len());
        println!(
            "✓ Saved \"{}\" as #{} ({channels} channel(s))",
            saved.name,
            browser.saved_sources().len() - 1
        );
        Ok(())
    }

    pub fn saved_remove(&self, index: usize) -> Result<()> {
        let mut store = JsonFileStore::open(&self.saved_path)?;
        let removed = store.remove_at(index)?;
        println!("✓ Removed \"{}\"", removed.name);
        Ok(())
    }

    pub async fn probe(
        &self,
        source: &SourceArgs,
        channel: Option<usize>,
        stream: Option<&str>,
        wait: Option<u64>,
        format: OutputFormat,
    ) -> Result<()> {
        let mut browser = self.build_browser()?;

        match (channel, stream) {
            (_, Some(url)) => {
                browser.player_mut().select(url);
            }
            (Some(index), None) => {
                self.load(&mut browser, source).await?;
                browser
                    .select_entry(index)
                    .ok_or_else(|| CliError::not_found(format!("channel #{index}")))?;
            }
            (None, None) => {
                return Err(CliError::invalid_input("Either --channel or --stream is required"));
            }
        }

        let wait = Duration::from_secs(wait.unwrap_or(self.config.probe_timeout));
        let pb = self.create_progress_bar("Probing stream...");
        let settled = timeout(wait, settle(&mut browser)).await;
        pb.finish_and_clear();
        if settled.is_err() {
            warn!(seconds = wait.as_secs(), "Stream did not settle in time");
        }

        let session = browser.playback_state();
        write_output(&self.output.format_session(&session, format)?)?;
        browser.close_player();

        if session.state == PlaybackState::Playing {
            Ok(())
        } else {
            Err(CliError::Unreachable(session.target_url.unwrap_or_default()))
        }
    }

    fn build_browser(&self) -> Result<CliBrowser> {
        let client = create_client(&self.fetcher_config)?;
        let fetcher = HttpFetcher::with_client(client.clone(), self.fetcher_config.clone());
        let factory = ManifestProbeFactory::new(client)
            .with_timeout(Duration::from_secs(self.config.timeout.max(1)));
        let player = PlaybackController::new(factory, ConsoleSink, self.config.player_config());
        let store = JsonFileStore::open(&self.saved_path)?;

        Ok(Browser::new(
            Aggregator::new(fetcher),
            player,
            Box::new(store),
            self.config.view_config(),
        ))
    }

    fn resolve(&self, browser: &CliBrowser, source: &SourceArgs) -> Result<Selection> {
        if let Some(name) = &source.preset {
            let preset =
                find_preset(name).ok_or_else(|| CliError::not_found(format!("preset \"{name}\"")))?;
            return Ok(Selection {
                spec: preset.spec(),
                initial_query: String::new(),
                label: preset.name.to_string(),
            });
        }
        if let Some(name) = &source.pack {
            let pack = find_pack(name).ok_or_else(|| CliError::not_found(format!("pack \"{name}\"")))?;
            return Ok(Selection {
                spec: pack.spec(),
                initial_query: pack.initial_query.to_string(),
                label: pack.name.to_string(),
            });
        }
        if let Some(index) = source.saved {
            let saved = browser.saved_sources().get(index).ok_or_else(|| {
                CliError::not_found(format!("saved source #{index}"))
            })?;
            return Ok(Selection {
                spec: SourceSpec::single(&saved.url),
                initial_query: String::new(),
                label: saved.name.clone(),
            });
        }
        let url = source.url.as_deref().unwrap_or(&self.config.default_source);
        Ok(Selection {
            spec: SourceSpec::single(url),
            initial_query: String::new(),
            label: url.to_string(),
        })
    }

    async fn load(&self, browser: &mut CliBrowser, source: &SourceArgs) -> Result<()> {
        let selection = self.resolve(browser, source)?;
        debug!(label = %selection.label, spec = ?selection.spec, "Selecting source");

        let pb = self.create_progress_bar(&format!("Loading {}...", selection.label));
        let outcome = browser
            .select_source(selection.spec, &selection.initial_query)
            .await;
        pb.finish_and_clear();

        match outcome {
            LoadOutcome::Published(catalog) => {
                info!(
                    source = %selection.label,
                    channels = catalog.len(),
                    groups = catalog.groups().len(),
                    "Source loaded"
                );
                if catalog.is_empty() {
                    warn!(source = %selection.label, "Source returned no channels");
                }
                Ok(())
            }
            LoadOutcome::Superseded => Err(CliError::invalid_input("source load was superseded")),
        }
    }

    fn create_progress_bar(&self, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(120));
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb
    }
}

/// Drives the player until it is playing, has failed or was closed.
/// Callers bound this with a timeout; a silent engine never settles.
async fn settle(browser: &mut CliBrowser) {
    while matches!(
        browser.playback_state().state,
        PlaybackState::Attaching | PlaybackState::Recovering
    ) {
        browser.player_mut().process_next().await;
    }
}
