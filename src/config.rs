use crate::client::ClientConfig;
use crate::request::{AUTO_LANG, DEFAULT_DEST_LANG};
use crate::utils::validation;
use anyhow::{bail, ensure, Result};
use clap::Parser;
use ini::Ini;
use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::instrument;

const TRANSLATE_SECTION: &str = "Translate";
const CLIENT_SECTION: &str = "Client";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeMode {
    Translate,
    Follow,
    Serve,
    ListLanguages,
}

#[derive(Debug)]
pub struct Config {
    pub runtime_mode: RuntimeMode,
    pub text: Option<String>,
    pub dest_lang: String,
    pub src_lang: String,
    pub translation_enabled: bool,
    pub strict: bool,
    pub serve_addr: Option<SocketAddr>,
    pub client: ClientConfig,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(help = "Text to translate. If omitted, the text is read from stdin")]
    pub text: Option<String>,
    #[arg(
        short,
        long,
        help = "Destination language code. Falls back to the settings file, then 'en'"
    )]
    pub dest: Option<String>,
    #[arg(short, long, help = "Source language code, or 'auto' to let the endpoint detect it")]
    pub src: Option<String>,
    #[arg(
        short,
        long,
        help = "[Optional] Request timeout in milliseconds. Without it a stalled connection waits forever"
    )]
    pub timeout: Option<u64>,
    #[arg(short, long, help = "[Optional] Path to an INI settings file")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "[Optional] Override the batchexecute endpoint URL")]
    pub endpoint: Option<String>,
    #[arg(
        long,
        value_name = "ADDR",
        conflicts_with_all = ["follow", "languages"],
        help = "Serve translations over HTTP on the given address"
    )]
    pub serve: Option<SocketAddr>,
    #[arg(
        long,
        conflicts_with = "languages",
        help = "Translate every line read from stdin and print a running transcript"
    )]
    pub follow: bool,
    #[arg(long, help = "List the supported language codes and exit")]
    pub languages: bool,
    #[arg(long, help = "Echo captured text without translating it")]
    pub no_translate: bool,
    #[arg(
        long,
        help = "Exit with an error instead of printing the placeholder when a response cannot be decoded"
    )]
    pub strict: bool,
}

/// Values read from the settings file. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub translation_enabled: Option<bool>,
    pub destination_language: Option<String>,
    pub source_language: Option<String>,
    pub timeout_millis: Option<u64>,
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings> {
        let ini = Ini::load_from_file(path)?;

        Self::from_ini(&ini)
    }

    pub fn parse_str(contents: &str) -> Result<Settings> {
        let ini = Ini::load_from_str(contents)?;

        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(section) = ini.section(Some(TRANSLATE_SECTION)) {
            if let Some(enabled) = section.get("translation_enabled") {
                settings.translation_enabled = Some(Self::parse_bool(enabled)?);
            }
            settings.destination_language = section.get("destination_language").map(String::from);
            settings.source_language = section.get("source_language").map(String::from);
        }

        if let Some(section) = ini.section(Some(CLIENT_SECTION)) {
            if let Some(timeout) = section.get("timeout_millis") {
                match timeout.trim().parse::<u64>() {
                    Ok(millis) => settings.timeout_millis = Some(millis),
                    Err(_) => bail!("timeout_millis must be a whole number, got '{timeout}'."),
                }
            }
            settings.endpoint = section.get("endpoint").map(String::from);
            settings.user_agent = section.get("user_agent").map(String::from);
        }

        Ok(settings)
    }

    fn parse_bool(value: &str) -> Result<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => bail!("translation_enabled must be true or false, got '{value}'."),
        }
    }
}

impl Config {
    #[instrument(name = "config_parse")]
    pub fn parse() -> Result<Config> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_args<I, T>(args: I) -> Result<Config>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_cli(Cli::try_parse_from(args)?)
    }

    fn from_cli(cli: Cli) -> Result<Config> {
        let settings = match &cli.config {
            Some(path) => Self::load_settings(path)?,
            None => Settings::default(),
        };

        let runtime_mode = Self::get_runtime_mode(&cli);

        // CLI flags win over the settings file, which wins over the defaults
        let dest_lang = cli
            .dest
            .or(settings.destination_language)
            .unwrap_or_else(|| DEFAULT_DEST_LANG.to_string());
        let src_lang = cli
            .src
            .or(settings.source_language)
            .unwrap_or_else(|| AUTO_LANG.to_string());

        validation::validate_dest_lang(&dest_lang)?;
        validation::validate_src_lang(&src_lang)?;

        let mut client = ClientConfig::default();

        if let Some(endpoint) = cli.endpoint.or(settings.endpoint) {
            validation::validate_endpoint(&endpoint)?;
            client = client.with_endpoint(endpoint);
        }

        if let Some(user_agent) = settings.user_agent {
            ensure!(!user_agent.trim().is_empty(), "User agent cannot be empty.");
            client = client.with_user_agent(user_agent);
        }

        if let Some(millis) = cli.timeout.or(settings.timeout_millis) {
            validation::validate_timeout(millis)?;
            client = client.with_timeout_millis(millis);
        }

        Ok(Config {
            runtime_mode,
            text: cli.text,
            dest_lang,
            src_lang,
            translation_enabled: !cli.no_translate && settings.translation_enabled.unwrap_or(true),
            strict: cli.strict,
            serve_addr: cli.serve,
            client,
        })
    }

    fn load_settings(path: &Path) -> Result<Settings> {
        validation::validate_settings(path)?;

        if !path.is_file() {
            bail!("Settings file {} does not exist.", path.display());
        }

        Settings::load(path)
    }

    fn get_runtime_mode(cli: &Cli) -> RuntimeMode {
        if cli.languages {
            RuntimeMode::ListLanguages
        } else if cli.serve.is_some() {
            RuntimeMode::Serve
        } else if cli.follow {
            RuntimeMode::Follow
        } else {
            RuntimeMode::Translate
        }
    }
}
