use anyhow::Result;
use batchtranslate::client::TranslationClient;
use batchtranslate::config::{Config, RuntimeMode};
use batchtranslate::languages::{languages, position};
use batchtranslate::response::Translation;
use batchtranslate::transcript::{format_entry, status_line};
use batchtranslate::web::server::create_server;
use batchtranslate::web::state::ServiceState;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

// Runtime struct that holds configuration for the selected mode
pub struct Runtime {
    config: Config,
}

impl Runtime {
    /**
     * Creates a new runtime context
     */
    pub fn new() -> Result<Runtime> {
        let config = Config::parse()?;

        Ok(Runtime { config })
    }

    pub fn run(&mut self) -> Result<()> {
        match self.config.runtime_mode {
            RuntimeMode::Translate => self.translate_mode()?,
            RuntimeMode::Follow => self.follow_mode()?,
            RuntimeMode::Serve => self.serve_mode()?,
            RuntimeMode::ListLanguages => self.list_languages()?,
        }

        Ok(())
    }

    // Translates a single text given as an argument or piped through stdin
    fn translate_mode(&self) -> Result<()> {
        let text = match &self.config.text {
            Some(text) => text.clone(),
            None => io::read_to_string(io::stdin())?
                .trim_end_matches(['\r', '\n'])
                .to_string(),
        };

        if !self.config.translation_enabled {
            println!("{text}");
            return Ok(());
        }

        let client = TranslationClient::new(self.config.client.clone())?;
        let translation = self.translate(&client, &text)?;

        println!("{translation}");

        Ok(())
    }

    // Every stdin line is treated as newly captured text and appended to the transcript
    fn follow_mode(&self) -> Result<()> {
        eprintln!(
            "{}",
            status_line(self.config.translation_enabled, &self.config.dest_lang)
        );

        let client = TranslationClient::new(self.config.client.clone())?;
        let stdout = io::stdout();

        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let translated = if self.config.translation_enabled {
                match self.translate(&client, &line) {
                    Ok(translation) => translation.text,
                    Err(e) => {
                        error!("Error translating captured text: {e}");
                        String::new()
                    }
                }
            } else {
                String::new()
            };

            let mut handle = stdout.lock();
            handle.write_all(format_entry(&line, &translated).as_bytes())?;
            handle.flush()?;
        }

        Ok(())
    }

    // The client is built outside the async runtime and outlives it
    fn serve_mode(&self) -> Result<()> {
        let addr = match self.config.serve_addr {
            Some(addr) => addr,
            None => anyhow::bail!("Serve mode needs an address to listen on."),
        };

        let state = Arc::new(ServiceState {
            client: TranslationClient::new(self.config.client.clone())?,
            default_dest: self.config.dest_lang.clone(),
            default_src: self.config.src_lang.clone(),
        });

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let server = create_server(&addr, Arc::clone(&state))?;
            info!(
                endpoint = state.client.endpoint(),
                "Listening on {}",
                server.local_addr()
            );
            server.await?;

            Ok::<(), anyhow::Error>(())
        })?;

        Ok(())
    }

    // The configured destination is marked with a trailing asterisk
    fn list_languages(&self) -> Result<()> {
        let current = position(&self.config.dest_lang);
        let mut handle = io::stdout().lock();

        for (index, (code, name)) in languages().enumerate() {
            if Some(index) == current {
                writeln!(handle, "{code}\t{name}\t*")?;
            } else {
                writeln!(handle, "{code}\t{name}")?;
            }
        }

        Ok(())
    }

    // Strict mode surfaces decode failures instead of printing the placeholder text
    fn translate(&self, client: &TranslationClient, text: &str) -> Result<Translation> {
        let translation = if self.config.strict {
            client.try_translate(text, &self.config.dest_lang, &self.config.src_lang)?
        } else {
            client.translate(text, &self.config.dest_lang, &self.config.src_lang)?
        };

        Ok(translation)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(true)
                .with_line_number(true),
        )
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let before = Instant::now();

    let run = || -> Result<()> {
        let mut runtime = Runtime::new()?;
        runtime.run()?;
        Ok(())
    };

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }

    debug!("Finished in {:.2?}", before.elapsed());

    Ok(())
}
