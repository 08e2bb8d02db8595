use crate::catalog;
use crate::cli::{Args, Mode};
use crate::clipboard::copy_to_clipboard;
use crate::config::Config;
use crate::core::error::MagicError;
use crate::display;
use crate::input;
use crate::prompt::build_system_prompt;
use crate::providers::{Completion, CompletionBackend, ModelDescriptor};
use crate::spinner::with_spinner;
use crate::system::EnvironmentFacts;
use clap::CommandFactory;
use console::style;
use std::time::Instant;

/// Entry point. Configuration is loaded only for the modes that need it, so a
/// broken config file never stops `version` or `help`.
pub async fn run<L, C>(args: Args, load_config: L, connect: C) -> Result<(), MagicError>
where
    L: FnOnce() -> Result<Config, MagicError>,
    C: FnOnce(&Config) -> Box<dyn CompletionBackend>,
{
    let config = if args.mode().needs_config() {
        load_config()?
    } else {
        Config::default()
    };
    let backend = connect(&config);

    Application::new(args, config, backend).run().await
}

pub struct Application {
    pub args: Args,
    pub config: Config,
    pub backend: Box<dyn CompletionBackend>,
}

impl Application {
    pub fn new(args: Args, config: Config, backend: Box<dyn CompletionBackend>) -> Self {
        Self {
            args,
            config,
            backend,
        }
    }

    pub async fn run(&self) -> Result<(), MagicError> {
        match self.args.mode() {
            Mode::Version => {
                display::display_version();
                Ok(())
            }
            Mode::Help => {
                Args::command().print_long_help()?;
                Ok(())
            }
            Mode::Rank => self.handle_rank_mode().await,
            Mode::Ask(query) => self.handle_ask_mode(query).await,
        }
    }

    async fn handle_ask_mode(&self, query: Option<String>) -> Result<(), MagicError> {
        // Checked before prompting so a missing key fails fast
        self.config.require_api_key()?;

        let query = match query {
            Some(query) => query,
            None => input::prompt_query()?,
        };

        let facts = EnvironmentFacts::detect();
        let started = Instant::now();
        let completion = self.ask(&query, &facts).await?;
        let elapsed = started.elapsed();

        if self.args.verbose {
            display::display_raw_json(&completion.raw);
        }
        display::display_answer(&completion, elapsed);
        copy_to_clipboard(&completion.text);

        Ok(())
    }

    /// Sends one completion request for `query` and returns the validated answer.
    pub async fn ask(
        &self,
        query: &str,
        facts: &EnvironmentFacts,
    ) -> Result<Completion, MagicError> {
        self.config.require_api_key()?;

        let model = self.config.model();
        let system_prompt = build_system_prompt(facts);
        tracing::debug!(model, "using model");
        tracing::debug!(query, "sending request to OpenRouter API");
        tracing::debug!("system prompt:\n\n{}", system_prompt);

        let message = format!(
            "Asking AI{}...",
            style(format!(" (using {})", model)).dim().italic()
        );
        with_spinner(
            message,
            !self.args.verbose,
            self.backend.complete(model, &system_prompt, query),
        )
        .await
    }

    async fn handle_rank_mode(&self) -> Result<(), MagicError> {
        let (ranked, free) = self.rank_catalog().await?;
        display::display_ranking("Top 10 sorted by context length", &ranked);
        display::display_ranking("Top 10 sorted by context length (free-only)", &free);
        Ok(())
    }

    /// Fetches the catalog once and derives both ranked views from it.
    pub async fn rank_catalog(
        &self,
    ) -> Result<(Vec<ModelDescriptor>, Vec<ModelDescriptor>), MagicError> {
        let models = with_spinner(
            "Fetching models...",
            !self.args.verbose,
            self.backend.list_models(),
        )
        .await?;

        let ranked = catalog::rank(models);
        let free = catalog::free_tier(&ranked);
        tracing::debug!(ranked = ranked.len(), free = free.len(), "ranked catalog");
        Ok((ranked, free))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::{Architecture, Pricing};
    use async_trait::async_trait;
    use clap::Parser;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(String, String, String)>>>;

    #[derive(Default, Clone)]
    struct FakeBackend {
        calls: Calls,
        catalog_calls: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl CompletionBackend for FakeBackend {
        async fn complete(
            &self,
            model: &str,
            system_prompt: &str,
            user_query: &str,
        ) -> Result<Completion, MagicError> {
            self.calls.lock().unwrap().push((
                model.to_string(),
                system_prompt.to_string(),
                user_query.to_string(),
            ));
            Ok(Completion {
                text: "du -sh * | sort -h".to_string(),
                total_tokens: Some(99),
                citations: vec![],
                raw: json!({}),
            })
        }

        async fn list_models(&self) -> Result<Vec<ModelDescriptor>, MagicError> {
            *self.catalog_calls.lock().unwrap() += 1;
            let model = |id: &str, ctx: u64, prompt: f64| ModelDescriptor {
                id: id.to_string(),
                name: id.to_string(),
                created: 0,
                context_length: ctx,
                architecture: Architecture {
                    input_modalities: vec!["text".to_string()],
                    output_modalities: vec!["text".to_string()],
                },
                pricing: Pricing {
                    prompt,
                    completion: prompt,
                },
            };
            Ok(vec![
                model("paid", 200_000, 0.000001),
                model("auto", 2_000_000, -1.0),
                model("free", 32_000, 0.0),
            ])
        }
    }

    fn broken_config() -> Result<Config, MagicError> {
        Err(MagicError::Config("Parse config.yaml: invalid type".to_string()))
    }

    #[tokio::test]
    async fn version_and_help_ignore_broken_config() {
        for argv in [["magiccommand", "version"], ["magiccommand", "help"]] {
            let args = Args::try_parse_from(argv).unwrap();
            let result = run(args, broken_config, |_| {
                Box::new(FakeBackend::default()) as Box<dyn CompletionBackend>
            })
            .await;
            assert!(result.is_ok(), "{argv:?}: {result:?}");
        }
    }

    #[tokio::test]
    async fn rank_reports_broken_config_before_fetching() {
        let backend = FakeBackend::default();
        let catalog_calls = backend.catalog_calls.clone();
        let args = Args::try_parse_from(["magiccommand", "rank"]).unwrap();

        let err = run(args, broken_config, move |_| {
            Box::new(backend) as Box<dyn CompletionBackend>
        })
            .await
            .unwrap_err();
        assert!(matches!(err, MagicError::Config(_)));
        assert_eq!(*catalog_calls.lock().unwrap(), 0);
    }

    fn app(config: Config, backend: FakeBackend) -> Application {
        let args = Args::try_parse_from(["magiccommand", "-V", "disk", "usage"]).unwrap();
        Application::new(args, config, Box::new(backend))
    }

    fn facts() -> EnvironmentFacts {
        EnvironmentFacts {
            os_name: "linux".to_string(),
            os_arch: "aarch64".to_string(),
            os_version: "6.1".to_string(),
            home_dir: "/home/dev".to_string(),
            shell: Some("/bin/bash".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ask_sends_prompt_and_query_to_configured_model() {
        let config = Config {
            api_key: Some("key".to_string()),
            model: Some("vendor/model".to_string()),
            base_url: None,
        };
        let backend = FakeBackend::default();
        let calls = backend.calls.clone();
        let app = app(config, backend);

        let completion = app.ask("what uses my disk", &facts()).await.unwrap();
        assert_eq!(completion.text, "du -sh * | sort -h");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (model, system_prompt, query) = &calls[0];
        assert_eq!(model, "vendor/model");
        assert_eq!(query, "what uses my disk");
        assert!(system_prompt.contains("- Shell: /bin/bash"));
    }

    #[tokio::test]
    async fn ask_without_key_never_calls_backend() {
        let backend = FakeBackend::default();
        let calls = backend.calls.clone();
        let app = app(Config::default(), backend);

        let err = app.ask("anything", &facts()).await.unwrap_err();
        assert!(matches!(err, MagicError::Config(_)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rank_catalog_builds_both_views_from_one_fetch() {
        let backend = FakeBackend::default();
        let catalog_calls = backend.catalog_calls.clone();
        let app = app(Config::default(), backend);
        let (ranked, free) = app.rank_catalog().await.unwrap();

        assert_eq!(*catalog_calls.lock().unwrap(), 1);

        let ids: Vec<_> = ranked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["paid", "free"]);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, "free");
    }
}
