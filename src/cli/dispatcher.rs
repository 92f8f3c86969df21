use crate::api::client::StoryboardClient;
use crate::api::models::Style;
use crate::cli::main_types::{Commands, ConfigCommands};
use crate::core::estimates::{FrameDensity, estimate};
use crate::core::navigation::{WorkflowStep, breadcrumb};
use crate::core::poller::{PollConfig, PollOutcome};
use crate::core::services::workflow_service::WorkflowService;
use crate::display::{
    ProgressView, TableDisplay, ToastCenter, ToastKind, UploadSpinner, print_progress,
};
use crate::error::{AppError, CliError, ConfigError};
use crate::storage::config::{Config, Profile};
use crate::storage::session::{CURRENT_PROJECT_KEY, SessionStore};
use crate::utils::format::format_time;
use crate::utils::retry::with_retry;
use crate::utils::validation::validate_url;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Dispatcher {
    config: Config,
    profile_name: String,
    base_url_override: Option<String>,
    config_path: Option<PathBuf>,
    session_path: Option<PathBuf>,
    verbose: bool,
    toasts: RefCell<ToastCenter>,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        profile_name: String,
        base_url_override: Option<String>,
        config_dir: Option<&Path>,
        verbose: bool,
    ) -> Self {
        let app_dir = config_dir
            .map(Path::to_path_buf)
            .or_else(|| Config::app_dir().ok());

        Self {
            config,
            profile_name,
            base_url_override,
            config_path: config_dir.map(|dir| dir.join("config.toml")),
            session_path: app_dir.map(|dir| dir.join("session.json")),
            verbose,
            toasts: RefCell::new(ToastCenter::new()),
        }
    }

    fn log_verbose(&self, msg: &str) {
        if self.verbose {
            log::debug!("{}", msg);
        }
    }

    /// Show a toast for an error that is about to end the command
    pub fn report_error(&self, error: &AppError) {
        self.toast(&error.display_friendly(), ToastKind::Error);
        if let Some(hint) = error.troubleshooting_hint() {
            eprintln!(" {} {}", error.severity().emoji(), hint);
        }
    }

    fn toast(&self, message: &str, kind: ToastKind) {
        let mut toasts = self.toasts.borrow_mut();
        toasts.prune(std::time::Instant::now());
        toasts.show(message, kind);
    }

    fn profile(&self) -> Profile {
        self.config
            .get_profile(&self.profile_name)
            .cloned()
            .unwrap_or_default()
    }

    fn base_url(&self) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| self.profile().base_url)
    }

    fn client(&self) -> Result<StoryboardClient, AppError> {
        let base_url = self.base_url();
        validate_url(&base_url)?;
        self.log_verbose(&format!("Using server {}", base_url));

        let client = match self.profile().timeout_seconds {
            Some(secs) => StoryboardClient::with_timeout(base_url, secs)?,
            None => StoryboardClient::new(base_url)?,
        };
        Ok(client)
    }

    fn load_session(&self) -> SessionStore {
        let Some(path) = &self.session_path else {
            return SessionStore::new();
        };
        match SessionStore::load_from(path) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Ignoring unreadable session file: {}", e);
                SessionStore::new()
            }
        }
    }

    fn remember_project(&self, project_id: &str) -> Result<(), AppError> {
        let mut session = self.load_session();
        session.set(CURRENT_PROJECT_KEY, project_id);
        if let Some(path) = &self.session_path {
            session.save_to(path)?;
        }
        Ok(())
    }

    /// Explicit id wins; otherwise the last project this session touched
    fn resolve_project(&self, project_id: Option<String>) -> Result<String, AppError> {
        project_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.load_session().get::<String>(CURRENT_PROJECT_KEY))
            .ok_or_else(|| {
                CliError::NoProject {
                    hint: "Pass a project id or run 'sbc upload <file>' first".to_string(),
                }
                .into()
            })
    }

    fn show_step(&self, step: WorkflowStep) {
        println!("{}", breadcrumb(Some(step)));
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Health => self.handle_health().await,
            Commands::Upload { file } => self.handle_upload(&file).await,
            Commands::Generate { project_id, style } => {
                self.handle_generate(project_id, style).await
            }
            Commands::Status { project_id } => self.handle_status(project_id).await,
            Commands::Watch {
                project_id,
                interval_ms,
                timeout_secs,
                max_failures,
            } => {
                self.handle_watch(project_id, interval_ms, timeout_secs, max_failures)
                    .await
            }
            Commands::Estimate {
                max_scenes,
                density,
            } => self.handle_estimate(max_scenes, &density),
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    async fn handle_health(&self) -> Result<(), AppError> {
        let client = self.client()?;
        let health = with_retry(|| client.health()).await?;

        let version = health.version.as_deref().unwrap_or("unknown");
        let checked_at = format_time(health.timestamp.as_deref());
        if !checked_at.is_empty() {
            println!("Server time: {}", checked_at);
        }
        if health.is_healthy() {
            self.toast(
                &format!("Server is healthy (version {})", version),
                ToastKind::Success,
            );
        } else {
            self.toast(
                &format!("Server reports '{}' (version {})", health.status, version),
                ToastKind::Warning,
            );
        }
        Ok(())
    }

    async fn handle_upload(&self, file: &Path) -> Result<(), AppError> {
        self.show_step(WorkflowStep::Upload);
        let service = WorkflowService::new(self.client()?);

        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());
        let size = std::fs::metadata(file).ok().map(|meta| meta.len());

        let mut spinner = UploadSpinner::new(&file_name, size);
        spinner.start();
        let result = service.upload_screenplay(file).await;
        let elapsed = spinner.finish();

        let upload = result?;
        log::debug!("Upload of {} took {:?}", file_name, elapsed);
        self.remember_project(&upload.project_id)?;

        println!("{}", TableDisplay::new().render_upload(&upload));
        self.toast(
            &format!(
                "Uploaded {} - {} scenes detected",
                upload.filename, upload.detected_scenes
            ),
            ToastKind::Success,
        );
        Ok(())
    }

    async fn handle_generate(&self, project_id: Option<String>, style: Style) -> Result<(), AppError> {
        self.show_step(WorkflowStep::Generate);
        let project_id = self.resolve_project(project_id)?;
        let service = WorkflowService::new(self.client()?);

        let response = service.start_generation(&project_id, style).await?;
        self.remember_project(&response.project_id)?;

        let message = response
            .message
            .unwrap_or_else(|| "Generation started".to_string());
        self.toast(
            &format!("{} for project {}", message, response.project_id),
            ToastKind::Success,
        );
        println!("Follow progress with: sbc watch {}", response.project_id);
        Ok(())
    }

    async fn handle_status(&self, project_id: Option<String>) -> Result<(), AppError> {
        let project_id = self.resolve_project(project_id)?;
        let client = self.client()?;
        let status = with_retry(|| client.status(&project_id)).await?;

        let view = ProgressView::from_status(&status);
        println!("{}", view.title);
        println!("{}", view.render_line(crate::display::progress::DEFAULT_BAR_WIDTH));
        if let Some(error) = &status.error {
            self.toast(error, ToastKind::Error);
        }
        if !status.frames.is_empty() {
            println!("{}", TableDisplay::new().render_frames(&status.frames));
        }
        Ok(())
    }

    async fn handle_watch(
        &self,
        project_id: Option<String>,
        interval_ms: Option<u64>,
        timeout_secs: u64,
        max_failures: u32,
    ) -> Result<(), AppError> {
        self.show_step(WorkflowStep::Processing);
        let project_id = self.resolve_project(project_id)?;
        let service = WorkflowService::new(self.client()?);

        let interval = interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.profile().poll_interval());
        let config = PollConfig::with_interval(interval)
            .timeout(Some(Duration::from_secs(timeout_secs)))
            .max_consecutive_failures(max_failures);

        let poller = service.watch(&project_id, config);
        let stop = poller.stop_handle();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.stop();
            }
        });

        let outcome = poller.run(print_progress).await;
        ctrl_c.abort();
        println!();

        match outcome? {
            PollOutcome::Completed(status) => {
                self.toast(
                    &format!("Generation complete! Created {} frames.", status.frames.len()),
                    ToastKind::Success,
                );
                println!("{}", TableDisplay::new().render_frames(&status.frames));
                Ok(())
            }
            PollOutcome::Failed(status) => Err(CliError::JobFailed {
                reason: status
                    .error
                    .or(status.current_step)
                    .unwrap_or_else(|| "unknown error".to_string()),
            }
            .into()),
            PollOutcome::TimedOut { attempts } => Err(CliError::WatchTimedOut { attempts }.into()),
            PollOutcome::Stopped => {
                self.toast("Stopped watching; generation continues on the server", ToastKind::Info);
                Ok(())
            }
        }
    }

    fn handle_estimate(&self, max_scenes: u32, density: &str) -> Result<(), AppError> {
        let density: FrameDensity = density
            .parse()
            .map_err(CliError::InvalidArguments)?;
        let result = estimate(max_scenes, density);
        println!(
            "{} scenes at {} density: ~{} frames, ~{} min",
            max_scenes, density, result.frames, result.minutes
        );
        Ok(())
    }

    fn handle_config_command(&self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let profile = self.profile();
                println!("Profile:        {}", self.profile_name);
                println!("Server URL:     {}", self.base_url());
                println!(
                    "Timeout:        {}s",
                    profile
                        .timeout_seconds
                        .unwrap_or(crate::api::client::DEFAULT_TIMEOUT_SECS)
                );
                println!("Poll interval:  {:?}", profile.poll_interval());
                if let Some(path) = &self.session_path {
                    println!("Session file:   {}", path.display());
                }
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let mut config = self.config.clone();
                let mut profile = self.profile();
                apply_setting(&mut profile, &key, &value)?;
                config.set_profile(self.profile_name.clone(), profile);
                if config.default_profile.is_none() {
                    config.default_profile = Some(self.profile_name.clone());
                }
                config.save(self.config_path.clone())?;
                self.toast(&format!("Set {} = {}", key, value), ToastKind::Success);
                Ok(())
            }
        }
    }
}

/// Apply one `config set` key to a profile
pub fn apply_setting(profile: &mut Profile, key: &str, value: &str) -> Result<(), AppError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        field: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match key {
        "url" => {
            validate_url(value)?;
            profile.base_url = value.trim_end_matches('/').to_string();
        }
        "timeout" => {
            let secs: u64 = value
                .parse()
                .map_err(|_| invalid("expected whole seconds"))?;
            profile.timeout_seconds = Some(secs);
        }
        "poll-interval" => {
            let ms: u64 = value
                .parse()
                .map_err(|_| invalid("expected milliseconds"))?;
            if ms == 0 {
                return Err(invalid("must be greater than zero").into());
            }
            profile.poll_interval_ms = Some(ms);
        }
        _ => {
            return Err(ConfigError::UnknownKey {
                key: key.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dispatcher_in(dir: &Path) -> Dispatcher {
        Dispatcher::new(
            Config::default(),
            "default".to_string(),
            Some("http://example.test".to_string()),
            Some(dir),
            false,
        )
    }

    #[test]
    fn test_apply_setting() {
        let mut profile = Profile::default();
        apply_setting(&mut profile, "url", "https://boards.example/").expect("url");
        apply_setting(&mut profile, "timeout", "45").expect("timeout");
        apply_setting(&mut profile, "poll-interval", "750").expect("interval");

        assert_eq!(profile.base_url, "https://boards.example");
        assert_eq!(profile.timeout_seconds, Some(45));
        assert_eq!(profile.poll_interval_ms, Some(750));
    }

    #[test]
    fn test_apply_setting_rejects_bad_input() {
        let mut profile = Profile::default();
        assert!(matches!(
            apply_setting(&mut profile, "colour", "blue"),
            Err(AppError::Config(ConfigError::UnknownKey { .. }))
        ));
        assert!(matches!(
            apply_setting(&mut profile, "timeout", "soon"),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(apply_setting(&mut profile, "poll-interval", "0").is_err());
        assert!(matches!(
            apply_setting(&mut profile, "url", "localhost"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_project_prefers_argument_then_session() {
        let dir = tempdir().expect("Failed to create temp dir");
        let dispatcher = dispatcher_in(dir.path());

        assert!(matches!(
            dispatcher.resolve_project(None),
            Err(AppError::Cli(CliError::NoProject { .. }))
        ));

        dispatcher.remember_project("p-7").expect("remember");
        assert_eq!(dispatcher.resolve_project(None).expect("from session"), "p-7");
        assert_eq!(
            dispatcher
                .resolve_project(Some("p-8".to_string()))
                .expect("explicit"),
            "p-8"
        );
        assert_eq!(
            dispatcher
                .resolve_project(Some(" ".to_string()))
                .expect("blank falls back"),
            "p-7"
        );
    }

    #[test]
    fn test_base_url_override_wins() {
        let dir = tempdir().expect("Failed to create temp dir");
        let dispatcher = dispatcher_in(dir.path());
        assert_eq!(dispatcher.base_url(), "http://example.test");
    }

    #[tokio::test]
    async fn test_estimate_rejects_unknown_density() {
        let dir = tempdir().expect("Failed to create temp dir");
        let dispatcher = dispatcher_in(dir.path());
        let result = dispatcher
            .dispatch(Commands::Estimate {
                max_scenes: 4,
                density: "ultra".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Cli(CliError::InvalidArguments(_)))));
    }

    #[tokio::test]
    async fn test_config_set_writes_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let dispatcher = dispatcher_in(dir.path());
        dispatcher
            .dispatch(Commands::Config {
                command: ConfigCommands::Set {
                    key: "poll-interval".to_string(),
                    value: "500".to_string(),
                },
            })
            .await
            .expect("config set");

        let saved = Config::load(Some(dir.path().join("config.toml"))).expect("load");
        assert_eq!(saved.default_profile.as_deref(), Some("default"));
        assert_eq!(
            saved.get_profile("default").and_then(|p| p.poll_interval_ms),
            Some(500)
        );
    }
}
