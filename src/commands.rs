//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the library services.
//! Each handler takes CLI args, the loaded config and Output, returns ExitCode.

use serde::Serialize;

use crate::ambient::{FilePrefs, ThemeController, ThemeMode};
use crate::cli::{
    validate_animal_id, AnimalsCmd, ExitCode, Output, SayCmd, SpeakCmd, SpokenResponse,
    ThemeAction, ThemeCmd, ThemeResponse, TtsInfoCmd,
};
use crate::config::Config;
use crate::content::{ContentProvider, EntitySource};
use crate::error::AppError;
use crate::models::Entity;
use crate::speech::SpeechService;

// =============================================================================
// Animals Command
// =============================================================================

/// Catalog listing with load diagnostics
#[derive(Debug, Serialize)]
struct AnimalsResponse<'a> {
    animals: &'a [Entity],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fallback: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
}

pub async fn animals_cmd(cmd: AnimalsCmd, config: &Config, output: &Output) -> ExitCode {
    let source = if cmd.embedded {
        EntitySource::EmbeddedOnly
    } else {
        config.entity_source()
    };
    output.info(format!("Loading animals from {:?}...", source));

    let (catalog, report) = ContentProvider::new(source)
        .load_catalog_with_report()
        .await;

    for err in report.errors() {
        output.info(format!("warning: {}", err));
    }

    if catalog.is_empty() {
        return output.error("No animals could be loaded", ExitCode::NoData);
    }

    if output.json {
        let response = AnimalsResponse {
            animals: catalog.entities(),
            fallback: report.from_fallback,
            missing: report.missing,
        };
        if let Err(e) = output.print(&response) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for entity in &catalog {
            output.line(format!("{}  {:<12} {}", entity.icon, entity.name, entity.sound));
        }
        if !report.from_fallback.is_empty() {
            output.info(format!(
                "{} of {} from built-in data",
                report.from_fallback.len(),
                catalog.len()
            ));
        }
    }
    ExitCode::Success
}

// =============================================================================
// Say Command
// =============================================================================

pub async fn say_cmd(cmd: SayCmd, config: &Config, output: &Output) -> ExitCode {
    let id = match validate_animal_id(&cmd.id) {
        Ok(id) => id.to_lowercase(),
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };

    let catalog = ContentProvider::with_ids(config.entity_source(), [id.clone()])
        .load_catalog()
        .await;
    let Some(entity) = catalog.get(&id) else {
        return output.error(
            AppError::DataUnavailable { id }.to_string(),
            ExitCode::NoData,
        );
    };

    speak_and_report(&config.speech_service(), &entity.prompt(), output).await
}

// =============================================================================
// Speak Command
// =============================================================================

pub async fn speak_cmd(cmd: SpeakCmd, config: &Config, output: &Output) -> ExitCode {
    let text = cmd.text.trim();
    if text.is_empty() {
        return output.error("Nothing to speak", ExitCode::InvalidArgs);
    }

    speak_and_report(&config.speech_service(), text, output).await
}

async fn speak_and_report(speech: &SpeechService, text: &str, output: &Output) -> ExitCode {
    output.info(format!("Speaking: {}", text));

    match speech.speak(text).await {
        Ok(()) => {
            if output.json {
                let response = SpokenResponse {
                    status: "spoken".to_string(),
                    text: text.to_string(),
                    locale: speech.locale().to_string(),
                };
                if let Err(e) = output.print(&response) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            }
            ExitCode::Success
        }
        Err(e) => output.error(AppError::from(e).to_string(), ExitCode::SpeechFailed),
    }
}

// =============================================================================
// TTS Info Command
// =============================================================================

pub async fn tts_info_cmd(_cmd: TtsInfoCmd, config: &Config, output: &Output) -> ExitCode {
    let speech = config.speech_service();
    let caps = speech.query_capabilities().await;

    if output.json {
        if let Err(e) = output.print(&caps) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        match caps.engine {
            Some(engine) => {
                output.line(format!("engine:  {}", engine));
                output.line(format!("locale:  {}", speech.locale()));
                output.line(format!("voices:  {}", caps.supported_locales.join(", ")));
            }
            None => output.line("speech synthesis unavailable"),
        }
    }

    if caps.available {
        ExitCode::Success
    } else {
        ExitCode::SpeechFailed
    }
}

// =============================================================================
// Theme Command
// =============================================================================

pub async fn theme_cmd(cmd: ThemeCmd, config: &Config, output: &Output) -> ExitCode {
    let Some(path) = config.prefs_path() else {
        return output.error("Could not determine preferences path", ExitCode::Error);
    };
    let prefs_path = path.display().to_string();
    let mut theme = ThemeController::init(Box::new(FilePrefs::open(path)));

    match cmd.action {
        None => {}
        Some(ThemeAction::Toggle) => {
            theme.toggle();
        }
        Some(ThemeAction::Light) => theme.set(ThemeMode::Light),
        Some(ThemeAction::Dark) => theme.set(ThemeMode::Dark),
    }

    if output.json {
        let response = ThemeResponse {
            theme: theme.mode().to_string(),
            prefs_path: Some(prefs_path),
        };
        if let Err(e) = output.print(&response) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        output.line(theme.mode());
    }
    ExitCode::Success
}
