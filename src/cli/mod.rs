//! CLI command handling
//!
//! Loads settings and client files, then hands off to playback or the
//! agent client.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use tracing::info;

use crate::agent::{self, AgentClient, AgentSession};
use crate::commands::{Commands, DialogflowCommands};
use crate::common::config::{ResetPolicy, Settings};
use crate::common::{paths, Result};
use crate::playback::{
    self, ClientConfig, HttpTransport, PlaybackOptions, RunOptions, ScenarioFile, TestRun,
};
use crate::printer;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    let settings = Settings::load()?;
    let timeout = Duration::from_secs(settings.http.timeout_secs);

    match command {
        Commands::Regis {
            client,
            workflow,
            language,
            country,
            image,
            dir,
            reset,
            strict,
        } => {
            info!("Registration start");
            info!("Client: {}", client);
            info!("Workflow: {}", workflow);
            info!("Language: {}", language);
            info!("Country: {}", country);

            let scenario = ScenarioFile::load(&paths::scenario_path(&dir, &client))?;
            let config = ClientConfig::load(&paths::client_config_path(&dir, &client))?;
            let test_run = TestRun::prepare(
                &scenario,
                &config,
                &RunOptions {
                    workflow: &workflow,
                    language: &language,
                    country: &country,
                    image: image.as_deref(),
                },
            )?;

            let options = PlaybackOptions {
                reset: reset.unwrap_or(settings.playback.reset),
                strict: strict || settings.playback.strict,
            };
            if options.reset == ResetPolicy::Strict {
                info!("Session reset failures will abort the run");
            }

            let transport = HttpTransport::new(timeout)?;
            let report = playback::run(&transport, &test_run, &options).await?;

            if report.failed() > 0 {
                println!(
                    "{} {} of {} steps failed",
                    "!".yellow().bold(),
                    report.failed(),
                    report.steps.len()
                );
            }
            Ok(())
        }

        Commands::Dialogflow(cmd) => match cmd {
            DialogflowCommands::Text {
                client,
                env,
                language,
                text,
                context,
                token,
                dir,
            } => {
                info!("Client: {}", client);
                info!("Language: {}", language);
                info!("Message: {}", text);

                let (agent, session) =
                    agent_session(&dir, &client, &env, token, &settings, timeout)?;
                let reply = agent
                    .detect_intent(&session, &text, &language, context.as_deref())
                    .await?;
                printer::show_question(&reply);
                Ok(())
            }

            DialogflowCommands::DeleteAllContexts {
                client,
                env,
                token,
                dir,
            } => {
                info!("Client: {}", client);

                let (agent, session) =
                    agent_session(&dir, &client, &env, token, &settings, timeout)?;
                agent.delete_all_contexts(&session).await?;
                info!("Delete contexts success");
                Ok(())
            }
        },
    }
}

/// Build the agent client and session for a client's profile
fn agent_session(
    dir: &Path,
    client: &str,
    env: &str,
    token: Option<String>,
    settings: &Settings,
    timeout: Duration,
) -> Result<(AgentClient, AgentSession)> {
    let scenario = ScenarioFile::load(&paths::scenario_path(dir, client))?;
    let config = ClientConfig::load(&paths::client_config_path(dir, client))?;
    let profile = config.agent_profile(env)?;

    let token = agent::resolve_token(token, profile)?;
    let session = AgentSession::new(profile, env, &scenario.from);
    let agent = AgentClient::new(&settings.agent.endpoint, token, timeout)?;
    Ok((agent, session))
}
