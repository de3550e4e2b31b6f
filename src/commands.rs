//! CLI command definitions
//!
//! Defines the clap commands for the replay CLI.

use clap::Subcommand;
use std::path::PathBuf;

use crate::common::config::ResetPolicy;

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a registration workflow against the client's webhook
    #[command(alias = "registration")]
    Regis {
        /// Client to test; reads <client>.json and <base>_config.json
        #[arg(long, short)]
        client: String,

        /// Workflow to replay
        #[arg(long, short)]
        workflow: String,

        /// Language used to translate answers
        #[arg(long, short, default_value = "en")]
        language: String,

        /// Country selecting the webhook query string
        #[arg(long, short = 'C', default_value = "US")]
        country: String,

        /// Image variant; sends the scenario's media_<variant> URL
        #[arg(long, short)]
        image: Option<String>,

        /// Directory holding the client files
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Session reset policy (overrides the settings file)
        #[arg(long, value_enum)]
        reset: Option<ResetPolicy>,

        /// Abort when the endpoint replies with an empty message
        #[arg(long)]
        strict: bool,
    },

    /// Talk to the conversational agent directly
    #[command(subcommand)]
    Dialogflow(DialogflowCommands),
}

#[derive(Subcommand)]
pub enum DialogflowCommands {
    /// Send a text to the agent and print its reply
    Text {
        /// Client whose config holds the agent profile
        #[arg(long, short)]
        client: String,

        /// Agent environment (profile name in the client config)
        #[arg(long, short, default_value = "dev")]
        env: String,

        /// Query language
        #[arg(long, short, default_value = "en")]
        language: String,

        /// Text to send
        #[arg(long, short)]
        text: String,

        /// Input context to activate for this query
        #[arg(long)]
        context: Option<String>,

        /// Bearer token for the agent API
        #[arg(long)]
        token: Option<String>,

        /// Directory holding the client files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Delete every context of the client's session
    #[command(alias = "deleteAllContexts")]
    DeleteAllContexts {
        /// Client whose config holds the agent profile
        #[arg(long, short)]
        client: String,

        /// Agent environment (profile name in the client config)
        #[arg(long, short, default_value = "dev")]
        env: String,

        /// Bearer token for the agent API
        #[arg(long)]
        token: Option<String>,

        /// Directory holding the client files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}
