//! Terminal front end for the interview-prep catalog.
//!
//! Usage:
//!   prep topics [QUERY]
//!   prep questions "Java Core" Collections --details
//!   prep search arraylist
//!   prep search "backed by" --remote
//!   prep open arraylist --index 1
//!   prep login --username admin --password admin
//!   prep delete-question "Java Core" Collections --text "What is ArrayList?"
//!
//! Each invocation loads the catalog once (falling back to the built-in
//! dataset when the backend is unreachable). Admin subcommands restore the
//! signed-in user from the stored token and require the ADMIN authority.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use interview_catalog::gateway::RegistrationRequest;
use interview_catalog::render::{
    render_questions, render_remote_hits, render_search, render_subtopics, render_topics,
};
use interview_catalog::{
    Command, Config, Gateway, HttpTransport, QuestionDraft, QuestionKey, QuestionSelector,
    QuestionTarget, SearchKind, Session, TokenStore, init_tracing,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prep", version)]
#[command(about = "Browse and edit the interview-prep question catalog")]
struct Cli {
    /// Backend base URL; overrides PREP_API_BASE_URL.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Directory for the stored auth token; overrides PREP_STATE_DIR.
    #[arg(long, global = true, value_name = "PATH")]
    state_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List topics, optionally filtered.
    Topics { query: Option<String> },
    /// List the subtopics of a topic.
    Subtopics { topic: String, query: Option<String> },
    /// List questions of a subtopic with their quick answers.
    Questions {
        topic: String,
        subtopic: String,
        query: Option<String>,
        /// Also show detailed answers.
        #[arg(long)]
        details: bool,
        /// Also show code examples.
        #[arg(long)]
        code: bool,
    },
    /// Search topics, subtopics and questions at once.
    Search {
        query: String,
        #[arg(long)]
        json: bool,
        /// Ask the backend instead; it also matches answer text.
        #[arg(long)]
        remote: bool,
    },
    /// Search, then drill into one result.
    Open {
        query: String,
        /// 1-based position in the result list.
        #[arg(long, default_value_t = 1)]
        index: usize,
    },
    /// Print the whole catalog as JSON.
    Export,
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "PREP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PREP_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Logout,
    /// Show the signed-in user.
    Whoami,
    AddTopic { name: String, icon: String },
    AddSubtopic { topic: String, name: String },
    AddQuestion {
        topic: String,
        subtopic: String,
        #[command(flatten)]
        fields: QuestionFields,
    },
    UpdateQuestion {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        fields: QuestionFields,
    },
    DeleteQuestion {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args, Debug)]
struct QuestionFields {
    #[arg(long)]
    question: String,
    #[arg(long)]
    quick_answer: String,
    #[arg(long)]
    detailed_answer: String,
    #[arg(long)]
    code_example: String,
}

#[derive(Args, Debug)]
struct TargetArgs {
    topic: String,
    subtopic: String,
    /// Question key as shown in listings (e.g. 42).
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    key: Option<QuestionKey>,
    /// Exact question text; the first match wins.
    #[arg(long)]
    text: Option<String>,
}

impl From<QuestionFields> for QuestionDraft {
    fn from(fields: QuestionFields) -> Self {
        QuestionDraft::new(
            fields.question,
            fields.quick_answer,
            fields.detailed_answer,
            fields.code_example,
        )
    }
}

impl TargetArgs {
    fn into_target(self) -> QuestionTarget {
        let selector = match (self.key, self.text) {
            (Some(key), _) => QuestionSelector::Key(key),
            (None, text) => QuestionSelector::Text(text.unwrap_or_default()),
        };
        QuestionTarget {
            topic: self.topic,
            subtopic: self.subtopic,
            selector,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.api_url.as_deref(), cli.state_dir)?;

    let tokens = TokenStore::open(&config.state_dir)?;
    let transport = HttpTransport::new(&config.api_base_url, config.http_timeout)?;
    let mut session = Session::open(Gateway::new(transport, tokens));
    if session.is_offline() {
        eprintln!(
            "backend at {} is unreachable; showing the built-in catalog (read-only)",
            config.api_base_url
        );
    }

    let mut out = String::new();
    match cli.command {
        Commands::Topics { query } => {
            session.view_mut().global_query = query.unwrap_or_default();
            render_topics(session.catalog(), session.view(), &mut out)?;
        }
        Commands::Subtopics { topic, query } => {
            require_topic(&session, &topic)?;
            let view = session.view_mut();
            view.select_topic(&topic);
            view.subtopic_query = query.unwrap_or_default();
            render_subtopics(session.catalog(), session.view(), &mut out)?;
        }
        Commands::Questions {
            topic,
            subtopic,
            query,
            details,
            code,
        } => {
            require_topic(&session, &topic)?;
            let view = session.view_mut();
            view.select_topic(&topic);
            view.select_subtopic(&subtopic);
            view.question_query = query.unwrap_or_default();
            expand_visible(&mut session, details, code);
            render_questions(session.catalog(), session.view(), &mut out)?;
        }
        Commands::Search {
            query,
            json,
            remote: true,
        } => {
            let hits = session
                .gateway()
                .search_questions(&query)
                .context("remote search")?;
            if json {
                out = serde_json::to_string_pretty(&hits).context("serializing results")?;
                out.push('\n');
            } else {
                render_remote_hits(&hits, &mut out)?;
            }
        }
        Commands::Search {
            query,
            json,
            remote: false,
        } => {
            session.view_mut().global_query = query;
            let results = session.view().search_results(session.catalog());
            if json {
                out = serde_json::to_string_pretty(&results).context("serializing results")?;
                out.push('\n');
            } else {
                render_search(&results, &mut out)?;
            }
        }
        Commands::Open { query, index } => {
            session.view_mut().global_query = query;
            let results = session.view().search_results(session.catalog());
            let Some(result) = index.checked_sub(1).and_then(|idx| results.get(idx)) else {
                bail!("no search result #{index} ({} results)", results.len());
            };
            session.view_mut().select_search_result(result);
            match result.kind {
                SearchKind::Topic => render_subtopics(session.catalog(), session.view(), &mut out)?,
                SearchKind::Subtopic => {
                    render_questions(session.catalog(), session.view(), &mut out)?
                }
                SearchKind::Question => {
                    expand_visible(&mut session, true, true);
                    render_questions(session.catalog(), session.view(), &mut out)?
                }
            }
        }
        Commands::Export => {
            out = serde_json::to_string_pretty(session.catalog()).context("serializing catalog")?;
            out.push('\n');
        }
        Commands::Login { username, password } => {
            let user = session.login(&username, &password)?;
            let role = if user.is_admin() { " (admin)" } else { "" };
            out = format!("signed in as {}{role}\n", user.username);
        }
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let user = session.register(&RegistrationRequest {
                username,
                email,
                password,
                confirm_password,
            })?;
            out = format!("registered {}; sign in with `prep login`\n", user.username);
        }
        Commands::Logout => {
            session.logout();
            out = "signed out\n".to_string();
        }
        Commands::Whoami => {
            out = match session.restore_user()? {
                Some(user) => format!(
                    "{} [{}]\n",
                    user.username,
                    user.authorities.join(", ")
                ),
                None => "not signed in\n".to_string(),
            };
        }
        Commands::AddTopic { name, icon } => {
            out = apply(&mut session, Command::CreateTopic { name, icon })?;
        }
        Commands::AddSubtopic { topic, name } => {
            out = apply(&mut session, Command::CreateSubtopic { topic, name })?;
        }
        Commands::AddQuestion {
            topic,
            subtopic,
            fields,
        } => {
            let draft = fields.into();
            out = apply(
                &mut session,
                Command::CreateQuestion {
                    topic,
                    subtopic,
                    draft,
                },
            )?;
        }
        Commands::UpdateQuestion { target, fields } => {
            let command = Command::UpdateQuestion {
                target: target.into_target(),
                draft: fields.into(),
            };
            out = apply(&mut session, command)?;
        }
        Commands::DeleteQuestion { target } => {
            let command = Command::DeleteQuestion {
                target: target.into_target(),
            };
            out = apply(&mut session, command)?;
        }
    }
    print!("{out}");
    Ok(())
}

/// Run an admin command after confirming the stored identity.
fn apply(session: &mut Session<HttpTransport>, command: Command) -> Result<String> {
    if session.is_offline() {
        bail!("{} unavailable: the backend is unreachable", command.name());
    }
    session.restore_user()?;
    if !session.admin_enabled() {
        bail!("{} requires an account with the ADMIN authority", command.name());
    }
    let name = command.name();
    session.dispatch(command)?;
    Ok(format!(
        "{name}: done ({} topics, {} questions)\n",
        session.catalog().len(),
        session.catalog().question_count()
    ))
}

fn require_topic(session: &Session<HttpTransport>, topic: &str) -> Result<()> {
    if session.catalog().topic(topic).is_none() {
        bail!("unknown topic {topic:?}");
    }
    Ok(())
}

/// Expand every visible question, plus its detail and code panels on request.
fn expand_visible(session: &mut Session<HttpTransport>, details: bool, code: bool) {
    let keys: Vec<QuestionKey> = session
        .view()
        .visible_questions(session.catalog())
        .iter()
        .map(|q| q.key)
        .collect();
    let view = session.view_mut();
    for key in keys {
        view.toggle_question(key);
        if details {
            view.toggle_detail(key);
        }
        if code {
            view.toggle_code(key);
        }
    }
}
