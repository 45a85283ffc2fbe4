mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    CrmClient, EditOutcome, FileKeyValueStore, LoadOutcome, TransitionOutcome, ViewMode,
};
use shared::{
    domain::{Client, ClientId, ClientUpdate, Jurisdiction, Member, StatusTag},
    process::{form_schema, ProcessField},
    protocol::AuthenticatedUser,
    status,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "crm", about = "Client pipeline of the legal CRM")]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "CRM_SERVER_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    server_url: String,
    /// Where the signed-in user and the view preference are kept.
    #[arg(long, global = true, env = "CRM_STATE_PATH")]
    state_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        password: String,
    },
    Logout,
    Whoami,
    /// Shows the pipeline in the saved view mode.
    Clients {
        #[arg(long)]
        search: Option<String>,
    },
    /// Prints or changes the saved view mode.
    View {
        #[arg(value_enum)]
        action: Option<ViewAction>,
    },
    /// Moves a client to another pipeline stage.
    Move {
        client_id: i64,
        status: String,
    },
    Edit {
        client_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        interest: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        scheduling_done: Option<bool>,
        #[arg(long)]
        follow_up_done: Option<bool>,
    },
    /// Lists a client's processes, or drafts a new one with `--new`. Refused
    /// while the client is in the locked intake stage.
    Processes {
        client_id: i64,
        #[arg(long)]
        new: bool,
        #[arg(long, requires = "new")]
        jurisdiction: Option<Jurisdiction>,
        /// `field=value`, repeatable.
        #[arg(long = "set", value_name = "FIELD=VALUE", requires = "new")]
        fields: Vec<String>,
    },
    /// Prints the process form for a jurisdiction.
    Schema {
        jurisdiction: Jurisdiction,
    },
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Password {
        current: String,
        new: String,
        confirm: String,
    },
    Members {
        #[command(subcommand)]
        command: MembersCommand,
    },
}

#[derive(Subcommand, Debug)]
enum MembersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        name: String,
        email: String,
        password: String,
    },
    /// `member` is an id or an e-mail.
    Edit {
        member: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        member: String,
        /// The member's e-mail, typed again.
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewAction {
    Toggle,
    List,
    Board,
}

fn default_state_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("unable to resolve local app data dir"))?;
    Ok(base.join("legal-crm").join("state.json"))
}

async fn require_user(crm: &CrmClient) -> Result<AuthenticatedUser> {
    crm.session
        .current_user()
        .await
        .ok_or_else(|| anyhow!("not signed in, run `crm login <email> <password>` first"))
}

async fn load_pipeline(crm: &CrmClient) -> Result<()> {
    if crm.pipeline.load().await == LoadOutcome::Failed {
        bail!("clients could not be loaded");
    }
    Ok(())
}

fn find_member<'a>(members: &'a [Member], key: &str) -> Option<&'a Member> {
    let key = key.trim();
    members
        .iter()
        .find(|m| m.id.to_string() == key || m.email.eq_ignore_ascii_case(key))
}

fn gate_refusal(client: &Client) -> String {
    format!(
        "process management is locked while #{} is in {}",
        client.id,
        status::lookup(client.status.as_str()).label
    )
}

fn parse_assignment(raw: &str) -> Result<(ProcessField, &str)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{raw}'"))?;
    Ok((key.trim().parse()?, value))
}

async fn run(crm: &CrmClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = crm.session.login(&email, &password).await?;
            println!("signed in as {} <{}>", user.name, user.email);
        }
        Command::Logout => {
            crm.session.logout().await;
            println!("signed out");
        }
        Command::Whoami => match crm.session.current_user().await {
            Some(user) => println!("{} <{}> {}", user.name, user.email, user.id),
            None => println!("not signed in"),
        },
        Command::Clients { search } => {
            require_user(crm).await?;
            load_pipeline(crm).await?;
            crm.processes.refresh().await;
            match search {
                Some(term) => {
                    let found = crm.pipeline.search(&term).await;
                    let counts = process_counts(crm, &found).await;
                    print!("{}", render::client_list(&found, &counts));
                }
                None if crm.views.is_board().await => {
                    print!("{}", render::board(&crm.pipeline.board_columns().await));
                }
                None => {
                    let clients = crm.pipeline.clients().await;
                    let counts = process_counts(crm, &clients).await;
                    print!("{}", render::client_list(&clients, &counts));
                }
            }
        }
        Command::View { action } => {
            let mode = match action {
                None => crm.views.current().await,
                Some(ViewAction::Toggle) => crm.views.toggle().await,
                Some(ViewAction::List) => {
                    crm.views.set(ViewMode::List).await;
                    ViewMode::List
                }
                Some(ViewAction::Board) => {
                    crm.views.set(ViewMode::Board).await;
                    ViewMode::Board
                }
            };
            println!("{mode}");
        }
        Command::Move { client_id, status } => {
            require_user(crm).await?;
            load_pipeline(crm).await?;
            let target = StatusTag::new(status);
            match crm.pipeline.transition(ClientId(client_id), &target).await {
                TransitionOutcome::Moved => {}
                TransitionOutcome::Unchanged => println!(
                    "client #{client_id} is already in {}",
                    status::lookup(target.as_str()).label
                ),
                TransitionOutcome::UnknownStatus => bail!(
                    "'{target}' is not a pipeline stage (one of: {})",
                    status::STAGES
                        .iter()
                        .map(|s| s.tag)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                TransitionOutcome::UnknownClient => bail!("client #{client_id} not found"),
                TransitionOutcome::Failed => bail!("status could not be updated"),
            }
        }
        Command::Edit {
            client_id,
            name,
            interest,
            notes,
            status,
            scheduling_done,
            follow_up_done,
        } => {
            require_user(crm).await?;
            load_pipeline(crm).await?;
            let id = ClientId(client_id);
            let client = crm
                .pipeline
                .client(id)
                .await
                .ok_or_else(|| anyhow!("client #{client_id} not found"))?;
            let mut update = ClientUpdate::from(&client);
            if let Some(name) = name {
                update.name = name;
            }
            if let Some(interest) = interest {
                update.interest = interest;
            }
            if let Some(notes) = notes {
                update.notes = notes;
            }
            if let Some(status) = status {
                update.status = StatusTag::new(status);
            }
            if let Some(done) = scheduling_done {
                update.scheduling_done = done;
            }
            if let Some(done) = follow_up_done {
                update.follow_up_done = done;
            }
            match crm.pipeline.edit_client(id, &update).await {
                EditOutcome::Updated => {}
                EditOutcome::UnknownClient => bail!("client #{client_id} not found"),
                EditOutcome::Failed => bail!("client could not be updated"),
            }
        }
        Command::Processes {
            client_id,
            new,
            jurisdiction,
            fields,
        } => {
            require_user(crm).await?;
            load_pipeline(crm).await?;
            let id = ClientId(client_id);
            let client = crm
                .pipeline
                .client(id)
                .await
                .ok_or_else(|| anyhow!("client #{client_id} not found"))?;
            if !crm.pipeline.gate(id).await {
                bail!(gate_refusal(&client));
            }
            crm.processes.refresh().await;

            if !new {
                let processes = crm.processes.processes_for(id).await;
                print!("{}", render::processes(&client, &processes));
                return Ok(());
            }

            let mut draft = crm.processes.begin_edit(None, &client);
            if let Some(jurisdiction) = jurisdiction {
                crm.processes.switch_jurisdiction(&mut draft, jurisdiction);
            }
            for raw in &fields {
                let (field, value) = parse_assignment(raw)?;
                crm.processes.set_field_raw(&mut draft, field, value)?;
            }
            print!(
                "{}",
                render::draft_summary(&draft, crm.processes.render_schema(draft.jurisdiction()))
            );
            let saved = crm.processes.save(&draft).await?;
            println!("saved process #{}", saved.id);
        }
        Command::Schema { jurisdiction } => {
            print!("{}", render::schema(form_schema(jurisdiction)));
        }
        Command::Profile { name, email } => {
            let user = crm.session.update_profile(&name, &email).await?;
            println!("profile updated: {} <{}>", user.name, user.email);
        }
        Command::Password {
            current,
            new,
            confirm,
        } => {
            crm.session.change_password(&current, &new, &confirm).await?;
            println!("password changed");
        }
        Command::Members { command } => {
            require_user(crm).await?;
            run_members(crm, command).await?;
        }
    }
    Ok(())
}

async fn run_members(crm: &CrmClient, command: MembersCommand) -> Result<()> {
    if crm.members.refresh().await == LoadOutcome::Failed {
        bail!("members could not be loaded");
    }
    match command {
        MembersCommand::List { search } => {
            let members = crm.members.search(search.as_deref().unwrap_or("")).await;
            print!("{}", render::members(&members));
        }
        MembersCommand::Add {
            name,
            email,
            password,
        } => {
            let member = crm.members.create(&name, &email, &password).await?;
            println!("created member {}", member.id);
        }
        MembersCommand::Edit {
            member,
            name,
            email,
            active,
        } => {
            let members = crm.members.members().await;
            let existing = find_member(&members, &member)
                .ok_or_else(|| anyhow!("member '{member}' not found"))?;
            let name = name.unwrap_or_else(|| existing.name.clone());
            let email = email.unwrap_or_else(|| existing.email.clone());
            crm.members.update(existing.id, &name, &email, active).await?;
        }
        MembersCommand::Delete { member, confirm } => {
            let members = crm.members.members().await;
            let existing = find_member(&members, &member)
                .ok_or_else(|| anyhow!("member '{member}' not found"))?;
            crm.members.delete(existing.id, &confirm).await?;
        }
    }
    Ok(())
}

async fn process_counts(crm: &CrmClient, clients: &[Client]) -> Vec<usize> {
    let mut counts = Vec::with_capacity(clients.len());
    for client in clients {
        counts.push(crm.processes.process_count(client.id).await);
    }
    counts
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let state_path = match cli.state_path {
        Some(path) => path,
        None => default_state_path()?,
    };
    debug!(server_url = %cli.server_url, state_path = %state_path.display(), "starting");
    let store = FileKeyValueStore::open(state_path.clone())
        .await
        .with_context(|| format!("opening state file {}", state_path.display()))?;
    let crm = CrmClient::connect(&cli.server_url, Arc::new(store)).await;
    let mut notifications = crm.notifier.subscribe();

    let result = run(&crm, cli.command).await;
    while let Ok(notification) = notifications.try_recv() {
        eprintln!("{}", render::notification(&notification));
    }
    result
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
