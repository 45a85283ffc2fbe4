use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{Jurisdiction, NewClient, StatusTag},
    status,
};
use storage::{CreateUserOutcome, Storage};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/crm.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Registers a staff account.
    CreateUser {
        name: String,
        email: String,
        password: String,
    },
    /// Intake of a new client, in the first pipeline stage unless `--status`
    /// says otherwise.
    CreateClient {
        name: String,
        #[arg(long, default_value = "")]
        interest: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        destination: Option<Jurisdiction>,
    },
    ListClients,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::CreateUser {
            name,
            email,
            password,
        } => match storage.create_user(&name, &email, &password).await? {
            CreateUserOutcome::Created(member) => {
                println!("created user id={} email={}", member.id, member.email);
            }
            CreateUserOutcome::EmailTaken => bail!("email '{email}' is already registered"),
        },
        Command::CreateClient {
            name,
            interest,
            notes,
            status,
            destination,
        } => {
            if let Some(tag) = status.as_deref() {
                if !status::is_known(tag) {
                    eprintln!("warning: '{tag}' is not a pipeline stage");
                }
            }
            let client = storage
                .create_client(&NewClient {
                    name,
                    interest,
                    notes,
                    status: status.map(StatusTag::new),
                    destination,
                })
                .await?;
            println!("created client id={} status={}", client.id, client.status);
        }
        Command::ListClients => {
            for client in storage.list_clients().await? {
                let entry = status::lookup(client.status.as_str());
                println!(
                    "{:>5}  {:<24}  {:<22}  {}",
                    client.id,
                    entry.label,
                    client.name,
                    client.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}
