use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use contact_manager::{Client, ClientLookup, ClientUpdate, Database};

#[derive(Parser, Debug)]
#[command(name = "contact-manager", version, about = "Manage clients and their phone numbers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the clients and phones tables
    Init,
    /// Add a client, optionally with phone numbers
    Add {
        first_name: String,
        last_name: String,
        email: String,
        /// Phone number to attach (repeatable)
        #[arg(short, long = "phone")]
        phones: Vec<String>,
    },
    /// Attach a phone number to a client
    AddPhone { id: i32, phone: String },
    /// Delete one phone number of a client
    RemovePhone { id: i32, phone: String },
    /// Change a client's name or email
    Update {
        id: i32,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a client and its phone numbers
    Delete { id: i32 },
    /// Show a client with its phone numbers
    Show { id: i32 },
    /// Find clients by name, surname, email or phone
    Find(FindArgs),
    /// Run the create / update / find / delete walkthrough
    Demo,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct FindArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

impl FindArgs {
    fn lookup(self) -> Option<ClientLookup> {
        self.first_name
            .map(ClientLookup::FirstName)
            .or(self.last_name.map(ClientLookup::LastName))
            .or(self.email.map(ClientLookup::Email))
            .or(self.phone.map(ClientLookup::Phone))
    }
}

async fn load(db: &mut Database, id: i32) -> Result<Client> {
    Client::load(db, id)
        .await?
        .with_context(|| format!("no client with id {}", id))
}

fn print_client(client: &Client) {
    match client.id() {
        Some(id) => println!("#{} {}", id, client),
        None => println!("{}", client),
    }
    for phone in client.phones() {
        println!("    {}", phone.number);
    }
}

pub async fn run(command: Command, db: &mut Database) -> Result<()> {
    match command {
        Command::Init => {
            db.create_schema().await?;
            println!("Schema created");
        }
        Command::Add {
            first_name,
            last_name,
            email,
            phones,
        } => {
            let mut client = Client::new(first_name, last_name, email);
            client.save(db).await?;
            for phone in phones {
                client.add_phone(db, phone).await?;
            }
            print_client(&client);
        }
        Command::AddPhone { id, phone } => {
            let mut client = load(db, id).await?;
            client.add_phone(db, phone).await?;
            print_client(&client);
        }
        Command::RemovePhone { id, phone } => {
            let mut client = load(db, id).await?;
            if !client.remove_phone(db, &phone).await? {
                println!("Client #{} has no phone {}", id, phone);
            }
            print_client(&client);
        }
        Command::Update {
            id,
            first_name,
            last_name,
            email,
        } => {
            let mut client = load(db, id).await?;
            let changes = ClientUpdate {
                first_name,
                last_name,
                email,
            };
            client.update(db, changes).await?;
            print_client(&client);
        }
        Command::Delete { id } => {
            let mut client = load(db, id).await?;
            client.delete(db).await?;
            println!("Deleted client #{}", id);
        }
        Command::Show { id } => {
            let client = load(db, id).await?;
            print_client(&client);
        }
        Command::Find(args) => {
            let Some(lookup) = args.lookup() else {
                bail!("give one of --first-name, --last-name, --email or --phone");
            };
            let records = Client::find_by(db, &lookup).await?;
            if records.is_empty() {
                println!("No clients found");
            }
            for record in records {
                println!("{}", record);
            }
        }
        Command::Demo => demo(db).await?,
    }

    Ok(())
}

async fn demo(db: &mut Database) -> Result<()> {
    db.create_schema().await?;

    let mut client = Client::new("Ivan", "Ivanov", "ivanov@example.com");
    client.save(db).await?;
    info!(client = %client, "created");

    client.add_phone(db, "+79161234567").await?;
    client.add_phone(db, "+79161234568").await?;
    print_client(&client);

    let changes = ClientUpdate {
        last_name: Some("Sidorov".to_string()),
        email: Some("sidorov@example.com".to_string()),
        ..Default::default()
    };
    client.update(db, changes).await?;

    match client.find_by_id(db).await? {
        Some(record) => println!("{}", record),
        None => println!("Client not found"),
    }

    let by_phone = Client::find_by(db, &ClientLookup::Phone("+79161234568".to_string())).await?;
    println!("Found {} client(s) by phone", by_phone.len());

    client.delete(db).await?;
    println!("Deleted {}", client);

    Ok(())
}
