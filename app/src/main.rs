//! qrcard CLI — generate QR code cards for websites, Wi-Fi networks and
//! contacts, with a caption rendered below the code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qr_payload::{ContactCard, WifiCredential};
use qrcard::SharedState;
use qrcard::services::gallery::GalleryService;
use qrcard::services::generator::{CardRequest, GeneratedCard, GeneratorService};

#[derive(Parser)]
#[command(name = "qrcard", version, about = "Generate QR code cards with captions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a card that opens a website
    Website {
        url: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate a card that joins a Wi-Fi network
    Wifi {
        /// Network name
        #[arg(long)]
        ssid: String,
        /// Network password (WPA)
        #[arg(long)]
        password: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate a vCard contact card
    Contact {
        /// Full name
        #[arg(long)]
        name: String,
        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,
        /// Email address
        #[arg(long, default_value = "")]
        email: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Inspect or prune saved cards
    Gallery {
        #[command(subcommand)]
        command: GalleryCommand,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Write the PNG to this path
    #[arg(long)]
    out: Option<PathBuf>,
    /// Save the card into the gallery (default when no output is chosen)
    #[arg(long)]
    save: bool,
    /// Stage the card for sharing and print the staged path
    #[arg(long)]
    share: bool,
}

#[derive(Subcommand)]
enum GalleryCommand {
    /// List saved cards, newest first
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved card by file name
    Delete { file_name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let state = qrcard::init_foundation()?;

    match cli.command {
        Command::Website { url, output } => {
            generate(&state, CardRequest::Website { url }, output).await
        }
        Command::Wifi {
            ssid,
            password,
            output,
        } => {
            let request = CardRequest::Wifi(WifiCredential::new(ssid, password));
            generate(&state, request, output).await
        }
        Command::Contact {
            name,
            phone,
            email,
            output,
        } => {
            let request = CardRequest::Contact(ContactCard::new(name, phone, email));
            generate(&state, request, output).await
        }
        Command::Gallery { command } => gallery(&state, command),
    }
}

async fn generate(
    state: &SharedState,
    request: CardRequest,
    output: OutputArgs,
) -> anyhow::Result<()> {
    let generator = GeneratorService::new(state.clone());
    let card = generator
        .generate(request)
        .await?
        .ok_or_else(|| anyhow::anyhow!("card was superseded before it finished"))?;

    println!(
        "generated {} card ({}x{})",
        card.kind.as_str(),
        card.width,
        card.height
    );
    write_outputs(state, &card, &output)?;
    Ok(())
}

fn write_outputs(
    state: &SharedState,
    card: &GeneratedCard,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    // With no destination chosen the card would vanish, so default to
    // the gallery.
    let save = output.save || (output.out.is_none() && !output.share);

    if let Some(path) = &output.out {
        std::fs::write(path, &card.png)?;
        println!("wrote {}", path.display());
    }
    if save {
        let saved = GalleryService::new(state.data_dir().clone()).save(&card.png)?;
        println!("saved {}", saved.path.display());
    }
    if output.share {
        let staged = GalleryService::new(state.data_dir().clone()).stage_for_share(&card.png)?;
        println!("staged {}", staged.display());
    }
    Ok(())
}

fn gallery(state: &SharedState, command: GalleryCommand) -> anyhow::Result<()> {
    let gallery = GalleryService::new(state.data_dir().clone());
    match command {
        GalleryCommand::List { json } => {
            let cards = gallery.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else if cards.is_empty() {
                println!("no saved cards");
            } else {
                for card in cards {
                    println!(
                        "{}  {}",
                        card.created_at.format("%Y-%m-%d %H:%M:%S"),
                        card.file_name
                    );
                }
            }
        }
        GalleryCommand::Delete { file_name } => {
            gallery.delete(&file_name)?;
            println!("deleted {file_name}");
        }
    }
    Ok(())
}
