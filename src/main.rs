use clap::{Parser, Subcommand};
use color_eyre::Result;
use futures::StreamExt;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lazychat::cache::RemoteEntity;
use lazychat::chat::{ChatClient, MessageKind};
use lazychat::config::Config;

#[derive(Parser, Debug)]
#[command(name = "lazychat")]
#[command(about = "Inspect chats, messages and members of a remote chat service")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/lazychat/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show a message, or a single raw field of it
  Message {
    channel: String,
    id: String,
    #[arg(short, long)]
    field: Option<String>,
  },
  /// Show a chat
  Chat { channel: String },
  /// List the members of a chat
  Members {
    channel: String,
    /// Page size
    #[arg(short, long)]
    limit: Option<u32>,
    /// Stop after this many members
    #[arg(short, long)]
    max: Option<usize>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lazychat=info")),
    )
    .with_writer(writer)
    .init();

  let args = Args::parse();

  let config = Config::load(args.config.as_deref())?;
  let client = ChatClient::from_config(&config)?;

  match args.command {
    Command::Message { channel, id, field } => show_message(&client, &channel, &id, field).await,
    Command::Chat { channel } => show_chat(&client, &channel).await,
    Command::Members {
      channel,
      limit,
      max,
    } => list_members(&client, &channel, limit, max).await,
  }
}

async fn show_message(
  client: &ChatClient,
  channel: &str,
  id: &str,
  field: Option<String>,
) -> Result<()> {
  let message = client.message(channel, id);

  if let Some(field) = field {
    let value = message.object().get(&field, serde_json::Value::Null).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    return Ok(());
  }

  let author = message.author().await?;
  println!("id:       {}", message.id());
  println!(
    "author:   {}",
    author.nickname().await?.unwrap_or_else(|| author.id().to_string())
  );
  if let Some(at) = message.received_at_utc().await? {
    println!("received: {}", at.to_rfc3339());
  }
  match message.kind().await? {
    MessageKind::Text => {
      println!("text:     {}", message.content().await?.unwrap_or_default());
    }
    MessageKind::File => {
      println!(
        "file:     {} ({})",
        message.file_name().await?.unwrap_or_default(),
        message.file_mime().await?.unwrap_or_default()
      );
      if let Some(url) = message.file_url().await? {
        println!("url:      {}", url);
      }
    }
  }

  Ok(())
}

async fn show_chat(client: &ChatClient, channel: &str) -> Result<()> {
  let chat = client.chat(channel);

  println!("channel:  {}", chat.channel_url());
  println!("name:     {}", chat.name().await?.unwrap_or_default());
  if let Some(count) = chat.member_count().await? {
    println!("members:  {}", count);
  }
  if let Some(created) = chat.created_at().await? {
    println!("created:  {}", created.to_rfc3339());
  }
  if chat.is_frozen().await? {
    println!("frozen");
  }

  Ok(())
}

async fn list_members(
  client: &ChatClient,
  channel: &str,
  limit: Option<u32>,
  max: Option<usize>,
) -> Result<()> {
  let mut options = client.page_options();
  if let Some(limit) = limit {
    options = options.with_limit(limit);
  }

  let members = client.chat(channel).member_stream(options);
  let mut members = members.take(max.unwrap_or(usize::MAX));

  while let Some(member) = members.next().await {
    let member = member?;
    let nickname = member.nickname().await?.unwrap_or_default();
    let status = if member.is_online().await? { "online" } else { "" };
    println!("{:<32} {:<24} {}", member.id(), nickname, status);
  }

  Ok(())
}
