use chrono::Utc;
use clap::Parser;
use colored::*;
use pastez::config::{self, PastezConfig};
use pastez::error::{PastezError, Result};
use pastez::history::GitBackend;
use pastez::meta::JsonMetadataStore;
use pastez::model::Paste;
use pastez::registry::PasteRegistry;
use std::io;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    registry: PasteRegistry<GitBackend, JsonMetadataStore>,
    owner: Option<String>,
    key: Option<String>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::New {
            description,
            private,
        } => handle_new(&ctx, &description, private),
        Commands::List => handle_list(&ctx),
        Commands::Add {
            paste,
            filename,
            content,
        } => handle_add(&ctx, &paste, &filename, content),
        Commands::Remove { paste, filename } => handle_remove(&ctx, &paste, &filename),
        Commands::Files { paste } => handle_files(&ctx, &paste),
        Commands::Cat { paste, filename } => handle_cat(&ctx, &paste, &filename),
        Commands::Fork { paste } => handle_fork(&ctx, &paste),
        Commands::Status { paste } => handle_status(&ctx, &paste),
        Commands::Log { paste } => handle_log(&ctx, &paste),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root =
        config::resolve_root(cli.root.as_deref()).expect("Could not determine storage root");
    let config = PastezConfig::load(&root).unwrap_or_default();

    let backend = GitBackend::new(&config);
    let meta = JsonMetadataStore::new(root.clone());
    let registry = PasteRegistry::new(root.join("pastes"), backend, meta);

    Ok(AppContext {
        registry,
        owner: cli.owner.clone(),
        key: cli.key.clone(),
    })
}

/// Resolves a paste reference and enforces the privacy gate. Public
/// pastes pass for everyone; private ones need the owner or the key.
fn resolve(ctx: &AppContext, reference: &str) -> Result<Paste> {
    let paste = ctx.registry.find_by_prefix(reference)?;
    if !paste.grants_access(ctx.owner.as_deref(), ctx.key.as_deref()) {
        return Err(PastezError::AccessDenied(
            "paste is private (provide --key or act as its owner)".to_string(),
        ));
    }
    Ok(paste)
}

fn handle_new(ctx: &AppContext, description: &str, private: bool) -> Result<()> {
    let paste = ctx
        .registry
        .create_paste(ctx.owner.as_deref(), description, private)?;

    println!(
        "{} {}",
        short_id(&paste).yellow(),
        display_description(&paste).bold()
    );
    if let Some(path) = &paste.storage_path {
        println!("  stored at {}", path.display().to_string().dimmed());
    }
    if paste.private {
        println!("  private key: {}", paste.private_key.yellow());
    }
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let visible: Vec<Paste> = ctx
        .registry
        .list_pastes()?
        .into_iter()
        .filter(|paste| paste.grants_access(ctx.owner.as_deref(), ctx.key.as_deref()))
        .collect();

    if visible.is_empty() {
        println!("No pastes found.");
        return Ok(());
    }

    for paste in &visible {
        let owner = paste.owner.as_deref().unwrap_or("anonymous");
        let privacy = if paste.private { " private" } else { "" };

        println!(
            "{}  {}{}  {} {} {}",
            short_id(paste).yellow(),
            format!("{:<40}", truncate(&display_description(paste), 40)).bold(),
            privacy.red(),
            format!("{:>12}", owner).dimmed(),
            format!("{:>9}", format!("{} views", paste.views)).dimmed(),
            format!("{:>14}", format_time_ago(paste.created_at)).dimmed(),
        );
    }
    Ok(())
}

fn handle_add(
    ctx: &AppContext,
    reference: &str,
    filename: &str,
    content: Option<String>,
) -> Result<()> {
    let paste = resolve(ctx, reference)?;
    let content = match content {
        Some(content) => content,
        None => io::read_to_string(io::stdin()).map_err(PastezError::Io)?,
    };

    let revision = ctx.registry.add_file(&paste, filename, &content)?;
    println!("{}", revision.message.green());
    Ok(())
}

fn handle_remove(ctx: &AppContext, reference: &str, filename: &str) -> Result<()> {
    let paste = resolve(ctx, reference)?;
    let revision = ctx.registry.remove_file(&paste, filename)?;
    println!("{}", revision.message.green());
    Ok(())
}

fn handle_files(ctx: &AppContext, reference: &str) -> Result<()> {
    let paste = resolve(ctx, reference)?;
    let files = ctx.registry.list_files(&paste)?;
    record_view(ctx, &paste);

    if files.is_empty() {
        println!("No files in this paste.");
        return Ok(());
    }
    for file in &files {
        let lines = file.content.lines().count();
        println!(
            "{}  {}",
            format!("{:<30}", file.filename).bold(),
            format!("{} lines", lines).dimmed()
        );
    }
    Ok(())
}

fn handle_cat(ctx: &AppContext, reference: &str, filename: &str) -> Result<()> {
    let paste = resolve(ctx, reference)?;
    let files = ctx.registry.list_files(&paste)?;
    let file = files
        .iter()
        .find(|f| f.filename == filename)
        .ok_or_else(|| PastezError::FileNotFound(filename.to_string()))?;
    record_view(ctx, &paste);

    print!("{}", file.content);
    Ok(())
}

fn handle_fork(ctx: &AppContext, reference: &str) -> Result<()> {
    let source = resolve(ctx, reference)?;
    let fork = ctx.registry.fork(&source, ctx.owner.as_deref())?;

    println!(
        "{}",
        format!("Forked {} into {}", short_id(&source), short_id(&fork)).green()
    );
    if fork.private {
        println!("  private key: {}", fork.private_key.yellow());
    }
    Ok(())
}

fn handle_status(ctx: &AppContext, reference: &str) -> Result<()> {
    let paste = resolve(ctx, reference)?;
    print!("{}", ctx.registry.status(&paste)?);
    Ok(())
}

fn handle_log(ctx: &AppContext, reference: &str) -> Result<()> {
    let paste = resolve(ctx, reference)?;
    let history = ctx.registry.history(&paste)?;
    if history.is_empty() {
        println!("No revisions recorded.");
    } else {
        println!("{}", history);
    }
    Ok(())
}

/// View counting is best effort from the CLI: a failed bump should not
/// break the read the user asked for.
fn record_view(ctx: &AppContext, paste: &Paste) {
    if let Some(id) = paste.id {
        if let Err(e) = ctx.registry.record_view(&id) {
            eprintln!("Warning: could not record view: {}", e);
        }
    }
}

fn short_id(paste: &Paste) -> String {
    match paste.id {
        Some(id) => id.simple().to_string()[..8].to_string(),
        None => "--------".to_string(),
    }
}

fn display_description(paste: &Paste) -> String {
    if paste.description.is_empty() {
        "(untitled)".to_string()
    } else {
        paste.description.clone()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
