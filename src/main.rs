//! CLI entry point for mdblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdblog_rs::commands::new::NewPost;
use mdblog_rs::commands::publish::Published;

#[derive(Parser)]
#[command(name = "mdblog")]
#[command(version)]
#[command(about = "A small static blog generator for Markdown posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// One-line summary shown on the listing
        #[arg(short, long)]
        summary: String,

        /// Tag for the post (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Markdown body
        #[arg(short, long, default_value = "")]
        body: String,

        /// Replace an existing post with the same slug
        #[arg(long)]
        overwrite: bool,

        /// Commit the new post and push it with git
        #[arg(long)]
        publish: bool,

        /// Commit message (defaults to "Add post: <title>")
        #[arg(short, long, requires = "publish")]
        message: Option<String>,

        /// Git remote to push to
        #[arg(long, default_value = mdblog_rs::commands::publish::DEFAULT_REMOTE)]
        remote: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Start a live-preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, slug, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdblog_rs=debug,info"
    } else {
        "mdblog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            mdblog_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            summary,
            tags,
            body,
            overwrite,
            publish,
            message,
            remote,
        } => {
            let blog = mdblog_rs::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let message = message.unwrap_or_else(|| format!("Add post: {}", title.trim()));
            let post = NewPost {
                title,
                summary,
                tags,
                body,
                overwrite,
            };
            let path = mdblog_rs::commands::new::create_post(&blog, &post)?;
            println!("Created: {:?}", path);

            if publish {
                match mdblog_rs::commands::publish::run(&blog, &[path], &message, &remote)? {
                    Published::Pushed => println!("Published to {}", remote),
                    Published::Unchanged => println!("Nothing new to publish"),
                }
            }
        }

        Commands::Generate => {
            let blog = mdblog_rs::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            blog.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, open } => {
            let blog = mdblog_rs::Blog::new(&base_dir)?;
            tracing::info!("Starting preview server at http://{}:{}", ip, port);
            mdblog_rs::server::start(&blog, &ip, port, open).await?;
        }

        Commands::Clean => {
            let blog = mdblog_rs::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, json } => {
            let blog = mdblog_rs::Blog::new(&base_dir)?;
            mdblog_rs::commands::list::run(&blog, &r#type, json)?;
        }

        Commands::Version => {
            println!("mdblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
