use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "edgestack",
    about = "edgestack — declarative edge-device deployment descriptors",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a scaffold edgestack.toml into the project directory
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Thing name for the scaffolded stack
        #[arg(short, long, default_value = "edge_core")]
        thing: String,
    },
    /// Package the function source into a deployable artifact
    Pack {
        /// Project directory containing edgestack.toml
        #[arg(short, long, default_value = ".")]
        path: String,
    },
    /// Compose the group descriptor and emit the deployment template.
    ///
    /// Packs the function source, builds the identity, function, routing,
    /// and logger descriptors from edgestack.toml, validates the group, and
    /// writes the template JSON for the provisioning backend.
    Synth {
        /// Project directory containing edgestack.toml
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Externally issued credential reference for the core thing
        #[arg(short, long)]
        credential: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edge_core=info".parse()?)
                .add_directive("edge_pack=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, thing } => commands::init::init(&path, &thing),
        Commands::Pack { path } => commands::pack::pack(&path),
        Commands::Synth { path, credential, out } => {
            commands::synth::synth(&path, &credential, out.as_deref())
        }
    }
}
