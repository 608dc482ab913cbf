use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use tensorwire_message::TileKind;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod encode;
pub mod envinfo;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode frames from a file or stdin and print a summary.
    Inspect(InspectArgs),
    /// Build one message and write its frame.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print codec limits, features and relevant environment.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Inspect(args) => inspect::run(args, format),
        Command::Encode(args) => encode::run(args),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File holding one or more concatenated frames ("-" or omitted for stdin).
    pub path: Option<PathBuf>,
    /// Fail on the first frame whose checksum tag does not match its body.
    #[arg(long)]
    pub verify: bool,
    /// Stop after N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Largest body accepted, in bytes.
    #[arg(
        long,
        env = "TENSORWIRE_MAX_BODY",
        default_value_t = tensorwire_frame::DEFAULT_MAX_BODY
    )]
    pub max_body: usize,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub message: EncodeMessage,
}

#[derive(Subcommand, Debug)]
pub enum EncodeMessage {
    /// Encode a tile transfer.
    Tile(TileArgs),
    /// Encode an activation forward.
    Activation(ActivationArgs),
    /// Encode a partial result.
    Result(ResultArgs),
}

#[derive(Args, Debug)]
pub struct TileArgs {
    #[arg(long)]
    pub model_id: u64,
    #[arg(long)]
    pub tile_id: u64,
    #[arg(long, value_enum, default_value = "weight")]
    pub kind: TileKindArg,
    #[arg(long, default_value_t = 0)]
    pub layer: u32,
    /// Expert index; omit for tiles outside an expert.
    #[arg(long)]
    pub expert: Option<u16>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ActivationArgs {
    #[arg(long)]
    pub session_id: u64,
    #[arg(long)]
    pub step_id: u64,
    #[arg(long)]
    pub from_tile_id: u64,
    #[arg(long)]
    pub to_tile_id: u64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ResultArgs {
    #[arg(long)]
    pub session_id: u64,
    #[arg(long)]
    pub step_id: u64,
    #[arg(long)]
    pub tile_id: u64,
    /// Quorum replica (0-2).
    #[arg(long)]
    pub vote_group: u8,
    #[arg(long, default_value_t = 0)]
    pub cycles_hint: u32,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["file", "zeros"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "zeros"])]
    pub file: Option<PathBuf>,
    /// Payload of N zero bytes.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub zeros: Option<usize>,
    /// Write the frame here instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum TileKindArg {
    Weight,
    Expert,
    KvAux,
    Codebook,
}

impl From<TileKindArg> for TileKind {
    fn from(value: TileKindArg) -> Self {
        match value {
            TileKindArg::Weight => TileKind::Weight,
            TileKindArg::Expert => TileKind::Expert,
            TileKindArg::KvAux => TileKind::KvAux,
            TileKindArg::Codebook => TileKind::Codebook,
        }
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Also print the wire version and per-message header layout.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}
