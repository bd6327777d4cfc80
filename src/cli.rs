use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keeplist")]
#[command(about = "Backs up YouTube playlist membership and reports removed videos")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Capture the playlist's current membership as a new snapshot
    Backup(BackupArgs),

    /// Compare the two most recent snapshots and report removed videos
    Compare(CompareArgs),
}

#[derive(Parser)]
pub struct BackupArgs {
    /// Playlist to back up (overrides YOUTUBE_PLAYLIST_ID and the config file)
    #[arg(long)]
    pub playlist: Option<String>,

    /// Directory snapshots are written to (defaults to ./backups)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Directory snapshots are read from (defaults to ./backups)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Title the provider substitutes for removed videos
    #[arg(long)]
    pub tombstone: Option<String>,
}
