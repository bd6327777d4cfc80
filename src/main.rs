use clap::Parser;
use keeplist::cli::{Cli, Command};
use keeplist::config::{CompareConfig, Config};
use keeplist::store::{diff, snapshot};
use keeplist::youtube::auth::{Authenticator, DiskTokenStore};
use keeplist::youtube::PlaylistClient;

fn main() {
    // credentials may live in a .env next to the working directory
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Backup(args) => {
            let config = match Config::load(&args) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("configuration error: {e}");
                    std::process::exit(1);
                }
            };

            let token_path = match DiskTokenStore::default_path() {
                Some(path) => path,
                None => {
                    eprintln!("could not determine a data directory for token storage");
                    std::process::exit(1);
                }
            };

            let auth = Authenticator::new(
                config.client_id,
                config.client_secret,
                Box::new(DiskTokenStore::new(token_path)),
            );
            let client = PlaylistClient::new(auth);

            let playlist_id = config.playlist_id;
            let result = snapshot::build_snapshot(
                || client.fetch_playlist_items(&playlist_id),
                &config.backup_dir,
            );

            match result {
                Ok(count) => println!("backed up {count} videos to {}", config.backup_dir.display()),
                Err(e) => {
                    eprintln!("backup failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Compare(args) => {
            let config = match CompareConfig::load(&args) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("configuration error: {e}");
                    std::process::exit(1);
                }
            };

            match diff::compare_latest_two(&config.backup_dir, &config.tombstone_title) {
                Ok(removed) if removed.is_empty() => {
                    println!("No removed videos found.");
                }
                Ok(removed) => {
                    println!("Removed since the previous snapshot:");
                    for video in removed {
                        println!("  {}  {}", video.id, video.title);
                    }
                }
                Err(e) => {
                    eprintln!("compare failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
