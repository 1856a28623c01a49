mod app;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use imgrater_adapters::{present_directories, present_files, present_subdirectories};
use imgrater_application::{
    GalleryService, ListDirectoriesQuery, ListFilesCommand, ListSubdirectoriesCommand,
    SourceFileQuery, ThumbnailQuery,
};
use imgrater_domain::{DirectoryId, OpaqueId};
use tracing::error;

use app::build_gallery_service;
use config::{AppConfig, DEFAULT_CONFIG_PATH};

#[derive(Debug, Parser)]
#[command(
    name = "imgrater",
    version,
    about = "Browse registered image directories with cached thumbnails"
)]
struct Cli {
    /// JSON config file; defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// List registered directories.
    Dirs,
    /// Scan and list the subdirectories of a registered directory.
    Subdirs { dir_id: String },
    /// Scan and list the images of a subdirectory.
    Files { dir_id: String, subdir_id: String },
    /// Print the thumbnail path for a file id, rendering it if needed.
    Thumb { file_id: String },
    /// Print the absolute path of a source image.
    File {
        dir_id: String,
        subdir_id: String,
        file_id: String,
    },
}

#[derive(Debug)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load config");
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    let service = match build_gallery_service(&config) {
        Ok(service) => service,
        Err(err) => {
            error!(error = %err, "failed to start imgrater");
            eprintln!("failed to start imgrater: {err}");
            return ExitCode::from(1);
        }
    };

    match run_command(cli.command, &service).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

async fn run_command(command: Command, service: &GalleryService) -> Result<String, CommandError> {
    match command {
        Command::Dirs => {
            let directories = service.list_directories(ListDirectoriesQuery);
            present_directories(&directories).map_err(runtime)
        }
        Command::Subdirs { dir_id } => {
            let subdirectories = service.list_subdirectories(ListSubdirectoriesCommand {
                directory_id: parse_directory_id(dir_id)?,
            });
            present_subdirectories(&subdirectories).map_err(runtime)
        }
        Command::Files { dir_id, subdir_id } => {
            let files = service
                .list_files(ListFilesCommand {
                    directory_id: parse_directory_id(dir_id)?,
                    subdirectory_id: parse_opaque_id(subdir_id)?,
                })
                .await;
            present_files(&files).map_err(runtime)
        }
        Command::Thumb { file_id } => {
            let file_id = parse_opaque_id(file_id)?;
            match service
                .thumbnail(ThumbnailQuery {
                    file_id: file_id.clone(),
                })
                .await
                .map_err(runtime)?
            {
                Some(path) => Ok(path.display().to_string()),
                None => Err(CommandError::Runtime(format!("no thumbnail for {file_id}"))),
            }
        }
        Command::File {
            dir_id,
            subdir_id,
            file_id,
        } => {
            let file_id = parse_opaque_id(file_id)?;
            service
                .source_file(SourceFileQuery {
                    directory_id: parse_directory_id(dir_id)?,
                    subdirectory_id: parse_opaque_id(subdir_id)?,
                    file_id: file_id.clone(),
                })
                .map(|path| path.display().to_string())
                .ok_or_else(|| CommandError::Runtime(format!("file not found: {file_id}")))
        }
    }
}

fn parse_directory_id(value: String) -> Result<DirectoryId, CommandError> {
    DirectoryId::new(value).map_err(|err| CommandError::Usage(format!("invalid directory id: {err}")))
}

fn parse_opaque_id(value: String) -> Result<OpaqueId, CommandError> {
    if value.is_empty() {
        return Err(CommandError::Usage("id must not be empty".to_string()));
    }
    Ok(OpaqueId::new(value))
}

fn runtime(err: impl std::fmt::Display) -> CommandError {
    CommandError::Runtime(err.to_string())
}
