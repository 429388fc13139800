use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use upload_core::drop_zone::parse_dropped_paths;
use upload_core::render;
use upload_core::{FileBackend, FileRegistryClient, UploadState};

const HELP: &str = "\
commands:
  list | ls | refresh     reload the file list from the server
  upload <path>           upload a file
  delete <name> | rm      delete a file by its server name
  help                    show this text
  quit | exit             leave
dragging a file onto the terminal uploads it";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Empty,
    Refresh,
    Upload(PathBuf),
    Delete(String),
    /// Pasted path of a file dragged onto the terminal
    Drop(PathBuf),
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "list" | "ls" | "refresh" => ShellCommand::Refresh,
        "upload" => match parse_dropped_paths(rest).into_iter().next() {
            Some(path) => ShellCommand::Upload(path),
            None => ShellCommand::Unknown("usage: upload <path>".to_string()),
        },
        "delete" | "rm" if !rest.is_empty() => ShellCommand::Delete(rest.to_string()),
        "delete" | "rm" => ShellCommand::Unknown("usage: delete <name>".to_string()),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => {
            // only the first of several dropped files is taken
            match parse_dropped_paths(line).into_iter().next() {
                Some(path) if path.is_file() => ShellCommand::Drop(path),
                _ => ShellCommand::Unknown(format!("unknown command '{}' (try help)", word)),
            }
        }
    }
}

/// Interactive session over an already-loaded client
pub async fn run<B: FileBackend>(mut client: FileRegistryClient<B>) -> Result<ExitCode> {
    println!("{}", render::render_view(client.registry(), client.feedback()));
    println!("type 'help' for commands");

    // Tell the user while an upload is in flight
    let mut upload_state = client.subscribe_upload_state();
    tokio::spawn(async move {
        while upload_state.changed().await.is_ok() {
            if *upload_state.borrow_and_update() == UploadState::Uploading {
                eprintln!("uploading...");
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down");
                break;
            }
        };
        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };

        match parse_command(&line) {
            ShellCommand::Empty => continue,
            ShellCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            ShellCommand::Quit => break,
            ShellCommand::Unknown(msg) => {
                println!("{}", msg);
                continue;
            }
            ShellCommand::Refresh => client.list().await,
            ShellCommand::Upload(path) => crate::upload_path(&mut client, &path).await,
            ShellCommand::Delete(name) => client.delete(&name).await,
            ShellCommand::Drop(path) => crate::upload_path(&mut client, &path).await,
        }

        println!("{}", render::render_view(client.registry(), client.feedback()));
    }

    println!();
    Ok(ExitCode::SUCCESS)
}
