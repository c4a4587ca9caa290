use anyhow::{Context, Result};
use bin2_core::{FileStore, decrypt, encrypt, has_header, is_encrypted};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bin2-cli")]
#[command(about = "Bin2.0 asset (de|en)crypt – CLI tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a plaintext asset file
    Encrypt {
        /// Path to the plaintext asset file
        plain: PathBuf,

        /// Path to write the encrypted asset
        out_cipher: PathBuf,
    },

    /// Decrypt an encrypted asset file (unencrypted input passes through)
    Decrypt {
        /// Path to the encrypted asset file
        cipher: PathBuf,

        /// Path to write the decrypted plaintext
        out_plain: PathBuf,
    },

    /// Check whether a file carries the Bin2.0 header
    Check {
        /// Path to the file to inspect
        file: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt { plain, out_cipher } => {
            cmd_encrypt(&plain, &out_cipher)?;
        }
        Commands::Decrypt { cipher, out_plain } => {
            cmd_decrypt(&cipher, &out_plain)?;
        }
        Commands::Check { file } => {
            if !cmd_check(&file)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn cmd_encrypt(plain_path: &PathBuf, out_cipher_path: &PathBuf) -> Result<()> {
    let plain = fs::read(plain_path)
        .with_context(|| format!("Failed to read plaintext file: {}", plain_path.display()))?;

    println!("[info] len(plain)={}", plain.len());

    // Rejects input that already carries the header
    let cipher = encrypt(&plain)?;

    fs::write(out_cipher_path, &cipher)
        .with_context(|| format!("Failed to write cipher file: {}", out_cipher_path.display()))?;

    println!("[ok] wrote encrypted asset -> {}", out_cipher_path.display());

    Ok(())
}

fn cmd_decrypt(cipher_path: &PathBuf, out_plain_path: &PathBuf) -> Result<()> {
    let bytes = fs::read(cipher_path)
        .with_context(|| format!("Failed to read cipher file: {}", cipher_path.display()))?;

    println!("[info] len(enc)={}", bytes.len());

    // Unencrypted files are legitimate; copy them through unchanged
    let plain = if has_header(&bytes) {
        decrypt(&bytes)?
    } else {
        eprintln!("[warn] no %BIN_2.0 header – copying input through unchanged");
        bytes
    };

    fs::write(out_plain_path, &plain)
        .with_context(|| format!("Failed to write plaintext file: {}", out_plain_path.display()))?;

    println!("[ok] wrote plaintext -> {}", out_plain_path.display());

    Ok(())
}

fn cmd_check(path: &PathBuf) -> Result<bool> {
    let mut store = FileStore::new(path);
    let encrypted = is_encrypted(&mut store)?;

    println!(
        "[info] {} -> {}",
        path.display(),
        if encrypted { "encrypted (Bin2.0)" } else { "not encrypted" }
    );

    Ok(encrypted)
}
