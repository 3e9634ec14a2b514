use anyhow::Result;

use crate::cli;
use crate::push::{process_path, AppFiles, Zipper};

pub async fn run_preview(path: Option<String>, all: bool) -> Result<()> {
    let app_path = cli::resolve_app_path(path)?;

    println!("Scanning application: {}\n", app_path.display());

    let files = process_path(&Zipper::new(), &app_path, |app_dir| async move {
        AppFiles::new().app_files_in_dir(&app_dir)
    })
    .await?;

    let total_bytes: u64 = files.iter().map(|f| f.size).sum();

    println!("Summary:");
    println!("  Files considered for upload: {}", files.len());
    println!("  Total size: {}", cli::format_size(total_bytes));

    if all {
        println!("\nFiles:");
        for file in &files {
            println!("  {:>12}  {}  {}", file.size, &file.hash[..12], file.path);
        }
    } else if !files.is_empty() {
        println!("\n  Use --all to see every file");
    }

    Ok(())
}
