use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use sidecar_copy::{
    CopyLogEntry, CopyOutcome, FileLogStore, MemoryLogStore, RunSummary, Settings, TargetIndex, match_files,
    path_to_string, print_bold, print_error, print_warning,
};

use crate::Args;
use crate::config::Config;

#[derive(Debug)]
pub struct SideCopy {
    config: Config,
}

impl SideCopy {
    pub fn new(args: Args) -> anyhow::Result<Self> {
        let config = Config::from_args(args)?;
        if config.debug {
            eprintln!("Config: {config:#?}");
        }
        Ok(Self { config })
    }

    pub fn run(&self) -> anyhow::Result<()> {
        if self.config.show {
            self.show_settings();
            return Ok(());
        }
        if self.config.save {
            return self.save_settings();
        }
        if let Err(error) = sidecar_copy::validate(&self.config.settings) {
            print_error!("{error}");
            print_warning!("Update the settings with --source, --target and --extension");
            anyhow::bail!("Invalid settings in {}", self.config.settings_path.display());
        }
        if self.config.dryrun {
            self.print_matches()
        } else {
            self.copy_files()
        }
    }

    fn show_settings(&self) {
        let settings = &self.config.settings;
        print_bold!("Settings: {}", self.config.settings_path.display());
        println!("Source directory: {}", display_path(&settings.source_dir));
        println!("Target directory: {}", display_path(&settings.target_dir));
        println!("File extension:   {}", settings.file_extension);
        let (valid, reason) = settings.check();
        if valid {
            println!("{}", reason.green());
        } else {
            println!("{}", reason.red());
        }
    }

    fn save_settings(&self) -> anyhow::Result<()> {
        let settings = &self.config.settings;
        if let Err(invalid) = settings.validate() {
            anyhow::bail!("Settings not saved: {invalid}");
        }
        self.config
            .store()
            .save(settings)
            .context("Failed to save settings")?;
        println!("Settings saved to {}", self.config.settings_path.display());
        Ok(())
    }

    /// Dry run: show which files would be copied or skipped.
    fn print_matches(&self) -> anyhow::Result<()> {
        let Settings {
            source_dir,
            target_dir,
            file_extension,
        } = &self.config.settings;

        println!("Indexing {}", target_dir.display());
        let index = TargetIndex::build(target_dir)?;
        println!("Indexed {} file name(s) from {} file(s)", index.len(), index.files_visited());

        let pairs = match_files(&index, source_dir, file_extension)?;
        if pairs.is_empty() {
            println!("No matching files found, nothing to copy");
            return Ok(());
        }

        print_bold!("Dryrun: {} matching file(s)", pairs.len());
        for pair in &pairs {
            let name = pair.file_name();
            let dir = pair.target_dir().display();
            if pair.target.exists() {
                println!("  {} {name} already exists in {dir}", "skip".yellow());
            } else {
                println!("  {} {name} -> {dir}", "copy".green());
            }
        }
        Ok(())
    }

    fn copy_files(&self) -> anyhow::Result<()> {
        let settings = &self.config.settings;
        if self.config.verbose {
            println!("Source: {}", settings.source_dir.display());
            println!("Target: {}", settings.target_dir.display());
            println!("Extension: {}", settings.file_extension);
        }

        let summary = if let Some(log_file) = &self.config.log_file {
            sidecar_copy::run_copy(settings, &mut FileLogStore::new(log_file))?
        } else {
            sidecar_copy::run_copy(settings, &mut MemoryLogStore::default())?
        };

        self.print_summary(&summary);
        Ok(())
    }

    fn print_summary(&self, summary: &RunSummary) {
        println!(
            "Indexed {} file name(s) from {} file(s)",
            summary.indexed_count, summary.files_visited
        );
        println!("Matched {} file(s)", summary.matched_count);
        if summary.matched_count == 0 {
            println!("No matching files found, nothing to copy");
            return;
        }

        for entry in &summary.entries {
            if self.config.verbose || entry.outcome != CopyOutcome::Skipped {
                print_entry(entry);
            }
        }

        print_bold!("Copy finished");
        println!("Copied:  {}", summary.copied_count.to_string().green());
        println!("Skipped: {}", summary.skipped_count.to_string().yellow());
        if summary.failed_count > 0 {
            println!("Failed:  {}", summary.failed_count.to_string().red());
        }
        if let Some(path) = &summary.log_path {
            println!("Log saved to {}", path.display());
        }
    }
}

fn print_entry(entry: &CopyLogEntry) {
    let line = entry.to_string();
    match entry.outcome {
        CopyOutcome::Copied => println!("{}", line.green()),
        CopyOutcome::Skipped => println!("{}", line.yellow()),
        CopyOutcome::Failed => eprintln!("{}", line.red()),
    }
}

fn display_path(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "(not set)".to_string()
    } else {
        path_to_string(path)
    }
}
