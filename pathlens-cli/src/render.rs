use anyhow::Result;
use colored::Colorize;
use pathlens_core::{Classification, DirectoryRecord, ExecutableKind, ScanReport};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Serialize)]
pub struct ClassifiedPath {
    pub path: PathBuf,
    pub classification: Classification,
}

#[derive(Tabled)]
struct ExecutableRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Shadowed by")]
    shadowed_by: String,
}

#[derive(Tabled)]
struct ShadowRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hidden in")]
    hidden_in: String,
    #[tabled(rename = "Runs from")]
    runs_from: String,
    #[tabled(rename = "Type")]
    kind: String,
}

#[derive(Tabled)]
struct DirectoryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Directory")]
    directory: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Exists")]
    exists: String,
    #[tabled(rename = "Writable")]
    writable: String,
    #[tabled(rename = "Executables")]
    executables: String,
}

#[derive(Tabled)]
struct ClassifiedRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Language")]
    language: String,
}

fn kind_label(c: &Classification) -> String {
    let kind = c.kind().to_string();
    match c.kind() {
        ExecutableKind::Script => kind.green().to_string(),
        ExecutableKind::Binary => kind.blue().to_string(),
        ExecutableKind::Container => kind.magenta().to_string(),
    }
}

fn language_label(c: &Classification) -> String {
    c.language().unwrap_or("-").to_string()
}

fn yes_no(flag: bool) -> String {
    if flag {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn directory_heading(record: &DirectoryRecord) -> String {
    let mut heading = format!(
        "{} {}",
        record.directory.display().to_string().bold(),
        format!("[{}]", record.source_label).dimmed()
    );
    if record.duplicate {
        heading.push_str(&format!(" {}", "duplicate".yellow()));
    }
    if !record.exists {
        heading.push_str(&format!(" {}", "missing".red()));
    }
    heading
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_report(report: &ScanReport) {
    for dir in &report.directories {
        println!("{}", directory_heading(&dir.record));
        if dir.entries.is_empty() {
            println!("  No executables.");
            println!();
            continue;
        }

        let rows = dir
            .entries
            .iter()
            .map(|e| ExecutableRow {
                name: if e.is_shadowed {
                    e.name.dimmed().to_string()
                } else {
                    e.name.clone()
                },
                kind: kind_label(&e.classification),
                language: language_label(&e.classification),
                shadowed_by: e
                    .shadowing_directory
                    .as_ref()
                    .map(|d| d.display().to_string().yellow().to_string())
                    .unwrap_or_default(),
            })
            .collect();
        print_table(rows);
        println!();
    }

    println!(
        "{} executables, {} shadowed",
        report.entries().count(),
        report.shadowed().count()
    );
}

pub fn print_shadows(report: &ScanReport) {
    let rows: Vec<ShadowRow> = report
        .shadowed()
        .map(|e| ShadowRow {
            name: e.name.clone(),
            hidden_in: e.directory.display().to_string().dimmed().to_string(),
            runs_from: e.first_directory.display().to_string(),
            kind: kind_label(&e.classification),
        })
        .collect();

    if rows.is_empty() {
        println!("No shadowed executables.");
    } else {
        print_table(rows);
    }
}

pub fn print_directories(records: &[DirectoryRecord]) {
    let rows = records
        .iter()
        .enumerate()
        .map(|(i, r)| DirectoryRow {
            index: i + 1,
            directory: if r.duplicate {
                format!("{} {}", r.directory.display(), "(duplicate)".yellow())
            } else {
                r.directory.display().to_string()
            },
            source: r.source_label.clone(),
            exists: yes_no(r.exists),
            writable: yes_no(r.writable),
            executables: if r.exists && !r.duplicate {
                r.executable_names.len().to_string()
            } else {
                "-".to_string()
            },
        })
        .collect();
    print_table(rows);
}

pub fn print_classified(classified: &[ClassifiedPath]) {
    let rows = classified
        .iter()
        .map(|c| ClassifiedRow {
            path: c.path.display().to_string(),
            kind: kind_label(&c.classification),
            language: language_label(&c.classification),
        })
        .collect();
    print_table(rows);
}
