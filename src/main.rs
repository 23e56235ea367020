//! Aula 命令行入口
//!
//! ```text
//! aula today [--date YYYY-MM-DD[THH:MM:SS]]
//! aula settings [--grade G] [--start-date YYYY-MM-DD]
//! aula import-curriculum <pdf-text-file>
//! aula import-roster <rows.json>
//! aula text <summarize|correct|expand> <text-file>
//! aula student <name> [--set detail=value]...
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use aula::config::{load_config, AppConfig};
use aula::curriculum::{
    current_time_slot, parse_local_date, DayPlan, DayResolver, SchoolSettings,
    SchoolSettingsPatch, TimeSlot,
};
use aula::ingest::{Ingestor, TextAction};
use aula::llm::create_llm_from_config;
use aula::store::{JsonFileStore, Repository};

#[derive(Parser, Debug)]
#[command(name = "aula")]
#[command(about = "Aula: importación de planes con IA y plan del día")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan del día en JSON
    Today {
        /// YYYY-MM-DD o YYYY-MM-DDTHH:MM:SS; por defecto, la hora local
        #[arg(long, value_parser = parse_now)]
        date: Option<NaiveDateTime>,
    },
    /// Actualiza el grado seleccionado y la fecha de inicio de clases
    Settings {
        #[arg(long)]
        grade: Option<String>,
        #[arg(long, value_parser = parse_start_date)]
        start_date: Option<String>,
    },
    /// Importa un plan de estudios desde el texto extraído de un PDF
    ImportCurriculum { path: PathBuf },
    /// Importa listas de alumnos desde filas de hoja de cálculo (JSON)
    ImportRoster { path: PathBuf },
    /// Resume, corrige o expande un texto
    Text { action: TextAction, path: PathBuf },
    /// Muestra o actualiza los detalles de un alumno
    Student {
        name: String,
        /// detalle=valor; el valor se lee como JSON si es válido
        #[arg(long = "set", value_parser = parse_detail)]
        set: Vec<(String, Value)>,
    },
}

/// `today` 的输出：当天计划加上当前课时（若配置了课时表）
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayReport<'a> {
    #[serde(flatten)]
    plan: &'a DayPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_slot: Option<&'a TimeSlot>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = load_config(std::env::var("AULA_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|e| {
            eprintln!("Config load failed ({e}), using defaults");
            AppConfig::default()
        });
    aula::observability::init(&cfg.app.log_level);

    let store = Arc::new(JsonFileStore::new(&cfg.storage.data_dir));
    let repo = Repository::new(store).with_default_settings(SchoolSettings {
        start_date: cfg.school.start_date.clone(),
        selected_grade: None,
    });

    match cli.command {
        Command::Today { date } => {
            let now = date.unwrap_or_else(|| chrono::Local::now().naive_local());
            let curriculum = repo.load_curriculum().context("Failed to load curriculum")?;
            let settings = repo.school_settings().context("Failed to load settings")?;
            let plan = DayResolver::new(cfg.school.fallback_grade.clone())
                .resolve_today(&curriculum, &settings, now);
            let report = TodayReport {
                plan: &plan,
                current_slot: current_time_slot(&cfg.school.time_slots, now.time()),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Settings { grade, start_date } => {
            let settings = repo
                .update_school_settings(SchoolSettingsPatch {
                    start_date,
                    selected_grade: grade,
                })
                .context("Failed to save settings")?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::ImportCurriculum { path } => {
            let text = read_file(&path)?;
            let ingestor = Ingestor::new(create_llm_from_config(&cfg), cfg.ingest.clone());
            let grades = ingestor
                .import_curriculum(&repo, &text)
                .await
                .context("Error al procesar el plan de estudios con IA")?;
            println!("Plan de estudios actualizado: {}", grades.join(", "));
        }
        Command::ImportRoster { path } => {
            let rows: Value =
                serde_json::from_str(&read_file(&path)?).context("Roster file is not valid JSON")?;
            let ingestor = Ingestor::new(create_llm_from_config(&cfg), cfg.ingest.clone());
            let lists = ingestor
                .import_roster(&repo, &rows)
                .await
                .context("Error al procesar la lista de alumnos con IA")?;
            for (class, students) in &lists {
                println!("{class}: {} alumnos", students.len());
            }
        }
        Command::Text { action, path } => {
            let text = read_file(&path)?;
            let ingestor = Ingestor::new(create_llm_from_config(&cfg), cfg.ingest.clone());
            let output = ingestor
                .text(action, &text)
                .await
                .context("Error al procesar texto con IA")?;
            println!("{output}");
        }
        Command::Student { name, set } => {
            let mut detail = repo
                .student_detail(&name)
                .context("Failed to load student details")?;
            for (key, value) in set {
                detail = repo
                    .update_student_detail(&name, &key, value)
                    .context("Failed to save student details")?;
            }
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// "YYYY-MM-DD" 取当天 00:00，或完整的 "YYYY-MM-DDTHH:MM:SS"
fn parse_now(text: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    parse_local_date(text)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, got '{text}'"))
}

fn parse_start_date(text: &str) -> Result<String, String> {
    parse_local_date(text)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| format!("expected YYYY-MM-DD, got '{text}'"))
}

fn parse_detail(text: &str) -> Result<(String, Value), String> {
    let (key, raw) = text
        .split_once('=')
        .ok_or_else(|| format!("expected detail=value, got '{text}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing detail name in '{text}'"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("aula").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_today_date_forms() {
        match parse(&["today", "--date", "2025-08-26"]).unwrap() {
            Command::Today { date } => {
                assert_eq!(date.unwrap().to_string(), "2025-08-26 00:00:00");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        match parse(&["today", "--date", "2025-08-26T23:59:59"]).unwrap() {
            Command::Today { date } => {
                assert_eq!(date.unwrap().to_string(), "2025-08-26 23:59:59");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(matches!(parse(&["today"]).unwrap(), Command::Today { date: None }));
    }

    #[test]
    fn test_bad_flags_are_rejected() {
        assert!(parse(&["today", "--date"]).is_err());
        assert!(parse(&["today", "--dat", "2025-08-26"]).is_err());
        assert!(parse(&["today", "--date", "26/08/2025"]).is_err());
        assert!(parse(&["settings", "--grade", "--start-date", "2025-09-01"]).is_err());
        assert!(parse(&["settings", "--start-date", "2025-13-01"]).is_err());
        assert!(parse(&["text", "shout", "notes.txt"]).is_err());
        assert!(parse(&["import-curriculum"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_settings_flags() {
        match parse(&["settings", "--grade", "3º", "--start-date", "2025-09-01"]).unwrap() {
            Command::Settings { grade, start_date } => {
                assert_eq!(grade.as_deref(), Some("3º"));
                assert_eq!(start_date.as_deref(), Some("2025-09-01"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_text_and_student_arguments() {
        match parse(&["text", "expand", "notes.txt"]).unwrap() {
            Command::Text { action, path } => {
                assert_eq!(action, TextAction::Expand);
                assert_eq!(path, PathBuf::from("notes.txt"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        match parse(&["student", "Ana López", "--set", "tutor=María", "--set", "nee=true"]).unwrap()
        {
            Command::Student { name, set } => {
                assert_eq!(name, "Ana López");
                assert_eq!(
                    set,
                    vec![
                        ("tutor".to_string(), json!("María")),
                        ("nee".to_string(), json!(true)),
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(parse(&["student", "Ana", "--set", "=x"]).is_err());
        assert!(parse(&["student", "Ana", "--set", "tutor"]).is_err());
    }

    #[test]
    fn test_today_report_adds_current_slot() {
        let plan = DayPlan::Weekend {
            message: "fin".to_string(),
        };
        let slot = TimeSlot {
            time: "08:00 - 08:50".to_string(),
            label: "Español".to_string(),
        };
        let value = serde_json::to_value(TodayReport {
            plan: &plan,
            current_slot: Some(&slot),
        })
        .unwrap();
        assert_eq!(value["status"], "weekend");
        assert_eq!(value["currentSlot"]["label"], "Español");

        let value = serde_json::to_value(TodayReport {
            plan: &plan,
            current_slot: None,
        })
        .unwrap();
        assert!(value.get("currentSlot").is_none());
    }
}
