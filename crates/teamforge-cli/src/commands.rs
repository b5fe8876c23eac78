//! Command handlers.
//!
//! Output goes to the given writer so commands can be checked in tests;
//! `main` passes stdout.

use std::io::Write;

use teamforge_config::Configuration;
use teamforge_engine::Engine;
use teamforge_scoring::RankedTeam;
use teamforge_store::StoreRouter;

use crate::error::{CliError, CliExitCode};
use crate::Command;

/// Runs one command, writing its output to `out`.
pub(crate) fn execute<W: Write>(command: Command, out: &mut W) -> Result<CliExitCode, CliError> {
    match command {
        Command::Distribute { config } => {
            for name in engine(&config)?.distribute()? {
                writeln!(out, "{}", name)?;
            }
        }
        Command::Evaluate { task, config } => {
            let stored = engine(&config)?.evaluate(&task)?;
            writeln!(out, "{}: {} teams", task, stored)?;
        }
        Command::Reduce { model, config } => {
            let engine = engine(&config)?;
            let rankings = match model {
                Some(model) => {
                    let ranked = engine.reduce(&model)?;
                    vec![(model, ranked)]
                }
                None => engine.reduce_all()?,
            };
            for (model, ranked) in &rankings {
                write_ranking(out, model, ranked)?;
            }
        }
        Command::Result { model, config } => {
            let ranked = engine(&config)?.result(&model)?;
            write_ranking(out, &model, &ranked)?;
        }
        Command::Explain {
            model,
            first,
            second,
            third,
            config,
        } => {
            let explanation = engine(&config)?.explain(&model, [first, second, third])?;
            serde_json::to_writer_pretty(&mut *out, &explanation)?;
            writeln!(out)?;
        }
        Command::Run { config } => {
            let report = engine(&config)?.run()?;
            for outcome in &report.outcomes {
                if let Ok(ranked) = &outcome.result {
                    write_ranking(out, &outcome.model, ranked)?;
                }
            }
            writeln!(out, "{}", report)?;
            if !report.is_success() {
                return Ok(CliExitCode::PartialFailure);
            }
        }
    }
    Ok(CliExitCode::Success)
}

fn engine(args: &[String]) -> Result<Engine<StoreRouter>, CliError> {
    let config = Configuration::from_args(args)?;
    Ok(Engine::from_config(&config)?)
}

fn write_ranking<W: Write>(out: &mut W, model: &str, ranked: &[RankedTeam]) -> Result<(), CliError> {
    writeln!(out, "{}", model)?;
    for (position, team) in ranked.iter().enumerate() {
        writeln!(out, "{:>4}. {}", position + 1, team)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge_store::{DataKind, TableStore};
    use teamforge_test::synthetic_roster;

    struct Workspace {
        _dir: tempfile::TempDir,
        args: Vec<String>,
    }

    impl Workspace {
        fn new(candidates: usize) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut args: Vec<String> = [
                "partition-size=27",
                "results-size=3",
                "store.evaluation=configuration",
                "store.enriched-library=file",
                "store.partition=file",
                "store.partition-result=file",
                "store.result=file",
                "evaluation.m.weights.attack=1",
                "evaluation.m.weights.hp=2",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect();
            args.push(format!("file.directory={}", dir.path().display()));

            let config = Configuration::from_args(&args).unwrap();
            Engine::from_config(&config)
                .unwrap()
                .store()
                .write(
                    DataKind::EnrichedLibrary,
                    Some("m"),
                    &synthetic_roster(candidates).to_table(),
                )
                .unwrap();
            Self { _dir: dir, args }
        }

        fn run(&self, command: impl FnOnce(Vec<String>) -> Command) -> (CliExitCode, String) {
            let mut out = Vec::new();
            let code = execute(command(self.args.clone()), &mut out).unwrap();
            (code, String::from_utf8(out).unwrap())
        }
    }

    #[test]
    fn test_step_by_step() {
        let ws = Workspace::new(10);

        let (code, out) = ws.run(|config| Command::Distribute { config });
        assert_eq!(code, CliExitCode::Success);
        let tasks: Vec<String> = out.lines().map(str::to_string).collect();
        // 4 blocks of 3 rows
        assert_eq!(tasks.len(), 20);
        assert_eq!(tasks[0], "m.0");

        for task in tasks {
            let (_, out) = ws.run(|config| Command::Evaluate {
                task: task.clone(),
                config,
            });
            assert!(out.starts_with(&format!("{}: ", task)));
        }

        let (_, reduced) = ws.run(|config| Command::Reduce {
            model: None,
            config,
        });
        let (_, stored) = ws.run(|config| Command::Result {
            model: "m".to_string(),
            config,
        });
        assert_eq!(reduced, stored);
        assert_eq!(stored.lines().count(), 4);
        assert!(stored.starts_with("m\n   1. ["));
    }

    #[test]
    fn test_run_and_explain() {
        let ws = Workspace::new(6);
        let (code, out) = ws.run(|config| Command::Run { config });
        assert_eq!(code, CliExitCode::Success);
        assert!(out.contains("m: 4 tasks, 3 teams ranked"));

        let (_, out) = ws.run(|config| Command::Explain {
            model: "m".to_string(),
            first: "candidate-000".to_string(),
            second: "candidate-001".to_string(),
            third: "candidate-002".to_string(),
            config,
        });
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(json["score"].is_number());
        assert_eq!(json["hp"]["weight"], 2);
    }

    #[test]
    fn test_errors_map_to_exit_codes() {
        let ws = Workspace::new(6);
        let err = execute(
            Command::Evaluate {
                task: "m.99".to_string(),
                config: ws.args.clone(),
            },
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(CliExitCode::from(&err), CliExitCode::DataContract);

        let err = execute(
            Command::Run {
                config: vec!["results-size=3".to_string()],
            },
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(CliExitCode::from(&err), CliExitCode::Configuration);
    }
}
