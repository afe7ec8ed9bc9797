//! CLI mínima:
//! `catalog-sync sync [--parallel <N>]`
//! `catalog-sync show <database> <schema> <table>`
//! `catalog-sync list`
//! `catalog-sync migrate`

use catalog_domain::TableKey;

use crate::config::parse_parallelism;
use crate::errors::AppError;

pub const USAGE: &str = "Uso: catalog-sync <sync [--parallel <N>] | show <database> <schema> <table> | list | migrate>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Una pasada de sincronización. `parallel` sobrescribe `SYNC_PARALLELISM`.
    Sync { parallel: Option<usize> },
    Show(TableKey),
    List,
    Migrate,
}

/// Interpreta `args` (sin el nombre del binario).
pub fn parse_args(args: &[String]) -> Result<Command, AppError> {
    let Some(cmd) = args.first() else {
        return Err(AppError::Usage("falta comando".into()));
    };
    match cmd.as_str() {
        "sync" => {
            let mut parallel = None;
            let mut i = 1;
            while i < args.len() {
                match args[i].as_str() {
                    "--parallel" => {
                        i += 1;
                        let raw = args.get(i).ok_or_else(|| AppError::Usage("--parallel requiere un valor".into()))?;
                        parallel = Some(parse_parallelism(raw).map_err(|e| AppError::Usage(e.to_string()))?);
                    }
                    other => return Err(AppError::Usage(format!("argumento desconocido: {other}"))),
                }
                i += 1;
            }
            Ok(Command::Sync { parallel })
        }
        "show" => match &args[1..] {
            [database, schema, table] => Ok(Command::Show(TableKey::new(database.as_str(), schema.as_str(), table.as_str()))),
            _ => Err(AppError::Usage("show requiere <database> <schema> <table>".into())),
        },
        "list" if args.len() == 1 => Ok(Command::List),
        "migrate" if args.len() == 1 => Ok(Command::Migrate),
        other => Err(AppError::Usage(format!("comando desconocido: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_sync_with_and_without_parallel() {
        assert_eq!(parse_args(&args(&["sync"])).unwrap(), Command::Sync { parallel: None });
        assert_eq!(parse_args(&args(&["sync", "--parallel", "4"])).unwrap(), Command::Sync { parallel: Some(4) });
    }

    #[test]
    fn parses_show_key() {
        assert_eq!(parse_args(&args(&["show", "D", "S", "T"])).unwrap(),
                   Command::Show(TableKey::new("D", "S", "T")));
    }

    #[test]
    fn rejects_bad_input_as_usage() {
        for bad in [vec![], vec!["sync", "--parallel"], vec!["sync", "--parallel", "0"], vec!["show", "D"], vec!["drop"], vec!["list", "x"]] {
            let err = parse_args(&args(&bad)).unwrap_err();
            assert_eq!(err.exit_code(), 2, "entrada {bad:?}");
        }
    }
}
