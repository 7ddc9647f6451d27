// src/cli.rs
use std::{env, path::PathBuf};

use crate::csv::Delim;
use crate::params::Params;
use crate::runner::{self, Progress};

struct ConsoleProgress;
impl Progress for ConsoleProgress {
    fn update_status(&mut self, msg: &str) {
        println!("{msg}...");
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let params = parse(env::args().skip(1))?;
    let mut progress = ConsoleProgress;
    let summary = runner::run(&params, Some(&mut progress))?;
    println!(
        "Done: {} row(s) kept ({} dropped), {} record(s), {} sheet(s) under {}",
        summary.rows_extracted,
        summary.rows_dropped,
        summary.records,
        summary.sheets_written.len(),
        params.workbook_path().display(),
    );
    Ok(())
}

fn parse<I: Iterator<Item = String>>(args: I) -> Result<Params, Box<dyn std::error::Error>> {
    // Credentials may come from the environment, keeping them out of
    // shell history.
    parse_with_env(args, env::var("RTS_USER").ok(), env::var("RTS_PASS").ok())
}

fn parse_with_env<I: Iterator<Item = String>>(
    mut args: I,
    env_user: Option<String>,
    env_pass: Option<String>,
) -> Result<Params, Box<dyn std::error::Error>> {
    let mut params = Params::new();
    while let Some(a) = args.next() {
        match a.as_str()
        {
            "-u" | "--user" => params.username = args.next().ok_or("Missing value for --user")?,
            "-p" | "--pass" => params.password = args.next().ok_or("Missing value for --pass")?,
            "--url" => params.roster_url = args.next().ok_or("Missing value for --url")?,
            "--login-url" => params.login_url = args.next().ok_or("Missing value for --login-url")?,
            "-o" | "--out" => params.out = Some(PathBuf::from(args.next().ok_or("Missing output path")?)),
            "--format" => {
                let v = args.next().ok_or("Missing value for --format")?;
                params.format = match v.to_ascii_lowercase().as_str() {
                    "csv" => Delim::Csv,
                    "tsv" => Delim::Tsv,
                    other => return Err(format!("Unknown format: {}", other).into()),
                };}
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    if params.username.is_empty() {
        if let Some(v) = env_user { params.username = v; }
    }
    if params.password.is_empty() {
        if let Some(v) = env_pass { params.password = v; }
    }

    if params.username.is_empty() { return Err("Username required (-u or RTS_USER)".into()); }
    if params.password.is_empty() { return Err("Password required (-p or RTS_PASS)".into()); }
    if params.roster_url.is_empty() { return Err("Roster URL required (--url)".into()); }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> std::vec::IntoIter<String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    // Tests pin the env credentials instead of reading the real
    // environment, so an exported RTS_USER/RTS_PASS cannot skew them.
    fn parse_no_env<I: Iterator<Item = String>>(
        a: I,
    ) -> Result<Params, Box<dyn std::error::Error>> {
        parse_with_env(a, None, None)
    }

    #[test]
    fn parse_full_set() {
        let p = parse_no_env(args(&[
            "-u", "me", "-p", "secret", "--url", "https://example.test/report",
            "-o", "wb", "--format", "tsv",
        ]))
        .unwrap();
        assert_eq!(p.username, "me");
        assert_eq!(p.roster_url, "https://example.test/report");
        assert_eq!(p.out, Some(PathBuf::from("wb")));
        assert_eq!(p.format, Delim::Tsv);
    }

    #[test]
    fn parse_rejects_missing_url() {
        assert!(parse_no_env(args(&["-u", "me", "-p", "secret"])).is_err());
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        assert!(parse_no_env(args(&["--bogus"])).is_err());
    }

    #[test]
    fn parse_rejects_unknown_format() {
        assert!(parse_no_env(args(&["--format", "xlsx"])).is_err());
    }

    #[test]
    fn env_credentials_fill_missing_flags() {
        let p = parse_with_env(
            args(&["--url", "https://example.test/report"]),
            Some("envuser".into()),
            Some("envpass".into()),
        )
        .unwrap();
        assert_eq!(p.username, "envuser");
        assert_eq!(p.password, "envpass");
    }

    #[test]
    fn flags_beat_env_credentials() {
        let p = parse_with_env(
            args(&["-u", "me", "-p", "secret", "--url", "https://example.test/report"]),
            Some("envuser".into()),
            Some("envpass".into()),
        )
        .unwrap();
        assert_eq!(p.username, "me");
        assert_eq!(p.password, "secret");
    }
}
