//! Argument parsing for the two sidecar binaries.
//!
//! Both accept the flags the way the Go `flag` package does (`-refresh 10s`, `-output=x`)
//! as well as the usual `--refresh`.

use crate::{Config, PersistMode};
use clap::builder::BoolishValueParser;
use clap::{value_parser, Arg, ArgAction, Command};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// `mcrouter-sidecar`: writes only on change, has `-debug`
    ChangeDetecting,
    /// `mcrouter-config-writer`: writes every cycle
    Unconditional,
}

impl Profile {
    pub fn binary_name(self) -> &'static str {
        match self {
            Profile::ChangeDetecting => "mcrouter-sidecar",
            Profile::Unconditional => "mcrouter-config-writer",
        }
    }

    fn default_refresh(self) -> &'static str {
        match self {
            Profile::ChangeDetecting => "5s",
            Profile::Unconditional => "25s",
        }
    }

    fn default_output(self) -> &'static str {
        match self {
            Profile::ChangeDetecting => "mcrouter.conf",
            Profile::Unconditional => "config.json",
        }
    }

    fn mode(self) -> PersistMode {
        match self {
            Profile::ChangeDetecting => PersistMode::ChangeDetecting,
            Profile::Unconditional => PersistMode::Unconditional,
        }
    }
}

#[derive(Debug)]
pub enum UsageError {
    MissingServiceName { usage: String },
    Invalid(clap::Error),
}

impl UsageError {
    pub fn exit_code(&self) -> i32 {
        match self {
            UsageError::MissingServiceName { .. } => 2,
            UsageError::Invalid(e) => e.exit_code(),
        }
    }

    /// Prints usage (stdout) or the parse error (stderr) and exits.
    pub fn exit(self) -> ! {
        match self {
            UsageError::MissingServiceName { usage } => {
                print!("{}", usage);
                process::exit(2);
            }
            UsageError::Invalid(e) => e.exit(),
        }
    }
}

pub fn command(profile: Profile) -> Command {
    let name = profile.binary_name();

    let command = Command::new(name)
        .about("Keeps an mcrouter config in sync with the IPv4 addresses behind a service name")
        .override_usage(format!("{} [OPTIONS] SVC_NAME", name))
        .arg(
            Arg::new("refresh")
                .long("refresh")
                .value_name("DURATION")
                .default_value(profile.default_refresh())
                .value_parser(humantime::parse_duration)
                .help("Specify time to wait between DNS queries."),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("PATH")
                .default_value(profile.default_output())
                .value_parser(value_parser!(PathBuf))
                .help("Path to output file."),
        )
        .arg(Arg::new("SVC_NAME").help("Service name to resolve."));

    match profile {
        Profile::ChangeDetecting => command.arg(
            // Like a Go bool flag: bare `-debug` is true and it never eats the next argument
            Arg::new("debug")
                .long("debug")
                .value_name("BOOL")
                .num_args(0..=1)
                .require_equals(true)
                .default_value("false")
                .default_missing_value("true")
                .value_parser(BoolishValueParser::new())
                .action(ArgAction::Set)
                .help("Enable debug output."),
        ),
        Profile::Unconditional => command,
    }
}

pub fn parse_from<I, T>(profile: Profile, args: I) -> Result<Config, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut command = command(profile);
    let matches = command.try_get_matches_from_mut(normalize_args(args))
        .map_err(UsageError::Invalid)?;

    let service_name = match matches.get_one::<String>("SVC_NAME") {
        Some(name) if !name.is_empty() => name.clone(),
        _ => {
            return Err(UsageError::MissingServiceName {
                usage: command.render_help().to_string(),
            });
        }
    };

    Ok(Config {
        service_name,
        refresh: matches.get_one::<Duration>("refresh").copied().unwrap_or_default(),
        output: matches.get_one::<PathBuf>("output").cloned().unwrap_or_default(),
        mode: profile.mode(),
        debug: matches.try_get_one::<bool>("debug").ok().flatten().copied().unwrap_or(false),
        resolve_timeout: Some(DEFAULT_RESOLVE_TIMEOUT),
    })
}

/// Parses the process arguments, exiting on usage errors.
pub fn config_or_exit(profile: Profile) -> Config {
    parse_from(profile, std::env::args_os()).unwrap_or_else(|e| e.exit())
}

// `-flag` -> `--flag`, leaving short flags, positionals and everything after `--` alone
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for (index, arg) in args.into_iter().map(Into::into).enumerate() {
        let go_style = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                false
            }
            Some(s) => index > 0 && !passthrough && s.len() > 2 && s.starts_with('-') && !s.starts_with("--"),
            None => false,
        };

        if go_style {
            let mut long = OsString::from("-");
            long.push(&arg);
            normalized.push(long);
        } else {
            normalized.push(arg);
        }
    }

    normalized
}
