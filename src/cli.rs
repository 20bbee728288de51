use crate::checks::{CheckType, DiskPolicy, DEFAULT_ONLINE_STATES};
use crate::client::Target;
use clap::{value_t, App, Arg, ArgMatches};
use std::time::Duration;

fn parser<'a, 'b>() -> App<'a, 'b> {
    App::new("check_freenas")
        .about("Check the health of a FreeNAS appliance through its REST API.")
        .version("0.1.0")
        .arg(
            Arg::with_name("hostname")
                .short("H")
                .long("hostname")
                .takes_value(true)
                .required(true)
                .help("Address of the appliance."),
        )
        .arg(
            Arg::with_name("user")
                .short("u")
                .long("user")
                .takes_value(true)
                .required(true)
                .help("API user name."),
        )
        .arg(
            Arg::with_name("passwd")
                .short("p")
                .long("passwd")
                .takes_value(true)
                .required(true)
                .help("API password."),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .takes_value(true)
                .default_value("5")
                .validator(|value| match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(()),
                    _ => Err(format!("timeout must be at least one whole second, got {}", value)),
                })
                .help("Request timeout in seconds."),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .takes_value(false)
                .help("Log diagnostics to stderr and let connection errors fail with a full trace."),
        )
        .arg(
            Arg::with_name("ignorecerts")
                .short("i")
                .long("ignorecerts")
                .takes_value(false)
                .help("Toggle TLS certificate verification. Certificates are not verified unless given."),
        )
        .arg(
            Arg::with_name("check")
                .short("c")
                .long("check")
                .takes_value(true)
                .required(true)
                .possible_values(CheckType::NAMES)
                .help("What to check."),
        )
        .arg(
            Arg::with_name("online-states")
                .long("online-states")
                .takes_value(true)
                .use_delimiter(true)
                .default_value(DEFAULT_ONLINE_STATES)
                .help("Comma separated disk states that count as online."),
        )
}

pub struct Cli {
    pub hostname: String,
    pub user: String,
    pub passwd: String,
    pub timeout: u64,
    pub verbose: bool,
    pub verify_certs: bool,
    pub check: CheckType,
    pub online_states: Vec<String>,
}

impl Cli {
    pub fn parsed() -> Self {
        let matches = parser().get_matches();
        Cli::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let check = value_t!(matches, "check", CheckType).unwrap_or_else(|e| e.exit());
        let online_states = matches
            .values_of("online-states")
            .map(|values| {
                values
                    .flat_map(|value| value.split(','))
                    .map(str::trim)
                    .filter(|state| !state.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Cli {
            hostname: matches.value_of("hostname").unwrap_or_default().to_owned(),
            user: matches.value_of("user").unwrap_or_default().to_owned(),
            passwd: matches.value_of("passwd").unwrap_or_default().to_owned(),
            timeout: value_t!(matches, "timeout", u64).unwrap_or_else(|e| e.exit()),
            verbose: matches.is_present("verbose"),
            verify_certs: matches.is_present("ignorecerts"),
            check,
            online_states,
        }
    }

    pub fn target(&self) -> Target {
        Target {
            host: self.hostname.clone(),
            user: self.user.clone(),
            secret: self.passwd.clone(),
            timeout: Duration::from_secs(self.timeout),
            verify_certs: self.verify_certs,
        }
    }

    pub fn disk_policy(&self) -> DiskPolicy {
        DiskPolicy::new(self.online_states.iter().cloned())
    }
}

#[test]
fn test_min_cli() {
    let matches = parser()
        .get_matches_from_safe(vec![
            "check_freenas", "-H", "nas", "-u", "root", "-p", "secret", "-c", "disks",
        ])
        .unwrap();
    let cli = Cli::from_matches(&matches);
    assert_eq!(cli.hostname, "nas");
    assert_eq!(cli.user, "root");
    assert_eq!(cli.passwd, "secret");
    assert_eq!(cli.timeout, 5);
    assert_eq!(cli.verbose, false);
    assert_eq!(cli.verify_certs, false);
    assert_eq!(cli.check, CheckType::Disks);
    assert_eq!(cli.online_states, ["ONLINE", "AVAIL"]);
    assert_eq!(cli.online_states.join(","), DEFAULT_ONLINE_STATES);

    let target = cli.target();
    assert_eq!(target.timeout, Duration::from_secs(5));
    assert_eq!(target.verify_certs, false);
    assert!(cli.disk_policy().accepts("AVAIL"));
}

#[test]
fn test_max_cli() {
    let matches = parser()
        .get_matches_from_safe(vec![
            "check_freenas",
            "--hostname",
            "10.0.0.7",
            "--user",
            "monitor",
            "--passwd",
            "hunter2",
            "--timeout",
            "12",
            "--verbose",
            "--ignorecerts",
            "--check",
            "alerts",
            "--online-states",
            "ONLINE",
        ])
        .unwrap();
    let cli = Cli::from_matches(&matches);
    assert_eq!(cli.hostname, "10.0.0.7");
    assert_eq!(cli.timeout, 12);
    assert_eq!(cli.verbose, true);
    assert_eq!(cli.verify_certs, true);
    assert_eq!(cli.check, CheckType::Alerts);
    assert_eq!(cli.online_states, ["ONLINE"]);
    assert!(!cli.disk_policy().accepts("AVAIL"));
}

#[test]
fn test_rejected_cli() {
    let base = vec!["check_freenas", "-H", "nas", "-u", "root", "-p", "secret"];

    let mut args = base.clone();
    args.extend(&["-c", "pools"]);
    assert!(parser().get_matches_from_safe(args).is_err());

    let mut args = base.clone();
    args.extend(&["-c", "volumes", "-t", "soon"]);
    assert!(parser().get_matches_from_safe(args).is_err());

    let mut args = base.clone();
    args.extend(&["-c", "volumes", "-t", "0"]);
    assert!(parser().get_matches_from_safe(args).is_err());

    // check type is mandatory
    assert!(parser().get_matches_from_safe(base).is_err());

    assert!(parser()
        .get_matches_from_safe(vec!["check_freenas", "-H", "nas", "-c", "volumes"])
        .is_err());
}
