use std::fmt;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Severity {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Severity {
    #[cfg(test)]
    pub fn from_i32(value: i32) -> Severity {
        match value {
            0 => Severity::Ok,
            1 => Severity::Warning,
            2 => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

/// Outcome of a single check run, rendered as one plugin output line.
#[derive(PartialEq, Debug)]
pub struct CheckResult {
    pub severity: Severity,
    pub message: String,
    pub perfdata: Option<Vec<String>>,
}

impl CheckResult {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        CheckResult {
            severity,
            message: message.into(),
            perfdata: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        CheckResult::new(Severity::Ok, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        CheckResult::new(Severity::Critical, message)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.severity.label(), self.message)?;
        if let Some(perfdata) = &self.perfdata {
            write!(f, " | {}", perfdata.join(","))?;
        }
        Ok(())
    }
}

pub trait IcingaTermination {
    fn exitcode(&self) -> Severity;

    fn report(&self) -> !;
}

impl IcingaTermination for CheckResult {
    fn exitcode(&self) -> Severity {
        self.severity
    }

    fn report(&self) -> ! {
        println!("{}", self);
        std::process::exit(self.exitcode() as i32);
    }
}

/// Reports the first result of the sequence and terminates the process.
pub fn emit<I>(results: I) -> !
where
    I: IntoIterator<Item = CheckResult>,
{
    match results.into_iter().next() {
        Some(result) => result.report(),
        None => CheckResult::new(Severity::Unknown, "No check result").report(),
    }
}

pub fn icinga_exit<E>(result: Result<CheckResult, E>) -> !
where
    E: IcingaTermination,
{
    match result {
        Ok(check_result) => emit(Some(check_result)),
        Err(termination) => termination.report(),
    }
}
