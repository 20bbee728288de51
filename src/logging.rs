use std::sync::Once;

use log::{debug, LevelFilter};

static INIT: Once = Once::new();

/// Diagnostics go to stderr; stdout is reserved for the plugin output line.
pub fn setup_logging(verbose: bool) {
    let level = level_for(verbose);

    if level == LevelFilter::Off {
        return;
    }

    INIT.call_once(|| {
        stderr_config(level);
    });
}

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    }
}

fn stderr_config(level: LevelFilter) {
    if let Err(err) = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("%+"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
    {
        eprintln!("failed to initialize logging: {}", err);
        return;
    }

    debug!("logging initialized.");
}

#[cfg(test)]
mod tests {
    use super::level_for;
    use log::LevelFilter;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(false), LevelFilter::Off);
        assert_eq!(level_for(true), LevelFilter::Debug);
    }
}
