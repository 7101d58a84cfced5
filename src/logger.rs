// Starts logging for the host app with a given maximum level.

//System:

//<Android>>>: android_logger forwards to logcat under the "upload_intents" tag.

//<Everything else>>> env_logger to stderr, mostly for running the tests with output.

// Level: log::Level caps what gets through, None means Warn.

pub struct Logger;

impl Logger {
    pub fn start(level: Option<log::Level>) {
        let level = level.unwrap_or(log::Level::Warn);
        #[cfg(target_os = "android")]
        {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(level.to_level_filter())
                    .with_tag("upload_intents"),
            );
        }

        #[cfg(not(target_os = "android"))]
        {
            // A second start (another test, a host that already logs) keeps the first logger.
            let _ = env_logger::builder().filter_level(level.to_level_filter()).try_init();
        }
    }
}
