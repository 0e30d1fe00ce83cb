/// Environment variable enabling the verbose `event!` channel (search incumbents, pruning).
pub const EVENT_LOG_VAR: &str = "LOG_SCHEDULER_EVENTS";

#[macro_export]
macro_rules! log_line {
    ($tag:literal, $($arg:tt)*) => {
        println!(
            concat!($tag, "[{}]\x1b[0m {}"),
            chrono::Utc::now().format("%H:%M:%S%.3f"),
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::log_line!("\x1b[32m[INFO] ", $($arg)*) };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => { $crate::log_line!("\x1b[33m[LOG]  ", $($arg)*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log_line!("\x1b[35m[WARN] ", $($arg)*) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::log_line!("\x1b[31m[ERROR]", $($arg)*) };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!("\x1b[1;31m[FATAL][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S%.3f"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var($crate::logger::EVENT_LOG_VAR).is_ok() {
            $crate::log_line!("\x1b[36m[EVENT]", $($arg)*)
        }
    };
}
