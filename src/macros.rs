/// Log through the process-wide logger at the given severity.
///
/// ```rust,no_run
/// use timberlog::Severity;
///
/// timberlog::log!(Severity::Warning, "disk {}% full", 91);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {
        $crate::global::log($level, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Error, $($arg)+)
    };
}

/// Log at FATAL and terminate the process with status 1. Never returns.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::global::fatal_and_exit(format_args!($($arg)+))
    };
}
