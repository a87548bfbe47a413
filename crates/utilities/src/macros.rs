/// Logs a trace message only when the `symfst_debug-trace` feature is enabled.
///
/// Used in the inner loops of the automaton algorithms where even a disabled
/// `trace!` would be measurable.
#[macro_export]
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "symfst_debug-trace")]
        {
            log::trace!($($arg)*);
        }
    };
}
