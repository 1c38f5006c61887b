use backtrace::Backtrace;

/// Replaces the default panic hook with one that logs the panic
/// message and a backtrace through `tracing` instead of writing raw
/// text to stderr, so a panic inside a pipeline shows up in the same
/// structured log stream as everything else.
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::new();
        let location = info.location().map(|l| l.to_string()).unwrap_or_default();
        tracing::error!(%location, backtrace = ?backtrace, "panic: {info}");
    }));
}
