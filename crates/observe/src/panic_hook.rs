use std::panic::{self, PanicHookInfo};

/// Installs a panic hook that prints roughly the same message as the default
/// hook but through `tracing::error!` instead of stderr, so panics share the
/// structured log format.
pub fn install() {
    panic::set_hook(Box::new(tracing_panic_hook));
}

fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}
