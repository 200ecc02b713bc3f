use fwlog::{Direction, Extra, Level, Logger, Semantics, log_hexdump, logger_config};

// Run with `cargo run --example styles -- tabular` (or fancy, colorful,
// symbolic, plain, journal, json).
fn main() {
    let style = std::env::args().nth(1).unwrap_or_else(|| "fancy".into());
    let _guard = logger_config()
        .with_style(&style)
        .with_level(Level::Debug)
        .with_timestamps(true)
        .init_global();
    let log = Logger::new("fwlog.demo");

    log.debug("test debug");
    log.info("test info");
    log.warning("test warning");
    log.error("test error");
    log.critical("test fatal error");

    log.log_with(Level::Info, "test entry with ID", Extra::default().with_id("spam"));

    for semantics in [
        Semantics::Success,
        Semantics::Failure,
        Semantics::Request,
        Semantics::ResponseSuccess,
        Semantics::ResponseError,
        Semantics::Notification,
    ] {
        log.log_with(
            Level::Info,
            format!("test {semantics}"),
            Extra::default().with_semantics(semantics),
        );
    }

    log.info("a message\nspanning\nseveral lines");

    log_hexdump(&log, b"\xde\xad\xbe\xef", Some("123"), Some(Direction::Out), Level::Debug);
    log_hexdump(
        &log,
        &b"\x0b\xad\xca\xfe".repeat(5),
        Some("123"),
        Some(Direction::In),
        Level::Debug,
    );

    log::info!(target: "fwlog::demo::facade", id = "facade"; "logged through the log crate");
}
