use fwlog::{Logger, logger_config};

fn main() {
    let _guard = logger_config().init_global();
    let log = Logger::null("fwlog.demo");

    log.debug("test debug");
    log.info("test info");
    log.warning("test warning");
    log.error("test error");
    log.critical("test fatal error");

    Logger::new("fwlog.demo").info("only this line is printed");
}
