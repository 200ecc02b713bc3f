// Tests in this file share the process-wide dispatcher, so every test logs
// under its own target and only looks at its own lines.

use fwlog::{
    Direction, Level, LogMemory, Logger, add_id_to_log, format_hexdump, log_hexdump,
    logger_config,
};

fn lines_for(memory: &LogMemory, needle: &str) -> Vec<String> {
    memory
        .lines()
        .into_iter()
        .filter(|line| line.contains(needle))
        .collect()
}

#[test]
fn test_plain_style_through_log_facade() {
    let memory = LogMemory::default();
    let guard = logger_config()
        .with_style("plain")
        .no_console()
        .with_writer(memory.clone())
        .init_global();
    log::error!(target: "net.client", id = "conn-42"; "connection lost");
    log::debug!(target: "net.client", "below threshold");
    drop(guard);
    assert_eq!(
        lines_for(&memory, "net.client"),
        vec!["ERROR:net.client:conn-42:connection lost"]
    );
}

#[test]
fn test_json_style_round_trip() {
    let memory = LogMemory::default();
    let guard = logger_config()
        .with_style("json")
        .with_level(Level::Debug)
        .no_console()
        .with_writer(memory.clone())
        .init_global();
    let log = Logger::new("a.b.c");
    log.info("hello");
    log::info!(target: "a.b.c", semantics = "success"; "via facade");
    log::info!(target: "a.b.c", semantics = "no-such-thing"; "unknown semantics");
    drop(guard);

    let values: Vec<serde_json::Value> = lines_for(&memory, "\"a.b.c\"")
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0]["level"], "INFO");
    assert_eq!(values[0]["loggerName"], "a.b.c");
    assert_eq!(values[0]["message"], "hello");
    assert_eq!(values[1]["semantics"], "success");
    assert!(values[2].get("semantics").is_none());
}

#[test]
fn test_fancy_style_hexdump_without_colors() {
    let memory = LogMemory::default();
    let guard = logger_config()
        .with_style("fancy")
        .with_level(Level::Debug)
        .with_colors(false)
        .with_symbols(fwlog::SymbolSet::Ascii)
        .no_console()
        .with_writer(memory.clone())
        .init_global();
    let log = Logger::new("traffic.dump");
    let data = b"\x0b\xad\xca\xfe".repeat(5);
    log_hexdump(&log, &data, Some("123"), Some(Direction::In), Level::Debug);
    drop(guard);

    let lines = lines_for(&memory, "dump");
    assert_eq!(lines.len(), 1);
    let dump = format_hexdump(&data);
    let mut expected_lines = dump.lines();
    let first = expected_lines.next().unwrap();
    let second = expected_lines.next().unwrap();
    assert_eq!(
        lines[0],
        format!(
            "< dump        123        {first}\n{}{second}",
            " ".repeat(25)
        )
    );
}

#[test]
fn test_repeated_install_adds_sinks() {
    let first = LogMemory::default();
    let second = LogMemory::default();
    let guard_a = logger_config()
        .with_style("tabular")
        .with_timestamps(false)
        .no_console()
        .with_writer(first.clone())
        .init_global();
    let guard_b = logger_config()
        .with_style("tabular")
        .with_timestamps(false)
        .no_console()
        .with_writer(second.clone())
        .init_global();
    let log = add_id_to_log(&Logger::new("twice.installed"), "spam");
    log.warning("seen twice");
    drop(guard_a);
    log.warning("seen once");
    drop(guard_b);

    assert_eq!(
        lines_for(&first, "twice.installed"),
        vec!["WARNING\ttwice.installed\tspam\tseen twice"]
    );
    assert_eq!(
        lines_for(&second, "twice.installed"),
        vec![
            "WARNING\ttwice.installed\tspam\tseen twice",
            "WARNING\ttwice.installed\tspam\tseen once"
        ]
    );
}

#[test]
fn test_unknown_style_falls_back_to_bare_lines() {
    let memory = LogMemory::default();
    let guard = logger_config()
        .with_style("sparkly")
        .no_console()
        .with_writer(memory.clone())
        .init_global();
    Logger::new("bare.style").critical("still logged");
    drop(guard);
    assert_eq!(
        lines_for(&memory, "bare.style"),
        vec!["CRITICAL:bare.style:still logged"]
    );
}

#[test]
fn test_log_file_is_appended() {
    let path = std::env::temp_dir().join("fwlog_test_log_file_is_appended.log");
    std::fs::remove_file(&path).ok();
    for message in ["first run", "second run"] {
        let guard = logger_config()
            .with_style("journal")
            .with_log_file(&path)
            .unwrap()
            .no_console()
            .init_global();
        Logger::new("file.appender").info(message);
        drop(guard);
    }
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = contents
        .lines()
        .filter(|line| line.starts_with("appender"))
        .collect();
    assert_eq!(lines, vec!["appender: first run", "appender: second run"]);
}
