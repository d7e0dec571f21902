use std::fs;

use ip4_fib::{logging::init_events, Adj, Fib, FibConfig, Ipv4Address};

#[test]
fn route_events_are_written_as_json() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("ip4-fib-logging-{}", std::process::id()));
    fs::create_dir_all(&dir)?;

    init_events(&dir)?;
    assert!(init_events(&dir).is_err(), "a second subscriber must be refused");

    let mut fib = Fib::with_config(FibConfig::default().with_table_id(3));
    fib.set(Ipv4Address::new([10, 0, 0, 0]), 8, Adj::new(1))?;
    fib.unset(Ipv4Address::new([10, 0, 0, 0]), 8)?;

    let mut contents = String::new();
    for entry in fs::read_dir(&dir)? {
        contents.push_str(&fs::read_to_string(entry?.path())?);
    }
    fs::remove_dir_all(&dir)?;

    let events: Vec<&str> = contents
        .lines()
        .filter(|line| line.contains("\"target\":\"ROUTE\""))
        .collect();
    assert_eq!(events.len(), 2);
    assert!(events[0].contains("10.0.0.0/8"));
    assert!(events[0].contains("\"table\":3"));
    assert!(events[0].contains("\"is_set\":true"));
    assert!(events[1].contains("\"is_set\":false"));
    Ok(())
}
