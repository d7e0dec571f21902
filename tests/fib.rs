use ip4_fib::{Adj, Fib, FibError, Ipv4Address, Ipv4Net, RouteChange};

fn ip(address: &str) -> Ipv4Address {
    address.parse().unwrap()
}

fn set(fib: &mut Fib, cidr: &str, adj: u32) {
    let net: Ipv4Net = cidr.parse().unwrap();
    fib.set(net.id(), net.len(), Adj::new(adj)).unwrap();
    fib.check_invariants();
}

fn unset(fib: &mut Fib, cidr: &str) -> Adj {
    let net: Ipv4Net = cidr.parse().unwrap();
    let adj = fib.unset(net.id(), net.len()).unwrap();
    fib.check_invariants();
    adj
}

#[test]
fn overlap_priority() {
    let mut fib = Fib::new();
    set(&mut fib, "10.0.0.0/8", 1);
    set(&mut fib, "10.1.0.0/16", 2);

    assert_eq!(fib.lookup(ip("10.1.2.3")), Adj::new(2));
    assert_eq!(fib.lookup(ip("10.2.0.0")), Adj::new(1));
    assert_eq!(fib.lookup(ip("11.0.0.0")), Adj::MISS);
}

#[test]
fn overlap_priority_in_either_order() {
    let mut fib = Fib::new();
    set(&mut fib, "10.1.0.0/16", 2);
    set(&mut fib, "10.0.0.0/8", 1);

    assert_eq!(fib.lookup(ip("10.1.2.3")), Adj::new(2));
    assert_eq!(fib.lookup(ip("10.2.0.0")), Adj::new(1));
}

#[test]
fn deletion_uncovers_less_specific() {
    let mut fib = Fib::new();
    set(&mut fib, "10.0.0.0/8", 1);
    set(&mut fib, "10.1.0.0/16", 2);
    assert_eq!(unset(&mut fib, "10.1.0.0/16"), Adj::new(2));

    assert_eq!(fib.lookup(ip("10.1.2.3")), Adj::new(1));
    assert_eq!(fib.lookup(ip("10.200.0.1")), Adj::new(1));
}

#[test]
fn deletion_uncovers_nearest_of_several() {
    let mut fib = Fib::new();
    set(&mut fib, "10.0.0.0/8", 1);
    set(&mut fib, "10.1.0.0/16", 2);
    set(&mut fib, "10.1.2.0/24", 3);
    set(&mut fib, "10.1.2.128/25", 4);

    unset(&mut fib, "10.1.2.0/24");
    assert_eq!(fib.lookup(ip("10.1.2.1")), Adj::new(2));
    assert_eq!(fib.lookup(ip("10.1.2.200")), Adj::new(4));

    unset(&mut fib, "10.1.0.0/16");
    assert_eq!(fib.lookup(ip("10.1.2.1")), Adj::new(1));
    assert_eq!(fib.lookup(ip("10.1.2.200")), Adj::new(4));
    assert_eq!(fib.lookup(ip("10.1.3.0")), Adj::new(1));
}

#[test]
fn deleting_a_less_specific_keeps_a_more_specific_with_its_prefix_address() {
    let mut fib = Fib::new();
    set(&mut fib, "10.0.0.0/8", 1);
    set(&mut fib, "10.0.0.0/16", 2);
    set(&mut fib, "8.0.0.0/6", 3);

    unset(&mut fib, "10.0.0.0/8");
    assert_eq!(fib.lookup(ip("10.0.1.1")), Adj::new(2));
    assert_eq!(fib.lookup(ip("10.5.1.1")), Adj::new(3));
}

#[test]
fn shared_adjacency_is_tracked_per_prefix() {
    let mut fib = Fib::new();
    set(&mut fib, "10.0.0.0/8", 1);
    set(&mut fib, "10.1.0.0/16", 5);
    set(&mut fib, "10.1.2.0/24", 5);

    unset(&mut fib, "10.1.0.0/16");
    assert_eq!(fib.lookup(ip("10.1.2.3")), Adj::new(5));
    assert_eq!(fib.lookup(ip("10.1.3.3")), Adj::new(1));
}

#[test]
fn round_trip() {
    let mut fib = Fib::new();
    set(&mut fib, "172.16.0.0/12", 3);
    for address in ["172.16.0.0", "172.20.1.1", "172.31.255.255"] {
        assert_eq!(fib.lookup(ip(address)), Adj::new(3));
    }
    assert_eq!(fib.lookup(ip("172.32.0.0")), Adj::MISS);
    assert_eq!(fib.lookup(ip("172.15.255.255")), Adj::MISS);

    unset(&mut fib, "172.16.0.0/12");
    assert_eq!(fib.lookup(ip("172.20.1.1")), Adj::MISS);
}

#[test]
fn set_is_idempotent() {
    let mut once = Fib::new();
    set(&mut once, "10.0.0.0/8", 1);
    set(&mut once, "10.1.2.0/24", 2);

    let mut twice = Fib::new();
    set(&mut twice, "10.0.0.0/8", 1);
    set(&mut twice, "10.1.2.0/24", 2);
    set(&mut twice, "10.1.2.0/24", 2);
    set(&mut twice, "10.0.0.0/8", 1);

    assert_eq!(once.len(), twice.len());
    assert_eq!(once.plies_in_use(), twice.plies_in_use());
    for address in ["10.1.2.3", "10.1.3.3", "10.0.0.0", "11.0.0.0"] {
        assert_eq!(once.lookup(ip(address)), twice.lookup(ip(address)));
    }
}

#[test]
fn replacing_an_adjacency() {
    let mut fib = Fib::new();
    set(&mut fib, "10.0.0.0/8", 1);
    set(&mut fib, "10.1.0.0/16", 2);
    set(&mut fib, "10.0.0.0/8", 7);

    assert_eq!(fib.lookup(ip("10.9.0.0")), Adj::new(7));
    assert_eq!(fib.lookup(ip("10.1.0.0")), Adj::new(2));
    assert_eq!(fib.len(), 2);

    unset(&mut fib, "10.1.0.0/16");
    assert_eq!(fib.lookup(ip("10.1.0.0")), Adj::new(7));
}

#[test]
fn full_removal_returns_the_pool_to_the_root() {
    let mut fib = Fib::new();
    let routes = [
        "0.0.0.0/0",
        "10.0.0.0/8",
        "10.1.0.0/16",
        "10.1.2.0/24",
        "10.1.2.3/32",
        "192.168.0.0/17",
        "192.168.200.0/21",
        "128.0.0.0/1",
        "10.1.2.0/31",
    ];
    for (i, cidr) in routes.iter().enumerate() {
        set(&mut fib, cidr, i as u32 + 1);
    }
    assert!(fib.plies_in_use() > 1);

    // remove in an order that repeatedly uncovers shorter routes
    for cidr in [
        "10.0.0.0/8",
        "10.1.2.3/32",
        "128.0.0.0/1",
        "0.0.0.0/0",
        "10.1.2.0/24",
        "192.168.0.0/17",
        "10.1.2.0/31",
        "10.1.0.0/16",
        "192.168.200.0/21",
    ] {
        unset(&mut fib, cidr);
    }

    assert!(fib.is_empty());
    assert_eq!(fib.plies_in_use(), 1);
    for address in ["10.1.2.3", "192.168.200.1", "200.0.0.0", "0.0.0.0"] {
        assert_eq!(fib.lookup(ip(address)), Adj::MISS);
    }
}

#[test]
fn host_routes_at_the_address_extremes() {
    let mut fib = Fib::new();
    set(&mut fib, "0.0.0.0/32", 1);
    set(&mut fib, "255.255.255.255/32", 2);

    assert_eq!(fib.lookup(ip("0.0.0.0")), Adj::new(1));
    assert_eq!(fib.lookup(ip("0.0.0.1")), Adj::MISS);
    assert_eq!(fib.lookup(Ipv4Address::SUBNET), Adj::new(2));
    assert_eq!(fib.lookup(ip("255.255.255.254")), Adj::MISS);

    unset(&mut fib, "0.0.0.0/32");
    unset(&mut fib, "255.255.255.255/32");
    assert_eq!(fib.plies_in_use(), 1);
}

#[test]
fn foreach_reports_installed_routes() {
    let mut fib = Fib::new();
    set(&mut fib, "10.1.0.0/16", 2);
    set(&mut fib, "0.0.0.0/0", 9);
    set(&mut fib, "10.0.0.0/8", 1);

    let mut routes = Vec::new();
    fib.foreach(|net, adj| routes.push((net.to_string(), adj)));
    assert_eq!(
        routes,
        vec![
            ("0.0.0.0/0".to_string(), Adj::new(9)),
            ("10.0.0.0/8".to_string(), Adj::new(1)),
            ("10.1.0.0/16".to_string(), Adj::new(2)),
        ]
    );
}

#[test]
fn unknown_route_is_an_error() {
    let mut fib = Fib::new();
    set(&mut fib, "10.0.0.0/8", 1);
    assert_eq!(
        fib.unset(ip("10.0.0.0"), 9),
        Err(FibError::RouteNotFound("10.0.0.0/9".parse().unwrap()))
    );
    assert_eq!(fib.lookup(ip("10.0.0.0")), Adj::new(1));
}

#[tokio::test]
async fn subscribers_receive_changes() -> anyhow::Result<()> {
    let mut fib = Fib::new();
    let mut changes = fib.subscribe();

    fib.set(ip("10.0.0.0"), 8, Adj::new(1))?;
    fib.unset(ip("10.0.0.0"), 8)?;
    drop(fib);

    let expected = [true, false].map(|is_set| RouteChange {
        address: ip("10.0.0.0"),
        len: 8,
        adj: Adj::new(1),
        is_set,
    });
    for change in expected {
        assert_eq!(changes.recv().await, Some(change));
    }
    assert_eq!(changes.recv().await, None);
    Ok(())
}

#[test]
fn dropped_subscriber_does_not_block_updates() {
    let mut fib = Fib::new();
    drop(fib.subscribe());
    fib.set(ip("10.0.0.0"), 8, Adj::new(1)).unwrap();
    assert_eq!(fib.lookup(ip("10.0.0.1")), Adj::new(1));
}
