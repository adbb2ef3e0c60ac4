use std::io::{Cursor, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use super::listener::wake_addr;
use super::{
    ConnectionMode, ControlChannelListener, ControlError, ListenerOptions, parse_request,
    read_requests, send_open_requests,
};
use crate::dispatch::{Command, command_channel};
use crate::identity::{FileIdentity, Normalizer};

const WAIT: Duration = Duration::from_secs(5);

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().expect("loopback address")
}

fn next_open(rx: &Receiver<Command>) -> FileIdentity {
    match rx.recv_timeout(WAIT).expect("command") {
        Command::OpenOrActivate(identity) => identity,
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_request_trims_line_endings() {
    assert_eq!(parse_request(b"/tmp/a.puml\n").expect("plain"), "/tmp/a.puml");
    assert_eq!(parse_request(b"/tmp/a.puml\r\n").expect("crlf"), "/tmp/a.puml");
    assert_eq!(parse_request(b"/tmp/a.puml").expect("eof"), "/tmp/a.puml");
}

#[test]
fn parse_request_keeps_spaces_that_belong_to_the_name() {
    assert_eq!(
        parse_request(b"/tmp/notes .puml \n").expect("trailing space"),
        "/tmp/notes .puml "
    );
    assert_eq!(
        parse_request(b" leading.puml\r\n").expect("leading space"),
        " leading.puml"
    );
}

#[test]
fn parse_request_rejects_malformed_lines() {
    assert!(matches!(
        parse_request(b"\n"),
        Err(ControlError::MalformedRequest(_))
    ));
    assert!(matches!(
        parse_request(b"  \t\r\n"),
        Err(ControlError::MalformedRequest(_))
    ));
    assert!(matches!(
        parse_request(b"/tmp/\xff\xfe.puml\n"),
        Err(ControlError::MalformedRequest(_))
    ));
    assert!(matches!(
        parse_request(b"/tmp/a\0.puml\n"),
        Err(ControlError::MalformedRequest(_))
    ));
}

#[test]
fn read_requests_skips_bad_lines_and_keeps_order() {
    let raw = b"/d/one.puml\n\n/d/\xffbad\n/d/two.puml\r\n/d/three.puml";
    let mut input = Cursor::new(raw.to_vec());
    let mut seen = Vec::new();
    let stats = read_requests(&mut input, |reference| {
        seen.push(reference.to_string());
        true
    });

    assert_eq!(seen, ["/d/one.puml", "/d/two.puml", "/d/three.puml"]);
    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.malformed, 2);
}

#[test]
fn read_requests_stops_when_the_consumer_is_gone() {
    let mut input = Cursor::new(b"/d/one.puml\n/d/two.puml\n".to_vec());
    let mut calls = 0;
    let stats = read_requests(&mut input, |_| {
        calls += 1;
        false
    });
    assert_eq!(calls, 1);
    assert_eq!(stats.accepted, 1);
}

#[cfg(unix)]
#[test]
fn listener_posts_normalized_open_commands_in_order() {
    let (sender, rx) = command_channel();
    let listener = ControlChannelListener::bind(
        loopback(),
        Normalizer::default(),
        sender,
        ListenerOptions::default(),
    )
    .expect("bind");
    let handle = listener.spawn().expect("spawn");

    send_open_requests(
        handle.local_addr(),
        &["/tmp/diagrams/./a.puml", "untitled:Untitled-1"],
        WAIT,
    )
    .expect("send");

    let first = next_open(&rx);
    let second = next_open(&rx);
    assert_eq!(first.to_string(), "/tmp/diagrams/a.puml");
    assert_eq!(second, FileIdentity::Virtual("untitled:Untitled-1".into()));
    handle.shutdown();
}

#[test]
fn wake_addr_maps_wildcard_binds_to_loopback() {
    let v4: SocketAddr = "0.0.0.0:4100".parse().expect("v4");
    let v6: SocketAddr = "[::]:4100".parse().expect("v6");
    let fixed: SocketAddr = "127.0.0.1:4100".parse().expect("fixed");

    assert_eq!(wake_addr(v4), SocketAddr::from((Ipv4Addr::LOCALHOST, 4100)));
    assert_eq!(wake_addr(v6), SocketAddr::from((Ipv6Addr::LOCALHOST, 4100)));
    assert_eq!(wake_addr(fixed), fixed);
}

#[test]
fn wildcard_listener_shuts_down() {
    let (sender, rx) = command_channel();
    let listener = ControlChannelListener::bind(
        "0.0.0.0:0".parse().expect("wildcard"),
        Normalizer::default(),
        sender,
        ListenerOptions::default(),
    )
    .expect("bind");
    let handle = listener.spawn().expect("spawn");

    send_open_requests(wake_addr(handle.local_addr()), &["/tmp/any.puml"], WAIT).expect("send");
    assert_eq!(next_open(&rx).to_string(), "/tmp/any.puml");
    handle.shutdown();
}

#[cfg(unix)]
#[test]
fn serial_mode_serves_connections_one_after_another() {
    let (sender, rx) = command_channel();
    let options = ListenerOptions {
        mode: ConnectionMode::Serial,
        read_timeout: Some(WAIT),
    };
    let listener = ControlChannelListener::bind(loopback(), Normalizer::default(), sender, options)
        .expect("bind");
    let handle = listener.spawn().expect("spawn");

    send_open_requests(handle.local_addr(), &["/tmp/one.puml"], WAIT).expect("first");
    send_open_requests(handle.local_addr(), &["/tmp/two.puml"], WAIT).expect("second");

    assert_eq!(next_open(&rx).to_string(), "/tmp/one.puml");
    assert_eq!(next_open(&rx).to_string(), "/tmp/two.puml");
    handle.shutdown();
}

#[cfg(unix)]
#[test]
fn malformed_lines_do_not_end_the_connection() {
    let (sender, rx) = command_channel();
    let listener = ControlChannelListener::bind(
        loopback(),
        Normalizer::default(),
        sender,
        ListenerOptions::default(),
    )
    .expect("bind");
    let handle = listener.spawn().expect("spawn");

    let mut stream = TcpStream::connect(handle.local_addr()).expect("connect");
    stream
        .write_all(b"\n\xff\xfe\n/tmp/after.puml\n")
        .expect("write");
    drop(stream);

    assert_eq!(next_open(&rx).to_string(), "/tmp/after.puml");
    handle.shutdown();
}

#[test]
fn occupied_port_is_a_bind_failure() {
    let occupied = TcpListener::bind(loopback()).expect("occupy port");
    let addr = occupied.local_addr().expect("addr");
    let (sender, _rx) = command_channel();

    let error = ControlChannelListener::bind(
        addr,
        Normalizer::default(),
        sender,
        ListenerOptions::default(),
    )
    .expect_err("must fail");
    assert!(matches!(error, ControlError::BindFailed { .. }));
}

#[test]
fn sending_without_a_listener_reports_connect_failure() {
    let addr = {
        let probe = TcpListener::bind(loopback()).expect("probe");
        probe.local_addr().expect("addr")
    };
    let error = send_open_requests(addr, &["/tmp/a.puml"], Duration::from_millis(200))
        .expect_err("must fail");
    assert!(matches!(error, ControlError::Connect { .. }));
}

#[test]
fn references_with_line_breaks_are_refused_before_connecting() {
    let error = send_open_requests(loopback(), &["/tmp/a.puml\n/tmp/b.puml"], WAIT)
        .expect_err("must fail");
    assert!(matches!(error, ControlError::MalformedRequest(_)));
}
