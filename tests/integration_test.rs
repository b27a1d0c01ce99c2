//! Integration tests for the full read cycle
//!
//! Drives `Session` against a simulated KM2: once over an in-memory mock
//! stream, once over a real loopback TCP connection.

use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use vbus_km2::logging::{LogStore, NullSink};
use vbus_km2::session::SessionState;
use vbus_km2::transport::tcp::{self, TcpOptions};
use vbus_km2::vbus::{encode_message, HeaderPart1, ProtocolVersion, ReadOptions};
use vbus_km2::{report, Session, VbusError};

// =============================================================================
// Fixtures
// =============================================================================

const SAMPLE_PAYLOAD: [u8; 40] = [
    0xf9, 0x01, 0x27, 0x01, 0xb8, 0x22, 0xb8, 0x22, //
    0x64, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x0b, 0x01, 0x00, 0x00, 0x00, 0x00, 0x16, 0x02, //
    0x00, 0x00, 0x00, 0x00, 0x39, 0x30, 0x00, 0x00, //
    0x8e, 0x00, 0x00, 0x00, 0xb8, 0x22, 0x00, 0x00, //
];

fn header(destination: u16, source: u16) -> HeaderPart1 {
    HeaderPart1 {
        destination,
        source,
        version: ProtocolVersion::V1_0,
    }
}

/// Bus traffic: noise, a message for another device, then the CS4 status
fn bus_traffic() -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x7F, 0x01];
    bytes.extend(encode_message(&header(0x0010, 0x7E11), 0x0100, &[0x11; 24]));
    bytes.extend(encode_message(&header(0x0010, 0x1122), 0x0100, &SAMPLE_PAYLOAD));
    // Trailing traffic that must not be read
    bytes.extend(encode_message(&header(0x0010, 0x1122), 0x0100, &[0x00; 40]));
    bytes
}

// =============================================================================
// Mock Stream
// =============================================================================

/// Mock stream: scripted input, captured output
struct MockStream {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl MockStream {
    fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            output: Vec::new(),
        }
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_mock_session_end_to_end() {
    let mut input = b"+HELLO\r\n+OK\r\n+OK\r\n".to_vec();
    input.extend(bus_traffic());

    let mut session = Session::new(MockStream::new(input));
    let mut log = LogStore::new(512);

    session.authenticate("vbus", &mut log).unwrap();
    assert_eq!(session.state(), SessionState::Authenticated);

    let reading = session
        .read_reading(&ReadOptions::default(), &mut log)
        .unwrap();

    assert_eq!(reading.collector_temperature(), 50.5);
    assert_eq!(reading.water_temperature(), 29.5);
    assert_eq!(reading.pump_speed_1, 100);
    assert_eq!(reading.clock(), (8, 54));
    assert_eq!(reading.status, 0);

    let messages = log.messages();
    assert!(messages.contains(&"Logged in"));
    assert!(messages.contains(&"Source 0x7e11"));
    assert!(messages.contains(&"Not interested, reading next header"));
    assert!(messages.contains(&"command=0x0100 frames=10"));

    let stream = session.into_inner();
    assert_eq!(stream.output, b"PASS vbus\r\nDATA\r\n");
}

#[test]
fn test_mock_session_wrong_password() {
    let mut input = b"+HELLO\r\n-ERR\r\n".to_vec();
    input.extend(bus_traffic());

    let mut session = Session::new(MockStream::new(input));
    let err = session.authenticate("nope", &mut NullSink).unwrap_err();

    assert!(matches!(err, VbusError::AuthenticationError { .. }));
    assert_eq!(session.into_inner().output, b"PASS nope\r\n");
}

#[test]
fn test_mock_session_checksums_verified() {
    let mut input = b"+HELLO\r\n+OK\r\n+OK\r\n".to_vec();
    input.extend(bus_traffic());

    let options = ReadOptions {
        verify_checksums: true,
        ..ReadOptions::default()
    };
    let mut session = Session::new(MockStream::new(input));
    session.authenticate("vbus", &mut NullSink).unwrap();
    let reading = session.read_reading(&options, &mut NullSink).unwrap();

    assert_eq!(reading.heat_quantity, 12345);
}

#[test]
fn test_mock_session_sync_limit() {
    let mut input = b"+HELLO\r\n+OK\r\n+OK\r\n".to_vec();
    input.extend(vec![0x00; 64]);
    input.extend(bus_traffic());

    let options = ReadOptions {
        max_sync_bytes: Some(32),
        ..ReadOptions::default()
    };
    let mut session = Session::new(MockStream::new(input));
    session.authenticate("vbus", &mut NullSink).unwrap();

    assert!(matches!(
        session.read_reading(&options, &mut NullSink),
        Err(VbusError::SyncLimitExceeded { scanned: 33 })
    ));
}

/// Simulated KM2 on a loopback port; returns the port and the server thread
fn spawn_km2(password: &'static str, traffic: Vec<u8>) -> (u16, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (conn, _) = listener.accept().unwrap();
        let mut writer = conn.try_clone().unwrap();
        let mut reader = BufReader::new(conn);
        let mut received = Vec::new();

        writer.write_all(b"+HELLO\r\n").unwrap();

        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        received.push(line.trim_end().to_string());
        if line.trim_end() != format!("PASS {}", password) {
            writer.write_all(b"-ERROR: Password invalid\r\n").unwrap();
            return received;
        }
        writer.write_all(b"+OK\r\n").unwrap();

        line.clear();
        reader.read_line(&mut line).unwrap();
        received.push(line.trim_end().to_string());
        writer.write_all(b"+OK\r\n").unwrap();

        // Client may hang up before all traffic is written
        let _ = writer.write_all(&traffic);
        received
    });

    (port, handle)
}

fn loopback_options() -> TcpOptions {
    TcpOptions {
        connect_timeout: Some(Duration::from_secs(2)),
        read_timeout: Some(Duration::from_secs(5)),
    }
}

#[test]
fn test_tcp_session_end_to_end() {
    let (port, server) = spawn_km2("vbus", bus_traffic());

    let stream = tcp::connect("127.0.0.1", port, &loopback_options()).unwrap();
    let mut session = Session::new(stream);
    session.authenticate("vbus", &mut NullSink).unwrap();
    let reading = session
        .read_reading(&ReadOptions::default(), &mut NullSink)
        .unwrap();
    drop(session);

    assert_eq!(
        server.join().unwrap(),
        vec!["PASS vbus".to_string(), "DATA".to_string()]
    );

    let text = report::render_text(&reading);
    assert!(text.contains("Collector Temperature : 50.5 °C"));
    assert!(text.contains("Water     Temperature : 29.5 °C"));
    assert!(text.contains("Pump                  : 100%"));
    assert!(text.contains("Time                  : 8:54"));
    assert!(text.contains("Status                : 0"));
}

#[test]
fn test_tcp_session_wrong_password() {
    let (port, server) = spawn_km2("vbus", bus_traffic());

    let stream = tcp::connect("127.0.0.1", port, &loopback_options()).unwrap();
    let mut session = Session::new(stream);

    match session.authenticate("guess", &mut NullSink) {
        Err(VbusError::AuthenticationError { reply }) => {
            assert_eq!(reply, "-ERROR: Password invalid")
        }
        other => panic!("Expected AuthenticationError, got {:?}", other),
    }
    assert_eq!(server.join().unwrap(), vec!["PASS guess".to_string()]);
}

#[test]
fn test_tcp_session_gateway_hangs_up() {
    // Only a message for another device, then EOF
    let traffic = encode_message(&header(0x0010, 0x7E11), 0x0100, &[0x11; 8]);
    let (port, server) = spawn_km2("vbus", traffic);

    let stream = tcp::connect("127.0.0.1", port, &loopback_options()).unwrap();
    let mut session = Session::new(stream);
    session.authenticate("vbus", &mut NullSink).unwrap();

    server.join().unwrap();
    assert!(matches!(
        session.read_reading(&ReadOptions::default(), &mut NullSink),
        Err(VbusError::ConnectionClosed { .. })
    ));
}
