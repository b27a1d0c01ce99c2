//! KM2 login handshake
//!
//! ```text
//! <- greeting line          (accepted as-is)
//! -> PASS <password>\r\n
//! <- +OK                    (anything else fails)
//! -> DATA\r\n
//! <- reply line             (accepted as-is)
//! ```
//!
//! After the `DATA` reply the gateway streams raw VBus bytes.

use crate::constants::{DATA_REQUEST, LOGIN_OK_REPLY, MAX_REPLY_LINE};
use crate::error::{Result, VbusError};
use crate::logging::LogSink;
use crate::transport::VbusStream;
use std::io::{Read, Write};

/// Run the three-step handshake
///
/// # Errors
///
/// `AuthenticationError` if the `PASS` reply is not exactly `+OK`
/// (ignoring trailing whitespace). `DATA` is never sent in that case.
pub fn login<S: Read + Write>(
    stream: &mut VbusStream<S>,
    password: &str,
    log: &mut dyn LogSink,
) -> Result<()> {
    let greeting = stream.read_line(MAX_REPLY_LINE)?;
    log.log(greeting.trim_end());

    stream.send(format!("PASS {}\r\n", password).as_bytes())?;
    let reply = stream.read_line(MAX_REPLY_LINE)?;
    let reply = reply.trim_end();
    if reply != LOGIN_OK_REPLY {
        return Err(VbusError::AuthenticationError {
            reply: reply.to_string(),
        });
    }
    log.log(reply);

    // The DATA reply is not checked
    stream.send(format!("{}\r\n", DATA_REQUEST).as_bytes())?;
    let reply = stream.read_line(MAX_REPLY_LINE)?;
    log.log(reply.trim_end());

    Ok(())
}
