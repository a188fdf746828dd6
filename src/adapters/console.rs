//! Console transport — line-oriented stdin bridge.
//!
//! Each line is one message:
//!
//! | Line              | Effect                                              |
//! |-------------------|-----------------------------------------------------|
//! | `hit <id>`        | sensor `<id>` reported triggered (sensor bridge)    |
//! | `clear <id>`      | sensor `<id>` reported cleared                      |
//! | `pin <ch> <0\|1>` | force the simulated input on channel `<ch>`         |
//! | `level <ch>`      | log the level of input or output channel `<ch>`     |
//! | `{ ... }`         | raw command payload, as received on the command topic |
//!
//! Events are handed to the controller through [`channels::submit`];
//! pin changes go straight to the simulated line and surface as debounced
//! edges on the next poll.  Output channels are read-only here: the
//! controller owns them.

use std::collections::HashMap;
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::channels;
use crate::drivers::sim_pin::SimPinHandle;
use crate::events::AlarmEvent;
use crate::registry::SensorId;

/// One decoded console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    Event(AlarmEvent),
    Pin { channel: u8, high: bool },
    Level { channel: u8 },
}

/// Simulated lines reachable from the console, keyed by channel.
#[derive(Debug, Clone, Default)]
pub struct ConsolePins {
    /// Sensor inputs, keyed by `Sensor::index`.
    pub inputs: HashMap<u8, SimPinHandle>,
    /// Siren and indicator outputs, keyed by their configured channel.
    pub outputs: HashMap<u8, SimPinHandle>,
}

impl ConsolePins {
    /// Current level of `channel`, input or output.
    pub fn level(&self, channel: u8) -> Option<bool> {
        self.inputs
            .get(&channel)
            .or_else(|| self.outputs.get(&channel))
            .map(SimPinHandle::level)
    }
}

/// Why a line was not understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    Empty,
    UnknownVerb,
    MissingArgument,
    BadArgument,
    /// Command payload longer than the event buffer.
    TooLong,
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::UnknownVerb => write!(f, "unknown verb"),
            Self::MissingArgument => write!(f, "missing argument"),
            Self::BadArgument => write!(f, "bad argument"),
            Self::TooLong => write!(f, "payload too long"),
        }
    }
}

/// Decode one line.
pub fn parse_line(line: &str) -> Result<ConsoleLine, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ConsoleError::Empty);
    }
    if line.starts_with('{') {
        return AlarmEvent::command(line.as_bytes())
            .map(ConsoleLine::Event)
            .ok_or(ConsoleError::TooLong);
    }

    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(ConsoleError::Empty)?;
    let mut arg = || words.next().ok_or(ConsoleError::MissingArgument);
    let sensor_id = |word: &str| SensorId::try_from(word).map_err(|()| ConsoleError::BadArgument);
    let channel = |word: &str| word.parse::<u8>().map_err(|_| ConsoleError::BadArgument);
    match verb {
        "hit" => Ok(ConsoleLine::Event(AlarmEvent::SensorTriggered(sensor_id(arg()?)?))),
        "clear" => Ok(ConsoleLine::Event(AlarmEvent::SensorCleared(sensor_id(arg()?)?))),
        "level" => Ok(ConsoleLine::Level {
            channel: channel(arg()?)?,
        }),
        "pin" => {
            let channel = channel(arg()?)?;
            let high = match arg()? {
                "1" | "high" => true,
                "0" | "low" => false,
                _ => return Err(ConsoleError::BadArgument),
            };
            Ok(ConsoleLine::Pin { channel, high })
        }
        _ => Err(ConsoleError::UnknownVerb),
    }
}

/// Read lines until EOF.  Returns the number of lines acted upon.
pub fn run<R: BufRead>(reader: R, pins: &ConsolePins) -> usize {
    let mut handled = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Console read failed: {}", e);
                break;
            }
        };
        match parse_line(&line) {
            Ok(ConsoleLine::Event(event)) => {
                if channels::submit(event) {
                    handled += 1;
                }
            }
            Ok(ConsoleLine::Pin { channel, high }) => match pins.inputs.get(&channel) {
                Some(pin) => {
                    pin.set_level(high);
                    handled += 1;
                }
                None => warn!("Console: no input on channel {}", channel),
            },
            Ok(ConsoleLine::Level { channel }) => match pins.level(channel) {
                Some(high) => {
                    info!("Channel {}: {}", channel, if high { "HIGH" } else { "LOW" });
                    handled += 1;
                }
                None => warn!("Console: nothing on channel {}", channel),
            },
            Err(ConsoleError::Empty) => {}
            Err(e) => warn!("Console: {} in '{}'", e, line.trim()),
        }
    }
    handled
}

/// Spawn the stdin reader thread.
pub fn spawn(pins: ConsolePins) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name("console".into()).spawn(move || {
        let handled = run(io::stdin().lock(), &pins);
        info!("Console closed after {} messages", handled);
    })
}
