//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                    |
//! |------------|---------------------|--------------------------------|
//! | `console`  | (inbound transport) | stdin lines → inbound channel  |
//! | `hardware` | ActuatorPort        | `embedded-hal` output pins     |
//! | `log_sink` | PublishPort         | Log output                     |
//! |            | AlertPort           |                                |
//! | `store`    | StatePort           | In-memory / directory store    |
//! | `time`     | (clock)             | `std::time::Instant`           |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod store;
pub mod time;
