//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                      | Connects to                 |
//! |------------|---------------------------------|-----------------------------|
//! | `hardware` | DebounceableInput, MotionSensor | button, PIR, LIS3DH         |
//! |            | ShakeSensor, AudioSink, LedPort | LEDC, GPIO, I²S stream      |
//! |            | TimePort                        | via `time`                  |
//! | `log_sink` | EventSink                       | Serial log output           |
//! | `time`     | TimePort                        | ESP32 system timer / host   |

pub mod hardware;
pub mod log_sink;
pub mod time;
