//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements    | Connects to                      |
//! |------------------|---------------|----------------------------------|
//! | `bmp`            | IconDecoder   | `tinybmp` 24/32-bit bitmaps      |
//! | `canvas`         | Surface       | any embedded-graphics DrawTarget |
//! | `log_sink`       | EventSink     | `log` facade                     |
//! | `memory_channel` | AssetChannel  | in-memory asset table            |
//! | `time`           | (host clock)  | system wall clock via `chrono`   |

pub mod bmp;
pub mod canvas;
pub mod log_sink;
pub mod memory_channel;
pub mod time;
