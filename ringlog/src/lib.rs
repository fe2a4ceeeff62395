//! Bounded log of terminator-delimited records
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  LogFile (open handle)              │
//! │  - own read position                │
//! │  - async Read / Write               │
//! └─────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────┐
//! │  LogDevice (read/write protocol)    │
//! │  - one interruptible lock           │
//! │  - partial-copy tolerant transfers  │
//! └─────────────────────────────────────┘
//!      │                      │
//!      ▼                      ▼
//! ┌────────────────────┐  ┌────────────────────┐
//! │ AccumulatingWriter │  │ RecordStore (ring) │
//! │ - pending record   │─▶│ - N slots, evicts  │
//! │ - commit at '\n'   │  │ - offset lookup    │
//! └────────────────────┘  └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ringlog::{Interrupt, LogConfig, LogDevice};
//!
//! # tokio_test_block_on(async {
//! let device = LogDevice::new(LogConfig::with_capacity(2)).unwrap();
//! let interrupt = Interrupt::new();
//! device.write_bytes(b"a\n", &interrupt).await.unwrap();
//! device.write_bytes(b"b\n", &interrupt).await.unwrap();
//! device.write_bytes(b"c\n", &interrupt).await.unwrap();
//!
//! let mut out = Vec::new();
//! let mut pos = 0;
//! device.read(&mut pos, 100, &mut out, &interrupt).await.unwrap();
//! assert_eq!(out, b"b\nc\n");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod accumulator;
pub mod config;
pub mod device;
pub mod error;
pub mod guard;
pub mod handle;
pub mod record;
pub mod store;
pub mod transfer;

pub use accumulator::AccumulatingWriter;
pub use config::{LogConfig, DEFAULT_CAPACITY, DEFAULT_TERMINATOR};
pub use device::{DeviceGuard, LogDevice};
pub use error::{LogError, Result};
pub use guard::{ExclusionGuard, Interrupt};
pub use handle::LogFile;
pub use record::Record;
pub use store::RecordStore;
pub use transfer::{CopyIn, CopyOut};
