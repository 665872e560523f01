//! Memory-mapped peripheral devices
//!
//! Peripherals do not sit on a decoded bus: each device shadows a window
//! of system memory and is stepped once per simulation step, after the
//! CPU. A device detects programmed I/O through the R/W access flags the
//! CPU leaves on its register addresses, updates its side of the window,
//! and reports the state of its interrupt line for the host to latch
//! onto the CPU's IRQ input.
//!
//! - `uart`: 16C750-compatible UART bridged to a TCP socket

pub mod uart;

pub use uart::Uart;
