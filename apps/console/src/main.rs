//! # Stock Room Console Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stock Room Console                               │
//! │                                                                         │
//! │  stdin ──► shell.rs ──► commands/ ──► stockroom-db ──► StockRoom.db     │
//! │                │                          │                             │
//! │                ▼                          └──► demo mode when the file  │
//! │  stdout ◄── view.rs                            is missing or unreadable │
//! │                                                                         │
//! │  stderr ◄── tracing                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match stockroom_console_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("stockroom: {}", e);
            ExitCode::FAILURE
        }
    }
}
