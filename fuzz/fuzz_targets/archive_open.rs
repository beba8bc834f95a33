//! Fuzz target for Archive::open with arbitrary byte input.
//!
//! Opens the input as an archive, lists it, reads every entry and rebuilds
//! it. Malformed input must fail with an error, never a panic or a huge
//! allocation.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use pakfile::{Archive, ResourceLimits};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Keep declared lengths small so a single input cannot exhaust memory.
    let limits = ResourceLimits::new()
        .max_entries(4096)
        .max_entry_length(1 << 20)
        .max_path_length(4096);

    let Ok(mut archive) = Archive::open_with_limits(Cursor::new(data), limits) else {
        return;
    };

    if let Ok(views) = archive.iterate_files() {
        for view in views {
            let _ = view.path().to_string_lossy();
            let _ = view.read();
        }
    }

    // A successful scan must rebuild into an archive that opens again.
    if archive.force_rebuild_on_write().is_ok() {
        let mut out = Vec::new();
        if archive.write_to(&mut out).is_ok() {
            let reopened = Archive::open(Cursor::new(out));
            assert!(reopened.is_ok());
        }
    }
});
