//! Host reconciliation
//!
//! Scan reports may describe the same address more than once (several `-oG` lines for one
//! host, repeated `<host>` blocks when scans are concatenated). Every parser funnels its raw
//! output through [`merge_hosts`], which folds those records into one host per address.
//!
//! The reconciliation rules are:
//! - the first record for an address seeds the canonical host, keeping its position, with
//!   repeated port descriptors collapsed to their first occurrence
//! - a later name is adopted only when the canonical host has none
//! - later OS guesses go through [`Host::offer_os_guess`]
//! - later port descriptors are appended unless already present
//!
//! # Example
//!
//! ```
//! use drawmap_core::merge::merge_hosts;
//! use drawmap_core::types::Host;
//!
//! let mut a = Host::new("10.0.0.1");
//! a.add_port("22/tcp ssh");
//! let mut b = Host::new("10.0.0.1").with_name("gw.lan");
//! b.add_port("80/tcp http");
//!
//! let merged = merge_hosts(vec![a, b]);
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].name.as_deref(), Some("gw.lan"));
//! assert_eq!(merged[0].ports, vec!["22/tcp ssh", "80/tcp http"]);
//! ```

use crate::types::Host;
use std::collections::HashMap;
use tracing::debug;

/// Folds raw host records into one host per address, in first-seen order
pub fn merge_hosts(raw: Vec<Host>) -> Vec<Host> {
    let total = raw.len();
    let mut index: HashMap<String, usize> = HashMap::with_capacity(total);
    let mut merged: Vec<Host> = Vec::with_capacity(total);

    for mut host in raw {
        match index.get(&host.address) {
            Some(&pos) => absorb(&mut merged[pos], host),
            None => {
                host.dedup_ports();
                index.insert(host.address.clone(), merged.len());
                merged.push(host);
            }
        }
    }

    if merged.len() != total {
        debug!(
            raw = total,
            merged = merged.len(),
            "reconciled repeated host records"
        );
    }

    merged
}

fn absorb(target: &mut Host, other: Host) {
    if target.name.is_none() {
        target.name = other.name;
    }

    target.offer_os_guess(other.os_guess, other.os_accuracy);

    for port in other.ports {
        if !target.ports.contains(&port) {
            target.ports.push(port);
        }
    }
}
