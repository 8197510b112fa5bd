//! Core data types for parsed scan reports
//!
//! [`Host`] is the canonical record every grammar parser produces and every later stage
//! reads. Ports are kept as pre-formatted descriptors (`"<port>/<proto> <service> [extra]"`).
//!
//! # Examples
//!
//! ```
//! use drawmap_core::types::Host;
//!
//! let mut host = Host::new("192.168.1.10");
//! host.add_port("22/tcp ssh OpenSSH 8.9p1");
//! host.offer_os_guess(Some("Linux 5.4".to_string()), Some(95));
//!
//! assert_eq!(host.display_label(), "192.168.1.10");
//! assert_eq!(host.os_accuracy, Some(95));
//! ```

use serde::{Deserialize, Serialize};

/// One discovered network endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    /// Primary identifier (usually an IP address) and the merge key
    pub address: String,

    /// Resolved hostname, if the report carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Open-port descriptors in report order
    #[serde(default)]
    pub ports: Vec<String>,

    /// Best-effort operating system label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_guess: Option<String>,

    /// Confidence of `os_guess` in percent, when the report gave one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_accuracy: Option<u32>,
}

impl Host {
    /// Creates a host with only an address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Sets the hostname; an empty name is stored as absent
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Appends a port descriptor
    pub fn add_port(&mut self, descriptor: impl Into<String>) {
        self.ports.push(descriptor.into());
    }

    /// Returns true if the host has any open ports
    pub fn has_open_ports(&self) -> bool {
        !self.ports.is_empty()
    }

    /// Removes repeated port descriptors, keeping the first occurrence of each
    pub fn dedup_ports(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.ports.retain(|p| seen.insert(p.clone()));
    }

    /// Considers a new OS guess for this host
    ///
    /// A host without a guess accepts any non-empty one. Once a guess is set it is only
    /// replaced by a guess with a known accuracy that beats the current one (or when the
    /// current one has no accuracy). A guess without accuracy never replaces anything.
    ///
    /// Returns true when the guess was applied.
    ///
    /// ```
    /// use drawmap_core::types::Host;
    ///
    /// let mut host = Host::new("10.0.0.1");
    /// assert!(host.offer_os_guess(Some("Linux".into()), None));
    /// assert!(!host.offer_os_guess(Some("FreeBSD".into()), None));
    /// assert!(host.offer_os_guess(Some("Linux 5.4".into()), Some(90)));
    /// assert!(!host.offer_os_guess(Some("Linux 4.15".into()), Some(90)));
    /// assert_eq!(host.os_guess.as_deref(), Some("Linux 5.4"));
    /// ```
    pub fn offer_os_guess(&mut self, guess: Option<String>, accuracy: Option<u32>) -> bool {
        let Some(guess) = guess.filter(|g| !g.is_empty()) else {
            return false;
        };

        let accept = match (&self.os_guess, accuracy) {
            (None, _) => true,
            (Some(_), Some(new)) => self.os_accuracy.map_or(true, |current| new > current),
            (Some(_), None) => false,
        };

        if accept {
            self.os_guess = Some(guess);
            self.os_accuracy = accuracy;
        }
        accept
    }

    /// Name shown on the diagram node
    ///
    /// Two lines (`name`, `address`) when the host has a name that differs from its
    /// address, otherwise just the address.
    pub fn display_label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() && name != self.address => {
                format!("{}\n{}", name, self.address)
            }
            _ => self.address.clone(),
        }
    }

    /// Hover text for the diagram node: OS line followed by the port list
    pub fn tooltip_text(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.ports.len() + 2);

        match (&self.os_guess, self.os_accuracy) {
            (Some(guess), Some(acc)) => lines.push(format!("OS: {} ({}%)", guess, acc)),
            (Some(guess), None) => lines.push(format!("OS: {}", guess)),
            (None, _) => lines.push("OS: Unknown".to_string()),
        }

        if self.ports.is_empty() {
            lines.push("No open ports parsed".to_string());
        } else {
            lines.push("Open ports:".to_string());
            lines.extend(self.ports.iter().cloned());
        }

        lines.join("\n")
    }
}
