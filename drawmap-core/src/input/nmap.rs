//! Normal report parser (Nmap `-oN` and terminal output)
//!
//! The grammar is a sequence of host blocks, each opened by a
//! `Nmap scan report for ...` line. Parsing is a single fold over the lines with an
//! explicit accumulator: the host being built and the hosts already finished. A new
//! announcement or the end of input flushes the host being built.

use crate::input::common::first_guess;
use crate::ip_utils::is_dotted_quad;
use crate::merge::merge_hosts;
use crate::types::Host;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Nmap scan report for (.+)$").expect("report header pattern is valid"));

static TRAILING_ADDR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)$").expect("trailing address pattern is valid"));

static PORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<port>\d+)/(?P<proto>tcp|udp)\s+open\s+(?P<service>\S+)(?P<rest>.*)$")
        .expect("port line pattern is valid")
});

static OS_GUESSES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Aggressive OS guesses|OS guesses):\s*(.+)$")
        .expect("OS guesses pattern is valid")
});

static OS_DETAILS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^OS details:\s*(.+)$").expect("OS details pattern is valid"));

static RUNNING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Running:\s*(.+)$").expect("Running pattern is valid"));

static SERVICE_INFO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Service Info:\s*(.+)$").expect("Service Info pattern is valid"));

static SERVICE_INFO_OS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bOS:\s*([^;]+)").expect("Service Info OS pattern is valid"));

/// Fold state: the host being built and the hosts already flushed
#[derive(Debug, Default)]
struct Accumulator {
    current: Option<Host>,
    finished: Vec<Host>,
}

impl Accumulator {
    fn flush(&mut self) {
        if let Some(host) = self.current.take() {
            self.finished.push(host);
        }
    }

    fn step(mut self, line: &str) -> Self {
        if let Some(caps) = HOST_RE.captures(line) {
            self.flush();
            self.current = Some(host_from_announcement(caps[1].trim()));
            return self;
        }

        if let Some(host) = self.current.as_mut() {
            apply_line(host, line);
        }
        self
    }

    fn finish(mut self) -> Vec<Host> {
        self.flush();
        self.finished
    }
}

/// Parses normal output into canonical hosts
///
/// # Examples
///
/// ```
/// use drawmap_core::input::nmap;
///
/// let report = "Nmap scan report for gw.lan (10.0.0.1)\n\
///               Host is up (0.0010s latency).\n\
///               PORT   STATE SERVICE\n\
///               22/tcp open  ssh\n";
/// let hosts = nmap::parse(report);
/// assert_eq!(hosts[0].name.as_deref(), Some("gw.lan"));
/// assert_eq!(hosts[0].ports, vec!["22/tcp ssh"]);
/// ```
pub fn parse(text: &str) -> Vec<Host> {
    let raw = text
        .lines()
        .fold(Accumulator::default(), Accumulator::step)
        .finish();

    debug!(hosts = raw.len(), "parsed normal report");
    merge_hosts(raw)
}

/// Splits `name (address)` / `address` / `name` into a fresh host
///
/// When the text is neither parenthesised nor a dotted quad it is kept as both name and
/// address, so hosts reported only by name still get a merge key.
fn host_from_announcement(raw: &str) -> Host {
    if let Some(caps) = TRAILING_ADDR_RE.captures(raw) {
        let address = caps[1].trim();
        let name = raw[..raw.rfind('(').unwrap_or(0)].trim();
        return Host::new(address).with_name(name);
    }

    if is_dotted_quad(raw) {
        Host::new(raw)
    } else {
        Host::new(raw).with_name(raw)
    }
}

fn apply_line(host: &mut Host, line: &str) {
    if let Some(caps) = OS_GUESSES_RE.captures(line) {
        let (guess, accuracy) = first_guess(&caps[2]);
        host.offer_os_guess(guess, accuracy);
        return;
    }

    if let Some(caps) = OS_DETAILS_RE
        .captures(line)
        .or_else(|| RUNNING_RE.captures(line))
    {
        host.offer_os_guess(Some(caps[1].trim().to_string()), None);
        return;
    }

    // "Service Info: OS: Windows; CPE: cpe:/o:microsoft:windows" may still be followed by
    // the port check below.
    if let Some(caps) = SERVICE_INFO_RE.captures(line) {
        if let Some(os) = SERVICE_INFO_OS_RE.captures(&caps[1]) {
            host.offer_os_guess(Some(os[1].trim().to_string()), None);
        }
    }

    if let Some(caps) = PORT_RE.captures(line) {
        let rest = caps["rest"].trim();
        let mut descriptor = format!("{}/{} {}", &caps["port"], &caps["proto"], &caps["service"]);
        if !rest.is_empty() {
            descriptor.push(' ');
            descriptor.push_str(rest);
        }
        host.add_port(descriptor);
    }
}
