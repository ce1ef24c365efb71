//! Static mapping from DNSBL sentinel addresses to human-readable causes.
//!
//! A listing zone answers with an address in 127.0.0.0/8 encoding the
//! reason for the listing; the labels follow blocklist.de's published
//! reason codes. 127.0.0.2 is shared between blocklist.de's amavis code
//! and the cymru bogon list, so that label is inherently ambiguous; the
//! resolver logs the matching zone at lookup time.

use std::borrow::Cow;
use std::net::Ipv4Addr;

/// Returns the label for a known sentinel.
pub fn label(sentinel: Ipv4Addr) -> Option<&'static str> {
    match sentinel.octets() {
        [127, 0, 0, 2] => Some("amavis[blocklist.de] or bogon"),
        [127, 0, 0, 3] => Some("apacheddos"),
        [127, 0, 0, 4] => Some("asterisk"),
        [127, 0, 0, 5] => Some("badbot"),
        [127, 0, 0, 6] => Some("ftp"),
        [127, 0, 0, 7] => Some("imap"),
        [127, 0, 0, 8] => Some("ircbot"),
        [127, 0, 0, 9] => Some("mail"),
        [127, 0, 0, 10] => Some("pop3"),
        [127, 0, 0, 11] => Some("regbot"),
        [127, 0, 0, 12] => Some("rfi-attack"),
        [127, 0, 0, 13] => Some("sasl"),
        [127, 0, 0, 14] => Some("ssh"),
        [127, 0, 0, 15] => Some("w00tw00t"),
        [127, 0, 0, 16] => Some("portflood"),
        [127, 0, 0, 17] => Some("sql-injection"),
        [127, 0, 0, 18] => Some("webmin"),
        [127, 0, 0, 19] => Some("trigger-spam"),
        [127, 0, 0, 20] => Some("manual"),
        [127, 0, 0, 21] => Some("bruteforcelogin"),
        [127, 0, 0, 22] => Some("mysql"),
        _ => None,
    }
}

/// Human-readable cause for a sentinel. Unknown sentinels fall back to
/// their dotted-decimal form; the verdict is a drop either way.
pub fn describe(sentinel: Ipv4Addr) -> Cow<'static, str> {
    label(sentinel).map_or_else(|| Cow::Owned(sentinel.to_string()), Cow::Borrowed)
}
