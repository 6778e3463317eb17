//! Terminal output: the decryption report, packet listings and status lines.

use std::path::Path;

use bytesize::ByteSize;
use chrono::DateTime;
use console::style;

use crate::packet::Packet;
use crate::processor::Decrypted;
use crate::types::ProcessorMode;

/// Renders a Literal Data timestamp as a UTC date.
#[must_use]
pub fn format_timestamp(timestamp: u32) -> String {
    DateTime::from_timestamp(i64::from(timestamp), 0).map_or_else(|| timestamp.to_string(), |date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Report lines as `(label, value)` pairs, in display order.
#[must_use]
pub fn report_rows(decrypted: &Decrypted) -> Vec<(&'static str, String)> {
    let count = decrypted.iterations().map_or_else(|| "-".to_owned(), |count| count.to_string());
    vec![
        ("Algorithm", decrypted.algorithm_name().to_owned()),
        ("S2K mode", decrypted.s2k_mode().to_string()),
        ("S2K count", count),
        ("Digest", decrypted.hash_name().to_owned()),
        ("Filename", decrypted.filename()),
        ("Date", format_timestamp(decrypted.timestamp())),
        ("Size", ByteSize::b(decrypted.content().len() as u64).to_string()),
        ("Integrity", decrypted.integrity().to_string()),
    ]
}

pub fn show_report(decrypted: &Decrypted) {
    println!();
    for (label, value) in report_rows(decrypted) {
        let value = if label == "Integrity" && !decrypted.integrity().is_ok() { style(value).red().bold() } else { style(value).green() };
        println!("  {:>10}  {}", style(label).bold(), value);
    }
}

pub fn show_packets(packets: &[Packet]) {
    for packet in packets {
        println!("{}", style(packet.listing()).cyan());
    }
}

pub fn show_success(mode: ProcessorMode, path: &Path) {
    let action = match mode {
        ProcessorMode::Encrypt => "encrypted",
        ProcessorMode::Decrypt => "decrypted",
    };

    println!();
    println!("{} {}", style("✓").green(), style(format!("File {} successfully: {}", action, path.display())).bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{Decryptor, EncryptOptions, Encryptor};
    use crate::types::IntegrityPolicy;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_report_rows() {
        let message = Encryptor::new(EncryptOptions::default()).encrypt(b"pw", "report.txt", 0, &[0u8; 2048]).unwrap();
        let decrypted = Decryptor::parse(&message).unwrap().decrypt(b"pw", IntegrityPolicy::Strict).unwrap();
        let rows = report_rows(&decrypted);

        let value = |label: &str| rows.iter().find(|(l, _)| *l == label).map(|(_, v)| v.clone()).unwrap();
        assert_eq!(value("Algorithm"), "AES256");
        assert_eq!(value("S2K mode"), "iterated+salted");
        assert_eq!(value("S2K count"), "65536");
        assert_eq!(value("Digest"), "SHA256");
        assert_eq!(value("Filename"), "report.txt");
        assert_eq!(value("Date"), "1970-01-01 00:00:00 UTC");
        assert_eq!(value("Integrity"), "ok");
        assert!(value("Size").contains('2'));
    }
}
