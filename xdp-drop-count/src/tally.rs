use std::io::{self, Write};

/// Header printed above the per-protocol lines.
pub const REPORT_HEADER: &str = "{IP protocol-number}: {total dropped pkts}";

/// Snapshot of the drop counter table, in table iteration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropTally {
    entries: Vec<(u32, u64)>,
}

impl DropTally {
    pub fn new(entries: Vec<(u32, u64)>) -> Self {
        Self { entries }
    }

    /// Protocols with at least one dropped packet.
    pub fn dropped(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.entries.iter().copied().filter(|&(_, count)| count > 0)
    }

    pub fn get(&self, protocol: u32) -> u64 {
        self.entries
            .iter()
            .find(|&&(p, _)| p == protocol)
            .map_or(0, |&(_, count)| count)
    }

    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, &(_, count)| acc.wrapping_add(count))
    }

    /// Blank line, header, then one `<protocol>: <count> pkts` line per
    /// protocol with a non-zero count.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{REPORT_HEADER}")?;
        for (protocol, count) in self.dropped() {
            writeln!(out, "{protocol}: {count} pkts")?;
        }
        out.flush()
    }
}

/// Total of one protocol's per-CPU slots.
pub fn sum_per_cpu(values: &[u64]) -> u64 {
    values.iter().fold(0u64, |acc, &v| acc.wrapping_add(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(tally: &DropTally) -> String {
        let mut out: Vec<u8> = Vec::new();
        tally.write_report(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn zero_counts_are_suppressed() {
        let tally = DropTally::new(vec![(1, 5), (6, 42), (17, 0)]);
        assert_eq!(
            report(&tally),
            "\n{IP protocol-number}: {total dropped pkts}\n1: 5 pkts\n6: 42 pkts\n"
        );
    }

    #[test]
    fn keeps_table_order() {
        let tally = DropTally::new(vec![(58, 1), (6, 3), (0, 9)]);
        let lines: Vec<_> = report(&tally).lines().skip(2).map(String::from).collect();
        assert_eq!(lines, ["58: 1 pkts", "6: 3 pkts", "0: 9 pkts"]);
    }

    #[test]
    fn empty_table_prints_only_header() {
        let tally = DropTally::new((0..256).map(|p| (p, 0)).collect());
        assert_eq!(report(&tally), format!("\n{REPORT_HEADER}\n"));
        assert_eq!(tally.dropped().count(), 0);
    }

    #[test]
    fn lookups() {
        let tally = DropTally::new(vec![(6, 42), (17, 0)]);
        assert_eq!(tally.get(6), 42);
        assert_eq!(tally.get(17), 0);
        assert_eq!(tally.get(255), 0);
        assert_eq!(tally.total(), 42);
    }

    #[test]
    fn per_cpu_slots_add_up() {
        assert_eq!(sum_per_cpu(&[]), 0);
        assert_eq!(sum_per_cpu(&[3, 0, 4]), 7);
        assert_eq!(sum_per_cpu(&[u64::MAX, 2]), 1);
    }
}
