use crate::Amplitude;
use crate::operator::format_amplitude;
use crate::register::Register;
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// One basis state of a register, for human inspection.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateEntry {
    pub amplitude: Amplitude,
    pub probability: f64,
    pub label: usize,
    pub bits: String,
    #[serde(skip)]
    label_digits: usize,
}

impl Register {
    fn entry(&self, label: usize) -> StateEntry {
        let amplitude = self.amplitudes[label];
        StateEntry {
            amplitude,
            probability: amplitude.norm_sqr(),
            label,
            bits: format!("{:0width$b}", label, width = self.width),
            label_digits: (self.dim() - 1).to_string().len(),
        }
    }

    /// Every basis state, in label order.
    pub fn dump(&self) -> Vec<StateEntry> {
        (0..self.dim()).map(|label| self.entry(label)).collect()
    }

    /// Only the basis states with a non-zero amplitude.
    pub fn dump_nonzero(&self) -> Vec<StateEntry> {
        (0..self.dim())
            .filter(|&label| self.amplitudes[label].norm_sqr() > 0.0)
            .map(|label| self.entry(label))
            .collect()
    }
}

/// Writes `entries` as a single JSON line.
pub fn emit_dump(entries: &[StateEntry], writer: &mut impl Write) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *writer, entries)?;
    writeln!(writer).map_err(serde_json::Error::io)
}

impl fmt::Display for StateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6}|({:>digits$}){}>",
            format_amplitude(self.amplitude),
            self.probability,
            self.label,
            self.bits,
            digits = self.label_digits
        )
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.dump() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::hadamard_on;

    #[test]
    fn test_dump_lists_every_label() {
        let register = Register::new(2, &[2]).unwrap();
        let dump = register.dump();
        assert_eq!(dump.len(), 4);
        assert_eq!(dump[2].bits, "10");
        assert_eq!(dump[2].probability, 1.0);
        assert_eq!(dump[1].probability, 0.0);
    }

    #[test]
    fn test_dump_nonzero_skips_empty_states() {
        let mut register = Register::new(3, &[]).unwrap();
        hadamard_on(&mut register, 2).unwrap();
        let labels: Vec<usize> = register.dump_nonzero().iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![0, 1]);
    }

    #[test]
    fn test_entry_display_pads_label() {
        let register = Register::new(4, &[5]).unwrap();
        let line = register.dump()[5].to_string();
        assert_eq!(line, "+1.000000+0.000000i 1.000000|( 5)0101>");
    }

    #[test]
    fn test_register_display_has_a_line_per_state() {
        let register = Register::ket_minus();
        let text = register.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("-0.707107+0.000000i 0.500000|(1)1>"));
    }

    #[test]
    fn test_emit_dump_writes_json_line() {
        let register = Register::ket_one();
        let mut out = Vec::new();
        emit_dump(&register.dump_nonzero(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "[{\"amplitude\":[0.0,1.0],\"probability\":1.0,\"label\":1,\"bits\":\"1\"}]\n"
        );
    }
}
