//! CPU snapshot codec
//!
//! The CPU state serializes to a single-line textual record with named
//! fields in a fixed order:
//!
//! ```text
//! {C:0042,X:0000,Y:0000,SP:01fc,D:0000,DBR:00,PBR:00,PC:8000,RST:0,
//!  IRQ:0,NMI:0,STP:0,CRASH:0,PSC:0,PSZ:0,PSI:1,PSD:0,PSXB:1,PSM:1,
//!  PSV:0,PSN:0,PSE:1,cycles:9}
//! ```
//!
//! Registers and banks are unprefixed hex; the simulator booleans and the
//! cycle counter are decimal. The parser accepts arbitrary whitespace
//! around `:` and `,` and is all-or-nothing: on any error the CPU is left
//! untouched.

use thiserror::Error;

use super::Cpu;

/// Snapshot parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The record is not a `{...}` list of `key:value` pairs
    #[error("snapshot record is malformed")]
    Malformed,
    /// A field is absent or out of order
    #[error("snapshot field `{0}` is missing or out of order")]
    MissingField(&'static str),
    /// A field value failed to parse
    #[error("snapshot field `{0}` has an invalid value")]
    InvalidValue(&'static str),
}

/// Field names in serialization order
const FIELDS: [&str; 23] = [
    "C", "X", "Y", "SP", "D", "DBR", "PBR", "PC", "RST", "IRQ", "NMI", "STP", "CRASH", "PSC",
    "PSZ", "PSI", "PSD", "PSXB", "PSM", "PSV", "PSN", "PSE", "cycles",
];

fn parse_hex16(s: &str, field: &'static str) -> Result<u16, SnapshotError> {
    u16::from_str_radix(s, 16).map_err(|_| SnapshotError::InvalidValue(field))
}

fn parse_hex8(s: &str, field: &'static str) -> Result<u8, SnapshotError> {
    u8::from_str_radix(s, 16).map_err(|_| SnapshotError::InvalidValue(field))
}

fn parse_bit(s: &str, field: &'static str) -> Result<bool, SnapshotError> {
    let val: u32 = s.parse().map_err(|_| SnapshotError::InvalidValue(field))?;
    // Mirrors the single-bit truncation of the original record format
    Ok(val & 1 != 0)
}

impl Cpu {
    /// Serialize the CPU state to its single-line record form
    pub fn to_record(&self) -> String {
        format!(
            "{{C:{:04x},X:{:04x},Y:{:04x},SP:{:04x},D:{:04x},DBR:{:02x},PBR:{:02x},PC:{:04x},\
             RST:{},IRQ:{},NMI:{},STP:{},CRASH:{},\
             PSC:{},PSZ:{},PSI:{},PSD:{},PSXB:{},PSM:{},PSV:{},PSN:{},PSE:{},cycles:{}}}",
            self.c,
            self.x,
            self.y,
            self.sp,
            self.d,
            self.dbr,
            self.pbr,
            self.pc,
            self.status.rst as u8,
            self.status.irq as u8,
            self.status.nmi as u8,
            self.status.stp as u8,
            self.status.crash as u8,
            self.status.c as u8,
            self.status.z as u8,
            self.status.i as u8,
            self.status.d as u8,
            self.status.xb as u8,
            self.status.m as u8,
            self.status.v as u8,
            self.status.n as u8,
            self.status.e as u8,
            self.cycles,
        )
    }

    /// Load the CPU state from a record produced by [`Cpu::to_record`]
    ///
    /// All 23 fields must be present in order. On error the CPU is left
    /// exactly as it was.
    pub fn from_record(&mut self, record: &str) -> Result<(), SnapshotError> {
        let mut staged = self.clone();
        Self::parse_into(&mut staged, record)?;
        *self = staged;
        Ok(())
    }

    fn parse_into(cpu: &mut Cpu, record: &str) -> Result<(), SnapshotError> {
        let body = record
            .trim()
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or(SnapshotError::Malformed)?;

        let mut parts = body.split(',');
        for (index, &field) in FIELDS.iter().enumerate() {
            let part = parts.next().ok_or(SnapshotError::MissingField(field))?;
            let (key, value) = part.split_once(':').ok_or(SnapshotError::Malformed)?;
            if key.trim() != field {
                return Err(SnapshotError::MissingField(field));
            }
            let value = value.trim();

            match index {
                0 => cpu.c = parse_hex16(value, field)?,
                1 => cpu.x = parse_hex16(value, field)?,
                2 => cpu.y = parse_hex16(value, field)?,
                3 => cpu.sp = parse_hex16(value, field)?,
                4 => cpu.d = parse_hex16(value, field)?,
                5 => cpu.dbr = parse_hex8(value, field)?,
                6 => cpu.pbr = parse_hex8(value, field)?,
                7 => cpu.pc = parse_hex16(value, field)?,
                8 => cpu.status.rst = parse_bit(value, field)?,
                9 => cpu.status.irq = parse_bit(value, field)?,
                10 => cpu.status.nmi = parse_bit(value, field)?,
                11 => cpu.status.stp = parse_bit(value, field)?,
                12 => cpu.status.crash = parse_bit(value, field)?,
                13 => cpu.status.c = parse_bit(value, field)?,
                14 => cpu.status.z = parse_bit(value, field)?,
                15 => cpu.status.i = parse_bit(value, field)?,
                16 => cpu.status.d = parse_bit(value, field)?,
                17 => cpu.status.xb = parse_bit(value, field)?,
                18 => cpu.status.m = parse_bit(value, field)?,
                19 => cpu.status.v = parse_bit(value, field)?,
                20 => cpu.status.n = parse_bit(value, field)?,
                21 => cpu.status.e = parse_bit(value, field)?,
                22 => {
                    cpu.cycles = value
                        .parse()
                        .map_err(|_| SnapshotError::InvalidValue(field))?
                }
                _ => unreachable!(),
            }
        }

        if parts.next().is_some() {
            return Err(SnapshotError::Malformed);
        }
        Ok(())
    }
}
