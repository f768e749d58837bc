//! Byte layouts of the BMS telemetry frames.
//!
//! The BMS firmware moved several fields when its CAN layout was revised.
//! Both revisions are described here as explicit offset tables, and the
//! active one is chosen by [`SchemaVersion`], never guessed from payload
//! contents.
//!
//! | id    | record           | `Current`                                   | `Legacy`                                    |
//! |-------|------------------|---------------------------------------------|---------------------------------------------|
//! | 0x03B | pack electrical  | V be16@0, I be16@2, SOC u8@5                | I be16@0, V be16@2, SOC u8@4                |
//! | 0x3CB | cell extremes    | lo be16@0, hi be16@2, SOH u8@4, cyc be16@5  | hi be16@0, lo be16@2, cyc be16@4, SOH u8@6  |
//! | 0x6B2 | relays/limits    | rly@0, CCL@1, DCL@2, Ah be16@3, Iavg be16@5 | CCL@0, DCL@1, rly@2, Iavg be16@3, Ah be16@5 |
//! | 0x6B3 | diagnostic flags | DTC be16@0, Thi@2, Tlo@3, ctr@4, status@5   | DTC le16@0, status@2, Thi@3, Tlo@4, ctr@5   |
//!
//! Legacy cell voltages are millivolts; current ones are 100 µV steps.

/// Frame id: pack voltage, current, state of charge.
pub const ID_PACK_ELECTRICAL: u32 = 0x03B;
/// Frame id: cell voltage extremes, health, cycles.
pub const ID_CELL_EXTREMES: u32 = 0x3CB;
/// Frame id: relay state, current limits, capacity.
pub const ID_RELAY_LIMITS: u32 = 0x6B2;
/// Frame id: fault codes, temperatures, status.
pub const ID_DIAGNOSTIC_FLAGS: u32 = 0x6B3;

/// Selects which byte-offset table the decoder uses.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchemaVersion {
    /// Layout before the CAN message revision.
    Legacy,
    /// Layout after the CAN message revision.
    #[default]
    Current,
}

impl SchemaVersion {
    pub const fn layout(self) -> &'static SchemaLayout {
        match self {
            Self::Legacy => &LEGACY,
            Self::Current => &CURRENT,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Legacy => "LEGACY",
            Self::Current => "CURRENT",
        }
    }
}

/// Byte order of a 16-bit field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Endian {
    Big,
    Little,
}

/// Width and byte order of one field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Width {
    Byte,
    Pair(Endian),
}

/// Location of one field inside the payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Field {
    pub offset: u8,
    pub width: Width,
}

impl Field {
    pub const fn byte(offset: u8) -> Self {
        Self {
            offset,
            width: Width::Byte,
        }
    }

    pub const fn be16(offset: u8) -> Self {
        Self {
            offset,
            width: Width::Pair(Endian::Big),
        }
    }

    pub const fn le16(offset: u8) -> Self {
        Self {
            offset,
            width: Width::Pair(Endian::Little),
        }
    }

    /// One past the last byte this field occupies.
    pub const fn end(&self) -> u8 {
        match self.width {
            Width::Byte => self.offset + 1,
            Width::Pair(_) => self.offset + 2,
        }
    }

    /// Read the field as an unsigned integer.
    ///
    /// Callers check the payload length first; bytes past the slice read as 0
    /// so a short slice can never panic.
    pub fn read_u16(
        &self,
        data: &[u8],
    ) -> u16 {
        let at = |i: u8| data.get(usize::from(i)).copied().unwrap_or(0);
        match self.width {
            Width::Byte => u16::from(at(self.offset)),
            Width::Pair(Endian::Big) => u16::from_be_bytes([at(self.offset), at(self.offset + 1)]),
            Width::Pair(Endian::Little) => u16::from_le_bytes([at(self.offset), at(self.offset + 1)]),
        }
    }

    /// Read the field as a two's-complement signed integer.
    pub fn read_i16(
        &self,
        data: &[u8],
    ) -> i16 {
        match self.width {
            Width::Byte => i16::from(self.read_u16(data) as u8 as i8),
            Width::Pair(_) => self.read_u16(data) as i16,
        }
    }

    /// Write `value` at this field's location, truncating to the field width.
    pub fn write_u16(
        &self,
        payload: &mut [u8; 8],
        value: u16,
    ) {
        let i = usize::from(self.offset);
        match self.width {
            Width::Byte => payload[i] = value as u8,
            Width::Pair(Endian::Big) => payload[i..i + 2].copy_from_slice(&value.to_be_bytes()),
            Width::Pair(Endian::Little) => payload[i..i + 2].copy_from_slice(&value.to_le_bytes()),
        }
    }
}

/// Wire unit of the cell voltage fields.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellUnit {
    Millivolts,
    TenthMillivolts,
}

impl CellUnit {
    /// Convert a wire value to 100 µV steps.
    pub const fn to_100uv(self, raw: u16) -> u16 {
        match self {
            Self::Millivolts => raw.saturating_mul(10),
            Self::TenthMillivolts => raw,
        }
    }

    /// Convert 100 µV steps back to the wire unit (rounded to nearest).
    pub const fn from_100uv(self, value: u16) -> u16 {
        match self {
            Self::Millivolts => ((value as u32 + 5) / 10) as u16,
            Self::TenthMillivolts => value,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PackElectricalLayout {
    pub voltage: Field,
    pub current: Field,
    pub soc: Field,
}

#[derive(Clone, Copy, Debug)]
pub struct CellExtremesLayout {
    pub low_cell: Field,
    pub high_cell: Field,
    pub health: Field,
    pub cycles: Field,
    pub unit: CellUnit,
}

#[derive(Clone, Copy, Debug)]
pub struct RelayLimitsLayout {
    pub relays: Field,
    pub charge_limit: Field,
    pub discharge_limit: Field,
    pub amp_hours: Field,
    pub avg_current: Field,
}

#[derive(Clone, Copy, Debug)]
pub struct DiagnosticFlagsLayout {
    pub faults: Field,
    pub temp_high: Field,
    pub temp_low: Field,
    pub counter: Field,
    pub status: Field,
}

/// Complete frame table for one schema revision.
#[derive(Clone, Copy, Debug)]
pub struct SchemaLayout {
    pub pack: PackElectricalLayout,
    pub cells: CellExtremesLayout,
    pub relays: RelayLimitsLayout,
    pub diagnostics: DiagnosticFlagsLayout,
}

/// Smallest DLC that covers every field in `fields`.
pub const fn required_len(fields: &[Field]) -> u8 {
    let mut len = 0;
    let mut i = 0;
    while i < fields.len() {
        let end = fields[i].end();
        if end > len {
            len = end;
        }
        i += 1;
    }
    len
}

impl PackElectricalLayout {
    pub const fn required_len(&self) -> u8 { required_len(&[self.voltage, self.current, self.soc]) }
}

impl CellExtremesLayout {
    pub const fn required_len(&self) -> u8 { required_len(&[self.low_cell, self.high_cell, self.health, self.cycles]) }
}

impl RelayLimitsLayout {
    pub const fn required_len(&self) -> u8 {
        required_len(&[
            self.relays,
            self.charge_limit,
            self.discharge_limit,
            self.amp_hours,
            self.avg_current,
        ])
    }
}

impl DiagnosticFlagsLayout {
    pub const fn required_len(&self) -> u8 {
        required_len(&[self.faults, self.temp_high, self.temp_low, self.counter, self.status])
    }
}

const CURRENT: SchemaLayout = SchemaLayout {
    pack: PackElectricalLayout {
        voltage: Field::be16(0),
        current: Field::be16(2),
        // byte 4 is reserved
        soc: Field::byte(5),
    },
    cells: CellExtremesLayout {
        low_cell: Field::be16(0),
        high_cell: Field::be16(2),
        health: Field::byte(4),
        cycles: Field::be16(5),
        unit: CellUnit::TenthMillivolts,
    },
    relays: RelayLimitsLayout {
        relays: Field::byte(0),
        charge_limit: Field::byte(1),
        discharge_limit: Field::byte(2),
        amp_hours: Field::be16(3),
        avg_current: Field::be16(5),
    },
    diagnostics: DiagnosticFlagsLayout {
        faults: Field::be16(0),
        temp_high: Field::byte(2),
        temp_low: Field::byte(3),
        counter: Field::byte(4),
        status: Field::byte(5),
    },
};

const LEGACY: SchemaLayout = SchemaLayout {
    pack: PackElectricalLayout {
        current: Field::be16(0),
        voltage: Field::be16(2),
        soc: Field::byte(4),
    },
    cells: CellExtremesLayout {
        high_cell: Field::be16(0),
        low_cell: Field::be16(2),
        cycles: Field::be16(4),
        health: Field::byte(6),
        unit: CellUnit::Millivolts,
    },
    relays: RelayLimitsLayout {
        charge_limit: Field::byte(0),
        discharge_limit: Field::byte(1),
        relays: Field::byte(2),
        avg_current: Field::be16(3),
        amp_hours: Field::be16(5),
    },
    diagnostics: DiagnosticFlagsLayout {
        faults: Field::le16(0),
        status: Field::byte(2),
        temp_high: Field::byte(3),
        temp_low: Field::byte(4),
        counter: Field::byte(5),
    },
};

// Every layout must fit in a classic CAN payload
const _: () = assert!(CURRENT.pack.required_len() <= 8);
const _: () = assert!(CURRENT.cells.required_len() <= 8);
const _: () = assert!(CURRENT.relays.required_len() <= 8);
const _: () = assert!(CURRENT.diagnostics.required_len() <= 8);
const _: () = assert!(LEGACY.pack.required_len() <= 8);
const _: () = assert!(LEGACY.cells.required_len() <= 8);
const _: () = assert!(LEGACY.relays.required_len() <= 8);
const _: () = assert!(LEGACY.diagnostics.required_len() <= 8);
