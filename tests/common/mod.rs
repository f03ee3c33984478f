#![allow(dead_code)]

use std::collections::HashMap;

use sunspec_bridge::sunspec::RegisterTransport;

pub const COMMON_ADDRESS: u32 = 40_000;
pub const INVERTER_ADDRESS: u32 = 40_069;
pub const METER_COMMON_ADDRESSES: [u32; 3] = [40_121, 40_295, 40_469];
pub const METER_DATA_ADDRESSES: [u32; 3] = [40_188, 40_362, 40_537];

/// Signed value as the raw register word a device would report.
pub fn s(value: i16) -> u16 {
    value as u16
}

/// ASCII packed two characters per word, NUL padded to `word_count`.
pub fn string_words(text: &str, word_count: usize) -> Vec<u16> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(word_count * 2, 0);
    bytes
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {}, got {}",
        expected,
        actual
    );
}

pub fn assert_close_opt(actual: Option<f64>, expected: Option<f64>) {
    match (actual, expected) {
        (Some(actual), Some(expected)) => assert_close(actual, expected),
        (None, None) => {}
        _ => panic!("expected {:?}, got {:?}", expected, actual),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SimulatedError {
    #[error("link down")]
    LinkDown,
    #[error("no register at {0}")]
    Unmapped(u32),
}

/// In-memory register map that records every read issued against it.
#[derive(Debug, Default)]
pub struct SimulatedTransport {
    registers: HashMap<u32, u16>,
    pub reads: Vec<(u32, u16)>,
    pub fail_at: Option<u32>,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, address: u32, words: &[u16]) -> Self {
        self.load(address, words);
        self
    }

    pub fn load(&mut self, address: u32, words: &[u16]) {
        for (offset, word) in words.iter().enumerate() {
            self.registers.insert(address + offset as u32, *word);
        }
    }

    pub fn set(&mut self, address: u32, word: u16) {
        self.registers.insert(address, word);
    }
}

impl RegisterTransport for SimulatedTransport {
    type Error = SimulatedError;

    fn read(&mut self, address: u32, count: u16) -> Result<Vec<u16>, Self::Error> {
        self.reads.push((address, count));

        if self.fail_at == Some(address) {
            return Err(SimulatedError::LinkDown);
        }

        (address..address + u32::from(count))
            .map(|a| self.registers.get(&a).copied().ok_or(SimulatedError::Unmapped(a)))
            .collect()
    }
}

pub struct Factory;

impl Factory {
    // {{{ common
    pub fn common_body() -> Vec<u16> {
        let mut words = Vec::new();
        words.extend(string_words("Fronius", 16));
        words.extend(string_words("Symo 10.0-3-M", 16));
        words.extend(string_words("", 8));
        words.extend(string_words("1.2.3", 8));
        words.extend(string_words("SN12345678", 16));
        words.push(1);
        words
    }

    pub fn common() -> Vec<u16> {
        let body = Self::common_body();
        let mut words = vec![0x5375, 0x6E53, 1, body.len() as u16];
        words.extend(body);
        words
    }
    // }}}

    // {{{ inverter
    /// Single phase inverter, model 101, in MPPT.
    pub fn inverter_body() -> Vec<u16> {
        let mut words = vec![
            125, 125, 0xFFFF, 0xFFFF, s(-1), // current, scale
            2400, 0, 0, 2300, 0xFFFF, 0xFFFF, s(-1), // voltages, scale
            2875, 0, // W
            5000, s(-2), // Hz
            2900, 0, // VA
            s(-150), 0, // var
            9900, s(-4), // PF
            0x0001, 0x86A0, 1, // Wh, unsigned scale
            80, s(-1), // DC A
            3600, s(-1), // DC V
            2950, 0, // DC W
            0xFFFF, 415, 0xFFFF, 0xFFFF, s(-1), // temperatures, scale
            4, 0, // status, vendor status
        ];
        // registers past vendor status that are not decoded
        words.resize(50, 0);
        words
    }

    pub fn inverter() -> Vec<u16> {
        Self::inverter_with(101, &Self::inverter_body())
    }

    pub fn inverter_with(device_type: u16, body: &[u16]) -> Vec<u16> {
        let mut words = vec![device_type, body.len() as u16];
        words.extend_from_slice(body);
        words
    }
    // }}}

    // {{{ meter common
    pub fn meter_common_body(serial: &str) -> Vec<u16> {
        let mut words = Vec::new();
        words.extend(string_words("Fronius", 16));
        words.extend(string_words("Smart Meter 63A", 16));
        words.extend(string_words("Primary", 8));
        words.extend(string_words("2.9", 8));
        words.extend(string_words(serial, 16));
        words.push(240);
        words
    }

    pub fn meter_common(serial: &str) -> Vec<u16> {
        let body = Self::meter_common_body(serial);
        let mut words = vec![1, body.len() as u16];
        words.extend(body);
        words
    }
    // }}}

    // {{{ meter data
    /// Wye connected three phase meter, model 203.
    pub fn meter_data_body() -> Vec<u16> {
        let mut words = vec![
            300, 100, 100, 100, s(-1), // A
            2300, 2300, 2310, 2290, 4000, 4000, 4000, 4000, s(-1), // V
            5000, s(-2), // Hz
            s(-1500), s(-500), s(-500), s(-500), 0, // W
            1600, 530, 530, 540, 0, // VA
            300, 100, 100, 100, 0, // var
            95, 95, 95, 95, s(-2), // PF
            0x0000, 12345, 0x0000, 4115, 0x0000, 4115, 0x0000, 4115, // exported Wh
            0x0001, 0x0000, 0x0000, 21845, 0x0000, 21845, 0x0000, 21846, // imported Wh
            0, // Wh scale
        ];
        words.resize(105, 0);
        words
    }

    /// Single phase meter, model 201: every B and C register reads as unsupported.
    pub fn meter_data_single_phase_body() -> Vec<u16> {
        let mut words = vec![
            50, 50, 0xFFFF, 0xFFFF, s(-1), // A
            2300, 2300, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, s(-1), // V
            5000, s(-2), // Hz
            1150, 1150, 0xFFFF, 0xFFFF, 0, // W
            1200, 1200, 0xFFFF, 0xFFFF, 0, // VA
            s(-40), s(-40), 0xFFFF, 0xFFFF, 0, // var
            96, 96, 0xFFFF, 0xFFFF, s(-2), // PF
            0x0000, 500, 0x0000, 500, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, // exported Wh
            0x0000, 700, 0x0000, 700, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, // imported Wh
            1, // Wh scale
        ];
        words.resize(105, 0);
        words
    }

    pub fn meter_data() -> Vec<u16> {
        Self::meter_data_with(203, &Self::meter_data_body())
    }

    pub fn meter_data_with(device_type: u16, body: &[u16]) -> Vec<u16> {
        let mut words = vec![device_type, body.len() as u16];
        words.extend_from_slice(body);
        words
    }
    // }}}

    /// A device exposing every block at its usual address, with three meters.
    pub fn transport() -> SimulatedTransport {
        let mut transport = SimulatedTransport::new()
            .with_block(COMMON_ADDRESS, &Self::common())
            .with_block(INVERTER_ADDRESS, &Self::inverter());

        for (n, (&common, &data)) in METER_COMMON_ADDRESSES
            .iter()
            .zip(METER_DATA_ADDRESSES.iter())
            .enumerate()
        {
            transport.load(common, &Self::meter_common(&format!("MTR-{}", n + 1)));
            transport.load(data, &Self::meter_data());
        }

        transport
    }
}
