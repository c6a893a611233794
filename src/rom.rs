const HEADER_SIZE: usize = 16;
const TRAINER_SIZE: usize = 512;
const PRG_BANK_SIZE: usize = 16384;
const CHR_BANK_SIZE: usize = 8192;
const MAGIC_NUMBERS: &[u8; 4] = b"NES\x1a";

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Mirroring {
    Vertical,
    Horizontal,
    FourScreen,
}

// NES file header structure (16 bytes)
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct NesHeader {
    // The first 4 bytes should be "NES" followed by 0x1A (4E 45 53 1A)
    pub magic_numbers: [u8; 4],
    pub prg_rom_size: u8,
    pub chr_rom_size: u8,
    pub flags_6: u8,
    pub flags_7: u8,
    pub prg_ram_size: u8,
    pub flags_9: u8,
    pub flags_10: u8,
    pub reserved: [u8; 5],
}

// Parsed cartridge image. Parsing follows the iNES header description at
// https://formats.kaitai.io/ines/index.html; the CPU core only ever sees
// `prg_rom` through the bus.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub(crate) struct Rom {
    pub header: NesHeader,
    pub mirroring: Mirroring,
    pub mapper: u8,
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
}

impl Rom {
    pub(crate) fn parse_nes_rom(rom_data: Vec<u8>) -> Result<Rom, String> {
        if rom_data.len() < HEADER_SIZE {
            return Err("File is too short to hold an iNES header".to_string());
        }
        if &rom_data[0..4] != MAGIC_NUMBERS {
            return Err("File is not in iNES format".to_string());
        }

        let header = NesHeader {
            magic_numbers: [rom_data[0], rom_data[1], rom_data[2], rom_data[3]],
            prg_rom_size: rom_data[4],
            chr_rom_size: rom_data[5],
            flags_6: rom_data[6],
            flags_7: rom_data[7],
            prg_ram_size: rom_data[8],
            flags_9: rom_data[9],
            flags_10: rom_data[10],
            reserved: [rom_data[11], rom_data[12], rom_data[13], rom_data[14], rom_data[15]],
        };

        // Bit 4-7 of byte 6 are the LOWER 4 bits of the mapper id,
        // bit 4-7 of byte 7 the UPPER 4 bits.
        let mapper = (header.flags_7 & 0b1111_0000) | (header.flags_6 >> 4);

        // If set, a 512 byte trainer sits between the header and PRG ROM
        let has_trainer = (header.flags_6 & 0b0000_0100) != 0;

        let four_screen = (header.flags_6 & 0b0000_1000) != 0;
        let mirrored = (header.flags_6 & 0b0000_0001) != 0;
        let mirroring = if four_screen {
            Mirroring::FourScreen
        } else if mirrored {
            Mirroring::Horizontal
        } else {
            Mirroring::Vertical
        };

        let prg_rom_start = HEADER_SIZE + if has_trainer { TRAINER_SIZE } else { 0 };
        let prg_rom_len = header.prg_rom_size as usize * PRG_BANK_SIZE;
        let chr_rom_start = prg_rom_start + prg_rom_len;
        let chr_rom_len = header.chr_rom_size as usize * CHR_BANK_SIZE;

        if rom_data.len() < chr_rom_start + chr_rom_len {
            return Err(format!(
                "File is truncated: header promises {} PRG and {} CHR bytes",
                prg_rom_len, chr_rom_len
            ));
        }

        Ok(Rom {
            header,
            prg_rom: rom_data[prg_rom_start..(prg_rom_start + prg_rom_len)].to_vec(),
            chr_rom: rom_data[chr_rom_start..(chr_rom_start + chr_rom_len)].to_vec(),
            mirroring,
            mapper,
        })
    }

    // Sanity check run right after loading: this core maps PRG ROM flat at
    // $8000 (NROM), so anything with banking hardware is rejected up front.
    pub(crate) fn check_validity(&self) -> Result<(), String> {
        if self.mapper != 0 {
            return Err(format!("Unsupported mapper: ID {}", self.mapper));
        }
        // NROM PRG is either 16KB (1 unit, mirrored) or 32KB (2 units)
        if self.header.prg_rom_size != 1 && self.header.prg_rom_size != 2 {
            return Err(format!(
                "Invalid NROM PRG size: {} units (must be 1 or 2)",
                self.header.prg_rom_size
            ));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn test_rom() -> Rom {
        // 16KB of NOPs, no CHR; enough for any CPU-only test
        Self::test_rom_with_program(&[])
    }

    /// Builds a single-bank NROM image whose reset vector points at $C000,
    /// with `program` placed so it appears there through the mirror.
    #[cfg(test)]
    pub(crate) fn test_rom_with_program(program: &[u8]) -> Rom {
        assert!(program.len() <= PRG_BANK_SIZE - 6);

        let header = NesHeader {
            magic_numbers: *MAGIC_NUMBERS,
            prg_rom_size: 1,
            chr_rom_size: 1,
            flags_6: 0,
            flags_7: 0,
            prg_ram_size: 0,
            flags_9: 0,
            flags_10: 0,
            reserved: [0; 5],
        };

        let mut prg_data = vec![0xEA; PRG_BANK_SIZE]; // NOP filler
        prg_data[..program.len()].copy_from_slice(program);
        // Reset vector: a 16KB bank mirrors $8000 into $C000, so offset 0
        // is fetched when PC starts at $C000
        prg_data[0x3FFC] = 0x00;
        prg_data[0x3FFD] = 0xC0;

        Rom {
            header,
            mirroring: Mirroring::Horizontal,
            mapper: 0,
            prg_rom: prg_data,
            chr_rom: vec![0x00; CHR_BANK_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_image(prg_units: u8, chr_units: u8, flags_6: u8, flags_7: u8) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data[0..4].copy_from_slice(MAGIC_NUMBERS);
        data[4] = prg_units;
        data[5] = chr_units;
        data[6] = flags_6;
        data[7] = flags_7;
        data.extend(vec![0xAA; prg_units as usize * PRG_BANK_SIZE]);
        data.extend(vec![0xBB; chr_units as usize * CHR_BANK_SIZE]);
        data
    }

    #[test]
    fn test_parse_nes_rom() {
        let rom = Rom::parse_nes_rom(raw_image(2, 1, 0, 0)).unwrap();
        assert_eq!(rom.prg_rom.len(), 2 * PRG_BANK_SIZE);
        assert_eq!(rom.chr_rom.len(), CHR_BANK_SIZE);
        assert_eq!(rom.mapper, 0);
        assert_eq!(rom.mirroring, Mirroring::Vertical);
        assert!(rom.prg_rom.iter().all(|&b| b == 0xAA));
        assert!(rom.chr_rom.iter().all(|&b| b == 0xBB));
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let mut data = raw_image(1, 1, 0, 0);
        data[0] = b'X';
        assert!(Rom::parse_nes_rom(data).is_err());
    }

    #[test]
    fn test_parse_rejects_truncated_image() {
        let mut data = raw_image(1, 1, 0, 0);
        data.truncate(HEADER_SIZE + 100);
        assert!(Rom::parse_nes_rom(data).is_err());
    }

    #[test]
    fn test_parse_skips_trainer() {
        let mut data = vec![0u8; HEADER_SIZE];
        data[0..4].copy_from_slice(MAGIC_NUMBERS);
        data[4] = 1;
        data[5] = 0;
        data[6] = 0b0000_0100; // trainer present
        data.extend(vec![0x11; TRAINER_SIZE]);
        data.extend(vec![0x22; PRG_BANK_SIZE]);
        let rom = Rom::parse_nes_rom(data).unwrap();
        assert!(rom.prg_rom.iter().all(|&b| b == 0x22));
    }

    #[test]
    fn test_mapper_id_is_assembled_from_both_flag_bytes() {
        let rom = Rom::parse_nes_rom(raw_image(1, 1, 0b0001_0000, 0b0100_0000)).unwrap();
        assert_eq!(rom.mapper, 0x41);
        assert!(rom.check_validity().is_err());
    }

    #[test]
    fn test_mirroring_flags() {
        let horizontal = Rom::parse_nes_rom(raw_image(1, 1, 0b0000_0001, 0)).unwrap();
        assert_eq!(horizontal.mirroring, Mirroring::Horizontal);
        let four_screen = Rom::parse_nes_rom(raw_image(1, 1, 0b0000_1001, 0)).unwrap();
        assert_eq!(four_screen.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn test_check_validity_accepts_nrom_sizes() {
        assert!(Rom::parse_nes_rom(raw_image(1, 1, 0, 0)).unwrap().check_validity().is_ok());
        assert!(Rom::parse_nes_rom(raw_image(2, 1, 0, 0)).unwrap().check_validity().is_ok());
        assert!(Rom::parse_nes_rom(raw_image(3, 1, 0, 0)).unwrap().check_validity().is_err());
    }

    #[test]
    fn test_test_rom_reset_vector() {
        let rom = Rom::test_rom_with_program(&[0xA9, 0x05]);
        assert_eq!(rom.prg_rom[0x3FFC], 0x00);
        assert_eq!(rom.prg_rom[0x3FFD], 0xC0);
        assert_eq!(rom.prg_rom[0], 0xA9);
        assert_eq!(rom.prg_rom[1], 0x05);
        assert_eq!(rom.prg_rom[2], 0xEA);
    }
}
