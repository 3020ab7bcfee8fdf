use anyhow::{bail, ensure, Result};

/// Offset of the 16-byte cartridge title in the header.
const TITLE_OFFSET: usize = 0x134;
const TITLE_LEN: usize = 16;
/// Offset of the ROM-size byte; the value n encodes a size of
/// 32 KiB * 2^n.
const ROM_SIZE_OFFSET: usize = 0x148;

/// Largest size code with a defined meaning (8 MiB).
const MAX_SIZE_CODE: u8 = 0x08;

/// A validated cartridge image.
///
/// The core only wants "a byte buffer of the declared size"; this type is
/// the collaborator that checks the header before handing the buffer over.
#[derive(Debug)]
pub struct RomImage {
    title: String,
    data: Vec<u8>,
}

impl RomImage {
    /// Validate a raw file image against its own header.
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        ensure!(
            data.len() > ROM_SIZE_OFFSET,
            "file is {} bytes, too small to hold a cartridge header",
            data.len()
        );

        let raw_title = &data[TITLE_OFFSET..TITLE_OFFSET + TITLE_LEN];
        let end = raw_title
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TITLE_LEN);
        let title = String::from_utf8_lossy(&raw_title[..end]).into_owned();

        let size_code = data[ROM_SIZE_OFFSET];
        if size_code > MAX_SIZE_CODE {
            bail!("unknown ROM size code {size_code:#04X} in header");
        }
        let declared = (32 * 1024usize) << size_code;
        ensure!(
            data.len() == declared,
            "file is {} bytes but the header declares {} (size code {:#04X})",
            data.len(),
            declared,
            size_code
        );

        Ok(Self { title, data })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(title: &[u8], size_code: u8, len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        data[TITLE_OFFSET..TITLE_OFFSET + title.len()].copy_from_slice(title);
        data[ROM_SIZE_OFFSET] = size_code;
        data
    }

    #[test]
    fn parses_well_formed_header() {
        let rom = RomImage::parse(image(b"TETRIS", 0x00, 32 * 1024)).unwrap();
        assert_eq!(rom.title(), "TETRIS");
        assert_eq!(rom.len(), 32 * 1024);
        assert!(!rom.is_empty());
    }

    #[test]
    fn title_is_nul_trimmed() {
        let rom = RomImage::parse(image(b"AB\0CD", 0x00, 32 * 1024)).unwrap();
        assert_eq!(rom.title(), "AB");
    }

    #[test]
    fn size_code_scales_by_powers_of_two() {
        let rom = RomImage::parse(image(b"BIG", 0x02, 128 * 1024)).unwrap();
        assert_eq!(rom.len(), 128 * 1024);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = RomImage::parse(image(b"SHORT", 0x01, 32 * 1024)).unwrap_err();
        assert!(err.to_string().contains("declares 65536"));
    }

    #[test]
    fn rejects_headerless_file() {
        assert!(RomImage::parse(vec![0u8; 0x100]).is_err());
    }

    #[test]
    fn rejects_unknown_size_code() {
        let err = RomImage::parse(image(b"X", 0xFF, 32 * 1024)).unwrap_err();
        assert!(err.to_string().contains("size code"));
    }
}
