//! Synthetic SWF construction shared by the integration tests.

#![allow(dead_code)]

use swfcarve_core::swf::rect_len_for_nbits;

/// Builds an uncompressed SWF byte by byte
#[derive(Debug, Clone)]
pub struct SwfBuilder {
    tag: [u8; 3],
    version: u8,
    nbits: u8,
    declared: Option<u32>,
    tags: Vec<(u16, Vec<u8>, bool)>,
    end_tag: bool,
}

impl Default for SwfBuilder {
    fn default() -> Self {
        Self {
            tag: *b"FWS",
            version: 6,
            nbits: 15,
            declared: None,
            tags: Vec::new(),
            end_tag: true,
        }
    }
}

impl SwfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signature(mut self, tag: &[u8; 3]) -> Self {
        self.tag = *tag;
        self
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn nbits(mut self, nbits: u8) -> Self {
        self.nbits = nbits;
        self
    }

    /// Override the declared length (default: the real length)
    pub fn declared(mut self, declared: u32) -> Self {
        self.declared = Some(declared);
        self
    }

    /// Append a tag, short form when the body allows it
    pub fn tag(mut self, code: u16, body: &[u8]) -> Self {
        self.tags.push((code, body.to_vec(), false));
        self
    }

    /// Append a tag that always uses the long header
    pub fn long_tag(mut self, code: u16, body: &[u8]) -> Self {
        self.tags.push((code, body.to_vec(), true));
        self
    }

    /// Leave off the closing End tag
    pub fn without_end_tag(mut self) -> Self {
        self.end_tag = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = self.tag.to_vec();
        out.push(self.version);
        out.extend_from_slice(&[0; 4]);

        let rect_len = rect_len_for_nbits(u32::from(self.nbits)) as usize;
        let mut rect = vec![0u8; rect_len];
        rect[0] = self.nbits << 3;
        out.extend_from_slice(&rect);

        // 24 fps, 1 frame
        out.extend_from_slice(&[0x00, 0x18, 0x01, 0x00]);

        for (code, body, force_long) in &self.tags {
            if *force_long || body.len() >= 0x3F {
                out.extend_from_slice(&((code << 6) | 0x3F).to_le_bytes());
                out.extend_from_slice(&(body.len() as u32).to_le_bytes());
            } else {
                out.extend_from_slice(&((code << 6) | body.len() as u16).to_le_bytes());
            }
            out.extend_from_slice(body);
        }
        if self.end_tag {
            out.extend_from_slice(&[0x00, 0x00]);
        }

        let declared = self.declared.unwrap_or(out.len() as u32);
        out[4..8].copy_from_slice(&declared.to_le_bytes());
        out
    }
}
