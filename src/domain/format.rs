use std::fmt;

/// Upload extensions accepted at the HTTP boundary.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "ogg", "flac", "m4a", "3gpp", "3gp", "amr", "aac", "mp4",
];

/// Container format recognized from a byte-signature sniff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    ThreeGp,
    Mp4,
    Amr,
    AmrWb,
    Unknown,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
            AudioFormat::ThreeGp => "3gp",
            AudioFormat::Mp4 => "mp4",
            AudioFormat::Amr => "amr",
            AudioFormat::AmrWb => "amr-wb",
            AudioFormat::Unknown => "unknown",
        }
    }

    /// Extension hint for probing decoders. `None` when nothing useful is
    /// known about the container.
    pub fn extension_hint(&self) -> Option<&'static str> {
        match self {
            AudioFormat::Wav => Some("wav"),
            AudioFormat::Mp3 => Some("mp3"),
            AudioFormat::Ogg => Some("ogg"),
            AudioFormat::Flac => Some("flac"),
            AudioFormat::ThreeGp | AudioFormat::Mp4 => Some("mp4"),
            AudioFormat::Amr | AudioFormat::AmrWb | AudioFormat::Unknown => None,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify raw bytes by their header signature. Diagnostic only: decode
/// success is decided by the cascade, never by this tag. Inputs shorter
/// than any signature yield `Unknown`.
pub fn sniff_format(header: &[u8]) -> AudioFormat {
    let starts_with = |sig: &[u8]| header.len() >= sig.len() && &header[..sig.len()] == sig;

    if starts_with(b"RIFF") && header.get(8..12) == Some(b"WAVE".as_slice()) {
        AudioFormat::Wav
    } else if starts_with(b"ID3") {
        AudioFormat::Mp3
    } else if starts_with(b"OggS") {
        AudioFormat::Ogg
    } else if starts_with(b"fLaC") {
        AudioFormat::Flac
    } else if contains_in_prefix(header, b"ftyp3gp", 20) {
        AudioFormat::ThreeGp
    } else if contains_in_prefix(header, b"ftypmp4", 20) || contains_in_prefix(header, b"ftypM4A", 20)
    {
        AudioFormat::Mp4
    } else if starts_with(b"#!AMR-WB\n") {
        AudioFormat::AmrWb
    } else if starts_with(b"#!AMR\n") {
        AudioFormat::Amr
    } else {
        AudioFormat::Unknown
    }
}

fn contains_in_prefix(header: &[u8], needle: &[u8], prefix_len: usize) -> bool {
    let prefix = &header[..header.len().min(prefix_len)];
    prefix
        .windows(needle.len())
        .any(|window| window == needle)
}
