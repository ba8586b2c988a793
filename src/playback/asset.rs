//! The bundled adhan recording.
//!
//! There is exactly one audio asset, compiled into the binary at build time
//! and resolved by this module. Playback is not parameterizable at call
//! time; callers get this recording or nothing.

/// The adhan recording, embedded at build time.
///
/// 16-bit PCM WAV, 16 kHz, mono. Replace `assets/adhan.wav` to ship a
/// different recording.
pub const ADHAN_SOUND_DATA: &[u8] = include_bytes!("../../assets/adhan.wav");

/// Returns the bundled adhan recording.
#[must_use]
pub const fn adhan_sound() -> &'static [u8] {
    ADHAN_SOUND_DATA
}

/// Returns the format description of the bundled recording.
#[must_use]
pub const fn adhan_sound_format() -> &'static str {
    "WAV (16-bit PCM, 16kHz, Mono)"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adhan_sound_exists() {
        let data = adhan_sound();
        assert!(!data.is_empty());
    }

    #[test]
    fn test_adhan_sound_has_riff_header() {
        let data = adhan_sound();
        assert_eq!(&data[0..4], b"RIFF");
    }

    #[test]
    fn test_adhan_sound_has_wave_format() {
        let data = adhan_sound();
        assert_eq!(&data[8..12], b"WAVE");
    }

    #[test]
    fn test_adhan_sound_has_audio_data() {
        // More than just headers: the recording carries actual samples.
        let data = adhan_sound();
        assert!(data.len() > 44);
    }

    #[test]
    fn test_adhan_sound_format_description() {
        let format = adhan_sound_format();
        assert!(format.contains("WAV"));
        assert!(format.contains("PCM"));
    }
}
