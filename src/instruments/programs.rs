/// General MIDI program used when an instrument has no entry (flute).
pub const DEFAULT_PROGRAM: u8 = 73;

/// Program numbers sent to the external soundfont renderer.
const PROGRAMS: [(&str, u8); 5] = [
    ("Piano", 0),
    ("Guitar", 24),
    ("Violin", 40),
    ("Flute", 73),
    ("Trumpet", 56),
];

/// General MIDI program (0-127) for an instrument name.
///
/// Only the five instruments above have programs; everything else, including
/// registry entries such as "Saxophone", renders as [`DEFAULT_PROGRAM`].
pub fn program_number(name: &str) -> u8 {
    PROGRAMS
        .iter()
        .find(|(entry, _)| entry.eq_ignore_ascii_case(name.trim()))
        .map(|&(_, program)| program)
        .unwrap_or(DEFAULT_PROGRAM)
}
