use phf::phf_map;

pub const DIGITAL_C: u8 = 1;
pub const DIGITAL_G: u8 = 2;

/// Probe sequences are upper case only; anything
/// that misses this map fails validation.
pub const UTF8_TO_DIGITAL_NUCLEOTIDE: phf::Map<u8, u8> = phf_map! {
    65u8 => 0,    // A
    67u8 => 1,    // C
    71u8 => 2,    // G
    84u8 => 3,    // T
};

/// Returns true if every byte of the sequence is one of G, A, T, C.
///
/// An empty sequence is trivially over the alphabet.
pub fn is_nucleotide_sequence(sequence: &str) -> bool {
    sequence
        .bytes()
        .all(|b| UTF8_TO_DIGITAL_NUCLEOTIDE.contains_key(&b))
}

/// The percentage (0-100) of G and C bases in a sequence.
pub fn gc_content(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }

    let gc_count = sequence
        .bytes()
        .filter_map(|b| UTF8_TO_DIGITAL_NUCLEOTIDE.get(&b))
        .filter(|&&d| d == DIGITAL_C || d == DIGITAL_G)
        .count();

    gc_count as f64 * 100.0 / sequence.len() as f64
}
