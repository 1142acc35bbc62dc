/// Lowercase a list of area tags for comparison
///
/// Surrounding whitespace is kept as-is: `" rust"` and `"rust"` are different
/// tags. With `dedupe` set, repeated tags collapse to their first occurrence.
pub fn normalized_areas(areas: &[String], dedupe: bool) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(areas.len());

    for area in areas {
        let lowered = area.to_lowercase();
        if dedupe && normalized.contains(&lowered) {
            continue;
        }
        normalized.push(lowered);
    }

    normalized
}

/// Count matching (interest, expertise) pairs between two normalized lists
///
/// Every pair counts, so a tag repeated on either side is counted once per
/// repetition.
#[inline]
pub fn count_overlap(interests: &[String], expertise: &[String]) -> usize {
    interests
        .iter()
        .map(|interest| expertise.iter().filter(|area| *area == interest).count())
        .sum()
}
