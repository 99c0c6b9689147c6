/// Splits a sentence into tokens on single spaces.
///
/// No punctuation stripping or case folding is applied. Consecutive spaces and
/// an empty sentence produce empty-string tokens; `""` yields `[""]`.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    sentence.split(' ').collect()
}
